//! # scribe-runtime
//!
//! HTTP clients for the hosted inference services clinscribe consumes.
//!
//! ## Providers
//!
//! - **DeepSeek**: chat-completions API for clinical note generation
//! - **Whisper**: speech-to-text API for dictation transcription
//!
//! Both implement the `scribe-core` provider traits; the inference engines
//! themselves are remote and out of scope.

pub mod deepseek;
pub mod whisper;

pub use deepseek::{DeepSeekConfig, DeepSeekProvider};
pub use whisper::{WhisperClient, WhisperConfig};

// Re-export core types for convenience
pub use scribe_core::{AudioClip, ChatProvider, Message, ProviderError, Result, Role, SpeechToText};
