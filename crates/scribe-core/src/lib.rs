//! # scribe-core
//!
//! Core provider abstractions for clinscribe.
//!
//! Defines the two remote-inference seams the rest of the workspace builds on:
//! `ChatProvider` for LLM chat completion and `SpeechToText` for dictation
//! transcription. Both run behind hosted HTTP APIs; this crate never contains
//! an inference engine, only the interfaces and shared message types.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{ProviderError, Result};
pub use message::{Message, Role};
pub use provider::{AudioClip, ChatProvider, SpeechToText};
