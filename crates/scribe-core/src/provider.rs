//! Provider Traits
//!
//! Common interfaces for the two hosted inference services clinscribe
//! consumes: chat completion (note generation) and speech-to-text
//! (dictation transcription). The server works exclusively through these
//! traits, so backends can be swapped without touching handler code.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// An uploaded audio clip awaiting transcription
#[derive(Clone, Debug)]
pub struct AudioClip {
    /// Raw audio bytes as received from the browser recorder
    pub bytes: Vec<u8>,

    /// Original filename (extension hints at the container format)
    pub filename: String,

    /// MIME type reported by the upload
    pub content_type: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }
}

/// Strategy trait for chat-completion providers
///
/// Implementations send the message list to a remote chat API and return the
/// first choice's content as plain text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a completion from messages
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// Strategy trait for speech-to-text providers
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe an audio clip to plain text
    async fn transcribe(&self, clip: AudioClip) -> Result<String>;
}
