//! Whisper Transcription Client
//!
//! Implementation of `SpeechToText` over a Whisper-style HTTP transcription
//! API: multipart upload of the recorded clip, JSON `{ "text": ... }` reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use scribe_core::{
    error::{ProviderError, Result},
    provider::{AudioClip, SpeechToText},
};
use serde::Deserialize;

const DEFAULT_INITIAL_PROMPT: &str = "Australian clinical dictation. Medical terminology may include: \
DVA, HbA1c, COPD, AF, eGFR, CRP, troponin, metoprolol, apixaban.";

/// Whisper client configuration
#[derive(Clone, Debug)]
pub struct WhisperConfig {
    /// Transcription endpoint URL
    pub url: String,

    /// API key (bearer auth), if the endpoint requires one
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Spoken language hint
    pub language: String,

    /// Domain-priming prompt for medical vocabulary
    pub initial_prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WhisperConfig {
    /// Create from environment variables
    ///
    /// `STT_URL` is required; the rest default to English clinical dictation.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("STT_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProviderError::Config("STT_URL not set".into()))?;

        let api_key = std::env::var("STT_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let model = std::env::var("STT_MODEL").unwrap_or_else(|_| "whisper-1".into());
        let language = std::env::var("WHISPER_LANGUAGE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "en".into());
        let initial_prompt = std::env::var("WHISPER_INITIAL_PROMPT")
            .unwrap_or_else(|_| DEFAULT_INITIAL_PROMPT.into());
        let temperature = std::env::var("WHISPER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            url,
            api_key,
            model,
            language,
            initial_prompt,
            temperature,
            timeout_secs: 120,
        })
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Whisper-style speech-to-text client
pub struct WhisperClient {
    client: reqwest::Client,
    config: WhisperConfig,
}

impl WhisperClient {
    /// Create from configuration
    pub fn from_config(config: WhisperConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(WhisperConfig::from_env()?)
    }

    fn build_form(&self, clip: AudioClip) -> Result<Form> {
        let part = Part::bytes(clip.bytes)
            .file_name(clip.filename)
            .mime_str(&clip.content_type)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone())
            .text("prompt", self.config.initial_prompt.clone())
            .text("temperature", self.config.temperature.to_string()))
    }
}

#[async_trait]
impl SpeechToText for WhisperClient {
    async fn transcribe(&self, clip: AudioClip) -> Result<String> {
        let form = self.build_form(clip)?;

        let mut request = self.client.post(&self.config.url).multipart(form);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                ProviderError::Unavailable(e.to_string())
            } else {
                ProviderError::Provider(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "transcription request failed");
            return Err(ProviderError::Provider(format!(
                "status {status}: {body}"
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WhisperConfig {
        WhisperConfig {
            url: "http://localhost:9000/v1/audio/transcriptions".into(),
            api_key: None,
            model: "whisper-1".into(),
            language: "en".into(),
            initial_prompt: DEFAULT_INITIAL_PROMPT.into(),
            temperature: 0.0,
            timeout_secs: 120,
        }
    }

    #[test]
    fn test_build_form_accepts_webm_clip() {
        let client = WhisperClient::from_config(test_config()).unwrap();
        let clip = AudioClip::new(vec![0u8; 16], "dictation.webm", "audio/webm");
        assert!(client.build_form(clip).is_ok());
    }

    #[test]
    fn test_build_form_rejects_bad_mime() {
        let client = WhisperClient::from_config(test_config()).unwrap();
        let clip = AudioClip::new(vec![0u8; 16], "dictation.webm", "not a mime type");
        assert!(client.build_form(clip).is_err());
    }

    #[test]
    fn test_transcription_response_default_text() {
        let parsed: TranscriptionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text, "");

        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text":" patient reports chest pain "}"#).unwrap();
        assert_eq!(parsed.text.trim(), "patient reports chest pain");
    }
}
