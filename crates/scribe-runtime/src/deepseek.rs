//! DeepSeek Chat Provider
//!
//! Implementation of `ChatProvider` over the DeepSeek chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use scribe_core::{
    error::{ProviderError, Result},
    message::Message,
    provider::ChatProvider,
};
use serde::{Deserialize, Serialize};

/// Fixed nucleus-sampling parameter for clinical generation
const TOP_P: f32 = 0.9;

/// DeepSeek provider configuration
#[derive(Clone, Debug)]
pub struct DeepSeekConfig {
    /// API key (bearer auth)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Chat-completions endpoint URL
    pub url: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DeepSeekConfig {
    /// Create from environment variables
    ///
    /// `DEEPSEEK_API_KEY` is required; the rest default to the production
    /// endpoint and conservative generation settings.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProviderError::Config("DEEPSEEK_API_KEY not set".into()))?;

        let model = std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| "deepseek-chat".into());
        let url = std::env::var("DEEPSEEK_URL")
            .unwrap_or_else(|_| "https://api.deepseek.com/v1/chat/completions".into());
        let max_tokens = std::env::var("DEEPSEEK_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1200);
        let temperature = std::env::var("DEEPSEEK_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.15);

        Ok(Self {
            api_key,
            model,
            url,
            max_tokens,
            temperature,
            timeout_secs: 70,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// DeepSeek chat-completions provider
pub struct DeepSeekProvider {
    client: reqwest::Client,
    config: DeepSeekConfig,
}

impl DeepSeekProvider {
    /// Create from configuration
    pub fn from_config(config: DeepSeekConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(DeepSeekConfig::from_env()?)
    }

    /// Extract the first choice's content, defaulting when empty
    fn extract_answer(response: ChatResponse) -> String {
        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if answer.is_empty() {
            "No response.".into()
        } else {
            answer
        }
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            top_p: TOP_P,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::Unavailable(e.to_string())
                } else {
                    ProviderError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "DeepSeek request failed");
            return Err(ProviderError::Provider(format!(
                "status {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(Self::extract_answer(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_answer() {
        let response = ChatResponse {
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: Some("  Summary\nAssessment  ".into()),
                },
            }],
        };
        assert_eq!(
            DeepSeekProvider::extract_answer(response),
            "Summary\nAssessment"
        );
    }

    #[test]
    fn test_extract_answer_empty_falls_back() {
        let response = ChatResponse { choices: vec![] };
        assert_eq!(DeepSeekProvider::extract_answer(response), "No response.");

        let response = ChatResponse {
            choices: vec![Choice {
                message: ChoiceMessage { content: None },
            }],
        };
        assert_eq!(DeepSeekProvider::extract_answer(response), "No response.");
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::system("sys"), Message::user("hello")];
        let body = ChatRequest {
            model: "deepseek-chat",
            messages: &messages,
            temperature: 0.15,
            top_p: TOP_P,
            max_tokens: 1200,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 1200);
    }
}
