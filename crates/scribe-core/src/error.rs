//! Error Types

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider error types
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Upstream API returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable or timed out
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Response body could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid configuration (API key, URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable(_) | ProviderError::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Unavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            ProviderError::Config(_) => "Service configuration error.".into(),
            _ => "AI request failed".into(),
        }
    }
}

impl From<anyhow::Error> for ProviderError {
    fn from(err: anyhow::Error) -> Self {
        ProviderError::Provider(err.to_string())
    }
}
