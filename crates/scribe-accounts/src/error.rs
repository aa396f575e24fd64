//! Account Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AccountError>;

/// Account-related errors
#[derive(Error, Debug)]
pub enum AccountError {
    /// Bearer token expired
    #[error("Token expired")]
    TokenExpired,

    /// Bearer token signature or shape invalid
    #[error("Token invalid: {0}")]
    TokenInvalid(String),

    /// Identity (Google sign-in) verification failed
    #[error("Identity verification failed: {0}")]
    Identity(String),

    /// Email missing from sign-in payload
    #[error("Missing email")]
    MissingEmail,

    /// User lookup failed
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AccountError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            AccountError::TokenExpired | AccountError::TokenInvalid(_) => {
                "Your session has expired. Please sign in again."
            }
            AccountError::Identity(_) => "Google sign-in failed",
            AccountError::MissingEmail => "Missing credential",
            AccountError::Config(_) => "Service configuration error.",
            _ => "An error occurred processing your request.",
        }
    }
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        AccountError::Storage(err.to_string())
    }
}
