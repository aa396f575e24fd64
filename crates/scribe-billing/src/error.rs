//! Billing Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, BillingError>;

/// Billing-related errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Checkout session created without a hosted URL
    #[error("No checkout URL returned")]
    MissingCheckoutUrl,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Account store error
    #[error("Account error: {0}")]
    Account(#[from] scribe_accounts::AccountError),
}

impl BillingError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            BillingError::Stripe(msg) => msg.clone(),
            BillingError::Config(_) => "Service configuration error.".into(),
            _ => "Payment processing failed. Please try again.".into(),
        }
    }
}
