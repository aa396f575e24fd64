//! Billing Configuration
//!
//! Billing is optional at startup: without a secret key and pro price id,
//! `from_env` returns `Ok(None)` and the server answers billing endpoints
//! with a misconfiguration error. A malformed price id is a hard startup
//! error instead, because it would otherwise fail on every checkout.

use crate::error::{BillingError, Result};

/// Stripe billing configuration
#[derive(Clone, Debug)]
pub struct BillingConfig {
    /// Stripe secret key (`sk_...`)
    pub secret_key: String,

    /// Webhook signing secret (`whsec_...`); webhooks are rejected without it
    pub webhook_secret: Option<String>,

    /// Price id for the pro subscription; must be `price_...`
    pub price_id_pro: String,

    /// Public base URL for success/cancel redirects, no trailing slash
    pub app_base_url: String,
}

impl BillingConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Option<Self>> {
        let secret_key = read_env("STRIPE_SECRET_KEY");
        let webhook_secret = read_env("STRIPE_WEBHOOK_SECRET");
        let price_id_pro = read_env("STRIPE_PRICE_ID_PRO");
        let app_base_url = read_env("APP_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".into());

        Self::from_parts(secret_key, webhook_secret, price_id_pro, app_base_url)
    }

    /// Assemble and validate configuration from already-read values
    pub fn from_parts(
        secret_key: Option<String>,
        webhook_secret: Option<String>,
        price_id_pro: Option<String>,
        app_base_url: String,
    ) -> Result<Option<Self>> {
        if let Some(price) = &price_id_pro {
            // Payment links and dashboard URLs are a recurring configuration
            // mistake; refuse them at startup.
            if price.starts_with("plink_") || price.starts_with("http") {
                return Err(BillingError::Config(format!(
                    "STRIPE_PRICE_ID_PRO must be a price_ id, not a payment link or URL: {price}"
                )));
            }
            if !price.starts_with("price_") {
                return Err(BillingError::Config(format!(
                    "STRIPE_PRICE_ID_PRO must start with 'price_': {price}"
                )));
            }
        }

        match (secret_key, price_id_pro) {
            (Some(secret_key), Some(price_id_pro)) => Ok(Some(Self {
                secret_key,
                webhook_secret,
                price_id_pro,
                app_base_url: app_base_url.trim_end_matches('/').to_string(),
            })),
            _ => Ok(None),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
