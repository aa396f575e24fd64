//! Stripe Checkout Integration
//!
//! Hosted subscription checkout: ensure a Stripe customer exists for the
//! user (created once, id persisted), then create a subscription-mode
//! session for the pro price and return its hosted URL.

use std::collections::HashMap;
use std::str::FromStr;

use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCustomer, Customer, CustomerId,
};

use scribe_accounts::{AccountStore, User};

use crate::config::BillingConfig;
use crate::error::{BillingError, Result};

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
    config: BillingConfig,
}

impl StripeGateway {
    /// Create a new gateway from validated configuration
    pub fn new(config: BillingConfig) -> Self {
        Self {
            client: Client::new(config.secret_key.clone()),
            config,
        }
    }

    /// Get the webhook signing secret, if configured
    pub fn webhook_secret(&self) -> Option<&str> {
        self.config.webhook_secret.as_deref()
    }

    /// Return the user's Stripe customer id, creating the customer on first
    /// use and persisting the id.
    async fn ensure_customer(&self, user: &User, store: &dyn AccountStore) -> Result<String> {
        if let Some(id) = &user.stripe_customer_id {
            return Ok(id.clone());
        }

        let mut params = CreateCustomer::new();
        params.email = Some(&user.email);
        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), user.id.clone());
        params.metadata = Some(metadata);

        let customer = Customer::create(&self.client, params)
            .await
            .map_err(|e| BillingError::Stripe(e.to_string()))?;

        store.set_stripe_customer(&user.id, customer.id.as_str()).await?;

        tracing::info!(user_id = %user.id, customer_id = %customer.id, "Created Stripe customer");
        Ok(customer.id.to_string())
    }

    /// Create a subscription checkout session for the pro plan and return
    /// the hosted checkout URL.
    pub async fn create_upgrade_session(
        &self,
        user: &User,
        store: &dyn AccountStore,
    ) -> Result<String> {
        let customer_id = self.ensure_customer(user, store).await?;
        let customer_id = CustomerId::from_str(&customer_id)
            .map_err(|e| BillingError::Stripe(e.to_string()))?;

        let success_url = format!(
            "{}/pro/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.config.app_base_url
        );
        let cancel_url = format!("{}/pro/cancelled", self.config.app_base_url);

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.customer = Some(customer_id);
        params.success_url = Some(&success_url);
        params.cancel_url = Some(&cancel_url);
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(self.config.price_id_pro.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), user.id.clone());
        metadata.insert("product".to_string(), "clinscribe_pro".to_string());
        params.metadata = Some(metadata);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| BillingError::Stripe(e.to_string()))?;

        session.url.ok_or(BillingError::MissingCheckoutUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BillingConfig {
        BillingConfig {
            secret_key: "sk_test_1".into(),
            webhook_secret: Some("whsec_1".into()),
            price_id_pro: "price_123".into(),
            app_base_url: "https://app.example".into(),
        }
    }

    #[test]
    fn test_gateway_exposes_webhook_secret() {
        let gateway = StripeGateway::new(test_config());
        assert_eq!(gateway.webhook_secret(), Some("whsec_1"));
    }

    #[test]
    fn test_redirect_urls_built_from_base() {
        let config = test_config();
        let success = format!(
            "{}/pro/success?session_id={{CHECKOUT_SESSION_ID}}",
            config.app_base_url
        );
        assert_eq!(
            success,
            "https://app.example/pro/success?session_id={CHECKOUT_SESSION_ID}"
        );
    }
}
