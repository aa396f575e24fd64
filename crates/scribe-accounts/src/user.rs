//! Users and Plans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription plan tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pro" => Plan::Pro,
            _ => Plan::Free,
        }
    }

    /// Lifetime generation limit for a signed-in user on this plan.
    ///
    /// Pro is effectively unlimited; the counter still increments so usage
    /// remains visible.
    pub fn generation_limit(&self) -> u32 {
        match self {
            Plan::Free => 11,
            Plan::Pro => 1_000_000,
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Plan::Free
    }
}

/// A user account
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Identifier: `usr_` + 32 hex chars
    pub id: String,

    /// Unique, lowercased email
    pub email: String,

    /// Display name from the identity provider
    pub name: String,

    /// Avatar URL from the identity provider
    pub picture: String,

    /// Plan tier
    pub plan: Plan,

    /// Whether the identity provider verified the email
    pub email_verified: bool,

    /// Stripe customer id, set once on first checkout
    pub stripe_customer_id: Option<String>,

    /// Stripe subscription id, set by the checkout-completed webhook
    pub stripe_subscription_id: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new free-plan user
    pub fn new(email: impl Into<String>, name: impl Into<String>, picture: impl Into<String>) -> Self {
        Self {
            id: format!("usr_{}", uuid::Uuid::new_v4().simple()),
            email: email.into(),
            name: name.into(),
            picture: picture.into(),
            plan: Plan::Free,
            email_verified: true,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_shape() {
        let user = User::new("a@example.com", "A", "");
        assert!(user.id.starts_with("usr_"));
        assert_eq!(user.id.len(), 4 + 32);
        assert_eq!(user.plan, Plan::Free);
    }

    #[test]
    fn test_plan_parse() {
        assert_eq!(Plan::from_str("pro"), Plan::Pro);
        assert_eq!(Plan::from_str("PRO"), Plan::Pro);
        assert_eq!(Plan::from_str("free"), Plan::Free);
        assert_eq!(Plan::from_str("anything"), Plan::Free);
    }

    #[test]
    fn test_generation_limits() {
        assert_eq!(Plan::Free.generation_limit(), 11);
        assert_eq!(Plan::Pro.generation_limit(), 1_000_000);
    }
}
