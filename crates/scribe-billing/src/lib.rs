//! # scribe-billing
//!
//! Stripe subscription billing for clinscribe.
//!
//! Uses the hosted Stripe Checkout flow: the server creates a
//! subscription-mode checkout session for the pro price and hands the client
//! a redirect URL. Plan changes are driven exclusively by webhooks, keyed on
//! the Stripe customer id recorded at first checkout.

pub mod checkout;
pub mod config;
pub mod error;
pub mod webhook;

pub use checkout::StripeGateway;
pub use config::BillingConfig;
pub use error::{BillingError, Result};
pub use webhook::{apply_event, classify_event, verify_event, BillingEvent};
