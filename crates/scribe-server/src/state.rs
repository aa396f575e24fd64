//! Application State

use std::sync::Arc;

use scribe_accounts::{AccountStore, IdentityVerifier};
use scribe_billing::StripeGateway;
use scribe_clinical::PromptBuilder;
use scribe_core::{ChatProvider, SpeechToText};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// User and usage storage
    pub store: Arc<dyn AccountStore>,

    /// Chat-completion provider (None if not configured)
    pub chat: Option<Arc<dyn ChatProvider>>,

    /// Speech-to-text provider (None if not configured)
    pub stt: Option<Arc<dyn SpeechToText>>,

    /// Google sign-in verifier (None if not configured)
    pub verifier: Option<Arc<dyn IdentityVerifier>>,

    /// Stripe gateway (None if billing not configured)
    pub billing: Option<Arc<StripeGateway>>,

    /// Mode-aware prompt builder
    pub prompts: Arc<PromptBuilder>,

    /// App secret used for bearer tokens and signed session cookies
    pub secret: String,

    /// Email auto-upgraded to pro at sign-in (lowercased)
    pub creator_email: Option<String>,
}
