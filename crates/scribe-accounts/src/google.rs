//! Google Sign-In Verification
//!
//! Validates a Google ID token server-side against the tokeninfo endpoint
//! and checks the audience matches the configured OAuth client id.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AccountError, Result};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// A verified identity from the sign-in provider
#[derive(Clone, Debug)]
pub struct Identity {
    /// Lowercased email
    pub email: String,
    pub name: String,
    pub picture: String,
}

/// Strategy trait for identity-token verification
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a credential and return the identity it asserts
    async fn verify(&self, credential: &str) -> Result<Identity>;
}

#[derive(Deserialize)]
struct TokenInfo {
    #[serde(default)]
    aud: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Google ID-token verifier
pub struct GoogleVerifier {
    client_id: String,
    http: reqwest::Client,
}

impl GoogleVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AccountError::Config("GOOGLE_CLIENT_ID not set".into()))?;
        Ok(Self::new(client_id))
    }

    fn identity_from(&self, info: TokenInfo) -> Result<Identity> {
        if info.aud != self.client_id {
            return Err(AccountError::Identity("audience mismatch".into()));
        }
        if info.email_verified.as_deref() == Some("false") {
            return Err(AccountError::Identity("email not verified".into()));
        }

        let email = info.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AccountError::MissingEmail);
        }

        Ok(Identity {
            email,
            name: info
                .name
                .filter(|n| !n.is_empty())
                .or(info.given_name)
                .unwrap_or_default(),
            picture: info.picture.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| AccountError::Identity(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AccountError::Identity(format!(
                "tokeninfo status {}",
                response.status()
            )));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AccountError::Identity(e.to_string()))?;

        self.identity_from(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(aud: &str, email: &str) -> TokenInfo {
        TokenInfo {
            aud: aud.into(),
            email: email.into(),
            email_verified: Some("true".into()),
            name: Some("Doc".into()),
            given_name: None,
            picture: None,
        }
    }

    #[test]
    fn test_audience_must_match() {
        let verifier = GoogleVerifier::new("client-123");
        let err = verifier
            .identity_from(info("other-client", "a@b.c"))
            .unwrap_err();
        assert!(matches!(err, AccountError::Identity(_)));
    }

    #[test]
    fn test_email_lowercased() {
        let verifier = GoogleVerifier::new("client-123");
        let identity = verifier
            .identity_from(info("client-123", "Doc@Example.COM"))
            .unwrap();
        assert_eq!(identity.email, "doc@example.com");
        assert_eq!(identity.name, "Doc");
    }

    #[test]
    fn test_given_name_fallback() {
        let verifier = GoogleVerifier::new("client-123");
        let mut token_info = info("client-123", "a@b.c");
        token_info.name = None;
        token_info.given_name = Some("D".into());
        let identity = verifier.identity_from(token_info).unwrap();
        assert_eq!(identity.name, "D");
    }

    #[test]
    fn test_missing_email_rejected() {
        let verifier = GoogleVerifier::new("client-123");
        let err = verifier.identity_from(info("client-123", " ")).unwrap_err();
        assert!(matches!(err, AccountError::MissingEmail));
    }
}
