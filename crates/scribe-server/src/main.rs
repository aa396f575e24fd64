//! clinscribe HTTP Server
//!
//! Serves the JSON API and the static web frontend. Every external service
//! (chat provider, speech-to-text, Google sign-in, Stripe) is optional at
//! startup; missing configuration degrades the matching endpoints to a
//! misconfiguration error instead of preventing boot.

mod auth;
mod handlers;
mod routes;
mod state;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use scribe_accounts::{AccountStore, GoogleVerifier, IdentityVerifier, SqliteStore};
use scribe_billing::{BillingConfig, StripeGateway};
use scribe_clinical::PromptBuilder;
use scribe_core::{ChatProvider, SpeechToText};
use scribe_runtime::{DeepSeekProvider, WhisperClient};

use crate::state::AppState;

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting clinscribe server...");

    let secret = read_env("APP_SECRET_KEY").unwrap_or_else(|| {
        tracing::warn!("⚠ APP_SECRET_KEY not set; using an insecure development secret");
        "dev-secret-change-me".into()
    });

    let db_path = read_env("DB_PATH").unwrap_or_else(|| "clinscribe.db".into());
    let store: Arc<dyn AccountStore> = Arc::new(SqliteStore::connect(&db_path).await?);
    tracing::info!("✓ Account store ready at {}", db_path);

    let chat: Option<Arc<dyn ChatProvider>> = match DeepSeekProvider::from_env() {
        Ok(provider) => {
            tracing::info!("✓ DeepSeek chat provider configured");
            Some(Arc::new(provider))
        }
        Err(e) => {
            tracing::warn!("⚠ Chat provider not configured: {}", e);
            None
        }
    };

    let stt: Option<Arc<dyn SpeechToText>> = match WhisperClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Whisper transcription configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Transcription not configured: {}", e);
            None
        }
    };

    let verifier: Option<Arc<dyn IdentityVerifier>> = match GoogleVerifier::from_env() {
        Ok(v) => {
            tracing::info!("✓ Google sign-in configured");
            Some(Arc::new(v))
        }
        Err(e) => {
            tracing::warn!("⚠ Google sign-in not configured: {}", e);
            None
        }
    };

    // A malformed Stripe price id is a hard startup error; absent Stripe
    // configuration is not.
    let billing = match BillingConfig::from_env()? {
        Some(config) => {
            tracing::info!("✓ Stripe billing configured");
            Some(Arc::new(StripeGateway::new(config)))
        }
        None => {
            tracing::warn!("⚠ Stripe billing not configured");
            None
        }
    };

    let creator_email = read_env("CREATOR_EMAIL").map(|e| e.to_lowercase());

    let state = AppState {
        store,
        chat,
        stt,
        verifier,
        billing,
        prompts: Arc::new(PromptBuilder::from_env()),
        secret,
        creator_email,
    };

    let static_dir = read_env("STATIC_DIR").unwrap_or_else(|| "static".into());
    let index = Path::new(&static_dir).join("index.html");
    let static_service = ServeDir::new(&static_dir).fallback(ServeFile::new(index));

    let app = routes::app(state).fallback_service(static_service);

    let addr = read_env("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into());
    tracing::info!("Server running on http://{}", addr);
    tracing::info!("  API:    http://{}/api", addr);
    tracing::info!("  Health: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
