//! Router Assembly

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the API router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::healthz))
        .route("/_ping", get(handlers::ping))
        .route("/api/session", get(handlers::session))
        .route("/api/me", get(handlers::me))
        .route("/auth/google", post(handlers::google_auth))
        .route("/auth/logout", post(handlers::logout))
        .route(
            "/api/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route("/api/stripe/webhook", post(handlers::stripe_webhook))
        .route("/api/generate", post(handlers::generate))
        .route("/api/consult", post(handlers::consult))
        .route("/api/transcribe", post(handlers::transcribe))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
