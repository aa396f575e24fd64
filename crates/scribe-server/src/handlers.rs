//! HTTP Request Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use scribe_accounts::{QuotaDecision, enforce_quota, sign_session, sign_token};
use scribe_billing::{apply_event, classify_event, verify_event};
use scribe_clinical::{ConsultMode, GenerateMode};
use scribe_core::AudioClip;

use crate::auth::{
    GUEST_COOKIE, clear_session_cookie, cookie_value, guest_cookie, resolve_actor, session_cookie,
};
use crate::state::AppState;

/// JSON error response as (status, body)
type ApiError = (StatusCode, Json<serde_json::Value>);

fn err(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chat_configured": state.chat.is_some(),
        "stt_configured": state.stt.is_some(),
        "stripe_configured": state.billing.is_some(),
        "auth_configured": state.verifier.is_some(),
    }))
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /_ping
pub async fn ping() -> &'static str {
    "pong"
}

// ---------------------------------------------------------------------------
// Session & identity
// ---------------------------------------------------------------------------

/// GET /api/session
///
/// Ensures the guest cookie exists so anonymous usage can be counted.
pub async fn session(headers: HeaderMap) -> Response {
    let existing = cookie_value(&headers, GUEST_COOKIE);
    let mut response = Json(json!({ "ok": true })).into_response();

    if existing.is_none() {
        let guest_id = uuid::Uuid::new_v4().to_string();
        if let Ok(value) = guest_cookie(&guest_id).parse() {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// GET /api/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_actor = resolve_actor(&state, &headers).await;
    let used = state
        .store
        .usage_get(&request_actor.actor)
        .await
        .unwrap_or(0);
    let limit = request_actor.limit;
    let remaining = limit.saturating_sub(used);

    // `used` is reported raw; increment-then-check means it can exceed the
    // limit. Only the 402 payload clamps for display.
    let body = match &request_actor.user {
        Some(user) => json!({
            "logged_in": true,
            "email": user.email,
            "plan": user.plan.as_str(),
            "used": used,
            "limit": limit,
            "remaining": remaining,
        }),
        None => json!({
            "logged_in": false,
            "email": serde_json::Value::Null,
            "plan": "guest",
            "used": used,
            "limit": limit,
            "remaining": remaining,
        }),
    };

    Json(body).into_response()
}

#[derive(Default, Deserialize)]
pub struct GoogleAuthRequest {
    #[serde(default)]
    credential: Option<String>,
}

/// POST /auth/google
pub async fn google_auth(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Some(verifier) = &state.verifier else {
        return Err(err(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfigured: missing GOOGLE_CLIENT_ID",
        ));
    };

    // Absent or malformed bodies read as empty requests.
    let request: GoogleAuthRequest = serde_json::from_slice(&body).unwrap_or_default();
    let credential = request
        .credential
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| err(StatusCode::BAD_REQUEST, "Missing credential"))?;

    let identity = verifier.verify(&credential).await.map_err(|e| {
        tracing::warn!(error = %e, "Google sign-in rejected");
        err(StatusCode::UNAUTHORIZED, "Google sign-in failed")
    })?;

    let user = state
        .store
        .create_or_get_by_email(&identity.email, &identity.name, &identity.picture)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "user upsert failed");
            err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message())
        })?;

    // The configured owner email is granted pro at every sign-in.
    let user = if state.creator_email.as_deref() == Some(user.email.as_str())
        && user.plan != scribe_accounts::Plan::Pro
    {
        state
            .store
            .set_plan(&user.id, scribe_accounts::Plan::Pro)
            .await
            .map_err(|e| err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message()))?;
        state
            .store
            .get_user(&user.id)
            .await
            .map_err(|e| err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message()))?
            .unwrap_or(user)
    } else {
        user
    };

    let token = sign_token(&user.id, &state.secret)
        .map_err(|e| err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message()))?;
    let signed = sign_session(&user.id, &state.secret)
        .map_err(|e| err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message()))?;

    tracing::info!(user_id = %user.id, email = %user.email, "User signed in");

    let mut response = Json(json!({
        "ok": true,
        "token": token,
        "user": { "email": user.email, "plan": user.plan.as_str() },
    }))
    .into_response();
    if let Ok(value) = session_cookie(&signed).parse() {
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}

/// POST /auth/logout
pub async fn logout() -> Response {
    let mut response = Json(json!({ "ok": true })).into_response();
    if let Ok(value) = clear_session_cookie().parse() {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

// ---------------------------------------------------------------------------
// Billing
// ---------------------------------------------------------------------------

/// POST /api/create-checkout-session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Misconfiguration reported before auth so operators see it immediately.
    let Some(billing) = &state.billing else {
        return Err(err(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfigured: missing Stripe configuration",
        ));
    };

    let request_actor = resolve_actor(&state, &headers).await;
    let Some(user) = request_actor.user else {
        return Err(err(StatusCode::UNAUTHORIZED, "not_authenticated"));
    };

    let url = billing
        .create_upgrade_session(&user, state.store.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "checkout session failed");
            err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message())
        })?;

    Ok(Json(json!({ "url": url })))
}

/// POST /api/stripe/webhook
///
/// Plain-text responses; Stripe only needs the status code.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<&'static str, (StatusCode, &'static str)> {
    let secret = state
        .billing
        .as_ref()
        .and_then(|b| b.webhook_secret())
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Webhook secret not configured",
        ))?;

    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let event = verify_event(&body, signature, secret).map_err(|e| {
        tracing::warn!(error = %e, "webhook signature rejected");
        (StatusCode::BAD_REQUEST, "Bad signature")
    })?;

    let billing_event = classify_event(&event);
    apply_event(billing_event, state.store.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "webhook apply failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Webhook handling failed")
        })?;

    Ok("OK")
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    query: String,
    #[serde(default)]
    mode: String,
}

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, Response> {
    let Some(chat) = &state.chat else {
        return Err(err(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfigured: missing DEEPSEEK_API_KEY",
        )
        .into_response());
    };

    // Absent or malformed bodies read as empty requests.
    let request: GenerateRequest = serde_json::from_slice(&body).unwrap_or_default();
    let query = request.query.trim();
    if query.is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "Empty query").into_response());
    }

    check_quota(&state, &headers).await?;

    let mode = GenerateMode::parse(&request.mode);
    let prompt = state.prompts.generate(mode, query);
    let answer = chat.complete(&prompt.to_messages()).await.map_err(|e| {
        tracing::error!(error = %e, "generation failed");
        err(StatusCode::BAD_GATEWAY, &e.user_message()).into_response()
    })?;

    Ok(Json(json!({ "answer": answer })))
}

#[derive(Default, Deserialize)]
pub struct ConsultRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    mode: String,
}

/// POST /api/consult
pub async fn consult(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, Response> {
    let Some(chat) = &state.chat else {
        return Err(err(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfigured: missing DEEPSEEK_API_KEY",
        )
        .into_response());
    };

    // Absent or malformed bodies read as empty requests.
    let request: ConsultRequest = serde_json::from_slice(&body).unwrap_or_default();
    let text = request.text.trim();
    if text.is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "Empty input").into_response());
    }

    check_quota(&state, &headers).await?;

    let mode = ConsultMode::parse(&request.mode);
    let prompt = state.prompts.consult(mode, text);
    let answer = chat.complete(&prompt.to_messages()).await.map_err(|e| {
        tracing::error!(error = %e, "consult generation failed");
        err(StatusCode::BAD_GATEWAY, &e.user_message()).into_response()
    })?;

    Ok(Json(json!({ "answer": answer })))
}

/// Enforce the lifetime quota; a blocked attempt answers 402 with the
/// upgrade payload.
async fn check_quota(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let request_actor = resolve_actor(state, headers).await;
    let decision = enforce_quota(
        state.store.as_ref(),
        &request_actor.actor,
        request_actor.limit,
        request_actor.is_logged_in(),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "quota check failed");
        err(StatusCode::INTERNAL_SERVER_ERROR, &e.user_message()).into_response()
    })?;

    match decision {
        QuotaDecision::Allowed { used } => {
            tracing::debug!(actor = %request_actor.actor.id, used, "generation allowed");
            Ok(())
        }
        QuotaDecision::Blocked(block) => {
            tracing::info!(actor = %request_actor.actor.id, "quota exhausted");
            Err((StatusCode::PAYMENT_REQUIRED, Json(*block)).into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcription
// ---------------------------------------------------------------------------

/// POST /api/transcribe
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(stt) = &state.stt else {
        return Err(err(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfigured: missing STT_URL",
        ));
    };

    let mut clip: Option<AudioClip> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("audio") {
            continue;
        }
        let filename = field
            .file_name()
            .unwrap_or("recording.webm")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("audio/webm")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| err(StatusCode::BAD_REQUEST, "Missing audio"))?;
        clip = Some(AudioClip::new(bytes.to_vec(), filename, content_type));
        break;
    }

    let clip = clip
        .filter(|c| !c.bytes.is_empty())
        .ok_or_else(|| err(StatusCode::BAD_REQUEST, "Missing audio"))?;

    let text = stt.transcribe(clip).await.map_err(|e| {
        tracing::error!(error = %e, "transcription failed");
        err(StatusCode::INTERNAL_SERVER_ERROR, "Transcription failed")
    })?;

    Ok(Json(json!({ "text": text })))
}
