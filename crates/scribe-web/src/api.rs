//! API Client

use serde::Deserialize;

use crate::upgrade::HttpReply;

/// Current session info from `/api/me`
#[derive(Clone, Debug, Deserialize)]
pub struct MeInfo {
    pub logged_in: bool,
    pub email: Option<String>,
    pub plan: String,
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
}

/// Ensure the guest cookie exists so usage can be counted
pub async fn ensure_session() {
    let _ = reqwest::Client::new().get("/api/session").send().await;
}

/// Fetch the signed-in state and usage counters
pub async fn fetch_me() -> Result<MeInfo, String> {
    let response = reqwest::Client::new()
        .get("/api/me")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    response.json().await.map_err(|e| e.to_string())
}

/// Request a clinical generation
pub async fn generate(query: &str, mode: &str) -> Result<String, String> {
    post_generation("/api/generate", serde_json::json!({ "query": query, "mode": mode })).await
}

/// Request a consult-note generation from raw dictation
pub async fn consult(text: &str, mode: &str) -> Result<String, String> {
    post_generation("/api/consult", serde_json::json!({ "text": text, "mode": mode })).await
}

async fn post_generation(endpoint: &str, body: serde_json::Value) -> Result<String, String> {
    let response = reqwest::Client::new()
        .post(endpoint)
        .json(&body)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if status.is_success() {
        let data: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        return Ok(data["answer"].as_str().unwrap_or("No response.").to_string());
    }

    let data: serde_json::Value = response.json().await.unwrap_or_default();
    if status.as_u16() == 402 {
        // Quota block payload; the headline is the user-facing line.
        return Err(data["headline"]
            .as_str()
            .unwrap_or("Free limit reached")
            .to_string());
    }
    Err(data["error"].as_str().unwrap_or("Request failed").to_string())
}

/// One checkout-session request, reduced to status plus optional JSON body
pub async fn checkout_reply() -> Result<HttpReply, String> {
    let response = reqwest::Client::new()
        .post(crate::upgrade::CHECKOUT_ENDPOINT)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status().as_u16();
    let body = response.json::<serde_json::Value>().await.ok();
    Ok(HttpReply { status, body })
}
