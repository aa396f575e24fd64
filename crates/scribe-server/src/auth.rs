//! Request Authentication
//!
//! Resolves the quota actor for a request. Priority: bearer token, then
//! signed session cookie, then guest cookie. Invalid credentials fall
//! through to guest rather than erroring, matching the soft-auth model of
//! the API: only billing endpoints require a signed-in user.

use axum::http::HeaderMap;

use scribe_accounts::{
    Actor, GUEST_GENERATION_LIMIT, User, verify_session, verify_token,
};

use crate::state::AppState;

/// Guest identity cookie
pub const GUEST_COOKIE: &str = "cs_guest";

/// Signed session cookie
pub const SESSION_COOKIE: &str = "cs_session";

/// One year, the guest cookie lifetime
const GUEST_COOKIE_MAX_AGE: u32 = 31_536_000;

/// The resolved actor plus plan-derived limits
pub struct RequestActor {
    pub actor: Actor,
    pub limit: u32,
    pub user: Option<User>,
}

impl RequestActor {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Extract a named cookie value from the Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    raw.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

/// Resolve the quota actor for a request.
///
/// A missing guest cookie yields a guest actor with an empty id, which is
/// never counted against quota; `/api/session` hands out the cookie.
pub async fn resolve_actor(state: &AppState, headers: &HeaderMap) -> RequestActor {
    let user_id = bearer_token(headers)
        .and_then(|token| verify_token(&token, &state.secret).ok())
        .or_else(|| {
            cookie_value(headers, SESSION_COOKIE)
                .and_then(|value| verify_session(&value, &state.secret))
        });

    if let Some(user_id) = user_id {
        match state.store.get_user(&user_id).await {
            Ok(Some(user)) => {
                return RequestActor {
                    actor: Actor::user(&user.id),
                    limit: user.plan.generation_limit(),
                    user: Some(user),
                };
            }
            Ok(None) => {
                tracing::debug!(%user_id, "token references unknown user");
            }
            Err(e) => {
                tracing::warn!(error = %e, "user lookup failed; treating as guest");
            }
        }
    }

    let guest_id = cookie_value(headers, GUEST_COOKIE).unwrap_or_default();
    RequestActor {
        actor: Actor::guest(guest_id),
        limit: GUEST_GENERATION_LIMIT,
        user: None,
    }
}

/// Set-Cookie value for the long-lived guest id
pub fn guest_cookie(guest_id: &str) -> String {
    format!(
        "{GUEST_COOKIE}={guest_id}; Path=/; Max-Age={GUEST_COOKIE_MAX_AGE}; HttpOnly; Secure; SameSite=Lax"
    )
}

/// Set-Cookie value for the signed session
pub fn session_cookie(signed_value: &str) -> String {
    format!(
        "{SESSION_COOKIE}={signed_value}; Path=/; Max-Age={GUEST_COOKIE_MAX_AGE}; HttpOnly; Secure; SameSite=Lax"
    )
}

/// Set-Cookie value that clears the session
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, COOKIE};

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "cs_guest=g-123; cs_session=usr_1.abcd".parse().unwrap(),
        );
        assert_eq!(cookie_value(&headers, "cs_guest").unwrap(), "g-123");
        assert_eq!(cookie_value(&headers, "cs_session").unwrap(), "usr_1.abcd");
        assert!(cookie_value(&headers, "missing").is_none());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");

        headers.insert(AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_guest_cookie_attributes() {
        let cookie = guest_cookie("g-123");
        assert!(cookie.starts_with("cs_guest=g-123;"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_clear_session_cookie_expires() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
