//! Bearer Tokens
//!
//! HS256 JWTs signed with the app secret; `sub` carries the user id.
//! Tokens expire 30 days after issue.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AccountError, Result};

/// Token lifetime
pub const TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// Sign a bearer token for a user id
pub fn sign_token(user_id: &str, secret: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AccountError::TokenInvalid(e.to_string()))
}

/// Verify a bearer token and return the user id it carries
pub fn verify_token(token: &str, secret: &str) -> Result<String> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AccountError::TokenExpired,
        _ => AccountError::TokenInvalid(e.to_string()),
    })?;

    Ok(data.claims.sub)
}
