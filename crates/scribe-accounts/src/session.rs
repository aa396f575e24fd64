//! Signed Session Cookie Values
//!
//! The `cs_session` cookie holds `<user_id>.<hex HMAC-SHA256>`. Verification
//! is constant-time via the MAC itself.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AccountError, Result};

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AccountError::Config(format!("bad session secret: {e}")))
}

/// Sign a user id into a session cookie value
pub fn sign_session(user_id: &str, secret: &str) -> Result<String> {
    let mut m = mac(secret)?;
    m.update(user_id.as_bytes());
    let tag = hex::encode(m.finalize().into_bytes());
    Ok(format!("{user_id}.{tag}"))
}

/// Verify a session cookie value and return the user id, or None on any
/// mismatch or malformed input.
pub fn verify_session(value: &str, secret: &str) -> Option<String> {
    let (user_id, tag_hex) = value.rsplit_once('.')?;
    if user_id.is_empty() {
        return None;
    }
    let tag = hex::decode(tag_hex).ok()?;

    let mut m = mac(secret).ok()?;
    m.update(user_id.as_bytes());
    m.verify_slice(&tag).ok()?;

    Some(user_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_sign_verify_roundtrip() {
        let value = sign_session("usr_abc", SECRET).unwrap();
        assert_eq!(verify_session(&value, SECRET), Some("usr_abc".into()));
    }

    #[test]
    fn test_tampered_value_rejected() {
        let value = sign_session("usr_abc", SECRET).unwrap();
        let tampered = value.replacen("usr_abc", "usr_xyz", 1);
        assert_eq!(verify_session(&tampered, SECRET), None);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let value = sign_session("usr_abc", SECRET).unwrap();
        assert_eq!(verify_session(&value, "other"), None);
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert_eq!(verify_session("", SECRET), None);
        assert_eq!(verify_session("no-dot", SECRET), None);
        assert_eq!(verify_session(".deadbeef", SECRET), None);
        assert_eq!(verify_session("usr_abc.not-hex", SECRET), None);
    }
}
