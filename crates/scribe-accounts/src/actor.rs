//! Quota Actors
//!
//! The quota subject: a signed-in user or a cookie-identified guest.

use serde::{Deserialize, Serialize};

/// Lifetime generation limit for anonymous guests
pub const GUEST_GENERATION_LIMIT: u32 = 10;

/// Kind of quota actor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Guest,
    User,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Guest => "guest",
            ActorKind::User => "user",
        }
    }
}

/// A quota actor
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub kind: ActorKind,
    pub id: String,
}

impl Actor {
    /// Guest actor identified by the guest cookie value.
    ///
    /// An empty id is valid and means "no cookie yet"; such actors are never
    /// counted against quota.
    pub fn guest(id: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Guest,
            id: id.into(),
        }
    }

    /// Signed-in user actor
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::User,
            id: id.into(),
        }
    }
}
