//! # scribe-accounts
//!
//! Accounts, auth, and quota tracking for clinscribe.
//!
//! - **Users & plans**: free/pro users keyed by email, with Stripe linkage.
//! - **Actors**: the quota subject; a signed-in user or a cookie-identified
//!   guest. Guests get 10 lifetime generations, free accounts 11, pro
//!   effectively unlimited.
//! - **Tokens**: HS256 bearer tokens (30-day expiry) plus HMAC-signed
//!   session cookie values.
//! - **Identity**: Google ID-token verification behind the
//!   `IdentityVerifier` trait.
//! - **Stores**: `AccountStore` with in-memory and SQLite implementations.

pub mod actor;
pub mod error;
pub mod google;
pub mod quota;
pub mod session;
pub mod sqlite;
pub mod store;
pub mod token;
pub mod user;

pub use actor::{Actor, ActorKind, GUEST_GENERATION_LIMIT};
pub use error::{AccountError, Result};
pub use google::{GoogleVerifier, Identity, IdentityVerifier};
pub use quota::{QuotaBlock, QuotaDecision, enforce_quota, quota_block};
pub use session::{sign_session, verify_session};
pub use sqlite::SqliteStore;
pub use store::{AccountStore, MemoryStore};
pub use token::{sign_token, verify_token};
pub use user::{Plan, User};
