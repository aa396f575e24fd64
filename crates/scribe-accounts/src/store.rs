//! Account Storage
//!
//! Trait over user and usage persistence, with an in-memory implementation
//! for tests and development. The SQLite implementation lives in `sqlite`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::actor::Actor;
use crate::error::{AccountError, Result};
use crate::user::{Plan, User};

/// Storage for users and usage counters
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Get user by id
    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    /// Get user by (lowercased) email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get user by Stripe customer id
    async fn get_user_by_customer(&self, customer_id: &str) -> Result<Option<User>>;

    /// Upsert by email: existing users get name/picture refreshed (blank
    /// incoming values preserve the stored ones); new users start on free.
    async fn create_or_get_by_email(&self, email: &str, name: &str, picture: &str) -> Result<User>;

    /// Record the Stripe customer id (set once on first checkout)
    async fn set_stripe_customer(&self, user_id: &str, customer_id: &str) -> Result<()>;

    /// Upgrade to pro, keeping existing Stripe linkage when None is passed
    async fn upgrade_to_pro(
        &self,
        user_id: &str,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<()>;

    /// Set the plan without touching Stripe linkage
    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<()>;

    /// Current usage for an actor (0 when unseen or id is empty)
    async fn usage_get(&self, actor: &Actor) -> Result<u32>;

    /// Increment usage and return the new total (no-op 0 for empty ids)
    async fn usage_incr(&self, actor: &Actor, by: u32) -> Result<u32>;
}

/// In-memory account store (for development and tests)
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    usage: RwLock<HashMap<Actor, u32>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            usage: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_customer(&self, customer_id: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users
            .values()
            .find(|u| u.stripe_customer_id.as_deref() == Some(customer_id))
            .cloned())
    }

    async fn create_or_get_by_email(&self, email: &str, name: &str, picture: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AccountError::MissingEmail);
        }

        let mut users = self.users.write().unwrap();
        if let Some(existing) = users.values_mut().find(|u| u.email == email) {
            if !name.is_empty() {
                existing.name = name.to_string();
            }
            if !picture.is_empty() {
                existing.picture = picture.to_string();
            }
            return Ok(existing.clone());
        }

        let user = User::new(email, name, picture);
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn set_stripe_customer(&self, user_id: &str, customer_id: &str) -> Result<()> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AccountError::UserNotFound(user_id.into()))?;
        user.stripe_customer_id = Some(customer_id.to_string());
        Ok(())
    }

    async fn upgrade_to_pro(
        &self,
        user_id: &str,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<()> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AccountError::UserNotFound(user_id.into()))?;
        user.plan = Plan::Pro;
        if let Some(cid) = customer_id {
            user.stripe_customer_id = Some(cid.to_string());
        }
        if let Some(sid) = subscription_id {
            user.stripe_subscription_id = Some(sid.to_string());
        }
        Ok(())
    }

    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<()> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AccountError::UserNotFound(user_id.into()))?;
        user.plan = plan;
        Ok(())
    }

    async fn usage_get(&self, actor: &Actor) -> Result<u32> {
        if actor.id.is_empty() {
            return Ok(0);
        }
        let usage = self.usage.read().unwrap();
        Ok(usage.get(actor).copied().unwrap_or(0))
    }

    async fn usage_incr(&self, actor: &Actor, by: u32) -> Result<u32> {
        if actor.id.is_empty() {
            return Ok(0);
        }
        let mut usage = self.usage.write().unwrap();
        let used = usage.entry(actor.clone()).or_insert(0);
        *used += by;
        Ok(*used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_creates_then_refreshes() {
        let store = MemoryStore::new();

        let created = store
            .create_or_get_by_email("Doc@Example.com", "Doc", "pic1")
            .await
            .unwrap();
        assert_eq!(created.email, "doc@example.com");
        assert_eq!(created.plan, Plan::Free);

        // Blank incoming values preserve the stored ones.
        let again = store
            .create_or_get_by_email("doc@example.com", "", "")
            .await
            .unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(again.name, "Doc");
        assert_eq!(again.picture, "pic1");

        let refreshed = store
            .create_or_get_by_email("doc@example.com", "Dr Doc", "pic2")
            .await
            .unwrap();
        assert_eq!(refreshed.name, "Dr Doc");
        assert_eq!(refreshed.picture, "pic2");
    }

    #[tokio::test]
    async fn test_upsert_rejects_empty_email() {
        let store = MemoryStore::new();
        let err = store.create_or_get_by_email("  ", "x", "").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingEmail));
    }

    #[tokio::test]
    async fn test_upgrade_to_pro_coalesces_stripe_ids() {
        let store = MemoryStore::new();
        let user = store
            .create_or_get_by_email("a@b.c", "A", "")
            .await
            .unwrap();

        store
            .upgrade_to_pro(&user.id, Some("cus_1"), Some("sub_1"))
            .await
            .unwrap();
        // None leaves existing linkage in place.
        store.upgrade_to_pro(&user.id, None, None).await.unwrap();

        let user = store.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(user.plan, Plan::Pro);
        assert_eq!(user.stripe_customer_id.as_deref(), Some("cus_1"));
        assert_eq!(user.stripe_subscription_id.as_deref(), Some("sub_1"));
    }

    #[tokio::test]
    async fn test_lookup_by_customer() {
        let store = MemoryStore::new();
        let user = store
            .create_or_get_by_email("a@b.c", "A", "")
            .await
            .unwrap();
        store.set_stripe_customer(&user.id, "cus_42").await.unwrap();

        let found = store.get_user_by_customer("cus_42").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.get_user_by_customer("cus_other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_usage_counts_per_actor() {
        let store = MemoryStore::new();
        let guest = Actor::guest("g-1");
        let user = Actor::user("usr_1");

        assert_eq!(store.usage_incr(&guest, 1).await.unwrap(), 1);
        assert_eq!(store.usage_incr(&guest, 1).await.unwrap(), 2);
        assert_eq!(store.usage_incr(&user, 1).await.unwrap(), 1);
        assert_eq!(store.usage_get(&guest).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_actor_id_never_counted() {
        let store = MemoryStore::new();
        let anon = Actor::guest("");
        assert_eq!(store.usage_incr(&anon, 1).await.unwrap(), 0);
        assert_eq!(store.usage_get(&anon).await.unwrap(), 0);
    }
}
