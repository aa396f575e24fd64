//! Quota Enforcement
//!
//! Lifetime generation counters, enforced increment-then-check: the rejected
//! attempt is still counted, so `used` can exceed `limit` in storage. The
//! block payload clamps `used` for display.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::error::Result;
use crate::store::AccountStore;

/// A call-to-action button in the quota block payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaCta {
    pub label: String,
    pub action: String,
}

/// Primary/secondary CTA pair
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaCtas {
    pub primary: QuotaCta,
    pub secondary: QuotaCta,
}

/// Promo line shown to guests only
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaPromo {
    pub label: String,
}

/// Payload returned with HTTP 402 when the quota is exhausted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaBlock {
    pub error: String,
    pub used: u32,
    pub limit: u32,
    pub headline: String,
    pub copy: Vec<String>,
    pub cta: QuotaCtas,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<QuotaPromo>,
}

/// Build the quota block payload
pub fn quota_block(used: u32, limit: u32, is_logged_in: bool) -> QuotaBlock {
    let shown = used.min(limit);

    let secondary = if is_logged_in {
        QuotaCta {
            label: "Account".into(),
            action: "account".into(),
        }
    } else {
        QuotaCta {
            label: "Create account".into(),
            action: "signup".into(),
        }
    };

    QuotaBlock {
        error: "quota_exceeded".into(),
        used: shown,
        limit,
        headline: "Free limit reached".into(),
        copy: vec![
            format!("You\u{2019}ve used {shown}/{limit} free generations."),
            "Upgrade to Pro for unlimited access.".into(),
            "Pro includes higher limits, priority processing, and ongoing updates.".into(),
        ],
        cta: QuotaCtas {
            primary: QuotaCta {
                label: "Upgrade to Pro".into(),
                action: "upgrade".into(),
            },
            secondary,
        },
        promo: (!is_logged_in).then(|| QuotaPromo {
            label: "Create a free account to unlock 1 extra generation today.".into(),
        }),
    }
}

/// Outcome of quota enforcement
#[derive(Debug)]
pub enum QuotaDecision {
    /// Request may proceed
    Allowed { used: u32 },
    /// Request blocked; respond 402 with this payload
    Blocked(Box<QuotaBlock>),
}

/// Increment the actor's counter and check it against the limit.
///
/// Actors with an empty id (no guest cookie yet) are never counted or
/// blocked.
pub async fn enforce_quota(
    store: &dyn AccountStore,
    actor: &Actor,
    limit: u32,
    is_logged_in: bool,
) -> Result<QuotaDecision> {
    if actor.id.is_empty() {
        return Ok(QuotaDecision::Allowed { used: 0 });
    }

    let used = store.usage_incr(actor, 1).await?;
    if used > limit {
        Ok(QuotaDecision::Blocked(Box::new(quota_block(
            used,
            limit,
            is_logged_in,
        ))))
    } else {
        Ok(QuotaDecision::Allowed { used })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_guest_blocked_after_limit() {
        let store = MemoryStore::new();
        let actor = Actor::guest("g-1");

        for i in 1..=10 {
            match enforce_quota(&store, &actor, 10, false).await.unwrap() {
                QuotaDecision::Allowed { used } => assert_eq!(used, i),
                QuotaDecision::Blocked(_) => panic!("blocked at {i}"),
            }
        }

        // The 11th attempt is counted and blocked.
        match enforce_quota(&store, &actor, 10, false).await.unwrap() {
            QuotaDecision::Blocked(block) => {
                assert_eq!(block.used, 10); // clamped to limit
                assert_eq!(block.limit, 10);
                assert!(block.promo.is_some());
            }
            QuotaDecision::Allowed { .. } => panic!("should be blocked"),
        }
        assert_eq!(store.usage_get(&actor).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_empty_guest_id_never_blocked() {
        let store = MemoryStore::new();
        let actor = Actor::guest("");

        for _ in 0..50 {
            assert!(matches!(
                enforce_quota(&store, &actor, 10, false).await.unwrap(),
                QuotaDecision::Allowed { used: 0 }
            ));
        }
    }

    #[test]
    fn test_block_payload_shape() {
        let block = quota_block(13, 11, true);
        assert_eq!(block.error, "quota_exceeded");
        assert_eq!(block.used, 11);
        assert_eq!(block.copy.len(), 3);
        assert_eq!(block.cta.primary.action, "upgrade");
        assert_eq!(block.cta.secondary.action, "account");
        assert!(block.promo.is_none());

        let guest_block = quota_block(11, 10, false);
        assert_eq!(guest_block.cta.secondary.action, "signup");
        assert!(guest_block.promo.is_some());
    }
}
