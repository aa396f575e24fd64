//! Stripe Webhook Handling
//!
//! Plan changes are webhook-driven and keyed on the Stripe customer id:
//! `checkout.session.completed` upgrades, terminal subscription statuses
//! downgrade, everything else is logged and ignored.

use stripe::{Event, EventObject, EventType, Webhook};

use scribe_accounts::{AccountStore, Plan};

use crate::error::{BillingError, Result};

/// Subscription statuses that downgrade the user back to free
const TERMINAL_STATUSES: [&str; 3] = ["canceled", "unpaid", "incomplete_expired"];

/// A webhook event reduced to the billing actions we take
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BillingEvent {
    /// Checkout completed; upgrade the user owning this customer id
    UpgradeCompleted {
        customer_id: String,
        subscription_id: Option<String>,
    },

    /// Subscription changed state; downgrade if the status is terminal
    SubscriptionChanged {
        customer_id: String,
        status: String,
    },

    /// Unhandled event type
    Ignored { event_type: String },
}

/// Verify the webhook signature and parse the event
pub fn verify_event(payload: &str, signature: &str, secret: &str) -> Result<Event> {
    Webhook::construct_event(payload, signature, secret)
        .map_err(|e| BillingError::WebhookSignature(e.to_string()))
}

/// Reduce a Stripe event to a `BillingEvent`
pub fn classify_event(event: &Event) -> BillingEvent {
    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = &event.data.object {
                if let Some(customer) = &session.customer {
                    return BillingEvent::UpgradeCompleted {
                        customer_id: customer.id().to_string(),
                        subscription_id: session
                            .subscription
                            .as_ref()
                            .map(|s| s.id().to_string()),
                    };
                }
            }
            BillingEvent::Ignored {
                event_type: format!("{:?}", event.type_),
            }
        }

        EventType::CustomerSubscriptionUpdated | EventType::CustomerSubscriptionDeleted => {
            if let EventObject::Subscription(sub) = &event.data.object {
                return BillingEvent::SubscriptionChanged {
                    customer_id: sub.customer.id().to_string(),
                    status: sub.status.to_string(),
                };
            }
            BillingEvent::Ignored {
                event_type: format!("{:?}", event.type_),
            }
        }

        _ => BillingEvent::Ignored {
            event_type: format!("{:?}", event.type_),
        },
    }
}

/// Apply a billing event against the account store
pub async fn apply_event(event: BillingEvent, store: &dyn AccountStore) -> Result<()> {
    match event {
        BillingEvent::UpgradeCompleted {
            customer_id,
            subscription_id,
        } => {
            let Some(user) = store.get_user_by_customer(&customer_id).await? else {
                tracing::warn!(%customer_id, "checkout completed for unknown customer");
                return Ok(());
            };

            store
                .upgrade_to_pro(&user.id, Some(&customer_id), subscription_id.as_deref())
                .await?;
            tracing::info!(user_id = %user.id, %customer_id, "Upgraded user to pro");
        }

        BillingEvent::SubscriptionChanged {
            customer_id,
            status,
        } => {
            if !TERMINAL_STATUSES.contains(&status.as_str()) {
                tracing::debug!(%customer_id, %status, "subscription change ignored");
                return Ok(());
            }

            let Some(user) = store.get_user_by_customer(&customer_id).await? else {
                tracing::warn!(%customer_id, "subscription ended for unknown customer");
                return Ok(());
            };

            store.set_plan(&user.id, Plan::Free).await?;
            tracing::info!(user_id = %user.id, %status, "Downgraded user to free");
        }

        BillingEvent::Ignored { event_type } => {
            tracing::debug!(%event_type, "Unhandled webhook event");
        }
    }

    Ok(())
}
