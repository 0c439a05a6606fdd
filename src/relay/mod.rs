//! Tracking event relay
//!
//! Turns one inbound tracking webhook into at most one push dispatch plus
//! cleanup of tokens the provider rejected. Every outcome is terminal; there
//! is no queue and no retry. The tracking server is always told the event was
//! accepted so it never backs off because of notification trouble.

pub mod events;
pub mod identity;

pub use events::{build_payload, TrackedDevice, TrackingEvent, TrackingId, TrackingWebhook};
pub use identity::{IdentityResolver, StaticIdentityResolver, UnresolvedIdentity};

use crate::push::{NotificationDispatcher, TokenStore};
use serde::Serialize;
use std::sync::Arc;

/// Why an event was accepted without sending anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoOpReason {
    /// Body was not a webhook with both `event` and `device`
    Malformed,
    /// Device carried no user id
    NoUserId,
    /// Identity resolver did not know the user
    UnknownUser,
    /// User has no registered tokens
    NoTokens,
    /// Transport or payload failure during the send
    DispatchFailed,
}

/// Terminal state of one relayed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RelayOutcome {
    AcceptedNoOp {
        reason: NoOpReason,
    },
    #[serde(rename_all = "camelCase")]
    Dispatched {
        success_count: usize,
        failure_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Cleaned {
        success_count: usize,
        failure_count: usize,
        pruned: usize,
    },
}

impl RelayOutcome {
    fn no_op(reason: NoOpReason) -> Self {
        RelayOutcome::AcceptedNoOp { reason }
    }
}

pub struct EventRelay {
    store: Arc<TokenStore>,
    dispatcher: NotificationDispatcher,
    resolver: Arc<dyn IdentityResolver>,
}

impl EventRelay {
    pub fn new(
        store: Arc<TokenStore>,
        dispatcher: NotificationDispatcher,
        resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            resolver,
        }
    }

    /// Handle a raw webhook body
    pub async fn handle_raw(&self, body: &[u8]) -> RelayOutcome {
        match TrackingWebhook::parse(body) {
            Some(webhook) => self.handle(webhook).await,
            None => {
                log::debug!("Ignoring unparseable tracking webhook ({} bytes)", body.len());
                RelayOutcome::no_op(NoOpReason::Malformed)
            }
        }
    }

    /// Handle a parsed webhook
    pub async fn handle(&self, webhook: TrackingWebhook) -> RelayOutcome {
        let (Some(event), Some(device)) = (webhook.event, webhook.device) else {
            log::debug!("Tracking webhook without event or device, ignoring");
            return RelayOutcome::no_op(NoOpReason::Malformed);
        };

        let Some(tracking_user) = device.user_id.as_ref().map(|id| id.to_string()) else {
            log::debug!("Tracking event {} has no user id, ignoring", event.event_type);
            return RelayOutcome::no_op(NoOpReason::NoUserId);
        };

        let Some(user) = self.resolver.resolve_user(&tracking_user).await else {
            log::debug!("No user mapped to tracking user {}", tracking_user);
            return RelayOutcome::no_op(NoOpReason::UnknownUser);
        };

        let tokens = self.store.list_tokens(&user);
        if tokens.is_empty() {
            log::debug!("{} has no push tokens, skipping {}", user, event.event_type);
            return RelayOutcome::no_op(NoOpReason::NoTokens);
        }

        let payload = build_payload(&event, &device);
        let result = match self.dispatcher.send(&tokens, &payload).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Failed to relay {} for {}: {}", event.event_type, user, e);
                return RelayOutcome::no_op(NoOpReason::DispatchFailed);
            }
        };

        log::info!(
            "Relayed {} to {}: {} sent, {} failed",
            event.event_type,
            user,
            result.success_count,
            result.failure_count
        );

        if result.failure_count > 0 {
            let invalid = result.invalid_tokens();
            if !invalid.is_empty() {
                let pruned = self.store.prune_tokens(&user, &invalid);
                return RelayOutcome::Cleaned {
                    success_count: result.success_count,
                    failure_count: result.failure_count,
                    pruned,
                };
            }
        }

        RelayOutcome::Dispatched {
            success_count: result.success_count,
            failure_count: result.failure_count,
        }
    }
}
