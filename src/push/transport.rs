//! Push transport abstraction
//!
//! The dispatcher talks to the push provider only through this trait so the
//! provider client can be built once at startup and handed in explicitly.

use super::types::{MulticastResponse, NotificationPayload};
use crate::error::RelayResult;
use async_trait::async_trait;

#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Send one notification to every token in the batch.
    ///
    /// Per-token failures belong in the response. An `Err` means the call as
    /// a whole failed and nothing can be said about individual tokens.
    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &NotificationPayload,
    ) -> RelayResult<MulticastResponse>;
}
