//! Tracking webhook route
//!
//! The body is read raw so that malformed payloads are acknowledged like any
//! other event instead of being rejected by the JSON extractor.

use crate::relay::RelayOutcome;
use crate::server::ServerAppState;
use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub accepted: bool,
    pub outcome: RelayOutcome,
}

pub async fn tracking_webhook_handler(
    State(state): State<ServerAppState>,
    body: Bytes,
) -> Json<WebhookAck> {
    let outcome = state.relay.handle_raw(&body).await;
    Json(WebhookAck {
        accepted: true,
        outcome,
    })
}
