//! Notification routes
//!
//! POST /api/notifications sends directly to a user or a single token.
//! POST /api/echo answers with what it received, for connectivity checks.

use super::ApiError;
use crate::commands::push::{self, EchoInput, EchoResponse, SendDirectInput};
use crate::push::DispatchResult;
use crate::server::ServerAppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

pub async fn send_notification_handler(
    State(state): State<ServerAppState>,
    input: Result<Json<SendDirectInput>, JsonRejection>,
) -> Result<Json<DispatchResult>, ApiError> {
    let Json(input) = input?;
    let result = push::send_direct(&state.store, &state.dispatcher, input).await?;
    Ok(Json(result))
}

pub async fn echo_handler(body: Bytes) -> (StatusCode, Json<EchoResponse>) {
    let input: EchoInput = serde_json::from_slice(&body).unwrap_or_default();
    match push::echo(input) {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(response) => (StatusCode::BAD_REQUEST, Json(response)),
    }
}
