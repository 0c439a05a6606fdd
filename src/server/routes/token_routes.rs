//! Token routes
//!
//! GET /api/tokens/:email, POST /api/tokens, DELETE /api/tokens

use super::ApiError;
use crate::commands::push::{
    self, RegisterTokenResponse, RemoveTokenResponse, TokenInput, TokenListResponse,
};
use crate::server::ServerAppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_tokens_handler(
    State(state): State<ServerAppState>,
    Path(email): Path<String>,
) -> Result<Json<TokenListResponse>, ApiError> {
    Ok(Json(push::list_tokens(&state.store, &email)?))
}

/// 201 for a new registration, 200 when the token was already known
pub async fn register_token_handler(
    State(state): State<ServerAppState>,
    input: Result<Json<TokenInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterTokenResponse>), ApiError> {
    let Json(input) = input?;
    let response = push::register_token(&state.store, &input)?;
    let status = if response.already_existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(response)))
}

pub async fn remove_token_handler(
    State(state): State<ServerAppState>,
    input: Result<Json<TokenInput>, JsonRejection>,
) -> Result<Json<RemoveTokenResponse>, ApiError> {
    let Json(input) = input?;
    Ok(Json(push::remove_token(&state.store, &input)?))
}
