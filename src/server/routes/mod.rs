//! HTTP route handlers
//!
//! Organized by domain:
//! - token_routes: token registration, listing and removal
//! - notification_routes: direct sends and the diagnostic echo
//! - webhook_routes: tracking-server webhooks

pub mod notification_routes;
pub mod token_routes;
pub mod webhook_routes;

use crate::error::RelayError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error body returned by every `/api` route
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// Error type for route handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let status = match &err {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::NoTokens(_) => StatusCode::NOT_FOUND,
            RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
            RelayError::StorageRead(_)
            | RelayError::StorageWrite(_)
            | RelayError::Credentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !err.is_client_error() {
            log::error!("Request failed: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(RelayError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(RelayError::NoTokens("a@b.com".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RelayError::Transport("down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(RelayError::StorageWrite("disk".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
