//! Types for push notifications

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::{RelayError, RelayResult};

/// Tokens at or below this length are rejected at the boundary
pub const MIN_TOKEN_LEN_EXCLUSIVE: usize = 10;

/// Provider code for a token that was never a valid registration token
pub const CODE_INVALID_REGISTRATION_TOKEN: &str = "messaging/invalid-registration-token";
/// Provider code for a token the provider no longer knows about
pub const CODE_TOKEN_NOT_REGISTERED: &str = "messaging/registration-token-not-registered";

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Check that an email has the basic `local@domain.tld` shape.
///
/// No normalization is applied: the string is used verbatim as the store key.
pub fn validate_email(email: &str) -> RelayResult<()> {
    if email_pattern().is_match(email) {
        Ok(())
    } else {
        Err(RelayError::validation(format!("Invalid email: {:?}", email)))
    }
}

/// Check that a push token is long enough to plausibly be a provider token
pub fn validate_token(token: &str) -> RelayResult<()> {
    if token.chars().count() > MIN_TOKEN_LEN_EXCLUSIVE {
        Ok(())
    } else {
        Err(RelayError::validation(format!(
            "Invalid token: must be longer than {} characters",
            MIN_TOKEN_LEN_EXCLUSIVE
        )))
    }
}

/// Payload for a push notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Notification title
    pub title: String,
    /// Notification body text
    pub body: String,
}

impl NotificationPayload {
    /// Create a new notification payload
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Both fields must be non-empty before anything is sent
    pub fn validate(&self) -> RelayResult<()> {
        if self.title.is_empty() {
            return Err(RelayError::validation("Notification title is required"));
        }
        if self.body.is_empty() {
            return Err(RelayError::validation("Notification body is required"));
        }
        Ok(())
    }
}

/// Classification of a per-token delivery failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The provider will never accept this token again
    InvalidToken,
    /// Quota, network or server trouble; the token may work later
    Transient,
}

impl ErrorKind {
    /// Map a provider error code onto a failure class
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(CODE_INVALID_REGISTRATION_TOKEN) | Some(CODE_TOKEN_NOT_REGISTERED) => {
                ErrorKind::InvalidToken
            }
            _ => ErrorKind::Transient,
        }
    }
}

/// Outcome for a single token in a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResult {
    pub token: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

/// Result of sending one notification to a batch of tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// Number of tokens the provider accepted
    pub success_count: usize,
    /// Number of tokens the provider rejected
    pub failure_count: usize,
    /// Per-token outcomes, in request order
    pub per_token: Vec<TokenResult>,
}

impl DispatchResult {
    /// Tokens that should be dropped from the store
    pub fn invalid_tokens(&self) -> HashSet<String> {
        self.per_token
            .iter()
            .filter(|r| !r.success && r.error_kind == Some(ErrorKind::InvalidToken))
            .map(|r| r.token.clone())
            .collect()
    }
}

/// Raw per-token answer from the push provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    pub success: bool,
    pub error_code: Option<String>,
}

impl SendResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_code: None,
        }
    }

    pub fn failed(code: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: Some(code.into()),
        }
    }
}

/// Raw answer from a multicast send, one response per requested token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MulticastResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl MulticastResponse {
    /// Build a response from per-token answers, deriving the counts
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();
        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}
