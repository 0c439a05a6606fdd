//! Push notification dispatcher
//!
//! Sends one notification to a batch of tokens through the injected
//! transport and classifies what came back. It never touches the token
//! store; callers decide what to prune.

use super::transport::PushTransport;
use super::types::{DispatchResult, ErrorKind, NotificationPayload, TokenResult};
use crate::error::{RelayError, RelayResult};
use std::sync::Arc;

/// Push notification sender
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn PushTransport>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self { transport }
    }

    /// Send `payload` to every token in one transport call.
    ///
    /// Input is checked before the transport is touched. No retries.
    pub async fn send(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> RelayResult<DispatchResult> {
        if tokens.is_empty() {
            return Err(RelayError::validation("At least one token is required"));
        }
        payload.validate()?;

        let response = self.transport.send_multicast(tokens, payload).await?;

        if response.responses.len() != tokens.len() {
            return Err(RelayError::Transport(format!(
                "Provider answered for {} of {} tokens",
                response.responses.len(),
                tokens.len()
            )));
        }

        let per_token: Vec<TokenResult> = tokens
            .iter()
            .zip(response.responses)
            .map(|(token, outcome)| {
                let error_kind = if outcome.success {
                    None
                } else {
                    let kind = ErrorKind::from_code(outcome.error_code.as_deref());
                    if kind == ErrorKind::Transient {
                        log::warn!(
                            "Transient push failure for token {}: {}",
                            abbreviate(token),
                            outcome.error_code.as_deref().unwrap_or("no error code")
                        );
                    }
                    Some(kind)
                };
                TokenResult {
                    token: token.clone(),
                    success: outcome.success,
                    error_kind,
                }
            })
            .collect();

        let result = DispatchResult {
            success_count: response.success_count,
            failure_count: response.failure_count,
            per_token,
        };

        log::info!(
            "Push notification result: {} sent, {} failed",
            result.success_count,
            result.failure_count
        );

        Ok(result)
    }
}

/// Shorten a token for log output
pub(crate) fn abbreviate(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}…", prefix)
}
