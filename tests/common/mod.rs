// Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use push_relay_lib::push::{MulticastResponse, NotificationPayload, PushTransport, SendResponse};
use push_relay_lib::{RelayError, RelayResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Records every send and answers per token from a lookup table.
/// Tokens not in the table succeed.
#[derive(Default)]
pub struct FakeTransport {
    failures: HashMap<String, String>,
    down: bool,
    pub sent: Mutex<Vec<(Vec<String>, NotificationPayload)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `token` fail with the given provider error code
    pub fn failing(mut self, token: &str, code: &str) -> Self {
        self.failures.insert(token.to_string(), code.to_string());
        self
    }

    /// Make every call fail outright
    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Vec<String>, NotificationPayload)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for FakeTransport {
    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &NotificationPayload,
    ) -> RelayResult<MulticastResponse> {
        if self.down {
            return Err(RelayError::Transport("provider unreachable".to_string()));
        }

        self.sent
            .lock()
            .unwrap()
            .push((tokens.to_vec(), notification.clone()));

        let responses = tokens
            .iter()
            .map(|t| match self.failures.get(t) {
                Some(code) => SendResponse::failed(code.clone()),
                None => SendResponse::ok(),
            })
            .collect();
        Ok(MulticastResponse::from_responses(responses))
    }
}
