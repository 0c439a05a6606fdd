//! Server application state shared across handlers

use crate::push::{NotificationDispatcher, PushTransport, TokenStore};
use crate::relay::{EventRelay, IdentityResolver};
use crate::shutdown::ShutdownState;
use std::sync::Arc;

/// Shared state for the server: the token store, the dispatcher and the
/// relay built on top of both.
#[derive(Clone)]
pub struct ServerAppState {
    /// Email -> push token registry
    pub store: Arc<TokenStore>,

    /// Sends notifications through the push provider
    pub dispatcher: NotificationDispatcher,

    /// Turns tracking webhooks into notifications
    pub relay: Arc<EventRelay>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    /// Wire the store, transport and identity resolver together
    pub fn new(
        store: TokenStore,
        transport: Arc<dyn PushTransport>,
        resolver: Arc<dyn IdentityResolver>,
        shutdown_state: ShutdownState,
    ) -> Self {
        let store = Arc::new(store);
        let dispatcher = NotificationDispatcher::new(transport);
        let relay = Arc::new(EventRelay::new(
            store.clone(),
            dispatcher.clone(),
            resolver,
        ));

        Self {
            store,
            dispatcher,
            relay,
            shutdown_state,
        }
    }
}
