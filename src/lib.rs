// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::unnecessary_map_or)] // map_or can be clearer than alternatives

// Module declarations
pub mod commands;
pub mod config;
pub mod error;
pub mod file_storage;
pub mod push;
pub mod relay;
pub mod shutdown;

// Server module (HTTP API and tracking webhook)
pub mod server;

pub use error::{RelayError, RelayResult};

use std::sync::Arc;

/// Pick the identity resolver for a configuration.
///
/// Without an `[identities]` table no tracking user can be resolved and every
/// tracking event is acknowledged without a notification.
pub fn identity_resolver_for(config: &config::RelayConfig) -> Arc<dyn relay::IdentityResolver> {
    if config.identities.is_empty() {
        log::warn!("No identities configured; tracking events will not be relayed");
        Arc::new(relay::UnresolvedIdentity)
    } else {
        log::info!("Loaded {} tracking identities", config.identities.len());
        Arc::new(relay::StaticIdentityResolver::new(
            config.identities.clone(),
        ))
    }
}
