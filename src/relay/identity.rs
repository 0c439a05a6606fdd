//! Mapping from tracking-server user ids to token-store emails
//!
//! The tracking server knows its own numeric user ids; the token store is
//! keyed by email. How the two relate is deployment-specific, so the lookup
//! sits behind a trait.

use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a tracking user id to a store key, if known
    async fn resolve_user(&self, tracking_user_id: &str) -> Option<String>;
}

/// Resolver that never finds anyone. Events are accepted and dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnresolvedIdentity;

#[async_trait]
impl IdentityResolver for UnresolvedIdentity {
    async fn resolve_user(&self, _tracking_user_id: &str) -> Option<String> {
        None
    }
}

/// Resolver backed by a fixed table, usually the `[identities]` config section
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    identities: HashMap<String, String>,
}

impl StaticIdentityResolver {
    pub fn new(identities: HashMap<String, String>) -> Self {
        Self { identities }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve_user(&self, tracking_user_id: &str) -> Option<String> {
        self.identities.get(tracking_user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unresolved_never_resolves() {
        assert_eq!(UnresolvedIdentity.resolve_user("1").await, None);
    }

    #[tokio::test]
    async fn test_static_lookup() {
        let resolver = StaticIdentityResolver::new(HashMap::from([(
            "u1".to_string(),
            "a@b.com".to_string(),
        )]));
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve_user("u1").await, Some("a@b.com".to_string()));
        assert_eq!(resolver.resolve_user("u2").await, None);
    }
}
