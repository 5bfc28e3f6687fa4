//! Per-visitor engagement clients

use super::{EngagementActions, EngagementClient};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Visitors tracked before the least recently seen one is dropped
pub const DEFAULT_MAX_VISITORS: usize = 1024;

/// Longest accepted visitor id
pub const MAX_VISITOR_ID_LEN: usize = 128;

/// One engagement client per visitor.
///
/// Each browser talks to its own SDK instance, so login state and tags are
/// never visible to another visitor. The table is bounded; a visitor that
/// comes back after eviction starts logged out.
pub struct VisitorClients<C> {
    clients: Mutex<LruCache<String, Arc<EngagementActions<C>>>>,
}

impl<C: EngagementClient + Default> VisitorClients<C> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            clients: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Actions for `visitor_id`, creating a fresh client on first sight
    pub async fn for_visitor(&self, visitor_id: &str) -> Arc<EngagementActions<C>> {
        let mut clients = self.clients.lock().await;
        if !clients.contains(visitor_id) {
            debug!("New engagement visitor: {}", visitor_id);
        }

        clients
            .get_or_insert(visitor_id.to_string(), || {
                Arc::new(EngagementActions::new(C::default()))
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}

impl<C: EngagementClient + Default> Default for VisitorClients<C> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VISITORS)
    }
}

/// Trimmed visitor id, or `None` when blank or too long
pub fn normalize_visitor_id(raw: &str) -> Option<&str> {
    let id = raw.trim();
    (!id.is_empty() && id.len() <= MAX_VISITOR_ID_LEN).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::InMemoryEngagement;

    #[tokio::test]
    async fn test_visitors_are_isolated() {
        let visitors: VisitorClients<InMemoryEngagement> = VisitorClients::default();

        let ada = visitors.for_visitor("browser-a").await;
        ada.login("ada").await;
        ada.modify_tag("plan", "gold").await;

        let other = visitors.for_visitor("browser-b").await;
        assert_eq!(other.client().external_id().await, None);
        assert!(!other.logout().await.is_success());

        let again = visitors.for_visitor("browser-a").await;
        assert_eq!(again.client().external_id().await.as_deref(), Some("ada"));
        assert_eq!(visitors.len().await, 2);
    }

    #[tokio::test]
    async fn test_visitor_table_is_bounded() {
        let visitors: VisitorClients<InMemoryEngagement> = VisitorClients::new(2);

        visitors.for_visitor("a").await.login("ada").await;
        visitors.for_visitor("b").await;
        visitors.for_visitor("c").await;
        assert_eq!(visitors.len().await, 2);

        let returning = visitors.for_visitor("a").await;
        assert_eq!(returning.client().external_id().await, None);
    }

    #[test]
    fn test_normalize_visitor_id() {
        assert_eq!(normalize_visitor_id(" tab-1 "), Some("tab-1"));
        assert_eq!(normalize_visitor_id("   "), None);
        assert_eq!(normalize_visitor_id(&"x".repeat(MAX_VISITOR_ID_LEN + 1)), None);
    }
}
