//! Removal operations

use crate::core::node::CacheNode;
use crate::core::types::{CacheInner, SecurityCache};
use crate::keys::CacheKey;
use std::sync::Arc;
use warden_core::SecurityReference;

impl CacheInner {
    /// Drop `node` and everything depending on it
    ///
    /// Idempotent; returns how many nodes this call disposed.
    pub(crate) fn dispose(&self, node: Arc<CacheNode>) -> usize {
        let root = node.key().clone();
        let mut pending = vec![node];
        let mut disposed = 0usize;

        while let Some(node) = pending.pop() {
            let Some(children) = node.mark_disposed() else {
                continue;
            };
            // A newer node may already occupy the key
            self.store
                .remove_if(node.key(), &|current: &Arc<CacheNode>| {
                    Arc::ptr_eq(current, &node)
                });
            node.detach_from_parents();
            pending.extend(children);
            disposed += 1;
        }

        if disposed > 0 {
            self.stats.record_removals(disposed as u64);
            tracing::debug!(key = %root, disposed, "Dropped entry and dependents");
        }
        disposed
    }
}

impl SecurityCache {
    /// Remove the rule entry of `reference` and everything depending on it
    ///
    /// Returns the number of entries dropped.
    pub fn remove(&self, reference: &SecurityReference) -> usize {
        let key = CacheKey::rules(reference);
        // Peek sees expired entries too, whose dependents may still be live
        match self.inner.store.peek(&key) {
            Some(node) => self.inner.dispose(node),
            None => 0,
        }
    }

    /// Drop every cached entry
    ///
    /// Insertions racing with the clear either fail or are cascaded away
    /// with the parent they attached to.
    pub fn clear(&self) -> usize {
        let drained = self.inner.store.drain();
        let disposed = drained
            .into_iter()
            .map(|(_, node)| self.inner.dispose(node))
            .sum();
        tracing::debug!(disposed, "Cleared security cache");
        disposed
    }

    /// Drop entries whose time-to-live elapsed, dependents included
    pub fn purge_expired(&self) -> usize {
        self.inner.store.purge_expired()
    }
}
