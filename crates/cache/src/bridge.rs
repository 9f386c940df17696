//! Bridge between backing store events and the cache hierarchy
//!
//! A backing store only knows flat keys. When it drops or overwrites an
//! entry on its own, the bridge disposes the matching node so that every
//! entry depending on it is dropped as well.

use crate::core::{CacheInner, CacheNode};
use crate::keys::CacheKey;
use crate::store::{StoreEvent, StoreListener};
use std::sync::{Arc, Weak};

/// Store listener cascading store-side removals through the cache
pub struct EvictionBridge {
    inner: Weak<CacheInner>,
}

impl EvictionBridge {
    pub(crate) fn new(inner: Weak<CacheInner>) -> Self {
        Self { inner }
    }
}

impl StoreListener<CacheKey, Arc<CacheNode>> for EvictionBridge {
    fn on_event(&self, event: &StoreEvent<CacheKey, Arc<CacheNode>>) {
        // Cache already dropped
        let Some(inner) = self.inner.upgrade() else {
            return;
        };

        match event {
            StoreEvent::Added { .. } => {}
            StoreEvent::Evicted { key, value, cause } => {
                tracing::debug!(key = %key, cause = ?cause, "Backing store evicted entry");
                inner.stats.record_eviction();
                inner.dispose(Arc::clone(value));
            }
            StoreEvent::Modified { key, previous } => {
                tracing::debug!(key = %key, "Backing store overwrote entry");
                inner.dispose(Arc::clone(previous));
            }
            StoreEvent::Removed { value, .. } => {
                inner.dispose(Arc::clone(value));
            }
        }
    }
}

impl std::fmt::Debug for EvictionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvictionBridge")
            .field("attached", &(self.inner.strong_count() > 0))
            .finish()
    }
}
