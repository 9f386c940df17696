//! Core cache types and structures

use crate::keys::CacheKey;
use crate::store::BackingStore;
use std::sync::Arc;

use super::node::CacheNode;
use super::stats::CacheStats;

/// Store type the security cache keeps its nodes in
pub type SecurityCacheStore = dyn BackingStore<CacheKey, Arc<CacheNode>>;

/// Hierarchical cache of security rule and access entries
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct SecurityCache {
    pub(crate) inner: Arc<CacheInner>,
}

pub(crate) struct CacheInner {
    /// Flat storage of every node
    pub store: Arc<SecurityCacheStore>,
    /// Statistics
    pub stats: CacheStats,
}

impl std::fmt::Debug for SecurityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityCache")
            .field("entry_count", &self.inner.store.len())
            .finish()
    }
}
