//! Cache construction

use crate::bridge::EvictionBridge;
use crate::config::SecurityCacheConfig;
use crate::errors::Result;
use crate::store::BoundedStore;
use std::sync::Arc;

use super::stats::CacheStats;
use super::types::{CacheInner, SecurityCache, SecurityCacheStore};

impl SecurityCache {
    /// Create a cache over a [`BoundedStore`] sized by `config`
    pub fn new(config: &SecurityCacheConfig) -> Result<Self> {
        config.validate()?;

        let mut store = BoundedStore::new(config.capacity, config.eviction_policy);
        if let Some(ttl) = config.time_to_live() {
            store = store.with_time_to_live(ttl);
        }

        tracing::debug!(
            capacity = config.capacity,
            policy = %config.eviction_policy,
            ttl_secs = ?config.time_to_live_secs,
            "Created security cache"
        );
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Create a cache over any backing store
    ///
    /// The cache subscribes to the store so that entries the store drops on
    /// its own take their dependents with them.
    pub fn with_store(store: Arc<SecurityCacheStore>) -> Self {
        let inner = Arc::new(CacheInner {
            store: Arc::clone(&store),
            stats: CacheStats::default(),
        });
        store.subscribe(Arc::new(EvictionBridge::new(Arc::downgrade(&inner))));
        Self { inner }
    }
}

impl Default for SecurityCache {
    fn default() -> Self {
        let config = SecurityCacheConfig::default();
        Self::with_store(Arc::new(BoundedStore::new(
            config.capacity,
            config.eviction_policy,
        )))
    }
}
