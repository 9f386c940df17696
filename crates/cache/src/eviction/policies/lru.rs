//! LRU (Least Recently Used) eviction policy implementation

use crate::eviction::traits::EvictionPolicy;
use lru::LruCache;
use parking_lot::Mutex;
use std::hash::Hash;

/// LRU (Least Recently Used) eviction policy
pub struct LruPolicy<K: Hash + Eq> {
    /// Access order tracking, least recently used first
    order: Mutex<LruCache<K, ()>>,
}

impl<K: Hash + Eq> LruPolicy<K> {
    pub fn new() -> Self {
        Self {
            order: Mutex::new(LruCache::unbounded()),
        }
    }
}

impl<K: Hash + Eq> Default for LruPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionPolicy<K> for LruPolicy<K>
where
    K: Hash + Eq + Clone + Send + Sync,
{
    fn on_access(&self, key: &K) {
        // Promotion is best effort; skip if contended
        if let Some(mut order) = self.order.try_lock() {
            order.promote(key);
        }
    }

    fn on_insert(&self, key: &K) {
        self.order.lock().put(key.clone(), ());
    }

    fn on_remove(&self, key: &K) {
        self.order.lock().pop(key);
    }

    fn next_eviction(&self) -> Option<K> {
        self.order.lock().peek_lru().map(|(key, _)| key.clone())
    }
}
