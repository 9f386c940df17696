//! Core eviction policy trait definition

/// Eviction policy trait
pub trait EvictionPolicy<K>: Send + Sync {
    /// Record access to a key
    fn on_access(&self, key: &K);

    /// Record insertion of a key
    fn on_insert(&self, key: &K);

    /// Record removal of a key
    fn on_remove(&self, key: &K);

    /// Get next key to evict
    fn next_eviction(&self) -> Option<K>;
}
