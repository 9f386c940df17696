//! Backing store and listener traits

use std::sync::Arc;

/// Why a store dropped an entry on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionCause {
    Capacity,
    Expired,
}

/// Change notification emitted by a backing store
#[derive(Debug, Clone)]
pub enum StoreEvent<K, V> {
    Added { key: K },
    /// The value at `key` was overwritten; `previous` is the old value
    Modified { key: K, previous: V },
    /// Explicit removal through the store API
    Removed { key: K, value: V },
    /// Removal decided by the store itself
    Evicted {
        key: K,
        value: V,
        cause: EvictionCause,
    },
}

/// Subscriber to store events
///
/// Events are delivered after the store released its internal locks, so a
/// listener may call back into the store.
pub trait StoreListener<K, V>: Send + Sync {
    fn on_event(&self, event: &StoreEvent<K, V>);
}

/// Flat, possibly self-evicting key/value store
pub trait BackingStore<K, V>: Send + Sync {
    /// Look a value up, recording the access for the eviction policy
    fn get(&self, key: &K) -> Option<V>;

    /// Look a value up without touching eviction bookkeeping
    ///
    /// Entries whose time-to-live elapsed are still returned until the store
    /// drops them.
    fn peek(&self, key: &K) -> Option<V>;

    /// Insert unless the key is occupied; returns the occupying value otherwise
    fn insert_if_absent(&self, key: K, value: V) -> Result<(), V>;

    /// Insert or overwrite, returning the previous value
    fn insert(&self, key: K, value: V) -> Option<V>;

    fn remove(&self, key: &K) -> Option<V>;

    /// Remove the value at `key` only if `predicate` holds for it
    fn remove_if(&self, key: &K, predicate: &dyn Fn(&V) -> bool) -> Option<V>;

    /// Remove and return every entry without emitting events
    fn drain(&self) -> Vec<(K, V)>;

    fn len(&self) -> usize;

    /// Drop entries whose time-to-live elapsed, returning how many were dropped
    fn purge_expired(&self) -> usize {
        0
    }

    /// Whether entries can expire on their own
    fn expires_entries(&self) -> bool {
        false
    }

    /// Drop the entry at `key` if its time-to-live elapsed
    fn expire(&self, _key: &K) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn subscribe(&self, listener: Arc<dyn StoreListener<K, V>>);
}
