//! Capacity and time bounded in-memory store

use crate::eviction::{create_eviction_policy, EvictionPolicy, EvictionPolicyKind};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::traits::{BackingStore, EvictionCause, StoreEvent, StoreListener};

struct Slot<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> Slot<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }
}

/// In-memory store holding at most `capacity` entries
///
/// Policy bookkeeping is updated while the shard holding the key is locked,
/// so every stored key is tracked by the policy.
pub struct BoundedStore<K, V>
where
    K: Hash + Eq,
{
    entries: DashMap<K, Slot<V>>,
    policy: Box<dyn EvictionPolicy<K>>,
    capacity: usize,
    time_to_live: Option<Duration>,
    listeners: RwLock<Vec<Arc<dyn StoreListener<K, V>>>>,
}

impl<K, V> BoundedStore<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(capacity: usize, policy: EvictionPolicyKind) -> Self {
        Self {
            entries: DashMap::new(),
            policy: create_eviction_policy(policy),
            capacity,
            time_to_live: None,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Drop entries older than `ttl`
    #[must_use]
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    fn is_expired(&self, slot: &Slot<V>) -> bool {
        self.time_to_live
            .is_some_and(|ttl| slot.inserted_at.elapsed() >= ttl)
    }

    fn evict_if_expired(&self, key: K, events: &mut Vec<StoreEvent<K, V>>) {
        if let Entry::Occupied(occupied) = self.entries.entry(key) {
            if self.is_expired(occupied.get()) {
                self.policy.on_remove(occupied.key());
                let (key, slot) = occupied.remove_entry();
                events.push(StoreEvent::Evicted {
                    key,
                    value: slot.value,
                    cause: EvictionCause::Expired,
                });
            }
        }
    }

    /// Evict policy victims until the store fits its capacity again
    ///
    /// Must not be called while holding an entry guard.
    fn enforce_capacity(&self, events: &mut Vec<StoreEvent<K, V>>) {
        while self.entries.len() > self.capacity {
            let Some(victim) = self.policy.next_eviction() else {
                break;
            };
            match self.entries.entry(victim) {
                Entry::Occupied(occupied) => {
                    self.policy.on_remove(occupied.key());
                    let (key, slot) = occupied.remove_entry();
                    events.push(StoreEvent::Evicted {
                        key,
                        value: slot.value,
                        cause: EvictionCause::Capacity,
                    });
                }
                // Stale policy entry
                Entry::Vacant(vacant) => self.policy.on_remove(vacant.key()),
            }
        }
    }

    fn dispatch(&self, events: Vec<StoreEvent<K, V>>) {
        if events.is_empty() {
            return;
        }
        let listeners = self.listeners.read().clone();
        for event in &events {
            for listener in &listeners {
                listener.on_event(event);
            }
        }
    }
}

impl<K, V> BackingStore<K, V> for BoundedStore<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        {
            let slot = self.entries.get(key)?;
            if !self.is_expired(&slot) {
                self.policy.on_access(key);
                return Some(slot.value.clone());
            }
        }

        let mut events = Vec::new();
        self.evict_if_expired(key.clone(), &mut events);
        self.dispatch(events);
        None
    }

    fn peek(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|slot| slot.value.clone())
    }

    fn insert_if_absent(&self, key: K, value: V) -> Result<(), V> {
        let mut events = Vec::new();
        let outcome = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if self.is_expired(occupied.get()) {
                    let previous = std::mem::replace(occupied.get_mut(), Slot::new(value));
                    self.policy.on_remove(occupied.key());
                    self.policy.on_insert(occupied.key());
                    events.push(StoreEvent::Evicted {
                        key: occupied.key().clone(),
                        value: previous.value,
                        cause: EvictionCause::Expired,
                    });
                    events.push(StoreEvent::Added {
                        key: occupied.key().clone(),
                    });
                    Ok(())
                } else {
                    Err(occupied.get().value.clone())
                }
            }
            Entry::Vacant(vacant) => {
                self.policy.on_insert(vacant.key());
                events.push(StoreEvent::Added {
                    key: vacant.key().clone(),
                });
                vacant.insert(Slot::new(value));
                Ok(())
            }
        };

        if outcome.is_ok() {
            self.enforce_capacity(&mut events);
        }
        self.dispatch(events);
        outcome
    }

    fn insert(&self, key: K, value: V) -> Option<V> {
        let mut events = Vec::new();
        let previous = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let previous = std::mem::replace(occupied.get_mut(), Slot::new(value));
                self.policy.on_access(occupied.key());
                events.push(StoreEvent::Modified {
                    key: occupied.key().clone(),
                    previous: previous.value.clone(),
                });
                Some(previous.value)
            }
            Entry::Vacant(vacant) => {
                self.policy.on_insert(vacant.key());
                events.push(StoreEvent::Added {
                    key: vacant.key().clone(),
                });
                vacant.insert(Slot::new(value));
                None
            }
        };

        self.enforce_capacity(&mut events);
        self.dispatch(events);
        previous
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.remove_if(key, &|_| true)
    }

    fn remove_if(&self, key: &K, predicate: &dyn Fn(&V) -> bool) -> Option<V> {
        let removed = match self.entries.entry(key.clone()) {
            Entry::Occupied(occupied) if predicate(&occupied.get().value) => {
                self.policy.on_remove(occupied.key());
                Some(occupied.remove_entry())
            }
            _ => None,
        };

        let (key, slot) = removed?;
        let value = slot.value;
        self.dispatch(vec![StoreEvent::Removed {
            key,
            value: value.clone(),
        }]);
        Some(value)
    }

    fn drain(&self) -> Vec<(K, V)> {
        let keys: Vec<K> = self.entries.iter().map(|r| r.key().clone()).collect();
        let mut drained = Vec::with_capacity(keys.len());
        for key in keys {
            if let Entry::Occupied(occupied) = self.entries.entry(key) {
                self.policy.on_remove(occupied.key());
                let (key, slot) = occupied.remove_entry();
                drained.push((key, slot.value));
            }
        }
        drained
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&self) -> usize {
        if self.time_to_live.is_none() {
            return 0;
        }

        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|r| self.is_expired(r.value()))
            .map(|r| r.key().clone())
            .collect();

        let mut events = Vec::new();
        for key in expired {
            self.evict_if_expired(key, &mut events);
        }

        let purged = events.len();
        self.dispatch(events);
        purged
    }

    fn expires_entries(&self) -> bool {
        self.time_to_live.is_some()
    }

    fn expire(&self, key: &K) -> bool {
        if self.time_to_live.is_none() {
            return false;
        }
        let mut events = Vec::new();
        self.evict_if_expired(key.clone(), &mut events);
        let expired = !events.is_empty();
        self.dispatch(events);
        expired
    }

    fn subscribe(&self, listener: Arc<dyn StoreListener<K, V>>) {
        self.listeners.write().push(listener);
    }
}
