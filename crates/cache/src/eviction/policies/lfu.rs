//! LFU (Least Frequently Used) eviction policy implementation

use crate::eviction::traits::EvictionPolicy;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// LFU (Least Frequently Used) eviction policy
///
/// Ties on frequency are broken by insertion order, oldest first.
pub struct LfuPolicy<K: Hash + Eq> {
    /// Frequency count and insertion sequence per key
    frequencies: DashMap<K, (u64, u64)>,
    sequence: AtomicU64,
}

impl<K: Hash + Eq> LfuPolicy<K> {
    pub fn new() -> Self {
        Self {
            frequencies: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }
}

impl<K: Hash + Eq> Default for LfuPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionPolicy<K> for LfuPolicy<K>
where
    K: Hash + Eq + Clone + Send + Sync,
{
    fn on_access(&self, key: &K) {
        if let Some(mut slot) = self.frequencies.get_mut(key) {
            slot.0 += 1;
        }
    }

    fn on_insert(&self, key: &K) {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.frequencies.insert(key.clone(), (1, seq));
    }

    fn on_remove(&self, key: &K) {
        self.frequencies.remove(key);
    }

    fn next_eviction(&self) -> Option<K> {
        // O(n) scan for the minimum (frequency, sequence)
        let mut candidate: Option<(K, (u64, u64))> = None;

        for r in self.frequencies.iter() {
            let rank = *r.value();
            match candidate {
                Some((_, best)) if rank >= best => {}
                _ => candidate = Some((r.key().clone(), rank)),
            }
        }

        candidate.map(|(k, _)| k)
    }
}
