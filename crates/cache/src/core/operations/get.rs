//! Lookup operations

use crate::core::node::{CacheNode, CacheValue};
use crate::core::stats::CacheStatistics;
use crate::core::types::{CacheInner, SecurityCache};
use crate::keys::CacheKey;
use std::collections::HashSet;
use std::sync::Arc;
use warden_core::{SecurityAccessEntry, SecurityReference, SecurityRuleEntry};

impl CacheInner {
    /// Whether `node` is still live once expired entries it depends on are dropped
    ///
    /// Every entry outlives its parents in a store with a time-to-live, so an
    /// expired ancestor is dropped here, cascading down to `node`.
    pub(crate) fn is_live(&self, node: &CacheNode) -> bool {
        if node.is_disposed() {
            return false;
        }
        if !self.store.expires_entries() {
            return true;
        }

        let mut seen = HashSet::new();
        let mut pending: Vec<_> = node.parents().collect();
        while let Some(ancestor) = pending.pop() {
            if !seen.insert(ancestor.key().clone()) {
                continue;
            }
            if self.store.expire(ancestor.key()) && node.is_disposed() {
                return false;
            }
            pending.extend(ancestor.parents());
        }
        !node.is_disposed()
    }

    /// Fetch a live node, counting the lookup
    pub(crate) fn lookup(&self, key: &CacheKey) -> Option<Arc<CacheNode>> {
        match self.store.get(key).filter(|node| self.is_live(node)) {
            Some(node) => {
                self.stats.record_hit();
                tracing::trace!(key = %key, "Cache hit");
                Some(node)
            }
            None => {
                self.stats.record_miss();
                tracing::trace!(key = %key, "Cache miss");
                None
            }
        }
    }
}

impl SecurityCache {
    /// Cached rule entry of `reference`, user and group entries included
    #[must_use]
    pub fn get(&self, reference: &SecurityReference) -> Option<Arc<SecurityRuleEntry>> {
        self.inner
            .lookup(&CacheKey::rules(reference))
            .and_then(|node| node.value().rule_entry().cloned())
    }

    /// Cached settled access of `user` on `entity`
    #[must_use]
    pub fn get_access(
        &self,
        user: &SecurityReference,
        entity: &SecurityReference,
    ) -> Option<Arc<SecurityAccessEntry>> {
        let node = self.inner.lookup(&CacheKey::access(user, entity))?;
        match node.value() {
            CacheValue::Access(entry) => Some(Arc::clone(entry)),
            _ => None,
        }
    }

    /// Groups recorded for `user` in `wiki`
    ///
    /// `None` or the user's own wiki reads the groups stored with the user
    /// entry; any other wiki reads the shadow entry for that wiki.
    #[must_use]
    pub fn groups_for(
        &self,
        user: &SecurityReference,
        wiki: Option<&SecurityReference>,
    ) -> Option<Vec<SecurityReference>> {
        let key = match wiki {
            Some(wiki) if user.wiki() != Some(wiki) => CacheKey::shadow(user, wiki),
            _ => CacheKey::rules(user),
        };
        let node = self.inner.lookup(&key)?;
        node.value().groups().map(<[SecurityReference]>::to_vec)
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    /// Snapshot of the cache counters
    #[must_use]
    pub fn stats(&self) -> CacheStatistics {
        self.inner.stats.snapshot(self.inner.store.len())
    }
}
