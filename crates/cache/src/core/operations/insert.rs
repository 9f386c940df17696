//! Insertion operations

use crate::core::node::{CacheNode, CacheValue};
use crate::core::types::{CacheInner, SecurityCache};
use crate::errors::{CacheError, Result};
use crate::keys::CacheKey;
use std::sync::Arc;
use warden_core::{ReferenceKind, SecurityAccessEntry, SecurityReference, SecurityRuleEntry};

impl CacheInner {
    fn parent_evicted(&self, key: &CacheKey, parent: &CacheKey) -> CacheError {
        self.stats.record_parent_evicted();
        tracing::debug!(
            key = %key,
            parent = %parent,
            "Rejected insertion, required entry not cached"
        );
        CacheError::ParentEvicted {
            key: key.to_string(),
            parent: parent.to_string(),
        }
    }

    /// Insert a node depending on every entry in `parent_keys`
    fn insert_node(
        &self,
        key: CacheKey,
        value: CacheValue,
        parent_keys: &[CacheKey],
    ) -> Result<()> {
        let mut parents = Vec::with_capacity(parent_keys.len());
        for parent_key in parent_keys {
            match self.store.get(parent_key) {
                Some(parent) if self.is_live(&parent) => parents.push(parent),
                _ => return Err(self.parent_evicted(&key, parent_key)),
            }
        }

        let node = Arc::new(CacheNode::new(key.clone(), value, &parents));
        if let Err(existing) = self.store.insert_if_absent(key.clone(), Arc::clone(&node)) {
            if existing.value() == node.value() {
                self.stats.record_duplicate();
                tracing::trace!(key = %key, "Entry already cached");
                return Ok(());
            }
            self.stats.record_conflict();
            tracing::warn!(key = %key, "Conflicting insertion");
            return Err(CacheError::ConflictingInsertion {
                key: key.to_string(),
            });
        }

        for parent in &parents {
            if !parent.attach_child(&node) {
                // Parent disposed after lookup, take the new node down with it
                self.dispose(Arc::clone(&node));
                return Err(self.parent_evicted(&key, parent.key()));
            }
        }

        // Dropped by the store (capacity) before the edges were in place
        if node.is_disposed() {
            node.detach_from_parents();
        }

        self.stats.record_insertion();
        tracing::debug!(key = %key, parents = parents.len(), "Cached entry");
        Ok(())
    }
}

fn invalid_key(key: &CacheKey, reason: impl Into<String>) -> CacheError {
    CacheError::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Sorted, deduplicated group list without `member` itself
fn normalize_groups(
    member: &SecurityReference,
    groups: Vec<SecurityReference>,
) -> Vec<SecurityReference> {
    let mut groups: Vec<_> = groups.into_iter().filter(|g| g != member).collect();
    groups.sort();
    groups.dedup();
    groups
}

impl SecurityCache {
    /// Cache the rule entry of a reference
    ///
    /// Requires the rule entry of the parent reference to be cached.
    pub fn add(&self, entry: SecurityRuleEntry) -> Result<()> {
        let key = CacheKey::rules(entry.reference());
        let parents: Vec<_> = entry
            .reference()
            .parent()
            .map(CacheKey::rules)
            .into_iter()
            .collect();
        self.inner
            .insert_node(key, CacheValue::Rules(Arc::new(entry)), &parents)
    }

    /// Cache the rule entry of a user or group together with its groups
    ///
    /// Requires the parent reference and every group to be cached. Removing
    /// any of them drops the entry.
    pub fn add_user(
        &self,
        entry: SecurityRuleEntry,
        groups: Vec<SecurityReference>,
    ) -> Result<()> {
        let reference = entry.reference().clone();
        let key = CacheKey::rules(&reference);
        if !reference.is_user() && !reference.is_group() {
            return Err(invalid_key(&key, "not a user or group reference"));
        }

        let groups = normalize_groups(&reference, groups);
        let parents: Vec<_> = reference
            .parent()
            .map(CacheKey::rules)
            .into_iter()
            .chain(groups.iter().map(CacheKey::rules))
            .collect();

        self.inner.insert_node(
            key,
            CacheValue::User {
                entry: Arc::new(entry),
                groups,
            },
            &parents,
        )
    }

    /// Cache the groups of `user` within `wiki`, a wiki other than its own
    ///
    /// Requires the user, the wiki and every group to be cached.
    pub fn add_shadow(
        &self,
        user: &SecurityReference,
        wiki: &SecurityReference,
        groups: Vec<SecurityReference>,
    ) -> Result<()> {
        let key = CacheKey::shadow(user, wiki);
        if !user.is_user() && !user.is_group() {
            return Err(invalid_key(&key, "not a user or group reference"));
        }
        if wiki.kind() != ReferenceKind::Wiki {
            return Err(invalid_key(&key, "shadow entries are scoped to a wiki"));
        }
        if user.wiki() == Some(wiki) {
            return Err(invalid_key(&key, "wiki is the user's own wiki"));
        }

        let groups = normalize_groups(user, groups);
        let parents: Vec<_> = [CacheKey::rules(user), CacheKey::rules(wiki)]
            .into_iter()
            .chain(groups.iter().map(CacheKey::rules))
            .collect();

        self.inner
            .insert_node(key, CacheValue::Shadow { groups }, &parents)
    }

    /// Cache a settled access entry
    ///
    /// Requires the user and entity entries, plus the shadow entry of the
    /// entity's wiki when the user belongs to another wiki.
    pub fn add_access(&self, entry: SecurityAccessEntry) -> Result<()> {
        let user = entry.user();
        let entity = entry.entity();
        let key = CacheKey::access(user, entity);

        let mut parents = vec![CacheKey::rules(user), CacheKey::rules(entity)];
        if let (Some(home), Some(foreign)) = (user.wiki(), entity.wiki()) {
            if home != foreign {
                parents.push(CacheKey::shadow(user, foreign));
            }
        }

        self.inner
            .insert_node(key, CacheValue::Access(Arc::new(entry)), &parents)
    }
}
