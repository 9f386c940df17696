//! Cache nodes: stored values plus their place in the hierarchy

use crate::keys::CacheKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use warden_core::{SecurityAccessEntry, SecurityReference, SecurityRuleEntry};

/// Value held by a cache node
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CacheValue {
    Rules(Arc<SecurityRuleEntry>),
    /// Rule entry of a user or group together with the groups it was
    /// resolved against
    User {
        entry: Arc<SecurityRuleEntry>,
        groups: Vec<SecurityReference>,
    },
    /// Groups of a user in a foreign wiki
    Shadow { groups: Vec<SecurityReference> },
    Access(Arc<SecurityAccessEntry>),
}

impl CacheValue {
    pub(crate) fn rule_entry(&self) -> Option<&Arc<SecurityRuleEntry>> {
        match self {
            Self::Rules(entry) | Self::User { entry, .. } => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn groups(&self) -> Option<&[SecurityReference]> {
        match self {
            Self::User { groups, .. } | Self::Shadow { groups } => Some(groups),
            _ => None,
        }
    }
}

/// One cached value in the backing store
///
/// Parents are held weakly; children strongly. A node is disposed at most
/// once, and no child can be attached after that.
pub struct CacheNode {
    key: CacheKey,
    value: CacheValue,
    parents: Vec<Weak<CacheNode>>,
    state: Mutex<NodeState>,
}

#[derive(Default)]
struct NodeState {
    disposed: bool,
    children: HashMap<CacheKey, Arc<CacheNode>>,
}

impl CacheNode {
    pub(crate) fn new(key: CacheKey, value: CacheValue, parents: &[Arc<CacheNode>]) -> Self {
        Self {
            key,
            value,
            parents: parents.iter().map(Arc::downgrade).collect(),
            state: Mutex::new(NodeState::default()),
        }
    }

    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub(crate) fn value(&self) -> &CacheValue {
        &self.value
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Parents still alive
    pub(crate) fn parents(&self) -> impl Iterator<Item = Arc<CacheNode>> + '_ {
        self.parents.iter().filter_map(Weak::upgrade)
    }

    /// Register `child`; fails once this node is disposed
    pub(crate) fn attach_child(&self, child: &Arc<CacheNode>) -> bool {
        let mut state = self.state.lock();
        if state.disposed {
            return false;
        }
        state.children.insert(child.key.clone(), Arc::clone(child));
        true
    }

    fn detach_child(&self, child: &CacheNode) {
        let mut state = self.state.lock();
        let registered = state
            .children
            .get(&child.key)
            .is_some_and(|current| std::ptr::eq(Arc::as_ptr(current), child));
        if registered {
            state.children.remove(&child.key);
        }
    }

    /// Flag the node as disposed and hand out its children
    ///
    /// Returns `None` when another caller already disposed it.
    pub(crate) fn mark_disposed(&self) -> Option<Vec<Arc<CacheNode>>> {
        let mut state = self.state.lock();
        if state.disposed {
            return None;
        }
        state.disposed = true;
        Some(std::mem::take(&mut state.children).into_values().collect())
    }

    pub(crate) fn detach_from_parents(&self) {
        for parent in self.parents() {
            parent.detach_child(self);
        }
    }
}

impl fmt::Debug for CacheNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheNode")
            .field("key", &self.key.to_string())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
