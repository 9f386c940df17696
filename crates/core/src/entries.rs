//! Rule entries and access entries
//!
//! A [`SecurityRuleEntry`] is the raw rule set attached directly to one
//! reference, as produced by a rule reader. A [`SecurityAccessEntry`] is the
//! settled decision for a (user, entity) pair. Both are immutable once built
//! and compare by value.

use crate::reference::SecurityReference;
use crate::rights::{Right, RightSet, RuleState};
use serde::{Deserialize, Serialize};

/// One locally-defined access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRule {
    rights: RightSet,
    state: RuleState,
    users: Vec<SecurityReference>,
    groups: Vec<SecurityReference>,
}

impl SecurityRule {
    /// A rule granting `rights`
    #[must_use]
    pub fn allow(rights: RightSet) -> Self {
        Self::new(rights, RuleState::Allow)
    }

    /// A rule denying `rights`
    #[must_use]
    pub fn deny(rights: RightSet) -> Self {
        Self::new(rights, RuleState::Deny)
    }

    fn new(rights: RightSet, state: RuleState) -> Self {
        Self {
            rights,
            state,
            users: Vec::new(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: SecurityReference) -> Self {
        self.users.push(user);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: SecurityReference) -> Self {
        self.groups.push(group);
        self
    }

    #[must_use]
    pub fn rights(&self) -> RightSet {
        self.rights
    }

    #[must_use]
    pub fn state(&self) -> RuleState {
        self.state
    }

    #[must_use]
    pub fn users(&self) -> &[SecurityReference] {
        &self.users
    }

    #[must_use]
    pub fn groups(&self) -> &[SecurityReference] {
        &self.groups
    }

    /// Whether the rule targets `user` directly or through one of `groups`
    #[must_use]
    pub fn applies_to(&self, user: &SecurityReference, groups: &[SecurityReference]) -> bool {
        self.users.contains(user) || self.groups.iter().any(|g| groups.contains(g))
    }
}

/// Rules defined directly on one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRuleEntry {
    reference: SecurityReference,
    rules: Vec<SecurityRule>,
}

impl SecurityRuleEntry {
    #[must_use]
    pub fn new(reference: SecurityReference, rules: Vec<SecurityRule>) -> Self {
        Self { reference, rules }
    }

    /// An entry with no local rules; decisions delegate to the parent
    #[must_use]
    pub fn empty(reference: SecurityReference) -> Self {
        Self::new(reference, Vec::new())
    }

    #[must_use]
    pub fn reference(&self) -> &SecurityReference {
        &self.reference
    }

    #[must_use]
    pub fn rules(&self) -> &[SecurityRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Settled allow/deny rights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityAccess {
    allowed: RightSet,
    denied: RightSet,
}

impl SecurityAccess {
    #[must_use]
    pub fn new(allowed: RightSet, denied: RightSet) -> Self {
        let mut access = Self::default();
        for right in denied.iter() {
            access.deny(right);
        }
        for right in allowed.iter().filter(|r| !denied.contains(*r)) {
            access.allow(right);
        }
        access
    }

    /// Grant a right; clears a previous denial
    pub fn allow(&mut self, right: Right) {
        self.denied.remove(right);
        self.allowed.insert(right);
    }

    /// Deny a right; clears a previous grant
    pub fn deny(&mut self, right: Right) {
        self.allowed.remove(right);
        self.denied.insert(right);
    }

    #[must_use]
    pub fn get(&self, right: Right) -> RuleState {
        if self.allowed.contains(right) {
            RuleState::Allow
        } else if self.denied.contains(right) {
            RuleState::Deny
        } else {
            RuleState::Undetermined
        }
    }

    /// Only an explicit grant allows
    #[must_use]
    pub fn allows(&self, right: Right) -> bool {
        self.get(right) == RuleState::Allow
    }

    #[must_use]
    pub fn allowed(&self) -> RightSet {
        self.allowed
    }

    #[must_use]
    pub fn denied(&self) -> RightSet {
        self.denied
    }
}

/// Settled decision for a (user, entity) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityAccessEntry {
    user: SecurityReference,
    entity: SecurityReference,
    access: SecurityAccess,
}

impl SecurityAccessEntry {
    #[must_use]
    pub fn new(user: SecurityReference, entity: SecurityReference, access: SecurityAccess) -> Self {
        Self {
            user,
            entity,
            access,
        }
    }

    #[must_use]
    pub fn user(&self) -> &SecurityReference {
        &self.user
    }

    #[must_use]
    pub fn entity(&self) -> &SecurityReference {
        &self.entity
    }

    #[must_use]
    pub fn access(&self) -> &SecurityAccess {
        &self.access
    }
}
