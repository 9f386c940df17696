//! Interfaces of the components the loader reads from
//!
//! All three are asynchronous and may perform I/O. They report failures
//! through `anyhow` so that embedders can use whatever error type they
//! like; the loader wraps them in
//! [`AuthorizationError::Upstream`](crate::errors::AuthorizationError::Upstream).

use async_trait::async_trait;
use std::sync::Arc;
use warden_core::{SecurityAccessEntry, SecurityReference, SecurityRuleEntry};

/// Source of the rules defined directly on a reference
#[async_trait]
pub trait RuleReader: Send + Sync {
    /// Read the rule entry of `reference`
    ///
    /// The returned entry must be for `reference` itself; references without
    /// rules yield an empty entry.
    async fn read_rules(&self, reference: &SecurityReference) -> anyhow::Result<SecurityRuleEntry>;
}

/// Source of group memberships
#[async_trait]
pub trait GroupResolver: Send + Sync {
    /// Groups `user` belongs to within `wiki`, nested memberships included
    async fn groups_of(
        &self,
        user: &SecurityReference,
        wiki: &SecurityReference,
    ) -> anyhow::Result<Vec<SecurityReference>>;
}

/// Computes the effective access of a user on an entity
#[async_trait]
pub trait SettlementEngine: Send + Sync {
    /// Settle the rights of `user` (member of `groups`) from the rule entries
    /// of the entity's ancestor chain, ordered from the farm down
    async fn settle(
        &self,
        user: &SecurityReference,
        groups: &[SecurityReference],
        entries: &[Arc<SecurityRuleEntry>],
    ) -> anyhow::Result<SecurityAccessEntry>;
}
