//! Hierarchical security cache
//!
//! Every cached value is a [`CacheNode`] stored in a flat backing store.
//! Nodes keep weak links to the entries they depend on and strong links to
//! the entries depending on them, which is what makes removal cascade:
//! - rule entries depend on the rule entry of their parent reference
//! - user and group entries additionally depend on their groups
//! - shadow entries depend on the user, the foreign wiki and the foreign groups
//! - access entries depend on the user, the entity and, for a user of
//!   another wiki, on the shadow entry of that wiki
//!
//! Insertion never blocks on a global lock. Races are reported as
//! [`CacheError::ParentEvicted`](crate::errors::CacheError::ParentEvicted)
//! and [`CacheError::ConflictingInsertion`](crate::errors::CacheError::ConflictingInsertion)
//! and are left to the caller to retry.

mod builder;
mod node;
mod operations;
mod stats;
mod types;

pub use node::CacheNode;
pub use stats::CacheStatistics;
pub use types::{SecurityCache, SecurityCacheStore};

pub(crate) use types::CacheInner;

#[cfg(test)]
mod tests;
