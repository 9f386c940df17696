//! Security cache loader for warden
//!
//! ## Key Components
//!
//! - **`loader`**: [`SecurityCacheLoader`], resolving the access of a user
//!   on an entity and filling the cache parent before child, with a bounded
//!   number of attempts when racing against removals.
//! - **`collaborators`**: the rule reader, group resolver and settlement
//!   engine the loader reads from.
//! - **`invalidator`**: maps rule and membership changes onto cache removals.
//! - **`config`**: [`LoaderConfig`] (attempt budget, retry delay).

pub mod collaborators;
pub mod config;
pub mod errors;
pub mod invalidator;
pub mod loader;

pub use self::{
    collaborators::{GroupResolver, RuleReader, SettlementEngine},
    config::LoaderConfig,
    errors::{AuthorizationError, Collaborator, Result},
    invalidator::{Invalidator, RuleChangeEvent},
    loader::SecurityCacheLoader,
};
