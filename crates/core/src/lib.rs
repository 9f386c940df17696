//! Core domain types and errors for the `warden` authorization cache.
//!
//! ## Key Components
//!
//! - **`reference`**: [`SecurityReference`], the immutable node identifier of
//!   the security hierarchy (farm → wiki → space → document → object, with
//!   users and groups living in spaces).
//! - **`rights`**: the [`Right`] enumeration, [`RightSet`] and [`RuleState`].
//! - **`entries`**: raw rule entries attached to one reference and settled
//!   access entries for a (user, entity) pair.
//! - **`errors`**: the crate [`Error`] enum and [`Result`] alias.

pub mod entries;
pub mod errors;
pub mod reference;
pub mod rights;

pub use self::{
    entries::{SecurityAccess, SecurityAccessEntry, SecurityRule, SecurityRuleEntry},
    errors::{Error, Result},
    reference::{ReferenceKind, SecurityReference},
    rights::{Right, RightSet, RuleState},
};
