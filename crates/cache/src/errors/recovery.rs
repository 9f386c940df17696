//! Recovery utilities for cache errors

use super::types::CacheError;

impl CacheError {
    /// Check if this error is a transient race that a caller may retry
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ParentEvicted { .. } | Self::ConflictingInsertion { .. }
        )
    }

    #[must_use]
    pub const fn is_parent_evicted(&self) -> bool {
        matches!(self, Self::ParentEvicted { .. })
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConflictingInsertion { .. })
    }
}
