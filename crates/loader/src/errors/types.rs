//! Core error types for the loader

use std::fmt;
use warden_cache::CacheError;
use warden_core::SecurityReference;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, AuthorizationError>;

/// External component the loader depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    RuleReader,
    GroupResolver,
    SettlementEngine,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleReader => f.write_str("rule reader"),
            Self::GroupResolver => f.write_str("group resolver"),
            Self::SettlementEngine => f.write_str("settlement engine"),
        }
    }
}

/// Error type for access resolution
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    /// Every attempt lost a race against concurrent removals
    #[error(
        "failed to load the security cache for user '{user}' on '{entity}' \
         after {attempts} attempts"
    )]
    CacheLoadExhausted {
        user: SecurityReference,
        entity: SecurityReference,
        attempts: u32,
        #[source]
        last: CacheError,
    },

    /// A collaborator failed or answered for something it was not asked
    #[error("{collaborator} failed for '{reference}'")]
    Upstream {
        collaborator: Collaborator,
        reference: String,
        #[source]
        source: anyhow::Error,
    },

    /// Cache error that retrying cannot fix
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Reference(#[from] warden_core::Error),

    #[error("loader configuration error: {message}")]
    Configuration { message: String },
}
