//! Keys of the flat backing store
//!
//! The backing store only knows flat keys; the hierarchy between them is
//! kept by the cache itself.

use std::fmt;
use warden_core::SecurityReference;

/// Key of one cached value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Rule entry of a reference
    Rules(SecurityReference),
    /// Groups of a user within a wiki other than its own
    Shadow {
        user: SecurityReference,
        wiki: SecurityReference,
    },
    /// Settled access of a user on an entity
    Access {
        user: SecurityReference,
        entity: SecurityReference,
    },
}

impl CacheKey {
    #[must_use]
    pub fn rules(reference: &SecurityReference) -> Self {
        Self::Rules(reference.clone())
    }

    #[must_use]
    pub fn shadow(user: &SecurityReference, wiki: &SecurityReference) -> Self {
        Self::Shadow {
            user: user.clone(),
            wiki: wiki.clone(),
        }
    }

    #[must_use]
    pub fn access(user: &SecurityReference, entity: &SecurityReference) -> Self {
        Self::Access {
            user: user.clone(),
            entity: entity.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules(reference) => write!(f, "rules:{reference}"),
            Self::Shadow { user, wiki } => write!(f, "shadow:{user}@{wiki}"),
            Self::Access { user, entity } => write!(f, "access:{user}@{entity}"),
        }
    }
}
