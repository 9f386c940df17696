//! Builder methods for creating errors with context

use super::types::{AuthorizationError, Collaborator};

impl AuthorizationError {
    /// Wrap a collaborator failure
    pub fn upstream(
        collaborator: Collaborator,
        reference: impl ToString,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Upstream {
            collaborator,
            reference: reference.to_string(),
            source: source.into(),
        }
    }

    /// A collaborator answered with data for another reference
    pub fn mismatched(
        collaborator: Collaborator,
        requested: impl ToString,
        returned: impl ToString,
    ) -> Self {
        let requested = requested.to_string();
        let returned = returned.to_string();
        Self::upstream(
            collaborator,
            requested.clone(),
            anyhow::anyhow!("asked for '{requested}' but received '{returned}'"),
        )
    }

    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the attempt budget ran out
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::CacheLoadExhausted { .. })
    }

    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}
