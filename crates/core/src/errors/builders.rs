//! Builder methods for creating errors with context

use super::types::Error;

impl Error {
    /// Create an invalid reference error
    #[must_use]
    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
