//! Core error type definitions

/// Result type alias for warden core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for warden operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reference could not be built from the given parts
    InvalidReference { reference: String, reason: String },

    /// Configuration errors
    Configuration { message: String },
}
