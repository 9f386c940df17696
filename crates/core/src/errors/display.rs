//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidReference { reference, reason } => {
                write!(f, "invalid security reference '{reference}': {reason}")
            }
            Error::Configuration { message } => write!(f, "configuration error: {message}"),
        }
    }
}
