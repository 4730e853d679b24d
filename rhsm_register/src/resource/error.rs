//! Parameter validation errors

use crate::logging::{codes, Code};

/// Raised while building a resource; fatal for that instance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' requires {expected}. Received '{value}' instead")]
    InvalidFormat {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Parameter '{parameter}' may not be empty")]
    EmptyValue { parameter: &'static str },

    #[error("Resource declared without a server_hostname")]
    MissingIdentifier,
}

impl ValidationError {
    /// Name of the offending parameter
    pub fn parameter(&self) -> &'static str {
        match self {
            ValidationError::InvalidFormat { parameter, .. } => parameter,
            ValidationError::EmptyValue { parameter } => parameter,
            ValidationError::MissingIdentifier => "server_hostname",
        }
    }

    pub fn code(&self) -> Code {
        match self {
            ValidationError::InvalidFormat { .. } => codes::validation::INVALID_FORMAT,
            ValidationError::EmptyValue { .. } => codes::validation::EMPTY_VALUE,
            ValidationError::MissingIdentifier => codes::validation::MISSING_IDENTIFIER,
        }
    }
}
