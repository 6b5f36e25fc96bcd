//! Validation related error types

use thiserror::Error;

/// Errors detected before any work is dispatched to a worker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required input was empty or absent
    #[error("Empty input: {field} is required")]
    EmptyInput { field: String },

    /// The algorithm id is not registered
    #[error("Unsupported algorithm: '{algorithm}'")]
    UnsupportedAlgorithm { algorithm: String },

    /// A hash option is malformed or out of range for the chosen algorithm
    #[error("Invalid option '{option}' for algorithm '{algorithm}': {reason}")]
    InvalidOptions {
        algorithm: String,
        option: String,
        reason: String,
    },

    /// Invalid engine configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create an empty input error
    pub fn empty_input(field: &str) -> Self {
        Self::EmptyInput {
            field: field.to_string(),
        }
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(algorithm: &str) -> Self {
        Self::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
        }
    }

    /// Create an invalid options error
    pub fn invalid_options(algorithm: &str, option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            algorithm: algorithm.to_string(),
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
