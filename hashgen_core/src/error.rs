//! Error types for the hash generation engine
//!
//! Errors are split into two categories:
//! - Validation errors: raised synchronously before a request is dispatched
//! - Internal errors: raised by workers or the coordinator while a request is in flight

use thiserror::Error;

pub mod internal;
pub mod validation;

pub use internal::InternalError;
pub use validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the hash generation engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input or option validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Execution errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Whether the error was raised before dispatch
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the error came from a worker
    pub fn is_worker_failure(&self) -> bool {
        matches!(self, Self::Internal(InternalError::WorkerFailure { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_empty_input_error_creation() {
        let error = Error::Validation(ValidationError::empty_input("algorithm"));

        match error {
            Error::Validation(ValidationError::EmptyInput { field }) => {
                assert_eq!(field, "algorithm");
            }
            _ => panic!("Expected Validation::EmptyInput error"),
        }
    }

    #[test]
    fn test_worker_failure_classification() {
        let error: Error = InternalError::worker_failure("md5", "boom").into();
        assert!(error.is_worker_failure());
        assert!(!error.is_validation());

        let error: Error = ValidationError::unsupported_algorithm("rot13").into();
        assert!(error.is_validation());
        assert!(!error.is_worker_failure());
    }

    #[test]
    fn test_error_display_is_transparent() {
        let error: Error = ValidationError::invalid_options("argon2", "salt", "too short").into();
        assert_eq!(
            error.to_string(),
            "Invalid option 'salt' for algorithm 'argon2': too short"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let error: Error = InternalError::EngineShutdown.into();
        let _: &dyn StdError = &error;
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_hash_errors_include_algorithm_context() {
        for algorithm in ["md5", "bcrypt", "wpa-pmkid"] {
            let error: Error = InternalError::worker_failure(algorithm, "Test error").into();
            assert!(error.to_string().contains(algorithm));
        }
    }
}
