//! Internal engine error types

use thiserror::Error;

/// Errors raised while work is executing or the engine is winding down
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// An algorithm plugin failed while computing a digest
    #[error("Hash calculation failed for algorithm '{algorithm}': {message}")]
    HashCalculation { algorithm: String, message: String },

    /// A worker raised or disappeared while handling a request
    #[error("Worker failure while computing '{algorithm}': {message}")]
    WorkerFailure { algorithm: String, message: String },

    /// A worker thread could not be started
    #[error("Failed to start hash worker {index}: {message}")]
    WorkerSpawn { index: usize, message: String },

    /// The engine stopped before the request settled
    #[error("Hash engine has shut down")]
    EngineShutdown,
}

impl InternalError {
    /// Create a hash calculation error
    pub fn hash_calculation(algorithm: &str, message: impl Into<String>) -> Self {
        Self::HashCalculation {
            algorithm: algorithm.to_string(),
            message: message.into(),
        }
    }

    /// Create a worker failure error
    pub fn worker_failure(algorithm: &str, message: impl Into<String>) -> Self {
        Self::WorkerFailure {
            algorithm: algorithm.to_string(),
            message: message.into(),
        }
    }

    /// Convert a failure surfaced by a worker into `WorkerFailure`
    pub fn into_worker_failure(error: crate::Error, algorithm: &str) -> crate::Error {
        match error {
            crate::Error::Internal(Self::WorkerFailure { .. }) => error,
            other => Self::worker_failure(algorithm, other.to_string()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_calculation_error() {
        let error = InternalError::hash_calculation("scrypt", "invalid output length");
        assert!(error.to_string().contains("Hash calculation failed"));
        assert!(error.to_string().contains("scrypt"));
        assert!(error.to_string().contains("invalid output length"));
    }

    #[test]
    fn test_worker_failure_error() {
        let error = InternalError::worker_failure("sha256", "worker panicked");
        assert!(error.to_string().contains("Worker failure"));
        assert!(error.to_string().contains("sha256"));
        assert!(error.to_string().contains("worker panicked"));
    }

    #[test]
    fn test_plugin_errors_become_worker_failures() {
        let error: crate::Error = InternalError::hash_calculation("bcrypt", "cost too high").into();
        let converted = InternalError::into_worker_failure(error, "bcrypt");
        assert!(converted.is_worker_failure());
        assert!(converted.to_string().contains("cost too high"));

        let original: crate::Error = InternalError::worker_failure("md5", "panicked").into();
        assert_eq!(
            InternalError::into_worker_failure(original.clone(), "md5"),
            original
        );
    }

    #[test]
    fn test_engine_shutdown_error() {
        assert!(
            InternalError::EngineShutdown
                .to_string()
                .contains("shut down")
        );
    }
}
