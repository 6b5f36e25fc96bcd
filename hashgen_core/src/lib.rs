//! Hash generation engine
//!
//! Computes cryptographic digests and password hashes for text input across a
//! pool of worker threads, classifies unknown hash strings by shape and scores
//! password strength.
//!
//! The main entry point is [`HashEngine`]. Algorithms are plugins implementing
//! [`HashAlgorithmImpl`] and live in an [`AlgorithmRegistry`], which can be
//! extended without touching the engine.

pub mod detection;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod hooks;
pub mod salt;
pub mod strength;
mod worker_pool;

pub use detection::{HashDetection, HashFamily, detect, detect_all};
pub use engine::HashEngine;
pub use error::{Error, Result};
pub use hashing::{
    AlgorithmCategory, AlgorithmDescriptor, AlgorithmRegistry, HashAlgorithmImpl, HashOptions,
    OutputFormat,
};
pub use hooks::{HistoryStore, LogNotifier, MemoryHistoryStore, Notifier, NotifyLevel};
pub use salt::{DEFAULT_SALT_LENGTH, generate_salt};
pub use strength::{StrengthRating, StrengthReport};
pub use worker_pool::{StatsCallback, StatsUpdate};

use error::ValidationError;
use serde::{Deserialize, Serialize};

/// Fallback worker count when hardware parallelism cannot be queried
const FALLBACK_WORKERS: usize = 4;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of worker threads; `None` uses the available parallelism
    pub worker_count: Option<usize>,
    /// Maximum items per bulk batch
    pub batch_size: usize,
    /// Statistics sampling interval in milliseconds
    pub stats_interval_ms: u64,
    pub default_salt_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            batch_size: 1_000,
            stats_interval_ms: 1_000,
            default_salt_length: DEFAULT_SALT_LENGTH,
        }
    }
}

impl EngineConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            worker_count: Some(2),
            batch_size: 8,
            stats_interval_ms: 50, // Fast sampling for tests
            default_salt_length: DEFAULT_SALT_LENGTH,
        }
    }

    /// Worker count after applying the hardware default
    pub fn resolved_worker_count(&self) -> usize {
        self.worker_count
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(FALLBACK_WORKERS)
            })
            .max(1)
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if self.worker_count == Some(0) {
            Some("worker_count must be at least 1")
        } else if self.batch_size == 0 {
            Some("batch_size must be at least 1")
        } else if self.stats_interval_ms == 0 {
            Some("stats_interval_ms must be at least 1")
        } else if self.default_salt_length == 0 {
            Some("default_salt_length must be at least 1")
        } else {
            None
        };

        match problem {
            Some(message) => Err(ValidationError::invalid_configuration(message).into()),
            None => Ok(()),
        }
    }
}
