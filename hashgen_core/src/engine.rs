//! Public engine facade
//!
//! [`HashEngine`] validates every request synchronously, then hands the
//! compute-bound work to the worker pool and awaits the correlated answer.
//! Salt generation, format detection and strength scoring are cheap and run
//! on the caller's thread.

use crate::detection::{self, HashDetection};
use crate::error::{InternalError, ValidationError};
use crate::hashing::{AlgorithmDescriptor, AlgorithmRegistry, HashOptions};
use crate::strength::{self, StrengthReport};
use crate::worker_pool::{StatsUpdate, WorkerPool};
use crate::{EngineConfig, Result, salt};
use std::sync::Arc;

/// Parallel hash generation engine
///
/// # Examples
///
/// ```no_run
/// use hashgen_core::{EngineConfig, HashEngine, HashOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = HashEngine::new(EngineConfig::default())?;
///
/// let digest = engine
///     .generate_hash("hello", "sha256", &HashOptions::default())
///     .await?;
/// println!("{digest}");
///
/// let digests = engine
///     .generate_bulk_hashes(&["a", "b", "c"], "md5", &HashOptions::default())
///     .await?;
/// assert_eq!(digests.len(), 3);
/// # Ok(())
/// # }
/// ```
pub struct HashEngine {
    config: EngineConfig,
    registry: Arc<AlgorithmRegistry>,
    pool: WorkerPool,
}

impl std::fmt::Debug for HashEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashEngine")
            .field("config", &self.config)
            .field("workers", &self.pool.worker_count())
            .finish()
    }
}

impl HashEngine {
    /// Create an engine over the built-in algorithms
    ///
    /// Must be called from within a Tokio runtime; the coordinator task is
    /// spawned on the current one.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_registry(config, AlgorithmRegistry::global())
    }

    /// Create an engine over a custom algorithm registry
    pub fn with_registry(config: EngineConfig, registry: Arc<AlgorithmRegistry>) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::start(&config, Arc::clone(&registry))?;
        Ok(Self {
            config,
            registry,
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    /// Descriptors of every registered algorithm
    pub fn algorithms(&self) -> Vec<AlgorithmDescriptor> {
        self.registry.list()
    }

    /// Hash a single text on the worker pool
    pub async fn generate_hash(
        &self,
        text: &str,
        algorithm_id: &str,
        options: &HashOptions,
    ) -> Result<String> {
        if text.is_empty() {
            return Err(ValidationError::empty_input("text").into());
        }
        let algorithm = self.validate_algorithm(algorithm_id, options)?;
        algorithm.validate_input(text)?;

        let receiver =
            self.pool
                .submit_single(text.to_string(), algorithm_id.to_string(), options.clone());
        receiver
            .await
            .unwrap_or_else(|_| Err(InternalError::EngineShutdown.into()))
    }

    /// Hash every item with the same algorithm and options
    ///
    /// The result is positionally aligned with `items`.
    pub async fn generate_bulk_hashes<S: AsRef<str>>(
        &self,
        items: &[S],
        algorithm_id: &str,
        options: &HashOptions,
    ) -> Result<Vec<String>> {
        let algorithm = self.validate_algorithm(algorithm_id, options)?;
        for (index, item) in items.iter().enumerate() {
            let item = item.as_ref();
            if item.is_empty() {
                return Err(ValidationError::empty_input(&format!("items[{index}]")).into());
            }
            algorithm.validate_input(item)?;
        }

        let texts = items.iter().map(|item| item.as_ref().to_string()).collect();
        let receiver = self
            .pool
            .submit_bulk(texts, algorithm_id.to_string(), options.clone());
        receiver
            .await
            .unwrap_or_else(|_| Err(InternalError::EngineShutdown.into()))
    }

    /// Compute a digest on the calling thread, bypassing the worker pool
    pub fn compute_sync(
        &self,
        text: &str,
        algorithm_id: &str,
        options: &HashOptions,
    ) -> Result<String> {
        if text.is_empty() {
            return Err(ValidationError::empty_input("text").into());
        }
        if algorithm_id.is_empty() {
            return Err(ValidationError::empty_input("algorithm").into());
        }
        self.registry.compute(algorithm_id, text, options)
    }

    /// Random salt of `length` characters from `A-Za-z0-9./`
    pub fn generate_salt(&self, length: usize) -> String {
        salt::generate_salt(length)
    }

    /// Random salt of the configured default length
    pub fn generate_default_salt(&self) -> String {
        salt::generate_salt(self.config.default_salt_length)
    }

    pub fn detect_hash_type(&self, hash: &str) -> HashDetection {
        detection::detect(hash)
    }

    pub fn evaluate_password_strength(&self, password: &str) -> StrengthReport {
        strength::evaluate(password)
    }

    /// Receive a [`StatsUpdate`] at most once per sampling interval
    ///
    /// Callbacks run on the coordinator task and must not block.
    pub fn on_stats_update<F>(&self, callback: F)
    where
        F: Fn(StatsUpdate) + Send + 'static,
    {
        self.pool.subscribe(Box::new(callback));
    }

    /// Stop the coordinator, rejecting anything still in flight
    pub async fn shutdown(self) {
        self.pool.shutdown().await;
    }

    fn validate_algorithm(
        &self,
        algorithm_id: &str,
        options: &HashOptions,
    ) -> Result<Arc<dyn crate::hashing::HashAlgorithmImpl>> {
        if algorithm_id.is_empty() {
            return Err(ValidationError::empty_input("algorithm").into());
        }
        self.registry.validate(algorithm_id, options)
    }
}
