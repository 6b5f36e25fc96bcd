//! Core traits for the hash algorithm extensibility system

use super::HashOptions;
use crate::Result;
use serde::Serialize;

/// Grouping used when listing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AlgorithmCategory {
    /// Plain message digests
    Basic,
    /// Unix crypt(3) and bcrypt password hashes
    PasswordHashing,
    /// Tunable key derivation functions
    Modern,
    /// Platform and protocol specific formats
    Special,
}

impl std::fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlgorithmCategory::Basic => write!(f, "Basic"),
            AlgorithmCategory::PasswordHashing => write!(f, "Password Hashing"),
            AlgorithmCategory::Modern => write!(f, "Modern"),
            AlgorithmCategory::Special => write!(f, "Special"),
        }
    }
}

/// Static description of a registered algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmDescriptor {
    /// Registry key, e.g. `sha256` or `md5-crypt`
    pub id: &'static str,
    /// Display name for user interfaces
    pub display_name: &'static str,
    pub category: AlgorithmCategory,
    /// Whether the `salt` option is meaningful
    pub supports_salt: bool,
    pub default_iterations: Option<u32>,
    pub default_cost_factor: Option<u32>,
}

impl AlgorithmDescriptor {
    /// Descriptor for an unsalted algorithm without tunables
    pub const fn plain(
        id: &'static str,
        display_name: &'static str,
        category: AlgorithmCategory,
    ) -> Self {
        Self {
            id,
            display_name,
            category,
            supports_salt: false,
            default_iterations: None,
            default_cost_factor: None,
        }
    }

    /// Mark the algorithm as salted
    pub const fn salted(mut self) -> Self {
        self.supports_salt = true;
        self
    }

    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.default_iterations = Some(iterations);
        self
    }

    pub const fn with_cost_factor(mut self, cost_factor: u32) -> Self {
        self.default_cost_factor = Some(cost_factor);
        self
    }
}

/// Core trait that all hash algorithms must implement
///
/// Implementations are pure: the same text and options (including an explicit
/// salt) always produce the same digest. Output post-processing (base64
/// re-encoding, upper-casing) is applied by the registry, not by plugins.
pub trait HashAlgorithmImpl: Send + Sync {
    /// Static description of this algorithm
    fn descriptor(&self) -> AlgorithmDescriptor;

    /// Unique identifier for this algorithm
    fn id(&self) -> &'static str {
        self.descriptor().id
    }

    /// Check the options before any work is dispatched
    fn validate(&self, _options: &HashOptions) -> Result<()> {
        Ok(())
    }

    /// Check a single input text before any work is dispatched
    fn validate_input(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    /// Compute the family-formatted digest of `text`
    fn compute(&self, text: &str, options: &HashOptions) -> Result<String>;
}
