//! Central registry for hash algorithm implementations

use super::traits::{AlgorithmDescriptor, HashAlgorithmImpl};
use super::{HashOptions, apply_output_format};
use crate::{Result, error::ValidationError};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup table from algorithm id to its implementation
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<&'static str, Arc<dyn HashAlgorithmImpl>>,
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.algorithms.keys().collect();
        ids.sort();
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &ids)
            .finish()
    }
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in algorithm
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::algorithms::register_all(&mut registry);
        registry
    }

    /// Get the shared built-in registry instance
    pub fn global() -> Arc<Self> {
        static INSTANCE: OnceCell<Arc<AlgorithmRegistry>> = OnceCell::new();
        Arc::clone(INSTANCE.get_or_init(|| Arc::new(Self::with_builtins())))
    }

    /// Register an algorithm, replacing any previous one with the same id
    pub fn register(&mut self, algorithm: impl HashAlgorithmImpl + 'static) {
        let id = algorithm.id();
        if self.algorithms.insert(id, Arc::new(algorithm)).is_some() {
            log::debug!("Replaced registered algorithm '{id}'");
        }
    }

    /// Get algorithm by ID
    pub fn get(&self, id: &str) -> Option<Arc<dyn HashAlgorithmImpl>> {
        self.algorithms.get(id).cloned()
    }

    /// Whether an algorithm is registered under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.algorithms.contains_key(id)
    }

    /// Descriptors of all registered algorithms, by category then id
    pub fn list(&self) -> Vec<AlgorithmDescriptor> {
        let mut descriptors: Vec<_> = self
            .algorithms
            .values()
            .map(|algorithm| algorithm.descriptor())
            .collect();
        descriptors.sort_by(|a, b| a.category.cmp(&b.category).then(a.id.cmp(b.id)));
        descriptors
    }

    /// Resolve `id` or fail with `UnsupportedAlgorithm`
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn HashAlgorithmImpl>> {
        self.get(id)
            .ok_or_else(|| ValidationError::unsupported_algorithm(id).into())
    }

    /// Validate an algorithm id together with its options
    pub fn validate(&self, id: &str, options: &HashOptions) -> Result<Arc<dyn HashAlgorithmImpl>> {
        let algorithm = self.resolve(id)?;
        algorithm.validate(options)?;
        Ok(algorithm)
    }

    /// Compute the final, post-processed digest for `text`
    pub fn compute(&self, id: &str, text: &str, options: &HashOptions) -> Result<String> {
        let algorithm = self.validate(id, options)?;
        algorithm.validate_input(text)?;
        let digest = algorithm.compute(text, options)?;
        Ok(apply_output_format(digest, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::traits::AlgorithmCategory;
    use crate::{Error, hashing::OutputFormat};

    struct ReverseAlgorithm;

    impl HashAlgorithmImpl for ReverseAlgorithm {
        fn descriptor(&self) -> AlgorithmDescriptor {
            AlgorithmDescriptor::plain("reverse", "Reverse", AlgorithmCategory::Special)
        }

        fn compute(&self, text: &str, _options: &HashOptions) -> Result<String> {
            Ok(text.chars().rev().collect())
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = AlgorithmRegistry::with_builtins();
        for id in [
            "md5",
            "sha1",
            "sha224",
            "sha256",
            "sha384",
            "sha512",
            "mysql-sha1",
            "ntlm",
            "pbkdf2",
            "md5-crypt",
            "sha256-crypt",
            "sha512-crypt",
            "bcrypt",
            "argon2",
            "scrypt",
            "yescrypt",
            "netntlmv2",
            "wpa-pmkid",
        ] {
            assert!(registry.contains(id), "missing algorithm {id}");
        }
        assert_eq!(registry.list().len(), 18);
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let registry = AlgorithmRegistry::with_builtins();
        let err = registry
            .compute("whirlpool", "abc", &HashOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnsupportedAlgorithm { .. })
        ));
        assert!(err.to_string().contains("whirlpool"));
    }

    #[test]
    fn test_custom_algorithm_registration() {
        let mut registry = AlgorithmRegistry::new();
        registry.register(ReverseAlgorithm);

        let digest = registry
            .compute("reverse", "abc", &HashOptions::default())
            .unwrap();
        assert_eq!(digest, "cba");
        assert!(registry.get("md5").is_none());
    }

    #[test]
    fn test_list_is_sorted_by_category() {
        let registry = AlgorithmRegistry::with_builtins();
        let list = registry.list();
        assert_eq!(list.first().unwrap().category, AlgorithmCategory::Basic);
        assert!(list.windows(2).all(|w| w[0].category <= w[1].category));
    }

    #[test]
    fn test_post_processing_applied_after_compute() {
        let registry = AlgorithmRegistry::with_builtins();
        let options = HashOptions::default().with_output_format(OutputFormat::Base64);
        let digest = registry.compute("md5", "abc", &options).unwrap();
        assert_eq!(digest, "kAFQmDzST7DWlj99KOF/cg==");
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = AlgorithmRegistry::global();
        let b = AlgorithmRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
