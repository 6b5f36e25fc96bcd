//! Hash computation for the hash generation engine
//!
//! This module holds the per-request option types, the algorithm registry and
//! the algorithm implementations. Everything here is synchronous and pure; the
//! worker pool is responsible for running it off the caller's thread.

use crate::{Error, Result, error::ValidationError};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

mod algorithms;
mod registry;
mod traits;

pub use registry::AlgorithmRegistry;
pub use traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};

/// Output encoding requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lowercase hex (or the family's canonical form)
    #[default]
    Hex,
    /// Standard base64 of the raw digest bytes
    Base64,
    /// The family's canonical multi-field form where one exists
    Standard,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Hex => write!(f, "hex"),
            OutputFormat::Base64 => write!(f, "base64"),
            OutputFormat::Standard => write!(f, "standard"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(OutputFormat::Hex),
            "base64" => Ok(OutputFormat::Base64),
            "standard" => Ok(OutputFormat::Standard),
            _ => Err(Error::Validation(ValidationError::invalid_configuration(
                &format!("Unknown output format: {s}"),
            ))),
        }
    }
}

/// Per-request hashing options
///
/// # Examples
///
/// ```
/// use hashgen_core::{HashOptions, OutputFormat};
///
/// let options = HashOptions::new()
///     .with_salt("NaCl")
///     .with_iterations(1_000)
///     .with_output_format(OutputFormat::Standard);
/// assert_eq!(options.salt(), Some("NaCl"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HashOptions {
    pub salt: Option<String>,
    pub iterations: Option<u32>,
    pub cost_factor: Option<u32>,
    pub output_format: OutputFormat,
    pub uppercase: bool,
}

impl HashOptions {
    /// Create options with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_cost_factor(mut self, cost_factor: u32) -> Self {
        self.cost_factor = Some(cost_factor);
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// The explicit salt, treating an empty string as absent
    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref().filter(|salt| !salt.is_empty())
    }

    /// The iteration count, or `default` when unset
    pub fn iterations_or(&self, default: u32) -> u32 {
        self.iterations.unwrap_or(default)
    }

    /// The cost factor, or `default` when unset
    pub fn cost_factor_or(&self, default: u32) -> u32 {
        self.cost_factor.unwrap_or(default)
    }
}

/// Whether `digest` is a bare, even-length hex string
pub(crate) fn is_plain_hex(digest: &str) -> bool {
    !digest.is_empty()
        && digest.len().is_multiple_of(2)
        && digest.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Apply the caller's output encoding to a family-formatted digest
///
/// Multi-field outputs (`$`, `*` or `:` delimited) are returned unchanged.
pub(crate) fn apply_output_format(digest: String, options: &HashOptions) -> String {
    if !is_plain_hex(&digest) {
        return digest;
    }

    match options.output_format {
        OutputFormat::Base64 => match hex::decode(&digest) {
            Ok(bytes) => STANDARD.encode(bytes),
            Err(_) => digest,
        },
        OutputFormat::Hex if options.uppercase => digest.to_ascii_uppercase(),
        _ => digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("hex".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert_eq!(
            "BASE64".parse::<OutputFormat>().unwrap(),
            OutputFormat::Base64
        );
        assert_eq!(
            "standard".parse::<OutputFormat>().unwrap(),
            OutputFormat::Standard
        );
        assert!("binary".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_empty_salt_is_absent() {
        let options = HashOptions::new().with_salt("");
        assert_eq!(options.salt(), None);
    }

    #[test]
    fn test_uppercase_only_for_hex() {
        let options = HashOptions::new().with_uppercase(true);
        assert_eq!(apply_output_format("abcdef".into(), &options), "ABCDEF");

        let options = options.with_output_format(OutputFormat::Standard);
        assert_eq!(apply_output_format("abcdef".into(), &options), "abcdef");
    }

    #[test]
    fn test_base64_reencodes_hex() {
        let options = HashOptions::new().with_output_format(OutputFormat::Base64);
        assert_eq!(apply_output_format("00ff".into(), &options), "AP8=");
    }

    #[test]
    fn test_formatted_outputs_untouched() {
        let options = HashOptions::new()
            .with_output_format(OutputFormat::Base64)
            .with_uppercase(true);
        for digest in [
            "$1$abc$def",
            "*2470C0C06DEE42FD1618BB99005ADCA2EC9D1E19",
            "0011:aabb",
            "00*11*22",
        ] {
            assert_eq!(apply_output_format(digest.into(), &options), digest);
        }
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: HashOptions = serde_json::from_str(r#"{"salt":"abc"}"#).unwrap();
        assert_eq!(options.salt(), Some("abc"));
        assert_eq!(options.output_format, OutputFormat::Hex);
        assert!(!options.uppercase);

        let options: HashOptions =
            serde_json::from_str(r#"{"output_format":"base64","uppercase":true}"#).unwrap();
        assert_eq!(options.output_format, OutputFormat::Base64);
        assert!(options.uppercase);
    }
}
