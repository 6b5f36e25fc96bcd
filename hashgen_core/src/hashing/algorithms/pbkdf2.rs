//! PBKDF2 with an HMAC-SHA512 pseudo-random function

use super::check_range;
use crate::Result;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use crate::hashing::{HashOptions, OutputFormat};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

const DEFAULT_ITERATIONS: u32 = 10_000;
const KEY_LENGTH: usize = 32;

/// 256-bit PBKDF2-HMAC-SHA512 key
///
/// The salt is used verbatim and is empty when none is supplied, so output is
/// deterministic for a given text and iteration count.
pub struct Pbkdf2Algorithm;

impl HashAlgorithmImpl for Pbkdf2Algorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("pbkdf2", "PBKDF2-SHA512", AlgorithmCategory::Modern)
            .salted()
            .with_iterations(DEFAULT_ITERATIONS)
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        check_range("pbkdf2", "iterations", options.iterations, 1..=10_000_000)
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let iterations = options.iterations_or(DEFAULT_ITERATIONS);
        let salt = options.salt().unwrap_or_default();

        let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
        pbkdf2_hmac::<Sha512>(text.as_bytes(), salt.as_bytes(), iterations, &mut key[..]);

        Ok(match options.output_format {
            OutputFormat::Standard => format!(
                "$pbkdf2${iterations}${}${}",
                STANDARD.encode(salt),
                STANDARD.encode(&key[..])
            ),
            _ => hex::encode(&key[..]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let options = HashOptions::new().with_salt("salt").with_iterations(1);
        assert_eq!(
            Pbkdf2Algorithm.compute("password", &options).unwrap(),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252"
        );

        let options = HashOptions::new().with_salt("salt");
        assert_eq!(
            Pbkdf2Algorithm.compute("password", &options).unwrap(),
            "72629a41b076e588fba8c71ca37fadc9acdc8e7321b9cb4ea55fd0bf9fe8ed72"
        );
    }

    #[test]
    fn test_missing_salt_is_empty() {
        let digest = Pbkdf2Algorithm
            .compute("password", &HashOptions::default())
            .unwrap();
        assert_eq!(
            digest,
            "f4ca507c07d0bd31bc779a08756826a6fd9dd97d43ac25e4b29a0933abea03f3"
        );
    }

    #[test]
    fn test_standard_format() {
        let options = HashOptions::new()
            .with_salt("salt")
            .with_output_format(OutputFormat::Standard);
        assert_eq!(
            Pbkdf2Algorithm.compute("password", &options).unwrap(),
            "$pbkdf2$10000$c2FsdA==$cmKaQbB25Yj7qMcco3+tyazcjnMhuctOpV/Qv5/o7XI="
        );
    }

    #[test]
    fn test_iteration_bounds() {
        assert!(
            Pbkdf2Algorithm
                .validate(&HashOptions::new().with_iterations(0))
                .is_err()
        );
        assert!(
            Pbkdf2Algorithm
                .validate(&HashOptions::new().with_iterations(1))
                .is_ok()
        );
    }
}
