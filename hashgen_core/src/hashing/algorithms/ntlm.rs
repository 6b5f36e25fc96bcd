//! Windows NT password hash

use super::nt_hash;
use crate::Result;
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};

pub struct NtlmAlgorithm;

impl HashAlgorithmImpl for NtlmAlgorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("ntlm", "NTLM", AlgorithmCategory::Special)
    }

    fn compute(&self, text: &str, _options: &HashOptions) -> Result<String> {
        Ok(hex::encode(nt_hash(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let cases = [
            ("", "31d6cfe0d16ae931b73c59d7e0c089c0"),
            ("password", "8846f7eaee8fb117ad06bdd830b7586c"),
            ("Hello", "916a8e7b1540ec179f196f8ddb603d85"),
        ];

        for (input, expected) in cases {
            let digest = NtlmAlgorithm
                .compute(input, &HashOptions::default())
                .unwrap();
            assert_eq!(digest, expected, "NTLM mismatch for {input:?}");
        }
    }

    #[test]
    fn test_non_ascii_uses_utf16() {
        let digest = NtlmAlgorithm.compute("é", &HashOptions::default()).unwrap();
        assert_eq!(digest.len(), 32);
        assert_ne!(
            digest,
            NtlmAlgorithm.compute("e", &HashOptions::default()).unwrap()
        );
    }
}
