//! MySQL 4.1+ `PASSWORD()` hash

use crate::Result;
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use sha1::{Digest, Sha1};

/// `*` followed by the uppercase hex of SHA1(SHA1(text))
pub struct MysqlSha1Algorithm;

impl HashAlgorithmImpl for MysqlSha1Algorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("mysql-sha1", "MySQL SHA1", AlgorithmCategory::Special)
    }

    fn compute(&self, text: &str, _options: &HashOptions) -> Result<String> {
        let inner = Sha1::digest(text.as_bytes());
        let outer = Sha1::digest(inner);
        Ok(format!("*{}", hex::encode_upper(outer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        let digest = MysqlSha1Algorithm
            .compute("password", &HashOptions::default())
            .unwrap();
        assert_eq!(digest, "*2470C0C06DEE42FD1618BB99005ADCA2EC9D1E19");
    }
}
