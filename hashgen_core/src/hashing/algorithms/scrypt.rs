//! scrypt, and the yescrypt-style rendering built on the same core
//!
//! yescrypt output only borrows the `$y$` serialization. The key is a plain
//! scrypt key, so it will not verify against libxcrypt.

use super::check_range;
use crate::Result;
use crate::error::InternalError;
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use crate::salt::random_bytes;
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use scrypt::{Params, scrypt as derive_key};
use zeroize::Zeroizing;

const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;
const KEY_LEN: usize = 32;
const RANDOM_SALT_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rendering {
    Scrypt,
    Yescrypt,
}

pub struct ScryptAlgorithm {
    rendering: Rendering,
    descriptor: AlgorithmDescriptor,
}

impl ScryptAlgorithm {
    pub fn scrypt() -> Self {
        Self {
            rendering: Rendering::Scrypt,
            descriptor: AlgorithmDescriptor::plain("scrypt", "scrypt", AlgorithmCategory::Modern)
                .salted()
                .with_cost_factor(15),
        }
    }

    pub fn yescrypt() -> Self {
        Self {
            rendering: Rendering::Yescrypt,
            descriptor: AlgorithmDescriptor::plain(
                "yescrypt",
                "yescrypt (approximation)",
                AlgorithmCategory::Modern,
            )
            .salted()
            .with_cost_factor(14),
        }
    }

    fn log_n(&self, options: &HashOptions) -> u32 {
        options.cost_factor_or(self.descriptor.default_cost_factor.unwrap_or(15))
    }
}

impl HashAlgorithmImpl for ScryptAlgorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        self.descriptor
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        check_range(self.descriptor.id, "cost_factor", options.cost_factor, 1..=18)
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let id = self.descriptor.id;
        let log_n = self.log_n(options);
        let salt = match options.salt() {
            Some(salt) => salt.as_bytes().to_vec(),
            None => random_bytes(RANDOM_SALT_LEN),
        };

        let params = u8::try_from(log_n)
            .map_err(|err| err.to_string())
            .and_then(|log_n| {
                Params::new(log_n, BLOCK_SIZE, PARALLELISM, KEY_LEN).map_err(|err| err.to_string())
            })
            .map_err(|message| InternalError::hash_calculation(id, message))?;

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        derive_key(text.as_bytes(), &salt, &params, &mut key[..])
            .map_err(|err| InternalError::hash_calculation(id, err.to_string()))?;

        let salt = STANDARD_NO_PAD.encode(&salt);
        let key = STANDARD_NO_PAD.encode(&key[..]);
        Ok(match self.rendering {
            Rendering::Scrypt => {
                format!("$scrypt$ln={log_n},r={BLOCK_SIZE},p={PARALLELISM}${salt}${key}")
            }
            Rendering::Yescrypt => format!("$y$j9T${salt}${key}"),
        })
    }
}
