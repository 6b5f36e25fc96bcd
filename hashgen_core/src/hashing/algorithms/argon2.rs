//! Argon2id v1.3 in PHC string format

use super::check_range;
use crate::Result;
use crate::error::{InternalError, ValidationError};
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use crate::salt::random_bytes;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

const DEFAULT_TIME_COST: u32 = 3;
/// log2 of the memory cost in KiB
const DEFAULT_MEMORY_EXPONENT: u32 = 16;
/// 2^20 KiB is 1 GiB. A failed block allocation aborts the process rather
/// than unwinding, so larger memory costs are refused up front.
const MAX_MEMORY_EXPONENT: u32 = 20;
const PARALLELISM: u32 = 4;
const OUTPUT_LEN: usize = 32;
const RANDOM_SALT_LEN: usize = 16;
const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 48;

pub struct Argon2Algorithm;

impl Argon2Algorithm {
    fn hasher(options: &HashOptions) -> Result<Argon2<'static>> {
        let memory_kib = 1u32
            .checked_shl(options.cost_factor_or(DEFAULT_MEMORY_EXPONENT))
            .unwrap_or(u32::MAX);
        let time_cost = options.iterations_or(DEFAULT_TIME_COST);
        let params = Params::new(memory_kib, time_cost, PARALLELISM, Some(OUTPUT_LEN))
            .map_err(|err| InternalError::hash_calculation("argon2", err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl HashAlgorithmImpl for Argon2Algorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("argon2", "Argon2id", AlgorithmCategory::Modern)
            .salted()
            .with_iterations(DEFAULT_TIME_COST)
            .with_cost_factor(DEFAULT_MEMORY_EXPONENT)
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        check_range("argon2", "iterations", options.iterations, 1..=100)?;
        check_range("argon2", "cost_factor", options.cost_factor, 5..=MAX_MEMORY_EXPONENT)?;

        if let Some(salt) = options.salt()
            && !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt.len())
        {
            return Err(ValidationError::invalid_options(
                "argon2",
                "salt",
                format!("must be {MIN_SALT_LEN} to {MAX_SALT_LEN} bytes"),
            )
            .into());
        }
        Ok(())
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let salt_bytes = match options.salt() {
            Some(salt) => salt.as_bytes().to_vec(),
            None => random_bytes(RANDOM_SALT_LEN),
        };
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| InternalError::hash_calculation("argon2", err.to_string()))?;

        let hash = Self::hasher(options)?
            .hash_password(text.as_bytes(), &salt)
            .map_err(|err| InternalError::hash_calculation("argon2", err.to_string()))?;
        Ok(hash.to_string())
    }
}
