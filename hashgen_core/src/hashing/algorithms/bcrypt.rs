//! bcrypt (`$2a$`)

use super::check_range;
use crate::Result;
use crate::error::{InternalError, ValidationError};
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use crate::salt::fill_random;
use bcrypt::{Version, hash_with_salt};

const DEFAULT_COST: u32 = 10;
const SALT_LEN: usize = 16;
const ENCODED_SALT_LEN: usize = 22;

/// bcrypt's own base64 alphabet
const BCRYPT_ALPHABET: &[u8; 64] =
    b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub struct BcryptAlgorithm;

impl HashAlgorithmImpl for BcryptAlgorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("bcrypt", "bcrypt", AlgorithmCategory::PasswordHashing)
            .salted()
            .with_cost_factor(DEFAULT_COST)
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        check_range("bcrypt", "cost_factor", options.cost_factor, 4..=31)?;
        if let Some(salt) = options.salt() {
            parse_salt(salt)?;
        }
        Ok(())
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let salt = match options.salt() {
            Some(salt) => parse_salt(salt)?,
            None => {
                let mut salt = [0u8; SALT_LEN];
                fill_random(&mut salt);
                salt
            }
        };

        let parts = hash_with_salt(text, options.cost_factor_or(DEFAULT_COST), salt)
            .map_err(|err| InternalError::hash_calculation("bcrypt", err.to_string()))?;
        Ok(parts.format_for_version(Version::TwoA))
    }
}

/// Accept either 16 raw bytes or a 22 character bcrypt-base64 salt
fn parse_salt(salt: &str) -> Result<[u8; SALT_LEN]> {
    if salt.len() == ENCODED_SALT_LEN
        && let Some(decoded) = decode_bcrypt_base64(salt)
    {
        return Ok(decoded);
    }

    <[u8; SALT_LEN]>::try_from(salt.as_bytes()).map_err(|_| {
        ValidationError::invalid_options(
            "bcrypt",
            "salt",
            format!(
                "expected {SALT_LEN} raw bytes or {ENCODED_SALT_LEN} bcrypt-base64 characters, got {} bytes",
                salt.len()
            ),
        )
        .into()
    })
}

fn decode_bcrypt_base64(input: &str) -> Option<[u8; SALT_LEN]> {
    let mut decoded = Vec::with_capacity(SALT_LEN + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0u8;

    for byte in input.bytes() {
        let value = BCRYPT_ALPHABET.iter().position(|&c| c == byte)? as u32;
        buffer = (buffer << 6) | value;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            decoded.push(((buffer >> bits) & 0xff) as u8);
        }
    }

    // Leftover bits must be zero, otherwise the salt would be re-encoded
    // differently in the output
    if buffer & ((1 << bits) - 1) != 0 {
        return None;
    }
    decoded.try_into().ok()
}
