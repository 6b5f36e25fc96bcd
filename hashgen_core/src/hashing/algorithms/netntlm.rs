//! NetNTLMv2 challenge response

use super::nt_hash;
use crate::Result;
use crate::error::{InternalError, ValidationError};
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use crate::salt::fill_random;
use hmac::{Hmac, Mac};
use md5::Md5;

type HmacMd5 = Hmac<Md5>;

const CHALLENGE_LEN: usize = 8;

/// HMAC-MD5 keyed with the NT hash over an 8-byte server challenge
///
/// The `salt` option carries the challenge as 16 hex characters. Output is
/// `<response hex>:<challenge hex>`.
pub struct NetNtlmV2Algorithm;

fn parse_challenge(salt: &str) -> Result<[u8; CHALLENGE_LEN]> {
    let invalid = || {
        ValidationError::invalid_options(
            "netntlmv2",
            "salt",
            format!("challenge must be {} hex characters", CHALLENGE_LEN * 2),
        )
    };

    let bytes = hex::decode(salt).map_err(|_| invalid())?;
    <[u8; CHALLENGE_LEN]>::try_from(bytes.as_slice()).map_err(|_| invalid().into())
}

impl HashAlgorithmImpl for NetNtlmV2Algorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("netntlmv2", "NetNTLMv2", AlgorithmCategory::Special).salted()
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        if let Some(salt) = options.salt() {
            parse_challenge(salt)?;
        }
        Ok(())
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let challenge = match options.salt() {
            Some(salt) => parse_challenge(salt)?,
            None => {
                let mut challenge = [0u8; CHALLENGE_LEN];
                fill_random(&mut challenge);
                challenge
            }
        };

        let mut mac = HmacMd5::new_from_slice(&nt_hash(text))
            .map_err(|err| InternalError::hash_calculation("netntlmv2", err.to_string()))?;
        mac.update(&challenge);
        let response = mac.finalize().into_bytes();

        Ok(format!(
            "{}:{}",
            hex::encode(response),
            hex::encode(challenge)
        ))
    }
}
