//! Hash algorithm implementations

use super::registry::AlgorithmRegistry;
use super::traits::{AlgorithmCategory, AlgorithmDescriptor};
use crate::error::ValidationError;
use md4::Md4;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

mod argon2;
mod bcrypt;
mod crypt;
mod digest;
mod mysql;
mod netntlm;
mod ntlm;
mod pbkdf2;
mod scrypt;
mod wpa;

/// Register all built-in algorithms with the registry
pub(crate) fn register_all(registry: &mut AlgorithmRegistry) {
    use AlgorithmCategory::Basic;

    registry.register(digest::DigestAlgorithm::<Md5>::new(
        AlgorithmDescriptor::plain("md5", "MD5", Basic),
    ));
    registry.register(digest::DigestAlgorithm::<Sha1>::new(
        AlgorithmDescriptor::plain("sha1", "SHA1", Basic),
    ));
    registry.register(digest::DigestAlgorithm::<Sha224>::new(
        AlgorithmDescriptor::plain("sha224", "SHA224", Basic),
    ));
    registry.register(digest::DigestAlgorithm::<Sha256>::new(
        AlgorithmDescriptor::plain("sha256", "SHA256", Basic),
    ));
    registry.register(digest::DigestAlgorithm::<Sha384>::new(
        AlgorithmDescriptor::plain("sha384", "SHA384", Basic),
    ));
    registry.register(digest::DigestAlgorithm::<Sha512>::new(
        AlgorithmDescriptor::plain("sha512", "SHA512", Basic),
    ));

    registry.register(mysql::MysqlSha1Algorithm);
    registry.register(ntlm::NtlmAlgorithm);
    registry.register(pbkdf2::Pbkdf2Algorithm);
    registry.register(crypt::CryptAlgorithm::md5());
    registry.register(crypt::CryptAlgorithm::sha256());
    registry.register(crypt::CryptAlgorithm::sha512());
    registry.register(bcrypt::BcryptAlgorithm);
    registry.register(argon2::Argon2Algorithm);
    registry.register(scrypt::ScryptAlgorithm::scrypt());
    registry.register(scrypt::ScryptAlgorithm::yescrypt());
    registry.register(netntlm::NetNtlmV2Algorithm);
    registry.register(wpa::WpaPmkidAlgorithm);
}

/// NT hash: MD4 over the UTF-16LE encoding of `text`
pub(crate) fn nt_hash(text: &str) -> [u8; 16] {
    use md4::Digest;
    use zeroize::Zeroizing;

    let encoded: Zeroizing<Vec<u8>> =
        Zeroizing::new(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    Md4::digest(encoded.as_slice()).into()
}

/// Reject `value` unless it lies within `range`
pub(crate) fn check_range(
    algorithm: &str,
    option: &str,
    value: Option<u32>,
    range: std::ops::RangeInclusive<u32>,
) -> crate::Result<()> {
    match value {
        Some(value) if !range.contains(&value) => Err(ValidationError::invalid_options(
            algorithm,
            option,
            format!(
                "{value} is outside {}..={}",
                range.start(),
                range.end()
            ),
        )
        .into()),
        _ => Ok(()),
    }
}
