//! Salt and random byte generation
//!
//! The operating system CSPRNG is used whenever it is available. If it fails
//! the generator falls back to a time-seeded PRNG and logs a warning, since the
//! fallback makes salts predictable.

use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// The 64-symbol alphabet salts are drawn from
pub const SALT_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789./";

/// Default salt length in characters
pub const DEFAULT_SALT_LENGTH: usize = 16;

/// Where the random bytes behind a salt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomSource {
    /// Operating system CSPRNG
    Os,
    /// Time-seeded PRNG used when the OS source failed
    Fallback,
}

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fill `buf` with random bytes, reporting which source was used
pub fn fill_random(buf: &mut [u8]) -> RandomSource {
    match getrandom::fill(buf) {
        Ok(()) => RandomSource::Os,
        Err(err) => {
            log::warn!("OS random source unavailable ({err}); using weaker fallback PRNG");
            fallback_fill(buf);
            RandomSource::Fallback
        }
    }
}

fn fallback_fill(buf: &mut [u8]) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut rng = StdRng::seed_from_u64(nanos ^ counter.rotate_left(32));
    rng.fill_bytes(buf);
}

/// Random bytes of the given length
pub fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    fill_random(&mut bytes);
    bytes
}

/// Map random bytes onto the salt alphabet
fn encode_salt(bytes: &[u8]) -> String {
    // 256 is a multiple of 64, so the modulo keeps the distribution uniform
    bytes
        .iter()
        .map(|b| SALT_ALPHABET[(*b as usize) % SALT_ALPHABET.len()] as char)
        .collect()
}

/// Generate a salt and report which random source produced it
pub fn generate_salt_with_source(length: usize) -> (String, RandomSource) {
    let mut bytes = vec![0u8; length];
    let source = fill_random(&mut bytes);
    (encode_salt(&bytes), source)
}

/// Generate a salt of `length` characters from [`SALT_ALPHABET`]
pub fn generate_salt(length: usize) -> String {
    generate_salt_with_source(length).0
}

/// Whether every character of `salt` belongs to [`SALT_ALPHABET`]
pub fn is_salt_alphabet(salt: &str) -> bool {
    salt.bytes().all(|b| SALT_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_length_and_alphabet() {
        for length in [0, 1, 8, 16, 64, 100] {
            let salt = generate_salt(length);
            assert_eq!(salt.len(), length);
            assert!(is_salt_alphabet(&salt));
        }
    }

    #[test]
    fn test_successive_salts_differ() {
        assert_ne!(generate_salt(16), generate_salt(16));
    }

    #[test]
    fn test_os_source_is_used() {
        let (_, source) = generate_salt_with_source(16);
        assert_eq!(source, RandomSource::Os);
    }

    #[test]
    fn test_fallback_fill_produces_distinct_output() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fallback_fill(&mut a);
        fallback_fill(&mut b);
        assert_ne!(a, b);
        assert!(is_salt_alphabet(&encode_salt(&a)));
    }

    #[test]
    fn test_encode_salt_wraps_bytes() {
        assert_eq!(encode_salt(&[0, 63, 64, 255]), "A/A/");
    }
}
