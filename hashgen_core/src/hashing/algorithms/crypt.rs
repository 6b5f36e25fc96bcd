//! Unix crypt(3) password hashes: MD5-crypt (`$1$`), SHA-256-crypt (`$5$`)
//! and SHA-512-crypt (`$6$`)
//!
//! These follow the published algorithms exactly, so digests verify against
//! glibc and libxcrypt.

use super::check_range;
use crate::Result;
use crate::error::ValidationError;
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use crate::salt::{generate_salt, is_salt_alphabet};
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use std::fmt::Write as _;
use zeroize::Zeroizing;

/// crypt(3) base64 alphabet
const ITOA64: &[u8; 64] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const MD5_ROUNDS: u32 = 1_000;
const DEFAULT_ROUNDS: u32 = 5_000;

// Byte triples in the order the final digest is serialized
const MD5_ORDER: [[usize; 3]; 5] = [[0, 6, 12], [1, 7, 13], [2, 8, 14], [3, 9, 15], [4, 10, 5]];

const SHA256_ORDER: [[usize; 3]; 10] = [
    [0, 10, 20],
    [21, 1, 11],
    [12, 22, 2],
    [3, 13, 23],
    [24, 4, 14],
    [15, 25, 5],
    [6, 16, 26],
    [27, 7, 17],
    [18, 28, 8],
    [9, 19, 29],
];

const SHA512_ORDER: [[usize; 3]; 21] = [
    [0, 21, 42],
    [22, 43, 1],
    [44, 2, 23],
    [3, 24, 45],
    [25, 46, 4],
    [47, 5, 26],
    [6, 27, 48],
    [28, 49, 7],
    [50, 8, 29],
    [9, 30, 51],
    [31, 52, 10],
    [53, 11, 32],
    [12, 33, 54],
    [34, 55, 13],
    [56, 14, 35],
    [15, 36, 57],
    [37, 58, 16],
    [59, 17, 38],
    [18, 39, 60],
    [40, 61, 19],
    [62, 20, 41],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Md5,
    Sha256,
    Sha512,
}

impl Variant {
    fn magic(self) -> &'static str {
        match self {
            Variant::Md5 => "$1$",
            Variant::Sha256 => "$5$",
            Variant::Sha512 => "$6$",
        }
    }

    fn max_salt_len(self) -> usize {
        match self {
            Variant::Md5 => 8,
            Variant::Sha256 | Variant::Sha512 => 16,
        }
    }
}

/// One of the crypt(3) hash families
pub struct CryptAlgorithm {
    variant: Variant,
    descriptor: AlgorithmDescriptor,
}

impl CryptAlgorithm {
    pub fn md5() -> Self {
        Self {
            variant: Variant::Md5,
            descriptor: AlgorithmDescriptor::plain(
                "md5-crypt",
                "MD5-Crypt",
                AlgorithmCategory::PasswordHashing,
            )
            .salted(),
        }
    }

    pub fn sha256() -> Self {
        Self {
            variant: Variant::Sha256,
            descriptor: AlgorithmDescriptor::plain(
                "sha256-crypt",
                "SHA-256-Crypt",
                AlgorithmCategory::PasswordHashing,
            )
            .salted()
            .with_iterations(DEFAULT_ROUNDS),
        }
    }

    pub fn sha512() -> Self {
        Self {
            variant: Variant::Sha512,
            descriptor: AlgorithmDescriptor::plain(
                "sha512-crypt",
                "SHA-512-Crypt",
                AlgorithmCategory::PasswordHashing,
            )
            .salted()
            .with_iterations(DEFAULT_ROUNDS),
        }
    }
}

impl HashAlgorithmImpl for CryptAlgorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        self.descriptor
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        if let Some(salt) = options.salt()
            && !is_salt_alphabet(salt)
        {
            return Err(ValidationError::invalid_options(
                self.descriptor.id,
                "salt",
                "must only contain [A-Za-z0-9./]",
            )
            .into());
        }

        if self.variant != Variant::Md5 {
            check_range(
                self.descriptor.id,
                "iterations",
                options.iterations,
                1_000..=999_999_999,
            )?;
        }
        Ok(())
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let max_salt = self.variant.max_salt_len();
        let generated;
        let salt = match options.salt() {
            Some(salt) => truncate_salt(salt, max_salt),
            None => {
                generated = generate_salt(max_salt);
                generated.as_str()
            }
        };

        let password = text.as_bytes();
        let mut output = String::from(self.variant.magic());

        let digest = match self.variant {
            Variant::Md5 => md5_crypt(password, salt.as_bytes()),
            Variant::Sha256 | Variant::Sha512 => {
                let rounds = options.iterations_or(DEFAULT_ROUNDS);
                if rounds != DEFAULT_ROUNDS {
                    let _ = write!(output, "rounds={rounds}$");
                }
                if self.variant == Variant::Sha256 {
                    sha_crypt::<Sha256>(password, salt.as_bytes(), rounds)
                } else {
                    sha_crypt::<Sha512>(password, salt.as_bytes(), rounds)
                }
            }
        };

        output.push_str(salt);
        output.push('$');
        self.encode_digest(&digest, &mut output);
        Ok(output)
    }
}

impl CryptAlgorithm {
    fn encode_digest(&self, digest: &[u8], output: &mut String) {
        let order: &[[usize; 3]] = match self.variant {
            Variant::Md5 => &MD5_ORDER,
            Variant::Sha256 => &SHA256_ORDER,
            Variant::Sha512 => &SHA512_ORDER,
        };
        for [a, b, c] in order {
            push_b64(output, digest[*a], digest[*b], digest[*c], 4);
        }

        match self.variant {
            Variant::Md5 => push_b64(output, 0, 0, digest[11], 2),
            Variant::Sha256 => push_b64(output, 0, digest[31], digest[30], 3),
            Variant::Sha512 => push_b64(output, 0, 0, digest[63], 2),
        }
    }
}

/// Longest prefix of `salt` that fits in `max` bytes
fn truncate_salt(salt: &str, max: usize) -> &str {
    let mut end = 0;
    for (idx, ch) in salt.char_indices() {
        if idx + ch.len_utf8() > max {
            break;
        }
        end = idx + ch.len_utf8();
    }
    &salt[..end]
}

fn push_b64(output: &mut String, b2: u8, b1: u8, b0: u8, count: usize) {
    let mut word = (u32::from(b2) << 16) | (u32::from(b1) << 8) | u32::from(b0);
    for _ in 0..count {
        output.push(ITOA64[(word & 0x3f) as usize] as char);
        word >>= 6;
    }
}

/// Feed `len` bytes of `block`, repeated as needed, into `ctx`
fn update_repeated<D: Digest>(ctx: &mut D, block: &[u8], len: usize) {
    let mut remaining = len;
    while remaining > 0 {
        let take = remaining.min(block.len());
        ctx.update(&block[..take]);
        remaining -= take;
    }
}

fn md5_crypt(password: &[u8], salt: &[u8]) -> Vec<u8> {
    let alternate = Md5::new()
        .chain_update(password)
        .chain_update(salt)
        .chain_update(password)
        .finalize();

    let mut ctx = Md5::new();
    ctx.update(password);
    ctx.update(b"$1$");
    ctx.update(salt);
    update_repeated(&mut ctx, &alternate, password.len());

    let mut bits = password.len();
    while bits > 0 {
        if bits & 1 == 1 {
            ctx.update([0u8]);
        } else {
            ctx.update(&password[..1]);
        }
        bits >>= 1;
    }

    let mut digest = ctx.finalize();
    for round in 0..MD5_ROUNDS {
        let mut ctx = Md5::new();
        if round & 1 == 1 {
            ctx.update(password);
        } else {
            ctx.update(&digest);
        }
        if round % 3 != 0 {
            ctx.update(salt);
        }
        if round % 7 != 0 {
            ctx.update(password);
        }
        if round & 1 == 1 {
            ctx.update(&digest);
        } else {
            ctx.update(password);
        }
        digest = ctx.finalize();
    }

    digest.to_vec()
}

fn sha_crypt<D: Digest>(password: &[u8], salt: &[u8], rounds: u32) -> Vec<u8> {
    let alternate = D::new()
        .chain_update(password)
        .chain_update(salt)
        .chain_update(password)
        .finalize();

    let mut ctx = D::new();
    ctx.update(password);
    ctx.update(salt);
    update_repeated(&mut ctx, &alternate, password.len());

    let mut bits = password.len();
    while bits > 0 {
        if bits & 1 == 1 {
            ctx.update(&alternate);
        } else {
            ctx.update(password);
        }
        bits >>= 1;
    }
    let initial = ctx.finalize();

    let mut ctx = D::new();
    for _ in 0..password.len() {
        ctx.update(password);
    }
    let p_bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
        ctx.finalize()
            .iter()
            .copied()
            .cycle()
            .take(password.len())
            .collect(),
    );

    let mut ctx = D::new();
    for _ in 0..16 + usize::from(initial[0]) {
        ctx.update(salt);
    }
    let s_bytes: Vec<u8> = ctx
        .finalize()
        .iter()
        .copied()
        .cycle()
        .take(salt.len())
        .collect();

    let mut digest = initial;
    for round in 0..rounds {
        let mut ctx = D::new();
        if round & 1 == 1 {
            ctx.update(p_bytes.as_slice());
        } else {
            ctx.update(&digest);
        }
        if round % 3 != 0 {
            ctx.update(&s_bytes);
        }
        if round % 7 != 0 {
            ctx.update(p_bytes.as_slice());
        }
        if round & 1 == 1 {
            ctx.update(&digest);
        } else {
            ctx.update(p_bytes.as_slice());
        }
        digest = ctx.finalize();
    }

    digest.to_vec()
}
