//! Hash format detection
//!
//! Classifies an opaque string into a best-guess hash family using an ordered
//! table of structural rules. Delimited formats are tried before bare hex so a
//! `$`-prefixed crypt string is never mistaken for a plain digest.
//!
//! MD5 and NTLM share the same 32-hex-character shape. MD5 is listed first, so
//! [`detect`] never reports NTLM; [`detect_all`] returns both.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Hash family reported by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HashFamily {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Ntlm,
    MysqlSha1,
    Md5Crypt,
    Bcrypt,
    Sha256Crypt,
    Sha512Crypt,
    Pbkdf2,
    Argon2,
    Scrypt,
    Yescrypt,
    NetNtlmV2,
    WpaPmkid,
    Unknown,
}

impl HashFamily {
    /// Registry id of the algorithm producing this family, if any
    pub fn algorithm_id(&self) -> Option<&'static str> {
        let id = match self {
            HashFamily::Md5 => "md5",
            HashFamily::Sha1 => "sha1",
            HashFamily::Sha224 => "sha224",
            HashFamily::Sha256 => "sha256",
            HashFamily::Sha384 => "sha384",
            HashFamily::Sha512 => "sha512",
            HashFamily::Ntlm => "ntlm",
            HashFamily::MysqlSha1 => "mysql-sha1",
            HashFamily::Md5Crypt => "md5-crypt",
            HashFamily::Bcrypt => "bcrypt",
            HashFamily::Sha256Crypt => "sha256-crypt",
            HashFamily::Sha512Crypt => "sha512-crypt",
            HashFamily::Pbkdf2 => "pbkdf2",
            HashFamily::Argon2 => "argon2",
            HashFamily::Scrypt => "scrypt",
            HashFamily::Yescrypt => "yescrypt",
            HashFamily::NetNtlmV2 => "netntlmv2",
            HashFamily::WpaPmkid => "wpa-pmkid",
            HashFamily::Unknown => return None,
        };
        Some(id)
    }
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashFamily::Md5 => "MD5",
            HashFamily::Sha1 => "SHA1",
            HashFamily::Sha224 => "SHA224",
            HashFamily::Sha256 => "SHA256",
            HashFamily::Sha384 => "SHA384",
            HashFamily::Sha512 => "SHA512",
            HashFamily::Ntlm => "NTLM",
            HashFamily::MysqlSha1 => "MySQL-SHA1",
            HashFamily::Md5Crypt => "MD5-Crypt",
            HashFamily::Bcrypt => "bcrypt",
            HashFamily::Sha256Crypt => "SHA-256-Crypt",
            HashFamily::Sha512Crypt => "SHA-512-Crypt",
            HashFamily::Pbkdf2 => "PBKDF2",
            HashFamily::Argon2 => "Argon2",
            HashFamily::Scrypt => "scrypt",
            HashFamily::Yescrypt => "yescrypt",
            HashFamily::NetNtlmV2 => "NetNTLMv2",
            HashFamily::WpaPmkid => "WPA-PMKID",
            HashFamily::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Detector verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HashDetection {
    pub family: HashFamily,
    /// 0..=100
    pub confidence: u8,
}

impl HashDetection {
    pub const UNKNOWN: HashDetection = HashDetection {
        family: HashFamily::Unknown,
        confidence: 0,
    };

    pub fn is_unknown(&self) -> bool {
        self.family == HashFamily::Unknown
    }
}

struct Rule {
    family: HashFamily,
    confidence: u8,
    pattern: Regex,
}

// Most specific first
const RULE_TABLE: &[(HashFamily, u8, &str)] = &[
    (
        HashFamily::Md5Crypt,
        95,
        r"^\$1\$[a-z0-9./]{0,8}\$[a-z0-9./]{22}$",
    ),
    (HashFamily::Bcrypt, 95, r"^\$2[ayb]\$[0-9]{2}\$[a-z0-9./]{53}$"),
    (
        HashFamily::Sha256Crypt,
        95,
        r"^\$5\$(rounds=[0-9]+\$)?[a-z0-9./]{0,16}\$[a-z0-9./]{43}$",
    ),
    (
        HashFamily::Sha512Crypt,
        95,
        r"^\$6\$(rounds=[0-9]+\$)?[a-z0-9./]{0,16}\$[a-z0-9./]{86}$",
    ),
    (
        HashFamily::Pbkdf2,
        95,
        r"^\$pbkdf2(-sha[0-9]+)?\$[0-9]+\$[a-z0-9./+]*={0,2}\$[a-z0-9./+]+={0,2}$",
    ),
    (
        HashFamily::Argon2,
        95,
        r"^\$argon2id?\$v=[0-9]+\$m=[0-9]+,t=[0-9]+,p=[0-9]+\$[a-z0-9./+]+\$[a-z0-9./+]+$",
    ),
    (
        HashFamily::Scrypt,
        95,
        r"^\$scrypt\$[a-z0-9=,]+\$[a-z0-9./+]+\$[a-z0-9./+]+$",
    ),
    (
        HashFamily::Yescrypt,
        95,
        r"^\$y\$[a-z0-9./+]+\$[a-z0-9./+]+\$[a-z0-9./+]+$",
    ),
    (HashFamily::MysqlSha1, 95, r"^\*[a-f0-9]{40}$"),
    (
        HashFamily::WpaPmkid,
        90,
        r"^[a-f0-9]{32}\*[a-f0-9]{12}\*[a-f0-9]{12}$",
    ),
    (HashFamily::NetNtlmV2, 90, r"^[a-f0-9]{32}:[a-f0-9]+$"),
    (HashFamily::Md5, 90, r"^[a-f0-9]{32}$"),
    (HashFamily::Sha1, 90, r"^[a-f0-9]{40}$"),
    (HashFamily::Sha224, 90, r"^[a-f0-9]{56}$"),
    (HashFamily::Sha256, 90, r"^[a-f0-9]{64}$"),
    (HashFamily::Sha384, 90, r"^[a-f0-9]{96}$"),
    (HashFamily::Sha512, 90, r"^[a-f0-9]{128}$"),
    (HashFamily::Ntlm, 60, r"^[a-f0-9]{32}$"),
];

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .filter_map(|&(family, confidence, pattern)| {
            match Regex::new(&format!("(?i){pattern}")) {
                Ok(pattern) => Some(Rule {
                    family,
                    confidence,
                    pattern,
                }),
                Err(err) => {
                    log::error!("Skipping detection rule for {family}: {err}");
                    None
                }
            }
        })
        .collect()
});

fn matching_rules(hash: &str) -> impl Iterator<Item = HashDetection> + '_ {
    let hash = hash.trim();
    RULES
        .iter()
        .filter(move |rule| !hash.is_empty() && rule.pattern.is_match(hash))
        .map(|rule| HashDetection {
            family: rule.family,
            confidence: rule.confidence,
        })
}

/// Best-guess family for `hash`; surrounding whitespace is ignored
pub fn detect(hash: &str) -> HashDetection {
    matching_rules(hash)
        .next()
        .unwrap_or(HashDetection::UNKNOWN)
}

/// Every family whose shape matches `hash`, most specific first
pub fn detect_all(hash: &str) -> Vec<HashDetection> {
    matching_rules(hash).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(RULES.len(), RULE_TABLE.len());
    }

    #[test]
    fn test_empty_and_garbage_are_unknown() {
        assert_eq!(detect(""), HashDetection::UNKNOWN);
        assert_eq!(detect("   "), HashDetection::UNKNOWN);
        assert_eq!(detect("not a hash"), HashDetection::UNKNOWN);
        assert!(detect_all("").is_empty());
    }

    #[test]
    fn test_bare_hex_lengths() {
        let cases = [
            (32, HashFamily::Md5),
            (40, HashFamily::Sha1),
            (56, HashFamily::Sha224),
            (64, HashFamily::Sha256),
            (96, HashFamily::Sha384),
            (128, HashFamily::Sha512),
        ];
        for (length, family) in cases {
            let detection = detect(&"a".repeat(length));
            assert_eq!(detection.family, family, "length {length}");
            assert_eq!(detection.confidence, 90);
        }
        assert!(detect(&"a".repeat(33)).is_unknown());
    }

    #[test]
    fn test_md5_shadows_ntlm() {
        let hash = "8846f7eaee8fb117ad06bdd830b7586c";
        assert_eq!(detect(hash).family, HashFamily::Md5);

        let all = detect_all(hash);
        assert_eq!(
            all.iter().map(|d| d.family).collect::<Vec<_>>(),
            vec![HashFamily::Md5, HashFamily::Ntlm]
        );
        assert_eq!(all[1].confidence, 60);
    }

    #[test]
    fn test_formatted_hashes() {
        let cases = [
            ("$1$xxxxxxxx$UYCIxa628.9qXjpQCjM4a.", HashFamily::Md5Crypt),
            (
                "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW",
                HashFamily::Bcrypt,
            ),
            (
                "$5$rounds=10000$saltstringsaltst$3xv.VbSHBb41AL9AvLeujZkZRBAwqFMz2.opqey6IcA",
                HashFamily::Sha256Crypt,
            ),
            (
                "*2470C0C06DEE42FD1618BB99005ADCA2EC9D1E19",
                HashFamily::MysqlSha1,
            ),
            (
                "02d2c7bb54d524de46ea95c6b4d52c05:1122334455667788",
                HashFamily::NetNtlmV2,
            ),
            (
                "f185b7f620367491c48665334c7f753b*001122334455*aabbccddeeff",
                HashFamily::WpaPmkid,
            ),
            (
                "$scrypt$ln=4,r=8,p=1$TmFDbA$9d+zly55CLIkEMXF83iJB829GnmXGxIndQK9Snfm1dM",
                HashFamily::Scrypt,
            ),
            // PBKDF2 without a salt leaves the salt field empty
            (
                "$pbkdf2$10$$+uAkOeTfGXBgET96ImWWmZ/i6VfHcFhIWJPUszhV72M=",
                HashFamily::Pbkdf2,
            ),
        ];
        for (hash, family) in cases {
            let detection = detect(hash);
            assert_eq!(detection.family, family, "{hash}");
            assert!(detection.confidence >= 90);
        }
    }

    #[test]
    fn test_input_is_trimmed_and_case_insensitive() {
        let detection = detect("  900150983CD24FB0D6963F7D28E17F72\n");
        assert_eq!(detection.family, HashFamily::Md5);
    }

    #[test]
    fn test_family_mapping() {
        assert_eq!(HashFamily::Sha512Crypt.algorithm_id(), Some("sha512-crypt"));
        assert_eq!(HashFamily::Unknown.algorithm_id(), None);
        assert_eq!(HashFamily::NetNtlmV2.to_string(), "NetNTLMv2");
    }
}
