//! WPA/WPA2 PMKID

use crate::Result;
use crate::error::{InternalError, ValidationError};
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmCategory, AlgorithmDescriptor, HashAlgorithmImpl};
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

type HmacSha1 = Hmac<Sha1>;

const DEFAULT_SSID: &str = "WiFi-Network";
const MAX_SSID_LEN: usize = 32;
const PMK_ITERATIONS: u32 = 4096;
const AP_MAC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];
const CLIENT_MAC: [u8; 6] = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];

/// PMKID for a passphrase and SSID, using fixed access point and client MACs
///
/// Output is `<pmkid>*<ap mac>*<client mac>` in lowercase hex.
pub struct WpaPmkidAlgorithm;

impl HashAlgorithmImpl for WpaPmkidAlgorithm {
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::plain("wpa-pmkid", "WPA-PMKID", AlgorithmCategory::Special).salted()
    }

    fn validate(&self, options: &HashOptions) -> Result<()> {
        match options.salt() {
            Some(ssid) if ssid.len() > MAX_SSID_LEN => Err(ValidationError::invalid_options(
                "wpa-pmkid",
                "salt",
                format!("SSID must be at most {MAX_SSID_LEN} bytes"),
            )
            .into()),
            _ => Ok(()),
        }
    }

    fn validate_input(&self, text: &str) -> Result<()> {
        let length = text.chars().count();
        if !(8..=63).contains(&length) {
            return Err(ValidationError::invalid_options(
                "wpa-pmkid",
                "text",
                format!("passphrase must be 8 to 63 characters, got {length}"),
            )
            .into());
        }
        Ok(())
    }

    fn compute(&self, text: &str, options: &HashOptions) -> Result<String> {
        let ssid = options.salt().unwrap_or(DEFAULT_SSID);

        let mut pmk = Zeroizing::new([0u8; 32]);
        pbkdf2_hmac::<Sha1>(text.as_bytes(), ssid.as_bytes(), PMK_ITERATIONS, &mut pmk[..]);

        let mut mac = HmacSha1::new_from_slice(&pmk[..])
            .map_err(|err| InternalError::hash_calculation("wpa-pmkid", err.to_string()))?;
        mac.update(b"PMK Name");
        mac.update(&AP_MAC);
        mac.update(&CLIENT_MAC);
        let pmkid = mac.finalize().into_bytes();

        Ok(format!(
            "{}*{}*{}",
            hex::encode(&pmkid[..16]),
            hex::encode(AP_MAC),
            hex::encode(CLIENT_MAC)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        let digest = WpaPmkidAlgorithm
            .compute("password", &HashOptions::default())
            .unwrap();
        assert_eq!(
            digest,
            "f185b7f620367491c48665334c7f753b*001122334455*aabbccddeeff"
        );
    }

    #[test]
    fn test_ssid_changes_output() {
        let options = HashOptions::new().with_salt("HomeNetwork");
        assert_ne!(
            WpaPmkidAlgorithm.compute("password", &options).unwrap(),
            WpaPmkidAlgorithm
                .compute("password", &HashOptions::default())
                .unwrap()
        );
    }

    #[test]
    fn test_passphrase_length() {
        assert!(WpaPmkidAlgorithm.validate_input("short").is_err());
        assert!(WpaPmkidAlgorithm.validate_input(&"x".repeat(64)).is_err());
        assert!(WpaPmkidAlgorithm.validate_input("longenough").is_ok());
    }

    #[test]
    fn test_ssid_length() {
        let options = HashOptions::new().with_salt("s".repeat(33));
        assert!(WpaPmkidAlgorithm.validate(&options).is_err());
    }
}
