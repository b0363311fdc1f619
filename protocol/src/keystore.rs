//! # Keystore Schema
//!
//! Serde types for the version-3 keystore JSON document that wallets
//! exchange. This library only reads and writes the *schema* — the KDF,
//! cipher and MAC arithmetic that fills it in belongs to the wallet
//! layer, which hands raw private-key bytes across the boundary.
//!
//! Field order matches the conventional document layout, so a parsed
//! keystore re-serializes with the same shape it arrived in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::Address;

/// The only document version this schema describes.
pub const KEYSTORE_VERSION: u32 = 3;

/// Errors from keystore document handling.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// The document is not valid JSON, or does not match the schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A document with a version this schema does not describe.
    #[error("unsupported keystore version {got}, expected {KEYSTORE_VERSION}")]
    UnsupportedVersion {
        /// Version declared by the document.
        got: u32,
    },
}

/// A version-3 keystore document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystore {
    /// Document format version. Always 3.
    pub version: u32,
    /// Random UUID naming this particular document.
    pub id: String,
    /// Display address of the stored key.
    pub address: Address,
    /// The encrypted key material and the parameters to unlock it.
    pub crypto: CryptoParams,
}

impl Keystore {
    /// Parse a keystore document, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, KeystoreError> {
        let keystore: Keystore = serde_json::from_str(json)?;
        if keystore.version != KEYSTORE_VERSION {
            return Err(KeystoreError::UnsupportedVersion {
                got: keystore.version,
            });
        }
        Ok(keystore)
    }

    /// Serialize back to compact JSON.
    pub fn to_json(&self) -> Result<String, KeystoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The `crypto` object: ciphertext plus everything needed to derive the
/// decryption key and verify the passphrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoParams {
    /// Hex-encoded encrypted private key.
    pub ciphertext: String,
    /// Cipher initialization parameters.
    pub cipherparams: CipherParams,
    /// Cipher name, conventionally `aes-128-ctr`.
    pub cipher: String,
    /// Key-derivation function name, `scrypt` or `pbkdf2`.
    pub kdf: String,
    /// Parameters for the named KDF.
    pub kdfparams: KdfParams,
    /// Hex-encoded Keccak-256 MAC binding the derived key to the
    /// ciphertext. A mismatch on decrypt means a wrong passphrase.
    pub mac: String,
}

/// Cipher initialization parameters. CTR-mode ciphers only need the IV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    /// Hex-encoded initialization vector.
    pub iv: String,
}

/// KDF parameters. The scrypt cost fields and the pbkdf2 fields are both
/// optional so one schema covers either function; whichever the `kdf`
/// field names must have its parameters present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Derived key length in bytes.
    pub dklen: u32,
    /// Hex-encoded salt.
    pub salt: String,
    /// scrypt CPU/memory cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// scrypt block size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    /// scrypt parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// pbkdf2 iteration count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<u32>,
    /// pbkdf2 pseudo-random function, conventionally `hmac-sha256`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A real scrypt keystore produced by a known-good wallet.
    const REFERENCE: &str = r#"{"version":3,"id":"fc64a970-117a-4507-925b-4107b761d361","address":"INT3CTuDn49ET2dgMWBRauQMnnQECZy9","crypto":{"ciphertext":"f6bde26131cf6c26a87c3bfdfeae8426b564e7263a1238e2bdce9da36c7fdc20","cipherparams":{"iv":"75df1a41193930a895721c0f077b2be7"},"cipher":"aes-128-ctr","kdf":"scrypt","kdfparams":{"dklen":32,"salt":"dd8233d31da738ee24a4c9926bfe8f67971dc8780fda8809c02713533414ed15","n":8192,"r":8,"p":1},"mac":"735c0d711f712dbcaea783bf94b108a5ef681657a340f7f662fa6925e2defcb6"}}"#;

    #[test]
    fn parses_the_reference_document() {
        let keystore = Keystore::from_json(REFERENCE).unwrap();
        assert_eq!(keystore.version, 3);
        assert_eq!(keystore.id, "fc64a970-117a-4507-925b-4107b761d361");
        assert_eq!(
            keystore.address.as_str(),
            "INT3CTuDn49ET2dgMWBRauQMnnQECZy9"
        );
        assert_eq!(keystore.crypto.cipher, "aes-128-ctr");
        assert_eq!(keystore.crypto.kdf, "scrypt");
        assert_eq!(keystore.crypto.kdfparams.dklen, 32);
        assert_eq!(keystore.crypto.kdfparams.n, Some(8192));
        assert_eq!(keystore.crypto.kdfparams.r, Some(8));
        assert_eq!(keystore.crypto.kdfparams.p, Some(1));
        assert_eq!(keystore.crypto.kdfparams.c, None);
    }

    #[test]
    fn round_trips_byte_for_byte() {
        let keystore = Keystore::from_json(REFERENCE).unwrap();
        assert_eq!(keystore.to_json().unwrap(), REFERENCE);
    }

    #[test]
    fn rejects_other_versions() {
        let doc = REFERENCE.replacen("\"version\":3", "\"version\":4", 1);
        assert!(matches!(
            Keystore::from_json(&doc),
            Err(KeystoreError::UnsupportedVersion { got: 4 })
        ));
    }

    #[test]
    fn rejects_invalid_addresses() {
        let doc = REFERENCE.replacen("INT3CTuDn49ET2dgMWBRauQMnnQECZy9", "not-an-address", 1);
        assert!(Keystore::from_json(&doc).is_err());
    }
}
