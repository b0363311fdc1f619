//! # Accounts, Addresses and Signatures
//!
//! The identity layer of the library: secp256k1 keypairs, the Base58Check
//! display address derived from them, and the recoverable ECDSA signatures
//! they produce.
//!
//! ## Address Derivation
//!
//! ```text
//! private key ─► uncompressed public key (65 bytes, 0x04-prefixed)
//!             ─► RIPEMD-160(SHA-256(point))            (hash160, 20 bytes)
//!             ─► Base58Check(0x05 ‖ hash160)
//!             ─► "INT" + first 29 characters           (32-char display form)
//! ```
//!
//! Derivation is deterministic: the same private key always yields the
//! same address. The display string itself is what travels in
//! transactions, not the underlying hash.
//!
//! ## Recoverable Signatures
//!
//! Signatures carry `r`, `s` and a recovery value `v`. The parity of the
//! recovered public key is folded into `v` together with an offset:
//! `27` for plain message signing, `chain_id * 2 + 35` for transactions.
//! Signing is deterministic (RFC 6979) and always produces the canonical
//! low-`s` form, so signing the same digest twice yields identical bytes.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bytes::{self, BytesError};
use crate::config::{
    ADDRESS_CHECKSUM_CHARS, ADDRESS_LENGTH, ADDRESS_PREFIX, ADDRESS_VERSION, BASE58_ALPHABET,
    MESSAGE_V_OFFSET, SIGNATURE_COMPONENT_LENGTH,
};
use crate::crypto::{hash160, keccak256};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from key handling, signing and recovery.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The private key is not a valid secp256k1 scalar (zero, out of
    /// range, or not 32 bytes).
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidPrivateKey,

    /// Hex input that could not be parsed.
    #[error(transparent)]
    MalformedHex(#[from] BytesError),

    /// A serialized signature shorter than the fixed `r ‖ s` prefix.
    #[error("malformed signature: need at least {needed} bytes, got {got}")]
    MalformedSignature {
        /// Minimum length of a serialized signature.
        needed: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// The signing operation itself failed.
    #[error("signing failed")]
    SigningFailed,

    /// No public key could be recovered from the digest and signature.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// An address string that fails validation.
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        /// The rejected string, verbatim.
        address: String,
        /// Which rule it broke.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A validated 32-character display address.
///
/// Construction goes through [`Address::new`] (or serde deserialization),
/// so holding an `Address` is proof the string passed the shape checks:
/// exactly [`ADDRESS_LENGTH`] characters, the case-sensitive
/// [`ADDRESS_PREFIX`], and only Base58 alphabet characters after it.
///
/// Validation is purely syntactic. The embedded checksum is *not*
/// verified, because the display form truncates the Base58Check string
/// and the full checksum is no longer recoverable from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate and wrap a display address.
    pub fn new(address: impl Into<String>) -> Result<Self, AccountError> {
        let address = address.into();
        match Self::check(&address) {
            None => Ok(Address(address)),
            Some(reason) => Err(AccountError::InvalidAddress { address, reason }),
        }
    }

    /// Whether a string is a well-formed display address.
    pub fn is_valid(address: &str) -> bool {
        Self::check(address).is_none()
    }

    /// The rule the string breaks, or `None` if it is well-formed.
    fn check(address: &str) -> Option<&'static str> {
        if address.len() != ADDRESS_LENGTH {
            return Some("must be exactly 32 characters");
        }
        // Case-sensitive: "int3", "InT3" and friends are all invalid.
        if !address.starts_with(ADDRESS_PREFIX) {
            return Some("must start with the INT3 prefix");
        }
        let tail = &address.as_bytes()[ADDRESS_PREFIX.len()..];
        if tail.iter().any(|c| !BASE58_ALPHABET.contains(c)) {
            return Some("contains characters outside the Base58 alphabet");
        }
        None
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AccountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Address::new(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> String {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A recoverable ECDSA signature: fixed-width `r` and `s` plus the
/// unbounded recovery value `v`.
///
/// `v` is a [`BigUint`] rather than a machine integer because the
/// transaction scheme folds `chain_id * 2 + 35` into it, and chain
/// identifiers have no fixed upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The `r` component, left-padded to 32 bytes.
    pub r: [u8; SIGNATURE_COMPONENT_LENGTH],
    /// The `s` component, left-padded to 32 bytes. Always the low form.
    pub s: [u8; SIGNATURE_COMPONENT_LENGTH],
    /// Recovery value: parity plus the signing offset.
    pub v: BigUint,
}

impl Signature {
    /// Serialize as `r ‖ s ‖ v`, with `v` in minimal big-endian form.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytes::flatten(&[&self.r, &self.s, &bytes::nat_to_bytes(&self.v)])
    }

    /// Parse the `r ‖ s ‖ v` serialization. Everything after the first
    /// 64 bytes is read as `v`; an empty remainder means `v = 0`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, AccountError> {
        let fixed = SIGNATURE_COMPONENT_LENGTH * 2;
        if data.len() < fixed {
            return Err(AccountError::MalformedSignature {
                needed: fixed,
                got: data.len(),
            });
        }
        let mut r = [0u8; SIGNATURE_COMPONENT_LENGTH];
        let mut s = [0u8; SIGNATURE_COMPONENT_LENGTH];
        r.copy_from_slice(&data[..SIGNATURE_COMPONENT_LENGTH]);
        s.copy_from_slice(&data[SIGNATURE_COMPONENT_LENGTH..fixed]);
        Ok(Signature {
            r,
            s,
            v: bytes::bytes_to_nat(&data[fixed..]),
        })
    }

    /// The recovery parity (0 or 1) encoded in `v`, with every offset
    /// scheme unfolded: raw parities pass through, offset values map by
    /// the parity of the offset itself.
    pub fn recovery_parity(&self) -> u8 {
        if self.v < BigUint::from(2u8) {
            u8::from(self.v.bit(0))
        } else {
            // Both offsets (27 and chain_id * 2 + 35) are odd, so the
            // recovered parity is the inverse of v's low bit.
            u8::from(!self.v.bit(0))
        }
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A secp256k1 keypair together with its derived display address.
pub struct Account {
    signing_key: SigningKey,
    address: Address,
}

impl Account {
    /// Generate a fresh account.
    ///
    /// The private key is the Keccak-256 digest of a random construction
    /// that mixes three independent 32-byte randoms with the caller's
    /// optional entropy, so a weak caller seed degrades nothing.
    pub fn create(entropy: Option<&[u8]>) -> Result<Self, AccountError> {
        let seed = match entropy {
            Some(extra) => bytes::concat(&bytes::random_bytes(32), extra),
            None => bytes::random_bytes(64),
        };
        let inner = keccak256(&seed);
        let middle = bytes::flatten(&[&bytes::random_bytes(32), &inner, &bytes::random_bytes(32)]);
        Self::from_private(&keccak256(&middle))
    }

    /// Build an account from a raw 32-byte private key.
    pub fn from_private(private_key: &[u8]) -> Result<Self, AccountError> {
        let signing_key =
            SigningKey::from_slice(private_key).map_err(|_| AccountError::InvalidPrivateKey)?;
        let address = derive_address(signing_key.verifying_key());
        debug!(%address, "derived account");
        Ok(Account {
            signing_key,
            address,
        })
    }

    /// Build an account from a `0x`-prefixed hex private key.
    pub fn from_private_hex(private_key: &str) -> Result<Self, AccountError> {
        Self::from_private(&bytes::from_hex(private_key)?)
    }

    /// The account's display address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The account's public key.
    pub fn public_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The raw private key bytes. Handle with care.
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    /// Sign a 32-byte digest with the plain message offset:
    /// `v = 27 + parity`.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, AccountError> {
        self.sign_with_offset(digest, &BigUint::from(MESSAGE_V_OFFSET))
    }

    /// Sign a 32-byte digest, folding an arbitrary offset into `v`:
    /// `v = offset + parity`. Transaction signing passes
    /// `chain_id * 2 + 35` here.
    pub fn sign_with_offset(
        &self,
        digest: &[u8; 32],
        offset: &BigUint,
    ) -> Result<Signature, AccountError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| AccountError::SigningFailed)?;
        let (r, s) = signature.split_bytes();
        Ok(Signature {
            r: r.into(),
            s: s.into(),
            v: offset + BigUint::from(recovery_id.to_byte()),
        })
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Derivation and recovery
// ---------------------------------------------------------------------------

/// Derive the display address of a public key: hash160 over the full
/// 65-byte uncompressed point, Base58Check with the version byte, then
/// the `"INT"` prefix and the first 29 encoded characters.
pub fn derive_address(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    let digest = hash160(point.as_bytes());

    let mut payload = [0u8; 21];
    payload[0] = ADDRESS_VERSION;
    payload[1..].copy_from_slice(&digest);
    let encoded = bs58::encode(payload).with_check().into_string();

    let mut display = String::with_capacity(ADDRESS_LENGTH);
    display.push_str("INT");
    display.push_str(&encoded[..ADDRESS_CHECKSUM_CHARS]);
    Address(display)
}

/// Recover the signer's display address from a digest and a recoverable
/// signature. The inverse of signing: for any account,
/// `recover(digest, account.sign(digest))` yields the account's address.
pub fn recover(digest: &[u8; 32], signature: &Signature) -> Result<Address, AccountError> {
    let recovery_id = RecoveryId::from_byte(signature.recovery_parity())
        .ok_or(AccountError::RecoveryFailed)?;
    let ecdsa = EcdsaSignature::from_scalars(signature.r, signature.s)
        .map_err(|_| AccountError::RecoveryFailed)?;
    let public_key = VerifyingKey::recover_from_prehash(digest, &ecdsa, recovery_id)
        .map_err(|_| AccountError::RecoveryFailed)?;
    Ok(derive_address(&public_key))
}
