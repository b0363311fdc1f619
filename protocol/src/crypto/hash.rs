//! # Hashing Utilities
//!
//! Three hash constructions, each with exactly one job:
//!
//! - **Keccak-256** — digests for signing. Transaction payloads, method
//!   identifiers, and the entropy folding in account creation all go
//!   through Keccak. Note this is the original Keccak padding, *not*
//!   NIST SHA-3; the two differ and are not interchangeable.
//! - **SHA-256** — first stage of the address hash.
//! - **hash160** — `RIPEMD-160(SHA-256(data))`, the classic 20-byte
//!   public-key hash used in address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Compute the Keccak-256 hash of the input data.
///
/// Returns the 32-byte digest as a fixed-size array, since every caller
/// immediately feeds it to a signer or splices it into a fixed layout.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute `RIPEMD-160(SHA-256(data))` — the 20-byte hash an address is
/// derived from.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(sha256(data));
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_empty_input_vector() {
        // Keccak-256 of the empty string. If this ever equals the SHA3-256
        // value (a7ffc6f8...), someone swapped the padding rule.
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak256_known_vector() {
        assert_eq!(
            hex::encode(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn sha256_empty_input_vector() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hash160_is_ripemd_of_sha() {
        // hash160 of the empty string, computable with any Bitcoin toolbox.
        assert_eq!(
            hex::encode(hash160(b"")),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
        assert_eq!(hash160(b"abc").len(), 20);
    }

    #[test]
    fn hashes_are_deterministic_and_distinct() {
        let data = b"int chain";
        assert_eq!(keccak256(data), keccak256(data));
        assert_ne!(keccak256(data)[..], sha256(data)[..]);
    }
}
