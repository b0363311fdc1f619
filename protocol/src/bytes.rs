//! # Byte Sequences and Natural Numbers
//!
//! The two primitive representations everything else is built on:
//!
//! - A *byte sequence* is a plain `Vec<u8>` / `&[u8]` — the exact octets,
//!   no implicit sign, no implicit width.
//! - A *natural number* is a [`BigUint`]. Its canonical byte form is
//!   minimal big-endian: no leading zero byte, and the value zero encodes
//!   as the **empty** sequence. Every numeric field that crosses the wire
//!   goes through [`nat_to_bytes`] / [`bytes_to_nat`] so there is exactly
//!   one byte form per value.
//!
//! Hex helpers accept and produce `0x`-prefixed strings, because that is
//! the textual form every reference vector and RPC payload uses.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Errors from the byte-sequence primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BytesError {
    /// The input is longer than the target it must fit into.
    #[error("cannot left-pad {got} bytes into {target}")]
    Length {
        /// Requested padded length.
        target: usize,
        /// Actual input length.
        got: usize,
    },

    /// A slice range points outside the sequence.
    #[error("slice {start}..{end} out of range for {len} bytes")]
    Range {
        /// Inclusive start of the requested range.
        start: usize,
        /// Exclusive end of the requested range.
        end: usize,
        /// Length of the sequence being sliced.
        len: usize,
    },

    /// The input is not a well-formed `0x`-prefixed hex string.
    #[error("malformed hex input: {reason}")]
    MalformedHex {
        /// What exactly was wrong with it.
        reason: String,
    },
}

/// Canonical minimal big-endian encoding of a natural number.
///
/// Zero encodes as the empty sequence — that is the single most important
/// rule in this module, and both the RLP and transaction layers depend on
/// it for byte-exact output.
pub fn nat_to_bytes(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        Vec::new()
    } else {
        n.to_bytes_be()
    }
}

/// Inverse of [`nat_to_bytes`]. The empty sequence maps to zero, and
/// leading zero bytes are tolerated on input (they simply do not survive
/// a round-trip).
pub fn bytes_to_nat(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Left-pads `bytes` with zero bytes up to `target` length.
///
/// Fails if the input is already longer than the target — silently
/// truncating a number is how signatures stop verifying.
pub fn pad_left(target: usize, bytes: &[u8]) -> Result<Vec<u8>, BytesError> {
    if bytes.len() > target {
        return Err(BytesError::Length {
            target,
            got: bytes.len(),
        });
    }
    let mut out = vec![0u8; target - bytes.len()];
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Copies the `start..end` range of a sequence, failing on out-of-bounds
/// indices instead of panicking.
pub fn slice(start: usize, end: usize, bytes: &[u8]) -> Result<Vec<u8>, BytesError> {
    if start > end || end > bytes.len() {
        return Err(BytesError::Range {
            start,
            end,
            len: bytes.len(),
        });
    }
    Ok(bytes[start..end].to_vec())
}

/// Concatenates two byte sequences into a new one.
pub fn concat(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Flattens a list of byte sequences into one.
pub fn flatten(parts: &[&[u8]]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Draws `n` bytes from the process-wide cryptographically secure RNG.
///
/// Used only for entropy seeding in account creation. Nothing on a
/// deterministic path (signing, encoding) is allowed to call this.
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    OsRng.fill_bytes(&mut out);
    out
}

/// Parses a `0x`-prefixed hex string into bytes.
///
/// The prefix is mandatory and an odd number of digits is padded with a
/// leading zero, matching how numeric quantities arrive over RPC.
pub fn from_hex(s: &str) -> Result<Vec<u8>, BytesError> {
    let digits = s.strip_prefix("0x").ok_or_else(|| BytesError::MalformedHex {
        reason: format!("missing 0x prefix in {s:?}"),
    })?;
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        &padded
    } else {
        digits
    };
    hex::decode(digits).map_err(|e| BytesError::MalformedHex {
        reason: e.to_string(),
    })
}

/// Formats bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
