//! # ABI — Typed Argument Encoding
//!
//! Converts function-call arguments to and from the 32-byte-word binary
//! layout a contract expects. The pipeline is:
//!
//! 1. [`ParamType::parse`] turns a type string (`"uint8"`, `"bytes[]"`)
//!    into a typed AST, once.
//! 2. [`encode_params`] / [`decode_params`] walk the AST and the head/tail
//!    layout (static values inline, dynamic values behind offsets).
//! 3. [`method_id`] derives the 4-byte selector from the canonical
//!    signature string, so callers can assemble complete call data with
//!    [`encode_call`].
//!
//! Tuples and structs are deliberately not part of the grammar.

mod decode;
mod encode;
pub mod types;
pub mod value;

use thiserror::Error;
use tracing::debug;

pub use decode::decode_params;
pub use encode::encode_params;
pub use types::ParamType;
pub use value::Value;

use crate::config::METHOD_ID_LENGTH;
use crate::crypto::keccak256;

/// Errors from type parsing, encoding, and decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    /// The type string does not match the supported grammar.
    #[error("unsupported type {type_string:?}: {reason}")]
    UnsupportedType {
        /// The offending input, verbatim.
        type_string: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// More array dimensions than the decoder is willing to recurse into.
    #[error("type nesting exceeds the maximum depth of {max}")]
    NestingTooDeep {
        /// The configured limit.
        max: usize,
    },

    /// A value's shape does not match its declared type.
    #[error("type mismatch: declared {expected}, got a {got} value")]
    TypeMismatch {
        /// Canonical form of the declared type.
        expected: String,
        /// Shape of the supplied value.
        got: &'static str,
    },

    /// Fixed-size array arity (or argument-list arity) mismatch.
    #[error("length mismatch: expected {expected} elements, got {got}")]
    ArrayLengthMismatch {
        /// Declared element count.
        expected: usize,
        /// Supplied element count.
        got: usize,
    },

    /// A fixed-length value with the wrong number of bytes.
    #[error("wrong {what} length: expected at most {expected} bytes, got {got}")]
    WrongValueLength {
        /// Maximum (or exact) byte length the slot allows.
        expected: usize,
        /// Actual length supplied.
        got: usize,
        /// Which kind of value was being encoded.
        what: &'static str,
    },

    /// A slot, offset, or length points past the end of the buffer.
    #[error("insufficient data: need {needed} bytes, buffer has {available}")]
    InsufficientData {
        /// Bytes the layout requires.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },

    /// Decoded text that is not valid UTF-8.
    #[error("invalid UTF-8 in decoded {field}")]
    InvalidUtf8 {
        /// Which field held the bad bytes.
        field: &'static str,
    },
}

/// Parse a batch of type strings in one go.
pub fn parse_types(type_strings: &[&str]) -> Result<Vec<ParamType>, AbiError> {
    type_strings.iter().map(|s| ParamType::parse(s)).collect()
}

/// The canonical signature string: `name(type1,type2,...)` built from the
/// *parsed* types, so `"uint"` and `"uint256"` produce the same signature.
pub fn method_signature(name: &str, types: &[ParamType]) -> String {
    let joined = types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{name}({joined})")
}

/// The 4-byte method identifier: the leading bytes of the Keccak-256 hash
/// of the canonical signature.
pub fn method_id(name: &str, types: &[ParamType]) -> [u8; METHOD_ID_LENGTH] {
    let signature = method_signature(name, types);
    let digest = keccak256(signature.as_bytes());
    debug!(%signature, id = %hex::encode(&digest[..METHOD_ID_LENGTH]), "derived method id");
    let mut id = [0u8; METHOD_ID_LENGTH];
    id.copy_from_slice(&digest[..METHOD_ID_LENGTH]);
    id
}

/// Complete call data: method identifier followed by the encoded
/// arguments. This is the byte string that goes into a transaction's
/// `data` field.
pub fn encode_call(
    name: &str,
    type_strings: &[&str],
    values: &[Value],
) -> Result<Vec<u8>, AbiError> {
    let types = parse_types(type_strings)?;
    let mut out = method_id(name, &types).to_vec();
    out.extend_from_slice(&encode_params(&types, values)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_selector_vector() {
        let types = parse_types(&["bytes", "bytes", "uint8"]).unwrap();
        assert_eq!(
            method_signature("Register", &types),
            "Register(bytes,bytes,uint8)"
        );
        assert_eq!(hex::encode(method_id("Register", &types)), "f1b2ef10");
    }

    #[test]
    fn signature_uses_canonical_widths() {
        let types = parse_types(&["uint", "int"]).unwrap();
        assert_eq!(method_signature("f", &types), "f(uint256,int256)");
    }

    #[test]
    fn transfer_selector_vector() {
        // The classic ERC-20 selector, derivable with any ABI toolbox.
        let types = parse_types(&["address", "uint256"]).unwrap();
        assert_eq!(hex::encode(method_id("transfer", &types)), "a9059cbb");
    }

    #[test]
    fn encode_call_prepends_the_selector() {
        let data = encode_call("Register", &["uint8"], &[Value::uint(1u8)]).unwrap();
        assert_eq!(data.len(), 4 + 32);
        let types = parse_types(&["uint8"]).unwrap();
        assert_eq!(data[..4], method_id("Register", &types));
    }

    #[test]
    fn bad_type_string_fails_the_whole_call() {
        assert!(encode_call("f", &["uint8", "wat"], &[]).is_err());
    }
}
