//! Argument encoding: head/tail layout over 32-byte words.
//!
//! An encoded block is a *head* — one slot per argument, in order —
//! followed by a *tail*. Static types write their words straight into
//! their head slot; dynamic types write the byte offset (from the start
//! of the block) where their data begins in the tail. Arrays of dynamic
//! elements repeat the same head/tail scheme inside their own block, with
//! offsets relative to that block.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

use super::{AbiError, ParamType, Value};
use crate::config::ABI_WORD;

/// Encode an argument list against its declared types.
///
/// Arity must match exactly; each value must have the shape its type
/// declares. Numeric values are reduced to their declared bit width, the
/// same wrap-around two's-complement arithmetic the decoder inverts.
pub fn encode_params(types: &[ParamType], values: &[Value]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::ArrayLengthMismatch {
            expected: types.len(),
            got: values.len(),
        });
    }
    let pairs: Vec<(&ParamType, &Value)> = types.iter().zip(values.iter()).collect();
    encode_block(&pairs)
}

/// One head/tail block over the given (type, value) pairs.
fn encode_block(pairs: &[(&ParamType, &Value)]) -> Result<Vec<u8>, AbiError> {
    let head_len: usize = pairs.iter().map(|(ty, _)| ty.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (ty, value) in pairs {
        if ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&encode_value(ty, value)?);
        } else {
            head.extend_from_slice(&encode_value(ty, value)?);
        }
    }
    head.extend_from_slice(&tail);
    Ok(head)
}

/// The encoding of one value: the inline words for a static type, or the
/// tail block for a dynamic one.
fn encode_value(ty: &ParamType, value: &Value) -> Result<Vec<u8>, AbiError> {
    match (ty, value) {
        (ParamType::Uint(width), Value::Uint(n)) => Ok(uint_word(n, *width).to_vec()),

        (ParamType::Int(width), Value::Int(n)) => Ok(int_word(n, *width).to_vec()),

        (ParamType::Bool, Value::Bool(b)) => {
            Ok(uint_word(&BigUint::from(u8::from(*b)), 256).to_vec())
        }

        (ParamType::Address, Value::Address(s)) => {
            let bytes = s.as_bytes();
            if bytes.len() > ABI_WORD {
                return Err(AbiError::WrongValueLength {
                    expected: ABI_WORD,
                    got: bytes.len(),
                    what: "address display string",
                });
            }
            Ok(pad_right(bytes))
        }

        (ParamType::FixedBytes(n), Value::FixedBytes(bytes)) => {
            if bytes.len() != *n {
                return Err(AbiError::WrongValueLength {
                    expected: *n,
                    got: bytes.len(),
                    what: "fixed byte string",
                });
            }
            Ok(pad_right(bytes))
        }

        (ParamType::Bytes, Value::Bytes(bytes)) => Ok(length_prefixed(bytes)),

        (ParamType::String, Value::String(s)) => Ok(length_prefixed(s.as_bytes())),

        (ParamType::FixedArray(elem, n), Value::Array(items)) => {
            if items.len() != *n {
                return Err(AbiError::ArrayLengthMismatch {
                    expected: *n,
                    got: items.len(),
                });
            }
            encode_elements(elem, items)
        }

        (ParamType::Array(elem), Value::Array(items)) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend_from_slice(&encode_elements(elem, items)?);
            Ok(out)
        }

        (ty, value) => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            got: value.kind(),
        }),
    }
}

/// The element region of an array: straight concatenation for static
/// elements, a nested head/tail block for dynamic ones.
fn encode_elements(elem: &ParamType, items: &[Value]) -> Result<Vec<u8>, AbiError> {
    if elem.is_dynamic() {
        let pairs: Vec<(&ParamType, &Value)> = items.iter().map(|v| (elem, v)).collect();
        encode_block(&pairs)
    } else {
        let mut out = Vec::with_capacity(items.len() * elem.static_size());
        for item in items {
            out.extend_from_slice(&encode_value(elem, item)?);
        }
        Ok(out)
    }
}

/// Length word followed by the payload, zero-padded up to a word boundary.
fn length_prefixed(payload: &[u8]) -> Vec<u8> {
    let padded_len = payload.len().div_ceil(ABI_WORD) * ABI_WORD;
    let mut out = Vec::with_capacity(ABI_WORD + padded_len);
    out.extend_from_slice(&usize_word(payload.len()));
    out.extend_from_slice(payload);
    out.resize(ABI_WORD + padded_len, 0);
    out
}

/// An unsigned value reduced to `width` bits, zero-extended into one word.
fn uint_word(n: &BigUint, width: usize) -> [u8; ABI_WORD] {
    let reduced = n % (BigUint::one() << width);
    biguint_word(&reduced)
}

/// A signed value in two's-complement form at `width` bits, sign-extended
/// to the full 256-bit word.
fn int_word(n: &BigInt, width: usize) -> [u8; ABI_WORD] {
    let modulus = BigInt::one() << width;
    let mut wrapped = n % &modulus;
    if wrapped.sign() == Sign::Minus {
        wrapped += &modulus;
    }
    let mut wrapped = wrapped.to_biguint().expect("non-negative after wrap");
    // Sign-extend: if the top bit of the width is set, fill the word above
    // it with ones.
    if (&wrapped >> (width - 1)) & BigUint::one() == BigUint::one() {
        wrapped += (BigUint::one() << 256) - (BigUint::one() << width);
    }
    biguint_word(&wrapped)
}

fn biguint_word(n: &BigUint) -> [u8; ABI_WORD] {
    let bytes = n.to_bytes_be();
    let mut word = [0u8; ABI_WORD];
    word[ABI_WORD - bytes.len()..].copy_from_slice(&bytes);
    word
}

pub(super) fn usize_word(n: usize) -> [u8; ABI_WORD] {
    biguint_word(&BigUint::from(n))
}

/// Left-aligned payload, zero-padded on the right to one word.
fn pad_right(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out.resize(ABI_WORD, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(strs: &[&str]) -> Vec<ParamType> {
        strs.iter().map(|s| ParamType::parse(s).unwrap()).collect()
    }

    fn enc(strs: &[&str], values: &[Value]) -> String {
        hex::encode(encode_params(&types(strs), values).unwrap())
    }

    #[test]
    fn uint8_occupies_one_full_word() {
        assert_eq!(
            enc(&["uint8"], &[Value::uint(10u8)]),
            "000000000000000000000000000000000000000000000000000000000000000a"
        );
    }

    #[test]
    fn uint_values_wrap_at_their_width() {
        // 0x1ff at width 8 keeps only the low byte.
        assert_eq!(
            enc(&["uint8"], &[Value::uint(0x1ffu32)]),
            "00000000000000000000000000000000000000000000000000000000000000ff"
        );
    }

    #[test]
    fn negative_int_sign_extends_to_the_word() {
        assert_eq!(
            enc(&["int8"], &[Value::int(-1)]),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );
        assert_eq!(
            enc(&["int16"], &[Value::int(-2)]),
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
        );
    }

    #[test]
    fn positive_int_is_zero_extended() {
        assert_eq!(
            enc(&["int8"], &[Value::int(127)]),
            "000000000000000000000000000000000000000000000000000000000000007f"
        );
    }

    #[test]
    fn bool_is_zero_or_one() {
        assert_eq!(enc(&["bool"], &[Value::Bool(true)]).chars().last(), Some('1'));
        assert_eq!(enc(&["bool"], &[Value::Bool(false)]).chars().last(), Some('0'));
    }

    #[test]
    fn bytes4_pads_to_the_right() {
        assert_eq!(
            enc(&["bytes4"], &[Value::FixedBytes(vec![0xde, 0xad, 0xbe, 0xef])]),
            "deadbeef00000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn fixed_bytes_length_must_match_the_type() {
        let err = encode_params(&types(&["bytes4"]), &[Value::FixedBytes(vec![1, 2])]);
        assert!(matches!(err, Err(AbiError::WrongValueLength { expected: 4, got: 2, .. })));
    }

    #[test]
    fn dynamic_bytes_carry_offset_and_length() {
        // One dynamic argument: offset word (0x20), length word (3),
        // payload padded to a word.
        assert_eq!(
            enc(&["bytes"], &[Value::Bytes(vec![1, 2, 3])]),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000003",
                "0102030000000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn empty_dynamic_bytes_is_just_a_length_word() {
        assert_eq!(
            enc(&["bytes"], &[Value::Bytes(vec![])]),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn address_is_utf8_left_aligned() {
        let addr = "INT3FFFFFFFFFFFFFFFFFFFFFFFFFFFF";
        let encoded = enc(&["address"], &[Value::Address(addr.to_string())]);
        assert_eq!(encoded, hex::encode(addr.as_bytes()));
    }

    #[test]
    fn overlong_address_is_rejected() {
        let err = encode_params(
            &types(&["address"]),
            &[Value::Address("X".repeat(33))],
        );
        assert!(matches!(err, Err(AbiError::WrongValueLength { .. })));
    }

    #[test]
    fn static_fixed_array_is_inline() {
        assert_eq!(
            enc(
                &["uint8[2]"],
                &[Value::Array(vec![Value::uint(1u8), Value::uint(2u8)])]
            ),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000001",
                "0000000000000000000000000000000000000000000000000000000000000002"
            )
        );
    }

    #[test]
    fn fixed_array_arity_is_enforced() {
        let err = encode_params(
            &types(&["uint8[2]"]),
            &[Value::Array(vec![Value::uint(1u8)])],
        );
        assert!(matches!(
            err,
            Err(AbiError::ArrayLengthMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn dynamic_array_prepends_a_count_word() {
        assert_eq!(
            enc(
                &["uint8[]"],
                &[Value::Array(vec![Value::uint(7u8), Value::uint(8u8)])]
            ),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000002",
                "0000000000000000000000000000000000000000000000000000000000000007",
                "0000000000000000000000000000000000000000000000000000000000000008"
            )
        );
    }

    #[test]
    fn dynamic_elements_use_nested_offsets() {
        // bytes[] of two short strings: count word, then a two-slot head
        // of offsets relative to the element block, then the two tails.
        assert_eq!(
            enc(
                &["bytes[]"],
                &[Value::Array(vec![
                    Value::Bytes(vec![0xaa]),
                    Value::Bytes(vec![0xbb, 0xcc]),
                ])]
            ),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000002",
                "0000000000000000000000000000000000000000000000000000000000000040",
                "0000000000000000000000000000000000000000000000000000000000000080",
                "0000000000000000000000000000000000000000000000000000000000000001",
                "aa00000000000000000000000000000000000000000000000000000000000000",
                "0000000000000000000000000000000000000000000000000000000000000002",
                "bbcc000000000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn mixed_static_and_dynamic_heads() {
        // (uint8, bytes): head is the inline uint word plus one offset
        // word pointing past the head (0x40).
        assert_eq!(
            enc(
                &["uint8", "bytes"],
                &[Value::uint(5u8), Value::Bytes(vec![0xff])]
            ),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000005",
                "0000000000000000000000000000000000000000000000000000000000000040",
                "0000000000000000000000000000000000000000000000000000000000000001",
                "ff00000000000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn shape_mismatch_is_a_type_error() {
        let err = encode_params(&types(&["uint8"]), &[Value::Bool(true)]);
        match err {
            Err(AbiError::TypeMismatch { expected, got }) => {
                assert_eq!(expected, "uint8");
                assert_eq!(got, "bool");
            }
            other => panic!("wrong result: {other:?}"),
        }
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = encode_params(&types(&["uint8", "bool"]), &[Value::uint(1u8)]);
        assert!(matches!(err, Err(AbiError::ArrayLengthMismatch { .. })));
    }
}
