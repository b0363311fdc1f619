//! Argument decoding: the inverse walk over the head/tail layout.
//!
//! Every offset and length read out of the buffer is validated against
//! the buffer's actual extent *before* it is dereferenced. The input is
//! adversarial by definition — it usually arrives from a remote node —
//! so a declared length is a claim, not a fact.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

use super::{AbiError, ParamType, Value};
use crate::config::ABI_WORD;

/// Decode an encoded block back into one value per declared type.
pub fn decode_params(types: &[ParamType], data: &[u8]) -> Result<Vec<Value>, AbiError> {
    decode_block(types, data)
}

fn decode_block(types: &[ParamType], block: &[u8]) -> Result<Vec<Value>, AbiError> {
    let mut values = Vec::with_capacity(types.len());
    let mut cursor = 0usize;
    for ty in types {
        if ty.is_dynamic() {
            let offset = read_usize(block, cursor)?;
            if offset > block.len() {
                return Err(AbiError::InsufficientData {
                    needed: offset,
                    available: block.len(),
                });
            }
            values.push(decode_tail(ty, &block[offset..])?);
        } else {
            values.push(decode_static(ty, block, cursor)?);
        }
        cursor += ty.head_size();
    }
    Ok(values)
}

/// Decode a static type from its inline words at `at`.
fn decode_static(ty: &ParamType, data: &[u8], at: usize) -> Result<Value, AbiError> {
    match ty {
        ParamType::Uint(width) => {
            let word = read_word(data, at)?;
            Ok(Value::Uint(mask_width(word, *width)))
        }

        ParamType::Int(width) => {
            let word = read_word(data, at)?;
            let unsigned = mask_width(word, *width);
            // Reinterpret as two's complement at the declared width.
            let signed = if (&unsigned >> (width - 1)) & BigUint::one() == BigUint::one() {
                BigInt::from(unsigned) - (BigInt::one() << *width)
            } else {
                BigInt::from(unsigned)
            };
            Ok(Value::Int(signed))
        }

        ParamType::Bool => {
            let word = read_word(data, at)?;
            Ok(Value::Bool(!BigUint::from_bytes_be(word).is_zero()))
        }

        ParamType::Address => {
            // An absent address decodes as the empty string, not as an
            // error. Both the all-zero word and the empty buffer are
            // routine encodings of "no address here".
            if data.is_empty() {
                return Ok(Value::Address(String::new()));
            }
            let word = read_word(data, at)?;
            let text = &word[..word.len() - trailing_zeros(word)];
            let text = std::str::from_utf8(text).map_err(|_| AbiError::InvalidUtf8 {
                field: "address display string",
            })?;
            Ok(Value::Address(text.to_string()))
        }

        ParamType::FixedBytes(n) => {
            let word = read_word(data, at)?;
            Ok(Value::FixedBytes(word[..*n].to_vec()))
        }

        ParamType::FixedArray(elem, n) => {
            let size = elem.static_size();
            let mut items = Vec::with_capacity(*n);
            for i in 0..*n {
                items.push(decode_static(elem, data, at + i * size)?);
            }
            Ok(Value::Array(items))
        }

        // Dynamic types never reach here; decode_block routes them to
        // decode_tail.
        _ => unreachable!("dynamic type in static position"),
    }
}

/// Decode a dynamic type from its tail region. Offsets inside the region
/// are relative to the region's own start.
fn decode_tail(ty: &ParamType, region: &[u8]) -> Result<Value, AbiError> {
    match ty {
        ParamType::Bytes => Ok(Value::Bytes(read_length_prefixed(region)?)),

        ParamType::String => {
            let payload = read_length_prefixed(region)?;
            let text = String::from_utf8(payload)
                .map_err(|_| AbiError::InvalidUtf8 { field: "string" })?;
            Ok(Value::String(text))
        }

        ParamType::Array(elem) => {
            let count = read_usize(region, 0)?;
            decode_elements(elem, count, &region[ABI_WORD..])
        }

        ParamType::FixedArray(elem, n) => decode_elements(elem, *n, region),

        _ => unreachable!("static type in dynamic position"),
    }
}

/// The element region of an array with a known count.
fn decode_elements(elem: &ParamType, count: usize, block: &[u8]) -> Result<Value, AbiError> {
    // The whole head must fit before any element is touched; this caps
    // `count` by the input size, so a forged count word cannot drive an
    // allocation or a long loop.
    let head = count
        .checked_mul(elem.head_size())
        .ok_or(AbiError::InsufficientData {
            needed: usize::MAX,
            available: block.len(),
        })?;
    if head > block.len() {
        return Err(AbiError::InsufficientData {
            needed: head,
            available: block.len(),
        });
    }

    let mut items = Vec::with_capacity(count);
    if elem.is_dynamic() {
        for i in 0..count {
            let offset = read_usize(block, i * ABI_WORD)?;
            if offset > block.len() {
                return Err(AbiError::InsufficientData {
                    needed: offset,
                    available: block.len(),
                });
            }
            items.push(decode_tail(elem, &block[offset..])?);
        }
    } else {
        for i in 0..count {
            items.push(decode_static(elem, block, i * elem.static_size())?);
        }
    }
    Ok(Value::Array(items))
}

/// Length word then payload, both bounds-checked.
fn read_length_prefixed(region: &[u8]) -> Result<Vec<u8>, AbiError> {
    let len = read_usize(region, 0)?;
    let end = ABI_WORD.checked_add(len).ok_or(AbiError::InsufficientData {
        needed: usize::MAX,
        available: region.len(),
    })?;
    if end > region.len() {
        return Err(AbiError::InsufficientData {
            needed: end,
            available: region.len(),
        });
    }
    Ok(region[ABI_WORD..end].to_vec())
}

/// One 32-byte word at `at`, or an error naming how much was missing.
fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let end = at.checked_add(ABI_WORD).ok_or(AbiError::InsufficientData {
        needed: usize::MAX,
        available: data.len(),
    })?;
    if end > data.len() {
        return Err(AbiError::InsufficientData {
            needed: end,
            available: data.len(),
        });
    }
    Ok(&data[at..end])
}

/// A word interpreted as a usize-sized quantity. Values beyond usize
/// cannot possibly index the buffer, so they surface as insufficiency.
fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let word = read_word(data, at)?;
    BigUint::from_bytes_be(word)
        .to_usize()
        .ok_or(AbiError::InsufficientData {
            needed: usize::MAX,
            available: data.len(),
        })
}

fn mask_width(word: &[u8], width: usize) -> BigUint {
    BigUint::from_bytes_be(word) & ((BigUint::one() << width) - BigUint::one())
}

fn trailing_zeros(word: &[u8]) -> usize {
    word.iter().rev().take_while(|b| **b == 0).count()
}
