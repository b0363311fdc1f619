//! The type-string grammar and its parsed form.
//!
//! A type string is one base type followed by zero or more array
//! dimensions: `uint8`, `bytes32`, `string[]`, `uint256[3][]`. The parser
//! produces a [`ParamType`] tree once, and the encoder and decoder
//! dispatch on that tree — nobody re-matches substrings per call.

use std::fmt;

use super::AbiError;
use crate::config::{ABI_WORD, MAX_ABI_DEPTH};

/// A parsed argument type.
///
/// Array dimensions wrap inner types left-to-right, so `uint8[2][]` is a
/// dynamic array of fixed two-element arrays of `uint8`:
/// `Array(FixedArray(Uint(8), 2))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(usize),
    /// Signed two's-complement integer of the given bit width.
    Int(usize),
    /// A boolean, carried as the integer 0 or 1.
    Bool,
    /// A display address, carried as UTF-8 text in one fixed word.
    Address,
    /// `bytesN` — a fixed byte string of 1..=32 bytes.
    FixedBytes(usize),
    /// Unsized `bytes` — dynamic.
    Bytes,
    /// UTF-8 `string` — dynamic.
    String,
    /// `T[N]` — exactly N elements.
    FixedArray(Box<ParamType>, usize),
    /// `T[]` — element count carried in the encoding.
    Array(Box<ParamType>),
}

impl ParamType {
    /// Parse a type string into its tree form.
    ///
    /// Exactly one base type per string; a second scalar token, a tuple,
    /// an unknown name, or a bad width all fail with
    /// [`AbiError::UnsupportedType`] carrying the offending input.
    pub fn parse(input: &str) -> Result<Self, AbiError> {
        if input.starts_with('(') {
            return Err(AbiError::UnsupportedType {
                type_string: input.to_string(),
                reason: "tuple types are not supported",
            });
        }

        let (base, mut dims) = match input.find('[') {
            Some(i) => (&input[..i], &input[i..]),
            None => (input, ""),
        };
        let mut ty = Self::parse_base(base, input)?;

        let mut depth = 0usize;
        while !dims.is_empty() {
            let rest = dims.strip_prefix('[').ok_or_else(|| AbiError::UnsupportedType {
                type_string: input.to_string(),
                reason: "expected an array dimension",
            })?;
            let close = rest.find(']').ok_or_else(|| AbiError::UnsupportedType {
                type_string: input.to_string(),
                reason: "unterminated array dimension",
            })?;
            let size = &rest[..close];
            ty = if size.is_empty() {
                ParamType::Array(Box::new(ty))
            } else {
                let n = parse_decimal(size).ok_or_else(|| AbiError::UnsupportedType {
                    type_string: input.to_string(),
                    reason: "array dimension must be a positive decimal",
                })?;
                ParamType::FixedArray(Box::new(ty), n)
            };
            depth += 1;
            if depth > MAX_ABI_DEPTH {
                return Err(AbiError::NestingTooDeep { max: MAX_ABI_DEPTH });
            }
            dims = &rest[close + 1..];
        }
        Ok(ty)
    }

    fn parse_base(base: &str, input: &str) -> Result<Self, AbiError> {
        let unsupported = |reason: &'static str| AbiError::UnsupportedType {
            type_string: input.to_string(),
            reason,
        };
        match base {
            "bool" => Ok(ParamType::Bool),
            "address" => Ok(ParamType::Address),
            "string" => Ok(ParamType::String),
            "bytes" => Ok(ParamType::Bytes),
            _ if base.starts_with("uint") => {
                Ok(ParamType::Uint(parse_width(&base[4..]).ok_or_else(|| {
                    unsupported("uint width must be a multiple of 8 in 8..=256")
                })?))
            }
            _ if base.starts_with("int") => {
                Ok(ParamType::Int(parse_width(&base[3..]).ok_or_else(|| {
                    unsupported("int width must be a multiple of 8 in 8..=256")
                })?))
            }
            _ if base.starts_with("bytes") => {
                let n = parse_decimal(&base[5..])
                    .filter(|&n| n <= ABI_WORD)
                    .ok_or_else(|| unsupported("bytesN size must be in 1..=32"))?;
                Ok(ParamType::FixedBytes(n))
            }
            _ => Err(unsupported("unknown base type")),
        }
    }

    /// Whether this type's data lives in the tail region.
    ///
    /// `string`, unsized `bytes`, and dynamic arrays are dynamic, as is a
    /// fixed array whose element type is dynamic. Everything else encodes
    /// inline in the head.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(elem, _) => elem.is_dynamic(),
            _ => false,
        }
    }

    /// Size in bytes of the inline (head) encoding of a static type.
    /// One word for scalars, the summed element sizes for fixed arrays.
    /// Not meaningful for dynamic types, which occupy one offset word.
    pub fn static_size(&self) -> usize {
        match self {
            ParamType::FixedArray(elem, n) => n * elem.static_size(),
            _ => ABI_WORD,
        }
    }

    /// Size of the head slot this type occupies in an argument block.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            ABI_WORD
        } else {
            self.static_size()
        }
    }
}

/// Canonical form: bare `uint`/`int` render with their default width, so
/// the string is stable regardless of how the type was written.
impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(w) => write!(f, "uint{w}"),
            ParamType::Int(w) => write!(f, "int{w}"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Address => write!(f, "address"),
            ParamType::FixedBytes(n) => write!(f, "bytes{n}"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
            ParamType::FixedArray(elem, n) => write!(f, "{elem}[{n}]"),
            ParamType::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

/// A width suffix: empty means 256, otherwise a multiple of 8 in 8..=256.
fn parse_width(suffix: &str) -> Option<usize> {
    if suffix.is_empty() {
        return Some(256);
    }
    parse_decimal(suffix).filter(|w| *w % 8 == 0 && (8..=256).contains(w))
}

/// Strict positive decimal: ASCII digits only, no sign, no leading zero.
fn parse_decimal(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}
