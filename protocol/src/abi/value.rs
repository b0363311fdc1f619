//! Runtime values for ABI arguments, tagged with the shape they carry.
//! The encoder pairs each value against a [`super::ParamType`] and
//! rejects mismatches instead of guessing.

use num_bigint::{BigInt, BigUint};

/// A value to be encoded, or produced by decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An unsigned integer for `uintN`.
    Uint(BigUint),
    /// A signed integer for `intN`.
    Int(BigInt),
    /// A boolean for `bool`.
    Bool(bool),
    /// A display address string for `address`.
    Address(String),
    /// Exactly N bytes for `bytesN`.
    FixedBytes(Vec<u8>),
    /// An arbitrary byte string for `bytes`.
    Bytes(Vec<u8>),
    /// UTF-8 text for `string`.
    String(String),
    /// Elements of an array type, fixed or dynamic.
    Array(Vec<Value>),
}

impl Value {
    /// Shorthand for an unsigned integer value.
    pub fn uint(n: impl Into<BigUint>) -> Self {
        Value::Uint(n.into())
    }

    /// Shorthand for a signed integer value.
    pub fn int(n: impl Into<BigInt>) -> Self {
        Value::Int(n.into())
    }

    /// The shape name, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    /// Borrow the unsigned integer, if that is what this is.
    pub fn as_uint(&self) -> Option<&BigUint> {
        match self {
            Value::Uint(n) => Some(n),
            _ => None,
        }
    }

    /// Borrow the byte payload of a `bytes` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow the elements of an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}
