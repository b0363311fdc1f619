//! # Unit Conversion
//!
//! Converts between whole-INT decimal strings (what people type) and
//! base-unit integers (what transactions carry). One INT is `10^18` base
//! units, so every conversion is exact string arithmetic on
//! arbitrary-precision integers — floating point never touches an
//! amount.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use thiserror::Error;

use crate::config::INT_DECIMALS;

/// Errors from amount parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
    /// The amount contains something other than digits, one optional
    /// leading minus, and at most one decimal point.
    #[error("invalid amount {input:?}")]
    InvalidNumber {
        /// The rejected input, verbatim.
        input: String,
    },

    /// More than one decimal point.
    #[error("too many decimal points in amount {input:?}")]
    TooManyDecimalPoints {
        /// The rejected input, verbatim.
        input: String,
    },

    /// More fractional digits than base units can represent.
    #[error("amount {input:?} has more than {max} decimal places")]
    TooManyDecimalPlaces {
        /// The rejected input, verbatim.
        input: String,
        /// Maximum representable decimal places.
        max: usize,
    },
}

/// `10^18` as an arbitrary-precision natural.
fn base() -> BigUint {
    BigUint::from(10u8).pow(INT_DECIMALS as u32)
}

/// Parse a whole-INT decimal string into base units.
///
/// Accepts an optional leading minus and up to 18 fractional digits:
/// `"1.5"` becomes `1_500_000_000_000_000_000`. A 19th fractional digit
/// is an error, never a rounding.
pub fn from_int(amount: &str) -> Result<BigInt, UnitsError> {
    let invalid = || UnitsError::InvalidNumber {
        input: amount.to_string(),
    };

    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    if digits.is_empty() || digits == "." {
        return Err(invalid());
    }
    if !digits.bytes().all(|c| c.is_ascii_digit() || c == b'.') {
        return Err(invalid());
    }

    let mut parts = digits.split('.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(UnitsError::TooManyDecimalPoints {
            input: amount.to_string(),
        });
    }
    if fraction.len() > INT_DECIMALS {
        return Err(UnitsError::TooManyDecimalPlaces {
            input: amount.to_string(),
            max: INT_DECIMALS,
        });
    }

    let whole: BigUint = if whole.is_empty() {
        BigUint::zero()
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    // Right-pad the fraction to a full 18 digits before parsing, so
    // "1.5" contributes 500000000000000000 base units.
    let mut padded = fraction.to_string();
    while padded.len() < INT_DECIMALS {
        padded.push('0');
    }
    let fraction: BigUint = padded.parse().map_err(|_| invalid())?;

    let magnitude = whole * base() + fraction;
    let sign = if negative && !magnitude.is_zero() {
        Sign::Minus
    } else if magnitude.is_zero() {
        Sign::NoSign
    } else {
        Sign::Plus
    };
    Ok(BigInt::from_biguint(sign, magnitude))
}

/// Format a base-unit amount as a whole-INT decimal string.
///
/// Trailing fractional zeros are trimmed and a zero fraction disappears
/// entirely: `1_500_000_000_000_000_000` renders as `"1.5"`, `10^18` as
/// `"1"`.
pub fn to_int(base_units: &BigInt) -> String {
    let negative = base_units.sign() == Sign::Minus;
    let magnitude = base_units.magnitude();
    let divisor = base();
    let whole = magnitude / &divisor;
    let remainder = magnitude % &divisor;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&whole.to_string());

    if !remainder.is_zero() {
        let mut fraction = format!("{remainder:0>width$}", width = INT_DECIMALS);
        while fraction.ends_with('0') {
            fraction.pop();
        }
        out.push('.');
        out.push_str(&fraction);
    }
    out
}
