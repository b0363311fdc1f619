//! # RLP — Recursive Length Prefix
//!
//! The binary serialization format for nested byte structures. A value is
//! either a leaf (a byte sequence) or a list of values, and nothing else.
//! Four prefix classes cover the whole format:
//!
//! ```text
//! single byte < 0x80          the byte is its own encoding
//! 0x80 + len  (len <= 55)     short leaf, payload follows
//! 0xb7 + lol                  long leaf, big-endian length then payload
//! 0xc0 + len  (len <= 55)     short list, child encodings follow
//! 0xf7 + lol                  long list, big-endian length then children
//! ```
//!
//! The decoder is **canonical-only**: every value tree has exactly one
//! accepted encoding. A single byte below 0x80 wrapped in a length prefix,
//! a long form used where the short form fits, or a length with leading
//! zero bytes are all rejected as [`RlpError::InvalidPrefix`]. Lenient
//! decoders exist in the wild; accepting their output here would make
//! signed payloads malleable.

use num_traits::ToPrimitive;
use thiserror::Error;
use tracing::trace;

use crate::bytes::{bytes_to_nat, nat_to_bytes};
use crate::config::MAX_RLP_DEPTH;

/// Boundary between the short and long encodings: payloads up to this many
/// bytes carry their length in the prefix byte itself.
const SHORT_LENGTH_MAX: usize = 55;

/// Errors from RLP decoding. Encoding is total and cannot fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RlpError {
    /// A declared length points past the end of the input.
    #[error("truncated input: need {needed} bytes at offset {offset}, only {available} remain")]
    Truncated {
        /// Bytes the prefix claims to need.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
        /// Offset of the prefix making the claim.
        offset: usize,
    },

    /// A prefix byte that a canonical encoder can never produce.
    #[error("invalid prefix 0x{byte:02x} at offset {offset}: {reason}")]
    InvalidPrefix {
        /// The offending prefix byte.
        byte: u8,
        /// Offset of the byte in the input.
        offset: usize,
        /// Why it cannot occur in a canonical encoding.
        reason: &'static str,
    },

    /// Input continues past the end of the decoded item.
    #[error("{remaining} trailing bytes after a complete item")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: usize,
    },

    /// List nesting exceeds [`MAX_RLP_DEPTH`].
    #[error("list nesting exceeds the maximum depth of {max}")]
    TooDeep {
        /// The configured limit.
        max: usize,
    },
}

/// An RLP value: a leaf byte sequence or a list of nested values.
/// There is no third shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A raw byte sequence.
    Leaf(Vec<u8>),
    /// An ordered sequence of nested items.
    List(Vec<Item>),
}

impl Item {
    /// Leaf from anything byte-like.
    pub fn leaf(bytes: impl Into<Vec<u8>>) -> Self {
        Item::Leaf(bytes.into())
    }

    /// The canonical empty leaf (also the encoding of the number zero).
    pub fn empty() -> Self {
        Item::Leaf(Vec::new())
    }

    /// Borrow the leaf payload, or `None` for a list.
    pub fn as_leaf(&self) -> Option<&[u8]> {
        match self {
            Item::Leaf(bytes) => Some(bytes),
            Item::List(_) => None,
        }
    }

    /// Borrow the child items, or `None` for a leaf.
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Item::Leaf(_) => None,
            Item::List(items) => Some(items),
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode an item tree into its single canonical byte form.
pub fn encode(item: &Item) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(item, &mut out);
    out
}

fn encode_into(item: &Item, out: &mut Vec<u8>) {
    match item {
        Item::Leaf(payload) => {
            if payload.len() == 1 && payload[0] < 0x80 {
                out.push(payload[0]);
            } else {
                write_header(0x80, payload.len(), out);
                out.extend_from_slice(payload);
            }
        }
        Item::List(children) => {
            let mut body = Vec::new();
            for child in children {
                encode_into(child, &mut body);
            }
            write_header(0xc0, body.len(), out);
            out.extend_from_slice(&body);
        }
    }
}

/// Writes the prefix for a payload of `len` bytes. `base` is 0x80 for
/// leaves and 0xc0 for lists; the long forms sit at `base + 0x37`.
fn write_header(base: u8, len: usize, out: &mut Vec<u8>) {
    if len <= SHORT_LENGTH_MAX {
        out.push(base + len as u8);
    } else {
        let len_bytes = nat_to_bytes(&len.into());
        out.push(base + 0x37 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a byte sequence into the item tree it canonically encodes.
///
/// The whole input must be consumed by a single item; leftover bytes are an
/// error because a signed payload with a loose tail is two different
/// messages depending on who reads it.
pub fn decode(bytes: &[u8]) -> Result<Item, RlpError> {
    let mut cursor = Cursor {
        data: bytes,
        pos: 0,
    };
    let item = decode_item(&mut cursor, 0)?;
    if cursor.pos != bytes.len() {
        trace!(remaining = bytes.len() - cursor.pos, "rlp decode left trailing bytes");
        return Err(RlpError::TrailingBytes {
            remaining: bytes.len() - cursor.pos,
        });
    }
    Ok(item)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], RlpError> {
        let available = self.data.len() - self.pos;
        if n > available {
            return Err(RlpError::Truncated {
                needed: n,
                available,
                offset: self.pos,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

fn decode_item(cursor: &mut Cursor<'_>, depth: usize) -> Result<Item, RlpError> {
    if depth > MAX_RLP_DEPTH {
        return Err(RlpError::TooDeep { max: MAX_RLP_DEPTH });
    }

    let prefix_offset = cursor.pos;
    let prefix = cursor.take(1)?[0];

    match prefix {
        // The byte encodes itself.
        0x00..=0x7f => Ok(Item::Leaf(vec![prefix])),

        // Short leaf.
        0x80..=0xb7 => {
            let len = (prefix - 0x80) as usize;
            let payload = cursor.take(len)?;
            if len == 1 && payload[0] < 0x80 {
                return Err(RlpError::InvalidPrefix {
                    byte: prefix,
                    offset: prefix_offset,
                    reason: "single byte below 0x80 must encode as itself",
                });
            }
            Ok(Item::Leaf(payload.to_vec()))
        }

        // Long leaf.
        0xb8..=0xbf => {
            let len = read_long_length(cursor, prefix, 0xb7, prefix_offset)?;
            Ok(Item::Leaf(cursor.take(len)?.to_vec()))
        }

        // Short list.
        0xc0..=0xf7 => {
            let len = (prefix - 0xc0) as usize;
            let body = cursor.take(len)?;
            decode_list(body, cursor.pos - len, depth)
        }

        // Long list.
        0xf8..=0xff => {
            let len = read_long_length(cursor, prefix, 0xf7, prefix_offset)?;
            let body = cursor.take(len)?;
            decode_list(body, cursor.pos - len, depth)
        }
    }
}

/// Reads the big-endian length of a long-form item, enforcing that the
/// long form was actually required and that the length is minimally
/// encoded.
fn read_long_length(
    cursor: &mut Cursor<'_>,
    prefix: u8,
    base: u8,
    prefix_offset: usize,
) -> Result<usize, RlpError> {
    let len_of_len = (prefix - base) as usize;
    let len_bytes = cursor.take(len_of_len)?;
    if len_bytes[0] == 0 {
        return Err(RlpError::InvalidPrefix {
            byte: prefix,
            offset: prefix_offset,
            reason: "length has a leading zero byte",
        });
    }
    // Truly enormous lengths cannot fit in memory anyway; flag them as
    // truncation against what actually remains.
    let len = bytes_to_nat(len_bytes)
        .to_usize()
        .ok_or(RlpError::Truncated {
            needed: usize::MAX,
            available: cursor.data.len() - cursor.pos,
            offset: prefix_offset,
        })?;
    if len <= SHORT_LENGTH_MAX {
        return Err(RlpError::InvalidPrefix {
            byte: prefix,
            offset: prefix_offset,
            reason: "long form used where the short form fits",
        });
    }
    Ok(len)
}

/// Decodes the concatenated child encodings inside a list payload.
/// `base_offset` keeps error offsets relative to the original input.
fn decode_list(body: &[u8], base_offset: usize, depth: usize) -> Result<Item, RlpError> {
    let mut children = Vec::new();
    let mut cursor = Cursor {
        data: body,
        pos: 0,
    };
    while cursor.pos < body.len() {
        match decode_item(&mut cursor, depth + 1) {
            Ok(child) => children.push(child),
            // Re-base offsets so they point into the caller's input.
            Err(err) => return Err(rebase(err, base_offset)),
        }
    }
    Ok(Item::List(children))
}

fn rebase(err: RlpError, base: usize) -> RlpError {
    match err {
        RlpError::Truncated {
            needed,
            available,
            offset,
        } => RlpError::Truncated {
            needed,
            available,
            offset: offset + base,
        },
        RlpError::InvalidPrefix {
            byte,
            offset,
            reason,
        } => RlpError::InvalidPrefix {
            byte,
            offset: offset + base,
            reason,
        },
        other => other,
    }
}
