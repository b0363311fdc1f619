//! Low-level cryptographic primitives: the hash functions every other
//! module builds on. The elliptic-curve operations themselves live in
//! [`crate::account`], next to the key material they act on.

pub mod hash;

pub use hash::{hash160, keccak256, sha256};
