// Copyright (c) 2026 INT Chain contributors. MIT License.
// See LICENSE for details.

//! # INT Protocol — Core Client Library
//!
//! The binary-encoding and transaction-authentication core of an INT
//! Chain client: everything needed to turn structured values into the
//! exact bytes the ledger requires, and to sign them so the ledger
//! believes you.
//!
//! Byte-exact is the operative phrase. A signed transaction either
//! reproduces the reference encoding down to the last bit or it is
//! rejected by the network, so every codec in here is canonical in both
//! directions: one encoding per value, and the decoder refuses anything
//! a correct encoder could not have produced.
//!
//! ## Architecture
//!
//! The modules mirror the layers of the encoding pipeline:
//!
//! - **bytes** — Minimal-byte naturals and the byte-sequence toolbox.
//! - **rlp** — The recursive length-prefixed codec, canonical-only.
//! - **abi** — Typed argument encoding with head/tail layout.
//! - **crypto** — Keccak-256, SHA-256 and hash160. Nothing home-grown.
//! - **account** — secp256k1 keypairs, display addresses, recoverable
//!   signatures.
//! - **transaction** — Splices the layers into signed wire records.
//! - **keystore** — Serde schema for the version-3 wallet document.
//! - **units** — Exact decimal-string ↔ base-unit conversion.
//! - **config** — Every magic number, named once.
//!
//! ## Design Philosophy
//!
//! 1. Canonical encodings or no encodings — malleability is a bug class,
//!    not a feature.
//! 2. Arbitrary precision everywhere an amount appears. Floating point
//!    never touches money.
//! 3. Hostile input is the normal case for every decoder.
//! 4. If it signs something, it has a known-answer test.

pub mod abi;
pub mod account;
pub mod bytes;
pub mod config;
pub mod crypto;
pub mod keystore;
pub mod rlp;
pub mod transaction;
pub mod units;
