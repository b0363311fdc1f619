//! # Transaction Assembly
//!
//! Composes the RLP codec and the signing layer into signed wire records.
//!
//! An unsigned transaction serializes as a nine-item RLP list: the six
//! payload fields, then the chain identifier and two empty placeholders.
//! Signing hashes those bytes, signs the digest with the
//! `chain_id * 2 + 35` offset folded into `v`, and re-encodes the first
//! six items followed by `v`, `r`, `s` — again nine items, so signed and
//! unsigned records share a shape and the placeholders are exactly where
//! the signature lands.
//!
//! Recovery inverts the splice: it rebuilds the unsigned list from a
//! signed record (recomputing the chain identifier from `v`), hashes it,
//! and runs public-key recovery to obtain the sender address without the
//! private key.

use num_bigint::BigUint;
use thiserror::Error;
use tracing::debug;

use crate::account::{self, Account, AccountError, Address, Signature};
use crate::bytes::{self, BytesError};
use crate::config::{CHAIN_V_OFFSET, DEFAULT_CHAIN_ID, SIGNATURE_COMPONENT_LENGTH, SIGNED_TX_ITEMS};
use crate::crypto::keccak256;
use crate::rlp::{self, Item, RlpError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from transaction signing and sender recovery.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The record is not well-formed RLP.
    #[error(transparent)]
    Rlp(#[from] RlpError),

    /// Signing or public-key recovery failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// A signature component with an impossible length.
    #[error(transparent)]
    Bytes(#[from] BytesError),

    /// The decoded record is not a list.
    #[error("signed transaction must be an RLP list")]
    NotAList,

    /// The decoded list has the wrong number of items.
    #[error("signed transaction has {got} items, expected {expected}")]
    WrongItemCount {
        /// Items a signed record must carry.
        expected: usize,
        /// Items actually present.
        got: usize,
    },

    /// A field that must be a byte string decoded as a nested list.
    #[error("transaction field {index} is a nested list, expected bytes")]
    UnexpectedList {
        /// Zero-based position of the offending field.
        index: usize,
    },
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned transaction.
///
/// All numeric fields are arbitrary-precision naturals and serialize in
/// minimal big-endian form, so a zero `nonce` or `value` becomes the
/// empty byte string on the wire. The recipient is the 32-character
/// display address, carried as its UTF-8 bytes; `None` means a contract
/// creation and serializes as the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Network the signature will be bound to.
    pub chain_id: u64,
    /// Sender's transaction count.
    pub nonce: BigUint,
    /// Price per gas unit, in base units.
    pub gas_price: BigUint,
    /// Gas limit.
    pub gas: BigUint,
    /// Recipient display address, or `None` for contract creation.
    pub to: Option<Address>,
    /// Transferred amount, in base units.
    pub value: BigUint,
    /// Call data, usually ABI-encoded.
    pub data: Vec<u8>,
}

impl Transaction {
    /// A zeroed transaction on the default chain. Callers fill in the
    /// fields they need.
    pub fn new() -> Self {
        Transaction {
            chain_id: DEFAULT_CHAIN_ID,
            nonce: BigUint::default(),
            gas_price: BigUint::default(),
            gas: BigUint::default(),
            to: None,
            value: BigUint::default(),
            data: Vec::new(),
        }
    }

    /// The unsigned nine-item field list.
    fn unsigned_items(&self) -> Vec<Item> {
        let to = match &self.to {
            Some(address) => address.as_str().as_bytes().to_vec(),
            None => Vec::new(),
        };
        vec![
            Item::Leaf(bytes::nat_to_bytes(&self.nonce)),
            Item::Leaf(bytes::nat_to_bytes(&self.gas_price)),
            Item::Leaf(bytes::nat_to_bytes(&self.gas)),
            Item::Leaf(to),
            Item::Leaf(bytes::nat_to_bytes(&self.value)),
            Item::Leaf(self.data.clone()),
            Item::Leaf(bytes::nat_to_bytes(&BigUint::from(self.chain_id))),
            Item::empty(),
            Item::empty(),
        ]
    }

    /// The exact bytes that get hashed and signed: the RLP encoding of
    /// the unsigned field list.
    pub fn signing_data(&self) -> Vec<u8> {
        rlp::encode(&Item::List(self.unsigned_items()))
    }

    /// Sign the transaction, producing the signed wire record.
    ///
    /// The digest of [`signing_data`](Self::signing_data) is signed with
    /// the `chain_id * 2 + 35` offset, then the two placeholders are
    /// replaced by `v`, `r`, `s` and the list re-encoded.
    pub fn sign(&self, account: &Account) -> Result<Vec<u8>, TransactionError> {
        let digest = keccak256(&self.signing_data());
        let offset = BigUint::from(self.chain_id) * 2u8 + BigUint::from(CHAIN_V_OFFSET);
        let signature = account.sign_with_offset(&digest, &offset)?;

        let mut items = self.unsigned_items();
        items.truncate(6);
        items.push(Item::Leaf(bytes::nat_to_bytes(&signature.v)));
        items.push(Item::Leaf(signature.r.to_vec()));
        items.push(Item::Leaf(signature.s.to_vec()));

        let raw = rlp::encode(&Item::List(items));
        debug!(
            chain_id = self.chain_id,
            sender = %account.address(),
            len = raw.len(),
            "signed transaction"
        );
        Ok(raw)
    }

    /// The unsigned eight-item call field list: the transaction fields
    /// minus the nonce, so the signature stays valid however many
    /// transactions the sender has since issued.
    fn unsigned_call_items(&self) -> Vec<Item> {
        let mut items = self.unsigned_items();
        items.remove(0);
        items
    }

    /// The exact bytes hashed and signed for a call record.
    pub fn call_signing_data(&self) -> Vec<u8> {
        rlp::encode(&Item::List(self.unsigned_call_items()))
    }

    /// Sign the transaction as a nonce-less call record.
    ///
    /// Same signing scheme as [`sign`](Self::sign), but over the
    /// eight-item call list. Truncating to six items here keeps the chain
    /// identifier in the record, so the signed output is again nine
    /// items: the five payload fields, the chain identifier, then `v`,
    /// `r`, `s`.
    pub fn sign_call(&self, account: &Account) -> Result<Vec<u8>, TransactionError> {
        let digest = keccak256(&self.call_signing_data());
        let offset = BigUint::from(self.chain_id) * 2u8 + BigUint::from(CHAIN_V_OFFSET);
        let signature = account.sign_with_offset(&digest, &offset)?;

        let mut items = self.unsigned_call_items();
        items.truncate(6);
        items.push(Item::Leaf(bytes::nat_to_bytes(&signature.v)));
        items.push(Item::Leaf(signature.r.to_vec()));
        items.push(Item::Leaf(signature.s.to_vec()));

        let raw = rlp::encode(&Item::List(items));
        debug!(
            chain_id = self.chain_id,
            sender = %account.address(),
            len = raw.len(),
            "signed call"
        );
        Ok(raw)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction::new()
    }
}

// ---------------------------------------------------------------------------
// Sender recovery
// ---------------------------------------------------------------------------

/// Recover the sender address from signed transaction bytes.
///
/// Rebuilds the unsigned field list from the record: for a chain-bound
/// signature (`v >= 35`) the chain identifier is recomputed as
/// `(v - 35) >> 1` and spliced back in ahead of the placeholders; for a
/// plain signature the list is the six payload fields plus the two
/// placeholders. The hash of that encoding is what public-key recovery
/// runs against.
pub fn recover_sender(raw: &[u8]) -> Result<Address, TransactionError> {
    let decoded = rlp::decode(raw)?;
    let items = decoded.as_list().ok_or(TransactionError::NotAList)?;
    if items.len() != SIGNED_TX_ITEMS {
        return Err(TransactionError::WrongItemCount {
            expected: SIGNED_TX_ITEMS,
            got: items.len(),
        });
    }

    let leaf = |index: usize| -> Result<&[u8], TransactionError> {
        items[index]
            .as_leaf()
            .ok_or(TransactionError::UnexpectedList { index })
    };

    let v = bytes::bytes_to_nat(leaf(6)?);
    let signature = Signature {
        r: component(leaf(7)?)?,
        s: component(leaf(8)?)?,
        v: v.clone(),
    };

    let mut unsigned: Vec<Item> = items[..6].to_vec();
    if v >= BigUint::from(CHAIN_V_OFFSET) {
        let chain_id = (v - BigUint::from(CHAIN_V_OFFSET)) >> 1;
        unsigned.push(Item::Leaf(bytes::nat_to_bytes(&chain_id)));
    }
    unsigned.push(Item::empty());
    unsigned.push(Item::empty());

    let digest = keccak256(&rlp::encode(&Item::List(unsigned)));
    Ok(account::recover(&digest, &signature)?)
}

/// Left-pad a decoded `r` or `s` leaf back to its fixed width.
fn component(leaf: &[u8]) -> Result<[u8; SIGNATURE_COMPONENT_LENGTH], TransactionError> {
    let padded = bytes::pad_left(SIGNATURE_COMPONENT_LENGTH, leaf)?;
    let mut out = [0u8; SIGNATURE_COMPONENT_LENGTH];
    out.copy_from_slice(&padded);
    Ok(out)
}
