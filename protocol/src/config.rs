//! # Protocol Constants
//!
//! Every magic number the library relies on lives here. Address shape,
//! signature `v` offsets, ABI word size, recursion limits — if a value is
//! part of the wire or address format, it gets a name in this file and
//! nowhere else.

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Total length of a display address, in characters. Always.
pub const ADDRESS_LENGTH: usize = 32;

/// The literal prefix every valid address starts with. The `3` is not an
/// accident: it is the first character Base58Check produces for the
/// [`ADDRESS_VERSION`] byte, fixed into the format as part of the brand.
pub const ADDRESS_PREFIX: &str = "INT3";

/// Version byte prepended to the hash160 payload before Base58Check encoding.
pub const ADDRESS_VERSION: u8 = 0x05;

/// How many characters of the Base58Check string survive into the address.
/// The display form is `"INT"` followed by these 29 characters.
pub const ADDRESS_CHECKSUM_CHARS: usize = 29;

/// The Base58 alphabet used by the checksum encoding. Note the absent
/// characters: `0`, `O`, `I` and `l` can never appear in a valid address.
pub const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// `v` offset for plain message signing: `v = 27 + recovery_parity`.
pub const MESSAGE_V_OFFSET: u64 = 27;

/// Base `v` offset for chain-bound transaction signing:
/// `v = chain_id * 2 + 35 + recovery_parity`. Folding the chain identifier
/// into `v` binds a signature to exactly one network.
pub const CHAIN_V_OFFSET: u64 = 35;

/// Length of each of the `r` and `s` signature components, in bytes.
pub const SIGNATURE_COMPONENT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Chain identifier used when a transaction does not specify one.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Number of RLP items in a signed transaction record: the six payload
/// fields followed by `v`, `r`, `s`.
pub const SIGNED_TX_ITEMS: usize = 9;

// ---------------------------------------------------------------------------
// ABI
// ---------------------------------------------------------------------------

/// Size of one ABI word, in bytes. Every head slot and every numeric scalar
/// occupies exactly one word.
pub const ABI_WORD: usize = 32;

/// Length of a method identifier: the leading bytes of the Keccak-256 hash
/// of the canonical signature string.
pub const METHOD_ID_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Recursion limits
// ---------------------------------------------------------------------------

/// Maximum nesting depth accepted by the RLP decoder. Crafted input cannot
/// force stack growth beyond this bound; deeper structures are rejected
/// with a dedicated error instead of overflowing the call stack.
pub const MAX_RLP_DEPTH: usize = 64;

/// Maximum number of array dimensions accepted by the ABI type parser.
/// This bounds the recursion depth of both the encoder and the decoder,
/// since their recursion follows the parsed type tree.
pub const MAX_ABI_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Number of decimal places in one whole INT: `1 INT = 10^18` base units.
pub const INT_DECIMALS: usize = 18;
