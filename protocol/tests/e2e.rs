//! End-to-end integration tests for the INT protocol core.
//!
//! These tests exercise the full client pipeline against byte-exact
//! reference vectors produced by a known-good implementation: key
//! derivation, ABI call-data assembly, transaction signing, and sender
//! recovery all have to reproduce or invert the reference bytes exactly.
//!
//! Each test stands alone. No shared state, no ordering dependencies.

use num_bigint::BigUint;

use int_protocol::abi::{self, Value};
use int_protocol::account::{Account, Address};
use int_protocol::bytes;
use int_protocol::crypto::keccak256;
use int_protocol::keystore::Keystore;
use int_protocol::rlp::{self, Item};
use int_protocol::transaction::{recover_sender, Transaction};
use int_protocol::units;

// ---------------------------------------------------------------------------
// Reference Data
// ---------------------------------------------------------------------------

const TEST_ADDRESS: &str = "INT3Pkr1zMmk3mnFzihH5F4kNxFavJo4";
const TEST_PRIVATE_KEY: &str =
    "0xc15c038a5a9f8f948a2ac0eb102c249e4ae1c4fa1f0971b50c63db46dc5fcf8b";

/// 65-byte consensus public key used by the validator-registration flow.
const CONS_PUB_KEY: &str = "0x0684EF4E9B6F47A0EB5430B427CB00687FBD301B695101EDB0DCC69CDDB3635239DF0B4D471F6B7F43077EA614492EC2438707FE26A8D9E64D463ACDFE806D0375B4DE3D43BC57FF2F31FA14D9A4B81E40A572E2ACD9742ED43C09A328487229678195B7F90D14A6D8493E750347C339508C8480F712369D919F747014E15C21";

/// 64-byte address signature returned by the node for registration.
const ADDRESS_SIGN: &str = "0x205bad9718ae61bfd1c4c18c941cbfe2def912e1094b7327e6abddd2dc3fdc89641a94a65322dbd6a3998c2eab9de1f23e72562cc699f2d0e3e1ebf00b431632";

fn test_account() -> Account {
    Account::from_private_hex(TEST_PRIVATE_KEY).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Key Derivation
// ---------------------------------------------------------------------------

#[test]
fn private_key_derives_the_reference_address() {
    assert_eq!(test_account().address().as_str(), TEST_ADDRESS);
}

#[test]
fn created_accounts_have_valid_addresses_and_round_trip() {
    let account = Account::create(Some(b"integration entropy")).unwrap();
    assert!(Address::is_valid(account.address().as_str()));

    // The raw key must rebuild the identical account.
    let rebuilt = Account::from_private(&account.private_key_bytes()).unwrap();
    assert_eq!(rebuilt.address(), account.address());
}

// ---------------------------------------------------------------------------
// 2. Transaction Signature Stability
// ---------------------------------------------------------------------------

/// The reference transfer: chain 2, zero value, self-addressed.
fn reference_transfer() -> Transaction {
    Transaction {
        chain_id: 2,
        nonce: BigUint::from(0u8),
        gas_price: BigUint::from(10_000_000_000u64),
        gas: BigUint::from(30_000u64),
        to: Some(Address::new(TEST_ADDRESS).unwrap()),
        value: BigUint::from(0u8),
        data: Vec::new(),
    }
}

/// The exact signed bytes the reference client produces for
/// [`reference_transfer`] under the test key.
const REFERENCE_SIGNED: &str = "0xf870808502540be400827530a0494e5433506b72317a4d6d6b336d6e467a6968483546346b4e784661764a6f34808028a075a8d89b0e88a24b51eebbf0cbac07c52fd4ebe434594b13bb54674bff60c3cda05cc30d2b8b144889650ebc70d68ab4e403b91180a2cd8fad52f9d9652c31121d";

#[test]
fn signing_reproduces_the_reference_bytes_exactly() {
    let raw = reference_transfer().sign(&test_account()).unwrap();
    assert_eq!(bytes::to_hex(&raw), REFERENCE_SIGNED);
}

#[test]
fn recovery_inverts_the_reference_signature() {
    let raw = reference_transfer().sign(&test_account()).unwrap();
    assert_eq!(recover_sender(&raw).unwrap().as_str(), TEST_ADDRESS);
}

// ---------------------------------------------------------------------------
// 3. Validator Registration Call Data
// ---------------------------------------------------------------------------

#[test]
fn register_call_data_matches_the_reference_layout() {
    let types = abi::parse_types(&["bytes", "bytes", "uint8"]).unwrap();
    assert_eq!(hex::encode(abi::method_id("Register", &types)), "f1b2ef10");

    let values = [
        Value::Bytes(bytes::from_hex(CONS_PUB_KEY).unwrap()),
        Value::Bytes(bytes::from_hex(ADDRESS_SIGN).unwrap()),
        Value::uint(10u8),
    ];
    let encoded = abi::encode_params(&types, &values).unwrap();
    assert_eq!(
        bytes::to_hex(&encoded),
        "0x0000000000000000000000000000000000000000000000000000000000000060\
         0000000000000000000000000000000000000000000000000000000000000100\
         000000000000000000000000000000000000000000000000000000000000000a\
         0000000000000000000000000000000000000000000000000000000000000080\
         0684ef4e9b6f47a0eb5430b427cb00687fbd301b695101edb0dcc69cddb36352\
         39df0b4d471f6b7f43077ea614492ec2438707fe26a8d9e64d463acdfe806d03\
         75b4de3d43bc57ff2f31fa14d9a4b81e40a572e2acd9742ed43c09a328487229\
         678195b7f90d14a6d8493e750347c339508c8480f712369d919f747014e15c21\
         0000000000000000000000000000000000000000000000000000000000000040\
         205bad9718ae61bfd1c4c18c941cbfe2def912e1094b7327e6abddd2dc3fdc89\
         641a94a65322dbd6a3998c2eab9de1f23e72562cc699f2d0e3e1ebf00b431632"
    );

    // The decoded arguments must come back shape-identical.
    let decoded = abi::decode_params(&types, &encoded).unwrap();
    assert_eq!(decoded, values);
}

#[test]
fn full_registration_transaction_assembles_and_recovers() {
    let account = test_account();
    let data = abi::encode_call(
        "Register",
        &["bytes", "bytes", "uint8"],
        &[
            Value::Bytes(bytes::from_hex(CONS_PUB_KEY).unwrap()),
            Value::Bytes(bytes::from_hex(ADDRESS_SIGN).unwrap()),
            Value::uint(10u8),
        ],
    )
    .unwrap();

    let stake = units::from_int("10000").unwrap();
    let tx = Transaction {
        chain_id: 2,
        nonce: BigUint::from(1u8),
        gas_price: BigUint::from(10_000_000_000u64),
        gas: BigUint::from(50_000u64),
        to: Some(Address::new("INT3FFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap()),
        value: stake.to_biguint().unwrap(),
        data,
    };

    let raw = tx.sign(&account).unwrap();
    assert_eq!(&recover_sender(&raw).unwrap(), account.address());

    // The signed record stays parseable RLP with the call data intact.
    let decoded = rlp::decode(&raw).unwrap();
    let items = decoded.as_list().unwrap();
    assert_eq!(items.len(), 9);
    assert_eq!(&items[5].as_leaf().unwrap()[..4], [0xf1, 0xb2, 0xef, 0x10]);
}

// ---------------------------------------------------------------------------
// 4. Address Validity
// ---------------------------------------------------------------------------

#[test]
fn address_validity_matches_the_reference_table() {
    let table = [
        ("INT3Pkr1zMmk3mnFzihH5F4kNxFavJo4", true),
        ("INT3Pkr1zMmk3mnFzihH5F4kNxFavJo", false),
        ("INT4Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("iNT3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("InT3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("INt3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("int3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("Int3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("iNt3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("inT3Pkr1zMmk3mnFzihH5F4kNxFavJo4", false),
        ("INT", false),
        ("INT3", false),
        ("INT3Pkr1zMmk3mnFzihH5F4kNxFavJo0", false),
        ("INT3Pkr1zMmk3mnFzihH5F4kNxFavJoO", false),
        ("INT3Pkr1zMmk3mnFzihH5F4kNxFavJoI", false),
        ("INT3Pkr1zMmk3mnFzihH5F4kNxFavJol", false),
        ("INT3FFFFFFFFFFFFFFFFFFFFFFFFFFFF", true),
        ("INT3AAAAAAAAAAAAAAAAAAAAAAAAAAAA", true),
    ];
    for (address, valid) in table {
        assert_eq!(Address::is_valid(address), valid, "address {address:?}");
    }
}

// ---------------------------------------------------------------------------
// 5. Sign/Recover Inverse
// ---------------------------------------------------------------------------

#[test]
fn recover_inverts_sign_for_fresh_keys() {
    for i in 0..4u8 {
        let account = Account::create(None).unwrap();
        let digest = keccak256(&[i]);
        let signature = account.sign(&digest).unwrap();
        let recovered = int_protocol::account::recover(&digest, &signature).unwrap();
        assert_eq!(&recovered, account.address());
    }
}

// ---------------------------------------------------------------------------
// 6. Keystore Interchange
// ---------------------------------------------------------------------------

#[test]
fn wallet_keystore_document_round_trips() {
    let document = r#"{"version":3,"id":"fc64a970-117a-4507-925b-4107b761d361","address":"INT3CTuDn49ET2dgMWBRauQMnnQECZy9","crypto":{"ciphertext":"f6bde26131cf6c26a87c3bfdfeae8426b564e7263a1238e2bdce9da36c7fdc20","cipherparams":{"iv":"75df1a41193930a895721c0f077b2be7"},"cipher":"aes-128-ctr","kdf":"scrypt","kdfparams":{"dklen":32,"salt":"dd8233d31da738ee24a4c9926bfe8f67971dc8780fda8809c02713533414ed15","n":8192,"r":8,"p":1},"mac":"735c0d711f712dbcaea783bf94b108a5ef681657a340f7f662fa6925e2defcb6"}}"#;
    let keystore = Keystore::from_json(document).unwrap();
    assert_eq!(
        keystore.address.as_str(),
        "INT3CTuDn49ET2dgMWBRauQMnnQECZy9"
    );
    assert_eq!(keystore.to_json().unwrap(), document);
}

// ---------------------------------------------------------------------------
// 7. Codec Composition
// ---------------------------------------------------------------------------

#[test]
fn rlp_round_trips_the_unsigned_record() {
    let tx = reference_transfer();
    let encoded = tx.signing_data();
    let decoded = rlp::decode(&encoded).unwrap();
    assert_eq!(rlp::encode(&decoded), encoded);

    let items = decoded.as_list().unwrap();
    assert_eq!(items[3].as_leaf(), Some(TEST_ADDRESS.as_bytes()));
    assert_eq!(items[6], Item::leaf(&[0x02])); // chain id
}

#[test]
fn amounts_survive_the_unit_round_trip() {
    for amount in ["1", "0.5", "10000", "0.000000000000000001"] {
        let base_units = units::from_int(amount).unwrap();
        assert_eq!(units::to_int(&base_units), amount);
    }
}
