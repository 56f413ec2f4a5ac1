//! Serialization round-trips and the negative vectors: malformed, tampered,
//! and out-of-range keys must map to the right errors.

use hdk256::{
    b58_deserialize_private_key, b58_deserialize_public_key, deserialize_private_key,
    deserialize_public_key, new_master_key, Error, FIRST_HARDENED_CHILD_INDEX,
    KEY_LENGTH_IN_BYTES,
};
use hex_literal::hex;
use sha2::{Digest, Sha256};

const SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

const MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
const MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

/// Recomputes the trailing double-SHA-256 checksum after a test mutates the
/// payload, so only the mutation under test is invalid.
fn fix_checksum(data: &mut [u8; KEY_LENGTH_IN_BYTES]) {
    let digest = Sha256::digest(Sha256::digest(&data[..78]));
    data[78..].copy_from_slice(&digest[..4]);
}

#[test]
fn private_key_round_trip() {
    let master = new_master_key(&SEED);
    let serialized = master.serialize();

    let parsed = deserialize_private_key(serialized).unwrap();
    assert_eq!(parsed.serialize(), serialized);
    assert_eq!(parsed.depth(), 0);
    assert_eq!(parsed.child_number(), 0);
    assert_eq!(parsed.private_key(), master.private_key());
    assert_eq!(parsed.chain_code(), master.chain_code());

    let reparsed = b58_deserialize_private_key(MASTER_XPRV).unwrap();
    assert_eq!(reparsed.b58_serialize(), MASTER_XPRV);
}

#[test]
fn public_key_round_trip() {
    let public = new_master_key(&SEED).get_public_key();
    let serialized = public.serialize();

    let parsed = deserialize_public_key(serialized).unwrap();
    assert_eq!(parsed.serialize(), serialized);
    assert_eq!(parsed.public_key(), public.public_key());

    let reparsed = b58_deserialize_public_key(MASTER_XPUB).unwrap();
    assert_eq!(reparsed.b58_serialize(), MASTER_XPUB);
}

#[test]
fn child_key_round_trip() {
    let child = new_master_key(&SEED)
        .new_child_key(FIRST_HARDENED_CHILD_INDEX + 7)
        .unwrap()
        .new_child_key(3)
        .unwrap();

    let parsed = deserialize_private_key(child.serialize()).unwrap();
    assert_eq!(parsed.serialize(), child.serialize());
    assert_eq!(parsed.depth(), 2);
    assert_eq!(parsed.child_number(), 3);
    assert_eq!(parsed.parent_fingerprint(), child.parent_fingerprint());
}

#[test]
fn b58_length_is_checked_first() {
    assert_eq!(
        b58_deserialize_private_key(&MASTER_XPRV[..110]).unwrap_err(),
        Error::InvalidKeyLength
    );
    let too_long = format!("{MASTER_XPRV}1");
    assert_eq!(
        b58_deserialize_private_key(&too_long).unwrap_err(),
        Error::InvalidKeyLength
    );
    assert_eq!(
        b58_deserialize_public_key("").unwrap_err(),
        Error::InvalidKeyLength
    );
}

#[test]
fn tampered_checksum_is_rejected() {
    // Flip the final character to a different alphabet character.
    let mut tampered = String::from(&MASTER_XPRV[..110]);
    tampered.push(if MASTER_XPRV.ends_with('i') { 'j' } else { 'i' });
    assert_eq!(
        b58_deserialize_private_key(&tampered).unwrap_err(),
        Error::ChecksumMismatch
    );

    // Flip a single payload bit.
    let mut data = new_master_key(&SEED).serialize();
    data[20] ^= 0x01;
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::ChecksumMismatch
    );
}

#[test]
fn unknown_version_is_rejected() {
    let mut data = new_master_key(&SEED).serialize();
    data[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::InvalidVersion
    );

    // A public version is not a valid private version, and vice versa.
    let private = new_master_key(&SEED).serialize();
    let public = new_master_key(&SEED).get_public_key().serialize();

    let mut crossed = private;
    crossed[..4].copy_from_slice(&public[..4]);
    fix_checksum(&mut crossed);
    assert_eq!(
        deserialize_private_key(crossed).unwrap_err(),
        Error::InvalidVersion
    );

    let mut crossed = public;
    crossed[..4].copy_from_slice(&private[..4]);
    fix_checksum(&mut crossed);
    assert_eq!(
        deserialize_public_key(crossed).unwrap_err(),
        Error::InvalidVersion
    );
}

#[test]
fn zero_depth_invariants_are_enforced() {
    // Depth zero with a non-zero parent fingerprint.
    let mut data = new_master_key(&SEED).serialize();
    data[5] = 0x01;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::ZeroDepthAndNonZeroParentFingerprint
    );

    // Depth zero with a non-zero child number.
    let mut data = new_master_key(&SEED).serialize();
    data[12] = 0x01;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::ZeroDepthAndNonZeroIndex
    );

    // The same applies to public keys.
    let mut data = new_master_key(&SEED).get_public_key().serialize();
    data[8] = 0xff;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_public_key(data).unwrap_err(),
        Error::ZeroDepthAndNonZeroParentFingerprint
    );
}

#[test]
fn private_scalar_range_is_enforced() {
    // Zero scalar.
    let mut data = new_master_key(&SEED).serialize();
    data[46..78].fill(0);
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::PrivateKeyNotInRange
    );

    // Scalar equal to the group order.
    let order = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
    let mut data = new_master_key(&SEED).serialize();
    data[46..78].copy_from_slice(&order);
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::PrivateKeyNotInRange
    );

    // Order minus one is the largest valid scalar.
    let order_minus_one =
        hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140");
    let mut data = new_master_key(&SEED).serialize();
    data[46..78].copy_from_slice(&order_minus_one);
    fix_checksum(&mut data);
    assert!(deserialize_private_key(data).is_ok());
}

#[test]
fn nonzero_private_padding_byte_is_rejected() {
    let mut data = new_master_key(&SEED).serialize();
    data[45] = 0x01;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_private_key(data).unwrap_err(),
        Error::InvalidPrivateKey
    );
}

#[test]
fn public_key_must_be_on_the_curve() {
    // x = 5: x^3 + 7 is not a quadratic residue, so no point has this
    // x-coordinate.
    let mut data = new_master_key(&SEED).get_public_key().serialize();
    data[45] = 0x02;
    data[46..78].fill(0);
    data[77] = 0x05;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_public_key(data).unwrap_err(),
        Error::InvalidPublicKey
    );
}

#[test]
fn public_key_header_must_be_compressed() {
    let mut data = new_master_key(&SEED).get_public_key().serialize();
    data[45] = 0x04;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_public_key(data).unwrap_err(),
        Error::InvalidPublicKey
    );

    let mut data = new_master_key(&SEED).get_public_key().serialize();
    data[45] = 0x00;
    fix_checksum(&mut data);
    assert_eq!(
        deserialize_public_key(data).unwrap_err(),
        Error::InvalidPublicKey
    );
}

#[test]
fn derivation_stops_at_maximum_depth() {
    // Craft a depth-255 key; walking there takes too long.
    let mut data = new_master_key(&SEED).serialize();
    data[4] = 255;
    data[5] = 0x01; // depth != 0 frees the fingerprint and child number
    fix_checksum(&mut data);
    let deep = deserialize_private_key(data).unwrap();
    assert_eq!(deep.new_child_key(0).unwrap_err(), Error::TooDeepKey);
    assert_eq!(
        deep.new_child_key(FIRST_HARDENED_CHILD_INDEX).unwrap_err(),
        Error::TooDeepKey
    );

    let mut data = new_master_key(&SEED).get_public_key().serialize();
    data[4] = 255;
    data[5] = 0x01;
    fix_checksum(&mut data);
    let deep = deserialize_public_key(data).unwrap();
    assert_eq!(deep.new_child_key(0).unwrap_err(), Error::TooDeepKey);
}

#[test]
fn decoded_garbage_fails_the_checksum() {
    // 111 characters of a valid length but no valid checksum; the decoder
    // itself accepts anything.
    let garbage = "1".repeat(111);
    assert_eq!(
        b58_deserialize_private_key(&garbage).unwrap_err(),
        Error::ChecksumMismatch
    );

    // Invalid characters decode to unspecified digits; the checksum layer is
    // what rejects them.
    let mut invalid = String::from(&MASTER_XPRV[..108]);
    invalid.push_str("0OI");
    assert_eq!(invalid.len(), 111);
    assert_eq!(
        b58_deserialize_private_key(&invalid).unwrap_err(),
        Error::ChecksumMismatch
    );
}
