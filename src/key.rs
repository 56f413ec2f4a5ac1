//! Constants and helpers shared by both extended-key types.

use subtle::{Choice, ConstantTimeEq};

use crate::base58;
use crate::error::Error;

/// The first hardened child index.
///
/// Hardened children cannot be derived from a public parent, trading the
/// public-derivation feature for isolation of the parent private key.
pub const FIRST_HARDENED_CHILD_INDEX: u32 = 0x8000_0000;

/// Length of a serialized extended key (public or private).
pub const KEY_LENGTH_IN_BYTES: usize = 82;

/// Length of a Base58-encoded extended key.
pub const B58_KEY_LENGTH: usize = 111;

/// Version bytes of mainnet extended private keys (`xprv...`).
pub const MAINNET_PRIVATE_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// Version bytes of mainnet extended public keys (`xpub...`).
pub const MAINNET_PUBLIC_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

/// Version bytes of testnet extended private keys (`tprv...`).
pub const TESTNET_PRIVATE_VERSION: [u8; 4] = [0x04, 0x35, 0x83, 0x94];

/// Version bytes of testnet extended public keys (`tpub...`).
pub const TESTNET_PUBLIC_VERSION: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

/// Base58-encodes a serialized extended key.
pub(crate) fn b58_encode_key_bytes(bytes: &[u8; KEY_LENGTH_IN_BYTES]) -> String {
    base58::encode(bytes, B58_KEY_LENGTH)
}

/// Decodes a Base58 extended-key string into its 82 raw bytes.
///
/// Only the length is validated here; everything else is the deserializer's
/// job, with the checksum catching decode garbage.
pub(crate) fn b58_decode_key_bytes(encoded: &str) -> Result<[u8; KEY_LENGTH_IN_BYTES], Error> {
    if encoded.len() != B58_KEY_LENGTH {
        return Err(Error::InvalidKeyLength);
    }
    let mut data = [0u8; KEY_LENGTH_IN_BYTES];
    base58::decode(encoded, &mut data);
    Ok(data)
}

/// Verifies the trailing checksum of a serialized key in constant time.
pub(crate) fn verify_checksum(data: &[u8; KEY_LENGTH_IN_BYTES]) -> Result<(), Error> {
    let expected = crate::hashes::checksum(&data[..78]);
    if bool::from(data[78..].ct_eq(&expected)) {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch)
    }
}

/// Enforces the master-key invariants: a depth-zero key must have an
/// all-zero parent fingerprint and child number.
pub(crate) fn check_zero_depth_invariants(
    depth: u8,
    parent_fingerprint: &[u8; 4],
    child_number: &[u8; 4],
) -> Result<(), Error> {
    let is_master = depth.ct_eq(&0);
    if bool::from(is_master & !parent_fingerprint.ct_eq(&[0u8; 4])) {
        return Err(Error::ZeroDepthAndNonZeroParentFingerprint);
    }
    if bool::from(is_master & !child_number.ct_eq(&[0u8; 4])) {
        return Err(Error::ZeroDepthAndNonZeroIndex);
    }
    Ok(())
}

/// Constant-time check that `version` is one of the two given versions.
pub(crate) fn version_is_one_of(version: &[u8], a: &[u8; 4], b: &[u8; 4]) -> Choice {
    version.ct_eq(a) | version.ct_eq(b)
}

/// Maps a private-key version to the public-key version of the same network.
pub(crate) fn public_version_for(private_version: &[u8; 4]) -> [u8; 4] {
    if *private_version == TESTNET_PRIVATE_VERSION {
        TESTNET_PUBLIC_VERSION
    } else {
        MAINNET_PUBLIC_VERSION
    }
}
