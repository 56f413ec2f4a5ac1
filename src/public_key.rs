//! Extended public keys.

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::arithmetic::{mul_base, CompressedPoint, ProjectivePoint, Scalar};
use crate::error::Error;
use crate::hashes::{checksum, child_hmac, hash160};
use crate::key::{
    b58_decode_key_bytes, b58_encode_key_bytes, check_zero_depth_invariants, verify_checksum,
    version_is_one_of, FIRST_HARDENED_CHILD_INDEX, KEY_LENGTH_IN_BYTES, MAINNET_PUBLIC_VERSION,
    TESTNET_PUBLIC_VERSION,
};

/// An extended public key: a compressed curve point plus the chain code and
/// bookkeeping that lets it derive non-hardened children.
///
/// Values are immutable once constructed; derivation returns a new key. The
/// chain code is secret-adjacent material (it upgrades a leaked child private
/// key to the whole subtree), so the key wipes itself on drop like its
/// private counterpart.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PublicKey {
    version: [u8; 4],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: [u8; 4],
    chain_code: [u8; 32],
    public_key: CompressedPoint,
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PublicKey")
            .field("version", &self.version)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("chain_code", &"[redacted]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Constructs a mainnet master public key from raw parts, without any
/// derivation.
pub fn master_public_key_from_raw(public_key: [u8; 33], chain_code: [u8; 32]) -> PublicKey {
    PublicKey {
        version: MAINNET_PUBLIC_VERSION,
        depth: 0,
        parent_fingerprint: [0u8; 4],
        child_number: [0u8; 4],
        chain_code,
        public_key,
    }
}

impl PublicKey {
    pub(crate) fn from_parts(
        version: [u8; 4],
        depth: u8,
        parent_fingerprint: [u8; 4],
        child_number: [u8; 4],
        chain_code: [u8; 32],
        public_key: CompressedPoint,
    ) -> Self {
        PublicKey {
            version,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            public_key,
        }
    }

    /// The depth of this key: 0 for a master key.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The first four bytes of hash160 of the parent's compressed public
    /// key; all zero for a master key.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The index this key was derived at; 0 for a master key.
    pub fn child_number(&self) -> u32 {
        u32::from_be_bytes(self.child_number)
    }

    /// The chain code.
    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    /// The compressed public key point.
    pub fn public_key(&self) -> CompressedPoint {
        self.public_key
    }

    /// Derives the child public key at `child_index`.
    ///
    /// Only non-hardened children can be derived without the private key;
    /// hardened indexes fail with [`Error::HardenedPublicChildKey`]. As on
    /// the private side, the derivation itself fails only in the
    /// negligible-probability cases: an HMAC left half at or above the group
    /// order ([`Error::InvalidPrivateKey`]) or a child at the point at
    /// infinity ([`Error::InvalidPublicKey`]).
    pub fn new_child_key(&self, child_index: u32) -> Result<PublicKey, Error> {
        if child_index >= FIRST_HARDENED_CHILD_INDEX {
            return Err(Error::HardenedPublicChildKey);
        }
        if self.depth == 255 {
            return Err(Error::TooDeepKey);
        }

        let parent_point = Option::<ProjectivePoint>::from(ProjectivePoint::decompress(
            &self.public_key,
        ))
        .ok_or(Error::InvalidPublicKey)?;

        let i = child_hmac(&self.chain_code, &self.public_key, child_index);
        let mut il = Zeroizing::new([0u8; 32]);
        let mut ir = [0u8; 32];
        il.copy_from_slice(&i[..32]);
        ir.copy_from_slice(&i[32..]);

        let il_scalar = Scalar::from_bytes(&il);
        let il_valid = il_scalar.is_some();
        let child_point = mul_base(&il_scalar.unwrap_or(Scalar::ZERO)).add(&parent_point);

        if !bool::from(il_valid) {
            return Err(Error::InvalidPrivateKey);
        }
        // I_L * G + parent is the identity only if I_L is the negative of
        // the parent's discrete log; compression has no encoding for it.
        let child_public_key = Option::<CompressedPoint>::from(child_point.to_compressed())
            .ok_or(Error::InvalidPublicKey)?;

        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&hash160(&self.public_key)[..4]);

        Ok(PublicKey {
            version: self.version,
            depth: self.depth + 1,
            parent_fingerprint: fingerprint,
            child_number: child_index.to_be_bytes(),
            chain_code: ir,
            public_key: child_public_key,
        })
    }

    /// Serializes this key into the canonical 82-byte form, checksum
    /// included.
    pub fn serialize(&self) -> [u8; KEY_LENGTH_IN_BYTES] {
        let mut result = [0u8; KEY_LENGTH_IN_BYTES];
        result[..4].copy_from_slice(&self.version);
        result[4] = self.depth;
        result[5..9].copy_from_slice(&self.parent_fingerprint);
        result[9..13].copy_from_slice(&self.child_number);
        result[13..45].copy_from_slice(&self.chain_code);
        result[45..78].copy_from_slice(&self.public_key);
        let chksum = checksum(&result[..78]);
        result[78..].copy_from_slice(&chksum);
        result
    }

    /// Serializes this key as a Base58 string (`xpub...` / `tpub...`).
    pub fn b58_serialize(&self) -> String {
        b58_encode_key_bytes(&self.serialize())
    }
}

/// Parses an 82-byte serialized extended public key.
///
/// The checksum, version, master-key invariants, and point encoding are
/// validated in that order; the point must have a 0x02/0x03 prefix and
/// decompress onto the curve.
pub fn deserialize_public_key(data: [u8; KEY_LENGTH_IN_BYTES]) -> Result<PublicKey, Error> {
    verify_checksum(&data)?;

    if !bool::from(version_is_one_of(
        &data[..4],
        &MAINNET_PUBLIC_VERSION,
        &TESTNET_PUBLIC_VERSION,
    )) {
        return Err(Error::InvalidVersion);
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&data[..4]);

    let depth = data[4];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&data[5..9]);
    let mut child_number = [0u8; 4];
    child_number.copy_from_slice(&data[9..13]);
    check_zero_depth_invariants(depth, &parent_fingerprint, &child_number)?;

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&data[13..45]);

    if (data[45] & 0x02) != 0x02 {
        return Err(Error::InvalidPublicKey);
    }
    let mut public_key = [0u8; 33];
    public_key.copy_from_slice(&data[45..78]);

    if bool::from(ProjectivePoint::decompress(&public_key).is_none()) {
        return Err(Error::InvalidPublicKey);
    }

    Ok(PublicKey {
        version,
        depth,
        parent_fingerprint,
        child_number,
        chain_code,
        public_key,
    })
}

/// Parses a Base58 extended public key string (111 characters).
pub fn b58_deserialize_public_key(encoded: &str) -> Result<PublicKey, Error> {
    deserialize_public_key(b58_decode_key_bytes(encoded)?)
}
