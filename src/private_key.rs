//! Extended private keys.

use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::arithmetic::{mul_base, Scalar};
use crate::error::Error;
use crate::hashes::{checksum, child_hmac, hash160, hmac_sha512};
use crate::key::{
    b58_decode_key_bytes, b58_encode_key_bytes, check_zero_depth_invariants, public_version_for,
    verify_checksum, version_is_one_of, FIRST_HARDENED_CHILD_INDEX, KEY_LENGTH_IN_BYTES,
    MAINNET_PRIVATE_VERSION, TESTNET_PRIVATE_VERSION,
};
use crate::public_key::PublicKey;

/// An extended private key: a secret scalar plus the chain code and
/// bookkeeping that lets it derive a tree of children.
///
/// Values are immutable once constructed; derivation returns a new key. All
/// secret fields are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    version: [u8; 4],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: [u8; 4],
    chain_code: [u8; 32],
    private_key: [u8; 32],
}

impl core::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("version", &self.version)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("chain_code", &"[redacted]")
            .field("private_key", &"[redacted]")
            .finish()
    }
}

/// Generates the master private key for the given seed.
///
/// I = HMAC-SHA-512(key = "Bitcoin seed", msg = seed); the left half becomes
/// the master scalar and the right half the chain code. The seed should carry
/// 128 to 512 bits of entropy.
///
/// Like the reference implementation, this does not reject the (probability
/// ≈ 2⁻¹²⁷) seeds whose left half is zero or at least the group order, where
/// strict BIP-32 demands a different seed be chosen. Such a degenerate master
/// key produces an all-zero public key rather than an error.
pub fn new_master_key(seed: &[u8]) -> PrivateKey {
    let i = hmac_sha512(b"Bitcoin seed", &[seed]);
    let mut private_key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    private_key.copy_from_slice(&i[..32]);
    chain_code.copy_from_slice(&i[32..]);
    PrivateKey {
        version: MAINNET_PRIVATE_VERSION,
        depth: 0,
        parent_fingerprint: [0u8; 4],
        child_number: [0u8; 4],
        chain_code,
        private_key,
    }
}

impl PrivateKey {
    /// The depth of this key: 0 for the master key.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The first four bytes of hash160 of the parent's compressed public
    /// key; all zero for the master key.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The index this key was derived at; 0 for the master key.
    pub fn child_number(&self) -> u32 {
        u32::from_be_bytes(self.child_number)
    }

    /// The chain code.
    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    /// The raw private scalar, big-endian.
    pub fn private_key(&self) -> [u8; 32] {
        self.private_key
    }

    /// Projects this key to the extended public key of the same node.
    pub fn get_public_key(&self) -> PublicKey {
        let scalar = Zeroizing::new(Scalar::from_bytes_unchecked(&self.private_key));
        let public_key = mul_base(&scalar).to_compressed_lossy();
        PublicKey::from_parts(
            public_version_for(&self.version),
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            self.chain_code,
            public_key,
        )
    }

    /// Derives the child private key at `child_index`.
    ///
    /// Indexes at or above [`FIRST_HARDENED_CHILD_INDEX`] derive hardened
    /// children from the parent scalar; lower indexes derive normal children
    /// from the parent public key. Fails with [`Error::TooDeepKey`] at depth
    /// 255 and with [`Error::InvalidPrivateKey`] in the negligible-probability
    /// cases BIP-32 requires rejecting (HMAC left half at or above the group
    /// order, or a zero child scalar).
    pub fn new_child_key(&self, child_index: u32) -> Result<PrivateKey, Error> {
        if self.depth == 255 {
            return Err(Error::TooDeepKey);
        }

        let parent_scalar = Zeroizing::new(Scalar::from_bytes_unchecked(&self.private_key));
        let pub_part = mul_base(&parent_scalar).to_compressed_lossy();

        // Whether the child is hardened is public; only the key bytes that
        // feed the HMAC are secret.
        let mut key_element = [0u8; 33];
        if child_index >= FIRST_HARDENED_CHILD_INDEX {
            key_element[1..].copy_from_slice(&self.private_key);
        } else {
            key_element = pub_part;
        }

        let i = child_hmac(&self.chain_code, &key_element, child_index);
        key_element.zeroize();

        let mut il = Zeroizing::new([0u8; 32]);
        let mut ir = [0u8; 32];
        il.copy_from_slice(&i[..32]);
        ir.copy_from_slice(&i[32..]);

        // The range and zero checks happen after the child scalar has been
        // computed, so rejected indexes cost the same as accepted ones.
        let il_scalar = Scalar::from_bytes(&il);
        let il_valid: Choice = il_scalar.is_some();
        let child_scalar =
            Zeroizing::new(il_scalar.unwrap_or(Scalar::ZERO).add(&parent_scalar));
        if !bool::from(il_valid & !child_scalar.is_zero()) {
            return Err(Error::InvalidPrivateKey);
        }

        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&hash160(&pub_part)[..4]);

        Ok(PrivateKey {
            version: self.version,
            depth: self.depth + 1,
            parent_fingerprint: fingerprint,
            child_number: child_index.to_be_bytes(),
            chain_code: ir,
            private_key: child_scalar.to_bytes(),
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
        // result[45] stays zero: the private-key padding byte.
        result[46..78].copy_from_slice(&self.private_key);
        let chksum = checksum(&result[..78]);
        result[78..].copy_from_slice(&chksum);
        result
    }

    /// Serializes this key as a Base58 string (`xprv...` / `tprv...`).
    pub fn b58_serialize(&self) -> String {
        b58_encode_key_bytes(&self.serialize())
    }
}

/// Parses an 82-byte serialized extended private key.
///
/// The checksum, version, master-key invariants, padding byte, and scalar
/// range are validated in that order; comparisons of the payload run in
/// constant time.
pub fn deserialize_private_key(data: [u8; KEY_LENGTH_IN_BYTES]) -> Result<PrivateKey, Error> {
    verify_checksum(&data)?;

    if !bool::from(version_is_one_of(
        &data[..4],
        &MAINNET_PRIVATE_VERSION,
        &TESTNET_PRIVATE_VERSION,
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

    if data[45] != 0 {
        return Err(Error::InvalidPrivateKey);
    }

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&data[46..78]);
    let scalar = Scalar::from_bytes(&private_key);
    let in_range = scalar.is_some() & !private_key.ct_eq(&[0u8; 32]);
    if !bool::from(in_range) {
        return Err(Error::PrivateKeyNotInRange);
    }

    Ok(PrivateKey {
        version,
        depth,
        parent_fingerprint,
        child_number,
        chain_code,
        private_key,
    })
}

/// Parses a Base58 extended private key string (111 characters).
pub fn b58_deserialize_private_key(encoded: &str) -> Result<PrivateKey, Error> {
    deserialize_private_key(b58_decode_key_bytes(encoded)?)
}
