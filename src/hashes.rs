//! Hash constructions used by BIP-32.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// First four bytes of SHA-256(SHA-256(data)).
pub(crate) fn checksum(data: &[u8]) -> [u8; 4] {
    let intermediate = Sha256::digest(data);
    let hash = Sha256::digest(intermediate);
    let mut result = [0u8; 4];
    result.copy_from_slice(&hash[..4]);
    result
}

/// RIPEMD-160(SHA-256(data)), the hash behind key fingerprints.
pub(crate) fn hash160(data: &[u8]) -> [u8; 20] {
    let intermediate = Sha256::digest(data);
    Ripemd160::digest(intermediate).into()
}

/// HMAC-SHA-512 over the concatenation of `parts`.
///
/// The output routinely contains key material, so it comes back in a
/// zeroizing buffer.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut mac =
        HmacSha512::new_from_slice(key).expect("HMAC-SHA-512 accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// The HMAC invocation of BIP-32 child derivation:
/// HMAC-SHA-512(key = chain code, msg = key_element || index_be).
///
/// `key_element` is the parent's compressed public key for normal children
/// and `0x00 || parent scalar` for hardened ones.
pub(crate) fn child_hmac(
    chain_code: &[u8; 32],
    key_element: &[u8; 33],
    child_index: u32,
) -> Zeroizing<[u8; 64]> {
    hmac_sha512(chain_code, &[key_element, &child_index.to_be_bytes()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn checksum_of_empty_input() {
        // SHA-256d of the empty string.
        assert_eq!(checksum(b""), hex!("5df6e0e2"));
    }

    #[test]
    fn hash160_known_vector() {
        // hash160 of the compressed secp256k1 base point; its first four
        // bytes are the fingerprint of the key 1.
        let g = hex!("0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
        assert_eq!(hash160(&g), hex!("751e76e8199196d454941c45d1b3a323f1433bd6"));
    }

    #[test]
    fn master_hmac_matches_test_vector_one() {
        // HMAC-SHA-512("Bitcoin seed", seed) for BIP-32 test vector 1: the
        // left half is the master key, the right half the chain code.
        let i = hmac_sha512(b"Bitcoin seed", &[&hex!("000102030405060708090a0b0c0d0e0f")]);
        assert_eq!(
            i[..32],
            hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
        );
        assert_eq!(
            i[32..],
            hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
        );
    }
}
