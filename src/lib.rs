//! BIP-32 hierarchical deterministic key derivation on secp256k1.
//!
//! This crate is self-contained: the finite-field, scalar, and curve-point
//! arithmetic, the Base58 codec, and the extended-key state machine are all
//! implemented here, on top of the RustCrypto hash crates (`hmac`, `sha2`,
//! `ripemd`). Every operation that touches secret material runs in constant
//! time: no secret-dependent branches, no secret-indexed memory access, and
//! selection through [`subtle`] primitives throughout. Secret buffers are
//! wiped on drop via [`zeroize`].
//!
//! Variable-time alternatives exist only for data that is already public and
//! are always suffixed `_vartime`.
//!
//! # Example
//!
//! Derive the BIP-32 test-vector-1 chain m/0ʰ/1:
//!
//! ```
//! use hdk256::{new_master_key, FIRST_HARDENED_CHILD_INDEX};
//!
//! let seed = [
//!     0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
//!     0x0e, 0x0f,
//! ];
//! let master = new_master_key(&seed);
//! let child = master
//!     .new_child_key(FIRST_HARDENED_CHILD_INDEX)?
//!     .new_child_key(1)?;
//!
//! assert_eq!(child.depth(), 2);
//! assert_eq!(child.b58_serialize().len(), 111);
//!
//! // Non-hardened derivation commutes with projection to public keys.
//! let pub_child = master
//!     .new_child_key(FIRST_HARDENED_CHILD_INDEX)?
//!     .get_public_key()
//!     .new_child_key(1)?;
//! assert_eq!(pub_child.b58_serialize(), child.get_public_key().b58_serialize());
//! # Ok::<(), hdk256::Error>(())
//! ```
//!
//! [`subtle`]: https://docs.rs/subtle
//! [`zeroize`]: https://docs.rs/zeroize

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod arithmetic;
pub mod base58;
mod error;
mod hashes;
mod key;
mod private_key;
mod public_key;

pub use error::Error;
pub use key::{
    B58_KEY_LENGTH, FIRST_HARDENED_CHILD_INDEX, KEY_LENGTH_IN_BYTES, MAINNET_PRIVATE_VERSION,
    MAINNET_PUBLIC_VERSION, TESTNET_PRIVATE_VERSION, TESTNET_PUBLIC_VERSION,
};
pub use private_key::{b58_deserialize_private_key, deserialize_private_key, new_master_key, PrivateKey};
pub use public_key::{
    b58_deserialize_public_key, deserialize_public_key, master_public_key_from_raw, PublicKey,
};
