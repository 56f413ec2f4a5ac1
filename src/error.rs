//! Errors returned by key construction, derivation, and parsing.

use core::fmt;

/// The closed set of failures the library can report.
///
/// Errors never carry key material, and the library neither retries nor logs;
/// every failure is returned to the caller immediately.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A hardened child was requested from a public key.
    HardenedPublicChildKey,
    /// Deriving the child would push the depth past 255.
    TooDeepKey,
    /// A Base58 extended key string was not 111 characters long.
    InvalidKeyLength,
    /// The version bytes are not one of the recognized extended-key versions.
    InvalidVersion,
    /// The public key bytes do not describe a point on the curve, or a
    /// derived child landed on the point at infinity.
    InvalidPublicKey,
    /// The private key padding byte was non-zero, or derivation produced a
    /// zero or out-of-range child scalar.
    InvalidPrivateKey,
    /// The double-SHA-256 checksum does not match the payload.
    ChecksumMismatch,
    /// A depth-zero key carried a non-zero parent fingerprint.
    ZeroDepthAndNonZeroParentFingerprint,
    /// A depth-zero key carried a non-zero child number.
    ZeroDepthAndNonZeroIndex,
    /// A serialized private key scalar was zero or not below the group order.
    PrivateKeyNotInRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::HardenedPublicChildKey => {
                "can't create a hardened child key from a public key"
            }
            Error::TooDeepKey => "depth can't be >= 256",
            Error::InvalidKeyLength => "invalid key length",
            Error::InvalidVersion => "version is invalid",
            Error::InvalidPublicKey => "public key is invalid",
            Error::InvalidPrivateKey => "private key is invalid",
            Error::ChecksumMismatch => "checksum mismatch",
            Error::ZeroDepthAndNonZeroParentFingerprint => {
                "zero depth with non-zero parent fingerprint"
            }
            Error::ZeroDepthAndNonZeroIndex => "zero depth with non-zero index",
            Error::PrivateKeyNotInRange => "private key not in range (1 <= p <= n-1)",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}
