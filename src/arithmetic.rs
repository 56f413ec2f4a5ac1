//! A self-contained, constant-time arithmetic core for secp256k1.
//!
//! Layered bottom-up: wide-integer helpers, the base field F_p, scalars
//! modulo the group order n, the projective point group, and base-point
//! multiplication. Exposed so the test suite (and curious callers) can
//! exercise each layer directly; the extended-key types only ever consume
//! the top of the stack.

pub mod field;
pub mod mul;
pub mod projective;
pub mod scalar;
pub(crate) mod util;

pub use field::FieldElement;
pub use mul::{mul_base, mul_base_vartime};
pub use projective::{CompressedPoint, ProjectivePoint};
pub use scalar::Scalar;
