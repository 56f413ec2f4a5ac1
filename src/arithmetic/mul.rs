//! Scalar multiplication of the base point.

use once_cell::sync::Lazy;
use subtle::ConditionallySelectable;

use super::projective::ProjectivePoint;
use super::scalar::Scalar;

/// Precomputed multiples of the base point: `BASEPOINT_TABLE[i] = 2^i * G`.
///
/// Built once on first use and immutable afterwards. The entries are public
/// constants, so the doubling chain that fills the table does not need the
/// constant-time ladder.
static BASEPOINT_TABLE: Lazy<[ProjectivePoint; 256]> = Lazy::new(|| {
    let mut table = [ProjectivePoint::GENERATOR; 256];
    for i in 1..256 {
        table[i] = table[i - 1].double();
    }
    table
});

/// Computes `k * G` in constant time.
///
/// One complete addition and one selection per bit; the candidate sum is
/// computed and written whether or not the bit is set.
pub fn mul_base(k: &Scalar) -> ProjectivePoint {
    let table = &*BASEPOINT_TABLE;
    let mut acc = ProjectivePoint::IDENTITY;
    for (i, entry) in table.iter().enumerate() {
        let sum = acc.add(entry);
        acc = ProjectivePoint::conditional_select(&acc, &sum, k.bit(i));
    }
    acc
}

/// Computes `k * G`, skipping the additions for zero bits.
///
/// Runs faster than [`mul_base`] but leaks the Hamming weight and bit
/// positions of `k` through timing. Only for scalars that are already
/// public, such as test vectors.
pub fn mul_base_vartime(k: &Scalar) -> ProjectivePoint {
    let table = &*BASEPOINT_TABLE;
    let mut acc = ProjectivePoint::IDENTITY;
    for (i, entry) in table.iter().enumerate() {
        if k.bit(i).into() {
            acc = acc.add(entry);
        }
    }
    acc
}
