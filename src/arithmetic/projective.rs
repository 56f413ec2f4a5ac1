//! Points on the secp256k1 curve in homogeneous projective coordinates.
//!
//! The curve is y² = x³ + 7 over F_p. A triple (X, Y, Z) with Z ≠ 0
//! represents the affine point (X/Z, Y/Z); the additive identity is (0, 1, 0).
//! Addition and doubling use the complete formulas of Renes–Costello–Batina
//! 2015 (<https://eprint.iacr.org/2015/1060>, Algorithms 7 and 9 for a = 0),
//! which handle doubling and the identity without any branches.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use super::field::FieldElement;

/// b coefficient of the curve equation.
const CURVE_EQUATION_B_SINGLE: u32 = 7;

/// 3b, the constant the complete formulas actually multiply by.
const CURVE_EQUATION_B3_SINGLE: u32 = 21;

const CURVE_EQUATION_B: FieldElement =
    FieldElement([CURVE_EQUATION_B_SINGLE, 0, 0, 0, 0, 0, 0, 0]);

/// A compressed (33-byte, prefix + x-coordinate) point encoding.
///
/// The prefix is 0x02 or 0x03 and carries the parity of y. The point at
/// infinity is not representable.
pub type CompressedPoint = [u8; 33];

/// A point on the secp256k1 curve in projective coordinates.
///
/// Distinct triples can represent the same affine point, so equality must go
/// through [`ProjectivePoint::ct_eq`] (or compression), never a plain
/// coordinate comparison.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl ProjectivePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Base point of secp256k1.
    ///
    /// ```text
    /// Gₓ = 79be667e f9dcbbac 55a06295 ce870b07 029bfcdb 2dce28d9 59f2815b 16f81798
    /// Gᵧ = 483ada77 26a3c465 5da4fbfc 0e1108a8 fd17b448 a6855419 9c47d08f fb10d4b8
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_bytes_unchecked(&[
            0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87,
            0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b,
            0x16, 0xf8, 0x17, 0x98,
        ]),
        y: FieldElement::from_bytes_unchecked(&[
            0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11,
            0x08, 0xa8, 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f,
            0xfb, 0x10, 0xd4, 0xb8,
        ]),
        z: FieldElement::ONE,
    };

    /// Is this point the identity?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Returns `self + other`, complete for all inputs.
    pub fn add(&self, other: &Self) -> Self {
        // Renes-Costello-Batina 2015 Algorithm 7, with 3b folded into a
        // single-limb multiplication by 21.
        let xx = self.x.mul(&other.x);
        let yy = self.y.mul(&other.y);
        let zz = self.z.mul(&other.z);

        let xy_pairs = self
            .x
            .add(&self.y)
            .mul(&other.x.add(&other.y))
            .sub(&xx.add(&yy));
        let yz_pairs = self
            .y
            .add(&self.z)
            .mul(&other.y.add(&other.z))
            .sub(&yy.add(&zz));
        let xz_pairs = self
            .x
            .add(&self.z)
            .mul(&other.x.add(&other.z))
            .sub(&xx.add(&zz));

        let bzz3 = zz.mul_single(CURVE_EQUATION_B3_SINGLE);
        let yy_m_bzz3 = yy.sub(&bzz3);
        let yy_p_bzz3 = yy.add(&bzz3);

        let byz3 = yz_pairs.mul_single(CURVE_EQUATION_B3_SINGLE);
        let xx3 = xx.double().add(&xx);
        let bxx9 = xx3.mul_single(CURVE_EQUATION_B3_SINGLE);

        Self {
            x: xy_pairs.mul(&yy_m_bzz3).sub(&byz3.mul(&xz_pairs)),
            y: yy_p_bzz3.mul(&yy_m_bzz3).add(&bxx9.mul(&xz_pairs)),
            z: yz_pairs.mul(&yy_p_bzz3).add(&xx3.mul(&xy_pairs)),
        }
    }

    /// Doubles this point, complete for all inputs.
    pub fn double(&self) -> Self {
        // Renes-Costello-Batina 2015 Algorithm 9.
        let yy = self.y.square();
        let zz = self.z.square();
        let xy2 = self.x.mul(&self.y).double();

        let bzz3 = zz.mul_single(CURVE_EQUATION_B3_SINGLE);
        let bzz9 = bzz3.double().add(&bzz3);

        let yy_m_bzz9 = yy.sub(&bzz9);
        let yy_p_bzz3 = yy.add(&bzz3);

        let yy_zz = yy.mul(&zz);
        let yy_zz8 = yy_zz.double().double().double();
        let t = yy_zz8
            .double()
            .add(&yy_zz8)
            .mul_single(CURVE_EQUATION_B_SINGLE);

        Self {
            x: xy2.mul(&yy_m_bzz9),
            y: yy_m_bzz9.mul(&yy_p_bzz3).add(&t),
            z: yy.mul(&self.y).mul(&self.z).double().double().double(),
        }
    }

    /// Attempts to decode a compressed point.
    ///
    /// Recovers y from x by taking the square root of x³ + 7 and fixing the
    /// parity to match the prefix. Returns `None` when the prefix is not
    /// 0x02/0x03, when x is not a canonical field element, or when x³ + 7 is
    /// not a quadratic residue. Compressed encodings are public data, so the
    /// prefix handling need not be constant-time; everything downstream of
    /// the field element is.
    pub fn decompress(bytes: &CompressedPoint) -> CtOption<Self> {
        let prefix_ok = Choice::from(((bytes[0] & 0xfe) == 0x02) as u8);
        let y_is_odd = Choice::from(bytes[0] & 1);

        let mut x_bytes = [0u8; 32];
        x_bytes.copy_from_slice(&bytes[1..]);

        FieldElement::from_bytes(&x_bytes).and_then(|x| {
            let alpha = x.square().mul(&x).add(&CURVE_EQUATION_B);

            alpha.sqrt().and_then(|beta| {
                let y = FieldElement::conditional_select(
                    &beta.negate(),
                    &beta,
                    beta.is_odd().ct_eq(&y_is_odd),
                );
                let point = Self {
                    x,
                    y,
                    z: FieldElement::ONE,
                };
                CtOption::new(point, prefix_ok)
            })
        })
    }

    /// Encodes this point in compressed form.
    ///
    /// Returns `None` for the point at infinity, which has no compressed
    /// encoding; Z inversion and the coordinate scaling run regardless of
    /// the outcome.
    pub fn to_compressed(&self) -> CtOption<CompressedPoint> {
        let zinv = self.z.invert().unwrap_or(FieldElement::ZERO);
        let x = self.x.mul(&zinv);
        let y = self.y.mul(&zinv);

        let mut bytes = [0u8; 33];
        bytes[0] = 0x02 | y.is_odd().unwrap_u8();
        bytes[1..].copy_from_slice(&x.to_bytes());
        CtOption::new(bytes, !self.is_identity())
    }

    /// Encodes this point in compressed form, mapping the point at infinity
    /// to the all-zero x-coordinate with an 0x02 prefix.
    pub(crate) fn to_compressed_lossy(&self) -> CompressedPoint {
        self.to_compressed().unwrap_or([
            0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ])
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Cross-multiplying the coordinates by the opposing Z makes the
        // comparison independent of the projective scaling. The identity is
        // (0, y, 0) with y ≠ 0, so it compares equal only to itself.
        let lhs_x = self.x.mul(&other.z);
        let rhs_x = other.x.mul(&self.z);
        let lhs_y = self.y.mul(&other.z);
        let rhs_y = other.y.mul(&self.z);
        lhs_x.ct_eq(&rhs_x) & lhs_y.ct_eq(&rhs_y)
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Zeroize for ProjectivePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldElement, ProjectivePoint};
    use hex_literal::hex;

    const COMPRESSED_BASEPOINT: [u8; 33] =
        hex!("0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");

    // 2G in affine coordinates.
    const DOUBLE_BASEPOINT_X: [u8; 32] =
        hex!("C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5");
    const DOUBLE_BASEPOINT_Y: [u8; 32] =
        hex!("1AE168FEA63DC339A3C58419466CEAEEF7F632653266D0E1236431A950CFE52A");

    #[test]
    fn identity_addition() {
        let identity = ProjectivePoint::IDENTITY;
        let generator = ProjectivePoint::GENERATOR;

        assert_eq!(identity.add(&generator), generator);
        assert_eq!(generator.add(&identity), generator);
        assert_eq!(identity.add(&identity), identity);
    }

    #[test]
    fn add_vs_double() {
        let generator = ProjectivePoint::GENERATOR;

        let r1 = generator.add(&generator);
        let r2 = generator.double();
        assert_eq!(r1, r2);

        let r3 = generator.add(&generator).add(&generator.add(&generator));
        let r4 = generator.double().double();
        assert_eq!(r3, r4);
    }

    #[test]
    fn double_generator_matches_vector() {
        let doubled = ProjectivePoint::GENERATOR.double();
        let compressed = doubled.to_compressed().unwrap();
        // y of 2G is even, so the prefix is 0x02.
        assert_eq!(compressed[0], 0x02);
        assert_eq!(&compressed[1..], &DOUBLE_BASEPOINT_X);

        let expected = ProjectivePoint {
            x: FieldElement::from_bytes(&DOUBLE_BASEPOINT_X).unwrap(),
            y: FieldElement::from_bytes(&DOUBLE_BASEPOINT_Y).unwrap(),
            z: FieldElement::ONE,
        };
        assert_eq!(doubled, expected);
    }

    #[test]
    fn identity_double() {
        assert_eq!(
            ProjectivePoint::IDENTITY.double(),
            ProjectivePoint::IDENTITY
        );
    }

    #[test]
    fn compress_decompress_round_trip() {
        let generator = ProjectivePoint::GENERATOR;
        assert_eq!(generator.to_compressed().unwrap(), COMPRESSED_BASEPOINT);

        let decoded = ProjectivePoint::decompress(&COMPRESSED_BASEPOINT).unwrap();
        assert_eq!(decoded, generator);

        // Odd-parity prefix selects the negated y.
        let mut odd = COMPRESSED_BASEPOINT;
        odd[0] = 0x03;
        let neg = ProjectivePoint::decompress(&odd).unwrap();
        assert_ne!(neg, generator);
        assert_eq!(neg.to_compressed().unwrap(), odd);
    }

    #[test]
    fn decompress_rejects_bad_prefix() {
        let mut bytes = COMPRESSED_BASEPOINT;
        bytes[0] = 0x04;
        assert!(bool::from(ProjectivePoint::decompress(&bytes).is_none()));
        bytes[0] = 0x00;
        assert!(bool::from(ProjectivePoint::decompress(&bytes).is_none()));
    }

    #[test]
    fn decompress_rejects_oversized_x() {
        let mut bytes = [0xff; 33];
        bytes[0] = 0x02;
        assert!(bool::from(ProjectivePoint::decompress(&bytes).is_none()));
    }

    #[test]
    fn identity_has_no_compressed_form() {
        assert!(bool::from(ProjectivePoint::IDENTITY.to_compressed().is_none()));
    }
}
