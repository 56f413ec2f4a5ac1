//! Field arithmetic modulo p = 2^256 - 2^32 - 977.
//!
//! Elements are held as 8 little-endian 32-bit limbs and are always fully
//! reduced: every public operation takes and returns values in `[0, p)`.
//! There is no lazy-normalization headroom in this representation, which
//! keeps the constant-time reasoning simple at the cost of a conditional
//! subtraction per operation.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use super::util::{
    adc_array, adc_array_with_overflow, compare_arrays, conditional_select, sbb_array,
    sbb_array_with_underflow,
};

/// p = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE FFFFFC2F
pub const MODULUS: [u32; 8] = [
    0xFFFF_FC2F,
    0xFFFF_FFFE,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
];

const LIMB_MASK: u64 = 0xFFFF_FFFF;

/// An element of the secp256k1 base field.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(pub(crate) [u32; 8]);

impl FieldElement {
    /// Additive identity.
    pub const ZERO: Self = Self([0, 0, 0, 0, 0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0]);

    /// Parses the given byte array as a big-endian integer without checking
    /// that it is within the field.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        let w7 = ((bytes[0] as u32) << 24)
            | ((bytes[1] as u32) << 16)
            | ((bytes[2] as u32) << 8)
            | (bytes[3] as u32);
        let w6 = ((bytes[4] as u32) << 24)
            | ((bytes[5] as u32) << 16)
            | ((bytes[6] as u32) << 8)
            | (bytes[7] as u32);
        let w5 = ((bytes[8] as u32) << 24)
            | ((bytes[9] as u32) << 16)
            | ((bytes[10] as u32) << 8)
            | (bytes[11] as u32);
        let w4 = ((bytes[12] as u32) << 24)
            | ((bytes[13] as u32) << 16)
            | ((bytes[14] as u32) << 8)
            | (bytes[15] as u32);
        let w3 = ((bytes[16] as u32) << 24)
            | ((bytes[17] as u32) << 16)
            | ((bytes[18] as u32) << 8)
            | (bytes[19] as u32);
        let w2 = ((bytes[20] as u32) << 24)
            | ((bytes[21] as u32) << 16)
            | ((bytes[22] as u32) << 8)
            | (bytes[23] as u32);
        let w1 = ((bytes[24] as u32) << 24)
            | ((bytes[25] as u32) << 16)
            | ((bytes[26] as u32) << 8)
            | (bytes[27] as u32);
        let w0 = ((bytes[28] as u32) << 24)
            | ((bytes[29] as u32) << 16)
            | ((bytes[30] as u32) << 8)
            | (bytes[31] as u32);
        Self([w0, w1, w2, w3, w4, w5, w6, w7])
    }

    /// Attempts to parse the given byte array as a big-endian field element.
    ///
    /// Returns `None` if the value is not in the range `[0, p)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let res = Self::from_bytes_unchecked(bytes);
        let (_, underflow) = sbb_array_with_underflow(&res.0, &MODULUS);
        CtOption::new(res, underflow)
    }

    /// Returns the big-endian encoding of this field element.
    pub fn to_bytes(self) -> [u8; 32] {
        let mut r = [0u8; 32];
        for i in 0..8 {
            r[4 * i..4 * i + 4].copy_from_slice(&self.0[7 - i].to_be_bytes());
        }
        r
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Determine if this element is odd: `self mod 2 == 1`.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    /// Returns `self + rhs mod p`.
    ///
    /// Inputs are below p, so the sum is below 2p and a single conditional
    /// subtraction suffices.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = adc_array_with_overflow(&self.0, &rhs.0);
        let (diff, underflow) = sbb_array_with_underflow(&sum, &MODULUS);
        Self(conditional_select(&sum, &diff, carry | !underflow))
    }

    /// Returns `self - rhs mod p`.
    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sbb_array_with_underflow(&self.0, &rhs.0);
        let (wrapped, _) = adc_array(&diff, &MODULUS);
        Self(conditional_select(&diff, &wrapped, borrow))
    }

    /// Returns `2 * self mod p`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `-self mod p`.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Returns `self * rhs mod p`.
    ///
    /// Schoolbook 256×256 multiplication into a 512-bit intermediate of 16
    /// u32-sized limbs, then [`FieldElement::reduce_wide`].
    pub fn mul(&self, rhs: &Self) -> Self {
        let a = &self.0;
        let b = &rhs.0;

        let mut t = [0u64; 16];
        for i in 0..8 {
            for j in 0..8 {
                let prod = (a[i] as u64) * (b[j] as u64);
                t[i + j] += prod & LIMB_MASK;
                t[i + j + 1] += prod >> 32;
            }
        }

        Self::reduce_wide(t)
    }

    /// Returns `self * self mod p`.
    ///
    /// Like [`FieldElement::mul`], but each off-diagonal cross product is
    /// computed once and doubled, cutting the limb multiplications from 64
    /// to 36.
    pub fn square(&self) -> Self {
        let a = &self.0;

        let mut t = [0u64; 16];
        for i in 0..8 {
            let prod = (a[i] as u64) * (a[i] as u64);
            t[2 * i] += prod & LIMB_MASK;
            t[2 * i + 1] += prod >> 32;
            for j in (i + 1)..8 {
                let prod = (a[i] as u64) * (a[j] as u64);
                t[i + j] += (prod & LIMB_MASK) << 1;
                t[i + j + 1] += (prod >> 32) << 1;
            }
        }

        Self::reduce_wide(t)
    }

    /// Reduces a 512-bit schoolbook intermediate into `[0, p)`.
    ///
    /// After carry normalization the high half is folded using the identity
    /// 2^256 ≡ 2^32 + 977 (mod p). The fold runs from the most significant
    /// high limb down so that the carry it deposits in limb 8 is itself
    /// folded on the final iteration. Two fixed correction passes bring the
    /// value below 2^256; a conditional subtraction then reduces into
    /// `[0, p)`. All loops have fixed trip counts.
    fn reduce_wide(mut t: [u64; 16]) -> Self {
        for k in 0..15 {
            t[k + 1] += t[k] >> 32;
            t[k] &= LIMB_MASK;
        }

        for k in (8..16).rev() {
            let v = t[k];
            t[k - 8] += 977 * v;
            t[k - 7] += v;
        }

        // After the fold every low limb is below 2^32 * (2 * 977 + 1).
        for _ in 0..2 {
            let v = t[7] >> 32;
            t[7] &= LIMB_MASK;
            t[1] += v;
            t[0] += 977 * v;
            for k in 0..7 {
                t[k + 1] += t[k] >> 32;
                t[k] &= LIMB_MASK;
            }
        }

        let mut r = Self([
            t[0] as u32,
            t[1] as u32,
            t[2] as u32,
            t[3] as u32,
            t[4] as u32,
            t[5] as u32,
            t[6] as u32,
            t[7] as u32,
        ]);
        r.reduce();
        r
    }

    /// Multiplies by a small single-limb constant.
    ///
    /// Used for the curve constant b = 7 and 3b = 21 in the point formulas.
    pub fn mul_single(&self, rhs: u32) -> Self {
        let a = &self.0;

        let mut t = [0u64; 9];
        for i in 0..8 {
            let prod = (a[i] as u64) * (rhs as u64);
            t[i] += prod & LIMB_MASK;
            t[i + 1] += prod >> 32;
        }

        for k in 0..8 {
            t[k + 1] += t[k] >> 32;
            t[k] &= LIMB_MASK;
        }

        // Fold the single overflow limb, then the (at most one-bit) overflow
        // the fold itself produces.
        for _ in 0..2 {
            let v = t[8];
            t[8] = 0;
            t[0] += 977 * v;
            t[1] += v;
            for k in 0..7 {
                t[k + 1] += t[k] >> 32;
                t[k] &= LIMB_MASK;
            }
            t[8] = t[7] >> 32;
            t[7] &= LIMB_MASK;
        }

        let mut r = Self([
            t[0] as u32,
            t[1] as u32,
            t[2] as u32,
            t[3] as u32,
            t[4] as u32,
            t[5] as u32,
            t[6] as u32,
            t[7] as u32,
        ]);
        r.reduce();
        r
    }

    /// Conditionally subtracts p once, bringing the value into `[0, p)`.
    fn reduce(&mut self) {
        let cmp = compare_arrays(&self.0, &MODULUS);
        let is_ge = Choice::from((cmp >= 0) as u8);
        let (diff, _) = sbb_array(&self.0, &MODULUS);
        self.0 = conditional_select(&self.0, &diff, is_ge);
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Computes self^(p - 2) with a fixed addition chain. The binary
    /// representation of (p - 2) has 5 blocks of 1s, with lengths in
    /// { 1, 2, 22, 223 }; `x_n` below is self^(2^n - 1).
    pub fn invert(&self) -> CtOption<Self> {
        let mut x2 = self.square();
        x2 = x2.mul(self);

        let mut x3 = x2.square();
        x3 = x3.mul(self);

        let mut x6 = x3;
        for _ in 0..3 {
            x6 = x6.square();
        }
        x6 = x6.mul(&x3);

        let mut x9 = x6;
        for _ in 0..3 {
            x9 = x9.square();
        }
        x9 = x9.mul(&x3);

        let mut x11 = x9;
        for _ in 0..2 {
            x11 = x11.square();
        }
        x11 = x11.mul(&x2);

        let mut x22 = x11;
        for _ in 0..11 {
            x22 = x22.square();
        }
        x22 = x22.mul(&x11);

        let mut x44 = x22;
        for _ in 0..22 {
            x44 = x44.square();
        }
        x44 = x44.mul(&x22);

        let mut x88 = x44;
        for _ in 0..44 {
            x88 = x88.square();
        }
        x88 = x88.mul(&x44);

        let mut x176 = x88;
        for _ in 0..88 {
            x176 = x176.square();
        }
        x176 = x176.mul(&x88);

        let mut x220 = x176;
        for _ in 0..44 {
            x220 = x220.square();
        }
        x220 = x220.mul(&x44);

        let mut x223 = x220;
        for _ in 0..3 {
            x223 = x223.square();
        }
        x223 = x223.mul(&x3);

        // Assemble the final result with a sliding window over the blocks.
        let mut t1 = x223;
        for _ in 0..23 {
            t1 = t1.square();
        }
        t1 = t1.mul(&x22);
        for _ in 0..5 {
            t1 = t1.square();
        }
        t1 = t1.mul(self);
        for _ in 0..3 {
            t1 = t1.square();
        }
        t1 = t1.mul(&x2);
        for _ in 0..2 {
            t1 = t1.square();
        }
        t1 = t1.mul(self);

        CtOption::new(t1, !self.is_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root
    /// exists.
    ///
    /// p ≡ 3 (mod 4), so self^((p + 1) / 4) is a square root whenever self is
    /// a quadratic residue. The exponent is even, so the candidate is the
    /// same for self and -self; only one of the two has a root, which is why
    /// the result is squared and compared against the input at the end.
    pub fn sqrt(&self) -> CtOption<Self> {
        // The binary representation of (p + 1) / 4 has 3 blocks of 1s, with
        // lengths in { 2, 22, 223 }.
        let mut x2 = self.square();
        x2 = x2.mul(self);

        let mut x3 = x2.square();
        x3 = x3.mul(self);

        let mut x6 = x3;
        for _ in 0..3 {
            x6 = x6.square();
        }
        x6 = x6.mul(&x3);

        let mut x9 = x6;
        for _ in 0..3 {
            x9 = x9.square();
        }
        x9 = x9.mul(&x3);

        let mut x11 = x9;
        for _ in 0..2 {
            x11 = x11.square();
        }
        x11 = x11.mul(&x2);

        let mut x22 = x11;
        for _ in 0..11 {
            x22 = x22.square();
        }
        x22 = x22.mul(&x11);

        let mut x44 = x22;
        for _ in 0..22 {
            x44 = x44.square();
        }
        x44 = x44.mul(&x22);

        let mut x88 = x44;
        for _ in 0..44 {
            x88 = x88.square();
        }
        x88 = x88.mul(&x44);

        let mut x176 = x88;
        for _ in 0..88 {
            x176 = x176.square();
        }
        x176 = x176.mul(&x88);

        let mut x220 = x176;
        for _ in 0..44 {
            x220 = x220.square();
        }
        x220 = x220.mul(&x44);

        let mut x223 = x220;
        for _ in 0..3 {
            x223 = x223.square();
        }
        x223 = x223.mul(&x3);

        let mut t1 = x223;
        for _ in 0..23 {
            t1 = t1.square();
        }
        t1 = t1.mul(&x22);
        for _ in 0..6 {
            t1 = t1.square();
        }
        t1 = t1.mul(&x2);
        t1 = t1.square();
        let sqrt = t1.square();

        CtOption::new(sqrt, sqrt.square().ct_eq(self))
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
