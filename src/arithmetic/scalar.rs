//! Scalar arithmetic modulo the secp256k1 group order.
//!
//! The only arithmetic BIP-32 derivation needs on scalars is addition mod n
//! plus range checking, so that is all this type provides. Like the field
//! elements, scalars are 8 little-endian 32-bit limbs.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use super::util::{
    adc_array_with_overflow, conditional_select, sbb_array, sbb_array_with_underflow,
};

/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
pub const ORDER: [u32; 8] = [
    0xD036_4141,
    0xBFD2_5E8C,
    0xAF48_A03B,
    0xBAAE_DCE6,
    0xFFFF_FFFE,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
];

/// An integer modulo the secp256k1 group order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar(pub(crate) [u32; 8]);

impl Scalar {
    /// The zero scalar.
    pub const ZERO: Self = Self([0, 0, 0, 0, 0, 0, 0, 0]);

    /// Parses the given byte array as a big-endian integer without checking
    /// that it is below the group order.
    ///
    /// Master-key construction deliberately skips the range check, so this
    /// constructor accepts the full 256-bit range; [`Scalar::add`] stays
    /// correct for such values.
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

    /// Attempts to parse the given byte array as a big-endian scalar.
    ///
    /// Returns `None` if the value is not in the range `[0, n)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let res = Self::from_bytes_unchecked(bytes);
        // If the value is in [0, n) then subtracting n underflows.
        let (_, underflow) = sbb_array_with_underflow(&res.0, &ORDER);
        CtOption::new(res, underflow)
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        for i in 0..8 {
            r[4 * i..4 * i + 4].copy_from_slice(&self.0[7 - i].to_be_bytes());
        }
        r
    }

    /// Determine if this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Returns `self + rhs mod n`.
    ///
    /// The sum is corrected by n at most twice: once if the 256-bit addition
    /// carried, and once more if the remainder is still at or above n. At
    /// most one of the operands may be an unchecked 256-bit value (the
    /// permissive master-key path); the other must be below n.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = adc_array_with_overflow(&self.0, &rhs.0);
        let (wrapped, _) = sbb_array(&sum, &ORDER);
        let sum = conditional_select(&sum, &wrapped, carry);

        let (reduced, underflow) = sbb_array_with_underflow(&sum, &ORDER);
        Self(conditional_select(&sum, &reduced, !underflow))
    }

    /// Returns bit `i` of the scalar as a [`Choice`].
    ///
    /// The index must come from public data (a loop counter); it is used as
    /// a memory offset.
    pub(crate) fn bit(&self, i: usize) -> Choice {
        Choice::from(((self.0[i >> 5] >> (i & 31)) & 1) as u8)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, ORDER};
    use crate::arithmetic::util::test_helpers::{biguint_to_u32_array, u32_array_to_biguint};
    use hex_literal::hex;
    use proptest::prelude::*;

    fn order() -> num_bigint::BigUint {
        u32_array_to_biguint(&ORDER)
    }

    #[test]
    fn from_bytes_rejects_order_and_above() {
        let n_bytes = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        assert!(bool::from(Scalar::from_bytes(&n_bytes).is_none()));
        assert!(bool::from(Scalar::from_bytes(&[0xff; 32]).is_none()));

        let n_minus_one = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140");
        assert!(bool::from(Scalar::from_bytes(&n_minus_one).is_some()));
    }

    #[test]
    fn add_wraps_at_order() {
        let n_minus_one = Scalar::from_bytes(&hex!(
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140"
        ))
        .unwrap();
        let one = Scalar::from_bytes(&hex!(
            "0000000000000000000000000000000000000000000000000000000000000001"
        ))
        .unwrap();
        assert_eq!(n_minus_one.add(&one), Scalar::ZERO);
    }

    #[test]
    fn byte_round_trip() {
        let bytes = hex!("E8F32E723DECF4051AEFAC8E2C93C9C5B214313817CDB01A1494B917C8436B35");
        let scalar = Scalar::from_bytes(&bytes).unwrap();
        assert_eq!(scalar.to_bytes(), bytes);
    }

    proptest! {
        #[test]
        fn add_matches_bigint(a in any::<[u32; 8]>(), b in any::<[u32; 8]>()) {
            let sa = Scalar(biguint_to_u32_array(&(u32_array_to_biguint(&a) % order())));
            let sb = Scalar(biguint_to_u32_array(&(u32_array_to_biguint(&b) % order())));
            let expected =
                (u32_array_to_biguint(&sa.0) + u32_array_to_biguint(&sb.0)) % order();
            prop_assert_eq!(sa.add(&sb), Scalar(biguint_to_u32_array(&expected)));
        }

        #[test]
        fn add_accepts_one_unreduced_operand(a in any::<[u32; 8]>(), b in any::<[u32; 8]>()) {
            // The master scalar is never range-checked; addition must still
            // produce the canonical sum when one operand is unreduced.
            let sa = Scalar(a);
            let sb = Scalar(biguint_to_u32_array(&(u32_array_to_biguint(&b) % order())));
            let expected =
                (u32_array_to_biguint(&a) + u32_array_to_biguint(&sb.0)) % order();
            prop_assert_eq!(sa.add(&sb), Scalar(biguint_to_u32_array(&expected)));
        }
    }
}
