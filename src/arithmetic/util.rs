//! Wide-integer helper functions shared by the field and scalar backends.
//!
//! Everything here operates on fixed-size 8×u32 little-endian limb arrays and
//! runs in time independent of the operand values.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn adc32(a: u32, b: u32, carry: u32) -> (u32, u32) {
    let ret = (a as u64) + (b as u64) + (carry as u64);
    (ret as u32, (ret >> 32) as u32)
}

/// Computes `a - (b + borrow)`, returning the result along with the new
/// borrow. The borrow is either `0` or `u32::MAX`.
#[inline(always)]
pub(crate) const fn sbb32(a: u32, b: u32, borrow: u32) -> (u32, u32) {
    let ret = (a as u64).wrapping_sub((b as u64) + ((borrow >> 31) as u64));
    (ret as u32, (ret >> 32) as u32)
}

/// Adds a multi-limb number to another multi-limb number, returning the
/// result and the resulting carry as a single-limb value (`0` or `1`).
#[inline(always)]
pub(crate) fn adc_array(lhs: &[u32; 8], rhs: &[u32; 8]) -> ([u32; 8], u32) {
    let carry = 0;
    let (r0, carry) = adc32(lhs[0], rhs[0], carry);
    let (r1, carry) = adc32(lhs[1], rhs[1], carry);
    let (r2, carry) = adc32(lhs[2], rhs[2], carry);
    let (r3, carry) = adc32(lhs[3], rhs[3], carry);
    let (r4, carry) = adc32(lhs[4], rhs[4], carry);
    let (r5, carry) = adc32(lhs[5], rhs[5], carry);
    let (r6, carry) = adc32(lhs[6], rhs[6], carry);
    let (r7, carry) = adc32(lhs[7], rhs[7], carry);
    ([r0, r1, r2, r3, r4, r5, r6, r7], carry)
}

/// Adds a multi-limb number to another multi-limb number, returning the
/// result and the resulting carry as a constant-time [`Choice`].
#[inline(always)]
pub(crate) fn adc_array_with_overflow(lhs: &[u32; 8], rhs: &[u32; 8]) -> ([u32; 8], Choice) {
    let (res, carry) = adc_array(lhs, rhs);
    (res, Choice::from(carry as u8))
}

/// Subtracts a multi-limb number from another multi-limb number, returning
/// the result and the resulting borrow as a single-limb value (`0` or
/// `u32::MAX`).
#[inline(always)]
pub(crate) fn sbb_array(lhs: &[u32; 8], rhs: &[u32; 8]) -> ([u32; 8], u32) {
    let borrow = 0;
    let (r0, borrow) = sbb32(lhs[0], rhs[0], borrow);
    let (r1, borrow) = sbb32(lhs[1], rhs[1], borrow);
    let (r2, borrow) = sbb32(lhs[2], rhs[2], borrow);
    let (r3, borrow) = sbb32(lhs[3], rhs[3], borrow);
    let (r4, borrow) = sbb32(lhs[4], rhs[4], borrow);
    let (r5, borrow) = sbb32(lhs[5], rhs[5], borrow);
    let (r6, borrow) = sbb32(lhs[6], rhs[6], borrow);
    let (r7, borrow) = sbb32(lhs[7], rhs[7], borrow);
    ([r0, r1, r2, r3, r4, r5, r6, r7], borrow)
}

/// Subtracts a multi-limb number from another multi-limb number, returning
/// the result and the resulting borrow as a constant-time [`Choice`]
/// (`1` if there was a borrow).
#[inline(always)]
pub(crate) fn sbb_array_with_underflow(lhs: &[u32; 8], rhs: &[u32; 8]) -> ([u32; 8], Choice) {
    let (res, borrow) = sbb_array(lhs, rhs);
    (res, Choice::from((borrow >> 31) as u8))
}

/// Limb-wise constant-time selection: returns `a` if `choice` is 0 and `b`
/// if `choice` is 1.
#[inline(always)]
pub(crate) fn conditional_select(a: &[u32; 8], b: &[u32; 8], choice: Choice) -> [u32; 8] {
    [
        u32::conditional_select(&a[0], &b[0], choice),
        u32::conditional_select(&a[1], &b[1], choice),
        u32::conditional_select(&a[2], &b[2], choice),
        u32::conditional_select(&a[3], &b[3], choice),
        u32::conditional_select(&a[4], &b[4], choice),
        u32::conditional_select(&a[5], &b[5], choice),
        u32::conditional_select(&a[6], &b[6], choice),
        u32::conditional_select(&a[7], &b[7], choice),
    ]
}

/// Constant-time comparison of two multi-limb numbers.
///
/// Returns -1, 0, or +1. Limbs are scanned from the most significant down;
/// once a limb pair differs, the running result becomes non-zero and is
/// sticky (`result * result` selects it on every later step).
pub(crate) fn compare_arrays(a: &[u32; 8], b: &[u32; 8]) -> i32 {
    let mut result: i32 = 0;
    for i in (0..8).rev() {
        let (_, borrow) = sbb32(b[i], a[i], 0);
        let le = 1 - (borrow >> 31) as i32;
        let eq = a[i].ct_eq(&b[i]).unwrap_u8() as i32;
        let now = i32::conditional_select(&1, &(eq - 1), Choice::from(le as u8));
        result = i32::conditional_select(&now, &result, Choice::from((result * result) as u8));
    }
    result
}
