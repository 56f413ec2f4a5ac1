//! Base58 encoding and decoding for fixed-length values.
//!
//! The codec is specialized for the fixed 82-byte ↔ 111-character shape of
//! extended keys: both directions run a fixed number of iterations chosen by
//! the caller, so the output length never depends on the value. [`encode`]
//! and [`decode`] are constant-time; the `_vartime` twins trade that
//! guarantee for speed and exist for data that is already public.
//!
//! Decoding does not reject malformed input. An invalid character yields an
//! unspecified (but length-consistent) digit, and values wider than the
//! output buffer are truncated modulo 2^(8·len); callers are expected to
//! validate through the checksum layer, which is what the extended-key
//! deserializers do.

use subtle::{ConditionallySelectable, ConstantTimeGreater};

/// The Bitcoin Base58 alphabet.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Selects `b` if `threshold <= v`, keeping `a` otherwise, without branching.
#[inline(always)]
fn select_ge(v: u32, threshold: u32, a: u32, b: u32) -> u32 {
    // v >= threshold  <=>  v > threshold - 1; thresholds are nonzero.
    u32::conditional_select(&a, &b, v.ct_gt(&(threshold - 1)))
}

/// Maps a digit in `[0, 58)` to its alphabet character in constant time.
///
/// The alphabet is six contiguous ASCII ranges, so the character is built
/// with a cascade of threshold selections instead of a table lookup.
fn digit_to_char(digit: u32) -> u8 {
    let c = b'1' as u32 + digit; // [0,9): '1'..'9'
    let c = select_ge(digit, 9, c, b'A' as u32 + digit - 9); // [9,17): 'A'..'H'
    let c = select_ge(digit, 17, c, b'J' as u32 + digit - 17); // [17,22): 'J'..'N'
    let c = select_ge(digit, 22, c, b'P' as u32 + digit - 22); // [22,33): 'P'..'Z'
    let c = select_ge(digit, 33, c, b'a' as u32 + digit - 33); // [33,44): 'a'..'k'
    let c = select_ge(digit, 44, c, b'm' as u32 + digit - 44); // [44,58): 'm'..'z'
    c as u8
}

/// Maps an ASCII character to its Base58 digit in constant time.
///
/// Characters outside the alphabet produce garbage, by design.
fn char_to_digit(c: u8) -> u32 {
    let c = c as u32;
    let d = c.wrapping_sub(b'1' as u32);
    let d = select_ge(c, b'A' as u32, d, c - b'A' as u32 + 9);
    let d = select_ge(c, b'J' as u32, d, c - b'J' as u32 + 17);
    let d = select_ge(c, b'P' as u32, d, c - b'P' as u32 + 22);
    let d = select_ge(c, b'a' as u32, d, c - b'a' as u32 + 33);
    select_ge(c, b'm' as u32, d, c - b'm' as u32 + 44)
}

/// Packs big-endian bytes into big-endian u32 limbs, padding at the front.
fn pack_limbs(bytes: &[u8]) -> Vec<u32> {
    let mut limbs = vec![0u32; (bytes.len() + 3) / 4];
    let n = bytes.len();
    let m = limbs.len();
    for i in 0..n {
        limbs[m - 1 - i / 4] |= (bytes[n - 1 - i] as u32) << (8 * (i % 4));
    }
    limbs
}

/// Divides the limb array by 58 in place, returning the remainder.
fn div58(limbs: &mut [u32]) -> u32 {
    let mut carry = 0u64;
    for limb in limbs.iter_mut() {
        let tmp = carry << 32 | *limb as u64;
        *limb = (tmp / 58) as u32;
        carry = tmp % 58;
    }
    carry as u32
}

/// Encodes a byte string into a Base58 string of exactly `result_length`
/// characters, in constant time.
///
/// The division loop always runs `result_length` times. High limbs are
/// dropped from the division once enough quarter-bits have provably been
/// consumed — log₂(58) > 23/4, so each character retires at least 23
/// quarter-bits — and that advance rate is a public constant, so the
/// shrinking divides leak nothing about the value.
pub fn encode(bytes: &[u8], result_length: usize) -> String {
    let mut limbs = pack_limbs(bytes);
    let total = limbs.len();
    let mut result = vec![0u8; result_length];

    let mut consumed_quarter_bits = 0usize;
    for i in 0..result_length {
        let skip = core::cmp::min(total, consumed_quarter_bits / 128);
        let digit = div58(&mut limbs[skip..]);
        result[result_length - 1 - i] = digit_to_char(digit);
        consumed_quarter_bits += 23;
    }

    // The alphabet is ASCII, so this cannot fail.
    String::from_utf8(result).expect("base58 output is ASCII")
}

/// Encodes a byte string into a Base58 string of exactly `result_length`
/// characters.
///
/// Variable-time: the division skips limbs that have become zero and the
/// character lookup indexes the alphabet directly. Only for public data.
pub fn encode_vartime(bytes: &[u8], result_length: usize) -> String {
    let mut limbs = pack_limbs(bytes);
    let mut result = vec![0u8; result_length];

    for i in 0..result_length {
        let skip = limbs.iter().take_while(|&&l| l == 0).count();
        let digit = div58(&mut limbs[skip..]);
        result[result_length - 1 - i] = ALPHABET[digit as usize];
    }

    String::from_utf8(result).expect("base58 output is ASCII")
}

/// Multiplies the limb array by 58 in place and adds a digit.
fn mul58_add(limbs: &mut [u32], digit: u32) {
    let mut carry = digit as u64;
    for limb in limbs.iter_mut().rev() {
        let tmp = (*limb as u64) * 58 + carry;
        *limb = tmp as u32;
        carry = tmp >> 32;
    }
}

/// Decodes a Base58 string into `output`, in constant time.
///
/// Runs exactly `encoded.len()` accumulation steps. See the module docs for
/// the (non-)handling of invalid characters and oversized values.
pub fn decode(encoded: &str, output: &mut [u8]) {
    let target_len = output.len();
    let mut limbs = vec![0u32; (target_len + 3) / 4];

    for &c in encoded.as_bytes() {
        mul58_add(&mut limbs, char_to_digit(c));
    }

    let m = limbs.len();
    for i in 0..target_len {
        output[target_len - 1 - i] = (limbs[m - 1 - i / 4] >> (8 * (i % 4))) as u8;
    }
}

/// Decodes a Base58 string into `output`.
///
/// Variable-time counterpart of [`decode`], same truncation and
/// garbage-tolerance contract. Only for public data.
pub fn decode_vartime(encoded: &str, output: &mut [u8]) {
    let target_len = output.len();
    let mut limbs = vec![0u32; (target_len + 3) / 4];

    for &c in encoded.as_bytes() {
        let digit = match c {
            b'1'..=b'9' => c - b'1',
            b'A'..=b'H' => c - b'A' + 9,
            b'J'..=b'N' => c - b'J' + 17,
            b'P'..=b'Z' => c - b'P' + 22,
            b'a'..=b'k' => c - b'a' + 33,
            b'm'..=b'z' => c - b'm' + 44,
            _ => 0,
        };
        mul58_add(&mut limbs, digit as u32);
    }

    let m = limbs.len();
    for i in 0..target_len {
        output[target_len - 1 - i] = (limbs[m - 1 - i / 4] >> (8 * (i % 4))) as u8;
    }
}
