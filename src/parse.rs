//! Decimal and hexadecimal string to binary conversion.
//!
//! Decimal literals are evaluated in up to three stages: a table-driven
//! fast path when the digits and exponent are small enough that at most
//! one or two floating multiplies round, a naive power-of-ten scaling
//! that builds an initial candidate otherwise, and a correction loop that
//! compares the candidate against the exact decimal value with `ExactInt`
//! arithmetic, nudging the raw bit pattern one ulp at a time until the
//! difference drops under half an ulp (ties round to even).
//!
//! Single precision runs the same machinery over `f32` bit patterns
//! rather than rounding a parsed `f64` a second time.
//!
//! Hexadecimal literals carry their significand exactly; they are folded
//! into a `u64` with a sticky bit and rounded once to the target
//! precision.

use crate::defs::Error;
use crate::defs::EXP_BIAS;
use crate::defs::EXP_MASK;
use crate::defs::EXP_SHIFT;
use crate::defs::FRACT_HOB;
use crate::defs::SIGNIF_MASK;
use crate::defs::SIGN_MASK;
use crate::defs::SINGLE_EXP_BIAS;
use crate::defs::SINGLE_EXP_MASK;
use crate::defs::SINGLE_EXP_SHIFT;
use crate::defs::SINGLE_FRACT_HOB;
use crate::defs::SINGLE_SIGNIF_MASK;
use crate::defs::SINGLE_SIGN_MASK;
use crate::exact::ExactInt;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use alloc::{string::ToString, vec::Vec};

// Largest decimal digit counts that are exactly representable in the
// respective binary formats.
const MAX_DECIMAL_DIGITS: usize = 15;
const SINGLE_MAX_DECIMAL_DIGITS: usize = 7;

const MAX_DECIMAL_EXPONENT: i32 = 308;
const MIN_DECIMAL_EXPONENT: i32 = -324;
const SINGLE_MAX_DECIMAL_EXPONENT: i32 = 38;
const SINGLE_MIN_DECIMAL_EXPONENT: i32 = -45;

// Overflowing exponents are clamped here (plus the digit count); the
// estimate and correction still converge to zero or infinity without
// integer overflow.
const BIG_DECIMAL_EXPONENT: i32 = 324;

// Digits beyond these counts cannot move the rounding decision; longer
// runs are truncated with a sticky non-zero digit.
const MAX_NDIGITS: usize = 770;
const SINGLE_MAX_NDIGITS: usize = 120;

// Exact powers of ten in the respective formats.
const MAX_SMALL_TEN: i32 = 22;
const SINGLE_MAX_SMALL_TEN: i32 = 10;

const SMALL_10_POW: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

const SINGLE_SMALL_10_POW: [f32; 11] =
    [1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10];

const BIG_10_POW: [f64; 5] = [1e16, 1e32, 1e64, 1e128, 1e256];
const TINY_10_POW: [f64; 5] = [1e-16, 1e-32, 1e-64, 1e-128, 1e-256];

// Lexed literal, precision-independent.
enum Parsed {
    Nan,
    Infinity { negative: bool },
    Zero { negative: bool },
    Decimal { negative: bool, dec_exp: i32, digits: Vec<u8> },
    // value = sig * 2^bin_exp, sticky marks discarded non-zero low bits
    Hex { negative: bool, sig: u64, bin_exp: i64, sticky: bool },
}

/// Parses a decimal or hexadecimal floating point literal as an `f64`.
///
/// The literal is `digits[.digits][(e|E)[sign]digits]`, a hexadecimal
/// form `0x hexdigits[.hexdigits] (p|P)[sign]digits`, or one of `NaN`
/// and `Infinity`; a leading sign and a single trailing `f`/`F`/`d`/`D`
/// suffix are allowed, as is surrounding ASCII whitespace. The result is
/// the nearest representable value, ties to even.
///
/// ## Errors
///
/// Returns [`Error::InvalidFormat`] when the input does not match the
/// grammar.
pub fn parse_double(s: &str) -> Result<f64, Error> {
    match parse_literal(s)? {
        Parsed::Nan => Ok(f64::NAN),
        Parsed::Infinity { negative } => {
            Ok(if negative { f64::NEG_INFINITY } else { f64::INFINITY })
        }
        Parsed::Zero { negative } => Ok(if negative { -0.0 } else { 0.0 }),
        Parsed::Decimal { negative, dec_exp, digits } => {
            Ok(decimal_to_double(negative, dec_exp, digits))
        }
        Parsed::Hex { negative, sig, bin_exp, sticky } => {
            Ok(hex_to_double(negative, sig, bin_exp, sticky))
        }
    }
}

/// Parses a decimal or hexadecimal floating point literal as an `f32`.
///
/// Same grammar as [`parse_double`]. The value is rounded to single
/// precision directly from the digits, never through an intermediate
/// `f64` (which could round twice).
///
/// ## Errors
///
/// Returns [`Error::InvalidFormat`] when the input does not match the
/// grammar.
pub fn parse_single(s: &str) -> Result<f32, Error> {
    match parse_literal(s)? {
        Parsed::Nan => Ok(f32::NAN),
        Parsed::Infinity { negative } => {
            Ok(if negative { f32::NEG_INFINITY } else { f32::INFINITY })
        }
        Parsed::Zero { negative } => Ok(if negative { -0.0 } else { 0.0 }),
        Parsed::Decimal { negative, dec_exp, digits } => {
            Ok(decimal_to_single(negative, dec_exp, digits))
        }
        Parsed::Hex { negative, sig, bin_exp, sticky } => {
            Ok(hex_to_single(negative, sig, bin_exp, sticky))
        }
    }
}

fn parse_literal(input: &str) -> Result<Parsed, Error> {
    let err = || Error::InvalidFormat(input.to_string());
    let s = input.trim_matches(|c: char| c.is_ascii_whitespace());
    let b = s.as_bytes();
    let len = b.len();
    if len == 0 {
        return Err(err());
    }
    let mut i = 0;
    let mut negative = false;
    let mut sign_seen = false;
    match b[0] {
        b'-' => {
            negative = true;
            sign_seen = true;
            i = 1;
        }
        b'+' => {
            sign_seen = true;
            i = 1;
        }
        _ => {}
    }
    if i >= len {
        return Err(err());
    }
    match b[i] {
        b'N' => {
            return if &s[i..] == "NaN" { Ok(Parsed::Nan) } else { Err(err()) };
        }
        b'I' => {
            return if &s[i..] == "Infinity" {
                Ok(Parsed::Infinity { negative })
            } else {
                Err(err())
            };
        }
        b'0' if i + 1 < len && (b[i + 1] == b'x' || b[i + 1] == b'X') => {
            return parse_hex_literal(input, s, i + 2, negative);
        }
        _ => {}
    }

    let mut digits = Vec::with_capacity(len);
    let mut dec_seen = false;
    let mut dec_pt = 0i32;
    let mut n_lead_zero = 0i32;
    let mut n_trail_zero = 0usize;
    // leading zeros and a point among them carry no digits, only scale
    while i < len {
        match b[i] {
            b'0' => n_lead_zero += 1,
            b'.' => {
                if dec_seen {
                    return Err(err());
                }
                dec_pt = i as i32 - if sign_seen { 1 } else { 0 };
                dec_seen = true;
            }
            _ => break,
        }
        i += 1;
    }
    while i < len {
        let c = b[i];
        match c {
            b'1'..=b'9' => {
                digits.push(c);
                n_trail_zero = 0;
            }
            b'0' => {
                digits.push(c);
                n_trail_zero += 1;
            }
            b'.' => {
                if dec_seen {
                    return Err(err());
                }
                dec_pt = i as i32 - if sign_seen { 1 } else { 0 };
                dec_seen = true;
            }
            _ => break,
        }
        i += 1;
    }
    let n_digits = digits.len() - n_trail_zero;
    digits.truncate(n_digits);
    let is_zero = n_digits == 0;
    if is_zero && n_lead_zero == 0 {
        // no digits at all, not even a zero
        return Err(err());
    }
    // value = 0.digits * 10^dec_exp
    let mut dec_exp = if dec_seen {
        dec_pt - n_lead_zero
    } else {
        (n_digits + n_trail_zero) as i32
    };

    if i < len && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        let mut exp_sign = 1i32;
        if i < len && (b[i] == b'-' || b[i] == b'+') {
            if b[i] == b'-' {
                exp_sign = -1;
            }
            i += 1;
        }
        let exp_at = i;
        let really_big = i32::MAX / 10;
        let mut exp_val = 0i32;
        let mut exp_overflow = false;
        while i < len && b[i].is_ascii_digit() {
            if exp_val >= really_big {
                exp_overflow = true;
            } else {
                exp_val = exp_val * 10 + (b[i] - b'0') as i32;
            }
            i += 1;
        }
        if i == exp_at {
            // e with no digits after it
            return Err(err());
        }
        let exp_limit = BIG_DECIMAL_EXPONENT + n_digits as i32 + n_trail_zero as i32;
        if exp_overflow || exp_val > exp_limit {
            // a large positive exponent may still be compensated by a
            // negative scale from the digits
            if !exp_overflow && exp_sign == 1 && dec_exp < 0 && exp_val + dec_exp < exp_limit {
                dec_exp += exp_val;
            } else {
                dec_exp = exp_sign * BIG_DECIMAL_EXPONENT;
            }
        } else {
            dec_exp += exp_sign * exp_val;
        }
    }

    if i < len && (i != len - 1 || !matches!(b[i], b'f' | b'F' | b'd' | b'D')) {
        return Err(err());
    }
    if is_zero {
        return Ok(Parsed::Zero { negative });
    }
    Ok(Parsed::Decimal { negative, dec_exp, digits })
}

// Hexadecimal body after the 0x prefix: hexdigits[.hexdigits] with at
// least one digit, a mandatory p exponent, optional suffix.
fn parse_hex_literal(input: &str, s: &str, start: usize, negative: bool) -> Result<Parsed, Error> {
    let err = || Error::InvalidFormat(input.to_string());
    let b = s.as_bytes();
    let len = b.len();
    let mut i = start;
    let mut sig: u64 = 0;
    let mut sticky = false;
    let mut n_hex = 0usize;
    let mut dropped = 0i64;
    let mut frac_digits = 0i64;
    let mut dec_seen = false;
    while i < len {
        let c = b[i];
        let d = match c {
            b'0'..=b'9' => (c - b'0') as u64,
            b'a'..=b'f' => (c - b'a' + 10) as u64,
            b'A'..=b'F' => (c - b'A' + 10) as u64,
            b'.' => {
                if dec_seen {
                    return Err(err());
                }
                dec_seen = true;
                i += 1;
                continue;
            }
            _ => break,
        };
        n_hex += 1;
        if dec_seen {
            frac_digits += 1;
        }
        if sig >> 60 == 0 {
            sig = (sig << 4) | d;
        } else {
            // out of significand room; the digit only shifts the scale
            dropped += 1;
            if d != 0 {
                sticky = true;
            }
        }
        i += 1;
    }
    if n_hex == 0 {
        return Err(err());
    }
    if i >= len || (b[i] != b'p' && b[i] != b'P') {
        // the binary exponent is not optional
        return Err(err());
    }
    i += 1;
    let mut exp_sign = 1i64;
    if i < len && (b[i] == b'-' || b[i] == b'+') {
        if b[i] == b'-' {
            exp_sign = -1;
        }
        i += 1;
    }
    let exp_at = i;
    let mut exp_val: i64 = 0;
    while i < len && b[i].is_ascii_digit() {
        // saturate; anything this large flushes to zero or infinity
        if exp_val < 1 << 40 {
            exp_val = exp_val * 10 + (b[i] - b'0') as i64;
        }
        i += 1;
    }
    if i == exp_at {
        return Err(err());
    }
    if i < len && (i != len - 1 || !matches!(b[i], b'f' | b'F' | b'd' | b'D')) {
        return Err(err());
    }
    if sig == 0 {
        return Ok(Parsed::Zero { negative });
    }
    let bin_exp = exp_sign * exp_val + 4 * (dropped - frac_digits);
    Ok(Parsed::Hex { negative, sig, bin_exp, sticky })
}

fn signed(negative: bool, v: f64) -> f64 {
    if negative {
        -v
    } else {
        v
    }
}

fn signed_single(negative: bool, v: f32) -> f32 {
    if negative {
        -v
    } else {
        v
    }
}

// Evaluates 0.digits * 10^dec_exp to the nearest f64.
fn decimal_to_double(negative: bool, dec_exp: i32, mut digits: Vec<u8>) -> f64 {
    let n_digits = digits.len();
    let k_digits = n_digits.min(MAX_DECIMAL_DIGITS + 1);
    let mut l_value: u64 = 0;
    for &d in &digits[..k_digits] {
        l_value = l_value * 10 + (d - b'0') as u64;
    }
    let mut d_value = l_value as f64;
    let exp = dec_exp - k_digits as i32;

    if n_digits <= MAX_DECIMAL_DIGITS {
        // the digits are exact in d_value; if the power of ten is exact
        // too, a single multiply or divide rounds once
        if exp == 0 {
            return signed(negative, d_value);
        }
        if exp >= 0 {
            if exp <= MAX_SMALL_TEN {
                return signed(negative, d_value * SMALL_10_POW[exp as usize]);
            }
            let slop = (MAX_DECIMAL_DIGITS - k_digits) as i32;
            if exp <= MAX_SMALL_TEN + slop {
                // pad the digits with exact zeros, then one rounding
                d_value *= SMALL_10_POW[slop as usize];
                return signed(negative, d_value * SMALL_10_POW[(exp - slop) as usize]);
            }
        } else if exp >= -MAX_SMALL_TEN {
            return signed(negative, d_value / SMALL_10_POW[(-exp) as usize]);
        }
    }

    if dec_exp > MAX_DECIMAL_EXPONENT + 1 {
        return signed(negative, f64::INFINITY);
    }
    if dec_exp < MIN_DECIMAL_EXPONENT - 1 {
        return signed(negative, 0.0);
    }

    // Build an estimate by naive scaling; every step can round, so the
    // result may be a few ulps off.
    let mut e = exp;
    if e > 0 {
        if e & 15 != 0 {
            d_value *= SMALL_10_POW[(e & 15) as usize];
        }
        e >>= 4;
        if e != 0 {
            let mut j = 0;
            while e > 1 {
                if e & 1 != 0 {
                    d_value *= BIG_10_POW[j];
                }
                j += 1;
                e >>= 1;
            }
            // the last multiply may overflow; if halving first survives,
            // the value is just beyond MAX and still worth correcting
            let t = d_value * BIG_10_POW[j];
            if t.is_infinite() {
                if ((d_value / 2.0) * BIG_10_POW[j]).is_infinite() {
                    return signed(negative, f64::INFINITY);
                }
                d_value = f64::MAX;
            } else {
                d_value = t;
            }
        }
    } else if e < 0 {
        let mut ea = -e;
        if ea & 15 != 0 {
            d_value /= SMALL_10_POW[(ea & 15) as usize];
        }
        ea >>= 4;
        if ea != 0 {
            let mut j = 0;
            while ea > 1 {
                if ea & 1 != 0 {
                    d_value *= TINY_10_POW[j];
                }
                j += 1;
                ea >>= 1;
            }
            let t = d_value * TINY_10_POW[j];
            if t == 0.0 {
                if (d_value * 2.0) * TINY_10_POW[j] == 0.0 {
                    return signed(negative, 0.0);
                }
                // just under the smallest subnormal, maybe
                d_value = f64::from_bits(1);
            } else {
                d_value = t;
            }
        }
    }

    let n_digits = if n_digits > MAX_NDIGITS {
        // the tail cannot affect rounding; keep it non-zero as a sticky
        // marker
        digits.truncate(MAX_NDIGITS);
        digits.push(b'1');
        MAX_NDIGITS + 1
    } else {
        n_digits
    };
    let exp = dec_exp - n_digits as i32;
    let b5 = (-exp).max(0);
    let d5 = exp.max(0);
    let big_d0 = ExactInt::from_digits(l_value, &digits, k_digits).mul_pow52(d5 as usize, 0);
    let bits = correction_loop(
        d_value.to_bits(),
        &big_d0,
        b5,
        d5,
        EXP_SHIFT,
        EXP_BIAS,
        EXP_MASK,
        FRACT_HOB,
        SIGNIF_MASK,
    );
    f64::from_bits(bits | if negative { SIGN_MASK } else { 0 })
}

// Evaluates 0.digits * 10^dec_exp to the nearest f32.
fn decimal_to_single(negative: bool, dec_exp: i32, mut digits: Vec<u8>) -> f32 {
    let n_digits = digits.len();
    let k_digits = n_digits.min(SINGLE_MAX_DECIMAL_DIGITS + 1);
    let mut i_value: u32 = 0;
    for &d in &digits[..k_digits] {
        i_value = i_value * 10 + (d - b'0') as u32;
    }
    let mut f_value = i_value as f32;
    let exp = dec_exp - k_digits as i32;

    if n_digits <= SINGLE_MAX_DECIMAL_DIGITS {
        if exp == 0 {
            return signed_single(negative, f_value);
        }
        if exp >= 0 {
            if exp <= SINGLE_MAX_SMALL_TEN {
                return signed_single(negative, f_value * SINGLE_SMALL_10_POW[exp as usize]);
            }
            let slop = (SINGLE_MAX_DECIMAL_DIGITS - k_digits) as i32;
            if exp <= SINGLE_MAX_SMALL_TEN + slop {
                f_value *= SINGLE_SMALL_10_POW[slop as usize];
                return signed_single(negative, f_value * SINGLE_SMALL_10_POW[(exp - slop) as usize]);
            }
        } else if exp >= -SINGLE_MAX_SMALL_TEN {
            return signed_single(negative, f_value / SINGLE_SMALL_10_POW[(-exp) as usize]);
        }
    } else if dec_exp >= n_digits as i32 && dec_exp <= MAX_DECIMAL_DIGITS as i32 {
        // an integer that is exact in double precision: evaluate there
        // and round once on the narrowing cast
        let mut l_value = i_value as u64;
        for &d in &digits[k_digits..] {
            l_value = l_value * 10 + (d - b'0') as u64;
        }
        let d_value = (l_value as f64) * SMALL_10_POW[(dec_exp - n_digits as i32) as usize];
        return signed_single(negative, d_value as f32);
    }

    if dec_exp > SINGLE_MAX_DECIMAL_EXPONENT + 1 {
        return signed_single(negative, f32::INFINITY);
    }
    if dec_exp < SINGLE_MIN_DECIMAL_EXPONENT - 1 {
        return signed_single(negative, 0.0);
    }

    // The estimate runs in double precision, where this exponent range
    // cannot overflow or underflow.
    let mut d_value = f_value as f64;
    let mut e = exp;
    if e > 0 {
        if e & 15 != 0 {
            d_value *= SMALL_10_POW[(e & 15) as usize];
        }
        e >>= 4;
        let mut j = 0;
        while e > 0 {
            if e & 1 != 0 {
                d_value *= BIG_10_POW[j];
            }
            j += 1;
            e >>= 1;
        }
    } else if e < 0 {
        let mut ea = -e;
        if ea & 15 != 0 {
            d_value /= SMALL_10_POW[(ea & 15) as usize];
        }
        ea >>= 4;
        let mut j = 0;
        while ea > 0 {
            if ea & 1 != 0 {
                d_value *= TINY_10_POW[j];
            }
            j += 1;
            ea >>= 1;
        }
    }
    let f_value = (d_value as f32).clamp(f32::from_bits(1), f32::MAX);

    let n_digits = if n_digits > SINGLE_MAX_NDIGITS {
        digits.truncate(SINGLE_MAX_NDIGITS);
        digits.push(b'1');
        SINGLE_MAX_NDIGITS + 1
    } else {
        n_digits
    };
    let exp = dec_exp - n_digits as i32;
    let b5 = (-exp).max(0);
    let d5 = exp.max(0);
    let big_d0 = ExactInt::from_digits(i_value as u64, &digits, k_digits).mul_pow52(d5 as usize, 0);
    let bits = correction_loop(
        f_value.to_bits() as u64,
        &big_d0,
        b5,
        d5,
        SINGLE_EXP_SHIFT,
        SINGLE_EXP_BIAS,
        SINGLE_EXP_MASK as u64,
        SINGLE_FRACT_HOB as u64,
        SINGLE_SIGNIF_MASK as u64,
    );
    f32::from_bits(bits as u32 | if negative { SINGLE_SIGN_MASK } else { 0 })
}

// Outcome of one correction iteration. The range exits are explicit so
// that the loop cannot walk past zero or infinity.
#[derive(Debug, PartialEq, Eq)]
enum Correction {
    Continue,
    Done,
    Underflowed,
    Overflowed,
}

// Nudges the candidate bit pattern toward the exact decimal value
// big_d0 * 10^exp (with b5 = powers of five below one, already folded
// into big_d0 when above). Works on sign-free bit patterns of either
// width; the format is described by the shift/bias/mask arguments.
#[allow(clippy::too_many_arguments)]
fn correction_loop(
    mut ieee_bits: u64,
    big_d0: &ExactInt,
    b5: i32,
    d5: i32,
    exp_shift: i32,
    exp_bias: i32,
    exp_mask: u64,
    fract_hob: u64,
    signif_mask: u64,
) -> u64 {
    let mut big_d = ExactInt::zero();
    let mut prev_d2 = -1i32;
    loop {
        // candidate is finite and non-zero here
        let mut binexp = (ieee_bits >> exp_shift) as i32;
        let mut big_b_bits = ieee_bits & signif_mask;
        if binexp > 0 {
            big_b_bits |= fract_hob;
        } else {
            let lz = big_b_bits.leading_zeros() as i32;
            let shift = lz - (63 - exp_shift);
            big_b_bits <<= shift;
            binexp = 1 - shift;
        }
        binexp -= exp_bias;
        let low_order_zeros = big_b_bits.trailing_zeros() as i32;
        big_b_bits >>= low_order_zeros;
        let big_int_exp = binexp - exp_shift + low_order_zeros;
        let big_int_nbits = exp_shift + 1 - low_order_zeros;

        // powers of two in B, D, and half an ulp, each padded up to the
        // matching power of five to make whole powers of ten; common
        // factors add nothing and are removed
        let mut b2 = b5;
        let mut d2 = d5;
        if big_int_exp >= 0 {
            b2 += big_int_exp;
        } else {
            d2 -= big_int_exp;
        }
        let mut ulp2 = b2;
        let hulpbias = if binexp <= -exp_bias {
            // the candidate is subnormal; half an ulp sits further down
            binexp + low_order_zeros + exp_bias
        } else {
            1 + low_order_zeros
        };
        b2 += hulpbias;
        d2 += hulpbias;
        let common2 = b2.min(d2).min(ulp2);
        b2 -= common2;
        d2 -= common2;
        ulp2 -= common2;

        let mut big_b = ExactInt::mul_pow52_u64(big_b_bits, b5 as usize, b2 as usize);
        if prev_d2 != d2 {
            big_d = big_d0.shifted_left(d2 as usize);
            prev_d2 = d2;
        }

        // compare, leaving the difference in big_b either way
        let overvalue = match Ord::cmp(&big_b, &big_d) {
            Ordering::Greater => {
                big_b.sub_assign_left(&big_d);
                if big_int_nbits == 1 && big_int_exp > 1 - exp_bias {
                    // the candidate is a power of two above the smallest
                    // normal; the ulp below it is half the ulp above
                    ulp2 -= 1;
                    if ulp2 < 0 {
                        ulp2 = 0;
                        big_b.left_shift(1);
                    }
                }
                Some(true)
            }
            Ordering::Less => {
                big_d.sub_into_right(&mut big_b);
                Some(false)
            }
            // the candidate is exactly the decimal value
            Ordering::Equal => None,
        };

        let step = match overvalue {
            None => Correction::Done,
            Some(overvalue) => match big_b.cmp_pow52(b5 as usize, ulp2 as usize) {
                Ordering::Less => Correction::Done,
                Ordering::Equal => {
                    // exactly half an ulp off: round to even
                    if ieee_bits & 1 != 0 {
                        ieee_bits = if overvalue { ieee_bits - 1 } else { ieee_bits + 1 };
                    }
                    Correction::Done
                }
                Ordering::Greater => {
                    ieee_bits = if overvalue { ieee_bits - 1 } else { ieee_bits + 1 };
                    if ieee_bits == 0 {
                        Correction::Underflowed
                    } else if ieee_bits == exp_mask {
                        Correction::Overflowed
                    } else {
                        Correction::Continue
                    }
                }
            },
        };
        if step != Correction::Continue {
            // Done keeps the candidate; the range exits keep the zero or
            // infinity pattern the walk arrived at
            break;
        }
    }
    ieee_bits
}

// Rounds sig * 2^bin_exp (exact up to the sticky bit) to an f64.
fn hex_to_double(negative: bool, sig: u64, bin_exp: i64, sticky: bool) -> f64 {
    let lz = sig.leading_zeros();
    let bits = round_normalized(sig << lz, bin_exp + 63 - lz as i64, sticky, 53, -1022, 1023, 52);
    f64::from_bits(bits | if negative { SIGN_MASK } else { 0 })
}

// Rounds sig * 2^bin_exp to an f32 in a single rounding step.
fn hex_to_single(negative: bool, sig: u64, bin_exp: i64, sticky: bool) -> f32 {
    let lz = sig.leading_zeros();
    let bits = round_normalized(sig << lz, bin_exp + 63 - lz as i64, sticky, 24, -126, 127, 23);
    f32::from_bits(bits as u32 | if negative { SINGLE_SIGN_MASK } else { 0 })
}

// Round-half-even of a normalized significand (top bit at 63) with
// leading-bit exponent e to a format with p_bits significand bits and
// normal exponent range [e_min, e_max]. Returns sign-free raw bits.
fn round_normalized(
    sig: u64,
    e: i64,
    sticky: bool,
    p_bits: i64,
    e_min: i64,
    e_max: i64,
    exp_shift: i64,
) -> u64 {
    let bias = -e_min + 1;
    let inf = ((e_max + bias + 1) as u64) << exp_shift;
    if e > e_max {
        return inf;
    }
    // exponent of the ulp; pinned at the subnormal floor
    let mut q = (e - (p_bits - 1)).max(e_min - (p_bits - 1));
    let shift = 63 - (e - q);
    if shift > 64 {
        // under half the smallest subnormal
        return 0;
    }
    let (mut kept, round, st) = if shift == 64 {
        // the leading bit is the round bit itself
        (0u64, 1u64, sticky || sig << 1 != 0)
    } else {
        (
            sig >> shift,
            (sig >> (shift - 1)) & 1,
            sticky || sig & ((1u64 << (shift - 1)) - 1) != 0,
        )
    };
    if round == 1 && (st || kept & 1 == 1) {
        kept += 1;
        if kept >> p_bits != 0 {
            kept >>= 1;
            q += 1;
        }
    }
    if kept == 0 {
        return 0;
    }
    if kept >> (p_bits - 1) != 0 {
        let be = q + (p_bits - 1) + bias;
        if be > e_max + bias {
            return inf;
        }
        ((be as u64) << exp_shift) | (kept & ((1u64 << (p_bits - 1)) - 1))
    } else {
        // subnormal: q is at the floor, the bits are the raw pattern
        kept
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::dtoa::{double_to_string, single_to_string};
    use rand::random;

    #[test]
    fn test_specials() {
        assert!(parse_double("NaN").unwrap().is_nan());
        assert!(parse_double("-NaN").unwrap().is_nan());
        assert_eq!(parse_double("Infinity"), Ok(f64::INFINITY));
        assert_eq!(parse_double("-Infinity"), Ok(f64::NEG_INFINITY));
        assert_eq!(parse_double("+Infinity"), Ok(f64::INFINITY));
        assert!(parse_single("NaN").unwrap().is_nan());
        assert_eq!(parse_single("-Infinity"), Ok(f32::NEG_INFINITY));
    }

    #[test]
    fn test_signed_zero() {
        assert_eq!(parse_double("0").unwrap().to_bits(), 0.0f64.to_bits());
        assert_eq!(parse_double("-0").unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(parse_double("-0.000e5").unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(parse_single("-0.0").unwrap().to_bits(), (-0.0f32).to_bits());
        // a literal that underflows keeps its sign
        assert_eq!(parse_double("-1e-999").unwrap().to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn test_simple_decimal() {
        assert_eq!(parse_double("1"), Ok(1.0));
        assert_eq!(parse_double("1.5"), Ok(1.5));
        assert_eq!(parse_double("-1.5"), Ok(-1.5));
        assert_eq!(parse_double(".5"), Ok(0.5));
        assert_eq!(parse_double("3."), Ok(3.0));
        assert_eq!(parse_double("100"), Ok(100.0));
        assert_eq!(parse_double("0.1"), Ok(0.1));
        assert_eq!(parse_double("1e10"), Ok(1e10));
        assert_eq!(parse_double("1E-5"), Ok(1e-5));
        assert_eq!(parse_double("  2.5  "), Ok(2.5));
        assert_eq!(parse_double("2.5f"), Ok(2.5));
        assert_eq!(parse_double("2.5D"), Ok(2.5));
        assert_eq!(parse_single("0.1"), Ok(0.1f32));
        assert_eq!(parse_single("1e10"), Ok(1e10f32));
    }

    #[test]
    fn test_malformed() {
        for s in [
            "", " ", "+", "-", ".", "1.2.3", "abc", "1e", "1e+", "1ex", "1e5x", "ff", "1ff",
            "0x", "0x1.2", "0xp3", "0x1p", "1.5e10e", "Infinityy", "NaNf", "- 1", "1 .5",
        ] {
            assert_eq!(parse_double(s), Err(Error::InvalidFormat(s.to_string())), "input {:?}", s);
            assert!(parse_single(s).is_err(), "input {:?}", s);
        }
    }

    #[test]
    fn test_round_to_even_at_2_53() {
        // 2^53 + 1 is exactly between two doubles; even wins
        assert_eq!(parse_double("9007199254740993"), Ok(9007199254740992.0));
        assert_eq!(parse_double("9007199254740995"), Ok(9007199254740996.0));
        // the float analogue at 2^24 + 1
        assert_eq!(parse_single("16777217"), Ok(16777216.0));
        assert_eq!(parse_single("16777219"), Ok(16777220.0));
    }

    #[test]
    fn test_long_digit_strings() {
        // the exact decimal expansion of the double nearest 0.1
        let exact = "0.1000000000000000055511151231257827021181583404541015625";
        assert_eq!(parse_double(exact), Ok(0.1));
        // one digit bumped: still nearest to 0.1's neighborhood boundary
        assert_eq!(
            parse_double("0.10000000000000000555111512312578270211815834045410156249"),
            Ok(0.1)
        );
        // far more digits than can matter
        let mut s = String::from("1.");
        for _ in 0..900 {
            s.push('3');
        }
        assert_eq!(parse_double(&s), Ok(s.parse::<f64>().unwrap()));
    }

    #[test]
    fn test_range_edges() {
        assert_eq!(parse_double("1.7976931348623157e308"), Ok(f64::MAX));
        assert_eq!(parse_double("1.7976931348623159e308"), Ok(f64::INFINITY));
        assert_eq!(parse_double("1e309"), Ok(f64::INFINITY));
        assert_eq!(parse_double("-1e309"), Ok(f64::NEG_INFINITY));
        assert_eq!(parse_double("1e999999999999999999999"), Ok(f64::INFINITY));
        assert_eq!(parse_double("4.9e-324").map(f64::to_bits), Ok(1));
        assert_eq!(parse_double("3e-324").map(f64::to_bits), Ok(1));
        assert_eq!(parse_double("1e-324"), Ok(0.0));
        assert_eq!(parse_double("1e-999999999999999999999"), Ok(0.0));
        assert_eq!(parse_double("2.2250738585072014e-308"), Ok(f64::MIN_POSITIVE));

        assert_eq!(parse_single("3.4028235e38"), Ok(f32::MAX));
        assert_eq!(parse_single("3.4028237e38"), Ok(f32::INFINITY));
        assert_eq!(parse_single("1e39"), Ok(f32::INFINITY));
        assert_eq!(parse_single("1.4e-45").map(f32::to_bits), Ok(1));
        assert_eq!(parse_single("1e-46"), Ok(0.0));
    }

    #[test]
    fn test_exponent_rescue() {
        // a huge exponent compensated by a deeply fractional mantissa
        let mut s = String::from("0.");
        for _ in 0..400 {
            s.push('0');
        }
        s.push('1');
        s.push_str("e400");
        // 10^-401 * 10^400 = 0.1
        assert_eq!(parse_double(&s), Ok(0.1));
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_double("0x1.8p3"), Ok(12.0));
        assert_eq!(parse_double("0x1p0"), Ok(1.0));
        assert_eq!(parse_double("-0x1.0p-1"), Ok(-0.5));
        assert_eq!(parse_double("0x10p0"), Ok(16.0));
        assert_eq!(parse_double("0x.8p1"), Ok(1.0));
        assert_eq!(parse_double("0x8.p-3"), Ok(1.0));
        assert_eq!(parse_double("0xABCp0"), Ok(2748.0));
        assert_eq!(parse_double("0X1P10"), Ok(1024.0));
        assert_eq!(parse_double("0x1p4f"), Ok(16.0));
        assert_eq!(parse_double("0x0p5"), Ok(0.0));
        assert_eq!(parse_double("-0x0p5").unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(parse_single("0x1.8p3"), Ok(12.0f32));
    }

    #[test]
    fn test_hex_rounding_at_53_bits() {
        // exactly representable: 2^53 - 1
        assert_eq!(parse_double("0x1fffffffffffffp0"), Ok(9007199254740991.0));
        // halfway cases round to even
        assert_eq!(parse_double("0x1.fffffffffffff8p0"), Ok(2.0));
        assert_eq!(
            parse_double("0x1.ffffffffffffe8p0").map(f64::to_bits),
            Ok(0x3FFFFFFFFFFFFFFE)
        );
        // a sticky digit far down breaks the tie upward
        assert_eq!(
            parse_double("0x1.ffffffffffffe8000000000001p0").map(f64::to_bits),
            Ok(0x3FFFFFFFFFFFFFFF)
        );
    }

    #[test]
    fn test_hex_range_edges() {
        assert_eq!(parse_double("0x1p1024"), Ok(f64::INFINITY));
        assert_eq!(parse_double("0x1.fffffffffffffp1023"), Ok(f64::MAX));
        assert_eq!(parse_double("0x1p-1074").map(f64::to_bits), Ok(1));
        // exactly half the smallest subnormal ties to even zero
        assert_eq!(parse_double("0x1p-1075"), Ok(0.0));
        assert_eq!(parse_double("0x1.1p-1075").map(f64::to_bits), Ok(1));
        assert_eq!(parse_double("0x1p-99999999999"), Ok(0.0));
    }

    #[test]
    fn test_hex_single_rounds_once() {
        // 1 + 2^-24: a tie at single precision, down to even
        assert_eq!(parse_single("0x1.000001p0"), Ok(1.0));
        // 1 + 3*2^-24: tie between the first two ulps, up to even
        assert_eq!(
            parse_single("0x1.000003p0").map(f32::to_bits),
            Ok(0x3F800002)
        );
        assert_eq!(parse_single("0x1p128"), Ok(f32::INFINITY));
        assert_eq!(parse_single("0x1p-149").map(f32::to_bits), Ok(1));
        assert_eq!(parse_single("0x1p-150"), Ok(0.0));
    }

    #[test]
    fn test_double_round_trip() {
        for _ in 0..20000 {
            let v = f64::from_bits(random::<u64>());
            if !v.is_finite() {
                continue;
            }
            let s = double_to_string(v);
            let back = parse_double(&s).unwrap();
            assert_eq!(back.to_bits(), v.to_bits(), "value {} via {:?}", v, s);
            // the shortest form is also understood by the platform parser
            assert_eq!(s.parse::<f64>().unwrap().to_bits(), v.to_bits(), "via {:?}", s);
        }
    }

    #[test]
    fn test_single_round_trip() {
        for _ in 0..20000 {
            let v = f32::from_bits(random::<u32>());
            if !v.is_finite() {
                continue;
            }
            let s = single_to_string(v);
            let back = parse_single(&s).unwrap();
            assert_eq!(back.to_bits(), v.to_bits(), "value {} via {:?}", v, s);
            assert_eq!(s.parse::<f32>().unwrap().to_bits(), v.to_bits(), "via {:?}", s);
        }
    }

    #[test]
    fn test_against_platform_parser() {
        // random digit strings across the interesting exponent range
        for _ in 0..5000 {
            let n_digits = 1 + random::<usize>() % 25;
            let mut s = String::new();
            if random::<bool>() {
                s.push('-');
            }
            for _ in 0..n_digits {
                s.push((b'0' + random::<u8>() % 10) as char);
            }
            s.push('.');
            for _ in 0..n_digits {
                s.push((b'0' + random::<u8>() % 10) as char);
            }
            s.push('e');
            let e = random::<i32>() % 340;
            s.push_str(&e.to_string());
            let ours = parse_double(&s).unwrap();
            let std = s.parse::<f64>().unwrap();
            assert_eq!(ours.to_bits(), std.to_bits(), "input {:?}", s);
            let ours = parse_single(&s).unwrap();
            let std = s.parse::<f32>().unwrap();
            assert_eq!(ours.to_bits(), std.to_bits(), "input {:?}", s);
        }
    }
}
