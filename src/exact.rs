//! Exact arbitrary-precision unsigned integers for the conversion engine.
//!
//! `ExactInt` implements only the operations the binary-decimal conversion
//! paths need: construction from a decimal digit run, values of the form
//! 5^p·2^q (cached), shifts, multiplication by 10 and by 5^p·2^q,
//! magnitude comparison, two-sided in-place subtraction, and the
//! quotient-digit/remainder×10 step of the slow digit-generation loop.
//!
//! Values are non-negative, stored as little-endian words above `offset`
//! implicit zero words. The frozen/working split of the algorithm (cached
//! powers of five and reused seed values must never be mutated) is enforced
//! by the type system: shared references only ever reach non-mutating
//! methods, and every mutating method takes `&mut self`.

use crate::defs::DoubleWord;
use crate::defs::SignedDword;
use crate::defs::Word;
use crate::defs::WORD_BITS;
use core::cmp::Ordering;
use core::fmt::Write;
use itertools::izip;
use lazy_static::lazy_static;

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

/// Powers of five that fit in a word.
pub const SMALL_5_POW: [Word; 14] = [
    1,
    5,
    25,
    125,
    625,
    3125,
    15625,
    78125,
    390625,
    1953125,
    9765625,
    48828125,
    244140625,
    1220703125,
];

/// Powers of five that fit in a double word.
pub const LONG_5_POW: [DoubleWord; 27] = [
    1,
    5,
    25,
    125,
    625,
    3125,
    15625,
    78125,
    390625,
    1953125,
    9765625,
    48828125,
    244140625,
    1220703125,
    6103515625,
    30517578125,
    152587890625,
    762939453125,
    3814697265625,
    19073486328125,
    95367431640625,
    476837158203125,
    2384185791015625,
    11920928955078125,
    59604644775390625,
    298023223876953125,
    1490116119384765625,
];

/// Bit length of `LONG_5_POW[i]`.
pub const N_5_BITS: [i32; 27] = [
    0, 3, 5, 7, 10, 12, 14, 17, 19, 21, 24, 26, 28, 31, 33, 35, 38, 40, 42, 45, 47, 49, 52, 54,
    56, 59, 61,
];

/// Largest power of five kept in the precomputed cache.
const MAX_FIVE_POW: usize = 340;

lazy_static! {
    // Built once before any concurrent use, read-only afterwards.
    static ref POW_5_CACHE: Vec<ExactInt> = {
        let mut cache = Vec::with_capacity(MAX_FIVE_POW);
        for &p in SMALL_5_POW.iter() {
            cache.push(ExactInt::from_words(vec![p], 0));
        }
        for i in SMALL_5_POW.len()..MAX_FIVE_POW {
            let next = cache[i - 1].mul_small(5);
            cache.push(next);
        }
        cache
    };
}

// Runs `f` on 5^p5 without cloning when the power is cached.
fn with_pow5<R>(p5: usize, f: impl FnOnce(&ExactInt) -> R) -> R {
    if p5 < MAX_FIVE_POW {
        f(&POW_5_CACHE[p5])
    } else {
        f(&big5pow_rec(p5))
    }
}

// 5^p as an owned value; powers beyond the cache by recursive squaring.
fn big5pow(p: usize) -> ExactInt {
    if p < MAX_FIVE_POW {
        POW_5_CACHE[p].clone()
    } else {
        big5pow_rec(p)
    }
}

fn big5pow_rec(p: usize) -> ExactInt {
    if p < MAX_FIVE_POW {
        return POW_5_CACHE[p].clone();
    }
    let q = p / 2;
    let r = p - q;
    let big_q = big5pow_rec(q);
    if r < SMALL_5_POW.len() {
        big_q.mul_small(SMALL_5_POW[r])
    } else {
        big_q.mul(&big5pow_rec(r))
    }
}

/// Arbitrary-precision non-negative integer.
#[derive(Debug, Clone)]
pub struct ExactInt {
    // little-endian; data[nwords - 1] != 0 unless the value is zero
    data: Vec<Word>,
    // count of implicit zero words below data[0]; 0 when the value is zero
    offset: usize,
    // significant words; data may carry slack above this
    nwords: usize,
}

impl ExactInt {
    /// The value 0.
    pub fn zero() -> Self {
        ExactInt { data: Vec::new(), offset: 0, nwords: 0 }
    }

    /// Builds a value from explicit words shifted up by `offset` words.
    pub fn from_words(data: Vec<Word>, offset: usize) -> Self {
        let nwords = data.len();
        let mut v = ExactInt { data, offset, nwords };
        v.trim_leading_zeros();
        v
    }

    /// Builds the exact integer of a decimal digit run. `seed` is the value
    /// of `digits[..k_digits]` already accumulated by the caller; the
    /// remaining ASCII digits are folded in up to five at a time.
    pub fn from_digits(seed: u64, digits: &[u8], k_digits: usize) -> Self {
        let n_digits = digits.len();
        let sz = ((n_digits + 8) / 9).max(2);
        let mut data = vec![0; sz];
        data[0] = seed as Word;
        data[1] = (seed >> WORD_BITS) as Word;
        let mut v = ExactInt { data, offset: 0, nwords: 2 };

        let mut i = k_digits;
        while i + 5 <= n_digits {
            let mut chunk: Word = 0;
            for &d in &digits[i..i + 5] {
                chunk = chunk * 10 + (d - b'0') as Word;
            }
            v.mul_add_small(100_000, chunk);
            i += 5;
        }
        let mut factor: Word = 1;
        let mut chunk: Word = 0;
        while i < n_digits {
            chunk = chunk * 10 + (digits[i] - b'0') as Word;
            factor *= 10;
            i += 1;
        }
        if factor != 1 {
            v.mul_add_small(factor, chunk);
        }
        v.trim_leading_zeros();
        v
    }

    /// The value 5^p5 · 2^p2.
    pub fn pow52(p5: usize, p2: usize) -> Self {
        if p5 == 0 {
            let wordcount = p2 / WORD_BITS;
            let bitcount = p2 % WORD_BITS;
            return ExactInt::from_words(vec![1 << bitcount], wordcount);
        }
        let mut v = if p5 < SMALL_5_POW.len() {
            ExactInt::from_words(vec![SMALL_5_POW[p5]], 0)
        } else {
            big5pow(p5)
        };
        v.left_shift(p2);
        v
    }

    /// The value `value` · 5^p5 · 2^p2, fused to avoid an intermediate.
    pub fn mul_pow52_u64(value: u64, p5: usize, p2: usize) -> Self {
        let v0 = value as Word;
        let v1 = (value >> WORD_BITS) as Word;
        let wordcount = p2 / WORD_BITS;
        let bitcount = p2 % WORD_BITS;
        if p5 != 0 {
            if p5 < SMALL_5_POW.len() {
                let pow5 = SMALL_5_POW[p5] as DoubleWord;
                let mut carry = v0 as DoubleWord * pow5;
                let v0 = carry as Word;
                carry >>= WORD_BITS;
                carry += v1 as DoubleWord * pow5;
                let v1 = carry as Word;
                let v2 = (carry >> WORD_BITS) as Word;
                if bitcount == 0 {
                    ExactInt::from_words(vec![v0, v1, v2], wordcount)
                } else {
                    let anti = WORD_BITS - bitcount;
                    ExactInt::from_words(
                        vec![
                            v0 << bitcount,
                            (v1 << bitcount) | (v0 >> anti),
                            (v2 << bitcount) | (v1 >> anti),
                            v2 >> anti,
                        ],
                        wordcount,
                    )
                }
            } else {
                with_pow5(p5, |pow5| {
                    let mut r = pow5.mul_u64_words(v0, v1);
                    r.left_shift(p2);
                    r
                })
            }
        } else if p2 != 0 {
            if bitcount == 0 {
                ExactInt::from_words(vec![v0, v1], wordcount)
            } else {
                let anti = WORD_BITS - bitcount;
                ExactInt::from_words(
                    vec![v0 << bitcount, (v1 << bitcount) | (v0 >> anti), v1 >> anti],
                    wordcount,
                )
            }
        } else {
            ExactInt::from_words(vec![v0, v1], 0)
        }
    }

    /// Returns true for the value 0.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nwords == 0
    }

    // Total word length including the implicit zero words.
    #[inline]
    fn size(&self) -> usize {
        self.nwords + self.offset
    }

    /// Shift that brings the top word into the range division estimation
    /// relies on. Panics on zero: no valid caller normalizes zero.
    pub fn normalization_bias(&self) -> usize {
        assert!(self.nwords != 0, "normalization bias of zero");
        let zeros = self.data[self.nwords - 1].leading_zeros() as usize;
        if zeros < 4 {
            28 + zeros
        } else {
            zeros - 4
        }
    }

    /// Shifts the value left by `shift` bits in place.
    /// Shifting by 0 or shifting zero does nothing.
    pub fn left_shift(&mut self, shift: usize) {
        if shift == 0 || self.nwords == 0 {
            return;
        }
        let wordcount = shift / WORD_BITS;
        let bitcount = shift % WORD_BITS;
        if bitcount != 0 {
            let anticount = WORD_BITS - bitcount;
            if self.data[0] << bitcount == 0 {
                // The low word contributes nothing after the shift; move
                // everything down by the anti-shift and grow the offset.
                let mut prev = self.data[0];
                for idx in 0..self.nwords - 1 {
                    let mut v = prev >> anticount;
                    prev = self.data[idx + 1];
                    v |= prev << bitcount;
                    self.data[idx] = v;
                }
                let v = prev >> anticount;
                self.data[self.nwords - 1] = v;
                if v == 0 {
                    self.nwords -= 1;
                }
                self.offset += 1;
            } else {
                let old_n = self.nwords;
                let hi = self.data[old_n - 1] >> anticount;
                if hi != 0 {
                    if old_n == self.data.len() {
                        self.data.push(hi);
                    } else {
                        self.data[old_n] = hi;
                    }
                    self.nwords += 1;
                }
                for idx in (1..old_n).rev() {
                    self.data[idx] = (self.data[idx] << bitcount) | (self.data[idx - 1] >> anticount);
                }
                self.data[0] <<= bitcount;
            }
        }
        self.offset += wordcount;
    }

    /// Copying variant of [`left_shift`](Self::left_shift), usable on
    /// shared (frozen) values.
    pub fn shifted_left(&self, shift: usize) -> Self {
        let mut r = self.clone();
        r.left_shift(shift);
        r
    }

    /// Multiplies the value by 10 in place.
    pub fn mul_by_10(&mut self) {
        if self.nwords == 0 {
            return;
        }
        let carry = self.mul10_carry();
        if carry != 0 {
            if self.nwords == self.data.len() {
                self.data.push(carry);
            } else {
                self.data[self.nwords] = carry;
            }
            self.nwords += 1;
        } else {
            self.trim_leading_zeros();
        }
    }

    /// Returns `self` · 5^p5 · 2^p2 without mutating the receiver, so that
    /// frozen seed values can be scaled safely.
    pub fn mul_pow52(&self, p5: usize, p2: usize) -> Self {
        if self.nwords == 0 {
            return ExactInt::zero();
        }
        let mut res = if p5 == 0 {
            self.clone()
        } else if p5 < SMALL_5_POW.len() {
            self.mul_small(SMALL_5_POW[p5])
        } else {
            with_pow5(p5, |pow5| self.mul(pow5))
        };
        res.left_shift(p2);
        res
    }

    /// Compares the value against 5^p5 · 2^p2 without materializing it
    /// when `p5` is zero.
    pub fn cmp_pow52(&self, p5: usize, p2: usize) -> Ordering {
        if p5 == 0 {
            let wordcount = p2 / WORD_BITS;
            let bitcount = p2 % WORD_BITS;
            let size = self.size();
            if size != wordcount + 1 {
                return size.cmp(&(wordcount + 1));
            }
            let a = self.data[self.nwords - 1];
            let b = 1 << bitcount;
            if a != b {
                return a.cmp(&b);
            }
            return check_zero_tail(&self.data[..self.nwords - 1]);
        }
        self.cmp(&ExactInt::pow52(p5, p2))
    }

    /// Compares the value against `x + y`, materializing the sum only when
    /// the cheap top-word bounds cannot decide.
    pub fn add_and_cmp(&self, x: &Self, y: &Self) -> Ordering {
        let (big, small) = if x.size() >= y.size() { (x, y) } else { (y, x) };
        let b_size = big.size();
        let s_size = small.size();
        let th_size = self.size();
        if b_size == 0 {
            return if th_size == 0 { Ordering::Equal } else { Ordering::Greater };
        }
        if s_size == 0 {
            return Ord::cmp(self, big);
        }
        if b_size > th_size {
            return Ordering::Less;
        }
        if b_size + 1 < th_size {
            return Ordering::Greater;
        }
        let mut top = big.data[big.nwords - 1] as DoubleWord;
        if s_size == b_size {
            top += small.data[small.nwords - 1] as DoubleWord;
        }
        if top >> WORD_BITS == 0 {
            if (top + 1) >> WORD_BITS == 0 {
                // no carry into a new top word is possible
                if b_size < th_size {
                    return Ordering::Greater;
                }
                let v = self.data[self.nwords - 1] as DoubleWord;
                if v < top {
                    return Ordering::Less;
                }
                if v > top + 1 {
                    return Ordering::Greater;
                }
            }
        } else {
            // the sum certainly extends into a new top word
            if b_size + 1 > th_size {
                return Ordering::Less;
            }
            let top = top >> WORD_BITS;
            let v = self.data[self.nwords - 1] as DoubleWord;
            if v < top {
                return Ordering::Less;
            }
            if v > top + 1 {
                return Ordering::Greater;
            }
        }
        Ord::cmp(self, &big.add(small))
    }

    /// `self -= subtrahend`. The result must be non-negative; a borrow out
    /// of the top word is an invariant violation.
    pub fn sub_assign_left(&mut self, subtrahend: &Self) {
        assert!(self.size() >= subtrahend.size(), "difference would be negative");
        let mut delta = subtrahend.offset as isize - self.offset as isize;
        if delta < 0 {
            // grow the minuend downwards to the subtrahend's offset
            let expand = (-delta) as usize;
            let mut r = vec![0; self.nwords + expand];
            r[expand..].copy_from_slice(&self.data[..self.nwords]);
            self.data = r;
            self.offset = subtrahend.offset;
            self.nwords += expand;
            delta = 0;
        }
        let delta = delta as usize;
        let n = self.nwords;
        let mut borrow: SignedDword = 0;
        for (m, &s) in izip!(
            self.data[delta..n].iter_mut(),
            subtrahend.data[..subtrahend.nwords].iter()
        ) {
            let diff = *m as SignedDword - s as SignedDword + borrow;
            *m = diff as Word;
            borrow = diff >> WORD_BITS;
        }
        let mut m_idx = delta + subtrahend.nwords;
        while borrow != 0 && m_idx < n {
            let diff = self.data[m_idx] as SignedDword + borrow;
            self.data[m_idx] = diff as Word;
            borrow = diff >> WORD_BITS;
            m_idx += 1;
        }
        assert!(borrow == 0, "borrow out of subtraction");
        self.trim_leading_zeros();
    }

    /// `subtrahend = self - subtrahend`: the same difference as
    /// [`sub_assign_left`](Self::sub_assign_left), but the subtrahend's
    /// storage absorbs the result. The caller picks whichever operand it is
    /// free to destroy.
    pub fn sub_into_right(&self, subtrahend: &mut Self) {
        assert!(self.size() >= subtrahend.size(), "difference would be negative");
        let new_offset = self.offset.min(subtrahend.offset);
        let new_len = self.size() - new_offset;
        let shift = subtrahend.offset - new_offset;
        if shift > 0 || subtrahend.data.len() < new_len {
            let mut r = vec![0; new_len];
            r[shift..shift + subtrahend.nwords].copy_from_slice(&subtrahend.data[..subtrahend.nwords]);
            subtrahend.data = r;
        } else {
            for w in subtrahend.data[subtrahend.nwords..new_len].iter_mut() {
                *w = 0;
            }
        }
        subtrahend.offset = new_offset;
        subtrahend.nwords = new_len;

        let mut borrow: SignedDword = 0;
        for (i, s) in subtrahend.data[..new_len].iter_mut().enumerate() {
            let pos = i + new_offset;
            let m = if pos < self.offset { 0 } else { self.data[pos - self.offset] as SignedDword };
            let diff = m - *s as SignedDword + borrow;
            *s = diff as Word;
            borrow = diff >> WORD_BITS;
        }
        assert!(borrow == 0, "borrow out of subtraction");
        subtrahend.trim_leading_zeros();
    }

    /// One step of the slow digit-generation loop: estimates the quotient
    /// digit of `self / divisor` from the top words (correcting a
    /// one-too-high estimate by re-adding the divisor), then replaces `self`
    /// with 10·(`self` mod `divisor`). Requires `divisor` to be normalized
    /// and of the same word size as `self`, which the caller's scaling
    /// guarantees.
    pub fn quo_rem_mul10(&mut self, divisor: &Self) -> u8 {
        let th_size = self.size();
        let s_size = divisor.size();
        if th_size < s_size {
            // dividend dropped an order of magnitude below the divisor
            self.mul_by_10();
            return 0;
        }
        assert!(th_size == s_size, "dividend and divisor sizes diverged");
        let mut q =
            (self.data[self.nwords - 1] / divisor.data[divisor.nwords - 1]) as SignedDword;
        let diff = self.mul_diff(q as DoubleWord, divisor);
        if diff != 0 {
            // the estimate was too high: add the divisor back until the
            // remainder turns non-negative
            assert!(divisor.offset >= self.offset, "divisor misaligned after multiply");
            let t_start = divisor.offset - self.offset;
            let mut sum: DoubleWord = 0;
            while sum == 0 {
                let mut s_idx = 0;
                for t_idx in t_start..self.nwords {
                    sum += self.data[t_idx] as DoubleWord + divisor.data[s_idx] as DoubleWord;
                    self.data[t_idx] = sum as Word;
                    sum >>= WORD_BITS;
                    s_idx += 1;
                }
                assert!(sum <= 1, "carry out of division correction");
                q -= 1;
            }
            // scale the remainder; the normalized divisor leaves headroom
            let p = self.mul10_carry();
            assert!(p == 0, "carry out of remainder scaling");
            self.trim_leading_zeros();
        } else {
            self.mul_by_10();
        }
        assert!((0..10).contains(&q), "quotient digit out of range: {}", q);
        q as u8
    }

    /// Hexadecimal rendering for diagnostics.
    pub fn to_hex_string(&self) -> String {
        if self.nwords == 0 {
            return String::from("0x0");
        }
        let mut s = String::from("0x");
        let _ = write!(s, "{:x}", self.data[self.nwords - 1]);
        for w in self.data[..self.nwords - 1].iter().rev() {
            let _ = write!(s, "{:08x}", w);
        }
        for _ in 0..self.offset {
            s.push_str("00000000");
        }
        s
    }

    fn trim_leading_zeros(&mut self) {
        let mut i = self.nwords;
        while i > 0 && self.data[i - 1] == 0 {
            i -= 1;
        }
        self.nwords = i;
        if i == 0 {
            self.offset = 0;
        }
    }

    // self = self * mul + add; the caller's size estimate covers the carry.
    fn mul_add_small(&mut self, mul: Word, add: Word) {
        let v = mul as DoubleWord;
        let mut p = v * self.data[0] as DoubleWord + add as DoubleWord;
        self.data[0] = p as Word;
        p >>= WORD_BITS;
        for i in 1..self.nwords {
            p += v * self.data[i] as DoubleWord;
            self.data[i] = p as Word;
            p >>= WORD_BITS;
        }
        if p != 0 {
            self.data[self.nwords] = p as Word;
            self.nwords += 1;
        }
    }

    fn mul10_carry(&mut self) -> Word {
        let mut carry: DoubleWord = 0;
        for d in self.data[..self.nwords].iter_mut() {
            let p = *d as DoubleWord * 10 + carry;
            *d = p as Word;
            carry = p >> WORD_BITS;
        }
        carry as Word
    }

    fn mul_small(&self, v: Word) -> Self {
        let mut r = vec![0; self.nwords + 1];
        let val = v as DoubleWord;
        let mut carry: DoubleWord = 0;
        for (rd, &sd) in izip!(r.iter_mut(), self.data[..self.nwords].iter()) {
            let p = val * sd as DoubleWord + carry;
            *rd = p as Word;
            carry = p >> WORD_BITS;
        }
        r[self.nwords] = carry as Word;
        ExactInt::from_words(r, self.offset)
    }

    // self * (v1:v0), a two-word multiplier.
    fn mul_u64_words(&self, v0: Word, v1: Word) -> Self {
        let mut r = vec![0; self.nwords + 2];
        let v = v0 as DoubleWord;
        let mut carry: DoubleWord = 0;
        for (rd, &sd) in izip!(r.iter_mut(), self.data[..self.nwords].iter()) {
            let p = v * sd as DoubleWord + carry;
            *rd = p as Word;
            carry = p >> WORD_BITS;
        }
        r[self.nwords] = carry as Word;
        if v1 != 0 {
            let v = v1 as DoubleWord;
            carry = 0;
            for j in 0..self.nwords {
                let p = r[j + 1] as DoubleWord + v * self.data[j] as DoubleWord + carry;
                r[j + 1] = p as Word;
                carry = p >> WORD_BITS;
            }
            r[self.nwords + 1] = carry as Word;
        }
        ExactInt::from_words(r, self.offset)
    }

    fn mul(&self, other: &Self) -> Self {
        if self.nwords == 0 || other.nwords == 0 {
            return ExactInt::zero();
        }
        let mut r = vec![0; self.nwords + other.nwords];
        for i in 0..self.nwords {
            let v = self.data[i] as DoubleWord;
            let mut p: DoubleWord = 0;
            for j in 0..other.nwords {
                p += r[i + j] as DoubleWord + v * other.data[j] as DoubleWord;
                r[i + j] = p as Word;
                p >>= WORD_BITS;
            }
            r[i + other.nwords] = p as Word;
        }
        ExactInt::from_words(r, self.offset + other.offset)
    }

    fn add(&self, other: &Self) -> Self {
        let (big, small) = if self.size() >= other.size() { (self, other) } else { (other, self) };
        let big_len = big.size();
        let small_len = small.size();
        let mut r = vec![0; big_len + 1];
        let mut carry: DoubleWord = 0;
        for (i, rd) in r[..big_len].iter_mut().enumerate() {
            if i >= big.offset {
                carry += big.data[i - big.offset] as DoubleWord;
            }
            if i < small_len && i >= small.offset {
                carry += small.data[i - small.offset] as DoubleWord;
            }
            *rd = carry as Word;
            carry >>= WORD_BITS;
        }
        r[big_len] = carry as Word;
        ExactInt::from_words(r, 0)
    }

    // self -= q * s, returning the final signed borrow word. Only called
    // with q small enough that q * word fits a signed double word.
    fn mul_diff(&mut self, q: DoubleWord, s: &Self) -> SignedDword {
        let mut diff: SignedDword = 0;
        if q == 0 {
            return 0;
        }
        let q = q as SignedDword;
        let delta = s.offset as isize - self.offset as isize;
        if delta >= 0 {
            let delta = delta as usize;
            for s_idx in 0..s.nwords {
                let t_idx = delta + s_idx;
                diff += self.data[t_idx] as SignedDword - q * s.data[s_idx] as SignedDword;
                self.data[t_idx] = diff as Word;
                diff >>= WORD_BITS;
            }
        } else {
            // the subtrahend reaches below this value's offset
            let delta = (-delta) as usize;
            let mut rd = vec![0; self.nwords + delta];
            let mut s_idx = 0;
            let mut r_idx = 0;
            while r_idx < delta && s_idx < s.nwords {
                diff -= q * s.data[s_idx] as SignedDword;
                rd[r_idx] = diff as Word;
                diff >>= WORD_BITS;
                s_idx += 1;
                r_idx += 1;
            }
            let mut t_idx = 0;
            while s_idx < s.nwords {
                diff += self.data[t_idx] as SignedDword - q * s.data[s_idx] as SignedDword;
                rd[r_idx] = diff as Word;
                diff >>= WORD_BITS;
                s_idx += 1;
                t_idx += 1;
                r_idx += 1;
            }
            while t_idx < self.nwords {
                diff += self.data[t_idx] as SignedDword;
                rd[r_idx] = diff as Word;
                diff >>= WORD_BITS;
                t_idx += 1;
                r_idx += 1;
            }
            self.nwords += delta;
            self.offset -= delta;
            self.data = rd;
        }
        diff
    }

    #[cfg(test)]
    fn to_u128(&self) -> u128 {
        assert!(self.size() <= 4, "value does not fit u128");
        let mut v: u128 = 0;
        for &w in self.data[..self.nwords].iter().rev() {
            v = (v << WORD_BITS) | w as u128;
        }
        v << (WORD_BITS * self.offset)
    }
}

fn check_zero_tail(a: &[Word]) -> Ordering {
    if a.iter().any(|&w| w != 0) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl Ord for ExactInt {
    /// Magnitude comparison tolerant of differing offsets and slack.
    fn cmp(&self, other: &Self) -> Ordering {
        let a_size = self.size();
        let b_size = other.size();
        if a_size != b_size {
            return a_size.cmp(&b_size);
        }
        let mut a_len = self.nwords;
        let mut b_len = other.nwords;
        while a_len > 0 && b_len > 0 {
            a_len -= 1;
            b_len -= 1;
            let a = self.data[a_len];
            let b = other.data[b_len];
            if a != b {
                return a.cmp(&b);
            }
        }
        if a_len > 0 {
            return check_zero_tail(&self.data[..a_len]);
        }
        if b_len > 0 {
            return check_zero_tail(&other.data[..b_len]).reverse();
        }
        Ordering::Equal
    }
}

impl PartialOrd for ExactInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ExactInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ExactInt {}
