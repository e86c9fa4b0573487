//! Definitions.

use core::fmt::Display;

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// A word of the big-integer engine.
///
/// The digit generation and correction loops are specified in 32-bit words
/// with 64-bit carry accumulation, so unlike a general purpose big integer
/// the word size does not track the platform.
pub type Word = u32;

/// Doubled word, used for carries and products.
pub type DoubleWord = u64;

/// Doubled word with sign, used for borrows.
pub type SignedDword = i64;

/// Size of a word in bits.
pub const WORD_BITS: usize = 32;

/// Number of bits the f64 significand occupies below the exponent field.
pub const EXP_SHIFT: i32 = 52;

/// Implicit leading bit of a normalized f64 significand.
pub const FRACT_HOB: u64 = 1u64 << EXP_SHIFT;

/// f64 exponent bias.
pub const EXP_BIAS: i32 = 1023;

/// f64 significand mask.
pub const SIGNIF_MASK: u64 = FRACT_HOB - 1;

/// f64 exponent mask (of the raw bit pattern).
pub const EXP_MASK: u64 = 0x7ff0_0000_0000_0000;

/// f64 sign mask.
pub const SIGN_MASK: u64 = 0x8000_0000_0000_0000;

/// Number of bits the f32 significand occupies below the exponent field.
pub const SINGLE_EXP_SHIFT: i32 = 23;

/// Implicit leading bit of a normalized f32 significand.
pub const SINGLE_FRACT_HOB: u32 = 1u32 << SINGLE_EXP_SHIFT;

/// f32 exponent bias.
pub const SINGLE_EXP_BIAS: i32 = 127;

/// f32 significand mask.
pub const SINGLE_SIGNIF_MASK: u32 = SINGLE_FRACT_HOB - 1;

/// f32 exponent mask (of the raw bit pattern).
pub const SINGLE_EXP_MASK: u32 = 0x7f80_0000;

/// f32 sign mask.
pub const SINGLE_SIGN_MASK: u32 = 0x8000_0000;

/// Possible errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input string is not a valid decimal or hexadecimal
    /// floating point literal. Carries the offending input.
    InvalidFormat(String),
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidFormat(s) => {
                write!(f, "invalid floating point literal: \"{}\"", s)
            }
        }
    }
}
