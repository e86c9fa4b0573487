//! Floatdec converts IEEE-754 floating point numbers to the shortest decimal
//! string that reads back to the same value, and parses decimal and
//! hexadecimal floating point literals with correct rounding.
//!
//! ```
//! use floatdec::{double_to_string, parse_double};
//!
//! assert_eq!(double_to_string(0.1), "0.1");
//! assert_eq!(double_to_string(1.0e7), "1.0E7");
//! assert_eq!(parse_double("9007199254740993"), Ok(9007199254740992.0));
//! assert_eq!(parse_double("0x1.8p3"), Ok(12.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#![deny(missing_docs)]
#![deny(clippy::suspicious)]

#![allow(clippy::comparison_chain)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]


#[cfg(not(feature = "std"))]
extern crate alloc;

mod defs;
mod dtoa;
mod exact;
mod parse;

pub use crate::defs::Error;
pub use crate::dtoa::double_to_string;
pub use crate::dtoa::single_to_string;
pub use crate::dtoa::write_double;
pub use crate::dtoa::write_single;
pub use crate::parse::parse_double;
pub use crate::parse::parse_single;

#[cfg(test)]
mod tests {

    #[test]
    fn test_round_trip_surface() {
        use crate::{double_to_string, parse_double, parse_single, single_to_string};

        for v in [0.0, -0.0, 1.0, -1.5, 0.1, 1.0e300, 5e-324, f64::MAX] {
            let s = double_to_string(v);
            assert_eq!(parse_double(&s).unwrap().to_bits(), v.to_bits(), "via {:?}", s);
        }
        for v in [0.0f32, -0.0, 1.0, 0.1, 3.4028235e38, 1e-45] {
            let s = single_to_string(v);
            assert_eq!(parse_single(&s).unwrap().to_bits(), v.to_bits(), "via {:?}", s);
        }
    }

    #[test]
    fn test_error_display() {
        use crate::parse_double;

        let e = parse_double("1.2.3").unwrap_err();
        assert_eq!(
            e.to_string(),
            "invalid floating point literal: \"1.2.3\""
        );
    }
}
