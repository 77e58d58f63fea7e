// Tangle Bundle Library: ternary bundle construction & hashing
// Written in 2021 by
//     Tangle Bundle contributors
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

#![recursion_limit = "256"]
// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code,
    //missing_docs
)]

//! Balanced ternary encoding used by ternary ledgers.
//!
//! Data are represented on three levels:
//! * *trits*: balanced ternary digits with values -1, 0 and 1, always stored
//!   least significant digit first;
//! * *trytes*: groups of three trits rendered as one of 27 characters
//!   (`9` for zero, `A`..`M` for 1..13 and `N`..`Z` for -13..-1);
//! * signed integers.
//!
//! All conversions are pure and strict: a malformed character, a digit outside
//! of the balanced range or an integer not fitting the requested width
//! produce an [`Error`] instead of being clamped or wrapped.

#[macro_use]
extern crate amplify_derive;
#[macro_use]
extern crate lazy_static;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

mod add;
mod trits;
mod trytes;

pub use add::{add, increment};
pub use trits::{
    integer_from_trits, trits_from_integer, trits_from_integer_padded, Trit,
};
pub use trytes::{
    is_trytes, trits_from_trytes, trits_value, tryte_value, trytes_from_trits,
    Trytes, TRYTE_ALPHABET,
};

/// Number of trits encoded by a single tryte
pub const TRITS_PER_TRYTE: usize = 3;

/// Smallest value a single tryte may encode (`N`)
pub const MIN_TRYTE_VALUE: i8 = -13;

/// Largest value a single tryte may encode (`M`)
pub const MAX_TRYTE_VALUE: i8 = 13;

/// Length of a ternary hash (addresses, bundle hashes, transaction
/// references) in trits
pub const HASH_TRIT_LEN: usize = 243;
/// Length of a ternary hash in trytes
pub const HASH_TRYTE_LEN: usize = HASH_TRIT_LEN / TRITS_PER_TRYTE;

/// Width of a transfer value field in trits
pub const VALUE_TRIT_LEN: usize = 81;
/// Width of a transfer value field in trytes
pub const VALUE_TRYTE_LEN: usize = VALUE_TRIT_LEN / TRITS_PER_TRYTE;

/// Width of a tag (and obsolete tag and nonce) field in trits
pub const TAG_TRIT_LEN: usize = 81;
/// Width of a tag field in trytes
pub const TAG_TRYTE_LEN: usize = TAG_TRIT_LEN / TRITS_PER_TRYTE;

/// Width of small numeric fields (timestamps and bundle indexes) in trits
pub const NUMBER_TRIT_LEN: usize = 27;
/// Width of small numeric fields in trytes
pub const NUMBER_TRYTE_LEN: usize = NUMBER_TRIT_LEN / TRITS_PER_TRYTE;

/// Width of a signature message fragment in trytes
pub const FRAGMENT_TRYTE_LEN: usize = 27 * HASH_TRYTE_LEN;
/// Width of a signature message fragment in trits
pub const FRAGMENT_TRIT_LEN: usize = FRAGMENT_TRYTE_LEN * TRITS_PER_TRYTE;

/// Errors happening during ternary encoding and decoding
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum Error {
    /// character `{0}` is not a valid tryte; trytes must be either `9` or
    /// a capital latin letter `A`-`Z`
    InvalidTryte(char),

    /// value {0} is not a balanced ternary digit; trits must be equal to
    /// -1, 0 or 1
    InvalidTrit(i8),

    /// trit sequence of length {0} can't be grouped into trytes since its
    /// length is not a multiple of 3
    TritsNotAligned(usize),

    /// integer {0} does not fit into a {1}-trit field
    WidthOverflow(i64, usize),

    /// trit sequence encodes a number outside of the 64-bit signed integer
    /// range
    IntegerOverflow,

    /// tryte string must contain exactly {0} characters, while {1} were
    /// provided
    LengthMismatch(usize, usize),

    /// tryte string must not be longer than {0} characters, while {1} were
    /// provided
    TooLong(usize, usize),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn widths_are_consistent() {
        assert_eq!(HASH_TRYTE_LEN, 81);
        assert_eq!(VALUE_TRYTE_LEN, 27);
        assert_eq!(TAG_TRYTE_LEN, 27);
        assert_eq!(NUMBER_TRYTE_LEN, 9);
        assert_eq!(FRAGMENT_TRYTE_LEN, 2187);
        assert_eq!(FRAGMENT_TRIT_LEN, 6561);
        assert_eq!(TRYTE_ALPHABET.len(), 27);
    }

    #[test]
    fn error_display() {
        assert!(Error::InvalidTryte('a').to_string().starts_with(
            "character `a` is not a valid tryte"
        ));
        assert_eq!(
            Error::WidthOverflow(-42, 3).to_string(),
            "integer -42 does not fit into a 3-trit field"
        );
    }
}
