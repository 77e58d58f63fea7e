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

use ternary_encoding::{
    self as encoding, Trytes, HASH_TRYTE_LEN, MAX_TRYTE_VALUE, MIN_TRYTE_VALUE,
};

/// Number of trytes in each independently normalized hash fragment
pub const NORMALIZED_FRAGMENT_LEN: usize = 27;

/// Signed tryte values of a normalized bundle hash
pub type NormalizedBundle = [i8; HASH_TRYTE_LEN];

/// Normalizes a bundle hash.
///
/// The hash is split into three fragments of 27 trytes. Within each fragment
/// tryte values are shifted towards zero, first-come first-served, until the
/// fragment sums up to zero: positive sums decrement the first value above
/// -13, negative sums increment the first value below 13.
pub fn normalized_bundle(
    hash: &Trytes,
) -> Result<NormalizedBundle, encoding::Error> {
    if hash.len() != HASH_TRYTE_LEN {
        return Err(encoding::Error::LengthMismatch(HASH_TRYTE_LEN, hash.len()));
    }

    let mut normalized = [0i8; HASH_TRYTE_LEN];
    for (slot, value) in normalized.iter_mut().zip(hash.values()) {
        *slot = value;
    }

    for fragment in normalized.chunks_mut(NORMALIZED_FRAGMENT_LEN) {
        let mut sum: i32 = fragment.iter().map(|value| *value as i32).sum();
        while sum > 0 {
            match fragment.iter_mut().find(|value| **value > MIN_TRYTE_VALUE) {
                Some(value) => *value -= 1,
                None => break,
            }
            sum -= 1;
        }
        while sum < 0 {
            match fragment.iter_mut().find(|value| **value < MAX_TRYTE_VALUE) {
                Some(value) => *value += 1,
                None => break,
            }
            sum += 1;
        }
    }

    Ok(normalized)
}

/// Checks that a normalized hash contains no maximal tryte value (`M`),
/// i.e. that it does not leak enough of the signing key to allow forgery
#[inline]
pub fn is_secure(normalized: &[i8]) -> bool {
    !normalized.contains(&MAX_TRYTE_VALUE)
}
