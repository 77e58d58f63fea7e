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

//! Conversions between signed integers and balanced ternary digits

use std::convert::TryFrom;

use crate::Error;

/// Balanced ternary digit; valid values are -1, 0 and 1
pub type Trit = i8;

#[inline]
pub(crate) fn check_trit(trit: Trit) -> Result<Trit, Error> {
    match trit {
        -1..=1 => Ok(trit),
        invalid => Err(Error::InvalidTrit(invalid)),
    }
}

/// Produces the minimal balanced ternary representation of `value`, least
/// significant trit first.
///
/// Zero is represented by an empty sequence; callers needing a fixed width
/// should use [`trits_from_integer_padded`].
pub fn trits_from_integer(value: i64) -> Vec<Trit> {
    let mut trits = Vec::new();
    // `i64::MIN` has no positive counterpart in `i64`
    let mut absolute = (value as i128).abs();
    while absolute > 0 {
        let mut remainder = (absolute % 3) as Trit;
        absolute /= 3;
        if remainder > 1 {
            remainder = -1;
            absolute += 1;
        }
        trits.push(remainder);
    }
    if value < 0 {
        trits.iter_mut().for_each(|trit| *trit = -*trit);
    }
    trits
}

/// Encodes `value` into exactly `width` trits, padding the most significant
/// side with zeros.
///
/// Fails with [`Error::WidthOverflow`] if the minimal representation of the
/// value is longer than `width`.
pub fn trits_from_integer_padded(
    value: i64,
    width: usize,
) -> Result<Vec<Trit>, Error> {
    let mut trits = trits_from_integer(value);
    if trits.len() > width {
        return Err(Error::WidthOverflow(value, width));
    }
    trits.resize(width, 0);
    Ok(trits)
}

/// Decodes a little-endian balanced ternary sequence into a signed integer.
///
/// Fails with [`Error::InvalidTrit`] on digits outside of the balanced range
/// and with [`Error::IntegerOverflow`] if the encoded number does not fit into
/// `i64`.
pub fn integer_from_trits(trits: &[Trit]) -> Result<i64, Error> {
    let value = trits.iter().rev().try_fold(0i128, |acc, trit| {
        let trit = check_trit(*trit)?;
        acc.checked_mul(3)
            .and_then(|acc| acc.checked_add(trit as i128))
            .ok_or(Error::IntegerOverflow)
    })?;
    i64::try_from(value).map_err(|_| Error::IntegerOverflow)
}
