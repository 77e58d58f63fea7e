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

//! Conversion between 243-trit sponge chunks and 384-bit Keccak words.
//!
//! A chunk is interpreted as a balanced ternary number made of its first 242
//! trits (the last trit is always treated as zero) and encoded as a 48-byte
//! big-endian two's complement integer.

// Allow clippy warnings from the uint crate's construct_uint macro
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::assign_op_pattern)]

use ternary_encoding::{Trit, HASH_TRIT_LEN};
use uint::construct_uint;

construct_uint! {
    /// 384-bit unsigned integer holding the two's complement form of a
    /// chunk value
    pub struct U384(6);
}

/// Number of bytes in a 384-bit integer
pub const BYTE_LEN: usize = 48;

/// Number of trits carrying the integer value inside a chunk
const VALUE_TRITS: usize = HASH_TRIT_LEN - 1;

lazy_static! {
    /// (3^242 - 1) / 2: the largest value representable by 242 balanced
    /// trits, which is also the offset between balanced and unsigned ternary
    static ref HALF_3: U384 = (0..VALUE_TRITS)
        .fold(U384::zero(), |half, _| half * U384::from(3u8) + U384::one());
}

impl U384 {
    /// Checks the sign bit of the two's complement interpretation
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.bit(BYTE_LEN * 8 - 1)
    }
}

/// Encodes the first 242 trits of a chunk as a 48-byte big-endian two's
/// complement integer
pub fn trits_to_bytes(trits: &[Trit]) -> [u8; BYTE_LEN] {
    debug_assert_eq!(trits.len(), HASH_TRIT_LEN);
    // Unsigned ternary digits are shifted by one; subtracting the sum of all
    // shifts yields the balanced value in two's complement
    let unsigned = trits[..VALUE_TRITS]
        .iter()
        .rev()
        .fold(U384::zero(), |acc, trit| {
            acc * U384::from(3u8) + U384::from((*trit + 1) as u8)
        });
    let (value, _) = unsigned.overflowing_sub(*HALF_3);
    let mut bytes = [0u8; BYTE_LEN];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Decodes a 48-byte big-endian two's complement integer into a chunk of 243
/// trits; the value is reduced into the balanced 242-trit range and the last
/// trit is set to zero
pub fn bytes_to_trits(bytes: &[u8; BYTE_LEN]) -> [Trit; HASH_TRIT_LEN] {
    let value = U384::from_big_endian(bytes);
    let (mut unsigned, flip) = if value.is_negative() {
        // |x| - 1
        let magnitude = !value;
        if magnitude >= *HALF_3 {
            (magnitude - *HALF_3, true)
        } else {
            (*HALF_3 - (magnitude + U384::one()), false)
        }
    } else {
        (value + *HALF_3, false)
    };

    let three = U384::from(3u8);
    let mut trits = [0; HASH_TRIT_LEN];
    for trit in trits[..VALUE_TRITS].iter_mut() {
        let (quotient, remainder) = unsigned.div_mod(three);
        unsigned = quotient;
        let digit = remainder.low_u64() as Trit - 1;
        *trit = if flip { -digit } else { digit };
    }
    trits
}
