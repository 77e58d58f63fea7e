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

//! Fixed-width balanced ternary arithmetics

use crate::Trit;

/// Adds two trits together with the incoming carry, returning the resulting
/// digit and the outgoing carry
#[inline]
fn full_add(a: Trit, b: Trit, carry: Trit) -> (Trit, Trit) {
    let sum = a + b + carry;
    let digit = (sum + 1).rem_euclid(3) - 1;
    (digit, (sum - digit) / 3)
}

/// Sums two balanced ternary numbers.
///
/// The result has the width of the longer operand; the final carry is
/// dropped, so the addition wraps around on overflow, which is what
/// fixed-width ternary fields require. Both operands must consist of valid
/// trits.
pub fn add(a: &[Trit], b: &[Trit]) -> Vec<Trit> {
    let len = a.len().max(b.len());
    let mut carry = 0;
    (0..len)
        .map(|i| {
            let (digit, next) = full_add(
                a.get(i).copied().unwrap_or(0),
                b.get(i).copied().unwrap_or(0),
                carry,
            );
            carry = next;
            digit
        })
        .collect()
}

/// Increments a fixed-width balanced ternary number in place.
///
/// Returns `true` if the number wrapped around from its maximal to its
/// minimal value.
pub fn increment(trits: &mut [Trit]) -> bool {
    for trit in trits.iter_mut() {
        if *trit < 1 {
            *trit += 1;
            return false;
        }
        *trit = -1;
    }
    true
}
