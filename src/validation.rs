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

//! Structural and hash validation of finalized bundles. Signatures are not
//! verified.

use ternary_encoding::{self as encoding, Trytes};
use ternary_sponge::{Kerl, Sponge};

use crate::{attempt_hash, AttemptError, Transaction};

/// Reasons for rejecting a bundle
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum ValidationError {
    /// bundle contains no transactions
    Empty,

    /// transaction at position {0} has current index {1}
    IndexMismatch(usize, usize),

    /// transaction at position {0} has last index {1}, while the bundle
    /// consists of {2} transactions
    LastIndexMismatch(usize, usize, usize),

    /// transaction at position {0} refers to a different bundle hash
    BundleMismatch(usize),

    /// bundle values sum up to {0} instead of zero
    UnbalancedValue(i128),

    /// bundle hash does not match transaction essences, which hash to {0}
    HashMismatch(Trytes),

    /// bundle hash {0} is insecure
    InsecureHash(Trytes),

    /// incorrect ternary encoding: {0}
    #[from]
    Encoding(encoding::Error),

    /// bundle hashing failure: {0}
    #[from]
    Sponge(ternary_sponge::Error),
}

/// Checks that transactions form a consistent finalized bundle: indexes are
/// sequential, all transactions share the last index and the bundle hash,
/// values are balanced and the bundle hash is a secure Kerl hash of the
/// transaction essences
#[inline]
pub fn validate_bundle(
    transactions: &[Transaction],
) -> Result<(), ValidationError> {
    validate_bundle_with(transactions, &mut Kerl::new())
}

/// Validates a bundle finalized with the given sponge; see
/// [`validate_bundle`]
pub fn validate_bundle_with(
    transactions: &[Transaction],
    sponge: &mut dyn Sponge,
) -> Result<(), ValidationError> {
    let first = transactions.first().ok_or(ValidationError::Empty)?;
    let last_index = transactions.len() - 1;

    let mut value: i128 = 0;
    for (position, tx) in transactions.iter().enumerate() {
        if tx.current_index() != position {
            return Err(ValidationError::IndexMismatch(
                position,
                tx.current_index(),
            ));
        }
        if tx.last_index() != last_index {
            return Err(ValidationError::LastIndexMismatch(
                position,
                tx.last_index(),
                transactions.len(),
            ));
        }
        if tx.bundle() != first.bundle() {
            return Err(ValidationError::BundleMismatch(position));
        }
        value += tx.value() as i128;
    }
    if value != 0 {
        return Err(ValidationError::UnbalancedValue(value));
    }

    let essences = transactions
        .iter()
        .map(Transaction::essence)
        .collect::<Result<Vec<_>, _>>()?;
    match attempt_hash(&essences, sponge) {
        Ok(hash) if &hash == first.bundle() => Ok(()),
        Ok(hash) => Err(ValidationError::HashMismatch(hash)),
        Err(AttemptError::Weak(weak)) if &weak.hash == first.bundle() => {
            Err(ValidationError::InsecureHash(weak.hash))
        }
        Err(AttemptError::Weak(weak)) => {
            Err(ValidationError::HashMismatch(weak.hash))
        }
        Err(AttemptError::Sponge(err)) => Err(err.into()),
    }
}
