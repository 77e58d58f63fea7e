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

use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

use ternary_encoding::{
    self as encoding, integer_from_trits, trits_from_integer_padded, Trit,
    Trytes, HASH_TRIT_LEN, HASH_TRYTE_LEN, NUMBER_TRIT_LEN, NUMBER_TRYTE_LEN,
    TAG_TRYTE_LEN, TRITS_PER_TRYTE, VALUE_TRIT_LEN, VALUE_TRYTE_LEN,
};
use ternary_sponge::Sponge;

use super::normalize::{is_secure, normalized_bundle, NormalizedBundle};

/// Length of a transaction essence in trytes
pub const ESSENCE_TRYTE_LEN: usize = HASH_TRYTE_LEN
    + VALUE_TRYTE_LEN
    + TAG_TRYTE_LEN
    + 3 * NUMBER_TRYTE_LEN;

/// Length of a transaction essence in trits
pub const ESSENCE_TRIT_LEN: usize = ESSENCE_TRYTE_LEN * TRITS_PER_TRYTE;

/// Encodes a signed integer as a fixed-width tryte field
pub(crate) fn encode_integer(
    value: i64,
    trit_len: usize,
) -> Result<Trytes, encoding::Error> {
    Trytes::from_trits(&trits_from_integer_padded(value, trit_len)?)
}

/// Encodes an unsigned integer as a fixed-width tryte field
pub(crate) fn encode_unsigned(
    value: u64,
    trit_len: usize,
) -> Result<Trytes, encoding::Error> {
    let value =
        i64::try_from(value).map_err(|_| encoding::Error::IntegerOverflow)?;
    encode_integer(value, trit_len)
}

/// Decodes a tryte field holding a signed integer
pub(crate) fn decode_integer(field: &Trytes) -> Result<i64, encoding::Error> {
    integer_from_trits(&field.to_trits())
}

/// Decodes a tryte field holding a non-negative integer
pub(crate) fn decode_unsigned<T>(field: &Trytes) -> Result<T, encoding::Error>
where
    T: TryFrom<i64>,
{
    T::try_from(decode_integer(field)?)
        .map_err(|_| encoding::Error::IntegerOverflow)
}

/// Part of a transaction covered by the bundle hash: address, value,
/// obsolete tag, timestamp, current and last index, each encoded into its
/// fixed-width tryte field.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Essence {
    address: Trytes,
    value: Trytes,
    obsolete_tag: Trytes,
    timestamp: Trytes,
    current_index: Trytes,
    last_index: Trytes,
}

impl Essence {
    /// Encodes essence fields, failing if any of them does not fit into its
    /// field width
    pub fn new(
        address: &Trytes,
        value: i64,
        obsolete_tag: &Trytes,
        timestamp: u64,
        current_index: usize,
        last_index: usize,
    ) -> Result<Essence, encoding::Error> {
        Ok(Essence {
            address: address.clone().expect_len(HASH_TRYTE_LEN)?,
            value: encode_integer(value, VALUE_TRIT_LEN)?,
            obsolete_tag: obsolete_tag.clone().expect_len(TAG_TRYTE_LEN)?,
            timestamp: encode_unsigned(timestamp, NUMBER_TRIT_LEN)?,
            current_index: encode_unsigned(
                current_index as u64,
                NUMBER_TRIT_LEN,
            )?,
            last_index: encode_unsigned(last_index as u64, NUMBER_TRIT_LEN)?,
        })
    }

    /// Parses an essence from its 162-tryte representation
    pub fn from_trytes(trytes: &Trytes) -> Result<Essence, encoding::Error> {
        let trytes = trytes.clone().expect_len(ESSENCE_TRYTE_LEN)?;
        let mut pos = 0usize;
        let mut next = |len: usize| {
            let field = trytes.slice(pos..pos + len);
            pos += len;
            field
        };
        Ok(Essence {
            address: next(HASH_TRYTE_LEN),
            value: next(VALUE_TRYTE_LEN),
            obsolete_tag: next(TAG_TRYTE_LEN),
            timestamp: next(NUMBER_TRYTE_LEN),
            current_index: next(NUMBER_TRYTE_LEN),
            last_index: next(NUMBER_TRYTE_LEN),
        })
    }

    #[inline]
    pub fn obsolete_tag(&self) -> &Trytes {
        &self.obsolete_tag
    }

    /// Replaces the obsolete tag; the new tag must be of the same width
    pub(crate) fn set_obsolete_tag(
        &mut self,
        obsolete_tag: Trytes,
    ) -> Result<(), encoding::Error> {
        self.obsolete_tag = obsolete_tag.expect_len(TAG_TRYTE_LEN)?;
        Ok(())
    }

    pub fn to_trytes(&self) -> Trytes {
        let mut essence = self.address.clone();
        essence.append(&self.value);
        essence.append(&self.obsolete_tag);
        essence.append(&self.timestamp);
        essence.append(&self.current_index);
        essence.append(&self.last_index);
        essence
    }

    pub fn to_trits(&self) -> Vec<Trit> {
        self.to_trytes().to_trits()
    }
}

/// Candidate bundle hash rejected because its normalized form contains the
/// maximal tryte value
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct WeakHash {
    /// The rejected candidate
    pub hash: Trytes,

    /// Its normalized form
    pub normalized: NormalizedBundle,
}

impl Display for WeakHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.hash, f)
    }
}

/// Failures of a single bundle hash attempt
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum AttemptError {
    /// candidate bundle hash {0} is insecure
    Weak(WeakHash),

    /// sponge failure: {0}
    #[from]
    Sponge(ternary_sponge::Error),
}

/// Computes a candidate bundle hash over the given essences.
///
/// The sponge is reset, every essence is absorbed in bundle order and a
/// single 243-trit hash is squeezed. The hash is returned only if its
/// normalized form is secure; otherwise the candidate is reported as
/// [`AttemptError::Weak`].
pub fn attempt_hash(
    essences: &[Essence],
    sponge: &mut dyn Sponge,
) -> Result<Trytes, AttemptError> {
    sponge.reset();
    for essence in essences {
        sponge.absorb(&essence.to_trits())?;
    }
    let mut trits = [0; HASH_TRIT_LEN];
    sponge.squeeze(&mut trits)?;

    let hash =
        Trytes::from_trits(&trits).map_err(ternary_sponge::Error::from)?;
    let normalized =
        normalized_bundle(&hash).map_err(ternary_sponge::Error::from)?;
    if is_secure(&normalized) {
        Ok(hash)
    } else {
        Err(AttemptError::Weak(WeakHash { hash, normalized }))
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::str::FromStr;
    use ternary_sponge::{Error, Kerl};

    /// Sponge replaying a fixed sequence of squeezed hashes and recording
    /// the number of absorbed trits
    pub(crate) struct ScriptedSponge {
        pub hashes: Vec<Trytes>,
        pub squeezed: usize,
        pub absorbed: Vec<usize>,
        pub resets: usize,
    }

    impl ScriptedSponge {
        pub fn new(hashes: &[&str]) -> ScriptedSponge {
            ScriptedSponge {
                hashes: hashes
                    .iter()
                    .map(|hash| Trytes::from_str(hash).unwrap())
                    .collect(),
                squeezed: 0,
                absorbed: vec![],
                resets: 0,
            }
        }
    }

    impl Sponge for ScriptedSponge {
        fn reset(&mut self) {
            self.resets += 1;
        }

        fn absorb(&mut self, trits: &[Trit]) -> Result<(), Error> {
            self.absorbed.push(trits.len());
            Ok(())
        }

        fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), Error> {
            let index = self.squeezed.min(self.hashes.len() - 1);
            out.copy_from_slice(&self.hashes[index].to_trits());
            self.squeezed += 1;
            Ok(())
        }
    }

    fn null_essence(index: usize, last: usize) -> Essence {
        Essence::new(
            &Trytes::null(HASH_TRYTE_LEN),
            0,
            &Trytes::null(TAG_TRYTE_LEN),
            0,
            index,
            last,
        )
        .unwrap()
    }

    #[test]
    fn essence_layout() {
        assert_eq!(ESSENCE_TRYTE_LEN, 162);
        assert_eq!(ESSENCE_TRIT_LEN, 486);

        let address = Trytes::from_str(&"A".repeat(81)).unwrap();
        let tag = Trytes::from_str(&"TAG".repeat(9)).unwrap();
        let essence = Essence::new(&address, -1, &tag, 2, 3, 4).unwrap();
        let trytes = essence.to_trytes();
        assert_eq!(trytes.len(), ESSENCE_TRYTE_LEN);
        assert_eq!(essence.to_trits().len(), ESSENCE_TRIT_LEN);
        assert_eq!(trytes.slice(0..81), address);
        assert_eq!(
            trytes.slice(81..108).as_str(),
            format!("Z{}", "9".repeat(26))
        );
        assert_eq!(trytes.slice(108..135), tag);
        assert_eq!(trytes.slice(135..144).as_str(), "B99999999");
        assert_eq!(trytes.slice(144..153).as_str(), "C99999999");
        assert_eq!(trytes.slice(153..162).as_str(), "D99999999");
        assert_eq!(Essence::from_trytes(&trytes), Ok(essence));
    }

    #[test]
    fn essence_field_widths() {
        let address = Trytes::null(HASH_TRYTE_LEN);
        let tag = Trytes::null(TAG_TRYTE_LEN);
        assert_eq!(
            Essence::new(&Trytes::null(80), 0, &tag, 0, 0, 0),
            Err(encoding::Error::LengthMismatch(81, 80))
        );
        assert_eq!(
            Essence::new(&address, 0, &Trytes::null(26), 0, 0, 0),
            Err(encoding::Error::LengthMismatch(27, 26))
        );
        let max_number = 3_812_798_742_493u64;
        assert!(Essence::new(&address, 0, &tag, max_number, 0, 0).is_ok());
        assert_eq!(
            Essence::new(&address, 0, &tag, max_number + 1, 0, 0),
            Err(encoding::Error::WidthOverflow(max_number as i64 + 1, 27))
        );
        assert_eq!(
            Essence::new(&address, 0, &tag, u64::MAX, 0, 0),
            Err(encoding::Error::IntegerOverflow)
        );
        assert!(Essence::new(&address, i64::MIN, &tag, 0, 0, 0).is_ok());
    }

    #[test]
    fn integer_fields() {
        let field = encode_integer(-42, VALUE_TRIT_LEN).unwrap();
        assert_eq!(field.len(), VALUE_TRYTE_LEN);
        assert_eq!(decode_integer(&field), Ok(-42));
        assert_eq!(
            decode_unsigned::<u64>(&field),
            Err(encoding::Error::IntegerOverflow)
        );
        let field = encode_unsigned(1_600_000_000, NUMBER_TRIT_LEN).unwrap();
        assert_eq!(decode_unsigned::<u64>(&field), Ok(1_600_000_000));
        assert_eq!(
            decode_unsigned::<u8>(&field),
            Err(encoding::Error::IntegerOverflow)
        );
    }

    #[test]
    fn attempt_absorbs_every_essence() {
        let secure = "9".repeat(81);
        let mut sponge = ScriptedSponge::new(&[secure.as_str()]);
        let essences = vec![null_essence(0, 1), null_essence(1, 1)];
        let hash = attempt_hash(&essences, &mut sponge).unwrap();
        assert_eq!(hash.as_str(), secure);
        assert_eq!(sponge.resets, 1);
        assert_eq!(sponge.absorbed, vec![ESSENCE_TRIT_LEN, ESSENCE_TRIT_LEN]);
    }

    #[test]
    fn attempt_reports_weak_hash() {
        let weak = "M".repeat(81);
        let mut sponge = ScriptedSponge::new(&[weak.as_str()]);
        match attempt_hash(&[null_essence(0, 0)], &mut sponge) {
            Err(AttemptError::Weak(WeakHash { hash, normalized })) => {
                assert_eq!(hash.as_str(), weak);
                assert!(normalized.contains(&13));
            }
            other => panic!("unexpected attempt result {:?}", other),
        }
    }

    #[test]
    fn attempt_with_kerl_is_deterministic() {
        let essences = vec![null_essence(0, 0)];
        let first = attempt_hash(&essences, &mut Kerl::new());
        let second = attempt_hash(&essences, &mut Kerl::new());
        assert_eq!(first, second);
    }
}
