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
use std::ops::Range;
use std::str::FromStr;

use regex::Regex;

use crate::trits::check_trit;
use crate::{Error, Trit, TRITS_PER_TRYTE};

/// Tryte characters ordered by their trit value, starting from zero and
/// wrapping to negative values after `M`
pub const TRYTE_ALPHABET: &str = "9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

lazy_static! {
    static ref TRYTES_REGEX: Regex =
        Regex::new("^[9A-Z]*$").expect("tryte regular expression is broken");
}

/// Returns the signed value of a single tryte character, in range
/// `[-13, 13]`
pub fn tryte_value(tryte: char) -> Result<i8, Error> {
    match tryte {
        '9' => Ok(0),
        'A'..='M' => Ok((tryte as u8 - b'A') as i8 + 1),
        'N'..='Z' => Ok((tryte as u8 - b'N') as i8 - 13),
        other => Err(Error::InvalidTryte(other)),
    }
}

/// Returns the signed value of a group of up to three trits, i.e. the value
/// of the tryte they form
pub fn trits_value(trits: &[Trit]) -> Result<i8, Error> {
    if trits.len() > TRITS_PER_TRYTE {
        return Err(Error::TooLong(TRITS_PER_TRYTE, trits.len()));
    }
    trits.iter().rev().try_fold(0i8, |acc, trit| {
        Ok(acc * 3 + check_trit(*trit)?)
    })
}

/// Value of a character already validated by [`Trytes`] construction
#[inline]
fn known_value(tryte: char) -> i8 {
    tryte_value(tryte).unwrap_or_default()
}

#[inline]
fn value_tryte(value: i8) -> char {
    let index = if value < 0 { value + 27 } else { value };
    TRYTE_ALPHABET.as_bytes()[index as usize] as char
}

#[inline]
fn value_trits(value: i8) -> [Trit; TRITS_PER_TRYTE] {
    let mut trits = [0; TRITS_PER_TRYTE];
    let mut rest = value;
    for trit in trits.iter_mut() {
        let digit = (rest + 1).rem_euclid(3) - 1;
        *trit = digit;
        rest = (rest - digit) / 3;
    }
    trits
}

/// Checks that the string consists only of tryte characters and, if `len` is
/// given, has exactly that many of them
pub fn is_trytes(s: &str, len: Option<usize>) -> bool {
    len.map(|len| s.len() == len).unwrap_or(true) && TRYTES_REGEX.is_match(s)
}

/// Converts trits into a tryte string; the number of trits must be a multiple
/// of three
pub fn trytes_from_trits(trits: &[Trit]) -> Result<String, Error> {
    if trits.len() % TRITS_PER_TRYTE != 0 {
        return Err(Error::TritsNotAligned(trits.len()));
    }
    trits
        .chunks(TRITS_PER_TRYTE)
        .map(|chunk| trits_value(chunk).map(value_tryte))
        .collect()
}

/// Converts a tryte string into trits, three trits per character
pub fn trits_from_trytes(trytes: &str) -> Result<Vec<Trit>, Error> {
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for tryte in trytes.chars() {
        trits.extend_from_slice(&value_trits(tryte_value(tryte)?));
    }
    Ok(trits)
}

/// String of tryte characters, guaranteed to contain only `9` and `A`-`Z`
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "String", into = "String")
)]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Trytes(String);

impl Trytes {
    /// Constructs all-`9` (zero) trytes of the given length
    pub fn null(len: usize) -> Trytes {
        Trytes("9".repeat(len))
    }

    /// Encodes trits as trytes
    pub fn from_trits(trits: &[Trit]) -> Result<Trytes, Error> {
        trytes_from_trits(trits).map(Trytes)
    }

    /// Decodes trytes into trits
    pub fn to_trits(&self) -> Vec<Trit> {
        self.0
            .chars()
            .flat_map(|tryte| value_trits(known_value(tryte)).to_vec())
            .collect()
    }

    /// Iterates over the signed values of each tryte
    pub fn values(&self) -> impl Iterator<Item = i8> + '_ {
        self.0.chars().map(known_value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether all trytes are `9`
    pub fn is_null(&self) -> bool {
        self.0.bytes().all(|tryte| tryte == b'9')
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns trytes in the given range; panics if the range is out of
    /// bounds
    pub fn slice(&self, range: Range<usize>) -> Trytes {
        Trytes(self.0[range].to_owned())
    }

    /// Pads trytes with `9` up to `width` characters. Fails if the trytes are
    /// already longer than `width`.
    pub fn pad_right(&self, width: usize) -> Result<Trytes, Error> {
        if self.len() > width {
            return Err(Error::TooLong(width, self.len()));
        }
        let mut padded = self.0.clone();
        padded.extend(std::iter::repeat('9').take(width - self.len()));
        Ok(Trytes(padded))
    }

    /// Appends other trytes to the end of these ones
    pub fn append(&mut self, other: &Trytes) {
        self.0.push_str(&other.0);
    }

    /// Ensures trytes have exactly `width` characters
    pub fn expect_len(self, width: usize) -> Result<Trytes, Error> {
        if self.len() != width {
            return Err(Error::LengthMismatch(width, self.len()));
        }
        Ok(self)
    }
}

impl Display for Trytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Trytes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(invalid) = s.chars().find(|c| tryte_value(*c).is_err()) {
            return Err(Error::InvalidTryte(invalid));
        }
        Ok(Trytes(s.to_owned()))
    }
}

impl TryFrom<String> for Trytes {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if let Some(invalid) = s.chars().find(|c| tryte_value(*c).is_err()) {
            return Err(Error::InvalidTryte(invalid));
        }
        Ok(Trytes(s))
    }
}

impl From<Trytes> for String {
    #[inline]
    fn from(trytes: Trytes) -> Self {
        trytes.0
    }
}

impl AsRef<str> for Trytes {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "RBTC9D9DCDEAUCFDCDADEAMBHAFAHKAJDHAODHADHDAD9KAHAJ\
                          DADHJDMBDKDTCCDJDADLBZCKRBMY9";

    #[test]
    fn tryte_values() {
        assert_eq!(tryte_value('9'), Ok(0));
        assert_eq!(tryte_value('A'), Ok(1));
        assert_eq!(tryte_value('M'), Ok(13));
        assert_eq!(tryte_value('N'), Ok(-13));
        assert_eq!(tryte_value('Z'), Ok(-1));
        assert_eq!(tryte_value('a'), Err(Error::InvalidTryte('a')));
        assert_eq!(tryte_value('0'), Err(Error::InvalidTryte('0')));
        for (index, tryte) in TRYTE_ALPHABET.chars().enumerate() {
            let value = tryte_value(tryte).unwrap();
            assert_eq!(value_tryte(value), tryte);
            let expected =
                if index > 13 { index as i8 - 27 } else { index as i8 };
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn trit_groups() {
        assert_eq!(trits_from_trytes("A"), Ok(vec![1, 0, 0]));
        assert_eq!(trits_from_trytes("M"), Ok(vec![1, 1, 1]));
        assert_eq!(trits_from_trytes("N"), Ok(vec![-1, -1, -1]));
        assert_eq!(trits_from_trytes("Z"), Ok(vec![-1, 0, 0]));
        assert_eq!(trits_from_trytes("9A"), Ok(vec![0, 0, 0, 1, 0, 0]));
        assert_eq!(trits_value(&[1, 1, 1]), Ok(13));
        assert_eq!(trits_value(&[-1, 1]), Ok(2));
        assert_eq!(trits_value(&[0, 2]), Err(Error::InvalidTrit(2)));
        assert_eq!(trits_value(&[0, 0, 0, 0]), Err(Error::TooLong(3, 4)));
    }

    #[test]
    fn tryte_round_trip() {
        for sample in [SAMPLE, "", "9", TRYTE_ALPHABET, "MMMNNN999"].iter() {
            let trits = trits_from_trytes(sample).unwrap();
            assert_eq!(trits.len(), sample.len() * 3);
            assert_eq!(trytes_from_trits(&trits).unwrap(), *sample);
        }
    }

    #[test]
    fn strict_conversions() {
        assert_eq!(trytes_from_trits(&[1, 0]), Err(Error::TritsNotAligned(2)));
        assert_eq!(
            trytes_from_trits(&[1, 0, 3]),
            Err(Error::InvalidTrit(3))
        );
        assert_eq!(trits_from_trytes("AB_"), Err(Error::InvalidTryte('_')));
        assert_eq!(
            Trytes::from_str("ABc"),
            Err(Error::InvalidTryte('c'))
        );
        assert_eq!(
            Trytes::try_from("A B".to_owned()),
            Err(Error::InvalidTryte(' '))
        );
    }

    #[test]
    fn validator() {
        assert!(is_trytes(SAMPLE, None));
        assert!(is_trytes("", None));
        assert!(is_trytes("ABC", Some(3)));
        assert!(!is_trytes("ABC", Some(4)));
        assert!(!is_trytes("abc", None));
        assert!(!is_trytes("AB1", Some(3)));
    }

    #[test]
    fn trytes_type() {
        let trytes = Trytes::from_str("ABC").unwrap();
        assert_eq!(trytes.to_string(), "ABC");
        assert_eq!(trytes.len(), 3);
        assert_eq!(trytes.values().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            Trytes::from_trits(&trytes.to_trits()).unwrap(),
            trytes
        );
        assert_eq!(trytes.pad_right(5).unwrap().as_str(), "ABC99");
        assert_eq!(trytes.pad_right(2), Err(Error::TooLong(2, 3)));
        assert_eq!(trytes.clone().expect_len(3), Ok(trytes.clone()));
        assert_eq!(
            trytes.clone().expect_len(81),
            Err(Error::LengthMismatch(81, 3))
        );
        assert_eq!(trytes.slice(1..3).as_str(), "BC");
        let mut joined = Trytes::default();
        joined.append(&trytes);
        joined.append(&Trytes::null(2));
        assert_eq!(joined.as_str(), "ABC99");
        assert!(Trytes::null(81).is_null());
        assert_eq!(Trytes::null(81).len(), 81);
        assert!(!trytes.is_null());
    }

    proptest! {
        #[test]
        fn any_trytes_round_trip(sample in "[9A-Z]{0,300}") {
            let trits = trits_from_trytes(&sample).unwrap();
            prop_assert_eq!(trits.len(), sample.len() * TRITS_PER_TRYTE);
            prop_assert_eq!(trytes_from_trits(&trits).unwrap(), sample.clone());
            prop_assert!(is_trytes(&sample, Some(sample.len())));
            let trytes = Trytes::from_str(&sample).unwrap();
            prop_assert_eq!(trytes.to_trits(), trits);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn trytes_serde() {
        let trytes = Trytes::from_str("HELLO9WORLD").unwrap();
        let json = serde_json::to_string(&trytes).unwrap();
        assert_eq!(json, "\"HELLO9WORLD\"");
        assert_eq!(serde_json::from_str::<Trytes>(&json).unwrap(), trytes);
        assert!(serde_json::from_str::<Trytes>("\"hello\"").is_err());
    }
}
