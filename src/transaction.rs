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

//! Finalized bundle transactions and their fixed-width tryte records.

use std::str::FromStr;

use ternary_encoding::{
    self as encoding, Trytes, FRAGMENT_TRYTE_LEN, HASH_TRYTE_LEN,
    NUMBER_TRIT_LEN, NUMBER_TRYTE_LEN, TAG_TRYTE_LEN, VALUE_TRYTE_LEN,
};

use crate::bundle::essence::{decode_integer, decode_unsigned, encode_unsigned};
use crate::Essence;

/// Length of a serialized transaction record in trytes
pub const TRANSACTION_TRYTE_LEN: usize = FRAGMENT_TRYTE_LEN
    + HASH_TRYTE_LEN
    + VALUE_TRYTE_LEN
    + TAG_TRYTE_LEN
    + 3 * NUMBER_TRYTE_LEN
    + 3 * HASH_TRYTE_LEN
    + TAG_TRYTE_LEN
    + 3 * NUMBER_TRYTE_LEN
    + TAG_TRYTE_LEN;

lazy_static! {
    /// All-`9` hash used for unset trunk and branch references
    pub static ref NULL_HASH: Trytes = Trytes::null(HASH_TRYTE_LEN);

    /// All-`9` tag used as a placeholder nonce
    pub static ref NULL_TAG: Trytes = Trytes::null(TAG_TRYTE_LEN);

    /// All-`9` signature message fragment
    pub static ref NULL_FRAGMENT: Trytes = Trytes::null(FRAGMENT_TRYTE_LEN);
}

/// Fully populated bundle transaction.
///
/// Transactions are produced by bundle finalization or parsed from their
/// tryte records and can't be modified afterwards.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Transaction {
    pub(crate) signature_message_fragment: Trytes,
    pub(crate) address: Trytes,
    pub(crate) value: i64,
    pub(crate) obsolete_tag: Trytes,
    pub(crate) timestamp: u64,
    pub(crate) current_index: usize,
    pub(crate) last_index: usize,
    pub(crate) bundle: Trytes,
    pub(crate) trunk_transaction: Trytes,
    pub(crate) branch_transaction: Trytes,
    pub(crate) tag: Trytes,
    pub(crate) attachment_timestamp: u64,
    pub(crate) attachment_timestamp_lower_bound: u64,
    pub(crate) attachment_timestamp_upper_bound: u64,
    pub(crate) nonce: Trytes,
}

impl Transaction {
    #[inline]
    pub fn signature_message_fragment(&self) -> &Trytes {
        &self.signature_message_fragment
    }

    #[inline]
    pub fn address(&self) -> &Trytes {
        &self.address
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    #[inline]
    pub fn obsolete_tag(&self) -> &Trytes {
        &self.obsolete_tag
    }

    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Position of the transaction inside its bundle
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Index of the last transaction of the bundle
    #[inline]
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    /// Bundle hash shared by all transactions of the bundle
    #[inline]
    pub fn bundle(&self) -> &Trytes {
        &self.bundle
    }

    #[inline]
    pub fn trunk_transaction(&self) -> &Trytes {
        &self.trunk_transaction
    }

    #[inline]
    pub fn branch_transaction(&self) -> &Trytes {
        &self.branch_transaction
    }

    #[inline]
    pub fn tag(&self) -> &Trytes {
        &self.tag
    }

    #[inline]
    pub fn attachment_timestamp(&self) -> u64 {
        self.attachment_timestamp
    }

    #[inline]
    pub fn attachment_timestamp_lower_bound(&self) -> u64 {
        self.attachment_timestamp_lower_bound
    }

    #[inline]
    pub fn attachment_timestamp_upper_bound(&self) -> u64 {
        self.attachment_timestamp_upper_bound
    }

    #[inline]
    pub fn nonce(&self) -> &Trytes {
        &self.nonce
    }

    /// Part of the transaction covered by the bundle hash
    pub fn essence(&self) -> Result<Essence, encoding::Error> {
        Essence::new(
            &self.address,
            self.value,
            &self.obsolete_tag,
            self.timestamp,
            self.current_index,
            self.last_index,
        )
    }

    /// Serializes the transaction into its 2673-tryte record
    pub fn to_trytes(&self) -> Result<Trytes, encoding::Error> {
        let mut record = self
            .signature_message_fragment
            .clone()
            .expect_len(FRAGMENT_TRYTE_LEN)?;
        record.append(&self.essence()?.to_trytes());
        for hash in &[
            &self.bundle,
            &self.trunk_transaction,
            &self.branch_transaction,
        ] {
            record.append(&(*hash).clone().expect_len(HASH_TRYTE_LEN)?);
        }
        record.append(&self.tag.clone().expect_len(TAG_TRYTE_LEN)?);
        for timestamp in &[
            self.attachment_timestamp,
            self.attachment_timestamp_lower_bound,
            self.attachment_timestamp_upper_bound,
        ] {
            record.append(&encode_unsigned(*timestamp, NUMBER_TRIT_LEN)?);
        }
        record.append(&self.nonce.clone().expect_len(TAG_TRYTE_LEN)?);
        Ok(record)
    }

    /// Parses a transaction from its 2673-tryte record
    pub fn from_trytes(record: &str) -> Result<Transaction, encoding::Error> {
        let record =
            Trytes::from_str(record)?.expect_len(TRANSACTION_TRYTE_LEN)?;
        let mut fields = Fields {
            record: &record,
            pos: 0,
        };
        Ok(Transaction {
            signature_message_fragment: fields.next(FRAGMENT_TRYTE_LEN),
            address: fields.next(HASH_TRYTE_LEN),
            value: decode_integer(&fields.next(VALUE_TRYTE_LEN))?,
            obsolete_tag: fields.next(TAG_TRYTE_LEN),
            timestamp: fields.number()?,
            current_index: fields.number()?,
            last_index: fields.number()?,
            bundle: fields.next(HASH_TRYTE_LEN),
            trunk_transaction: fields.next(HASH_TRYTE_LEN),
            branch_transaction: fields.next(HASH_TRYTE_LEN),
            tag: fields.next(TAG_TRYTE_LEN),
            attachment_timestamp: fields.number()?,
            attachment_timestamp_lower_bound: fields.number()?,
            attachment_timestamp_upper_bound: fields.number()?,
            nonce: fields.next(TAG_TRYTE_LEN),
        })
    }
}

/// Sequential reader over the fields of a transaction record
struct Fields<'a> {
    record: &'a Trytes,
    pos: usize,
}

impl<'a> Fields<'a> {
    fn next(&mut self, len: usize) -> Trytes {
        let field = self.record.slice(self.pos..self.pos + len);
        self.pos += len;
        field
    }

    fn number<T>(&mut self) -> Result<T, encoding::Error>
    where
        T: std::convert::TryFrom<i64>,
    {
        decode_unsigned(&self.next(NUMBER_TRYTE_LEN))
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::bundle::essence::encode_integer;
    use ternary_encoding::VALUE_TRIT_LEN;

    pub(crate) fn sample() -> Transaction {
        Transaction {
            signature_message_fragment: Trytes::from_str("HELLO9WORLD")
                .unwrap()
                .pad_right(FRAGMENT_TRYTE_LEN)
                .unwrap(),
            address: Trytes::from_str(&"ADDRESS9".repeat(11)[..81]).unwrap(),
            value: -1_000_000,
            obsolete_tag: Trytes::from_str(&"OBSOLETE".repeat(4)[..27])
                .unwrap(),
            timestamp: 1_600_000_000,
            current_index: 2,
            last_index: 3,
            bundle: Trytes::from_str(&"BUNDLE".repeat(14)[..81]).unwrap(),
            trunk_transaction: NULL_HASH.clone(),
            branch_transaction: Trytes::from_str(&"Z".repeat(81)).unwrap(),
            tag: Trytes::from_str("TAG").unwrap().pad_right(27).unwrap(),
            attachment_timestamp: 1_600_000_123,
            attachment_timestamp_lower_bound: 0,
            attachment_timestamp_upper_bound: 3_812_798_742_493,
            nonce: NULL_TAG.clone(),
        }
    }

    #[test]
    fn record_length() {
        assert_eq!(TRANSACTION_TRYTE_LEN, 2673);
        assert_eq!(NULL_HASH.len(), 81);
        assert_eq!(NULL_TAG.len(), 27);
        assert_eq!(NULL_FRAGMENT.len(), 2187);
        assert!(NULL_FRAGMENT.is_null());
    }

    #[test]
    fn record_layout() {
        let tx = sample();
        let record = tx.to_trytes().unwrap();
        assert_eq!(record.len(), TRANSACTION_TRYTE_LEN);
        assert_eq!(record.slice(0..2187), tx.signature_message_fragment);
        assert_eq!(record.slice(2187..2268), tx.address);
        assert_eq!(
            record.slice(2268..2295),
            encode_integer(-1_000_000, VALUE_TRIT_LEN).unwrap()
        );
        assert_eq!(record.slice(2295..2322), tx.obsolete_tag);
        assert_eq!(record.slice(2349..2430), tx.bundle);
        assert_eq!(record.slice(2430..2511), tx.trunk_transaction);
        assert_eq!(record.slice(2511..2592), tx.branch_transaction);
        assert_eq!(record.slice(2592..2619), tx.tag);
        assert_eq!(record.slice(2646..2673), tx.nonce);
    }

    #[test]
    fn essence_is_embedded() {
        let tx = sample();
        let record = tx.to_trytes().unwrap();
        assert_eq!(
            record.slice(2187..2349),
            tx.essence().unwrap().to_trytes()
        );
    }

    #[test]
    fn record_round_trip() {
        let tx = sample();
        let record = tx.to_trytes().unwrap();
        assert_eq!(Transaction::from_trytes(record.as_str()), Ok(tx));
    }

    #[test]
    fn malformed_records() {
        assert_eq!(
            Transaction::from_trytes("ABC"),
            Err(encoding::Error::LengthMismatch(TRANSACTION_TRYTE_LEN, 3))
        );
        let mut record = sample().to_trytes().unwrap().into_string();
        record.replace_range(0..1, "a");
        assert_eq!(
            Transaction::from_trytes(&record),
            Err(encoding::Error::InvalidTryte('a'))
        );
        // negative current index
        let mut record = sample().to_trytes().unwrap().into_string();
        record.replace_range(2331..2332, "Z");
        assert_eq!(
            Transaction::from_trytes(&record),
            Err(encoding::Error::IntegerOverflow)
        );
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let mut tx = sample();
        tx.attachment_timestamp = 3_812_798_742_494;
        assert_eq!(
            tx.to_trytes(),
            Err(encoding::Error::WidthOverflow(3_812_798_742_494, 27))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn transaction_serde() {
        let tx = sample();
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"currentIndex\":2"));
        assert!(json.contains("\"obsoleteTag\":\"OBSOLETE"));
        assert_eq!(serde_json::from_str::<Transaction>(&json).unwrap(), tx);
    }
}
