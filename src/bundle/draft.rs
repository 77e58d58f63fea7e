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

use ternary_encoding::{self as encoding, Trytes};

use super::essence::Essence;
use crate::{Transaction, NULL_HASH, NULL_TAG};

/// Bundle entry under construction.
///
/// Fields set by [`super::Bundle::add_entry`] are always present; the ones
/// filled by [`super::Bundle::add_trytes`] stay `None` until that call.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct EntryDraft {
    pub address: Trytes,
    pub value: i64,
    pub tag: Trytes,
    pub obsolete_tag: Trytes,
    pub timestamp: u64,
    pub signature_message_fragment: Option<Trytes>,
    pub trunk_transaction: Option<Trytes>,
    pub branch_transaction: Option<Trytes>,
    pub attachment_timestamp: Option<u64>,
    pub attachment_timestamp_lower_bound: Option<u64>,
    pub attachment_timestamp_upper_bound: Option<u64>,
    pub nonce: Option<Trytes>,
}

impl EntryDraft {
    /// Creates a draft; the obsolete tag starts equal to the tag
    pub fn new(
        address: Trytes,
        value: i64,
        tag: Trytes,
        timestamp: u64,
    ) -> EntryDraft {
        EntryDraft {
            address,
            value,
            obsolete_tag: tag.clone(),
            tag,
            timestamp,
            signature_message_fragment: None,
            trunk_transaction: None,
            branch_transaction: None,
            attachment_timestamp: None,
            attachment_timestamp_lower_bound: None,
            attachment_timestamp_upper_bound: None,
            nonce: None,
        }
    }

    /// Sets the signature message fragment and placeholder values for the
    /// attachment fields
    pub fn fill(&mut self, fragment: Trytes) {
        self.signature_message_fragment = Some(fragment);
        self.trunk_transaction = Some(NULL_HASH.clone());
        self.branch_transaction = Some(NULL_HASH.clone());
        self.attachment_timestamp = Some(0);
        self.attachment_timestamp_lower_bound = Some(0);
        self.attachment_timestamp_upper_bound = Some(0);
        self.nonce = Some(NULL_TAG.clone());
    }

    pub fn is_complete(&self) -> bool {
        self.signature_message_fragment.is_some()
            && self.trunk_transaction.is_some()
            && self.branch_transaction.is_some()
            && self.attachment_timestamp.is_some()
            && self.attachment_timestamp_lower_bound.is_some()
            && self.attachment_timestamp_upper_bound.is_some()
            && self.nonce.is_some()
    }

    pub fn essence(
        &self,
        current_index: usize,
        last_index: usize,
    ) -> Result<Essence, encoding::Error> {
        Essence::new(
            &self.address,
            self.value,
            &self.obsolete_tag,
            self.timestamp,
            current_index,
            last_index,
        )
    }

    /// Converts a complete draft into a transaction; returns `None` if any of
    /// the attachment fields is missing
    pub fn into_transaction(
        self,
        current_index: usize,
        last_index: usize,
        bundle: Trytes,
    ) -> Option<Transaction> {
        Some(Transaction {
            signature_message_fragment: self.signature_message_fragment?,
            address: self.address,
            value: self.value,
            obsolete_tag: self.obsolete_tag,
            timestamp: self.timestamp,
            current_index,
            last_index,
            bundle,
            trunk_transaction: self.trunk_transaction?,
            branch_transaction: self.branch_transaction?,
            tag: self.tag,
            attachment_timestamp: self.attachment_timestamp?,
            attachment_timestamp_lower_bound: self
                .attachment_timestamp_lower_bound?,
            attachment_timestamp_upper_bound: self
                .attachment_timestamp_upper_bound?,
            nonce: self.nonce?,
        })
    }
}
