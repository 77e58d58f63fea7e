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

//! Bundle builder.
//!
//! Entries are appended with [`Bundle::add_entry`], backfilled with signature
//! fragments and attachment placeholders by [`Bundle::add_trytes`] and
//! turned into immutable [`Transaction`]s by [`Bundle::finalize`], which
//! searches for a bundle hash that is safe against signature forgery.

mod draft;
pub(crate) mod essence;
mod normalize;

pub use essence::{
    attempt_hash, AttemptError, Essence, WeakHash, ESSENCE_TRIT_LEN,
    ESSENCE_TRYTE_LEN,
};
pub use normalize::{
    is_secure, normalized_bundle, NormalizedBundle, NORMALIZED_FRAGMENT_LEN,
};

use std::str::FromStr;

use ternary_encoding::{
    self as encoding, add, Trytes, FRAGMENT_TRYTE_LEN, HASH_TRYTE_LEN,
    TAG_TRYTE_LEN,
};
use ternary_sponge::{Kerl, Sponge};

use self::draft::EntryDraft;
use crate::{FinalizeConfig, Transaction};

/// Kinds of bundle errors
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display(doc_comments)]
pub enum ErrorKind {
    /// malformed trytes, trits or numbers not fitting their field width
    Encoding,

    /// operation invoked in a wrong builder state or on incomplete data
    InvalidState,
}

/// Errors of bundle construction and finalization
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum BundleError {
    /// incorrect ternary encoding: {0}
    #[from]
    Encoding(encoding::Error),

    /// bundle hashing failure: {0}
    #[from]
    Sponge(ternary_sponge::Error),

    /// bundle is already finalized and can't be modified
    AlreadyFinalized,

    /// bundle contains no entries
    Empty,

    /// entry must span at least one transaction
    ZeroLength,

    /// signature fragments were already added to the bundle
    FragmentsAdded,

    /// {0} signature fragments were provided for a bundle of {1}
    /// transactions
    TooManyFragments(usize, usize),

    /// transaction {0} has no signature fragment and attachment fields; call
    /// `add_trytes` before finalizing the bundle
    IncompleteEntry(usize),

    /// no secure bundle hash was found after {0} attempts
    AttemptsExhausted(u64),

    /// finalization was interrupted after {0} attempts
    Interrupted(u64),
}

impl BundleError {
    /// Classifies the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BundleError::Encoding(_) | BundleError::Sponge(_) => {
                ErrorKind::Encoding
            }
            BundleError::AlreadyFinalized
            | BundleError::Empty
            | BundleError::ZeroLength
            | BundleError::FragmentsAdded
            | BundleError::TooManyFragments(_, _)
            | BundleError::IncompleteEntry(_)
            | BundleError::AttemptsExhausted(_)
            | BundleError::Interrupted(_) => ErrorKind::InvalidState,
        }
    }
}

/// Stage of the bundle life cycle
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "lowercase")
)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display(Debug)]
pub enum Stage {
    /// Entries may be added
    Open,

    /// Bundle hash search is running
    Finalizing,

    /// Bundle hash is found and transactions are stamped; terminal stage
    Finalized,
}

impl Default for Stage {
    #[inline]
    fn default() -> Self {
        Stage::Open
    }
}

/// Builder of a bundle of transactions
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Bundle {
    drafts: Vec<EntryDraft>,
    fragments_added: bool,
    stage: Stage,
    attempts: u64,
    hash: Option<Trytes>,
    transactions: Vec<Transaction>,
}

impl Bundle {
    #[inline]
    pub fn new() -> Bundle {
        Bundle::default()
    }

    /// Number of transactions in the bundle
    #[inline]
    pub fn len(&self) -> usize {
        match self.stage {
            Stage::Finalized => self.transactions.len(),
            _ => self.drafts.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.stage == Stage::Finalized
    }

    /// Bundle hash; available only once the bundle is finalized
    #[inline]
    pub fn hash(&self) -> Option<&Trytes> {
        self.hash.as_ref()
    }

    /// Number of bundle hashes computed by the last finalization run
    #[inline]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Finalized transactions; available only once the bundle is finalized
    pub fn transactions(&self) -> Option<&[Transaction]> {
        if self.is_finalized() {
            Some(&self.transactions)
        } else {
            None
        }
    }

    /// Consumes the bundle returning finalized transactions, or `None` if
    /// the bundle was not finalized
    pub fn into_transactions(self) -> Option<Vec<Transaction>> {
        if self.is_finalized() {
            Some(self.transactions)
        } else {
            None
        }
    }

    fn ensure_open(&self) -> Result<(), BundleError> {
        match self.stage {
            Stage::Open => Ok(()),
            _ => Err(BundleError::AlreadyFinalized),
        }
    }

    /// Appends `signature_message_length` entries for a single transfer.
    ///
    /// All entries share the address, tag and timestamp; only the first one
    /// carries the value. The tag may be shorter than 27 trytes and gets
    /// right-padded with `9`. Nothing is appended if any of the arguments is
    /// invalid.
    pub fn add_entry(
        &mut self,
        signature_message_length: usize,
        address: &str,
        value: i64,
        tag: &str,
        timestamp: u64,
    ) -> Result<(), BundleError> {
        self.ensure_open()?;
        if self.fragments_added {
            return Err(BundleError::FragmentsAdded);
        }
        if signature_message_length == 0 {
            return Err(BundleError::ZeroLength);
        }

        let address = Trytes::from_str(address)?.expect_len(HASH_TRYTE_LEN)?;
        let tag = Trytes::from_str(tag)?.pad_right(TAG_TRYTE_LEN)?;
        let first = EntryDraft::new(address, value, tag, timestamp);
        // numeric fields must fit their widths
        first.essence(0, 0)?;

        let mut rest = first.clone();
        rest.value = 0;
        self.drafts.push(first);
        self.drafts.extend(
            std::iter::repeat(rest).take(signature_message_length - 1),
        );
        Ok(())
    }

    /// Fills signature message fragments of all entries in bundle order and
    /// sets attachment fields to their placeholder values.
    ///
    /// Fragments are right-padded with `9` to 2187 trytes; entries without a
    /// matching fragment get the all-`9` fragment. May be called only once;
    /// nothing is modified if any of the fragments is invalid.
    pub fn add_trytes<S>(
        &mut self,
        signature_fragments: &[S],
    ) -> Result<(), BundleError>
    where
        S: AsRef<str>,
    {
        self.ensure_open()?;
        if self.fragments_added {
            return Err(BundleError::FragmentsAdded);
        }
        if self.drafts.is_empty() {
            return Err(BundleError::Empty);
        }
        if signature_fragments.len() > self.drafts.len() {
            return Err(BundleError::TooManyFragments(
                signature_fragments.len(),
                self.drafts.len(),
            ));
        }

        let mut fragments = signature_fragments
            .iter()
            .map(|fragment| {
                Trytes::from_str(fragment.as_ref())?
                    .pad_right(FRAGMENT_TRYTE_LEN)
            })
            .collect::<Result<Vec<_>, _>>()?;
        fragments.resize(self.drafts.len(), crate::NULL_FRAGMENT.clone());

        for (draft, fragment) in self.drafts.iter_mut().zip(fragments) {
            draft.fill(fragment);
        }
        self.fragments_added = true;
        Ok(())
    }

    /// Finalizes the bundle with Kerl, retrying until a secure bundle hash
    /// is found
    pub fn finalize(&mut self) -> Result<Trytes, BundleError> {
        self.finalize_with(&mut Kerl::new(), &FinalizeConfig::default())
    }

    /// Finalizes the bundle with the provided sponge and retry bound; the
    /// sponge kind in the configuration is ignored
    pub fn finalize_with(
        &mut self,
        sponge: &mut dyn Sponge,
        config: &FinalizeConfig,
    ) -> Result<Trytes, BundleError> {
        self.finalize_interruptible(sponge, config, |_| false)
    }

    /// Finalizes the bundle, checking `should_stop` with the number of
    /// attempts made so far before every attempt.
    ///
    /// Each weak candidate increments the obsolete tag of the first entry.
    /// If the search is stopped, either by `should_stop` or by exhausting
    /// `config.max_attempts`, the bundle stays open and keeps the last
    /// obsolete tag, so a subsequent call continues the search.
    pub fn finalize_interruptible<F>(
        &mut self,
        sponge: &mut dyn Sponge,
        config: &FinalizeConfig,
        should_stop: F,
    ) -> Result<Trytes, BundleError>
    where
        F: FnMut(u64) -> bool,
    {
        self.ensure_open()?;
        if self.drafts.is_empty() {
            return Err(BundleError::Empty);
        }
        if let Some(index) = self.drafts.iter().position(|d| !d.is_complete())
        {
            return Err(BundleError::IncompleteEntry(index));
        }

        let last_index = self.drafts.len() - 1;
        let mut essences = self
            .drafts
            .iter()
            .enumerate()
            .map(|(index, draft)| draft.essence(index, last_index))
            .collect::<Result<Vec<_>, _>>()?;

        self.stage = Stage::Finalizing;
        self.attempts = 0;
        let hash =
            match self.search_hash(&mut essences, sponge, config, should_stop) {
                Ok(hash) => hash,
                Err(err) => {
                    self.stage = Stage::Open;
                    return Err(err);
                }
            };

        let transactions = self
            .drafts
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .into_transaction(index, last_index, hash.clone())
                    .ok_or(BundleError::IncompleteEntry(index))
            })
            .collect::<Result<Vec<_>, _>>();
        let transactions = match transactions {
            Ok(transactions) => transactions,
            Err(err) => {
                self.stage = Stage::Open;
                return Err(err);
            }
        };

        debug!(
            "Bundle of {} transactions finalized after {} attempt(s): {}",
            transactions.len(),
            self.attempts,
            hash
        );
        self.drafts.clear();
        self.transactions = transactions;
        self.hash = Some(hash.clone());
        self.stage = Stage::Finalized;
        Ok(hash)
    }

    fn search_hash<F>(
        &mut self,
        essences: &mut [Essence],
        sponge: &mut dyn Sponge,
        config: &FinalizeConfig,
        mut should_stop: F,
    ) -> Result<Trytes, BundleError>
    where
        F: FnMut(u64) -> bool,
    {
        loop {
            if let Some(max_attempts) = config.max_attempts {
                if self.attempts >= max_attempts {
                    return Err(BundleError::AttemptsExhausted(self.attempts));
                }
            }
            if should_stop(self.attempts) {
                return Err(BundleError::Interrupted(self.attempts));
            }

            self.attempts += 1;
            trace!(
                "Attempt #{} with obsolete tag {}",
                self.attempts,
                essences[0].obsolete_tag()
            );
            match attempt_hash(essences, sponge) {
                Ok(hash) => {
                    trace!("Attempt #{}: secure hash {}", self.attempts, hash);
                    return Ok(hash);
                }
                Err(AttemptError::Weak(weak)) => {
                    let first = &mut self.drafts[0];
                    let obsolete_tag = Trytes::from_trits(&add(
                        &first.obsolete_tag.to_trits(),
                        &[1],
                    ))?;
                    debug!(
                        "Attempt #{}: insecure bundle hash {}; incrementing \
                         obsolete tag to {}",
                        self.attempts, weak, obsolete_tag
                    );
                    essences[0].set_obsolete_tag(obsolete_tag.clone())?;
                    first.obsolete_tag = obsolete_tag;
                }
                Err(AttemptError::Sponge(err)) => return Err(err.into()),
            }
        }
    }
}
