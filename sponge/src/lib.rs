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

#![recursion_limit = "256"]
// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code,
    //missing_docs
)]

//! Ternary sponge constructions.
//!
//! A sponge absorbs balanced trits and squeezes fixed-size ternary digests.
//! Two constructions are provided:
//! * [`Kerl`], which maps 243-trit chunks onto Keccak-384;
//! * [`CurlP`], a pure ternary permutation running 81 or 27 rounds.
//!
//! Both are exposed through the object-safe [`Sponge`] trait, so callers may
//! pick the construction at runtime with [`SpongeKind`].

#[macro_use]
extern crate amplify_derive;
#[macro_use]
extern crate lazy_static;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub mod bigint;
mod curl;
mod kerl;

pub use curl::{CurlP, CurlRounds, STATE_TRIT_LEN};
pub use kerl::Kerl;

use std::str::FromStr;

use ternary_encoding::{Trit, HASH_TRIT_LEN};

/// Sponge errors
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum Error {
    /// sponge input or output of {0} trits is not a multiple of the
    /// 243-trit chunk size
    UnalignedLength(usize),

    /// unknown sponge `{0}`; known sponges are `kerl`, `curl-p-81` and
    /// `curl-p-27`
    UnknownKind(String),

    /// malformed trit data: {0}
    #[from]
    Encoding(ternary_encoding::Error),
}

/// Stateful ternary hash function working in absorb/squeeze mode
pub trait Sponge: Send {
    /// Returns the sponge into its initial state
    fn reset(&mut self);

    /// Feeds trits into the sponge
    fn absorb(&mut self, trits: &[Trit]) -> Result<(), Error>;

    /// Fills `out` with trits squeezed from the sponge
    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), Error>;

    /// Computes a single 243-trit digest of `trits` starting from the initial
    /// sponge state
    fn digest(&mut self, trits: &[Trit]) -> Result<Vec<Trit>, Error> {
        self.reset();
        self.absorb(trits)?;
        let mut out = vec![0; HASH_TRIT_LEN];
        self.squeeze(&mut out)?;
        Ok(out)
    }
}

/// Validates that all values are balanced trits
pub(crate) fn check_trits(trits: &[Trit]) -> Result<(), Error> {
    match trits.iter().find(|trit| !(-1..=1).contains(*trit)) {
        Some(invalid) => {
            Err(ternary_encoding::Error::InvalidTrit(*invalid).into())
        }
        None => Ok(()),
    }
}

/// Sponge construction selector
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum SpongeKind {
    #[display("kerl")]
    #[cfg_attr(feature = "serde", serde(rename = "kerl"))]
    Kerl,

    #[display("curl-p-81")]
    #[cfg_attr(feature = "serde", serde(rename = "curl-p-81"))]
    CurlP81,

    #[display("curl-p-27")]
    #[cfg_attr(feature = "serde", serde(rename = "curl-p-27"))]
    CurlP27,
}

impl Default for SpongeKind {
    #[inline]
    fn default() -> Self {
        SpongeKind::Kerl
    }
}

impl FromStr for SpongeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kerl" => Ok(SpongeKind::Kerl),
            "curl-p-81" | "curlp81" | "curl" => Ok(SpongeKind::CurlP81),
            "curl-p-27" | "curlp27" => Ok(SpongeKind::CurlP27),
            _ => Err(Error::UnknownKind(s.to_owned())),
        }
    }
}

impl SpongeKind {
    /// Constructs a fresh sponge of this kind
    pub fn boxed(self) -> Box<dyn Sponge> {
        match self {
            SpongeKind::Kerl => Box::new(Kerl::new()),
            SpongeKind::CurlP81 => Box::new(CurlP::new(CurlRounds::Rounds81)),
            SpongeKind::CurlP27 => Box::new(CurlP::new(CurlRounds::Rounds27)),
        }
    }
}
