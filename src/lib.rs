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

//! Construction, hashing and validation of ternary ledger bundles.
//!
//! A bundle is an ordered group of transactions linked together by a common
//! bundle hash. The hash is computed by absorbing the *essence* of every
//! transaction into a ternary sponge; hashes whose normalized form exposes
//! the maximal tryte value are rejected as forgeable, and the first
//! transaction's obsolete tag is incremented until a secure hash is found.

#[macro_use]
extern crate amplify_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub extern crate ternary_encoding;
pub extern crate ternary_sponge;

pub mod bundle;
mod config;
pub mod transaction;
pub mod validation;

pub use bundle::{
    attempt_hash, is_secure, normalized_bundle, AttemptError, Bundle,
    BundleError, ErrorKind, Essence, NormalizedBundle, Stage, WeakHash,
    ESSENCE_TRIT_LEN, ESSENCE_TRYTE_LEN,
};
pub use config::FinalizeConfig;
pub use transaction::{
    Transaction, NULL_FRAGMENT, NULL_HASH, NULL_TAG, TRANSACTION_TRYTE_LEN,
};
pub use validation::{validate_bundle, validate_bundle_with, ValidationError};
