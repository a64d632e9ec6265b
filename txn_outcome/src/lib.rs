//! Compact, deterministic records of how transactions executed.
//!
//! Each executed transaction yields a
//! [`TransactionOutcome`][outcome::TransactionOutcome]: success, an error
//! code chosen by the service, or an unexpected failure. The outcome is
//! persisted as a status code plus description ([`codec`]), a format every
//! node must agree on byte for byte since it feeds into the state hash.
//! The [`RawTransaction`][raw_transaction::RawTransaction] envelope the
//! outcomes belong to lives here too.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod codec;
pub mod outcome;
pub mod raw_transaction;

#[cfg(test)]
pub(crate) mod testing_utils;
