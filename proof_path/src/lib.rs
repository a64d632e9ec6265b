//! Key paths for proofs over sparse binary Merkle trees keyed by `256` bit
//! hashes.
//!
//! Every node of such a tree is identified by a
//! [`BitKeyPath`][key_path::BitKeyPath]: a leaf by the full hashed key, an
//! inner branch by the prefix of bits shared by every key below it. Building
//! or checking a proof mostly comes down to finding where two paths diverge
//! ([`common_prefix`][common_prefix::common_prefix]) and moving paths between
//! peers in their canonical binary form ([`codec`]).
//!
//! Everything here works on immutable `Copy` values, so any of it can be
//! called from any number of threads at once.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod bits;
pub mod codec;
pub mod common_prefix;
pub mod key_path;

#[cfg(test)]
pub(crate) mod testing_utils;

static_assertions::assert_impl_all!(key_path::BitKeyPath: Send, Sync, Copy);
