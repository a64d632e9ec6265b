//! The canonical binary record of a [`BitKeyPath`], as persisted by storage
//! and exchanged in proofs.
//!
//! A record is always [`RECORD_SIZE`] bytes:
//!
//! | offset | size | contents |
//! |--------|------|----------|
//! | `0` | `1` | tag, see [`RecordTag`] |
//! | `1` | `1` | bit length for [`RecordTag::Branch`], otherwise `0` |
//! | `2` | `32` | key bytes, every bit past the bit length cleared |
//!
//! A single length byte cannot hold `256`, so a branch spanning the whole key
//! gets a tag of its own instead of a length.

use std::fmt;

use log::trace;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::const_assert_eq;
use thiserror::Error;

use crate::{
    bits::{PathBits, KEY_BITS, KEY_SIZE},
    key_path::{BitKeyPath, PathKind},
};

/// Size in bytes of an encoded [`BitKeyPath`].
pub const RECORD_SIZE: usize = 2 + KEY_SIZE;

const TAG_IDX: usize = 0;
const LEN_IDX: usize = 1;
const KEY_START: usize = 2;

const_assert_eq!(RECORD_SIZE - KEY_START, KEY_SIZE);

/// An encoded key path.
pub type PathRecord = [u8; RECORD_SIZE];

/// The first byte of a record.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum RecordTag {
    /// A branch shorter than a full key. The length byte holds its bit
    /// length.
    Branch = 0x00,

    /// A leaf. The length byte is `0`.
    Leaf = 0x01,

    /// A branch over all `256` bits of the key. The length byte is `0`.
    FullBranch = 0x02,
}

impl TryFrom<u8> for RecordTag {
    type Error = MalformedRecordError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(Self::Branch),
            0x01 => Ok(Self::Leaf),
            0x02 => Ok(Self::FullBranch),
            _ => Err(MalformedRecordError::UnknownTag(byte)),
        }
    }
}

/// Errors encountered when decoding a [`BitKeyPath`] record.
///
/// Every variant means the bytes are not the canonical encoding of any path,
/// so a proof carrying them must be rejected.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum MalformedRecordError {
    /// The record is not [`RECORD_SIZE`] bytes long.
    #[error("Tried to decode a key path record of {0} bytes (expected: 34)")]
    WrongSize(usize),

    /// The tag byte is not one of [`RecordTag`].
    #[error("Tried to decode a key path record with an unknown tag: {0:#04x}")]
    UnknownTag(u8),

    /// Leaves and full branches must store a zero length byte.
    #[error("Tried to decode a {tag:?} key path record with a non-zero length byte: {len}")]
    UnexpectedLength {
        /// The decoded tag.
        tag: RecordTag,
        /// The length byte found.
        len: u8,
    },

    /// The key has a set bit at or past the stated bit length.
    #[error("Key path record has bits set past its bit length of {0}")]
    NonCanonicalPadding(usize),

    /// A textual record was not valid hex.
    #[error("Tried to decode a key path record that is not valid hex: {0}")]
    InvalidHex(String),
}

impl BitKeyPath {
    /// Encodes the path into its canonical [`RECORD_SIZE`] byte record.
    pub fn to_record(&self) -> PathRecord {
        let (tag, len) = match self.kind() {
            PathKind::Leaf => (RecordTag::Leaf, 0),
            PathKind::Branch => match self.effective_len() {
                KEY_BITS => (RecordTag::FullBranch, 0),
                // Below `KEY_BITS`, so it fits.
                len => (RecordTag::Branch, len as u8),
            },
        };

        let mut record = [0; RECORD_SIZE];
        record[TAG_IDX] = tag as u8;
        record[LEN_IDX] = len;
        record[KEY_START..].copy_from_slice(self.key_bytes());

        record
    }

    /// Decodes a record produced by [`Self::to_record`].
    ///
    /// Only the canonical encoding of a path is accepted: besides the size,
    /// tag and length checks, a record with any key bit set past its bit
    /// length is rejected rather than silently cleared.
    pub fn from_record(bytes: &[u8]) -> Result<Self, MalformedRecordError> {
        let record: &PathRecord = bytes.try_into().map_err(|_| {
            trace!("Rejecting key path record of {} bytes", bytes.len());
            MalformedRecordError::WrongSize(bytes.len())
        })?;

        let tag = RecordTag::try_from(record[TAG_IDX])?;
        let len_byte = record[LEN_IDX];

        let mut key = [0; KEY_SIZE];
        key.copy_from_slice(&record[KEY_START..]);

        let (kind, bit_len) = match (tag, len_byte) {
            (RecordTag::Branch, len) => (PathKind::Branch, len as usize),
            (RecordTag::Leaf, 0) => (PathKind::Leaf, KEY_BITS),
            (RecordTag::FullBranch, 0) => (PathKind::Branch, KEY_BITS),
            (tag, len) => return Err(MalformedRecordError::UnexpectedLength { tag, len }),
        };

        if !PathBits::is_canonical(&key, bit_len) {
            trace!(
                "Rejecting key path record with bits set past bit {}: {}",
                bit_len,
                hex::encode(record)
            );
            return Err(MalformedRecordError::NonCanonicalPadding(bit_len));
        }

        let bits = match kind {
            PathKind::Leaf => PathBits::full(key),
            PathKind::Branch => PathBits::new(key, bit_len)
                .expect("a length byte or `KEY_BITS` is always a valid bit length"),
        };

        Ok(BitKeyPath::from_bits(kind, bits))
    }

    /// The record as a lower case hex string, without a `0x` prefix.
    pub fn to_record_hex(&self) -> String {
        hex::encode(self.to_record())
    }

    /// Decodes a record from the output of [`Self::to_record_hex`].
    pub fn from_record_hex(s: &str) -> Result<Self, MalformedRecordError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| MalformedRecordError::InvalidHex(e.to_string()))?;

        Self::from_record(&bytes)
    }
}

/// Encodes `path` into its canonical record.
pub fn encode(path: &BitKeyPath) -> PathRecord {
    path.to_record()
}

/// Decodes a canonical record back into a path.
pub fn decode(bytes: &[u8]) -> Result<BitKeyPath, MalformedRecordError> {
    BitKeyPath::from_record(bytes)
}

impl Serialize for BitKeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_record_hex())
    }
}

impl<'de> Deserialize<'de> for BitKeyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(RecordHexVisitor)
    }
}

struct RecordHexVisitor;

impl<'de> de::Visitor<'de> for RecordHexVisitor {
    type Value = BitKeyPath;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a hex encoded {} byte key path record", RECORD_SIZE)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        BitKeyPath::from_record_hex(v).map_err(E::custom)
    }
}
