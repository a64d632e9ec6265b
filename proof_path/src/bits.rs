//! A fixed-width, bounds-checked view over the bits of a key path.
//!
//! Bit `i` of a path is bit `i % 8` of byte `i / 8`, counted from the least
//! significant end of the byte. This is the order in which a tree is
//! traversed from the root, so it is also the order every prefix operation
//! works in.

use std::fmt;

use bitvec::{array::BitArray, order::Lsb0, slice::BitSlice};

use crate::key_path::{KeyPathError, KeyPathResult};

/// A single bit of a key path.
pub type Bit = bool;

/// Size of a hashed key in bytes.
pub const KEY_SIZE: usize = 32;

/// Number of bits in a full key.
pub const KEY_BITS: usize = KEY_SIZE * 8;

type RawBits = BitArray<[u8; KEY_SIZE], Lsb0>;

/// Up to [`KEY_BITS`] bits backed by a fixed `32` byte buffer.
///
/// Only the first `len` bits are significant. Every bit past `len` is kept
/// at zero, and no accessor ever exposes it.
#[derive(Clone, Copy, Default)]
pub struct PathBits {
    raw: RawBits,
    len: usize,
}

impl PathBits {
    /// Takes the first `len` bits of `bytes`, clearing everything after them.
    ///
    /// Returns an error if `len` is larger than [`KEY_BITS`].
    pub fn new(bytes: [u8; KEY_SIZE], len: usize) -> KeyPathResult<Self> {
        if len > KEY_BITS {
            return Err(KeyPathError::InvalidBitLength(len));
        }

        let mut raw = RawBits::new(bytes);
        raw[len..].fill(false);

        Ok(Self { raw, len })
    }

    /// All [`KEY_BITS`] bits of `bytes`.
    pub fn full(bytes: [u8; KEY_SIZE]) -> Self {
        Self {
            raw: RawBits::new(bytes),
            len: KEY_BITS,
        }
    }

    /// The number of significant bits.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if there are no significant bits.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the bit at `idx`. The bit closest to the root is at idx `0`.
    pub fn get(&self, idx: usize) -> KeyPathResult<Bit> {
        self.as_bitslice()
            .get(idx)
            .map(|bit| *bit)
            .ok_or(KeyPathError::IndexOutOfRange {
                index: idx,
                len: self.len,
            })
    }

    /// The significant bits, and nothing past them.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Lsb0> {
        &self.raw[..self.len]
    }

    /// The backing bytes. Bits past [`Self::len`] are always zero.
    pub fn as_raw_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.raw.data
    }

    /// The first `len` bits. Asking for more bits than there are returns
    /// `self` unchanged.
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.min(self.len);
        let mut raw = self.raw;
        raw[len..].fill(false);

        Self { raw, len }
    }

    /// `true` if no bit of `bytes` at or past `len` is set.
    ///
    /// A `len` past [`KEY_BITS`] is never canonical.
    pub fn is_canonical(bytes: &[u8; KEY_SIZE], len: usize) -> bool {
        len <= KEY_BITS && RawBits::new(*bytes)[len..].not_any()
    }
}

impl PartialEq for PathBits {
    fn eq(&self, other: &Self) -> bool {
        self.as_bitslice() == other.as_bitslice()
    }
}

impl Eq for PathBits {}

impl std::hash::Hash for PathBits {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bitslice().hash(state)
    }
}

impl Ord for PathBits {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_bitslice().cmp(other.as_bitslice())
    }
}

impl PartialOrd for PathBits {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for PathBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathBits")
            .field("len", &self.len)
            .field("bits", &format_args!("{self}"))
            .finish()
    }
}

impl fmt::Display for PathBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.as_bitslice() {
            f.write_str(match *bit {
                true => "1",
                false => "0",
            })?
        }
        Ok(())
    }
}
