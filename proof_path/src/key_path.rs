//! Define [`BitKeyPath`], the identifier of a node in a sparse binary
//! Merkle tree keyed by `256` bit hashes.
use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
};

use bitvec::{order::Lsb0, slice::BitSlice};
use ethereum_types::H256;
use thiserror::Error;

use crate::bits::{Bit, PathBits, KEY_BITS, KEY_SIZE};

/// Stores the result of key path operations. Returns a [`KeyPathError`] upon
/// failure.
pub type KeyPathResult<T> = Result<T, KeyPathError>;

/// An error type for constructing and reading key paths.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum KeyPathError {
    /// A branch was asked to keep more bits than a key has.
    #[error("Tried to construct a key path with {0} significant bits (max: 256)")]
    InvalidBitLength(usize),

    /// The key was not exactly [`KEY_SIZE`] bytes long.
    #[error("Tried to construct a key path from a key of {0} bytes (expected: 32)")]
    InvalidKeySize(usize),

    /// A bit was read at or past the end of the path.
    #[error("Tried to read bit {index} of a key path with {len} significant bits")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// The effective length of the path.
        len: usize,
    },
}

/// The role a [`BitKeyPath`] plays in the tree.
///
/// `Branch` sorts before `Leaf`, so a branch and a leaf over the same `256`
/// bits are ordered deterministically.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PathKind {
    /// An inner node, identified by a prefix of `0..=256` bits.
    Branch,

    /// A leaf node, identified by the full `256` bit key.
    Leaf,
}

impl Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PathKind::Branch => "Branch",
            PathKind::Leaf => "Leaf",
        };

        write!(f, "{}", s)
    }
}

/// A path from the root of the tree to a node.
///
/// Leaf paths always span the full [`KEY_BITS`] bits of the key. Branch
/// paths keep a prefix of the key of any length up to [`KEY_BITS`], and are
/// canonical: bits past the prefix are cleared on construction, so two
/// branches over the same prefix are identical no matter what the caller
/// passed in after it.
/// ```rust
/// # use proof_path::key_path::BitKeyPath;
/// let a = BitKeyPath::new_branch([0b0000_0101; 32], 3).unwrap();
/// let b = BitKeyPath::new_branch([0b1111_1101; 32], 3).unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(a.key_bytes(), b.key_bytes());
/// ```
///
/// Equality, hashing and ordering only look at the kind and the significant
/// bits.
#[derive(Clone, Copy)]
pub struct BitKeyPath {
    kind: PathKind,
    bits: PathBits,
}

impl BitKeyPath {
    /// A leaf path over the whole key.
    pub fn new_leaf(key: [u8; KEY_SIZE]) -> Self {
        Self {
            kind: PathKind::Leaf,
            bits: PathBits::full(key),
        }
    }

    /// A branch path over the first `bit_len` bits of `key`.
    ///
    /// Returns an error if `bit_len` is larger than [`KEY_BITS`].
    pub fn new_branch(key: [u8; KEY_SIZE], bit_len: usize) -> KeyPathResult<Self> {
        Ok(Self {
            kind: PathKind::Branch,
            bits: PathBits::new(key, bit_len)?,
        })
    }

    /// Same as [`Self::new_leaf`], but checks that `key` is exactly
    /// [`KEY_SIZE`] bytes long.
    pub fn leaf_from_slice(key: &[u8]) -> KeyPathResult<Self> {
        Ok(Self::new_leaf(Self::key_array(key)?))
    }

    /// Same as [`Self::new_branch`], but checks that `key` is exactly
    /// [`KEY_SIZE`] bytes long.
    pub fn branch_from_slice(key: &[u8], bit_len: usize) -> KeyPathResult<Self> {
        Self::new_branch(Self::key_array(key)?, bit_len)
    }

    /// The zero length branch, ie. the root of the tree.
    pub fn root() -> Self {
        Self::from_bits(PathKind::Branch, PathBits::default())
    }

    pub(crate) const fn from_bits(kind: PathKind, bits: PathBits) -> Self {
        Self { kind, bits }
    }

    fn key_array(key: &[u8]) -> KeyPathResult<[u8; KEY_SIZE]> {
        key.try_into()
            .map_err(|_| KeyPathError::InvalidKeySize(key.len()))
    }

    /// Whether this is a leaf or a branch path.
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    /// `true` for leaf paths.
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, PathKind::Leaf)
    }

    /// The number of significant bits: [`KEY_BITS`] for a leaf, the prefix
    /// length for a branch.
    pub const fn effective_len(&self) -> usize {
        match self.kind {
            PathKind::Leaf => KEY_BITS,
            PathKind::Branch => self.bits.len(),
        }
    }

    /// Gets the bit at `idx`. The bit closest to the root is at idx `0`.
    ///
    /// Returns an error if `idx` is not below [`Self::effective_len`].
    pub fn bit_at(&self, idx: usize) -> KeyPathResult<Bit> {
        self.bits.get(idx)
    }

    /// The significant bits of the path in traversal order.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Lsb0> {
        self.bits.as_bitslice()
    }

    /// The bounded bit view backing this path.
    pub const fn bits(&self) -> &PathBits {
        &self.bits
    }

    /// The canonical key bytes. Bits past [`Self::effective_len`] are zero.
    pub fn key_bytes(&self) -> &[u8; KEY_SIZE] {
        self.bits.as_raw_bytes()
    }
}

impl From<[u8; KEY_SIZE]> for BitKeyPath {
    fn from(key: [u8; KEY_SIZE]) -> Self {
        Self::new_leaf(key)
    }
}

impl From<H256> for BitKeyPath {
    fn from(H256(key): H256) -> Self {
        Self::new_leaf(key)
    }
}

impl PartialEq for BitKeyPath {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.bits == other.bits
    }
}

impl Eq for BitKeyPath {}

impl Hash for BitKeyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.bits.hash(state);
    }
}

/// Paths are ordered bit by bit in traversal order, with a path sorting
/// before every longer path it is a prefix of. A branch and a leaf over the
/// same bits are ordered by [`PathKind`].
impl Ord for BitKeyPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bits
            .cmp(&other.bits)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for BitKeyPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Manual impl in order to print the bits nicely.
impl Debug for BitKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitKeyPath")
            .field("kind", &self.kind)
            .field("len", &self.effective_len())
            .field("bits", &format_args!("{}", self.bits))
            .finish()
    }
}

impl Display for BitKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.bits)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ethereum_types::H256;

    use super::{BitKeyPath, KeyPathError, PathKind};
    use crate::{
        bits::{KEY_BITS, KEY_SIZE},
        testing_utils::{branch, leaf, user_key},
    };

    #[test]
    fn new_leaf_keeps_the_whole_key() {
        let key = [0xa5; KEY_SIZE];
        let path = BitKeyPath::new_leaf(key);

        assert_eq!(path.kind(), PathKind::Leaf);
        assert!(path.is_leaf());
        assert_eq!(path.effective_len(), KEY_BITS);
        assert_eq!(path.key_bytes(), &key);
        assert_eq!(path.as_bitslice().len(), KEY_BITS);
    }

    #[test]
    fn new_branch_length_bounds() {
        let key = [0xff; KEY_SIZE];

        assert_eq!(BitKeyPath::new_branch(key, 0).unwrap().effective_len(), 0);
        assert_eq!(
            BitKeyPath::new_branch(key, KEY_BITS)
                .unwrap()
                .effective_len(),
            KEY_BITS
        );
        assert_eq!(
            BitKeyPath::new_branch(key, 257),
            Err(KeyPathError::InvalidBitLength(257))
        );
        assert_eq!(
            BitKeyPath::new_branch(key, usize::MAX),
            Err(KeyPathError::InvalidBitLength(usize::MAX))
        );
    }

    #[test]
    fn new_branch_canonicalizes_trailing_bits() {
        let garbage = BitKeyPath::new_branch([0xff; KEY_SIZE], 4).unwrap();
        let clean = BitKeyPath::new_branch(user_key(&[0x0f]), 4).unwrap();

        assert_eq!(garbage, clean);
        assert_eq!(garbage.key_bytes(), &user_key(&[0x0f]));
    }

    #[test]
    fn from_slice_checks_key_size() {
        assert_eq!(
            BitKeyPath::leaf_from_slice(&[0; 31]),
            Err(KeyPathError::InvalidKeySize(31))
        );
        assert_eq!(
            BitKeyPath::branch_from_slice(&[0; 33], 4),
            Err(KeyPathError::InvalidKeySize(33))
        );
        assert_eq!(
            BitKeyPath::leaf_from_slice(&[7; 32]),
            Ok(BitKeyPath::new_leaf([7; 32]))
        );
        assert_eq!(
            BitKeyPath::branch_from_slice(&[7; 32], 9),
            BitKeyPath::new_branch([7; 32], 9)
        );
    }

    #[test]
    fn bit_at_is_bounded_by_effective_len() {
        let path = branch(&[0b0110], 3);

        assert_eq!(path.bit_at(0), Ok(false));
        assert_eq!(path.bit_at(1), Ok(true));
        assert_eq!(path.bit_at(2), Ok(true));
        assert_eq!(
            path.bit_at(3),
            Err(KeyPathError::IndexOutOfRange { index: 3, len: 3 })
        );

        let path = leaf(&[]);
        assert_eq!(path.bit_at(KEY_BITS - 1), Ok(false));
        assert_eq!(
            path.bit_at(KEY_BITS),
            Err(KeyPathError::IndexOutOfRange {
                index: KEY_BITS,
                len: KEY_BITS
            })
        );

        assert!(BitKeyPath::root().bit_at(0).is_err());
    }

    #[test]
    fn equality_requires_same_kind() {
        let key = [0x3c; KEY_SIZE];
        let as_leaf = BitKeyPath::new_leaf(key);
        let as_branch = BitKeyPath::new_branch(key, KEY_BITS).unwrap();

        assert_eq!(as_leaf.as_bitslice(), as_branch.as_bitslice());
        assert_ne!(as_leaf, as_branch);
        assert!(as_branch < as_leaf);
    }

    #[test]
    fn equal_paths_hash_the_same() {
        let paths: HashSet<_> = [
            branch(&[0b0101], 2),
            branch(&[0b1101], 2),
            branch(&[0b0010], 2),
            branch(&[0b0101], 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn ordering_follows_traversal_order() {
        let mut paths = vec![
            leaf(&[0b01]),
            branch(&[0b1], 1),
            BitKeyPath::root(),
            branch(&[0b01], 2),
            branch(&[0b0], 1),
            leaf(&[0b00]),
        ];
        paths.sort();

        assert_eq!(
            paths,
            vec![
                BitKeyPath::root(),
                branch(&[0b0], 1),
                leaf(&[0b00]),
                branch(&[0b1], 1),
                branch(&[0b01], 2),
                leaf(&[0b01]),
            ]
        );
    }

    #[test]
    fn display_works() {
        assert_eq!(branch(&[0b1011], 4).to_string(), "[1101]");
        assert_eq!(BitKeyPath::root().to_string(), "[]");
        assert_eq!(leaf(&[]).to_string().len(), KEY_BITS + 2);
    }

    #[test]
    fn from_h256_is_a_leaf() {
        let path = BitKeyPath::from(H256::repeat_byte(0x11));

        assert_eq!(path, BitKeyPath::new_leaf([0x11; KEY_SIZE]));
    }
}
