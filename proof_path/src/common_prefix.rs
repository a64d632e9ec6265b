//! Resolution of the longest common prefix of two key paths, ie. the
//! lowest branch node both paths pass through.

use log::trace;

use crate::key_path::{BitKeyPath, PathKind};

/// The number of leading bits `a` and `b` share.
///
/// Leaves take part with their full `256` bits, exactly like a branch of
/// that length. The scan stops at the first differing byte and only looks
/// at individual bits within that byte.
pub fn common_prefix_len(a: &BitKeyPath, b: &BitKeyPath) -> usize {
    let max_len = a.effective_len().min(b.effective_len());
    let num_bytes = max_len.div_ceil(8);

    let differing_byte = a
        .key_bytes()
        .iter()
        .zip(b.key_bytes())
        .take(num_bytes)
        .enumerate()
        .find_map(|(idx, (x, y))| {
            let diff = x ^ y;
            (diff != 0).then_some((idx, diff))
        });

    match differing_byte {
        // Bits are numbered from the low end of each byte, so the first
        // differing bit is the lowest set bit of the difference.
        Some((idx, diff)) => (idx * 8 + diff.trailing_zeros() as usize).min(max_len),
        None => max_len,
    }
}

/// The longest common prefix of `a` and `b` as a branch path.
///
/// The result is always a [`PathKind::Branch`], also for two equal leaves
/// (it then spans all `256` bits). There are no failure cases: any pair of
/// lengths is valid, and an empty input yields the empty branch.
pub fn common_prefix(a: &BitKeyPath, b: &BitKeyPath) -> BitKeyPath {
    let len = common_prefix_len(a, b);
    trace!("Common prefix of {} and {} has {} bits", a, b, len);

    BitKeyPath::from_bits(PathKind::Branch, a.bits().prefix(len))
}

impl BitKeyPath {
    /// See [`common_prefix`].
    pub fn common_prefix(&self, other: &BitKeyPath) -> BitKeyPath {
        common_prefix(self, other)
    }

    /// `true` if every significant bit of `self` is also the leading bit of
    /// `other` at the same position. A path is a prefix of itself.
    pub fn is_prefix_of(&self, other: &BitKeyPath) -> bool {
        self.effective_len() <= other.effective_len()
            && common_prefix_len(self, other) == self.effective_len()
    }
}
