use log::info;
use rand::{rngs::StdRng, Rng, RngCore};

use crate::{
    bits::{KEY_BITS, KEY_SIZE},
    key_path::BitKeyPath,
};

/// Enough iterations to hit every byte boundary many times over without
/// making the randomized tests slow.
pub(crate) const RANDOM_PATHS_PER_TEST: usize = 2000;

pub(crate) fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

/// Creates a `32` byte key starting with the given bytes, zero padded at the
/// end.
pub(crate) fn user_key(prefix: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0; KEY_SIZE];
    key[..prefix.len()].copy_from_slice(prefix);

    key
}

pub(crate) fn leaf(prefix: &[u8]) -> BitKeyPath {
    BitKeyPath::new_leaf(user_key(prefix))
}

pub(crate) fn branch(prefix: &[u8], bit_len: usize) -> BitKeyPath {
    BitKeyPath::new_branch(user_key(prefix), bit_len).unwrap()
}

pub(crate) fn random_key(rng: &mut StdRng) -> [u8; KEY_SIZE] {
    let mut key = [0; KEY_SIZE];
    rng.fill_bytes(&mut key);

    key
}

/// A leaf about a quarter of the time, otherwise a branch of any length.
pub(crate) fn random_path(rng: &mut StdRng) -> BitKeyPath {
    let key = random_key(rng);

    match rng.gen_ratio(1, 4) {
        true => BitKeyPath::new_leaf(key),
        false => BitKeyPath::new_branch(key, rng.gen_range(0..=KEY_BITS)).unwrap(),
    }
}

pub(crate) fn random_paths(n: usize, rng: &mut StdRng) -> Vec<BitKeyPath> {
    info!("Generating {} random key paths...", n);
    (0..n).map(|_| random_path(rng)).collect()
}
