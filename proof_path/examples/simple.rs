//! Simple example showing off the basics of the library.

use std::error::Error;

use proof_path::{
    codec::{decode, encode},
    common_prefix::common_prefix,
    key_path::{BitKeyPath, PathKind},
};

fn main() -> Result<(), Box<dyn Error>> {
    // Leaves are built from full 32 byte hashed keys:
    let mut key_a = [0; 32];
    key_a[0] = 0b1011;
    let mut key_b = [0; 32];
    key_b[0] = 0b1111;

    let a = BitKeyPath::new_leaf(key_a);
    let b = BitKeyPath::new_leaf(key_b);

    // Bits are read from the low end of each byte, so `0b1011` starts with
    // `1, 1, 0, 1` and `0b1111` with `1, 1, 1, 1`. The lowest branch both
    // leaves hang under is therefore the two bit prefix `11`:
    let branch = common_prefix(&a, &b);
    assert_eq!(branch.kind(), PathKind::Branch);
    assert_eq!(branch.effective_len(), 2);
    assert_eq!(branch.to_string(), "[11]");
    assert!(branch.is_prefix_of(&a) && branch.is_prefix_of(&b));

    // The bit right after the shared prefix tells which side of the branch
    // each leaf is on:
    assert!(!a.bit_at(2)?);
    assert!(b.bit_at(2)?);

    // Branches can also be built directly. Whatever the key holds past the
    // requested length is dropped:
    let same_branch = BitKeyPath::new_branch([0xff; 32], 2)?;
    assert_eq!(same_branch, branch);

    // Paths travel between peers as fixed size records:
    let record = encode(&branch);
    assert_eq!(decode(&record)?, branch);

    // Records that could not have come out of `encode` are rejected:
    let mut tampered = record;
    tampered[2] |= 0b100;
    assert!(decode(&tampered).is_err());

    Ok(())
}
