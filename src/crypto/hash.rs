//! Blake2b-256, the chain's digest function.

use blake2::{digest::consts::U32, Blake2b, Digest};

pub type Blake2b256 = Blake2b<U32>;

fn finish(hasher: Blake2b256) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    finish(hasher)
}

/// Hash the concatenation of `parts` without building it.
pub fn blake2b256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    finish(hasher)
}
