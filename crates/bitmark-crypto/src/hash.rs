//! SHA3 family hashing.
//!
//! SHA3-256 backs every checksum and the Merkle combine step, SHA3-512
//! backs asset fingerprints, and SHAKE256 stretches short seeds into
//! key material.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake256};

/// Computes the SHA3-256 hash of arbitrary data.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, data);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// Computes the SHA3-512 hash of arbitrary data.
pub fn sha3_512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    Digest::update(&mut hasher, data);
    let result = hasher.finalize();
    let mut out = [0u8; 64];
    out.copy_from_slice(&result);
    out
}

/// Absorbs `data` into SHAKE256 `rounds` times and squeezes `out_len`
/// bytes.
///
/// `rounds` repeats the whole input, so `shake256(x, 2, n)` equals
/// SHAKE256(x ‖ x) truncated to `n` bytes. Output prefixes are stable:
/// the first 32 bytes of a 64-byte squeeze equal a 32-byte squeeze.
pub fn shake256(data: &[u8], rounds: usize, out_len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    for _ in 0..rounds {
        hasher.update(data);
    }
    let mut reader = hasher.finalize_xof();
    let mut out = vec![0u8; out_len];
    reader.read(&mut out);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
