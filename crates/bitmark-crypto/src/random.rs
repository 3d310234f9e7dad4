//! Secure randomness seam.
//!
//! Seed and key generation draw bytes through [`EntropySource`] rather
//! than calling the OS generator directly. Any `rand` CSPRNG (including
//! [`rand::rngs::OsRng`]) is an entropy source; [`FixedEntropy`] replays
//! known bytes for deterministic tests and fixtures.

use rand::{CryptoRng, RngCore};

/// Source of cryptographically secure random bytes.
pub trait EntropySource {
    /// Fills `dest` entirely with random bytes.
    fn fill(&mut self, dest: &mut [u8]);
}

impl<R: RngCore + CryptoRng + ?Sized> EntropySource for R {
    fn fill(&mut self, dest: &mut [u8]) {
        self.fill_bytes(dest);
    }
}

/// Deterministic source that replays a fixed byte sequence.
///
/// Wraps around when the sequence is exhausted. Never use this for
/// real key material.
#[derive(Clone, Debug)]
pub struct FixedEntropy {
    bytes: Vec<u8>,
    cursor: usize,
}

impl FixedEntropy {
    /// Creates a source that yields `bytes` in order.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&mut self, dest: &mut [u8]) {
        if self.bytes.is_empty() {
            dest.fill(0);
            return;
        }
        for byte in dest.iter_mut() {
            *byte = self.bytes[self.cursor];
            self.cursor = (self.cursor + 1) % self.bytes.len();
        }
    }
}
