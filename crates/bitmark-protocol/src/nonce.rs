//! Distinct issuance nonces.
//!
//! Issuing several bitmarks of one asset packs one record per nonce, and
//! the ledger rejects a repeated nonce for the same asset and owner. A
//! [`NonceSet`] keeps the nonces of one issuance request in insertion
//! order and refuses duplicates.
//!
//! Nonce `0` is reserved for the genesis issuance of an asset and is
//! only accepted as the first nonce of a genesis set.

use std::collections::HashSet;

use bitmark_crypto::random::EntropySource;
use bitmark_types::{BitmarkError, Result};
use rand::rngs::OsRng;

/// Draws allowed per requested nonce before generation gives up.
const DRAWS_PER_NONCE: usize = 64;

// ---------------------------------------------------------------------------
// NonceSet
// ---------------------------------------------------------------------------

/// Ordered set of distinct issuance nonces.
#[derive(Clone, Debug, Default)]
pub struct NonceSet {
    /// O(1) membership test.
    seen: HashSet<u64>,
    /// Insertion order, which is also packing order.
    order: Vec<u64>,
    genesis: bool,
}

impl NonceSet {
    /// Creates an empty set of positive nonces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set whose first nonce may be `0`.
    pub fn genesis() -> Self {
        Self {
            genesis: true,
            ..Self::default()
        }
    }

    /// Builds a set from `nonces`, in order.
    ///
    /// # Errors
    ///
    /// Same as [`NonceSet::insert`].
    pub fn from_nonces<I: IntoIterator<Item = u64>>(nonces: I, genesis: bool) -> Result<Self> {
        let mut set = if genesis { Self::genesis() } else { Self::new() };
        for nonce in nonces {
            set.insert(nonce)?;
        }
        Ok(set)
    }

    /// Appends `nonce`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidNonce`] if `nonce` was already
    /// inserted, or if it is `0` anywhere but the first slot of a
    /// genesis set.
    pub fn insert(&mut self, nonce: u64) -> Result<()> {
        if nonce == 0 && !(self.genesis && self.order.is_empty()) {
            return Err(BitmarkError::InvalidNonce {
                reason: "nonce must be positive".into(),
            });
        }
        if !self.seen.insert(nonce) {
            return Err(BitmarkError::InvalidNonce {
                reason: format!("duplicate nonce {nonce}"),
            });
        }
        self.order.push(nonce);
        Ok(())
    }

    /// Returns `true` if `nonce` is in the set.
    pub fn contains(&self, nonce: u64) -> bool {
        self.seen.contains(&nonce)
    }

    /// Nonces in insertion order.
    pub fn as_slice(&self) -> &[u64] {
        &self.order
    }

    /// Returns the number of nonces.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the set contains no nonces.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Draws `count` distinct random nonces from `source`.
///
/// Values are 63-bit so they stay positive for consumers that read them
/// as signed integers. A genesis set starts with `0` and draws the rest.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidNonce`] if `source` fails to yield
/// enough distinct positive values within `count * 64` draws.
pub fn generate_nonces_from<E: EntropySource + ?Sized>(
    source: &mut E,
    count: usize,
    genesis: bool,
) -> Result<NonceSet> {
    let mut set = if genesis { NonceSet::genesis() } else { NonceSet::new() };
    if genesis && count > 0 {
        set.insert(0)?;
    }
    let max_draws = count.saturating_mul(DRAWS_PER_NONCE);
    let mut draws = 0usize;
    while set.len() < count {
        if draws == max_draws {
            return Err(BitmarkError::InvalidNonce {
                reason: format!(
                    "entropy source gave {} of {count} distinct nonces in {draws} draws",
                    set.len()
                ),
            });
        }
        draws += 1;
        let mut buf = [0u8; 8];
        source.fill(&mut buf);
        let nonce = u64::from_be_bytes(buf) & (u64::MAX >> 1);
        if nonce == 0 || set.contains(nonce) {
            continue;
        }
        set.insert(nonce)?;
    }
    tracing::debug!(count, genesis, draws, "generated issuance nonces");
    Ok(set)
}

/// Draws `count` distinct random nonces from the operating system
/// generator.
///
/// # Errors
///
/// Same as [`generate_nonces_from`].
pub fn generate_nonces(count: usize, genesis: bool) -> Result<NonceSet> {
    generate_nonces_from(&mut OsRng, count, genesis)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
