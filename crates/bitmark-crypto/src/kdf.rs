//! Deterministic key derivation from seed core bytes.
//!
//! Two derivation paths exist, one per seed format:
//!
//! - **Short seeds** (17 bytes) are absorbed four times into SHAKE256
//!   and the output is cut into consecutive 32-byte keys.
//! - **Long seeds** (32 bytes) are used as an XSalsa20-Poly1305
//!   secretbox key; encrypting a 16-byte big-endian counter under an
//!   all-zero nonce yields `tag ‖ ciphertext`, a 32-byte key.
//!
//! Each path produces the authentication key from one slot and the
//! encryption key from another, so the two are never interchangeable.

use bitmark_types::{BitmarkError, Result};
use crypto_secretbox::aead::{AeadInPlace, KeyInit};
use crypto_secretbox::{Key, Nonce, XSalsa20Poly1305};
use zeroize::Zeroize;

use crate::hash::shake256;

/// Number of times the short seed core is absorbed into SHAKE256.
pub const SHAKE_ROUNDS: usize = 4;

/// Length of every derived key.
pub const DERIVED_KEY_LEN: usize = 32;

/// Secretbox counter for the authentication (signing) key.
pub const AUTH_KEY_COUNTER: u64 = 999;

/// Secretbox counter for the encryption key.
pub const ENC_KEY_COUNTER: u64 = 1000;

/// Derives `count` consecutive 32-byte keys from short seed bytes.
///
/// Slot 0 is the authentication key seed, slot 1 the encryption
/// private key.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidEntropy`] if `core` is empty or
/// `count` is zero.
pub fn shake_derive_keys(core: &[u8], count: usize) -> Result<Vec<[u8; DERIVED_KEY_LEN]>> {
    if core.is_empty() || count == 0 {
        return Err(BitmarkError::InvalidEntropy {
            reason: "key derivation needs non-empty core and at least one key".into(),
        });
    }

    let mut stream = shake256(core, SHAKE_ROUNDS, count * DERIVED_KEY_LEN);
    let keys = stream
        .chunks_exact(DERIVED_KEY_LEN)
        .map(|chunk| {
            let mut key = [0u8; DERIVED_KEY_LEN];
            key.copy_from_slice(chunk);
            key
        })
        .collect();
    stream.zeroize();
    Ok(keys)
}

/// Derives one 32-byte key from long seed bytes and a counter.
///
/// # Errors
///
/// Returns [`BitmarkError::CryptoError`] if the cipher rejects the
/// buffer (not expected for the fixed 16-byte message).
pub fn secretbox_derive_key(core: &[u8; 32], counter: u64) -> Result<[u8; DERIVED_KEY_LEN]> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(core));
    let nonce = Nonce::default();

    let mut message = [0u8; 16];
    message[8..].copy_from_slice(&counter.to_be_bytes());

    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut message)
        .map_err(|e| BitmarkError::CryptoError {
            reason: format!("secretbox key derivation failed: {e}"),
        })?;

    let mut key = [0u8; DERIVED_KEY_LEN];
    key[..16].copy_from_slice(&tag);
    key[16..].copy_from_slice(&message);
    message.zeroize();
    Ok(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
