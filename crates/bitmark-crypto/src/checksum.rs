//! Four-byte SHA3-256 checksums.
//!
//! Seeds and account numbers carry the first four bytes of
//! `SHA3-256(payload)` after the payload, so a single flipped bit in a
//! transcribed string is caught before any key material is derived.

use bitmark_types::{BitmarkError, Result};

use crate::hash::sha3_256;

/// Length of the checksum suffix in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Computes the checksum of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = sha3_256(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

/// Returns `payload ‖ checksum(payload)`.
pub fn append_checksum(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    out.extend_from_slice(payload);
    out.extend_from_slice(&checksum(payload));
    out
}

/// Splits `data` into payload and checksum and verifies the checksum.
///
/// Returns the payload slice on success.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidChecksum`] if `data` is shorter than
/// the checksum or the checksum does not match.
pub fn verify_checksum(data: &[u8]) -> Result<&[u8]> {
    if data.len() < CHECKSUM_LEN {
        return Err(BitmarkError::InvalidChecksum {
            reason: format!("need at least {CHECKSUM_LEN} bytes, got {}", data.len()),
        });
    }

    let (payload, found) = data.split_at(data.len() - CHECKSUM_LEN);
    let expected = checksum(payload);
    if found != expected {
        return Err(BitmarkError::InvalidChecksum {
            reason: format!(
                "expected {}, found {}",
                hex::encode(expected),
                hex::encode(found)
            ),
        });
    }

    Ok(payload)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_returns_payload() -> Result<()> {
        let data = append_checksum(b"bitmark");
        assert_eq!(data.len(), 7 + CHECKSUM_LEN);
        assert_eq!(verify_checksum(&data)?, b"bitmark");
        Ok(())
    }

    #[test]
    fn empty_payload_checksum_is_hash_prefix() {
        // SHA3-256("") starts with a7ffc6f8.
        assert_eq!(checksum(b""), [0xa7, 0xff, 0xc6, 0xf8]);
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let data = append_checksum(&[0x5A, 0xFE, 0x02, 0x11, 0x22]);
        for byte in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data.clone();
                corrupted[byte] ^= 1 << bit;
                assert!(
                    verify_checksum(&corrupted).is_err(),
                    "flip at byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    #[test]
    fn short_input_rejected() {
        assert!(matches!(
            verify_checksum(&[0x01, 0x02]),
            Err(BitmarkError::InvalidChecksum { .. })
        ));
    }
}
