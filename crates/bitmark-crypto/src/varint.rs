//! Unsigned variable-length integers (LEB128).
//!
//! Every opcode, length prefix and numeric record field on the wire is
//! written in this form: seven payload bits per byte, least significant
//! group first, high bit set on every byte except the last.

use bitmark_types::{BitmarkError, Result};

/// Longest encoding of a `u64` (ceil(64 / 7)).
pub const MAX_VARINT_LEN: usize = 10;

/// Appends the minimal encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Returns the minimal encoding of `value`.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    write_varint(&mut out, value);
    out
}

/// Decodes a varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Trailing bytes
/// after the terminating byte are left untouched.
///
/// # Errors
///
/// Returns [`BitmarkError::MalformedVarInt`] if the buffer ends before
/// a terminating byte, or if the value does not fit in 64 bits.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            break;
        }
        let shift = 7 * i as u32;
        let group = u64::from(byte & 0x7F);

        // The tenth byte may only carry the single remaining bit.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(BitmarkError::MalformedVarInt {
                reason: "value overflows 64 bits".into(),
            });
        }

        value |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_LEN {
        return Err(BitmarkError::MalformedVarInt {
            reason: "value overflows 64 bits".into(),
        });
    }

    Err(BitmarkError::MalformedVarInt {
        reason: format!("buffer truncated after {} bytes", bytes.len()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_are_single_byte() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(1), vec![0x01]);
        assert_eq!(encode_varint(0x7F), vec![0x7F]);
    }

    #[test]
    fn multi_byte_values() {
        assert_eq!(encode_varint(0x80), vec![0x80, 0x01]);
        assert_eq!(encode_varint(300), vec![0xAC, 0x02]);
        // Block height used by share grant fixtures.
        assert_eq!(encode_varint(989_824_143), vec![0x8F, 0x89, 0xFE, 0xD7, 0x03]);
    }

    #[test]
    fn max_value_uses_ten_bytes() -> Result<()> {
        let encoded = encode_varint(u64::MAX);
        assert_eq!(encoded.len(), MAX_VARINT_LEN);
        assert_eq!(decode_varint(&encoded)?, (u64::MAX, MAX_VARINT_LEN));
        Ok(())
    }

    #[test]
    fn decode_reports_consumed_length() -> Result<()> {
        let (value, used) = decode_varint(&[0xAC, 0x02, 0xFF, 0xFF])?;
        assert_eq!(value, 300);
        assert_eq!(used, 2);
        Ok(())
    }

    #[test]
    fn truncated_buffer_rejected() {
        assert!(matches!(
            decode_varint(&[0x80, 0x80]),
            Err(BitmarkError::MalformedVarInt { .. })
        ));
        assert!(matches!(
            decode_varint(&[]),
            Err(BitmarkError::MalformedVarInt { .. })
        ));
    }

    #[test]
    fn overflow_rejected() {
        let mut too_big = vec![0xFF; 9];
        too_big.push(0x02);
        assert!(matches!(
            decode_varint(&too_big),
            Err(BitmarkError::MalformedVarInt { .. })
        ));

        let eleven = vec![0x80; 11];
        assert!(decode_varint(&eleven).is_err());
    }
}
