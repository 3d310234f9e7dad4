//! Legacy 13-word recovery phrases.
//!
//! Older wallets exported short seeds with a BIP39-style checksum word:
//! the 17 seed bytes are followed by the top 7 bits of
//! `SHA-256(entropy)`, giving 143 bits and 13 English words. This
//! scheme only covers 17-byte entropy and is never cross-decoded with
//! the 12/24-word phrases in [`crate::mnemonic`].

use bitmark_types::{BitmarkError, Locale, Result};
use sha2::{Digest, Sha256};

use crate::mnemonic::{pack_words, unpack_words};

/// Entropy length accepted by the legacy scheme.
pub const LEGACY_ENTROPY_LEN: usize = 17;

/// Word count of a legacy phrase.
pub const LEGACY_WORD_COUNT: usize = 13;

/// Checksum bits appended after the entropy.
const CHECKSUM_BITS: u32 = 7;

fn checksum_bits(entropy: &[u8]) -> u8 {
    Sha256::digest(entropy)[0] >> (8 - CHECKSUM_BITS)
}

/// Renders 17 bytes of entropy as a 13-word English phrase.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidEntropy`] for any other length.
pub fn entropy_to_legacy_words(entropy: &[u8]) -> Result<Vec<&'static str>> {
    if entropy.len() != LEGACY_ENTROPY_LEN {
        return Err(BitmarkError::InvalidEntropy {
            reason: format!(
                "legacy phrases need {LEGACY_ENTROPY_LEN} bytes of entropy, got {}",
                entropy.len()
            ),
        });
    }

    let mut data = Vec::with_capacity(LEGACY_ENTROPY_LEN + 1);
    data.extend_from_slice(entropy);
    data.push(checksum_bits(entropy) << (8 - CHECKSUM_BITS));

    Ok(pack_words(&data, LEGACY_WORD_COUNT, Locale::English))
}

/// Recovers and verifies the 17 entropy bytes of a legacy phrase.
///
/// # Errors
///
/// - [`BitmarkError::InvalidWordCount`] unless exactly 13 words.
/// - [`BitmarkError::InvalidWordlist`] if a word is not English.
/// - [`BitmarkError::InvalidChecksum`] if the checksum word does not
///   match the entropy.
pub fn legacy_words_to_entropy<S: AsRef<str>>(words: &[S]) -> Result<Vec<u8>> {
    if words.len() != LEGACY_WORD_COUNT {
        return Err(BitmarkError::InvalidWordCount {
            reason: format!(
                "legacy phrases have {LEGACY_WORD_COUNT} words, got {}",
                words.len()
            ),
        });
    }

    let (entropy, found, bits) = unpack_words(words, Locale::English)?;
    debug_assert_eq!(bits, CHECKSUM_BITS);

    let expected = checksum_bits(&entropy);
    if found != u32::from(expected) {
        return Err(BitmarkError::InvalidChecksum {
            reason: format!("legacy checksum mismatch: expected {expected:#04x}, found {found:#04x}"),
        });
    }

    Ok(entropy)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entropy(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str).unwrap_or_else(|e| panic!("bad fixture hex: {e}"))
    }

    #[test]
    fn known_phrases() -> Result<()> {
        let cases = [
            (
                "3ae670cd91c5e15d0254a2abc57ba29d00",
                "depend crime cricket castle fun purse announce nephew profit cloth trim deliver august",
            ),
            (
                "5628a8c72ab31c7bbf8996be8e2f6cdf80",
                "file earn crack fever crack differ wreck crazy salon imitate swamp sample autumn",
            ),
            (
                "442f54cd072a9638be4a0344e1a6e5f010",
                "during kingdom crew atom practice brisk weird document eager artwork ride then area",
            ),
        ];
        for (hex_str, phrase) in cases {
            let words = entropy_to_legacy_words(&entropy(hex_str))?;
            assert_eq!(words.join(" "), phrase);

            let back = legacy_words_to_entropy(&words)?;
            assert_eq!(hex::encode(back), hex_str);
        }
        Ok(())
    }

    #[test]
    fn tampered_checksum_word_rejected() {
        let words: Vec<&str> =
            "depend crime cricket castle fun purse announce nephew profit cloth trim deliver autumn"
                .split_whitespace()
                .collect();
        assert!(matches!(
            legacy_words_to_entropy(&words),
            Err(BitmarkError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn twelve_words_rejected() {
        let words: Vec<&str> =
            "during kingdom crew atom practice brisk weird document eager artwork ride then"
                .split_whitespace()
                .collect();
        assert!(matches!(
            legacy_words_to_entropy(&words),
            Err(BitmarkError::InvalidWordCount { .. })
        ));
    }

    #[test]
    fn long_entropy_rejected() {
        assert!(matches!(
            entropy_to_legacy_words(&[0u8; 32]),
            Err(BitmarkError::InvalidEntropy { .. })
        ));
    }
}
