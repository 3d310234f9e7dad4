//! Word-table codec for recovery phrases.
//!
//! Packs entropy into 11-bit word indices, most significant bit first,
//! and reverses the mapping. Two entropy shapes are supported:
//!
//! | Entropy  | Bits used | Words | Content                                |
//! |----------|-----------|-------|----------------------------------------|
//! | 17 bytes | 132       | 12    | short seed core (low nibble of byte 16 dropped) |
//! | 33 bytes | 264       | 24    | network byte ‖ 32-byte long seed core  |
//!
//! The checksum of these phrases is not a separate word: the 12-word
//! form is verified by the network flag embedded in the seed core, and
//! the 24-word form by its leading network byte. Those checks belong to
//! the seed layer.
//!
//! Word tables are the standard 2048-word English and Traditional
//! Chinese lists shipped with the `bip39` crate.

use bip39::Language;
use bitmark_types::{BitmarkError, Locale, Result};

/// Entropy length rendered as 12 words.
pub const SHORT_ENTROPY_LEN: usize = 17;

/// Entropy length rendered as 24 words.
pub const LONG_ENTROPY_LEN: usize = 33;

/// Word count of a short-seed phrase.
pub const SHORT_WORD_COUNT: usize = 12;

/// Word count of a long-seed phrase.
pub const LONG_WORD_COUNT: usize = 24;

/// Bits encoded by each word.
const BITS_PER_WORD: u32 = 11;

fn language(locale: Locale) -> Language {
    match locale {
        Locale::English => Language::English,
        Locale::TraditionalChinese => Language::TraditionalChinese,
    }
}

/// Returns the 2048-word table for `locale`.
pub fn word_list(locale: Locale) -> &'static [&'static str; 2048] {
    language(locale).word_list()
}

/// Returns the index of `word` in the `locale` table.
pub fn word_index(locale: Locale, word: &str) -> Option<u16> {
    language(locale).find_word(word)
}

/// Finds the locale whose table contains `word`, preferring English.
pub fn detect_locale(word: &str) -> Option<Locale> {
    [Locale::English, Locale::TraditionalChinese]
        .into_iter()
        .find(|&locale| word_index(locale, word).is_some())
}

/// Packs the leading `word_count * 11` bits of `data` into words.
///
/// Bits beyond the last full word are ignored.
pub(crate) fn pack_words(data: &[u8], word_count: usize, locale: Locale) -> Vec<&'static str> {
    let table = word_list(locale);
    let mut words = Vec::with_capacity(word_count);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        if bits >= BITS_PER_WORD {
            bits -= BITS_PER_WORD;
            let index = (acc >> bits) as usize;
            acc &= (1 << bits) - 1;
            words.push(table[index]);
            if words.len() == word_count {
                break;
            }
        }
    }

    words
}

/// Unpacks words of a single `locale` into whole bytes.
///
/// Returns the bytes plus the trailing bits that did not fill a byte,
/// as `(value, bit_count)`.
pub(crate) fn unpack_words<S: AsRef<str>>(
    words: &[S],
    locale: Locale,
) -> Result<(Vec<u8>, u32, u32)> {
    let mut out = Vec::with_capacity(words.len() * 11 / 8 + 1);
    let mut rem: u32 = 0;
    let mut bits: u32 = 0;

    for word in words {
        let word = word.as_ref();
        let index = word_index(locale, word).ok_or_else(|| BitmarkError::InvalidWordlist {
            reason: format!("word '{word}' is not in the {locale} table"),
        })?;
        rem = (rem << BITS_PER_WORD) | u32::from(index);
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((rem >> (bits - 8)) as u8);
            bits -= 8;
        }
        rem &= (1 << bits) - 1;
    }

    Ok((out, rem, bits))
}

/// Renders 17 or 33 bytes of entropy as 12 or 24 words.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidEntropy`] for any other length, or
/// for 17 bytes whose last low nibble is set, since 12 words only hold
/// the high nibble of the last byte.
pub fn entropy_to_words(entropy: &[u8], locale: Locale) -> Result<Vec<&'static str>> {
    let word_count = match entropy.len() {
        SHORT_ENTROPY_LEN => SHORT_WORD_COUNT,
        LONG_ENTROPY_LEN => LONG_WORD_COUNT,
        other => {
            return Err(BitmarkError::InvalidEntropy {
                reason: format!(
                    "entropy must be {SHORT_ENTROPY_LEN} or {LONG_ENTROPY_LEN} bytes, got {other}"
                ),
            })
        }
    };

    if entropy.len() == SHORT_ENTROPY_LEN && entropy[SHORT_ENTROPY_LEN - 1] & 0x0F != 0 {
        return Err(BitmarkError::InvalidEntropy {
            reason: "low nibble of the last byte must be zero for a 12-word phrase".into(),
        });
    }

    Ok(pack_words(entropy, word_count, locale))
}

/// Recovers entropy from a 12 or 24 word phrase.
///
/// The locale is detected from the first word and every other word
/// must come from the same table. A 12-word phrase yields 17 bytes,
/// the four leftover bits landing in the high nibble of the last byte.
///
/// # Errors
///
/// - [`BitmarkError::InvalidWordCount`] if there are not 12 or 24 words.
/// - [`BitmarkError::InvalidWordlist`] if a word is unknown or the
///   words mix tables.
pub fn words_to_entropy<S: AsRef<str>>(words: &[S]) -> Result<(Vec<u8>, Locale)> {
    if words.len() != SHORT_WORD_COUNT && words.len() != LONG_WORD_COUNT {
        return Err(BitmarkError::InvalidWordCount {
            reason: format!(
                "expected {SHORT_WORD_COUNT} or {LONG_WORD_COUNT} words, got {}",
                words.len()
            ),
        });
    }

    let first = words[0].as_ref();
    let locale = detect_locale(first).ok_or_else(|| BitmarkError::InvalidWordlist {
        reason: format!("word '{first}' is not in any supported table"),
    })?;

    let (mut entropy, rem, bits) = unpack_words(words, locale)?;
    if words.len() == SHORT_WORD_COUNT {
        // 132 bits: 16 whole bytes and a nibble.
        entropy.push((rem << (8 - bits)) as u8);
    }

    Ok((entropy, locale))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
