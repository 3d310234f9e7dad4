//! Recovery phrases for seeds.
//!
//! A [`RecoveryPhrase`] is the 12 or 24 word form of a seed:
//!
//! - 12 words carry a short seed core. Its embedded network flag acts
//!   as the checksum.
//! - 24 words carry `network tag ‖ long seed core`.
//!
//! A [`LegacyPhrase`] is the older 13-word English form of a short
//! seed, with an explicit checksum word. The two are never decoded as
//! each other. Both hold their words only in memory and zeroize them
//! on drop.

use std::fmt;
use std::str::FromStr;

use bitmark_crypto::legacy::{entropy_to_legacy_words, legacy_words_to_entropy, LEGACY_WORD_COUNT};
use bitmark_crypto::mnemonic::{entropy_to_words, words_to_entropy};
use bitmark_types::{BitmarkError, Locale, Network, Result};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::seed::{LongSeed, Seed, ShortSeed, LONG_CORE_LEN, SHORT_CORE_LEN};

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// RecoveryPhrase
// ---------------------------------------------------------------------------

/// 12 or 24 word phrase in one locale.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct RecoveryPhrase {
    words: Vec<String>,
    #[zeroize(skip)]
    locale: Locale,
}

impl RecoveryPhrase {
    /// Renders `seed` in the `locale` word table.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidEntropy`] if the seed core cannot
    /// be rendered (not expected for a constructed seed).
    pub fn from_seed(seed: &Seed, locale: Locale) -> Result<Self> {
        let mut entropy = match seed {
            Seed::Short(short) => short.core().to_vec(),
            Seed::Long(long) => {
                let mut data = Vec::with_capacity(LONG_CORE_LEN + 1);
                data.push(long.network().tag() as u8);
                data.extend_from_slice(long.core());
                data
            }
        };
        let rendered = entropy_to_words(&entropy, locale);
        entropy.zeroize();
        Ok(Self {
            words: owned(&rendered?),
            locale,
        })
    }

    /// Validates a phrase given as separate words.
    ///
    /// The locale is detected from the words. Validation goes as far as
    /// rebuilding the seed, so a phrase that passes here always
    /// recovers.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidWordCount`] unless 12 or 24 words.
    /// - [`BitmarkError::InvalidWordlist`] on unknown or mixed words.
    /// - [`BitmarkError::InvalidChecksum`] if a 12-word phrase does not
    ///   carry a valid network flag.
    /// - [`BitmarkError::InvalidNetwork`] if a 24-word phrase starts with
    ///   an unknown network tag.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let (mut entropy, locale) = words_to_entropy(words)?;
        let checked = seed_from_entropy(&entropy);
        entropy.zeroize();
        drop(checked?);

        Ok(Self {
            words: words.iter().map(|w| w.as_ref().to_owned()).collect(),
            locale,
        })
    }

    /// Rebuilds the seed encoded by this phrase.
    ///
    /// # Errors
    ///
    /// Same as [`RecoveryPhrase::from_words`].
    pub fn recover_seed(&self) -> Result<Seed> {
        let (mut entropy, _) = words_to_entropy(&self.words)?;
        let seed = seed_from_entropy(&entropy);
        entropy.zeroize();
        seed
    }

    /// The words, in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Word table the phrase is written in.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// The words joined by single spaces.
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}

fn seed_from_entropy(entropy: &[u8]) -> Result<Seed> {
    if entropy.len() == SHORT_CORE_LEN {
        let mut core = [0u8; SHORT_CORE_LEN];
        core.copy_from_slice(entropy);
        return ShortSeed::from_core_unchecked_network(core)
            .map(Seed::Short)
            .map_err(|e| BitmarkError::InvalidChecksum {
                reason: format!("12-word phrase does not decode to a seed: {e}"),
            });
    }

    if entropy.len() != LONG_CORE_LEN + 1 {
        return Err(BitmarkError::InvalidEntropy {
            reason: format!(
                "phrase entropy is {} bytes, expected {SHORT_CORE_LEN} or {}",
                entropy.len(),
                LONG_CORE_LEN + 1
            ),
        });
    }
    let network = Network::from_tag(u64::from(entropy[0]))?;
    let mut core = [0u8; LONG_CORE_LEN];
    core.copy_from_slice(&entropy[1..]);
    let seed = Seed::Long(LongSeed::from_core(core, network));
    core.zeroize();
    Ok(seed)
}

impl FromStr for RecoveryPhrase {
    type Err = BitmarkError;

    /// Splits on whitespace and validates.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        Self::from_words(&words)
    }
}

impl fmt::Debug for RecoveryPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryPhrase")
            .field("locale", &self.locale)
            .field("words", &self.words.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// LegacyPhrase
// ---------------------------------------------------------------------------

/// 13-word English phrase for short seeds.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct LegacyPhrase {
    words: Vec<String>,
}

impl LegacyPhrase {
    /// Renders a short seed as a legacy phrase.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidEntropy`] for long seeds, which
    /// have no legacy form.
    pub fn from_seed(seed: &Seed) -> Result<Self> {
        let Seed::Short(short) = seed else {
            return Err(BitmarkError::InvalidEntropy {
                reason: "legacy phrases only exist for short seeds".into(),
            });
        };
        let words = entropy_to_legacy_words(short.core())?;
        Ok(Self {
            words: owned(&words),
        })
    }

    /// Validates a legacy phrase given as separate words.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidWordCount`] unless 13 words.
    /// - [`BitmarkError::InvalidWordlist`] if a word is not English.
    /// - [`BitmarkError::InvalidChecksum`] if the last word does not
    ///   match.
    /// - The errors of [`ShortSeed::from_core_unchecked_network`] if the
    ///   entropy is not a short seed core.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        legacy_seed(words)?;
        Ok(Self {
            words: words.iter().map(|w| w.as_ref().to_owned()).collect(),
        })
    }

    /// Rebuilds the short seed encoded by this phrase.
    ///
    /// # Errors
    ///
    /// Checksum errors as in [`LegacyPhrase::from_words`], and the
    /// network errors of [`ShortSeed::from_core_unchecked_network`].
    pub fn recover_seed(&self) -> Result<Seed> {
        legacy_seed(&self.words)
    }

    /// The words, in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The words joined by single spaces.
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}

fn legacy_seed<S: AsRef<str>>(words: &[S]) -> Result<Seed> {
    let mut entropy = legacy_words_to_entropy(words)?;
    let core = <[u8; SHORT_CORE_LEN]>::try_from(entropy.as_slice()).map_err(|_| {
        BitmarkError::InvalidEntropy {
            reason: format!("legacy entropy is {} bytes, expected {SHORT_CORE_LEN}", entropy.len()),
        }
    });
    entropy.zeroize();
    let mut core = core?;
    let seed = ShortSeed::from_core_unchecked_network(core).map(Seed::Short);
    core.zeroize();
    seed
}

impl FromStr for LegacyPhrase {
    type Err = BitmarkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        Self::from_words(&words)
    }
}

impl fmt::Debug for LegacyPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyPhrase").finish_non_exhaustive()
    }
}

/// Parses either phrase form by word count and recovers its seed.
///
/// # Errors
///
/// The errors of [`RecoveryPhrase::from_words`] for 12 or 24 words, of
/// [`LegacyPhrase::from_words`] for 13, and
/// [`BitmarkError::InvalidWordCount`] otherwise.
pub fn recover_any<S: AsRef<str>>(words: &[S]) -> Result<Seed> {
    if words.len() == LEGACY_WORD_COUNT {
        return LegacyPhrase::from_words(words)?.recover_seed();
    }
    RecoveryPhrase::from_words(words)?.recover_seed()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedVersion;

    #[test]
    fn generated_seeds_survive_both_locales() -> Result<()> {
        for version in [SeedVersion::Short, SeedVersion::Long] {
            for network in [Network::Live, Network::Test] {
                let seed = Seed::generate(version, network);
                for locale in [Locale::English, Locale::TraditionalChinese] {
                    let phrase = RecoveryPhrase::from_seed(&seed, locale)?;
                    let parsed = RecoveryPhrase::from_words(phrase.words())?;
                    assert_eq!(parsed.locale(), locale);
                    assert_eq!(parsed.recover_seed()?, seed);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn broken_network_flag_is_a_checksum_error() {
        // Last word changed so byte 15 no longer carries a valid flag.
        let words = "during kingdom crew atom practice brisk weird document eager artwork ride abandon";
        assert!(matches!(
            words.parse::<RecoveryPhrase>(),
            Err(BitmarkError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn legacy_requires_short_seed() {
        let seed = Seed::generate(SeedVersion::Long, Network::Test);
        assert!(matches!(
            LegacyPhrase::from_seed(&seed),
            Err(BitmarkError::InvalidEntropy { .. })
        ));
    }

    #[test]
    fn legacy_words_must_carry_a_short_seed() -> Result<()> {
        let mut low_nibble = hex::decode("442f54cd072a9638be4a0344e1a6e5f010").map_err(|e| {
            BitmarkError::InvalidEntropy {
                reason: e.to_string(),
            }
        })?;
        let mut bad_flag = low_nibble.clone();
        low_nibble[16] |= 0x01;
        bad_flag[15] ^= 0x10;

        let words = entropy_to_legacy_words(&low_nibble)?;
        assert!(matches!(
            LegacyPhrase::from_words(&words),
            Err(BitmarkError::InvalidEntropy { .. })
        ));
        let words = entropy_to_legacy_words(&bad_flag)?;
        assert!(matches!(
            LegacyPhrase::from_words(&words),
            Err(BitmarkError::InvalidNetwork { .. })
        ));
        Ok(())
    }

    #[test]
    fn odd_entropy_length_rejected() {
        for len in [0, 16, 32, 34] {
            assert!(matches!(
                seed_from_entropy(&vec![0u8; len]),
                Err(BitmarkError::InvalidEntropy { .. })
            ));
        }
    }

    #[test]
    fn legacy_round_trip() -> Result<()> {
        let seed = Seed::generate(SeedVersion::Short, Network::Live);
        let phrase = LegacyPhrase::from_seed(&seed)?;
        assert_eq!(phrase.words().len(), 13);
        assert_eq!(phrase.phrase().parse::<LegacyPhrase>()?.recover_seed()?, seed);
        Ok(())
    }

    #[test]
    fn debug_hides_words() -> Result<()> {
        let phrase: RecoveryPhrase =
            "during kingdom crew atom practice brisk weird document eager artwork ride then".parse()?;
        assert!(!format!("{phrase:?}").contains("during"));
        Ok(())
    }
}
