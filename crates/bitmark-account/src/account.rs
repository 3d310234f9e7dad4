//! Accounts: a seed, its derived key pairs and its address.
//!
//! An [`Account`] is always built against an [`SdkConfig`]; a seed or
//! phrase bound to another network is rejected before any key is
//! derived. The seed and both private keys stay in memory only for the
//! lifetime of the account and are zeroized on drop.

use std::fmt;

use bitmark_crypto::encryption::{EncryptionKeypair, EncryptionPublicKey};
use bitmark_crypto::random::EntropySource;
use bitmark_crypto::signing::{verify, Keypair, MessageSigner, PublicKey, Signature};
use bitmark_types::config::SdkConfig;
use bitmark_types::{BitmarkError, Locale, Network, Result};

use crate::address::Address;
use crate::phrase::{recover_any, LegacyPhrase, RecoveryPhrase};
use crate::seed::{Seed, SeedVersion};

/// A ledger identity backed by a seed.
pub struct Account {
    seed: Seed,
    auth: Keypair,
    enc: EncryptionKeypair,
    address: Address,
}

impl Account {
    // -- Construction -----------------------------------------------------

    /// Creates an account with a fresh seed of `version` on the
    /// configured network.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::ConfigError`] if `config` is invalid.
    /// - [`BitmarkError::CryptoError`] if key derivation fails.
    pub fn generate(version: SeedVersion, config: &SdkConfig) -> Result<Self> {
        config.validate()?;
        Self::from_seed(Seed::generate(version, config.network), config)
    }

    /// Like [`Account::generate`], drawing the seed from `source`.
    ///
    /// # Errors
    ///
    /// Same as [`Account::generate`].
    pub fn generate_from<E: EntropySource + ?Sized>(
        source: &mut E,
        version: SeedVersion,
        config: &SdkConfig,
    ) -> Result<Self> {
        config.validate()?;
        Self::from_seed(Seed::generate_from(source, version, config.network), config)
    }

    /// Builds an account from an existing seed.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidNetwork`] if the seed belongs to a
    ///   network other than `config.network`.
    /// - [`BitmarkError::CryptoError`] if key derivation fails.
    pub fn from_seed(seed: Seed, config: &SdkConfig) -> Result<Self> {
        if seed.network() != config.network {
            return Err(BitmarkError::InvalidNetwork {
                reason: format!(
                    "seed is bound to {}, account configured for {}",
                    seed.network(),
                    config.network
                ),
            });
        }

        let (auth, enc) = seed.derive_keys()?;
        let address = Address::from_public_key(auth.public_key(), seed.network());
        tracing::debug!(
            account = %address,
            version = ?seed.version(),
            "account keys derived"
        );

        Ok(Self {
            seed,
            auth,
            enc,
            address,
        })
    }

    /// Builds an account from a Base58 seed string.
    ///
    /// # Errors
    ///
    /// Any error of [`Seed::decode`] or [`Account::from_seed`].
    pub fn from_encoded_seed(encoded: &str, config: &SdkConfig) -> Result<Self> {
        Self::from_seed(Seed::decode(encoded)?, config)
    }

    /// Builds an account from a 12, 13 or 24 word phrase.
    ///
    /// # Errors
    ///
    /// Any phrase validation error, or the errors of
    /// [`Account::from_seed`].
    pub fn from_recovery_phrase<S: AsRef<str>>(words: &[S], config: &SdkConfig) -> Result<Self> {
        let seed = recover_any(words)?;
        tracing::info!(words = words.len(), "recovering account from phrase");
        Self::from_seed(seed, config)
    }

    // -- Accessors --------------------------------------------------------

    /// The account's address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The Base58 account number.
    pub fn account_number(&self) -> String {
        self.address.account_number()
    }

    /// Network the account lives on.
    pub fn network(&self) -> Network {
        self.seed.network()
    }

    /// The underlying seed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// The seed as a Base58 string.
    pub fn encoded_seed(&self) -> String {
        self.seed.encode()
    }

    /// Ed25519 authentication keypair.
    pub fn auth_keypair(&self) -> &Keypair {
        &self.auth
    }

    /// X25519 encryption keypair.
    pub fn enc_keypair(&self) -> &EncryptionKeypair {
        &self.enc
    }

    /// Public half of the encryption keypair.
    pub fn encryption_public_key(&self) -> EncryptionPublicKey {
        self.enc.public_key()
    }

    // -- Phrases ----------------------------------------------------------

    /// Renders the seed as a 12 or 24 word phrase in `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidEntropy`] if the seed cannot be
    /// rendered.
    pub fn recovery_phrase(&self, locale: Locale) -> Result<RecoveryPhrase> {
        RecoveryPhrase::from_seed(&self.seed, locale)
    }

    /// Renders a short seed as a legacy 13-word phrase.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidEntropy`] for long seeds.
    pub fn legacy_phrase(&self) -> Result<LegacyPhrase> {
        LegacyPhrase::from_seed(&self.seed)
    }

    // -- Signing ----------------------------------------------------------

    /// Signs `message` with the authentication key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.auth.sign(message)
    }

    /// Verifies a signature made by the holder of `account_number`.
    ///
    /// # Errors
    ///
    /// - Any error of [`Address::from_account_number`].
    /// - [`BitmarkError::CryptoError`] if the signature does not verify.
    pub fn verify(
        account_number: &str,
        signature: &Signature,
        message: &[u8],
        network: Network,
    ) -> Result<()> {
        let address = Address::from_account_number(account_number, network)?;
        verify(address.public_key(), message, signature)
    }
}

impl MessageSigner for Account {
    fn public_key(&self) -> PublicKey {
        *self.address.public_key()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        Account::sign(self, message)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address.account_number())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_account_round_trips_through_seed_and_phrase() -> Result<()> {
        let config = SdkConfig::for_network(Network::Live);
        for version in [SeedVersion::Short, SeedVersion::Long] {
            let account = Account::generate(version, &config)?;
            let from_seed = Account::from_encoded_seed(&account.encoded_seed(), &config)?;
            assert_eq!(from_seed.account_number(), account.account_number());

            let phrase = account.recovery_phrase(Locale::English)?;
            let from_phrase = Account::from_recovery_phrase(phrase.words(), &config)?;
            assert_eq!(from_phrase.account_number(), account.account_number());
        }
        Ok(())
    }

    #[test]
    fn seed_for_other_network_rejected() {
        let seed = Seed::generate(SeedVersion::Long, Network::Live);
        assert!(matches!(
            Account::from_seed(seed, &SdkConfig::for_network(Network::Test)),
            Err(BitmarkError::InvalidNetwork { .. })
        ));
    }

    #[test]
    fn sign_then_verify_by_account_number() -> Result<()> {
        let config = SdkConfig::default();
        let account = Account::generate(SeedVersion::Short, &config)?;
        let sig = account.sign(b"hello ledger");
        Account::verify(&account.account_number(), &sig, b"hello ledger", config.network)?;
        assert!(
            Account::verify(&account.account_number(), &sig, b"tampered", config.network).is_err()
        );
        Ok(())
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SdkConfig {
            connection_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            Account::generate(SeedVersion::Long, &config),
            Err(BitmarkError::ConfigError { .. })
        ));
    }
}
