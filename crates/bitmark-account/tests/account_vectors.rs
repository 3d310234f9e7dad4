//! Integration tests for bitmark-account.
//!
//! Fixtures are published seeds, phrases and account numbers from the
//! test network. Nothing here depends on randomness.

use bitmark_account::address::Address;
use bitmark_account::phrase::{LegacyPhrase, RecoveryPhrase};
use bitmark_account::seed::{Seed, SeedVersion};
use bitmark_account::Account;
use bitmark_crypto::checksum::append_checksum;
use bitmark_types::config::SdkConfig;
use bitmark_types::{BitmarkError, Locale, Network};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// (encoded seed, core, auth public key, enc public key, account number)
const SHORT_SEEDS: [(&str, &str, &str, &str, &str); 4] = [
    (
        "9J877LVjhr3Xxd2nGzRVRVNUZpSKJF4TH",
        "442f54cd072a9638be4a0344e1a6e5f010",
        "9bdf52f23deb941ea23cec982c24a5c811d321e71f6df56508bd511f66311e06",
        "4fafd7efb921e5358e080f213a93a2196bc9cb5529192b48d9c4d7fcd7f4b943",
        "f7nuKToBByL3jEcArZWoB9PJ8MVmGPjrYkW88v3Yw8p7G5Sxhy",
    ),
    (
        "9J876mP7wDJ6g5P41eNMN8N3jo9fycDs2",
        "3ae670cd91c5e15d0254a2abc57ba29d00",
        "d1c177ef358e9d1f0d4b09328cc1213e8d3580703aee51ccf97e482be977f7bc",
        "b8c97aae6fead0b1d4bf05b11e2c6ab03b6e8335a2a08c76810fa7e52f41bc3b",
        "fXXHGtCdFPuQvNhJ4nDPKCdwPxH7aSZ4842n2katZi319NsaCs",
    ),
    (
        "9J878SbnM2GFqAELkkiZbqHJDkAj57fYK",
        "5628a8c72ab31c7bbf8996be8e2f6cdf80",
        "4f6789400e2bff0a30bcfa6dcbe8e346be3f8676ec2eac49491072ca2ea90c92",
        "9fcc324a86a08944bec3bbed74829522912aa8bfd2d8fb421d3867bd1f4f667d",
        "eY7ddmQcwDSUtPybUsDXyZtMeDcKEnGq36yVkeFuMMmwP6NhcV",
    ),
    (
        "9J87CAsHdFdoEu6N1unZk3sqhVBkVL8Z8",
        "92cc14293e6817ff852ea8c44fa0d135d0",
        "369f6ceb1c23dbccc61b75e7990d0b2db8e1ee8da1c44db32280e63ca5804f38",
        "2e1b603eb4e4810ad9f679cad3503c56079511d3e97b583eea82744d6012b07e",
        "eMCcmw1SKoohNUf3LeioTFKaYNYfp2bzFYpjm3EddwxBSWYVCb",
    ),
];

/// (encoded seed, core, phrase, account number)
const LONG_SEEDS: [(&str, &str, &str, &str); 2] = [
    (
        "5XEECt18HGBGNET1PpxLhy5CsCLG9jnmM6Q8QGF4U2yGb1DABXZsVeD",
        "7b95d37f92c904949f79784c7855606b6a2d60416f01441671f4132cef60b607",
        "accident syrup inquiry you clutch liquid fame upset joke glow best school \
         repeat birth library combine access camera organ trial crazy jeans lizard science",
        "ec6yMcJATX6gjNwvqp8rbc4jNEasoUgbfBBGGyV5NvoJ54NXva",
    ),
    (
        "5XEECsXPYA9wDVXMtRMAVrtaWx7WSc5tG2hqj6b8iiz9rARjg2BgA9w",
        "3c9ae8fcd3746fc2fd06ea1b191995267b469f2b55e21ed6b225fabba683400c",
        "abuse tooth riot whale dance dawn armor patch tube sugar edit clean \
         guilt person lake height tilt wall prosper episode produce spy artist account",
        "eujeF5ZBDV3qJyKeHxNqnmJsrc9iN7eHJGECsRuSXvLmnNjsWX",
    ),
];

fn testnet() -> SdkConfig {
    SdkConfig::for_network(Network::Test)
}

fn words(phrase: &str) -> Vec<&str> {
    phrase.split_whitespace().collect()
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

#[test]
fn short_seed_vectors() -> Result<(), BitmarkError> {
    for (encoded, core, auth_pub, enc_pub, account_number) in SHORT_SEEDS {
        let seed = Seed::decode(encoded)?;
        assert_eq!(seed.version(), SeedVersion::Short);
        assert_eq!(seed.network(), Network::Test);
        assert_eq!(hex::encode(seed.core()), core);
        assert_eq!(seed.encode(), encoded);

        let account = Account::from_seed(seed, &testnet())?;
        assert_eq!(account.auth_keypair().public_key().to_string(), auth_pub);
        assert_eq!(account.encryption_public_key().to_string(), enc_pub);
        assert_eq!(account.account_number(), account_number);
    }
    Ok(())
}

#[test]
fn long_seed_vectors() -> Result<(), BitmarkError> {
    for (encoded, core, _, account_number) in LONG_SEEDS {
        let seed = Seed::decode(encoded)?;
        assert_eq!(seed.version(), SeedVersion::Long);
        assert_eq!(seed.network(), Network::Test);
        assert_eq!(hex::encode(seed.core()), core);
        assert_eq!(seed.encode(), encoded);

        let account = Account::from_encoded_seed(encoded, &testnet())?;
        assert_eq!(account.account_number(), account_number);
    }
    Ok(())
}

#[test]
fn seed_from_core_bytes_matches_decoded_seed() -> Result<(), BitmarkError> {
    let core = hex::decode("442f54cd072a9638be4a0344e1a6e5f010")
        .map_err(|e| BitmarkError::InvalidEntropy { reason: e.to_string() })?;
    let seed = Seed::from_core(&core, Network::Test)?;
    assert_eq!(seed.encode(), "9J877LVjhr3Xxd2nGzRVRVNUZpSKJF4TH");
    Ok(())
}

#[test]
fn short_core_for_live_network_rejected_on_testnet() {
    for core_hex in ["ba0e357d9157a1a7299fbc4cb4c933bd00", "00d00c884d08394698fbffbb6259d646b0"] {
        let core = hex::decode(core_hex).unwrap_or_default();
        assert!(
            matches!(
                Seed::from_core(&core, Network::Test),
                Err(BitmarkError::InvalidNetwork { .. })
            ),
            "{core_hex} accepted on testnet"
        );
        assert!(Seed::from_core(&core, Network::Live).is_ok());
    }
}

#[test]
fn malformed_encoded_seeds_rejected() {
    for encoded in [
        "5XEECt18HGBGNET1PpxLhy5CsCLG9jnmM6Q8QU2yGb1DABXZsVeD",
        "5XEECt18HGBGNET1PpxLhy5CsCLG2yGb1DABXZsVeD",
        "5XEECqWqA47qWg86DR5HJ29HhbVqwigHUAhgiBMqFSBycbiwnbY639sabc1",
    ] {
        assert!(
            matches!(Seed::decode(encoded), Err(BitmarkError::InvalidVersion { .. })),
            "{encoded} accepted"
        );
    }
    assert!(matches!(
        Seed::decode("not base58 0OIl"),
        Err(BitmarkError::InvalidParameter { .. })
    ));
}

#[test]
fn any_flipped_bit_in_a_seed_is_detected() -> Result<(), BitmarkError> {
    for encoded in [SHORT_SEEDS[0].0, LONG_SEEDS[0].0] {
        let mut raw = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| BitmarkError::InvalidParameter { reason: e.to_string() })?;
        for bit in 0..raw.len() * 8 {
            raw[bit / 8] ^= 1 << (bit % 8);
            let flipped = bs58::encode(&raw).into_string();
            assert!(
                matches!(Seed::decode(&flipped), Err(BitmarkError::InvalidChecksum { .. })),
                "bit {bit} of {encoded}"
            );
            raw[bit / 8] ^= 1 << (bit % 8);
        }
    }
    Ok(())
}

#[test]
fn long_seed_with_valid_checksum_but_wrong_magic() {
    let mut payload = vec![0x5A, 0xFF, 0x01, 0x01];
    payload.extend_from_slice(&[0x11; 32]);
    let encoded = bs58::encode(append_checksum(&payload)).into_string();
    assert!(matches!(
        Seed::decode(&encoded),
        Err(BitmarkError::InvalidMagicNumber { .. })
    ));
}

#[test]
fn account_rejects_seed_for_other_network() {
    assert!(matches!(
        Account::from_encoded_seed(LONG_SEEDS[0].0, &SdkConfig::for_network(Network::Live)),
        Err(BitmarkError::InvalidNetwork { .. })
    ));
}

// ---------------------------------------------------------------------------
// Phrases
// ---------------------------------------------------------------------------

#[test]
fn twelve_word_phrase_recovers_account() -> Result<(), BitmarkError> {
    let phrase = "name gaze apart lamp lift zone believe steak session laptop crowd hill";
    let account = Account::from_recovery_phrase(&words(phrase), &testnet())?;
    assert_eq!(account.encoded_seed(), "9J87CAsHdFdoEu6N1unZk3sqhVBkVL8Z8");
    assert_eq!(
        account.account_number(),
        "eMCcmw1SKoohNUf3LeioTFKaYNYfp2bzFYpjm3EddwxBSWYVCb"
    );
    assert_eq!(account.recovery_phrase(Locale::English)?.phrase(), phrase);
    Ok(())
}

#[test]
fn twenty_four_word_phrases_recover_accounts() -> Result<(), BitmarkError> {
    for (encoded, _, phrase, account_number) in LONG_SEEDS {
        let account = Account::from_recovery_phrase(&words(phrase), &testnet())?;
        assert_eq!(account.encoded_seed(), encoded);
        assert_eq!(account.account_number(), account_number);
        assert_eq!(account.recovery_phrase(Locale::English)?.words(), words(phrase));
    }
    Ok(())
}

#[test]
fn chinese_phrase_recovers_same_seed() -> Result<(), BitmarkError> {
    let phrase: RecoveryPhrase = "專 青 辦 增 孔 咱 裡 耕 窮 節 撲 易".parse()?;
    assert_eq!(phrase.locale(), Locale::TraditionalChinese);
    assert_eq!(phrase.recover_seed()?.encode(), "9J876mP7wDJ6g5P41eNMN8N3jo9fycDs2");
    Ok(())
}

#[test]
fn legacy_phrase_recovers_short_seed() -> Result<(), BitmarkError> {
    let account = Account::from_encoded_seed("9J876mP7wDJ6g5P41eNMN8N3jo9fycDs2", &testnet())?;
    let legacy = account.legacy_phrase()?;
    assert_eq!(
        legacy.phrase(),
        "depend crime cricket castle fun purse announce nephew profit cloth trim deliver august"
    );

    let recovered = Account::from_recovery_phrase(legacy.words(), &testnet())?;
    assert_eq!(recovered.account_number(), account.account_number());
    Ok(())
}

#[test]
fn legacy_phrase_not_offered_for_long_seed() -> Result<(), BitmarkError> {
    let account = Account::from_encoded_seed(LONG_SEEDS[1].0, &testnet())?;
    assert!(matches!(
        account.legacy_phrase(),
        Err(BitmarkError::InvalidEntropy { .. })
    ));
    Ok(())
}

#[test]
fn malformed_phrases_rejected() {
    let too_short = words("during kingdom crew atom practice brisk weird document eager artwork");
    assert!(matches!(
        Account::from_recovery_phrase(&too_short, &testnet()),
        Err(BitmarkError::InvalidWordCount { .. })
    ));

    let unknown = words("during kingdom crew atom practice brisk weird document eager artwork ride ledger");
    assert!(matches!(
        RecoveryPhrase::from_words(&unknown),
        Err(BitmarkError::InvalidWordlist { .. })
    ));

    let bad_legacy =
        words("depend crime cricket castle fun purse announce nephew profit cloth trim deliver area");
    assert!(matches!(
        LegacyPhrase::from_words(&bad_legacy),
        Err(BitmarkError::InvalidChecksum { .. })
    ));
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[test]
fn account_number_validation() {
    assert!(Address::is_valid_account_number(
        "ec6yMcJATX6gjNwvqp8rbc4jNEasoUgbfBBGGyV5NvoJ54NXva",
        Network::Test
    ));
    for input in [
        "ec6yMcJATX6gjNwvqp8rbc4jNEasoUgbfBBGGyV5NvoJ54N",
        "58760a01edf5ed4f95bfe977d77a27627cd57a25df5dea885972212c2b1c0e2f",
        "",
    ] {
        assert!(!Address::is_valid_account_number(input, Network::Test), "{input}");
    }
    assert!(matches!(
        Address::from_account_number(
            "ec6yMcJATX6gjNwvqp8rbc4jNEasoUgbfBBGGyV5NvoJ54NXva",
            Network::Live
        ),
        Err(BitmarkError::InvalidNetwork { .. })
    ));
}

#[test]
fn account_signature_verifies_against_account_number() -> Result<(), BitmarkError> {
    let account = Account::from_encoded_seed(LONG_SEEDS[1].0, &testnet())?;
    let signature = account.sign(b"bitmark");
    Account::verify(LONG_SEEDS[1].3, &signature, b"bitmark", Network::Test)?;
    Ok(())
}
