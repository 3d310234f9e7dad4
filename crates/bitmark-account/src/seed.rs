//! Versioned seed formats and their Base58 encodings.
//!
//! # Layouts
//!
//! ```text
//! Short (24 bytes before Base58)
//!   0   3   header 5A FE 02
//!   3  17   core, network flag embedded in bytes 0..=3 and 15
//!  20   4   SHA3-256 checksum of bytes 0..20
//!
//! Long (40 bytes before Base58)
//!   0   2   magic 5A FE
//!   2   1   varint version (1)
//!   3   1   network tag
//!   4  32   core
//!  36   4   SHA3-256 checksum of bytes 0..36
//! ```
//!
//! Decoding checks, in order: length, checksum, magic, version,
//! network. No partially decoded seed is ever returned.

use std::fmt;

use bitmark_crypto::checksum::{append_checksum, verify_checksum, CHECKSUM_LEN};
use bitmark_crypto::encryption::EncryptionKeypair;
use bitmark_crypto::kdf::{
    secretbox_derive_key, shake_derive_keys, AUTH_KEY_COUNTER, ENC_KEY_COUNTER,
};
use bitmark_crypto::random::EntropySource;
use bitmark_crypto::signing::Keypair;
use bitmark_crypto::varint::{decode_varint, encode_varint};
use bitmark_types::{BitmarkError, Network, Result};
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes shared by both seed formats.
pub const SEED_MAGIC: [u8; 2] = [0x5A, 0xFE];

/// Full header of a short seed: magic followed by version byte 2.
pub const SHORT_SEED_HEADER: [u8; 3] = [0x5A, 0xFE, 0x02];

/// Version written into long seeds.
pub const LONG_SEED_VERSION: u64 = 1;

/// Core length of a short seed.
pub const SHORT_CORE_LEN: usize = 17;

/// Core length of a long seed.
pub const LONG_CORE_LEN: usize = 32;

/// Decoded (pre-Base58) length of a short seed.
pub const SHORT_ENCODED_LEN: usize = SHORT_SEED_HEADER.len() + SHORT_CORE_LEN + CHECKSUM_LEN;

/// Decoded (pre-Base58) length of a long seed.
pub const LONG_ENCODED_LEN: usize = SEED_MAGIC.len() + 2 + LONG_CORE_LEN + CHECKSUM_LEN;

// ---------------------------------------------------------------------------
// SeedVersion
// ---------------------------------------------------------------------------

/// Seed format discriminant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SeedVersion {
    /// 17-byte core, network embedded in the core, 12-word phrase.
    Short,
    /// 32-byte core, explicit network tag, 24-word phrase.
    Long,
}

impl SeedVersion {
    /// Length of the core secret.
    pub fn core_len(self) -> usize {
        match self {
            Self::Short => SHORT_CORE_LEN,
            Self::Long => LONG_CORE_LEN,
        }
    }

    /// Version number carried by the encoded form.
    pub fn number(self) -> u64 {
        match self {
            Self::Short => u64::from(SHORT_SEED_HEADER[2]),
            Self::Long => LONG_SEED_VERSION,
        }
    }

    fn from_encoded_len(len: usize) -> Result<Self> {
        match len {
            SHORT_ENCODED_LEN => Ok(Self::Short),
            LONG_ENCODED_LEN => Ok(Self::Long),
            other => Err(BitmarkError::InvalidVersion {
                reason: format!(
                    "encoded seed is {other} bytes; expected {SHORT_ENCODED_LEN} or {LONG_ENCODED_LEN}"
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ShortSeed
// ---------------------------------------------------------------------------

/// Collects the mode bits spread over the first four core bytes.
fn embedded_mode(core: &[u8; SHORT_CORE_LEN]) -> u8 {
    (core[0] & 0x80) | (core[1] & 0x40) | (core[2] & 0x20) | (core[3] & 0x10)
}

/// Reads the network flag embedded in a short seed core.
fn embedded_network(core: &[u8; SHORT_CORE_LEN]) -> Result<Network> {
    let mode = embedded_mode(core);
    let flag = core[15] & 0xF0;
    if flag == mode {
        Ok(Network::Live)
    } else if flag == mode ^ 0xF0 {
        Ok(Network::Test)
    } else {
        Err(BitmarkError::InvalidNetwork {
            reason: format!("short seed network flag {flag:#04x} matches neither network"),
        })
    }
}

/// 17-byte seed whose network is implied by its own bits.
///
/// The low nibble of the last byte is always zero, which is what lets a
/// 12-word phrase (132 bits) carry the whole core.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct ShortSeed {
    core: [u8; SHORT_CORE_LEN],
    #[zeroize(skip)]
    network: Network,
}

impl ShortSeed {
    /// Generates a fresh short seed for `network` from the OS generator.
    pub fn generate(network: Network) -> Self {
        Self::generate_from(&mut OsRng, network)
    }

    /// Generates a short seed for `network`, drawing 16 bytes from
    /// `source`.
    ///
    /// The high nibble of byte 15 is moved to byte 16 and replaced by
    /// the network flag.
    pub fn generate_from<E: EntropySource + ?Sized>(source: &mut E, network: Network) -> Self {
        let mut core = [0u8; SHORT_CORE_LEN];
        source.fill(&mut core[..16]);
        core[16] = core[15] & 0xF0;

        let mut mode = embedded_mode(&core);
        if network == Network::Test {
            mode ^= 0xF0;
        }
        core[15] = mode | (core[15] & 0x0F);

        Self { core, network }
    }

    /// Wraps existing core bytes, checking the embedded network.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidEntropy`] if the low nibble of the last
    ///   byte is set.
    /// - [`BitmarkError::InvalidNetwork`] if the embedded flag is
    ///   malformed or names a network other than `network`.
    pub fn from_core(core: [u8; SHORT_CORE_LEN], network: Network) -> Result<Self> {
        let embedded = Self::from_core_unchecked_network(core)?;
        if embedded.network != network {
            return Err(BitmarkError::InvalidNetwork {
                reason: format!(
                    "seed core is bound to {}, expected {network}",
                    embedded.network
                ),
            });
        }
        Ok(embedded)
    }

    /// Wraps core bytes, taking the network from the embedded flag.
    ///
    /// # Errors
    ///
    /// Same as [`ShortSeed::from_core`] apart from the network match.
    pub fn from_core_unchecked_network(core: [u8; SHORT_CORE_LEN]) -> Result<Self> {
        if core[SHORT_CORE_LEN - 1] & 0x0F != 0 {
            return Err(BitmarkError::InvalidEntropy {
                reason: "low nibble of the last short seed byte must be zero".into(),
            });
        }
        let network = embedded_network(&core)?;
        Ok(Self { core, network })
    }

    /// Returns the core bytes.
    pub fn core(&self) -> &[u8; SHORT_CORE_LEN] {
        &self.core
    }

    /// Network embedded in the core.
    pub fn network(&self) -> Network {
        self.network
    }

    fn encode_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(SHORT_ENCODED_LEN);
        payload.extend_from_slice(&SHORT_SEED_HEADER);
        payload.extend_from_slice(&self.core);
        let out = append_checksum(&payload);
        payload.zeroize();
        out
    }

    fn decode_payload(payload: &[u8]) -> Result<Self> {
        let (header, core) = payload.split_at(SHORT_SEED_HEADER.len());
        if header[..SEED_MAGIC.len()] != SEED_MAGIC {
            return Err(BitmarkError::InvalidMagicNumber {
                reason: format!("expected {}, found {}", hex::encode(SEED_MAGIC), hex::encode(&header[..2])),
            });
        }
        if header[2] != SHORT_SEED_HEADER[2] {
            return Err(BitmarkError::InvalidVersion {
                reason: format!("short seed version {} is not supported", header[2]),
            });
        }
        let mut bytes = [0u8; SHORT_CORE_LEN];
        bytes.copy_from_slice(core);
        Self::from_core_unchecked_network(bytes)
    }

    fn derive_keys(&self) -> Result<(Keypair, EncryptionKeypair)> {
        let mut keys = shake_derive_keys(&self.core, 2)?;
        let auth = Keypair::from_seed(&keys[0]);
        let enc = EncryptionKeypair::from_private_bytes(keys[1]);
        keys.zeroize();
        Ok((auth, enc))
    }
}

// ---------------------------------------------------------------------------
// LongSeed
// ---------------------------------------------------------------------------

/// 32-byte seed carrying an explicit network tag.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct LongSeed {
    core: [u8; LONG_CORE_LEN],
    #[zeroize(skip)]
    network: Network,
}

impl LongSeed {
    /// Generates a fresh long seed for `network` from the OS generator.
    pub fn generate(network: Network) -> Self {
        Self::generate_from(&mut OsRng, network)
    }

    /// Generates a long seed for `network` from `source`.
    pub fn generate_from<E: EntropySource + ?Sized>(source: &mut E, network: Network) -> Self {
        let mut core = [0u8; LONG_CORE_LEN];
        source.fill(&mut core);
        Self { core, network }
    }

    /// Wraps existing core bytes.
    pub fn from_core(core: [u8; LONG_CORE_LEN], network: Network) -> Self {
        Self { core, network }
    }

    /// Returns the core bytes.
    pub fn core(&self) -> &[u8; LONG_CORE_LEN] {
        &self.core
    }

    /// Network tag of this seed.
    pub fn network(&self) -> Network {
        self.network
    }

    fn encode_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(LONG_ENCODED_LEN);
        payload.extend_from_slice(&SEED_MAGIC);
        payload.extend_from_slice(&encode_varint(LONG_SEED_VERSION));
        payload.extend_from_slice(&encode_varint(self.network.tag()));
        payload.extend_from_slice(&self.core);
        let out = append_checksum(&payload);
        payload.zeroize();
        out
    }

    fn decode_payload(payload: &[u8]) -> Result<Self> {
        let (magic, rest) = payload.split_at(SEED_MAGIC.len());
        if magic != SEED_MAGIC {
            return Err(BitmarkError::InvalidMagicNumber {
                reason: format!("expected {}, found {}", hex::encode(SEED_MAGIC), hex::encode(magic)),
            });
        }

        let (version, used) = decode_varint(rest)?;
        if version != LONG_SEED_VERSION || used != 1 {
            return Err(BitmarkError::InvalidVersion {
                reason: format!("long seed version {version} is not supported"),
            });
        }
        let rest = &rest[used..];

        let network = Network::from_tag(u64::from(rest[0]))?;
        let mut core = [0u8; LONG_CORE_LEN];
        core.copy_from_slice(&rest[1..]);
        Ok(Self { core, network })
    }

    fn derive_keys(&self) -> Result<(Keypair, EncryptionKeypair)> {
        let mut auth_seed = secretbox_derive_key(&self.core, AUTH_KEY_COUNTER)?;
        let enc_seed = secretbox_derive_key(&self.core, ENC_KEY_COUNTER)?;
        let auth = Keypair::from_seed(&auth_seed);
        let enc = EncryptionKeypair::from_private_bytes(enc_seed);
        auth_seed.zeroize();
        Ok((auth, enc))
    }
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// Root secret of an account, in one of the two supported formats.
///
/// Seeds are immutable once built and zeroize their core on drop.
#[derive(Clone, Eq, PartialEq)]
pub enum Seed {
    /// 17-byte short seed.
    Short(ShortSeed),
    /// 32-byte long seed.
    Long(LongSeed),
}

impl Seed {
    /// Generates a fresh seed of the given version from the OS
    /// generator.
    pub fn generate(version: SeedVersion, network: Network) -> Self {
        Self::generate_from(&mut OsRng, version, network)
    }

    /// Generates a seed of the given version from `source`.
    pub fn generate_from<E: EntropySource + ?Sized>(
        source: &mut E,
        version: SeedVersion,
        network: Network,
    ) -> Self {
        match version {
            SeedVersion::Short => Self::Short(ShortSeed::generate_from(source, network)),
            SeedVersion::Long => Self::Long(LongSeed::generate_from(source, network)),
        }
    }

    /// Builds a seed from raw core bytes, choosing the version by
    /// length.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidEntropy`] if `core` is neither 17 nor 32
    ///   bytes.
    /// - [`BitmarkError::InvalidNetwork`] if a short core embeds a
    ///   different network.
    pub fn from_core(core: &[u8], network: Network) -> Result<Self> {
        match core.len() {
            SHORT_CORE_LEN => {
                let mut bytes = [0u8; SHORT_CORE_LEN];
                bytes.copy_from_slice(core);
                ShortSeed::from_core(bytes, network).map(Self::Short)
            }
            LONG_CORE_LEN => {
                let mut bytes = [0u8; LONG_CORE_LEN];
                bytes.copy_from_slice(core);
                Ok(Self::Long(LongSeed::from_core(bytes, network)))
            }
            other => Err(BitmarkError::InvalidEntropy {
                reason: format!(
                    "seed core must be {SHORT_CORE_LEN} or {LONG_CORE_LEN} bytes, got {other}"
                ),
            }),
        }
    }

    /// Decodes a Base58 seed string, taking the network from the seed.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidParameter`] if the string is not Base58.
    /// - [`BitmarkError::InvalidVersion`] if the decoded length matches
    ///   no format, or the version field is unknown.
    /// - [`BitmarkError::InvalidChecksum`] on checksum mismatch.
    /// - [`BitmarkError::InvalidMagicNumber`] on a wrong magic.
    /// - [`BitmarkError::InvalidNetwork`] on a malformed network field.
    pub fn decode(encoded: &str) -> Result<Self> {
        let mut bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| BitmarkError::InvalidParameter {
                reason: format!("seed is not valid base58: {e}"),
            })?;

        let decoded = Self::decode_bytes(&bytes);
        bytes.zeroize();
        let seed = decoded?;
        tracing::debug!(version = ?seed.version(), network = %seed.network(), "seed decoded");
        Ok(seed)
    }

    /// Decodes a Base58 seed string and requires it to belong to
    /// `network`.
    ///
    /// # Errors
    ///
    /// Same as [`Seed::decode`], plus [`BitmarkError::InvalidNetwork`]
    /// when the seed names another network.
    pub fn decode_for(encoded: &str, network: Network) -> Result<Self> {
        let seed = Self::decode(encoded)?;
        if seed.network() != network {
            return Err(BitmarkError::InvalidNetwork {
                reason: format!("seed is bound to {}, expected {network}", seed.network()),
            });
        }
        Ok(seed)
    }

    fn decode_bytes(bytes: &[u8]) -> Result<Self> {
        let version = SeedVersion::from_encoded_len(bytes.len())?;
        let payload = verify_checksum(bytes)?;
        match version {
            SeedVersion::Short => ShortSeed::decode_payload(payload).map(Self::Short),
            SeedVersion::Long => LongSeed::decode_payload(payload).map(Self::Long),
        }
    }

    /// Renders the seed as its Base58 string.
    pub fn encode(&self) -> String {
        let mut bytes = match self {
            Self::Short(seed) => seed.encode_bytes(),
            Self::Long(seed) => seed.encode_bytes(),
        };
        let encoded = bs58::encode(&bytes).into_string();
        bytes.zeroize();
        encoded
    }

    /// Format of this seed.
    pub fn version(&self) -> SeedVersion {
        match self {
            Self::Short(_) => SeedVersion::Short,
            Self::Long(_) => SeedVersion::Long,
        }
    }

    /// Network this seed is bound to.
    pub fn network(&self) -> Network {
        match self {
            Self::Short(seed) => seed.network(),
            Self::Long(seed) => seed.network(),
        }
    }

    /// Returns the core bytes.
    pub fn core(&self) -> &[u8] {
        match self {
            Self::Short(seed) => seed.core(),
            Self::Long(seed) => seed.core(),
        }
    }

    /// Derives the Ed25519 authentication keypair.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if derivation fails.
    pub fn auth_keypair(&self) -> Result<Keypair> {
        self.derive_keys().map(|(auth, _)| auth)
    }

    /// Derives the X25519 encryption keypair.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if derivation fails.
    pub fn enc_keypair(&self) -> Result<EncryptionKeypair> {
        self.derive_keys().map(|(_, enc)| enc)
    }

    /// Derives both keypairs at once.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if derivation fails.
    pub fn derive_keys(&self) -> Result<(Keypair, EncryptionKeypair)> {
        match self {
            Self::Short(seed) => seed.derive_keys(),
            Self::Long(seed) => seed.derive_keys(),
        }
    }
}

impl fmt::Debug for ShortSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortSeed")
            .field("network", &self.network)
            .field("core", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LongSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongSeed")
            .field("network", &self.network)
            .field("core", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("version", &self.version())
            .field("network", &self.network())
            .field("core", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
