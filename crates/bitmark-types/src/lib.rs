//! Core shared types for the Bitmark client toolkit.
//!
//! This crate defines the types every other crate in the workspace
//! agrees on: the [`Network`] an artifact is bound to, the word-list
//! [`Locale`], fixed-size identifiers such as [`Link`], and the central
//! [`BitmarkError`] taxonomy.

pub mod config;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Ledger network an encoded artifact (seed, address) is bound to.
///
/// The discriminant is the wire tag written into long-form seeds and
/// address prefixes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production ledger.
    Live = 0,
    /// Test ledger.
    Test = 1,
}

impl Network {
    /// Returns the integer tag used on the wire.
    pub fn tag(self) -> u64 {
        self as u64
    }

    /// Maps a wire tag back to a [`Network`].
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidNetwork`] for any tag other than
    /// 0 or 1.
    pub fn from_tag(tag: u64) -> Result<Self> {
        match tag {
            0 => Ok(Self::Live),
            1 => Ok(Self::Test),
            other => Err(BitmarkError::InvalidNetwork {
                reason: format!("unknown network tag {other}"),
            }),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::Test
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "livenet"),
            Self::Test => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = BitmarkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "livenet" | "live" => Ok(Self::Live),
            "testnet" | "test" => Ok(Self::Test),
            other => Err(BitmarkError::InvalidNetwork {
                reason: format!("unknown network name '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Word table used to render recovery phrases.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// English word table.
    English,
    /// Traditional Chinese word table.
    TraditionalChinese,
}

impl Default for Locale {
    fn default() -> Self {
        Self::English
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "en"),
            Self::TraditionalChinese => write!(f, "zh-TW"),
        }
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// 32-byte transaction identifier.
///
/// Identifies the previous record a transfer, offer or share points at.
/// Rendered as lowercase hex on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Link([u8; 32]);

impl Link {
    /// The fixed byte length of a link.
    pub const LEN: usize = 32;

    /// Creates a new `Link` from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Link {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Link {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Link {
    type Err = BitmarkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| BitmarkError::InvalidParameter {
            reason: "invalid hex encoding for link".into(),
        })?;
        if bytes.len() != Self::LEN {
            return Err(BitmarkError::InvalidParameter {
                reason: format!("expected {} bytes for link, got {}", Self::LEN, bytes.len()),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Serialize for Link {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of a share balance. Shares are keyed by the id of the
/// record that created them, so this is the same 32-byte shape as a
/// [`Link`].
pub type ShareId = Link;

// ---------------------------------------------------------------------------
// BitmarkError
// ---------------------------------------------------------------------------

/// Central error type for the toolkit.
///
/// Every decode or validation failure maps to exactly one variant, so
/// callers can tell a bad checksum from a wrong network without
/// parsing messages. No variant is ever returned alongside a partially
/// built value.
#[derive(Debug, Error)]
pub enum BitmarkError {
    /// A varint buffer was truncated or overflowed 64 bits.
    #[error("malformed varint: {reason}")]
    MalformedVarInt {
        /// Human-readable description of the decode failure.
        reason: String,
    },

    /// Entropy or core seed bytes have the wrong length.
    #[error("invalid entropy: {reason}")]
    InvalidEntropy {
        /// Human-readable description of the entropy problem.
        reason: String,
    },

    /// A recovery phrase has an unsupported number of words.
    #[error("invalid word count: {reason}")]
    InvalidWordCount {
        /// Human-readable description including the observed count.
        reason: String,
    },

    /// A recovery phrase contains a word outside every supported table.
    #[error("invalid word list: {reason}")]
    InvalidWordlist {
        /// Human-readable description naming the offending word.
        reason: String,
    },

    /// An embedded checksum does not match the recomputed one.
    #[error("invalid checksum: {reason}")]
    InvalidChecksum {
        /// Human-readable description of the checksum mismatch.
        reason: String,
    },

    /// A seed header does not start with the expected magic bytes.
    #[error("invalid magic number: {reason}")]
    InvalidMagicNumber {
        /// Human-readable description of the magic mismatch.
        reason: String,
    },

    /// A seed carries a version this toolkit does not understand.
    #[error("invalid version: {reason}")]
    InvalidVersion {
        /// Human-readable description of the version problem.
        reason: String,
    },

    /// An artifact is bound to a network other than the expected one.
    #[error("invalid network: {reason}")]
    InvalidNetwork {
        /// Human-readable description of the network mismatch.
        reason: String,
    },

    /// An account number is malformed or has the wrong key type.
    #[error("invalid address: {reason}")]
    InvalidAddress {
        /// Human-readable description of why the address is invalid.
        reason: String,
    },

    /// An issuance nonce is duplicated or out of range.
    #[error("invalid nonce: {reason}")]
    InvalidNonce {
        /// Human-readable description of the nonce problem.
        reason: String,
    },

    /// A record was serialized for transport before being signed.
    #[error("record is not signed: {reason}")]
    NotSigned {
        /// Human-readable description of which record lacked a signature.
        reason: String,
    },

    /// A record field failed validation (length, range, encoding).
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Human-readable description of the failing field.
        reason: String,
    },

    /// A cryptographic operation failed (verification, key parsing).
    #[error("crypto error: {reason}")]
    CryptoError {
        /// Human-readable description of the cryptographic failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },

    /// JSON rendering or parsing failed.
    #[error("serialization error: {reason}")]
    SerializationError {
        /// Human-readable description of the serialization failure.
        reason: String,
    },
}

impl From<serde_json::Error> for BitmarkError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Signable trait
// ---------------------------------------------------------------------------

/// A value with a canonical packed form that an Ed25519 signature covers.
pub trait Signable {
    /// Packed bytes the signature is computed over.
    fn signable_bytes(&self) -> Vec<u8>;
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`BitmarkError`].
pub type Result<T> = std::result::Result<T, BitmarkError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
