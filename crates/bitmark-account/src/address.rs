//! Account numbers: a public key bound to a network.
//!
//! ```text
//! account number = Base58(prefix ‖ public key (32) ‖ checksum (4))
//! prefix         = varint(0x10 | 0x01 | network << 1)
//! ```
//!
//! `0x10` is the Ed25519 key type and `0x01` marks a public key, so
//! the prefix is `0x11` on the live network and `0x13` on the test
//! network. The checksum is the first four bytes of
//! `SHA3-256(prefix ‖ public key)`.

use std::fmt;

use bitmark_crypto::checksum::{append_checksum, verify_checksum, CHECKSUM_LEN};
use bitmark_crypto::signing::PublicKey;
use bitmark_crypto::varint::{decode_varint, encode_varint};
use bitmark_types::{BitmarkError, Network, Result};

/// Key type bits for Ed25519.
const KEY_TYPE_ED25519: u64 = 0x01 << 4;

/// Key part bit marking a public key.
const KEY_PART_PUBLIC: u64 = 0x01;

/// Bits 2 and 3 of the key variant are unassigned.
const KEY_VARIANT_RESERVED: u64 = 0x0c;

/// Ledger address of an account.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Address {
    public_key: PublicKey,
    network: Network,
}

impl Address {
    /// Binds `public_key` to `network`.
    pub fn from_public_key(public_key: PublicKey, network: Network) -> Self {
        Self {
            public_key,
            network,
        }
    }

    /// Parses and fully validates an account number.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidAddress`] if the string is not Base58,
    ///   has the wrong length or a non-minimal prefix, names a key type
    ///   other than Ed25519, or does not carry a public key.
    /// - [`BitmarkError::InvalidChecksum`] on checksum mismatch.
    /// - [`BitmarkError::InvalidNetwork`] if the address belongs to a
    ///   network other than `network`.
    pub fn from_account_number(account_number: &str, network: Network) -> Result<Self> {
        let bytes = bs58::decode(account_number)
            .into_vec()
            .map_err(|e| BitmarkError::InvalidAddress {
                reason: format!("account number is not valid base58: {e}"),
            })?;

        let (key_variant, prefix_len) = decode_varint(&bytes).map_err(|e| {
            BitmarkError::InvalidAddress {
                reason: format!("unreadable key variant: {e}"),
            }
        })?;

        if bytes[..prefix_len] != encode_varint(key_variant)[..] {
            return Err(BitmarkError::InvalidAddress {
                reason: "key variant prefix is not minimally encoded".into(),
            });
        }

        let expected_len = prefix_len + PublicKey::LEN + CHECKSUM_LEN;
        if bytes.len() != expected_len {
            return Err(BitmarkError::InvalidAddress {
                reason: format!(
                    "account number is {} bytes, expected {expected_len}",
                    bytes.len()
                ),
            });
        }

        let payload = verify_checksum(&bytes)?;

        if key_variant >> 4 != KEY_TYPE_ED25519 >> 4 || key_variant & KEY_VARIANT_RESERVED != 0 {
            return Err(BitmarkError::InvalidAddress {
                reason: format!("key variant {key_variant:#x} is not an Ed25519 key"),
            });
        }

        if key_variant & 0x01 != KEY_PART_PUBLIC {
            return Err(BitmarkError::InvalidAddress {
                reason: format!("key variant {key_variant:#x} is not a public key"),
            });
        }

        let found = Network::from_tag((key_variant >> 1) & 0x01)?;
        if found != network {
            return Err(BitmarkError::InvalidNetwork {
                reason: format!("account number belongs to {found}, expected {network}"),
            });
        }

        let public_key = PublicKey::from_slice(&payload[prefix_len..])?;
        Ok(Self {
            public_key,
            network: found,
        })
    }

    /// Returns `true` if `account_number` parses for `network`.
    ///
    /// Never fails.
    pub fn is_valid_account_number(account_number: &str, network: Network) -> bool {
        Self::from_account_number(account_number, network).is_ok()
    }

    /// Varint-encoded key variant prefix.
    pub fn prefix(&self) -> Vec<u8> {
        encode_varint(KEY_TYPE_ED25519 | KEY_PART_PUBLIC | (self.network.tag() << 1))
    }

    /// `prefix ‖ public key`, the form embedded in packed records.
    pub fn pack(&self) -> Vec<u8> {
        let mut out = self.prefix();
        out.extend_from_slice(self.public_key.as_bytes());
        out
    }

    /// Renders the Base58 account number.
    pub fn account_number(&self) -> String {
        bs58::encode(append_checksum(&self.pack())).into_string()
    }

    /// The bound public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The bound network.
    pub fn network(&self) -> Network {
        self.network
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.account_number())
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.account_number())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
