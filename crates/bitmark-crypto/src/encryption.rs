//! X25519 encryption keypair.
//!
//! Every account owns a second keypair, separate from its Ed25519
//! authentication pair, used for Curve25519 box encryption of asset
//! payloads. The private half is the raw 32 derived bytes; clamping
//! happens inside scalar multiplication, exactly as NaCl `box` does.

use std::fmt;

use bitmark_types::{BitmarkError, Result};
use zeroize::Zeroize;

use crate::random::EntropySource;

// ---------------------------------------------------------------------------
// EncryptionPublicKey
// ---------------------------------------------------------------------------

/// X25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncryptionPublicKey(x25519_dalek::PublicKey);

impl EncryptionPublicKey {
    /// Fixed byte length of an X25519 public key.
    pub const LEN: usize = 32;

    /// Creates a key from its 32-byte Montgomery-form representation.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(x25519_dalek::PublicKey::from(bytes))
    }

    /// Returns the raw 32-byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for EncryptionPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// SharedSecret
// ---------------------------------------------------------------------------

/// Raw X25519 shared secret (32 bytes). Zeroized on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Returns the raw 32-byte shared secret.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// EncryptionKeypair
// ---------------------------------------------------------------------------

/// X25519 keypair used for payload encryption.
///
/// The underlying [`StaticSecret`](x25519_dalek::StaticSecret) zeroizes
/// its memory on drop.
pub struct EncryptionKeypair {
    secret: x25519_dalek::StaticSecret,
}

impl EncryptionKeypair {
    /// Fixed byte length of the private key.
    pub const PRIVATE_KEY_LEN: usize = 32;

    /// Builds a keypair from raw 32-byte private key material.
    pub fn from_private_bytes(bytes: [u8; 32]) -> Self {
        Self {
            secret: x25519_dalek::StaticSecret::from(bytes),
        }
    }

    /// Builds a keypair from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if `bytes` is not exactly
    /// 32 bytes long.
    pub fn from_private_slice(bytes: &[u8]) -> Result<Self> {
        let mut arr: [u8; 32] = bytes.try_into().map_err(|_| BitmarkError::CryptoError {
            reason: format!(
                "expected {} byte encryption key, got {}",
                Self::PRIVATE_KEY_LEN,
                bytes.len()
            ),
        })?;
        let keypair = Self::from_private_bytes(arr);
        arr.zeroize();
        Ok(keypair)
    }

    /// Generates a keypair from 32 bytes drawn from `source`.
    pub fn generate_from<E: EntropySource + ?Sized>(source: &mut E) -> Self {
        let mut bytes = [0u8; 32];
        source.fill(&mut bytes);
        let keypair = Self::from_private_bytes(bytes);
        bytes.zeroize();
        keypair
    }

    /// Derives the public key.
    pub fn public_key(&self) -> EncryptionPublicKey {
        EncryptionPublicKey(x25519_dalek::PublicKey::from(&self.secret))
    }

    /// Returns the raw private key bytes as supplied at construction.
    ///
    /// # Security
    ///
    /// Callers **must** zeroize the copy when done.
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Computes the shared secret with a peer's public key.
    pub fn shared_secret(&self, their_public: &EncryptionPublicKey) -> SharedSecret {
        let raw = self.secret.diffie_hellman(&their_public.0);
        SharedSecret(*raw.as_bytes())
    }
}

// EncryptionKeypair does not implement Clone or Debug.

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out).unwrap_or_else(|e| panic!("bad fixture hex: {e}"));
        out
    }

    /// RFC 7748 §6.1.
    #[test]
    fn rfc7748_key_agreement() {
        let alice = EncryptionKeypair::from_private_bytes(hex32(
            "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
        ));
        let bob = EncryptionKeypair::from_private_bytes(hex32(
            "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb",
        ));

        assert_eq!(
            alice.public_key().to_string(),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
        assert_eq!(
            bob.public_key().to_string(),
            "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f"
        );

        let ab = alice.shared_secret(&bob.public_key());
        let ba = bob.shared_secret(&alice.public_key());
        assert_eq!(ab.as_bytes(), ba.as_bytes());
        assert_eq!(
            hex::encode(ab.as_bytes()),
            "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742"
        );
    }

    #[test]
    fn private_bytes_are_kept_unclamped() {
        let raw = [0xFF; 32];
        let kp = EncryptionKeypair::from_private_bytes(raw);
        assert_eq!(kp.private_key_bytes(), raw);
    }

    #[test]
    fn slice_matches_array_constructor() -> Result<()> {
        let raw = [0x21; 32];
        let from_slice = EncryptionKeypair::from_private_slice(&raw)?;
        let from_array = EncryptionKeypair::from_private_bytes(raw);
        assert_eq!(from_slice.public_key(), from_array.public_key());
        assert!(EncryptionKeypair::from_private_slice(&[0u8; 31]).is_err());
        assert!(EncryptionKeypair::from_private_slice(&[0u8; 33]).is_err());
        Ok(())
    }

    #[test]
    fn generate_from_draws_private_key() {
        let mut source = crate::random::FixedEntropy::new((1u8..=32).collect());
        let kp = EncryptionKeypair::generate_from(&mut source);
        let expected: Vec<u8> = (1u8..=32).collect();
        assert_eq!(kp.private_key_bytes().to_vec(), expected);

        let peer = EncryptionKeypair::from_private_bytes([0x33; 32]);
        assert_eq!(
            kp.shared_secret(&peer.public_key()).as_bytes(),
            peer.shared_secret(&kp.public_key()).as_bytes()
        );
    }
}
