//! Account authentication keys.
//!
//! Every Bitmark record is authorized by a detached Ed25519 signature
//! over its packed bytes. `ed25519-dalek` zeroizes the secret half when
//! a [`Keypair`] is dropped.
//!
//! Record signing is generic over [`MessageSigner`], implemented here by
//! [`Keypair`] and elsewhere by accounts.

use std::fmt;
use std::str::FromStr;

use bitmark_types::{BitmarkError, Result};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::random::EntropySource;

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// Authentication public key, the key an account number encodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Key length in bytes.
    pub const LEN: usize = 32;

    /// Wraps raw key bytes without checking they are a curve point.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a [`PublicKey`] from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if `bytes` is not exactly
    /// 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| BitmarkError::CryptoError {
            reason: format!("expected {} byte public key, got {}", Self::LEN, bytes.len()),
        })?;
        Ok(Self(arr))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for PublicKey {
    type Err = BitmarkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| BitmarkError::CryptoError {
            reason: "invalid hex encoding for public key".into(),
        })?;
        Self::from_slice(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Detached record signature.
///
/// Serializes as a lowercase hex string, the form used in every JSON
/// request body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Signature length in bytes.
    pub const LEN: usize = 64;

    /// Wraps raw signature bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Signature {
    type Err = BitmarkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| BitmarkError::CryptoError {
            reason: "invalid hex encoding for signature".into(),
        })?;
        let arr: [u8; 64] = bytes.as_slice().try_into().map_err(|_| BitmarkError::CryptoError {
            reason: format!("expected {} byte signature, got {}", Self::LEN, bytes.len()),
        })?;
        Ok(Self(arr))
    }
}

impl serde::Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// MessageSigner
// ---------------------------------------------------------------------------

/// Anything that can produce Ed25519 signatures for a fixed public key.
pub trait MessageSigner {
    /// Public half of the signing key.
    fn public_key(&self) -> PublicKey;

    /// Signs `message` and returns the detached signature.
    fn sign(&self, message: &[u8]) -> Signature;
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// Authentication key pair of an account.
///
/// Derived from the seed; see `bitmark_crypto::kdf`.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Fresh key pair from the OS generator.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Generates a keypair from 32 bytes drawn from `source`.
    pub fn generate_from<E: EntropySource + ?Sized>(source: &mut E) -> Self {
        let mut seed = [0u8; 32];
        source.fill(&mut seed);
        let keypair = Self::from_seed(&seed);
        seed.zeroize();
        keypair
    }

    /// Key pair whose Ed25519 seed is `seed`.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstructs a keypair from the 64-byte `seed ‖ public key` form.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if the length is wrong or
    /// the public half does not belong to the seed.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: &[u8; 64] = bytes.try_into().map_err(|_| BitmarkError::CryptoError {
            reason: format!("expected 64 byte private key, got {}", bytes.len()),
        })?;
        let signing_key =
            SigningKey::from_keypair_bytes(arr).map_err(|e| BitmarkError::CryptoError {
                reason: format!("inconsistent keypair bytes: {e}"),
            })?;
        Ok(Self { signing_key })
    }

    /// Public half.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Detached signature over `message`. Same key and message, same
    /// signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature(sig.to_bytes())
    }

    /// Ed25519 seed. The copy is secret; zeroize it after use.
    pub fn seed_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// `seed ‖ public key`, the 64-byte private key form other Bitmark
    /// SDKs store. Secret.
    pub fn to_keypair_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }
}

impl MessageSigner for Keypair {
    fn public_key(&self) -> PublicKey {
        Keypair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Signature {
        Keypair::sign(self, message)
    }
}

// No Clone or Debug on Keypair: the secret is never copied or logged.

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Strict Ed25519 verification of `signature` over `message`.
///
/// # Errors
///
/// Returns [`BitmarkError::CryptoError`] if the key is not a valid
/// curve point or the signature does not verify.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> Result<()> {
    let vk = VerifyingKey::from_bytes(&public_key.0).map_err(|e| BitmarkError::CryptoError {
        reason: format!("public key is not a curve point: {e}"),
    })?;
    let raw = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify_strict(message, &raw).map_err(|e| BitmarkError::CryptoError {
        reason: format!("bad signature: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_key_signs_and_verifies() {
        let key = Keypair::generate();
        let record = [0x04, 0x20, 0xAA];
        let signature = key.sign(&record);
        assert!(verify(&key.public_key(), &record, &signature).is_ok());
    }

    #[test]
    fn same_seed_same_signature() {
        let a = Keypair::from_seed(&[0x42; 32]);
        let b = Keypair::from_seed(&[0x42; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(b"packed"), b.sign(b"packed"));
    }

    #[test]
    fn tampered_record_rejected() {
        let key = Keypair::from_seed(&[0x05; 32]);
        let signature = key.sign(&[0x04, 0x01]);
        assert!(verify(&key.public_key(), &[0x04, 0x02], &signature).is_err());
    }

    #[test]
    fn other_account_rejected() {
        let signer = Keypair::from_seed(&[0x05; 32]);
        let other = Keypair::from_seed(&[0x06; 32]);
        let signature = signer.sign(b"transfer");
        assert!(verify(&other.public_key(), b"transfer", &signature).is_err());
    }

    #[test]
    fn keypair_bytes_roundtrip() -> Result<()> {
        let key = Keypair::from_seed(&[0x07; 32]);
        let private = key.to_keypair_bytes();
        assert_eq!(&private[..32], &key.seed_bytes());
        assert_eq!(private[32..], key.public_key().as_bytes()[..]);

        let restored = Keypair::from_keypair_bytes(&private)?;
        assert_eq!(restored.public_key(), key.public_key());
        Ok(())
    }

    #[test]
    fn mismatched_keypair_bytes_rejected() {
        let mut full = Keypair::from_seed(&[0x07; 32]).to_keypair_bytes();
        full[40] ^= 0x01;
        assert!(Keypair::from_keypair_bytes(&full).is_err());
        assert!(Keypair::from_keypair_bytes(&full[..32]).is_err());
    }

    #[test]
    fn generate_from_uses_source() {
        let mut fixed = crate::random::FixedEntropy::new(vec![0x42; 32]);
        let kp = Keypair::generate_from(&mut fixed);
        assert_eq!(kp.public_key(), Keypair::from_seed(&[0x42; 32]).public_key());
    }

    #[test]
    fn signature_hex_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sig = Keypair::from_seed(&[0x01; 32]).sign(b"x");
        let json = serde_json::to_string(&sig)?;
        assert_eq!(json, format!("\"{sig}\""));
        let back: Signature = serde_json::from_str(&json)?;
        assert_eq!(back, sig);
        Ok(())
    }

    #[test]
    fn signer_trait_matches_inherent_methods() {
        fn sign_via<S: MessageSigner>(signer: &S) -> (PublicKey, Signature) {
            (signer.public_key(), signer.sign(b"trait"))
        }
        let kp = Keypair::from_seed(&[0x09; 32]);
        let (pk, sig) = sign_via(&kp);
        assert_eq!(pk, kp.public_key());
        assert_eq!(sig, kp.sign(b"trait"));
    }
}
