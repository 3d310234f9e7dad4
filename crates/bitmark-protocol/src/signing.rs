//! Network-aware signers and record verification.
//!
//! Some records embed the signer's own address (the registrant of an
//! asset), which needs the network as well as the public key. A
//! [`RecordSigner`] supplies both.

use bitmark_account::{Account, Address};
use bitmark_crypto::signing::{Keypair, MessageSigner, PublicKey, Signature};
use bitmark_types::{Network, Result};

use crate::record::{Packable, SignedRecord};

// ---------------------------------------------------------------------------
// RecordSigner
// ---------------------------------------------------------------------------

/// A message signer bound to a network.
pub trait RecordSigner: MessageSigner {
    /// Network the signer's address lives on.
    fn network(&self) -> Network;

    /// Address of the signer.
    fn address(&self) -> Address {
        Address::from_public_key(self.public_key(), self.network())
    }
}

impl RecordSigner for Account {
    fn network(&self) -> Network {
        Account::network(self)
    }

    fn address(&self) -> Address {
        *Account::address(self)
    }
}

/// Borrows a bare [`Keypair`] as a signer on `network`.
pub struct KeypairSigner<'a> {
    keypair: &'a Keypair,
    network: Network,
}

impl<'a> KeypairSigner<'a> {
    /// Binds `keypair` to `network`.
    pub fn new(keypair: &'a Keypair, network: Network) -> Self {
        Self { keypair, network }
    }
}

impl MessageSigner for KeypairSigner<'_> {
    fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        self.keypair.sign(message)
    }
}

impl RecordSigner for KeypairSigner<'_> {
    fn network(&self) -> Network {
        self.network
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verifies a record against the account that should have signed it.
///
/// # Errors
///
/// - [`bitmark_types::BitmarkError::CryptoError`] if the signature
///   does not verify.
pub fn verify_record<P: Packable>(record: &SignedRecord<P>, signer: &Address) -> Result<()> {
    record.verify(signer.public_key())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
