//! Unsigned and signed records.
//!
//! A record's parameters are validated when it is built and never
//! change afterwards. Signing consumes an [`UnsignedRecord`] and yields
//! a [`SignedRecord`], so a record without a signature cannot reach
//! the JSON serializers at all.

use bitmark_crypto::signing::{verify, MessageSigner, PublicKey, Signature};
use bitmark_types::{BitmarkError, Result, Signable};

use crate::packing::Packer;

// ---------------------------------------------------------------------------
// Packable
// ---------------------------------------------------------------------------

/// Parameters of one ledger record.
pub trait Packable {
    /// Opcode written before the fields.
    const OPCODE: u64;

    /// Short name used in log lines and error messages.
    const KIND: &'static str;

    /// Writes the fields, in canonical order, after the opcode.
    fn pack_fields(&self, packer: &mut Packer);

    /// Returns the complete packed record.
    fn pack(&self) -> Vec<u8> {
        let mut packer = Packer::new(Self::OPCODE);
        self.pack_fields(&mut packer);
        packer.finish()
    }
}

/// Renders a signed record as the JSON body expected by the ledger API.
pub trait ToJson {
    /// Serializes to a compact JSON string.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::NotSigned`] if a required signature is missing.
    /// - [`BitmarkError::SerializationError`] if rendering fails.
    fn to_json(&self) -> Result<String>;
}

// ---------------------------------------------------------------------------
// UnsignedRecord
// ---------------------------------------------------------------------------

/// Validated parameters waiting for a signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsignedRecord<P> {
    params: P,
}

impl<P: Packable> UnsignedRecord<P> {
    /// Wraps validated parameters.
    pub fn new(params: P) -> Self {
        Self { params }
    }

    /// The record parameters.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Signs the packed bytes and returns the finished record.
    pub fn sign<S: MessageSigner + ?Sized>(self, signer: &S) -> SignedRecord<P> {
        let packed = self.signable_bytes();
        let signature = signer.sign(&packed);
        tracing::debug!(
            kind = P::KIND,
            len = packed.len(),
            signer = %signer.public_key(),
            "record signed"
        );
        SignedRecord {
            params: self.params,
            signature,
        }
    }
}

impl<P: Packable> Signable for UnsignedRecord<P> {
    fn signable_bytes(&self) -> Vec<u8> {
        self.params.pack()
    }
}

// ---------------------------------------------------------------------------
// SignedRecord
// ---------------------------------------------------------------------------

/// Parameters together with the signature over their packed form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedRecord<P> {
    params: P,
    signature: Signature,
}

impl<P: Packable> SignedRecord<P> {
    /// Reassembles a record from stored parts.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::NotSigned`] if `signature` is `None`.
    pub fn from_parts(params: P, signature: Option<Signature>) -> Result<Self> {
        let signature = signature.ok_or_else(|| BitmarkError::NotSigned {
            reason: format!("{} record has no signature", P::KIND),
        })?;
        Ok(Self { params, signature })
    }

    /// The record parameters.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// The detached signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The packed bytes the signature covers.
    pub fn packed(&self) -> Vec<u8> {
        self.params.pack()
    }

    /// Checks the signature against `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::CryptoError`] if it does not verify.
    pub fn verify(&self, public_key: &PublicKey) -> Result<()> {
        verify(public_key, &self.packed(), &self.signature)
    }

    /// Splits into parameters and signature.
    pub fn into_parts(self) -> (P, Signature) {
        (self.params, self.signature)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
