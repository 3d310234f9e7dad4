//! Asset registration (opcode `0x02`).
//!
//! ```text
//! 0x02 ‖ lp(name) ‖ lp(fingerprint) ‖ lp(metadata) ‖ lp(registrant.pack())
//! ```
//!
//! The registrant is always the signer, so it is filled in when the
//! record is signed rather than supplied by the caller.

use std::path::Path;

use bitmark_account::Address;
use bitmark_types::{BitmarkError, Result};
use serde::Serialize;

use crate::fingerprint::{
    compute_fingerprint, compute_fingerprint_multi, fingerprint_from_file, fingerprint_from_files,
};
use crate::packing::{Packer, OPCODE_REGISTRATION};
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::signing::RecordSigner;
use crate::validation::{validate_asset_name, validate_metadata};

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Ordered key/value metadata attached to an asset.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry; insertion order is packing order.
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Entries in packing order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// `key\0value\0key\0value`, as packed and sent.
    pub fn packed(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}\0{v}"))
            .collect::<Vec<_>>()
            .join("\0")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Fields of a registration record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registration {
    name: String,
    fingerprint: String,
    metadata: Metadata,
    registrant: Address,
}

impl Registration {
    /// Asset name, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content fingerprint.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Asset metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Account registering the asset.
    pub fn registrant(&self) -> &Address {
        &self.registrant
    }
}

impl Packable for Registration {
    const OPCODE: u64 = OPCODE_REGISTRATION;
    const KIND: &'static str = "registration";

    fn pack_fields(&self, packer: &mut Packer) {
        packer
            .string(&self.name)
            .string(&self.fingerprint)
            .string(&self.metadata.packed())
            .bytes(&self.registrant.pack());
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects registration fields before signing.
#[derive(Clone, Debug)]
pub struct RegistrationBuilder {
    name: String,
    metadata: Metadata,
    fingerprint: Option<String>,
}

impl RegistrationBuilder {
    /// Starts a registration with `name` and `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if the name or the
    /// metadata is too long.
    pub fn new(name: impl Into<String>, metadata: Metadata) -> Result<Self> {
        let name = name.into();
        validate_asset_name(&name)?;
        validate_metadata(&metadata.packed())?;
        Ok(Self {
            name,
            metadata,
            fingerprint: None,
        })
    }

    /// Uses a precomputed fingerprint.
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Fingerprints one piece of content.
    pub fn fingerprint_from_data(self, content: &[u8]) -> Self {
        self.fingerprint(compute_fingerprint(content))
    }

    /// Fingerprints several pieces of content.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if `contents` is empty.
    pub fn fingerprint_from_many<T: AsRef<[u8]>>(self, contents: &[T]) -> Result<Self> {
        Ok(self.fingerprint(compute_fingerprint_multi(contents)?))
    }

    /// Fingerprints a file.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if it cannot be read.
    pub fn fingerprint_from_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        Ok(self.fingerprint(fingerprint_from_file(path)?))
    }

    /// Fingerprints several files.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if `paths` is empty or
    /// a file cannot be read.
    pub fn fingerprint_from_files<P: AsRef<Path>>(self, paths: &[P]) -> Result<Self> {
        Ok(self.fingerprint(fingerprint_from_files(paths)?))
    }

    /// Finishes the record for `registrant`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if no fingerprint was
    /// set.
    pub fn build(self, registrant: Address) -> Result<UnsignedRecord<Registration>> {
        let fingerprint = match self.fingerprint {
            Some(fp) if !fp.is_empty() => fp,
            _ => {
                return Err(BitmarkError::InvalidParameter {
                    reason: "registration is missing a fingerprint".into(),
                })
            }
        };
        Ok(UnsignedRecord::new(Registration {
            name: self.name,
            fingerprint,
            metadata: self.metadata,
            registrant,
        }))
    }

    /// Builds with the signer as registrant and signs.
    ///
    /// # Errors
    ///
    /// Same as [`RegistrationBuilder::build`].
    pub fn sign<S: RecordSigner + ?Sized>(self, signer: &S) -> Result<SignedRecord<Registration>> {
        Ok(self.build(signer.address())?.sign(signer))
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct AssetsBody<'a> {
    assets: [AssetJson<'a>; 1],
}

#[derive(Serialize)]
struct AssetJson<'a> {
    fingerprint: &'a str,
    name: &'a str,
    metadata: String,
    registrant: &'a Address,
    signature: &'a bitmark_crypto::signing::Signature,
}

impl ToJson for SignedRecord<Registration> {
    fn to_json(&self) -> Result<String> {
        let params = self.params();
        let body = AssetsBody {
            assets: [AssetJson {
                fingerprint: &params.fingerprint,
                name: &params.name,
                metadata: params.metadata.packed(),
                registrant: &params.registrant,
                signature: self.signature(),
            }],
        };
        Ok(serde_json::to_string(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
