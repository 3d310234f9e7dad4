//! Conversion of a bitmark into fungible shares (opcode `0x08`).
//!
//! ```text
//! 0x08 ‖ lp(link) ‖ varint(quantity)
//! ```

use bitmark_crypto::signing::Signature;
use bitmark_types::{Link, Result};
use serde::Serialize;

use crate::packing::{Packer, OPCODE_SHARE};
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::{validate_link, validate_quantity};

/// Fields of a share record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Share {
    link: Link,
    quantity: u64,
}

impl Share {
    /// Splits the bitmark at `link` into `quantity` shares.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::InvalidParameter`] if
    /// `quantity` is zero.
    pub fn new(link: Link, quantity: u64) -> Result<UnsignedRecord<Self>> {
        validate_quantity(quantity)?;
        Ok(UnsignedRecord::new(Self { link, quantity }))
    }

    /// Same as [`Share::new`] with `link` in hex.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::InvalidParameter`] for a
    /// bad link or a zero quantity.
    pub fn from_hex(link: &str, quantity: u64) -> Result<UnsignedRecord<Self>> {
        Self::new(validate_link(link)?, quantity)
    }

    /// Bitmark being split.
    pub fn link(&self) -> &Link {
        &self.link
    }

    /// Number of shares created.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }
}

impl Packable for Share {
    const OPCODE: u64 = OPCODE_SHARE;
    const KIND: &'static str = "share";

    fn pack_fields(&self, packer: &mut Packer) {
        packer.bytes(self.link.as_bytes()).varint(self.quantity);
    }
}

#[derive(Serialize)]
struct ShareBody<'a> {
    share: ShareJson<'a>,
}

#[derive(Serialize)]
struct ShareJson<'a> {
    link: &'a Link,
    quantity: u64,
    signature: &'a Signature,
}

impl ToJson for SignedRecord<Share> {
    fn to_json(&self) -> Result<String> {
        let body = ShareBody {
            share: ShareJson {
                link: &self.params().link,
                quantity: self.params().quantity,
                signature: self.signature(),
            },
        };
        Ok(serde_json::to_string(&body)?)
    }
}
