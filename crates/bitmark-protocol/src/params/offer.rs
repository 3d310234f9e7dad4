//! Transfer offer (opcode `0x05`).
//!
//! An offer packs exactly like a transfer but under its own opcode; the
//! receiver must countersign it before the ledger accepts it. Free-form
//! `extra_info` travels with the request and is not signed.

use std::collections::BTreeMap;

use bitmark_account::Address;
use bitmark_crypto::signing::Signature;
use bitmark_types::{Link, Result};
use serde::Serialize;

use crate::packing::{Packer, NO_PAYMENT, OPCODE_TRANSFER_OFFER};
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::validate_link;

/// Fields of a transfer offer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferOffer {
    link: Link,
    owner: Address,
    extra_info: BTreeMap<String, String>,
}

impl TransferOffer {
    /// Offers the bitmark whose latest record is `link` to `owner`.
    pub fn new(link: Link, owner: Address) -> UnsignedRecord<Self> {
        Self::with_extra_info(link, owner, BTreeMap::new())
    }

    /// Same as [`TransferOffer::new`], carrying `extra_info`.
    pub fn with_extra_info(
        link: Link,
        owner: Address,
        extra_info: BTreeMap<String, String>,
    ) -> UnsignedRecord<Self> {
        UnsignedRecord::new(Self {
            link,
            owner,
            extra_info,
        })
    }

    /// Same as [`TransferOffer::new`] with `link` in hex.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::InvalidParameter`] unless
    /// `link` is 32 bytes of hex.
    pub fn from_hex(link: &str, owner: Address) -> Result<UnsignedRecord<Self>> {
        Ok(Self::new(validate_link(link)?, owner))
    }

    /// Previous record of the bitmark.
    pub fn link(&self) -> &Link {
        &self.link
    }

    /// Offered owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Unsigned data sent with the offer.
    pub fn extra_info(&self) -> &BTreeMap<String, String> {
        &self.extra_info
    }
}

impl Packable for TransferOffer {
    const OPCODE: u64 = OPCODE_TRANSFER_OFFER;
    const KIND: &'static str = "transfer offer";

    fn pack_fields(&self, packer: &mut Packer) {
        packer
            .bytes(self.link.as_bytes())
            .raw_byte(NO_PAYMENT)
            .bytes(&self.owner.pack());
    }
}

#[derive(Serialize)]
struct OfferBody<'a> {
    offer: OfferJson<'a>,
}

#[derive(Serialize)]
struct OfferJson<'a> {
    extra_info: &'a BTreeMap<String, String>,
    record: OfferRecordJson<'a>,
}

#[derive(Serialize)]
struct OfferRecordJson<'a> {
    link: &'a Link,
    owner: &'a Address,
    signature: &'a Signature,
}

impl ToJson for SignedRecord<TransferOffer> {
    fn to_json(&self) -> Result<String> {
        let params = self.params();
        let body = OfferBody {
            offer: OfferJson {
                extra_info: &params.extra_info,
                record: OfferRecordJson {
                    link: &params.link,
                    owner: &params.owner,
                    signature: self.signature(),
                },
            },
        };
        Ok(serde_json::to_string(&body)?)
    }
}
