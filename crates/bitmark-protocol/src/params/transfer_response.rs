//! Reply to a transfer offer.
//!
//! Accepting countersigns the offer:
//!
//! ```text
//! 0x05 ‖ lp(link) ‖ 0x00 ‖ lp(owner.pack()) ‖ lp(offer_signature)
//! ```
//!
//! Rejecting and cancelling carry no signature of their own; they are
//! authorized by [`UpdateOfferHeaders`] alone.

use bitmark_account::Address;
use bitmark_crypto::signing::{MessageSigner, Signature};
use bitmark_types::{BitmarkError, Link, Network, Result};
use serde::Serialize;

use crate::headers::UpdateOfferHeaders;
use crate::packing::{Packer, NO_PAYMENT, OPCODE_TRANSFER_OFFER};
use crate::params::ResponseAction;
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::{validate_link, validate_offer_id};

// ---------------------------------------------------------------------------
// OfferRecord
// ---------------------------------------------------------------------------

/// A pending offer as reported by the ledger.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OfferRecord {
    id: String,
    link: Link,
    owner: Address,
    signature: Signature,
}

impl OfferRecord {
    /// Wraps the fields of a pending offer.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if `id`
    /// is empty.
    pub fn new(id: impl Into<String>, link: Link, owner: Address, signature: Signature) -> Result<Self> {
        let id = id.into();
        validate_offer_id(&id)?;
        Ok(Self {
            id,
            link,
            owner,
            signature,
        })
    }

    /// Parses the string fields the ledger returns.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidParameter`] for a bad id,
    ///   link or signature.
    /// - Any address error from [`Address::from_account_number`].
    pub fn parse(
        id: &str,
        link: &str,
        owner: &str,
        signature: &str,
        network: Network,
    ) -> Result<Self> {
        let link = validate_link(link)?;
        let owner = Address::from_account_number(owner, network)?;
        let signature = parse_signature(signature)?;
        Self::new(id, link, owner, signature)
    }

    /// Offer id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Previous record of the bitmark.
    pub fn link(&self) -> &Link {
        &self.link
    }

    /// Offered owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Sender's signature over the offer.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

pub(crate) fn parse_signature(signature: &str) -> Result<Signature> {
    signature
        .parse()
        .map_err(|e| BitmarkError::InvalidParameter {
            reason: format!("invalid signature: {e}"),
        })
}

// ---------------------------------------------------------------------------
// Countersignature
// ---------------------------------------------------------------------------

/// The record the offered owner signs to accept.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferCountersign {
    offer: OfferRecord,
}

impl TransferCountersign {
    /// Countersignature record for `offer`.
    pub fn new(offer: OfferRecord) -> UnsignedRecord<Self> {
        UnsignedRecord::new(Self { offer })
    }

    /// Offer being accepted.
    pub fn offer(&self) -> &OfferRecord {
        &self.offer
    }
}

impl Packable for TransferCountersign {
    const OPCODE: u64 = OPCODE_TRANSFER_OFFER;
    const KIND: &'static str = "transfer countersignature";

    fn pack_fields(&self, packer: &mut Packer) {
        packer
            .bytes(self.offer.link.as_bytes())
            .raw_byte(NO_PAYMENT)
            .bytes(&self.offer.owner.pack())
            .bytes(self.offer.signature.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// TransferResponse
// ---------------------------------------------------------------------------

/// Accept, reject or cancel a transfer offer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransferResponse {
    /// Offered owner takes the bitmark.
    Accept(SignedRecord<TransferCountersign>),
    /// Offered owner declines.
    Reject(OfferRecord),
    /// Sender withdraws the offer.
    Cancel {
        /// The offer being withdrawn.
        offer: OfferRecord,
        /// Sender, who still owns the bitmark.
        current_owner: Address,
    },
}

impl TransferResponse {
    /// Accepts `offer`, countersigning with `signer`.
    pub fn accept<S: MessageSigner + ?Sized>(offer: OfferRecord, signer: &S) -> Self {
        Self::Accept(TransferCountersign::new(offer).sign(signer))
    }

    /// Rejects `offer`.
    pub fn reject(offer: OfferRecord) -> Self {
        Self::Reject(offer)
    }

    /// Withdraws `offer` on behalf of `current_owner`.
    pub fn cancel(offer: OfferRecord, current_owner: Address) -> Self {
        Self::Cancel {
            offer,
            current_owner,
        }
    }

    /// Which reply this is.
    pub fn action(&self) -> ResponseAction {
        match self {
            Self::Accept(_) => ResponseAction::Accept,
            Self::Reject(_) => ResponseAction::Reject,
            Self::Cancel { .. } => ResponseAction::Cancel,
        }
    }

    /// Offer being answered.
    pub fn offer(&self) -> &OfferRecord {
        match self {
            Self::Accept(record) => &record.params().offer,
            Self::Reject(offer) | Self::Cancel { offer, .. } => offer,
        }
    }

    /// Countersignature, present only on accept.
    pub fn countersignature(&self) -> Option<&Signature> {
        match self {
            Self::Accept(record) => Some(record.signature()),
            _ => None,
        }
    }

    /// Account that must sign the request headers.
    pub fn requester(&self) -> &Address {
        match self {
            Self::Cancel { current_owner, .. } => current_owner,
            _ => &self.offer().owner,
        }
    }

    /// Signs request headers at `time_ms`.
    pub fn headers<S: MessageSigner + ?Sized>(&self, signer: &S, time_ms: i64) -> UpdateOfferHeaders {
        UpdateOfferHeaders::sign(
            signer,
            &self.offer().id,
            &self.requester().account_number(),
            time_ms,
        )
    }

    /// Signs request headers at the current time.
    pub fn headers_now<S: MessageSigner + ?Sized>(&self, signer: &S) -> UpdateOfferHeaders {
        UpdateOfferHeaders::now(signer, &self.offer().id, &self.requester().account_number())
    }
}

#[derive(Serialize)]
struct ResponseJson<'a> {
    action: ResponseAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    countersignature: Option<&'a Signature>,
    id: &'a str,
}

impl ToJson for TransferResponse {
    fn to_json(&self) -> Result<String> {
        let body = ResponseJson {
            action: self.action(),
            countersignature: self.countersignature(),
            id: &self.offer().id,
        };
        Ok(serde_json::to_string(&body)?)
    }
}
