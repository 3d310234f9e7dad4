//! Reply to a share grant.
//!
//! Accepting countersigns the grant by repeating its fields and
//! appending the grantor's signature:
//!
//! ```text
//! 0x09 ‖ lp(share_id) ‖ varint(quantity) ‖ lp(owner.pack())
//!      ‖ lp(receiver.pack()) ‖ varint(before_block) ‖ lp(grant_signature)
//! ```

use bitmark_account::Address;
use bitmark_crypto::signing::{MessageSigner, Signature};
use bitmark_types::{Network, Result, ShareId};
use serde::Serialize;

use crate::headers::UpdateOfferHeaders;
use crate::packing::{Packer, OPCODE_SHARE_GRANT};
use crate::params::grant::pack_grant_fields;
use crate::params::transfer_response::parse_signature;
use crate::params::ResponseAction;
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::{validate_link, validate_offer_id, validate_quantity};

// ---------------------------------------------------------------------------
// ShareGrantRecord
// ---------------------------------------------------------------------------

/// A pending share grant as reported by the ledger.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareGrantRecord {
    id: String,
    share_id: ShareId,
    quantity: u64,
    owner: Address,
    receiver: Address,
    before_block: u64,
    signature: Signature,
}

impl ShareGrantRecord {
    /// Wraps the fields of a pending grant.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::InvalidParameter`] if `id`
    /// is empty or `quantity` is zero.
    pub fn new(
        id: impl Into<String>,
        share_id: ShareId,
        quantity: u64,
        owner: Address,
        receiver: Address,
        before_block: u64,
        signature: Signature,
    ) -> Result<Self> {
        let id = id.into();
        validate_offer_id(&id)?;
        validate_quantity(quantity)?;
        Ok(Self {
            id,
            share_id,
            quantity,
            owner,
            receiver,
            before_block,
            signature,
        })
    }

    /// Parses the string fields the ledger returns.
    ///
    /// # Errors
    ///
    /// - [`bitmark_types::BitmarkError::InvalidParameter`] for a bad id,
    ///   share id, quantity or signature.
    /// - Any address error from [`Address::from_account_number`].
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        id: &str,
        share_id: &str,
        quantity: u64,
        owner: &str,
        receiver: &str,
        before_block: u64,
        signature: &str,
        network: Network,
    ) -> Result<Self> {
        Self::new(
            id,
            validate_link(share_id)?,
            quantity,
            Address::from_account_number(owner, network)?,
            Address::from_account_number(receiver, network)?,
            before_block,
            parse_signature(signature)?,
        )
    }

    /// Grant id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Share balance granted from.
    pub fn share_id(&self) -> &ShareId {
        &self.share_id
    }

    /// Number of shares granted.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Grantor.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Grantee.
    pub fn receiver(&self) -> &Address {
        &self.receiver
    }

    /// Expiry block height.
    pub fn before_block(&self) -> u64 {
        self.before_block
    }

    /// Grantor's signature over the grant.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

// ---------------------------------------------------------------------------
// Countersignature
// ---------------------------------------------------------------------------

/// The record the grantee signs to accept.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GrantCountersign {
    grant: ShareGrantRecord,
}

impl GrantCountersign {
    /// Countersignature record for `grant`.
    pub fn new(grant: ShareGrantRecord) -> UnsignedRecord<Self> {
        UnsignedRecord::new(Self { grant })
    }

    /// Grant being accepted.
    pub fn grant(&self) -> &ShareGrantRecord {
        &self.grant
    }
}

impl Packable for GrantCountersign {
    const OPCODE: u64 = OPCODE_SHARE_GRANT;
    const KIND: &'static str = "grant countersignature";

    fn pack_fields(&self, packer: &mut Packer) {
        let grant = &self.grant;
        pack_grant_fields(
            packer,
            &grant.share_id,
            grant.quantity,
            &grant.owner,
            &grant.receiver,
            grant.before_block,
        );
        packer.bytes(grant.signature.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// GrantResponse
// ---------------------------------------------------------------------------

/// Accept, reject or cancel a share grant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GrantResponse {
    /// Grantee takes the shares.
    Accept(SignedRecord<GrantCountersign>),
    /// Grantee declines.
    Reject(ShareGrantRecord),
    /// Grantor withdraws.
    Cancel(ShareGrantRecord),
}

impl GrantResponse {
    /// Accepts `grant`, countersigning with `signer`.
    pub fn accept<S: MessageSigner + ?Sized>(grant: ShareGrantRecord, signer: &S) -> Self {
        Self::Accept(GrantCountersign::new(grant).sign(signer))
    }

    /// Rejects `grant`.
    pub fn reject(grant: ShareGrantRecord) -> Self {
        Self::Reject(grant)
    }

    /// Withdraws `grant`.
    pub fn cancel(grant: ShareGrantRecord) -> Self {
        Self::Cancel(grant)
    }

    /// Which reply this is.
    pub fn action(&self) -> ResponseAction {
        match self {
            Self::Accept(_) => ResponseAction::Accept,
            Self::Reject(_) => ResponseAction::Reject,
            Self::Cancel(_) => ResponseAction::Cancel,
        }
    }

    /// Grant being answered.
    pub fn grant(&self) -> &ShareGrantRecord {
        match self {
            Self::Accept(record) => &record.params().grant,
            Self::Reject(grant) | Self::Cancel(grant) => grant,
        }
    }

    /// Countersignature, present only on accept.
    pub fn countersignature(&self) -> Option<&Signature> {
        match self {
            Self::Accept(record) => Some(record.signature()),
            _ => None,
        }
    }

    /// Account that must sign the request headers: the grantor when
    /// cancelling, the grantee otherwise.
    pub fn requester(&self) -> &Address {
        match self {
            Self::Cancel(grant) => &grant.owner,
            _ => &self.grant().receiver,
        }
    }

    /// Signs request headers at `time_ms`.
    pub fn headers<S: MessageSigner + ?Sized>(&self, signer: &S, time_ms: i64) -> UpdateOfferHeaders {
        UpdateOfferHeaders::sign(
            signer,
            &self.grant().id,
            &self.requester().account_number(),
            time_ms,
        )
    }

    /// Signs request headers at the current time.
    pub fn headers_now<S: MessageSigner + ?Sized>(&self, signer: &S) -> UpdateOfferHeaders {
        UpdateOfferHeaders::now(signer, &self.grant().id, &self.requester().account_number())
    }
}

#[derive(Serialize)]
struct ResponseJson<'a> {
    id: &'a str,
    action: ResponseAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    countersignature: Option<&'a Signature>,
}

impl ToJson for GrantResponse {
    fn to_json(&self) -> Result<String> {
        let body = ResponseJson {
            id: &self.grant().id,
            action: self.action(),
            countersignature: self.countersignature(),
        };
        Ok(serde_json::to_string(&body)?)
    }
}
