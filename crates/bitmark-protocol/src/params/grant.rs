//! Share grant (opcode `0x09`).
//!
//! Offers part of a share balance to another account. The receiver
//! countersigns before the grant takes effect, and it expires at
//! `before_block`.
//!
//! ```text
//! 0x09 ‖ lp(share_id) ‖ varint(quantity) ‖ lp(owner.pack())
//!      ‖ lp(receiver.pack()) ‖ varint(before_block)
//! ```

use std::collections::BTreeMap;

use bitmark_account::Address;
use bitmark_crypto::signing::Signature;
use bitmark_types::{Result, ShareId};
use serde::Serialize;

use crate::packing::{Packer, OPCODE_SHARE_GRANT};
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::{validate_link, validate_quantity};

/// Fields of a share grant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareGrant {
    share_id: ShareId,
    quantity: u64,
    owner: Address,
    receiver: Address,
    before_block: u64,
    extra_info: BTreeMap<String, String>,
}

impl ShareGrant {
    /// Grants `quantity` shares of `share_id` from `owner` to
    /// `receiver`, valid until `before_block`.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::InvalidParameter`] if
    /// `quantity` is zero.
    pub fn new(
        share_id: ShareId,
        quantity: u64,
        owner: Address,
        receiver: Address,
        before_block: u64,
    ) -> Result<UnsignedRecord<Self>> {
        Self::with_extra_info(share_id, quantity, owner, receiver, before_block, BTreeMap::new())
    }

    /// Same as [`ShareGrant::new`], carrying unsigned `extra_info`.
    ///
    /// # Errors
    ///
    /// Same as [`ShareGrant::new`].
    pub fn with_extra_info(
        share_id: ShareId,
        quantity: u64,
        owner: Address,
        receiver: Address,
        before_block: u64,
        extra_info: BTreeMap<String, String>,
    ) -> Result<UnsignedRecord<Self>> {
        validate_quantity(quantity)?;
        Ok(UnsignedRecord::new(Self {
            share_id,
            quantity,
            owner,
            receiver,
            before_block,
            extra_info,
        }))
    }

    /// Same as [`ShareGrant::new`] with `share_id` in hex.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::InvalidParameter`] for a
    /// share id that is not 32 bytes of hex, or a zero quantity.
    pub fn from_hex(
        share_id: &str,
        quantity: u64,
        owner: Address,
        receiver: Address,
        before_block: u64,
    ) -> Result<UnsignedRecord<Self>> {
        Self::new(validate_link(share_id)?, quantity, owner, receiver, before_block)
    }

    /// Share balance being granted from.
    pub fn share_id(&self) -> &ShareId {
        &self.share_id
    }

    /// Number of shares granted.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Current holder of the shares.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Account receiving the shares.
    pub fn receiver(&self) -> &Address {
        &self.receiver
    }

    /// Block height the grant expires at.
    pub fn before_block(&self) -> u64 {
        self.before_block
    }

    /// Unsigned data sent with the grant.
    pub fn extra_info(&self) -> &BTreeMap<String, String> {
        &self.extra_info
    }
}

/// Writes the signed grant fields; the countersignature repeats them.
pub(crate) fn pack_grant_fields(
    packer: &mut Packer,
    share_id: &ShareId,
    quantity: u64,
    owner: &Address,
    receiver: &Address,
    before_block: u64,
) {
    packer
        .bytes(share_id.as_bytes())
        .varint(quantity)
        .bytes(&owner.pack())
        .bytes(&receiver.pack())
        .varint(before_block);
}

impl Packable for ShareGrant {
    const OPCODE: u64 = OPCODE_SHARE_GRANT;
    const KIND: &'static str = "share grant";

    fn pack_fields(&self, packer: &mut Packer) {
        pack_grant_fields(
            packer,
            &self.share_id,
            self.quantity,
            &self.owner,
            &self.receiver,
            self.before_block,
        );
    }
}

#[derive(Serialize)]
struct GrantBody<'a> {
    record: GrantJson<'a>,
    extra_info: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GrantJson<'a> {
    share_id: &'a ShareId,
    quantity: u64,
    owner: &'a Address,
    recipient: &'a Address,
    before_block: u64,
    signature: &'a Signature,
}

impl ToJson for SignedRecord<ShareGrant> {
    fn to_json(&self) -> Result<String> {
        let params = self.params();
        let body = GrantBody {
            record: GrantJson {
                share_id: &params.share_id,
                quantity: params.quantity,
                owner: &params.owner,
                recipient: &params.receiver,
                before_block: params.before_block,
                signature: self.signature(),
            },
            extra_info: &params.extra_info,
        };
        Ok(serde_json::to_string(&body)?)
    }
}
