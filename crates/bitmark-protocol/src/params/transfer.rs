//! Direct transfer of a bitmark (opcode `0x04`).
//!
//! ```text
//! 0x04 ‖ lp(link) ‖ 0x00 ‖ lp(owner.pack())
//! ```
//!
//! The `0x00` marks the absence of a payment.

use bitmark_account::Address;
use bitmark_crypto::signing::Signature;
use bitmark_types::{Link, Result};
use serde::Serialize;

use crate::packing::{Packer, NO_PAYMENT, OPCODE_TRANSFER};
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::validate_link;

/// Fields of a transfer record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transfer {
    link: Link,
    owner: Address,
}

impl Transfer {
    /// Builds a transfer of the bitmark whose latest record is `link`.
    pub fn new(link: Link, owner: Address) -> UnsignedRecord<Self> {
        UnsignedRecord::new(Self { link, owner })
    }

    /// Same as [`Transfer::new`] with `link` in hex.
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

    /// New owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }
}

impl Packable for Transfer {
    const OPCODE: u64 = OPCODE_TRANSFER;
    const KIND: &'static str = "transfer";

    fn pack_fields(&self, packer: &mut Packer) {
        packer
            .bytes(self.link.as_bytes())
            .raw_byte(NO_PAYMENT)
            .bytes(&self.owner.pack());
    }
}

#[derive(Serialize)]
struct TransferBody<'a> {
    transfer: TransferJson<'a>,
}

#[derive(Serialize)]
struct TransferJson<'a> {
    link: &'a Link,
    owner: &'a Address,
    signature: &'a Signature,
}

impl ToJson for SignedRecord<Transfer> {
    fn to_json(&self) -> Result<String> {
        let body = TransferBody {
            transfer: TransferJson {
                link: &self.params().link,
                owner: &self.params().owner,
                signature: self.signature(),
            },
        };
        Ok(serde_json::to_string(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitmark_crypto::signing::Keypair;
    use bitmark_types::Network;

    #[test]
    fn payment_byte_sits_between_link_and_owner() -> Result<()> {
        let owner = Address::from_public_key(Keypair::from_seed(&[6u8; 32]).public_key(), Network::Live);
        let record = Transfer::from_hex(&"ab".repeat(32), owner)?;
        let packed = record.params().pack();
        assert_eq!(&packed[..2], &[0x04, 0x20]);
        assert_eq!(packed[34], 0x00);
        assert_eq!(packed[35] as usize, owner.pack().len());
        assert_eq!(&packed[36..], owner.pack().as_slice());
        Ok(())
    }

    #[test]
    fn bad_link_rejected() {
        let owner = Address::from_public_key(Keypair::from_seed(&[6u8; 32]).public_key(), Network::Live);
        assert!(Transfer::from_hex("abcd", owner).is_err());
    }

    #[test]
    fn json_shape() -> Result<()> {
        let keypair = Keypair::from_seed(&[6u8; 32]);
        let owner = Address::from_public_key(keypair.public_key(), Network::Live);
        let signed = Transfer::from_hex(&"ab".repeat(32), owner)?.sign(&keypair);
        let json = signed.to_json()?;
        assert_eq!(
            json,
            format!(
                r#"{{"transfer":{{"link":"{}","owner":"{}","signature":"{}"}}}}"#,
                "ab".repeat(32),
                owner,
                signed.signature()
            )
        );
        Ok(())
    }
}
