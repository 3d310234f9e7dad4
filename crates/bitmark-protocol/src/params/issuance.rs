//! Issuance of bitmarks for a registered asset (opcode `0x03`).
//!
//! One request issues one bitmark per nonce; each is packed and signed
//! on its own:
//!
//! ```text
//! 0x03 ‖ lp(asset_id) ‖ lp(owner.pack()) ‖ varint(nonce)
//! ```

use bitmark_account::Address;
use bitmark_crypto::signing::{MessageSigner, Signature};
use bitmark_types::{BitmarkError, Result};
use serde::Serialize;

use crate::nonce::{generate_nonces, NonceSet};
use crate::packing::{Packer, OPCODE_ISSUANCE};
use crate::record::{Packable, SignedRecord, ToJson, UnsignedRecord};
use crate::validation::{validate_asset_id, validate_quantity};

/// A single issued bitmark.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    asset_id: Vec<u8>,
    owner: Address,
    nonce: u64,
}

impl Issue {
    /// Hex asset id.
    pub fn asset_id(&self) -> String {
        hex::encode(&self.asset_id)
    }

    /// Account receiving the bitmark.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Nonce distinguishing this bitmark from its siblings.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

impl Packable for Issue {
    const OPCODE: u64 = OPCODE_ISSUANCE;
    const KIND: &'static str = "issuance";

    fn pack_fields(&self, packer: &mut Packer) {
        packer
            .bytes(&self.asset_id)
            .bytes(&self.owner.pack())
            .varint(self.nonce);
    }
}

// ---------------------------------------------------------------------------
// IssuanceParams
// ---------------------------------------------------------------------------

/// Validated issuance request: one asset, one owner, distinct nonces.
#[derive(Clone, Debug)]
pub struct IssuanceParams {
    asset_id: Vec<u8>,
    owner: Address,
    nonces: NonceSet,
}

impl IssuanceParams {
    /// Issues `quantity` bitmarks with random nonces.
    ///
    /// A genesis issuance (the first for an asset) starts at nonce `0`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] if the asset id is not
    /// 1 to 64 bytes of hex, or `quantity` is zero.
    pub fn new(asset_id: &str, owner: Address, quantity: usize, genesis: bool) -> Result<Self> {
        validate_quantity(quantity as u64)?;
        let nonces = generate_nonces(quantity, genesis)?;
        Self::with_nonces(asset_id, owner, nonces)
    }

    /// Issues one bitmark per nonce in `nonces`.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidParameter`] for a bad asset id.
    /// - [`BitmarkError::InvalidNonce`] if `nonces` is empty.
    pub fn with_nonces(asset_id: &str, owner: Address, nonces: NonceSet) -> Result<Self> {
        let asset_id = validate_asset_id(asset_id)?;
        if nonces.is_empty() {
            return Err(BitmarkError::InvalidNonce {
                reason: "issuance needs at least one nonce".into(),
            });
        }
        Ok(Self {
            asset_id,
            owner,
            nonces,
        })
    }

    /// Nonces in packing order.
    pub fn nonces(&self) -> &[u64] {
        self.nonces.as_slice()
    }

    /// One unsigned record per nonce.
    pub fn records(&self) -> Vec<UnsignedRecord<Issue>> {
        self.nonces
            .as_slice()
            .iter()
            .map(|&nonce| {
                UnsignedRecord::new(Issue {
                    asset_id: self.asset_id.clone(),
                    owner: self.owner,
                    nonce,
                })
            })
            .collect()
    }

    /// Signs every record.
    pub fn sign<S: MessageSigner + ?Sized>(&self, signer: &S) -> SignedIssuance {
        let records: Vec<_> = self.records().into_iter().map(|r| r.sign(signer)).collect();
        tracing::info!(
            asset_id = %hex::encode(&self.asset_id),
            count = records.len(),
            "issuance signed"
        );
        SignedIssuance { records }
    }
}

// ---------------------------------------------------------------------------
// SignedIssuance
// ---------------------------------------------------------------------------

/// Every signed record of one issuance request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedIssuance {
    records: Vec<SignedRecord<Issue>>,
}

impl SignedIssuance {
    /// Reassembles an issuance from signed records.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::InvalidParameter`] if `records` is empty.
    /// - [`BitmarkError::InvalidNonce`] if two records share a nonce.
    pub fn from_records(records: Vec<SignedRecord<Issue>>) -> Result<Self> {
        validate_quantity(records.len() as u64)?;
        let genesis = records.first().map_or(false, |r| r.params().nonce == 0);
        NonceSet::from_nonces(records.iter().map(|r| r.params().nonce), genesis)?;
        Ok(Self { records })
    }

    /// Signed records in nonce order.
    pub fn records(&self) -> &[SignedRecord<Issue>] {
        &self.records
    }

    /// Signatures in nonce order.
    pub fn signatures(&self) -> Vec<Signature> {
        self.records.iter().map(|r| *r.signature()).collect()
    }
}

#[derive(Serialize)]
struct IssuesBody<'a> {
    issues: Vec<IssueJson<'a>>,
}

#[derive(Serialize)]
struct IssueJson<'a> {
    owner: &'a Address,
    signature: &'a Signature,
    asset_id: String,
    nonce: u64,
}

impl ToJson for SignedIssuance {
    fn to_json(&self) -> Result<String> {
        let issues = self
            .records
            .iter()
            .map(|r| IssueJson {
                owner: &r.params().owner,
                signature: r.signature(),
                asset_id: r.params().asset_id(),
                nonce: r.params().nonce,
            })
            .collect();
        Ok(serde_json::to_string(&IssuesBody { issues })?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bitmark_crypto::signing::Keypair;
    use bitmark_types::Network;

    fn owner() -> Address {
        Address::from_public_key(Keypair::from_seed(&[2u8; 32]).public_key(), Network::Test)
    }

    #[test]
    fn packs_one_record_per_nonce() -> Result<()> {
        let nonces = NonceSet::from_nonces([1, 300], false)?;
        let params = IssuanceParams::with_nonces("abcd", owner(), nonces)?;
        let records = params.records();
        assert_eq!(records.len(), 2);

        let packed = records[1].params().pack();
        assert_eq!(&packed[..4], &[0x03, 0x02, 0xAB, 0xCD]);
        assert_eq!(&packed[packed.len() - 2..], &[0xAC, 0x02]);
        Ok(())
    }

    #[test]
    fn random_issuance_has_requested_quantity() -> Result<()> {
        let params = IssuanceParams::new("abcd", owner(), 5, false)?;
        assert_eq!(params.nonces().len(), 5);
        assert!(params.nonces().iter().all(|&n| n > 0));

        let genesis = IssuanceParams::new("abcd", owner(), 3, true)?;
        assert_eq!(genesis.nonces()[0], 0);
        Ok(())
    }

    #[test]
    fn bad_inputs_rejected() {
        assert!(IssuanceParams::new("abcd", owner(), 0, false).is_err());
        assert!(IssuanceParams::new("xyz", owner(), 1, false).is_err());
        assert!(matches!(
            IssuanceParams::with_nonces("abcd", owner(), NonceSet::new()),
            Err(BitmarkError::InvalidNonce { .. })
        ));
    }

    #[test]
    fn duplicate_signed_records_rejected() -> Result<()> {
        let keypair = Keypair::from_seed(&[2u8; 32]);
        let params = IssuanceParams::with_nonces("abcd", owner(), NonceSet::from_nonces([4], false)?)?;
        let signed = params.sign(&keypair);
        let mut twice = signed.records().to_vec();
        twice.extend(signed.records().iter().cloned());
        assert!(matches!(
            SignedIssuance::from_records(twice),
            Err(BitmarkError::InvalidNonce { .. })
        ));
        Ok(())
    }

    #[test]
    fn json_lists_every_issue() -> Result<()> {
        let keypair = Keypair::from_seed(&[2u8; 32]);
        let params = IssuanceParams::with_nonces("abcd", owner(), NonceSet::from_nonces([1, 2], false)?)?;
        let json = params.sign(&keypair).to_json()?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let issues = value["issues"].as_array().map(Vec::len);
        assert_eq!(issues, Some(2));
        assert_eq!(value["issues"][1]["nonce"], 2);
        assert_eq!(value["issues"][0]["asset_id"], "abcd");
        Ok(())
    }
}
