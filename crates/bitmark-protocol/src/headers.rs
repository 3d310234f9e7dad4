//! Signed request headers for updating an offer or a share grant.
//!
//! Answering a transfer offer or a grant is authorized by a header set
//! that proves the requester holds the key:
//!
//! ```text
//! signature = Ed25519("updateOffer|{id}|{requester}|{timestamp_ms}")
//! ```

use std::collections::BTreeMap;

use bitmark_crypto::signing::{verify, MessageSigner, PublicKey, Signature};
use bitmark_types::Result;
use serde::Serialize;

/// Action name embedded in the signed header message.
const UPDATE_OFFER: &str = "updateOffer";

/// Header set sent along with an offer or grant response.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UpdateOfferHeaders {
    /// Account number of the party making the request.
    pub requester: String,
    /// Milliseconds since the Unix epoch, as sent on the wire.
    pub timestamp: String,
    /// Hex signature over the header message.
    pub signature: Signature,
}

impl UpdateOfferHeaders {
    /// Signs the header message for `offer_id` at `time_ms`.
    pub fn sign<S: MessageSigner + ?Sized>(
        signer: &S,
        offer_id: &str,
        requester: &str,
        time_ms: i64,
    ) -> Self {
        let message = header_message(offer_id, requester, time_ms);
        let signature = signer.sign(message.as_bytes());
        tracing::debug!(offer_id, requester, time_ms, "offer update headers signed");
        Self {
            requester: requester.to_owned(),
            timestamp: time_ms.to_string(),
            signature,
        }
    }

    /// Signs the header message for `offer_id` at the current time.
    pub fn now<S: MessageSigner + ?Sized>(signer: &S, offer_id: &str, requester: &str) -> Self {
        Self::sign(signer, offer_id, requester, chrono::Utc::now().timestamp_millis())
    }

    /// Checks the signature against `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`bitmark_types::BitmarkError::CryptoError`] if it does
    /// not verify.
    pub fn verify(&self, public_key: &PublicKey, offer_id: &str) -> Result<()> {
        let message = format!(
            "{UPDATE_OFFER}|{offer_id}|{}|{}",
            self.requester, self.timestamp
        );
        verify(public_key, message.as_bytes(), &self.signature)
    }

    /// Header names and values, ready for an HTTP client.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("requester".to_owned(), self.requester.clone()),
            ("timestamp".to_owned(), self.timestamp.clone()),
            ("signature".to_owned(), self.signature.to_string()),
        ])
    }
}

fn header_message(offer_id: &str, requester: &str, time_ms: i64) -> String {
    format!("{UPDATE_OFFER}|{offer_id}|{requester}|{time_ms}")
}
