//! Record builders, one per ledger operation.

pub mod grant;
pub mod grant_response;
pub mod issuance;
pub mod offer;
pub mod registration;
pub mod share;
pub mod transfer;
pub mod transfer_response;

use serde::Serialize;

/// Reply to an offer or a share grant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseAction {
    /// Take the offer; the only action that is countersigned.
    Accept,
    /// Decline the offer.
    Reject,
    /// Withdraw one's own offer.
    Cancel,
}
