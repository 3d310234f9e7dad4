//! Bitmark account identities.
//!
//! Provides:
//!
//! - **Seeds** (`seed`): short (17-byte) and long (32-byte) core
//!   secrets, their Base58 encodings and key derivation.
//! - **Recovery phrases** (`phrase`): 12/24-word phrases and the
//!   legacy 13-word form.
//! - **Addresses** (`address`): account numbers binding a public key
//!   to a network.
//! - **Accounts** (`account`): a seed plus its derived key pairs,
//!   checked against the configured network.

pub mod account;
pub mod address;
pub mod phrase;
pub mod seed;

pub use account::Account;
pub use address::Address;
pub use phrase::{LegacyPhrase, RecoveryPhrase};
pub use seed::{LongSeed, Seed, SeedVersion, ShortSeed};
