//! Canonical packing and signing of Bitmark ledger records.
//!
//! # Modules
//!
//! - [`packing`]: opcode table and the length-prefixed field writer
//! - [`record`]: unsigned and signed records, JSON rendering trait
//! - [`signing`]: network-aware signers and record verification
//! - [`validation`]: field checks shared by the record builders
//! - [`nonce`]: distinct issuance nonces
//! - [`fingerprint`]: asset fingerprints of one or many inputs
//! - [`headers`]: signed headers for offer and grant updates
//! - [`params`]: one builder per ledger operation

pub mod fingerprint;
pub mod headers;
pub mod nonce;
pub mod packing;
pub mod params;
pub mod record;
pub mod signing;
pub mod validation;
