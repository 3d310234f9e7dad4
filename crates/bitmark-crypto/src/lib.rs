//! Cryptographic and encoding primitives for the Bitmark client toolkit.
//!
//! This crate is the **sole** location for raw cryptographic operations.
//! Higher layers (seeds, addresses, records) only call into it.
//!
//! # Modules
//!
//! - [`varint`]: unsigned LEB128 integers used for tags and lengths
//! - [`hash`]: SHA3-256, SHA3-512 and SHAKE256
//! - [`checksum`]: four-byte SHA3-256 checksums
//! - [`signing`]: Ed25519 keypairs, signing and verification
//! - [`encryption`]: X25519 encryption keypairs
//! - [`kdf`]: key derivation from seed core bytes
//! - [`random`]: injectable secure randomness
//! - [`mnemonic`]: 12/24-word phrase codec
//! - [`legacy`]: 13-word legacy phrase codec
//! - [`merkle`]: flattened binary Merkle trees

pub mod checksum;
pub mod encryption;
pub mod hash;
pub mod kdf;
pub mod legacy;
pub mod merkle;
pub mod mnemonic;
pub mod random;
pub mod signing;
pub mod varint;
