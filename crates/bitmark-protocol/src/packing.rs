//! Canonical binary packing of ledger records.
//!
//! Every record is packed as
//!
//! ```text
//! varint(opcode) ‖ field ‖ field ‖ ...
//! ```
//!
//! where a variable-length field is written as `varint(len) ‖ bytes`
//! and a numeric field as a bare varint. The order of fields is fixed
//! per opcode, and the packed bytes are exactly what gets signed.
//!
//! | Opcode | Record                                   |
//! |--------|------------------------------------------|
//! | `0x02` | asset registration                       |
//! | `0x03` | issuance                                 |
//! | `0x04` | transfer                                 |
//! | `0x05` | transfer offer, transfer countersignature |
//! | `0x08` | share                                    |
//! | `0x09` | share grant, grant countersignature      |

use bitmark_crypto::varint::{decode_varint, write_varint};
use bitmark_types::{BitmarkError, Result};

// ---------------------------------------------------------------------------
// Opcodes
// ---------------------------------------------------------------------------

/// Asset registration.
pub const OPCODE_REGISTRATION: u64 = 0x02;

/// Single-owner issuance.
pub const OPCODE_ISSUANCE: u64 = 0x03;

/// Direct transfer.
pub const OPCODE_TRANSFER: u64 = 0x04;

/// Transfer offer and its countersignature.
pub const OPCODE_TRANSFER_OFFER: u64 = 0x05;

/// Share creation.
pub const OPCODE_SHARE: u64 = 0x08;

/// Share grant and its countersignature.
pub const OPCODE_SHARE_GRANT: u64 = 0x09;

/// Byte written where a transfer would carry a payment; always empty.
pub(crate) const NO_PAYMENT: u8 = 0x00;

// ---------------------------------------------------------------------------
// Packer
// ---------------------------------------------------------------------------

/// Append-only writer for packed records.
#[derive(Debug)]
pub struct Packer {
    buf: Vec<u8>,
}

impl Packer {
    /// Starts a record with `opcode`.
    pub fn new(opcode: u64) -> Self {
        let mut buf = Vec::with_capacity(128);
        write_varint(&mut buf, opcode);
        Self { buf }
    }

    /// Appends a length-prefixed byte field.
    pub fn bytes(&mut self, field: &[u8]) -> &mut Self {
        write_varint(&mut self.buf, field.len() as u64);
        self.buf.extend_from_slice(field);
        self
    }

    /// Appends a length-prefixed UTF-8 field.
    pub fn string(&mut self, field: &str) -> &mut Self {
        self.bytes(field.as_bytes())
    }

    /// Appends a bare varint.
    pub fn varint(&mut self, value: u64) -> &mut Self {
        write_varint(&mut self.buf, value);
        self
    }

    /// Appends one raw byte with no prefix.
    pub fn raw_byte(&mut self, byte: u8) -> &mut Self {
        self.buf.push(byte);
        self
    }

    /// Returns the packed bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Unpacker
// ---------------------------------------------------------------------------

/// Reader over packed record bytes.
///
/// Mirrors [`Packer`] for inspecting records received from elsewhere.
#[derive(Debug)]
pub struct Unpacker<'a> {
    rest: &'a [u8],
}

impl<'a> Unpacker<'a> {
    /// Wraps `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    /// Reads a bare varint.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::MalformedVarInt`] if the varint is
    /// truncated or overflows.
    pub fn varint(&mut self) -> Result<u64> {
        let (value, used) = decode_varint(self.rest)?;
        self.rest = &self.rest[used..];
        Ok(value)
    }

    /// Reads a length-prefixed byte field.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::MalformedVarInt`] on a bad length prefix.
    /// - [`BitmarkError::InvalidParameter`] if fewer bytes remain than
    ///   the prefix announces.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.varint()?;
        let len = usize::try_from(len).map_err(|_| BitmarkError::InvalidParameter {
            reason: format!("field length {len} does not fit in memory"),
        })?;
        if len > self.rest.len() {
            return Err(BitmarkError::InvalidParameter {
                reason: format!("field needs {len} bytes, {} remain", self.rest.len()),
            });
        }
        let (field, rest) = self.rest.split_at(len);
        self.rest = rest;
        Ok(field)
    }

    /// Reads one raw byte.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::InvalidParameter`] at end of input.
    pub fn raw_byte(&mut self) -> Result<u8> {
        let (&first, rest) = self.rest.split_first().ok_or_else(|| {
            BitmarkError::InvalidParameter {
                reason: "unexpected end of record".into(),
            }
        })?;
        self.rest = rest;
        Ok(first)
    }

    /// Returns `true` once every byte has been read.
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
