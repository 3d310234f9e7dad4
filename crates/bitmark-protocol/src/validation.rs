//! Field checks shared by the record builders.
//!
//! Every builder runs these before it hands out an unsigned record, so
//! a record that exists is always packable.

use bitmark_types::{BitmarkError, Link, Result};

/// Longest asset name, in characters.
pub const MAX_ASSET_NAME_LEN: usize = 64;

/// Longest metadata string, in characters of its JSON form.
pub const MAX_METADATA_LEN: usize = 2048;

/// Longest asset id, in bytes.
pub const MAX_ASSET_ID_LEN: usize = 64;

/// Checks an asset name.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] if longer than
/// [`MAX_ASSET_NAME_LEN`] characters.
pub fn validate_asset_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len > MAX_ASSET_NAME_LEN {
        return Err(BitmarkError::InvalidParameter {
            reason: format!("asset name has {len} characters, maximum is {MAX_ASSET_NAME_LEN}"),
        });
    }
    Ok(())
}

/// Checks the length of packed metadata.
///
/// The limit applies to the JSON form, where each NUL separator is
/// written as the six characters `\u0000`.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] if the JSON form exceeds
/// [`MAX_METADATA_LEN`] characters.
pub fn validate_metadata(packed: &str) -> Result<()> {
    let len: usize = packed
        .chars()
        .map(|c| if c == '\0' { 6 } else { 1 })
        .sum();
    if len > MAX_METADATA_LEN {
        return Err(BitmarkError::InvalidParameter {
            reason: format!("metadata is {len} characters, maximum is {MAX_METADATA_LEN}"),
        });
    }
    Ok(())
}

/// Decodes and checks a hex asset id.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] unless `asset_id` is hex
/// of 1 to [`MAX_ASSET_ID_LEN`] bytes.
pub fn validate_asset_id(asset_id: &str) -> Result<Vec<u8>> {
    let bytes = hex::decode(asset_id).map_err(|e| BitmarkError::InvalidParameter {
        reason: format!("asset id is not hex: {e}"),
    })?;
    if bytes.is_empty() || bytes.len() > MAX_ASSET_ID_LEN {
        return Err(BitmarkError::InvalidParameter {
            reason: format!(
                "asset id is {} bytes, must be 1 to {MAX_ASSET_ID_LEN}",
                bytes.len()
            ),
        });
    }
    Ok(bytes)
}

/// Parses a hex link (transaction id or share id).
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] unless `link` is 32 bytes
/// of hex.
pub fn validate_link(link: &str) -> Result<Link> {
    link.parse()
}

/// Checks that a quantity is positive.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] for zero.
pub fn validate_quantity(quantity: u64) -> Result<()> {
    if quantity == 0 {
        return Err(BitmarkError::InvalidParameter {
            reason: "quantity must be greater than zero".into(),
        });
    }
    Ok(())
}

/// Checks an offer or grant id.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] if empty.
pub fn validate_offer_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(BitmarkError::InvalidParameter {
            reason: "offer id must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_name_limit_counts_characters() {
        assert!(validate_asset_name(&"é".repeat(64)).is_ok());
        assert!(validate_asset_name(&"a".repeat(65)).is_err());
        assert!(validate_asset_name("").is_ok());
    }

    #[test]
    fn metadata_separators_count_six() {
        // 341 separators * 6 = 2046, plus two characters.
        let packed: String = std::iter::repeat('\0').take(341).chain("ab".chars()).collect();
        assert!(validate_metadata(&packed).is_ok());
        let packed = format!("{packed}c");
        assert!(validate_metadata(&packed).is_err());
    }

    #[test]
    fn asset_id_bounds() -> Result<()> {
        assert_eq!(validate_asset_id("00ff")?, vec![0x00, 0xFF]);
        assert!(validate_asset_id("").is_err());
        assert!(validate_asset_id(&"ab".repeat(65)).is_err());
        assert!(validate_asset_id("zz").is_err());
        Ok(())
    }

    #[test]
    fn link_must_be_32_bytes() {
        assert!(validate_link(&"11".repeat(32)).is_ok());
        assert!(validate_link(&"11".repeat(31)).is_err());
    }

    #[test]
    fn zero_quantity_rejected() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
    }
}
