//! Asset fingerprints.
//!
//! A fingerprint identifies the content an asset is registered for.
//!
//! - One input: `"01" ‖ hex(SHA3-512(content))`.
//! - Several inputs: the SHA3-512 of each input, sorted ascending, are
//!   the leaves of a Merkle tree whose parent is
//!   `SHA3-512(left ‖ right)`; the fingerprint is
//!   `"02" ‖ base64(root)`.
//!
//! With exactly [`SHA3_256_INPUT_COUNT`] inputs the parent hash is
//! `SHA3-256(left ‖ right)` instead; leaves stay SHA3-512.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bitmark_crypto::hash::{sha3_256, sha3_512};
use bitmark_crypto::merkle::merkle_root;
use bitmark_types::{BitmarkError, Result};

/// Prefix of a single-input fingerprint.
pub const SINGLE_PREFIX: &str = "01";

/// Prefix of a multi-input fingerprint.
pub const MULTI_PREFIX: &str = "02";

/// Input count whose Merkle parents are hashed with SHA3-256.
pub const SHA3_256_INPUT_COUNT: usize = 256;

/// Fingerprint of a single piece of content.
pub fn compute_fingerprint(content: &[u8]) -> String {
    format!("{SINGLE_PREFIX}{}", hex::encode(sha3_512(content)))
}

/// Fingerprint of several pieces of content.
///
/// Input order does not matter.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] if `contents` is empty.
pub fn compute_fingerprint_multi<T: AsRef<[u8]>>(contents: &[T]) -> Result<String> {
    if contents.is_empty() {
        return Err(BitmarkError::InvalidParameter {
            reason: "fingerprint needs at least one input".into(),
        });
    }

    let mut leaves: Vec<Vec<u8>> = contents
        .iter()
        .map(|c| sha3_512(c.as_ref()).to_vec())
        .collect();
    leaves.sort_unstable();

    let short_parents = contents.len() == SHA3_256_INPUT_COUNT;
    let root = merkle_root(&leaves, |left: &Vec<u8>, right: &Vec<u8>| {
        let joined = [left.as_slice(), right.as_slice()].concat();
        if short_parents {
            sha3_256(&joined).to_vec()
        } else {
            sha3_512(&joined).to_vec()
        }
    })?;

    Ok(format!("{MULTI_PREFIX}{}", STANDARD.encode(root)))
}

/// Fingerprint of one file's content.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] if the file cannot be
/// read.
pub fn fingerprint_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let content = read_file(path.as_ref())?;
    Ok(compute_fingerprint(&content))
}

/// Fingerprint of several files' content.
///
/// # Errors
///
/// - [`BitmarkError::InvalidParameter`] if `paths` is empty or any file
///   cannot be read.
pub fn fingerprint_from_files<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    let contents = paths
        .iter()
        .map(|p| read_file(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    compute_fingerprint_multi(&contents)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let content = fs::read(path).map_err(|e| BitmarkError::InvalidParameter {
        reason: format!("cannot read {}: {e}", path.display()),
    })?;
    tracing::debug!(path = %path.display(), len = content.len(), "read fingerprint input");
    Ok(content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_is_prefixed_hex_of_sha3_512() {
        let fp = compute_fingerprint(b"");
        assert_eq!(fp.len(), 2 + 128);
        assert_eq!(
            fp,
            "01a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
             15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
        );
    }

    #[test]
    fn multi_ignores_input_order() -> Result<()> {
        let a = compute_fingerprint_multi(&[b"alpha".as_slice(), b"beta", b"gamma"])?;
        let b = compute_fingerprint_multi(&[b"gamma".as_slice(), b"alpha", b"beta"])?;
        assert_eq!(a, b);
        assert!(a.starts_with(MULTI_PREFIX));
        Ok(())
    }

    #[test]
    fn multi_of_one_is_base64_of_its_hash() -> Result<()> {
        let fp = compute_fingerprint_multi(&[b"x"])?;
        assert_eq!(fp, format!("02{}", STANDARD.encode(sha3_512(b"x"))));
        Ok(())
    }

    fn root_len(fingerprint: &str) -> Result<usize> {
        let raw = STANDARD
            .decode(&fingerprint[MULTI_PREFIX.len()..])
            .map_err(|e| BitmarkError::InvalidParameter {
                reason: e.to_string(),
            })?;
        Ok(raw.len())
    }

    #[test]
    fn parent_hash_depends_on_input_count() -> Result<()> {
        let inputs: Vec<Vec<u8>> = (0u32..257).map(|i| i.to_be_bytes().to_vec()).collect();

        assert_eq!(root_len(&compute_fingerprint_multi(&inputs[..255])?)?, 64);
        assert_eq!(root_len(&compute_fingerprint_multi(&inputs[..257])?)?, 64);

        let at_256 = compute_fingerprint_multi(&inputs[..256])?;
        assert_eq!(root_len(&at_256)?, 32);

        let mut level: Vec<Vec<u8>> = inputs[..256].iter().map(|c| sha3_512(c).to_vec()).collect();
        level.sort();
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| sha3_256(&[pair[0].as_slice(), pair[1].as_slice()].concat()).to_vec())
                .collect();
        }
        assert_eq!(at_256, format!("02{}", STANDARD.encode(&level[0])));
        Ok(())
    }

    #[test]
    fn empty_multi_rejected() {
        let none: [&[u8]; 0] = [];
        assert!(matches!(
            compute_fingerprint_multi(&none),
            Err(BitmarkError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn files_match_in_memory_content() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("bitmark-fp-{}", std::process::id()));
        fs::create_dir_all(&dir).map_err(|e| BitmarkError::InvalidParameter {
            reason: e.to_string(),
        })?;
        let one = dir.join("one.bin");
        let two = dir.join("two.bin");
        fs::write(&one, b"alpha").map_err(|e| BitmarkError::InvalidParameter {
            reason: e.to_string(),
        })?;
        fs::write(&two, b"beta").map_err(|e| BitmarkError::InvalidParameter {
            reason: e.to_string(),
        })?;

        assert_eq!(fingerprint_from_file(&one)?, compute_fingerprint(b"alpha"));
        assert_eq!(
            fingerprint_from_files(&[&one, &two])?,
            compute_fingerprint_multi(&[b"alpha".as_slice(), b"beta"])?
        );
        assert!(fingerprint_from_file(dir.join("missing.bin")).is_err());

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }
}
