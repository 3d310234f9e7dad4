//! Binary Merkle tree over an ordered list of leaf hashes.
//!
//! The tree is returned flattened, level by level: the leaves first,
//! then each parent level, ending with the root. On a level with an odd
//! number of nodes the last node is combined with itself.

use bitmark_types::{BitmarkError, Result};

/// Number of nodes in a flattened tree over `leaf_count` leaves.
pub fn tree_len(leaf_count: usize) -> usize {
    if leaf_count == 0 {
        return 0;
    }
    let mut total = 1;
    let mut level = leaf_count;
    while level > 1 {
        total += level;
        level = (level + 1) / 2;
    }
    total
}

/// Builds every level of the tree bottom-up.
///
/// `combine(left, right)` produces a parent from two children. The last
/// element of the result is the root.
///
/// # Errors
///
/// Returns [`BitmarkError::InvalidParameter`] if `leaves` is empty.
pub fn build_tree<T, F>(leaves: &[T], combine: F) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> T,
{
    if leaves.is_empty() {
        return Err(BitmarkError::InvalidParameter {
            reason: "merkle tree needs at least one leaf".into(),
        });
    }

    let mut tree = Vec::with_capacity(tree_len(leaves.len()));
    tree.extend_from_slice(leaves);

    let mut level_start = 0;
    let mut level_len = leaves.len();
    while level_len > 1 {
        for i in (0..level_len).step_by(2) {
            let left = level_start + i;
            let right = if i + 1 < level_len { left + 1 } else { left };
            let parent = combine(&tree[left], &tree[right]);
            tree.push(parent);
        }
        level_start += level_len;
        level_len = (level_len + 1) / 2;
    }

    Ok(tree)
}

/// Returns only the root of the tree built over `leaves`.
///
/// # Errors
///
/// Same as [`build_tree`].
pub fn merkle_root<T, F>(leaves: &[T], combine: F) -> Result<T>
where
    T: Clone,
    F: Fn(&T, &T) -> T,
{
    let mut tree = build_tree(leaves, combine)?;
    tree.pop().ok_or_else(|| BitmarkError::InvalidParameter {
        reason: "merkle tree is empty".into(),
    })
}
