//! Merkle inclusion path verification
//!
//! The batcher answers each submission with a claimed position in its batch
//! tree plus the sibling path to the root. Nothing about that claim is
//! trusted: the client recomputes the root from its own leaf hash and the
//! supplied siblings, and accepts only on byte-exact equality.

use alloy::primitives::keccak256;

use crate::domain::VerificationDataCommitment;

use super::{commitment_leaf_hash, Hash256};

/// Hash an internal tree node from its two children.
///
/// node_hash = KECCAK256(left(32) || right(32)), no domain prefix.
pub fn node_hash(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(left);
    preimage[32..].copy_from_slice(right);
    keccak256(preimage).0
}

/// Verify a claimed inclusion path for one commitment.
///
/// Walks the path leaf-to-root: at each level the low bit of the running
/// index says whether the current node is a left child (bit 0, sibling goes
/// right) or a right child (bit 1, sibling goes left); the index then shifts
/// right by one. An empty path accepts iff the leaf hash is the root itself
/// (single-leaf batch).
///
/// Returns `bool` and never errors; a mismatch is an expected runtime
/// outcome, not a fault.
pub fn verify_merkle_path(
    commitment: &VerificationDataCommitment,
    root: &Hash256,
    index: usize,
    path: &[Hash256],
) -> bool {
    let mut current = commitment_leaf_hash(commitment);
    let mut idx = index;

    for sibling in path {
        current = if idx & 1 == 0 {
            node_hash(&current, sibling)
        } else {
            node_hash(sibling, &current)
        };
        idx >>= 1;
    }

    current == *root
}
