//! Per-item batch inclusion responses returned by the batcher

use serde::{Deserialize, Serialize};

use crate::crypto::Hash256;

/// Sibling path for one leaf of a batch merkle tree, leaf-to-root order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Sibling digests, one per tree level
    pub merkle_path: Vec<Hash256>,
}

/// What the batcher claims about one submitted item.
///
/// Field names match the wire encoding. The claim is untrusted until the
/// merkle path has been re-verified locally against the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInclusionData {
    /// Root of the batch merkle tree
    pub batch_merkle_root: Hash256,

    /// Path from the item's leaf up to the root
    pub batch_inclusion_proof: InclusionProof,

    /// Position of the item's leaf within the batch
    pub index_in_batch: usize,
}
