//! Verification data submitted to the batcher and the commitments derived
//! from it

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::crypto::{commit_verification_data, Hash256};
use crate::domain::{InclusionProof, ProvingSystem};

use super::BatchInclusionData;

/// One submittable proof verification request.
///
/// `proof` is required; the remaining artifacts depend on the proving system.
/// Field names match the wire encoding, so this type serializes directly into
/// the request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationData {
    /// Which proving system produced the proof
    pub proving_system: ProvingSystem,

    /// The proof bytes themselves
    pub proof: Vec<u8>,

    /// Public input the proof was generated against, if any
    pub pub_input: Option<Vec<u8>>,

    /// Verification key, for systems that need one
    pub verification_key: Option<Vec<u8>>,

    /// VM program code, for zkVM systems (SP1, Risc0)
    pub vm_program_code: Option<Vec<u8>>,

    /// Address of the party that generated the proof
    pub proof_generator_addr: Address,
}

/// Keccak-256 commitments over one [`VerificationData`].
///
/// This is the leaf pre-image of the batch merkle tree: the batcher and the
/// client must derive byte-identical values from the same submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDataCommitment {
    /// Commitment to the proof bytes
    pub proof_commitment: Hash256,

    /// Commitment to the public input, or all zeroes when absent
    pub pub_input_commitment: Hash256,

    /// Commitment to the VM program code or verification key, or all zeroes
    /// when neither is present
    pub proving_system_aux_data_commitment: Hash256,

    /// Raw generator address bytes
    pub proof_generator_addr: [u8; 20],
}

impl From<&VerificationData> for VerificationDataCommitment {
    fn from(data: &VerificationData) -> Self {
        commit_verification_data(data)
    }
}

/// A submission the client has verified against the batch merkle root.
///
/// Produced only for responses whose inclusion proof checked out locally;
/// everything needed to later prove inclusion to a third party is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedVerificationData {
    /// Commitments for the submitted item
    pub verification_data_commitment: VerificationDataCommitment,

    /// Root of the batch merkle tree the item landed in
    pub batch_merkle_root: Hash256,

    /// Sibling path proving inclusion under the root
    pub batch_inclusion_proof: InclusionProof,

    /// Position of the item's leaf within the batch
    pub index_in_batch: usize,
}

impl AlignedVerificationData {
    /// Pair a locally computed commitment with the batcher's inclusion data.
    pub fn new(
        verification_data_commitment: VerificationDataCommitment,
        inclusion: &BatchInclusionData,
    ) -> Self {
        Self {
            verification_data_commitment,
            batch_merkle_root: inclusion.batch_merkle_root,
            batch_inclusion_proof: inclusion.batch_inclusion_proof.clone(),
            index_in_batch: inclusion.index_in_batch,
        }
    }
}
