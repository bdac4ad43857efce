//! Request envelope sent to the batcher
//!
//! Every submission travels as a `ClientMessage::SubmitProof` carrying the
//! nonced verification data together with an ECDSA signature over that
//! data's canonical JSON bytes. The batcher recovers the signer address
//! from the signature and charges that account, so the byte-for-byte
//! serialization here is part of the protocol, not an implementation
//! detail: fields serialize in declaration order and numeric fields are
//! minimal lowercase hex.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::CodecError;
use crate::domain::VerificationData;
use crate::signer::EcdsaSignature;

// ============================================================================
// Signed payload
// ============================================================================

/// Verification data bound to its payment context.
///
/// This is the exact value the submitter signs. `canonical_bytes` produces
/// the compact JSON the signature covers; the batcher re-serializes the
/// same fields in the same order to verify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoncedVerificationData {
    /// The proof bundle being submitted
    pub verification_data: VerificationData,
    /// Submitter account nonce, minimal lowercase hex without `0x`
    pub nonce: String,
    /// Fee cap in wei, same rendering as `nonce`
    pub max_fee: String,
    /// Chain id tag of the payment chain
    pub chain_id: String,
    /// Payment service contract the batcher settles against
    pub payment_service_addr: Address,
}

impl NoncedVerificationData {
    /// Binds `verification_data` to a nonce and fee cap.
    ///
    /// Zero renders as `"0"`, not an empty string.
    pub fn new(
        verification_data: VerificationData,
        nonce: u64,
        max_fee: u128,
        chain_id: impl Into<String>,
        payment_service_addr: Address,
    ) -> Self {
        Self {
            verification_data,
            nonce: format!("{nonce:x}"),
            max_fee: format!("{max_fee:x}"),
            chain_id: chain_id.into(),
            payment_service_addr,
        }
    }

    /// The canonical bytes the submitter signs.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(self)?)
    }
}

// ============================================================================
// Signature and envelope
// ============================================================================

/// ECDSA signature in the r/s/v form the batcher parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSignature {
    /// 0x-prefixed 32-byte hex
    pub r: String,
    /// 0x-prefixed 32-byte hex
    pub s: String,
    /// Recovery id, 27 or 28
    pub v: u64,
}

impl From<&EcdsaSignature> for WireSignature {
    fn from(signature: &EcdsaSignature) -> Self {
        Self {
            r: signature.r_hex(),
            s: signature.s_hex(),
            v: signature.v,
        }
    }
}

/// One signed submission as it crosses the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSubmission {
    /// The signed payload
    pub verification_data: NoncedVerificationData,
    /// Signature over `verification_data.canonical_bytes()`
    pub signature: WireSignature,
}

/// Top-level request frame.
///
/// Serializes externally tagged, so the CBOR payload is a one-entry map
/// keyed by the variant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Submit one proof for inclusion in the next batch
    SubmitProof(SignedSubmission),
}

impl ClientMessage {
    /// Wraps a signed payload into its wire envelope.
    pub fn submit_proof(
        verification_data: NoncedVerificationData,
        signature: &EcdsaSignature,
    ) -> Self {
        Self::SubmitProof(SignedSubmission {
            verification_data,
            signature: WireSignature::from(signature),
        })
    }
}
