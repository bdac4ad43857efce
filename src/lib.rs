//! Aligned Batcher Client Library
//!
//! Client for submitting zero-knowledge proofs to a proof aggregation
//! batcher over WebSocket. A session signs each submission with the payer's
//! key, streams the batch to the batcher, then verifies every returned
//! merkle inclusion proof locally before handing it back to the caller.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (verification data, commitments, batches)
//! - [`crypto`] - Keccak-256 commitments and merkle path verification
//! - [`wire`] - Handshake, request envelope, CBOR/JSON codec
//! - [`transport`] - WebSocket connection abstraction
//! - [`signer`] - ECDSA submission signing
//! - [`oracle`] - Nonce and fee resolution
//! - [`session`] - Batch submission lifecycle
//! - [`retry`] - Backoff for connection establishment

pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod oracle;
pub mod retry;
pub mod session;
pub mod signer;
pub mod transport;
pub mod wire;

// Re-export commonly used types
pub use config::{ClientConfig, DEVNET_CHAIN_ID, DEVNET_PAYMENT_SERVICE_ADDR};
pub use domain::{
    AlignedVerificationData, BatchInclusionData, InclusionProof, ProvingSystem,
    VerificationData, VerificationDataCommitment,
};
pub use error::{BatcherClientError, Result};
pub use oracle::{PaymentOracle, RpcPaymentOracle, StaticPaymentOracle};
pub use session::{SessionState, SubmissionSession};
pub use signer::{EcdsaSignature, LocalSigner, ProofSigner};
pub use transport::{BatcherConnection, Frame, WsConnection};
pub use wire::EXPECTED_PROTOCOL_VERSION;
