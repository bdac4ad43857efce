//! Submission session lifecycle
//!
//! One session covers one connection to one batcher: negotiate the protocol
//! version, submit a batch of proofs, collect the inclusion responses,
//! verify each against its batch merkle root, close. Sessions are one-shot;
//! a failed or finished session is not reusable and a new batch means a new
//! session.
//!
//! Responses are correlated positionally. The batcher answers a batch
//! newest-submission-first, so the session queues its expected commitments
//! in reverse submission order before the first frame goes out and pairs
//! each arriving response with the front of that queue.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use futures_util::future::try_join_all;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::crypto::verify_merkle_path;
use crate::domain::{AlignedVerificationData, VerificationData, VerificationDataCommitment};
use crate::error::{BatcherClientError, Result};
use crate::oracle::PaymentOracle;
use crate::retry;
use crate::signer::ProofSigner;
use crate::transport::{BatcherConnection, WsConnection};
use crate::wire::{
    decode_inclusion, encode_submit, ClientMessage, HandshakeError, NoncedVerificationData,
    ProtocolVersion,
};

/// Lifecycle phase of a submission session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, protocol version not yet verified
    Idle,
    /// Waiting for the batcher's version frame
    Handshaking,
    /// Submissions are going out
    Sending,
    /// All submissions sent, waiting for inclusion responses
    AwaitingResponses,
    /// Finished cleanly
    Closed,
    /// Aborted by an error
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Handshaking => "handshaking",
            SessionState::Sending => "sending",
            SessionState::AwaitingResponses => "awaiting responses",
            SessionState::Closed => "closed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A submission ready to go on the wire, with the commitment its response
/// will be checked against.
struct PreparedSubmission {
    payload: Vec<u8>,
    commitment: VerificationDataCommitment,
}

/// One batch submission against one batcher.
///
/// Constructed over any [`BatcherConnection`]; [`SubmissionSession::connect`]
/// dials the configured WebSocket endpoint. The session consumes itself on
/// submission, closing the connection on both success and failure.
pub struct SubmissionSession<C: BatcherConnection> {
    conn: C,
    config: ClientConfig,
    signer: Arc<dyn ProofSigner>,
    oracle: Arc<dyn PaymentOracle>,
    state: SessionState,
}

impl SubmissionSession<WsConnection> {
    /// Dials the configured batcher.
    ///
    /// Connection establishment retries transient failures per
    /// `config.connect_retry`. The version handshake is not part of the
    /// retry loop; it runs once on the established link.
    pub async fn connect(
        config: ClientConfig,
        signer: Arc<dyn ProofSigner>,
        oracle: Arc<dyn PaymentOracle>,
    ) -> Result<Self> {
        let url = config.batcher_url.clone();
        let conn = retry::run_with_predicate(
            &config.connect_retry,
            "batcher connect",
            || WsConnection::connect(&url),
            BatcherClientError::is_transient,
        )
        .await
        .into_result()?;
        info!(url = %url, "connected to batcher");
        Ok(Self::over(conn, config, signer, oracle))
    }
}

impl<C: BatcherConnection> SubmissionSession<C> {
    /// Wraps an already-established connection.
    pub fn over(
        conn: C,
        config: ClientConfig,
        signer: Arc<dyn ProofSigner>,
        oracle: Arc<dyn PaymentOracle>,
    ) -> Self {
        Self {
            conn,
            config,
            signer,
            oracle,
            state: SessionState::Idle,
        }
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Submits a single proof. Shorthand for a one-item batch.
    pub async fn submit(self, data: VerificationData) -> Result<Vec<AlignedVerificationData>> {
        self.submit_multiple(vec![data]).await
    }

    /// Submits a batch of proofs and waits for their inclusion responses.
    ///
    /// Returns one entry per response whose merkle inclusion proof verified
    /// against its batch root. Responses that fail verification are dropped
    /// with a warning rather than failing the batch, so the result may be
    /// shorter than the input; it is never longer.
    ///
    /// The connection is closed on the way out regardless of outcome.
    pub async fn submit_multiple(
        mut self,
        items: Vec<VerificationData>,
    ) -> Result<Vec<AlignedVerificationData>> {
        let submitted = items.len();
        match self.run_batch(items).await {
            Ok(verified) => {
                self.state = SessionState::Closed;
                self.conn.close().await;
                info!(submitted, accepted = verified.len(), "batch complete");
                Ok(verified)
            }
            Err(e) => {
                warn!(state = %self.state, error = %e, "batch aborted");
                self.state = SessionState::Failed;
                self.conn.close().await;
                Err(e)
            }
        }
    }

    async fn run_batch(
        &mut self,
        items: Vec<VerificationData>,
    ) -> Result<Vec<AlignedVerificationData>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        self.handshake().await?;

        let prepared = self.prepare(items).await?;

        self.state = SessionState::Sending;
        // The expectation queue is fixed before the first frame goes out:
        // responses arrive newest-submission-first.
        let mut expected: VecDeque<VerificationDataCommitment> = prepared
            .iter()
            .map(|submission| submission.commitment.clone())
            .rev()
            .collect();
        for submission in &prepared {
            self.conn.send(submission.payload.clone()).await?;
        }
        debug!(items = prepared.len(), "all submissions sent");

        self.state = SessionState::AwaitingResponses;
        let deadline = self.config.response_timeout;
        timeout(deadline, self.collect_responses(&mut expected))
            .await
            .map_err(|_| BatcherClientError::Timeout {
                phase: "batch responses",
            })?
    }

    /// Reads the batcher's first frame and verifies the protocol version.
    ///
    /// Runs before any submission bytes are sent; a mismatch is fatal for
    /// the session and is never retried.
    async fn handshake(&mut self) -> Result<()> {
        self.state = SessionState::Handshaking;
        let frame = timeout(self.config.handshake_timeout, self.conn.next_frame())
            .await
            .map_err(|_| BatcherClientError::Timeout {
                phase: "protocol handshake",
            })??;
        let payload = match frame {
            Some(frame) => frame.into_bytes(),
            None => return Err(HandshakeError::ClosedBeforeVersion.into()),
        };
        let version = ProtocolVersion::from_bytes(&payload)?;
        version.require(self.config.expected_protocol_version)?;
        debug!(version = %version, "protocol version verified");
        Ok(())
    }

    /// Resolves the payment context once, then signs and encodes every item.
    ///
    /// Item `i` takes nonce `base + i`, so the batch occupies a contiguous
    /// nonce range in submission order. A base nonce close enough to
    /// `u64::MAX` for the range to wrap fails preparation.
    async fn prepare(&self, items: Vec<VerificationData>) -> Result<Vec<PreparedSubmission>> {
        let payer = self.signer.address();
        let base_nonce = self.oracle.nonce(payer).await?;
        let max_fee = self.oracle.max_fee().await?;
        debug!(payer = %payer, base_nonce, max_fee, items = items.len(), "payment context resolved");

        let jobs = items.into_iter().enumerate().map(|(offset, data)| {
            let signer = Arc::clone(&self.signer);
            let chain_id = self.config.chain_id.clone();
            let payment_service_addr = self.config.payment_service_addr;
            async move {
                let commitment = VerificationDataCommitment::from(&data);
                let nonce = base_nonce.checked_add(offset as u64).ok_or_else(|| {
                    BatcherClientError::Oracle(format!(
                        "nonce range overflow: base {base_nonce}, offset {offset}"
                    ))
                })?;
                let nonced = NoncedVerificationData::new(
                    data,
                    nonce,
                    max_fee,
                    chain_id,
                    payment_service_addr,
                );
                let canonical = nonced.canonical_bytes()?;
                let signature = signer.sign_message(&canonical).await?;
                let payload = encode_submit(&ClientMessage::submit_proof(nonced, &signature))?;
                Ok::<_, BatcherClientError>(PreparedSubmission {
                    payload,
                    commitment,
                })
            }
        });
        try_join_all(jobs).await
    }

    /// Pairs each arriving response with the next expected commitment and
    /// verifies its inclusion proof.
    ///
    /// A response that fails verification is dropped, not an error: the
    /// submission may still have been batched correctly and the caller can
    /// re-derive inclusion out of band. A connection that closes before
    /// every expected response arrived is an error.
    async fn collect_responses(
        &mut self,
        expected: &mut VecDeque<VerificationDataCommitment>,
    ) -> Result<Vec<AlignedVerificationData>> {
        let mut verified = Vec::with_capacity(expected.len());
        while let Some(commitment) = expected.pop_front() {
            let frame = self.conn.next_frame().await?.ok_or_else(|| {
                BatcherClientError::Connection(
                    "connection closed before all batch responses arrived".to_string(),
                )
            })?;
            let inclusion = decode_inclusion(&frame)?;
            if verify_merkle_path(
                &commitment,
                &inclusion.batch_merkle_root,
                inclusion.index_in_batch,
                &inclusion.batch_inclusion_proof.merkle_path,
            ) {
                debug!(
                    index = inclusion.index_in_batch,
                    root = %hex::encode(inclusion.batch_merkle_root),
                    "inclusion proof verified"
                );
                verified.push(AlignedVerificationData::new(commitment, &inclusion));
            } else {
                warn!(
                    index = inclusion.index_in_batch,
                    root = %hex::encode(inclusion.batch_merkle_root),
                    "batch response failed merkle verification, dropping"
                );
            }
        }
        Ok(verified)
    }
}
