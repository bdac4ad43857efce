//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, PrimitiveSignature, U256};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use aligned_batcher_client::crypto::{commitment_leaf_hash, node_hash, Hash256};
use aligned_batcher_client::domain::{BatchInclusionData, InclusionProof};
use aligned_batcher_client::retry::RetryConfig;
use aligned_batcher_client::wire::{ClientMessage, SignedSubmission};
use aligned_batcher_client::{
    ClientConfig, LocalSigner, ProvingSystem, VerificationData, VerificationDataCommitment,
};

/// Well-known anvil devnet account #0.
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`TEST_KEY`].
pub fn test_address() -> Address {
    Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap()
}

pub fn test_signer() -> LocalSigner {
    LocalSigner::from_hex_key(TEST_KEY).unwrap()
}

/// Client configuration pointed at an in-process mock batcher.
pub fn test_config(url: &str) -> ClientConfig {
    ClientConfig {
        batcher_url: url.to_string(),
        handshake_timeout: Duration::from_secs(5),
        response_timeout: Duration::from_secs(5),
        connect_retry: RetryConfig::fast(),
        ..ClientConfig::default()
    }
}

/// Builder for test submissions
pub struct TestItemBuilder {
    proving_system: ProvingSystem,
    proof: Vec<u8>,
    pub_input: Option<Vec<u8>>,
    verification_key: Option<Vec<u8>>,
    vm_program_code: Option<Vec<u8>>,
    proof_generator_addr: Address,
}

impl TestItemBuilder {
    pub fn new() -> Self {
        Self {
            proving_system: ProvingSystem::Groth16Bn254,
            proof: vec![1, 2, 3],
            pub_input: Some(vec![4]),
            verification_key: Some(vec![5]),
            vm_program_code: None,
            proof_generator_addr: test_address(),
        }
    }

    pub fn proving_system(mut self, system: ProvingSystem) -> Self {
        self.proving_system = system;
        self
    }

    pub fn proof(mut self, proof: Vec<u8>) -> Self {
        self.proof = proof;
        self
    }

    pub fn pub_input(mut self, pub_input: Option<Vec<u8>>) -> Self {
        self.pub_input = pub_input;
        self
    }

    pub fn verification_key(mut self, vk: Option<Vec<u8>>) -> Self {
        self.verification_key = vk;
        self
    }

    pub fn vm_program_code(mut self, code: Option<Vec<u8>>) -> Self {
        self.vm_program_code = code;
        self
    }

    pub fn build(self) -> VerificationData {
        VerificationData {
            proving_system: self.proving_system,
            proof: self.proof,
            pub_input: self.pub_input,
            verification_key: self.verification_key,
            vm_program_code: self.vm_program_code,
            proof_generator_addr: self.proof_generator_addr,
        }
    }
}

impl Default for TestItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a merkle tree over `leaves` and returns the root plus one sibling
/// path per leaf. Leaf count must be a power of two.
pub fn build_merkle_tree(leaves: &[Hash256]) -> (Hash256, Vec<Vec<Hash256>>) {
    assert!(!leaves.is_empty());
    assert!(leaves.len().is_power_of_two());

    let mut paths = vec![Vec::new(); leaves.len()];
    let mut level: Vec<Hash256> = leaves.to_vec();
    let mut stride = 1usize;
    while level.len() > 1 {
        for (leaf_index, path) in paths.iter_mut().enumerate() {
            let pos = leaf_index / stride;
            path.push(level[pos ^ 1]);
        }
        level = level
            .chunks(2)
            .map(|pair| node_hash(&pair[0], &pair[1]))
            .collect();
        stride *= 2;
    }
    (level[0], paths)
}

/// Recovers the account that signed a received submission.
pub fn recover_submitter(submission: &SignedSubmission) -> Address {
    let r = U256::from_str_radix(submission.signature.r.trim_start_matches("0x"), 16).unwrap();
    let s = U256::from_str_radix(submission.signature.s.trim_start_matches("0x"), 16).unwrap();
    let signature = PrimitiveSignature::new(r, s, submission.signature.v == 28);
    let message = submission.verification_data.canonical_bytes().unwrap();
    signature.recover_address_from_msg(&message).unwrap()
}

/// Script for one mock batcher connection.
pub struct BatcherScript {
    /// First frame payload. `None` closes the connection without sending one.
    pub version_payload: Option<Vec<u8>>,
    /// How many submission frames to read before responding
    pub expect_items: usize,
    /// Flip a byte in the root of the first response sent
    pub corrupt_first_root: bool,
    /// Send the second response as a JSON text frame instead of CBOR
    pub second_as_text: bool,
    /// Whether to respond at all (false = receive, then go silent)
    pub respond: bool,
}

impl Default for BatcherScript {
    fn default() -> Self {
        Self {
            version_payload: Some(vec![0, 0]),
            expect_items: 0,
            corrupt_first_root: false,
            second_as_text: false,
            respond: true,
        }
    }
}

/// Spawns a scripted batcher on an ephemeral port.
///
/// The server accepts one connection, sends its version frame, reads the
/// scripted number of submissions, rebuilds the batch merkle tree from them
/// exactly as a real batcher would, and answers newest-submission-first.
/// The handle resolves to every submission received, in arrival order.
pub async fn spawn_mock_batcher(
    script: BatcherScript,
) -> (String, JoinHandle<Vec<SignedSubmission>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        match &script.version_payload {
            Some(payload) => ws
                .send(Message::Binary(payload.clone().into()))
                .await
                .unwrap(),
            None => {
                let _ = ws.close(None).await;
                return Vec::new();
            }
        }

        let mut received: Vec<SignedSubmission> = Vec::new();
        while received.len() < script.expect_items {
            match ws.next().await {
                Some(Ok(Message::Binary(payload))) => {
                    let message: ClientMessage =
                        ciborium::de::from_reader(payload.as_ref()).unwrap();
                    let ClientMessage::SubmitProof(submission) = message;
                    received.push(submission);
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(_)) => break,
            }
        }

        if script.respond && !received.is_empty() {
            let leaves: Vec<Hash256> = received
                .iter()
                .map(|submission| {
                    commitment_leaf_hash(&VerificationDataCommitment::from(
                        &submission.verification_data.verification_data,
                    ))
                })
                .collect();
            let (root, paths) = build_merkle_tree(&leaves);

            // Answer the most recent submission first.
            for (ordinal, index) in (0..received.len()).rev().enumerate() {
                let mut inclusion = BatchInclusionData {
                    batch_merkle_root: root,
                    batch_inclusion_proof: InclusionProof {
                        merkle_path: paths[index].clone(),
                    },
                    index_in_batch: index,
                };
                if script.corrupt_first_root && ordinal == 0 {
                    inclusion.batch_merkle_root[0] ^= 0xff;
                }

                let frame = if script.second_as_text && ordinal == 1 {
                    Message::Text(serde_json::to_string(&inclusion).unwrap().into())
                } else {
                    let mut payload = Vec::new();
                    ciborium::ser::into_writer(&inclusion, &mut payload).unwrap();
                    Message::Binary(payload.into())
                };
                ws.send(frame).await.unwrap();
            }
        }

        // Hold the connection until the client hangs up.
        while let Some(Ok(_)) = ws.next().await {}
        received
    });

    (format!("ws://{addr}"), handle)
}
