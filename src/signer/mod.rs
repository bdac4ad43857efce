//! Submission signing
//!
//! Every request carries an ECDSA signature over the canonical nonced
//! payload, produced with the Ethereum personal-message scheme so the
//! batcher can recover the paying account. The session only sees the
//! [`ProofSigner`] trait; the default implementation wraps an in-process
//! private key, but a remote wallet service can slot in behind the same
//! seam.

use std::fmt;

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::{BatcherClientError, Result};

/// An ECDSA signature in the r/s/v form the batcher expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// First signature scalar
    pub r: U256,
    /// Second signature scalar
    pub s: U256,
    /// Recovery id, 27 or 28
    pub v: u64,
}

impl EcdsaSignature {
    /// `r` as 0x-prefixed 32-byte hex.
    pub fn r_hex(&self) -> String {
        format!("0x{}", hex::encode(self.r.to_be_bytes::<32>()))
    }

    /// `s` as 0x-prefixed 32-byte hex.
    pub fn s_hex(&self) -> String {
        format!("0x{}", hex::encode(self.s.to_be_bytes::<32>()))
    }
}

/// Signs canonical submission payloads on behalf of one account.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProofSigner: Send + Sync {
    /// The account whose nonce and balance pay for the submissions.
    fn address(&self) -> Address;

    /// Signs `message` with the Ethereum personal-message scheme.
    async fn sign_message(&self, message: &[u8]) -> Result<EcdsaSignature>;
}

/// In-process signer over a raw secp256k1 private key.
pub struct LocalSigner {
    inner: PrivateKeySigner,
}

impl LocalSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }

    /// Parses a hex-encoded private key, `0x` prefix optional.
    pub fn from_hex_key(key: &str) -> Result<Self> {
        key.parse::<PrivateKeySigner>()
            .map(Self::new)
            .map_err(|e| BatcherClientError::Signing(format!("invalid private key: {e}")))
    }

    /// Generates a throwaway key. Useful for devnets and tests.
    pub fn random() -> Self {
        Self::new(PrivateKeySigner::random())
    }
}

// Key material stays out of debug output.
impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.inner.address())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProofSigner for LocalSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<EcdsaSignature> {
        let signature = self
            .inner
            .sign_message_sync(message)
            .map_err(|e| BatcherClientError::Signing(format!("signing failed: {e}")))?;
        Ok(EcdsaSignature {
            r: signature.r(),
            s: signature.s(),
            v: 27 + u64::from(signature.v()),
        })
    }
}
