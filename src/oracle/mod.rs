//! Payment context oracle
//!
//! Every submission embeds the submitter's account nonce and a fee cap.
//! Where those numbers come from is deployment policy: production reads
//! them from an execution-layer RPC node, devnets and tests pin them. The
//! session only sees the [`PaymentOracle`] trait.

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::{BatcherClientError, Result};

/// Source of the nonce and fee cap attached to each submission.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PaymentOracle: Send + Sync {
    /// Current transaction count of `address` on the payment chain.
    ///
    /// Read once per batch; successive items in the batch take successive
    /// nonces starting from this value.
    async fn nonce(&self, address: Address) -> Result<u64>;

    /// Fee cap in wei to attach to each submission.
    async fn max_fee(&self) -> Result<u128>;
}

/// Oracle backed by an execution-layer JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcPaymentOracle {
    rpc_url: String,
}

impl RpcPaymentOracle {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
        }
    }
}

#[async_trait]
impl PaymentOracle for RpcPaymentOracle {
    async fn nonce(&self, address: Address) -> Result<u64> {
        let provider = ProviderBuilder::new().on_http(
            self.rpc_url
                .parse()
                .map_err(|e| BatcherClientError::Oracle(format!("invalid rpc url: {e}")))?,
        );
        provider.get_transaction_count(address).await.map_err(|e| {
            BatcherClientError::Oracle(format!("eth_getTransactionCount failed: {e}"))
        })
    }

    async fn max_fee(&self) -> Result<u128> {
        let provider = ProviderBuilder::new().on_http(
            self.rpc_url
                .parse()
                .map_err(|e| BatcherClientError::Oracle(format!("invalid rpc url: {e}")))?,
        );
        provider
            .get_gas_price()
            .await
            .map_err(|e| BatcherClientError::Oracle(format!("eth_gasPrice failed: {e}")))
    }
}

/// Fixed-value oracle for devnets and tests.
#[derive(Debug, Clone)]
pub struct StaticPaymentOracle {
    nonce: u64,
    max_fee: u128,
}

impl StaticPaymentOracle {
    pub fn new(nonce: u64, max_fee: u128) -> Self {
        Self { nonce, max_fee }
    }
}

#[async_trait]
impl PaymentOracle for StaticPaymentOracle {
    async fn nonce(&self, _address: Address) -> Result<u64> {
        Ok(self.nonce)
    }

    async fn max_fee(&self) -> Result<u128> {
        Ok(self.max_fee)
    }
}
