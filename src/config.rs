//! Client configuration

use std::time::Duration;

use alloy::primitives::{address, Address};

use crate::error::{BatcherClientError, Result};
use crate::retry::RetryConfig;
use crate::wire::EXPECTED_PROTOCOL_VERSION;

/// Payment service contract on the local devnet.
pub const DEVNET_PAYMENT_SERVICE_ADDR: Address =
    address!("7969c5ed335650692bc04293b07f5bf2e7a673c0");

/// Chain id tag of the local devnet, as it appears on the wire.
pub const DEVNET_CHAIN_ID: &str = "0x7A69";

/// Everything a submission session needs to know about its environment.
///
/// Defaults target the local devnet stack. Binaries load overrides from the
/// environment via [`ClientConfig::from_env`]; library users set fields
/// directly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket URL of the batcher
    pub batcher_url: String,
    /// Protocol version this client requires the batcher to announce
    pub expected_protocol_version: u16,
    /// Chain id tag carried in every submission
    pub chain_id: String,
    /// Payment service address carried in every submission
    pub payment_service_addr: Address,
    /// Deadline for the version handshake after connecting
    pub handshake_timeout: Duration,
    /// Deadline for collecting all batch responses after sending
    pub response_timeout: Duration,
    /// Backoff applied to connection establishment
    pub connect_retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            batcher_url: "ws://localhost:8080".to_string(),
            expected_protocol_version: EXPECTED_PROTOCOL_VERSION,
            chain_id: DEVNET_CHAIN_ID.to_string(),
            payment_service_addr: DEVNET_PAYMENT_SERVICE_ADDR,
            handshake_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(60),
            connect_retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables, all optional:
    /// `BATCHER_WS_URL`, `BATCHER_PROTOCOL_VERSION`, `BATCHER_CHAIN_ID`,
    /// `BATCHER_PAYMENT_SERVICE_ADDR`, `BATCHER_HANDSHAKE_TIMEOUT_SECS`,
    /// `BATCHER_RESPONSE_TIMEOUT_SECS`.
    ///
    /// Unset variables keep their defaults. A variable that is set but
    /// unparseable is an error rather than a silent fallback, since a
    /// mangled payment address must never reach the wire.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("BATCHER_WS_URL") {
            config.batcher_url = url;
        }
        if let Ok(raw) = std::env::var("BATCHER_PROTOCOL_VERSION") {
            config.expected_protocol_version = raw.parse().map_err(|_| {
                BatcherClientError::Configuration(format!(
                    "invalid BATCHER_PROTOCOL_VERSION: {raw}"
                ))
            })?;
        }
        if let Ok(chain_id) = std::env::var("BATCHER_CHAIN_ID") {
            config.chain_id = chain_id;
        }
        if let Ok(raw) = std::env::var("BATCHER_PAYMENT_SERVICE_ADDR") {
            config.payment_service_addr = raw.parse().map_err(|_| {
                BatcherClientError::Configuration(format!(
                    "invalid BATCHER_PAYMENT_SERVICE_ADDR: {raw}"
                ))
            })?;
        }
        if let Ok(raw) = std::env::var("BATCHER_HANDSHAKE_TIMEOUT_SECS") {
            config.handshake_timeout = Duration::from_secs(raw.parse().map_err(|_| {
                BatcherClientError::Configuration(format!(
                    "invalid BATCHER_HANDSHAKE_TIMEOUT_SECS: {raw}"
                ))
            })?);
        }
        if let Ok(raw) = std::env::var("BATCHER_RESPONSE_TIMEOUT_SECS") {
            config.response_timeout = Duration::from_secs(raw.parse().map_err(|_| {
                BatcherClientError::Configuration(format!(
                    "invalid BATCHER_RESPONSE_TIMEOUT_SECS: {raw}"
                ))
            })?);
        }

        Ok(config)
    }

    /// Override the batcher endpoint.
    pub fn with_batcher_url(mut self, url: impl Into<String>) -> Self {
        self.batcher_url = url.into();
        self
    }
}
