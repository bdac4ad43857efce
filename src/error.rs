//! Error types for the batcher client

use thiserror::Error;

use crate::wire::{CodecError, HandshakeError};

/// Errors that can abort a submission batch
#[derive(Error, Debug)]
pub enum BatcherClientError {
    /// Protocol version handshake failed
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    /// Connection could not be established, or broke mid-session
    #[error("connection error: {0}")]
    Connection(String),

    /// A send was attempted on a connection that is not open
    #[error("connection is not open")]
    ConnectionNotReady,

    /// A request could not be encoded, or a response could not be decoded
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The signer refused or failed to produce a signature
    #[error("signing failed: {0}")]
    Signing(String),

    /// The payment oracle could not serve a nonce or fee
    #[error("payment oracle failed: {0}")]
    Oracle(String),

    /// A lifecycle phase exceeded its configured deadline
    #[error("timed out waiting for {phase}")]
    Timeout { phase: &'static str },

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BatcherClientError {
    /// Whether the error is worth retrying at connection-establishment time.
    ///
    /// Handshake failures are deliberately excluded: a batcher that speaks the
    /// wrong protocol version will keep speaking it.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for batcher client operations
pub type Result<T> = std::result::Result<T, BatcherClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BatcherClientError::Connection("refused".into()).is_transient());
        assert!(!BatcherClientError::ConnectionNotReady.is_transient());
        assert!(!BatcherClientError::Handshake(HandshakeError::VersionMismatch {
            expected: 0,
            got: 1,
        })
        .is_transient());
        assert!(!BatcherClientError::Timeout { phase: "protocol handshake" }.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = BatcherClientError::Timeout { phase: "batch responses" };
        assert_eq!(err.to_string(), "timed out waiting for batch responses");

        let err = BatcherClientError::Handshake(HandshakeError::VersionMismatch {
            expected: 0,
            got: 3,
        });
        assert!(err.to_string().contains("expected 0"));
        assert!(err.to_string().contains("got 3"));
    }
}
