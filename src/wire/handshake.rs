//! Protocol version handshake
//!
//! The batcher announces its protocol version in the very first frame after
//! the connection opens. The client parses that frame, compares against the
//! version it speaks, and refuses to send anything on a mismatch. A stale
//! client talking to an upgraded batcher fails loudly here instead of
//! producing undecodable submissions downstream.

use std::fmt;

use thiserror::Error;

/// The protocol version this client implementation speaks.
pub const EXPECTED_PROTOCOL_VERSION: u16 = 0;

/// Errors raised while negotiating the protocol version.
///
/// All of these are fatal for the session. Version negotiation happens once
/// per connection and is never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// The connection closed before the batcher sent its version frame
    #[error("connection closed before the batcher announced a protocol version")]
    ClosedBeforeVersion,
    /// The version frame carried no payload
    #[error("batcher sent an empty protocol version frame")]
    EmptyVersion,
    /// The batcher speaks a different protocol version than this client
    #[error("protocol version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Version this client implements
        expected: u16,
        /// Version the batcher announced
        got: u16,
    },
}

/// Protocol version announced by the batcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion(pub u16);

impl ProtocolVersion {
    /// Parses the version out of a raw handshake payload.
    ///
    /// The version is a big-endian `u16` in the first two bytes. A single
    /// byte payload is taken as the version value itself, so a batcher
    /// sending the minimal encoding of version zero still negotiates
    /// cleanly. Bytes past the second are ignored.
    pub fn from_bytes(payload: &[u8]) -> Result<Self, HandshakeError> {
        match payload {
            [] => Err(HandshakeError::EmptyVersion),
            [version] => Ok(Self(u16::from(*version))),
            [hi, lo, ..] => Ok(Self(u16::from_be_bytes([*hi, *lo]))),
        }
    }

    /// Fails unless this version is exactly `expected`.
    ///
    /// There is no negotiation of a common subset. The wire format is CBOR
    /// with no interior version tags, so anything other than an exact match
    /// means the peers would silently misread each other.
    pub fn require(self, expected: u16) -> Result<(), HandshakeError> {
        if self.0 == expected {
            Ok(())
        } else {
            Err(HandshakeError::VersionMismatch {
                expected,
                got: self.0,
            })
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
