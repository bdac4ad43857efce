//! Connection abstraction over the batcher link
//!
//! The session never touches the WebSocket types directly; it talks to a
//! [`BatcherConnection`], which normalizes the link down to ordered data
//! frames. That keeps the protocol logic testable against a mock and keeps
//! transport churn out of the rest of the crate.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;

mod ws;

pub use ws::*;

/// One data frame received from the batcher.
///
/// Control frames (ping, pong, close) never surface here; the transport
/// handles them internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Binary frame, CBOR payloads
    Binary(Vec<u8>),
    /// Text frame, JSON payloads
    Text(String),
}

impl Frame {
    /// Raw payload bytes regardless of frame kind.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Frame::Binary(payload) => payload,
            Frame::Text(text) => text.into_bytes(),
        }
    }
}

/// A bidirectional framed link to one batcher.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BatcherConnection: Send {
    /// Sends one binary frame.
    ///
    /// Fails with [`crate::BatcherClientError::ConnectionNotReady`] once the
    /// link is no longer open.
    async fn send(&mut self, payload: Vec<u8>) -> Result<()>;

    /// Waits for the next data frame.
    ///
    /// Returns `Ok(None)` once the peer has closed the link cleanly.
    async fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Whether the link is currently open for sending.
    fn is_open(&self) -> bool;

    /// Closes the link. Best effort and idempotent.
    async fn close(&mut self);
}
