//! Cryptographic utilities for the batcher client
//!
//! Provides:
//! - Keccak-256 commitments over submitted verification data
//! - Merkle leaf hashing and inclusion path verification
//!
//! Client and batcher derive these values independently and must agree byte
//! for byte, so the preimage layouts here are protocol surface.

mod commitment;
mod merkle;

pub use commitment::*;
pub use merkle::*;
