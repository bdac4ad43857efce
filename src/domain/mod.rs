//! Domain models for the batcher client
//!
//! Everything a caller hands to the client (proof artifacts, proving system
//! tag, generator address) and everything the client hands back (inclusion
//! data verified against the batch merkle root).

mod batch;
mod proving_system;
mod verification;

pub use batch::*;
pub use proving_system::*;
pub use verification::*;
