//! Wire protocol: version handshake, request framing, response decoding

mod codec;
mod handshake;
mod messages;

pub use codec::*;
pub use handshake::*;
pub use messages::*;
