//! Frame encoding and decoding
//!
//! Requests go out as CBOR. Responses come back as CBOR in binary frames,
//! but a batcher may answer in JSON text frames as well, so decoding
//! dispatches on the frame kind it actually received.

use thiserror::Error;

use super::ClientMessage;
use crate::domain::BatchInclusionData;
use crate::transport::Frame;

/// Errors serializing requests or parsing batcher responses.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Request failed to serialize as CBOR
    #[error("cbor encoding failed: {0}")]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),
    /// Binary response frame was not valid CBOR for the expected shape
    #[error("cbor decoding failed: {0}")]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),
    /// Text response frame was not valid JSON for the expected shape
    #[error("json decoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a request envelope into the CBOR payload of one binary frame.
pub fn encode_submit(message: &ClientMessage) -> Result<Vec<u8>, CodecError> {
    let mut payload = Vec::new();
    ciborium::ser::into_writer(message, &mut payload)?;
    Ok(payload)
}

/// Decodes one batch inclusion response from a received frame.
pub fn decode_inclusion(frame: &Frame) -> Result<BatchInclusionData, CodecError> {
    match frame {
        Frame::Binary(payload) => Ok(ciborium::de::from_reader(payload.as_slice())?),
        Frame::Text(text) => Ok(serde_json::from_str(text)?),
    }
}
