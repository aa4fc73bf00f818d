//! Framed codec for controller communication.
//!
//! Each frame is a 4-byte big-endian length prefix followed by a JSON
//! [`WireFrame`]. A frame of length zero carries no message at all and is
//! decoded as [`Received::Empty`].

use std::io;

use thiserror::Error;
use tokio_util::bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

use crate::protocol::message::{MessageEnvelope, WireFrame};

/// Largest frame accepted by default (8 MiB)
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 8 * 1024 * 1024;

/// Errors raised while encoding or decoding frames
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying stream or length prefix failure
    #[error("frame I/O error")]
    Io(#[from] io::Error),

    /// Frame body is not a valid JSON wire frame
    #[error("malformed frame")]
    Frame(#[source] serde_json::Error),

    /// Known message type whose payload does not match its shape
    #[error("malformed payload for message type {msg_type}")]
    Payload {
        msg_type: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of decoding one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    /// Zero-length frame, no payload decoded
    Empty,
    Envelope(MessageEnvelope),
}

impl Received {
    pub fn into_envelope(self) -> Option<MessageEnvelope> {
        match self {
            Received::Empty => None,
            Received::Envelope(envelope) => Some(envelope),
        }
    }
}

/// Codec that frames envelopes with a length prefix and serializes them as JSON.
pub struct MessageCodec {
    inner: LengthDelimitedCodec,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCodec {
    pub fn new() -> Self {
        Self::with_max_frame_length(DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(max_frame_length: usize) -> Self {
        Self {
            inner: LengthDelimitedCodec::builder()
                .length_field_length(4)
                .max_frame_length(max_frame_length)
                .new_codec(),
        }
    }
}

impl Decoder for MessageCodec {
    type Item = Received;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(bytes) = self.inner.decode(src)? else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(Some(Received::Empty));
        }
        let frame: WireFrame = serde_json::from_slice(&bytes).map_err(CodecError::Frame)?;
        let envelope = MessageEnvelope::from_frame(frame)?;
        Ok(Some(Received::Envelope(envelope)))
    }
}

impl Encoder<MessageEnvelope> for MessageCodec {
    type Error = CodecError;

    fn encode(&mut self, item: MessageEnvelope, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let frame = item.into_frame()?;
        let json = serde_json::to_vec(&frame).map_err(CodecError::Frame)?;
        self.inner.encode(Bytes::from(json), dst)?;
        Ok(())
    }
}
