//! Wire protocol
//!
//! Message envelopes exchanged with the controller and the frame codec that
//! carries them over a byte stream.

mod codec;
mod message;

pub use codec::{CodecError, DEFAULT_MAX_FRAME_LENGTH, MessageCodec, Received};
pub use message::{
    MessageEnvelope, MessageKind, REQUEST_JOB_STEP_INFO, RESPONSE_JOB_STEP_INFO, RESPONSE_SLURM_RC,
    ReturnCodeMsg, WireFrame,
};
