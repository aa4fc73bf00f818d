//! Message envelope exchanged with the controller
//!
//! On the wire every message is a [`WireFrame`]: a numeric message type plus
//! a JSON payload. [`MessageEnvelope`] is the closed, typed view of a frame.
//! Message types this crate does not know about are kept as
//! [`MessageEnvelope::Other`] so the receiver decides what to do with them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::step::{JobStepCollection, JobStepQuery};
use crate::protocol::CodecError;

/// Request job step state from the controller
pub const REQUEST_JOB_STEP_INFO: u16 = 2005;
/// Job step state reply
pub const RESPONSE_JOB_STEP_INFO: u16 = 2006;
/// Return code only reply
pub const RESPONSE_SLURM_RC: u16 = 8001;

/// Serialized form of one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFrame {
    pub msg_type: u16,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of a return code reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnCodeMsg {
    pub return_code: i32,
}

/// Coarse classification of an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    ReplyCollection,
    ReplyReturnCode,
    Other,
}

/// One typed message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageEnvelope {
    RequestJobStepInfo(JobStepQuery),
    ResponseJobStepInfo(JobStepCollection),
    ResponseReturnCode(ReturnCodeMsg),
    Other {
        msg_type: u16,
        data: serde_json::Value,
    },
}

impl MessageEnvelope {
    pub fn return_code(return_code: i32) -> Self {
        MessageEnvelope::ResponseReturnCode(ReturnCodeMsg { return_code })
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            MessageEnvelope::RequestJobStepInfo(_) => MessageKind::Request,
            MessageEnvelope::ResponseJobStepInfo(_) => MessageKind::ReplyCollection,
            MessageEnvelope::ResponseReturnCode(_) => MessageKind::ReplyReturnCode,
            MessageEnvelope::Other { .. } => MessageKind::Other,
        }
    }

    /// Numeric message type as carried on the wire
    pub fn msg_type(&self) -> u16 {
        match self {
            MessageEnvelope::RequestJobStepInfo(_) => REQUEST_JOB_STEP_INFO,
            MessageEnvelope::ResponseJobStepInfo(_) => RESPONSE_JOB_STEP_INFO,
            MessageEnvelope::ResponseReturnCode(_) => RESPONSE_SLURM_RC,
            MessageEnvelope::Other { msg_type, .. } => *msg_type,
        }
    }

    pub fn into_frame(self) -> Result<WireFrame, CodecError> {
        let msg_type = self.msg_type();
        let data = match self {
            MessageEnvelope::RequestJobStepInfo(query) => to_payload(msg_type, &query)?,
            MessageEnvelope::ResponseJobStepInfo(steps) => to_payload(msg_type, &steps)?,
            MessageEnvelope::ResponseReturnCode(rc) => to_payload(msg_type, &rc)?,
            MessageEnvelope::Other { data, .. } => data,
        };
        Ok(WireFrame { msg_type, data })
    }

    pub fn from_frame(frame: WireFrame) -> Result<Self, CodecError> {
        let WireFrame { msg_type, data } = frame;
        let envelope = match msg_type {
            REQUEST_JOB_STEP_INFO => {
                MessageEnvelope::RequestJobStepInfo(from_payload(msg_type, data)?)
            }
            RESPONSE_JOB_STEP_INFO => {
                MessageEnvelope::ResponseJobStepInfo(from_payload(msg_type, data)?)
            }
            RESPONSE_SLURM_RC => MessageEnvelope::ResponseReturnCode(from_payload(msg_type, data)?),
            _ => MessageEnvelope::Other { msg_type, data },
        };
        Ok(envelope)
    }
}

fn to_payload<T: Serialize>(msg_type: u16, payload: &T) -> Result<serde_json::Value, CodecError> {
    serde_json::to_value(payload).map_err(|source| CodecError::Payload { msg_type, source })
}

fn from_payload<T: DeserializeOwned>(
    msg_type: u16,
    data: serde_json::Value,
) -> Result<T, CodecError> {
    serde_json::from_value(data).map_err(|source| CodecError::Payload { msg_type, source })
}
