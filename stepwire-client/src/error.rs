//! Error types for the Stepwire client

use std::fmt;

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can end a job step query
///
/// Categories are assigned only by [`crate::translate`]. Transport failures
/// keep the underlying [`TransportError`] as their source; print the error
/// chain (e.g. `{:#}` with anyhow) to see it.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Session with the controller could not be opened
    #[error("unable to connect to controller")]
    ConnectionFailed(#[source] TransportError),

    /// Request could not be sent
    #[error("failed to send request to controller")]
    SendFailed(#[source] TransportError),

    /// Reply could not be received
    #[error("failed to receive reply from controller")]
    ReceiveFailed(#[source] TransportError),

    /// Session could not be shut down cleanly
    #[error("failed to shut down controller connection")]
    ShutdownFailed(#[source] TransportError),

    /// Controller answered with a non-zero return code
    #[error("controller returned error code {0}")]
    ControllerReturnedError(i32),

    /// Reply was neither job step data nor a return code
    #[error("unexpected reply from controller: {0}")]
    UnexpectedReplyKind(UnexpectedReply),
}

/// What arrived instead of a usable reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnexpectedReply {
    /// Zero-length reply, nothing was decoded
    Empty,
    /// Reply carried a message type that is not a job step reply
    MessageType(u16),
}

impl fmt::Display for UnexpectedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnexpectedReply::Empty => write!(f, "empty reply"),
            UnexpectedReply::MessageType(msg_type) => write!(f, "message type {}", msg_type),
        }
    }
}

/// Payload-free classification of a [`ProtocolError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    ConnectionFailed,
    SendFailed,
    ReceiveFailed,
    ShutdownFailed,
    ControllerReturnedError,
    UnexpectedReplyKind,
}

impl ProtocolError {
    pub fn kind(&self) -> ProtocolErrorKind {
        match self {
            Self::ConnectionFailed(_) => ProtocolErrorKind::ConnectionFailed,
            Self::SendFailed(_) => ProtocolErrorKind::SendFailed,
            Self::ReceiveFailed(_) => ProtocolErrorKind::ReceiveFailed,
            Self::ShutdownFailed(_) => ProtocolErrorKind::ShutdownFailed,
            Self::ControllerReturnedError(_) => ProtocolErrorKind::ControllerReturnedError,
            Self::UnexpectedReplyKind(_) => ProtocolErrorKind::UnexpectedReplyKind,
        }
    }

    /// Controller return code, if the controller reported the failure
    pub fn return_code(&self) -> Option<i32> {
        match self {
            Self::ControllerReturnedError(code) => Some(*code),
            _ => None,
        }
    }

    /// Check if this error originated in the transport rather than the controller
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::SendFailed(_)
                | Self::ReceiveFailed(_)
                | Self::ShutdownFailed(_)
        )
    }

    /// Underlying transport failure, if any
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::ConnectionFailed(e)
            | Self::SendFailed(e)
            | Self::ReceiveFailed(e)
            | Self::ShutdownFailed(e) => Some(e),
            Self::ControllerReturnedError(_) | Self::UnexpectedReplyKind(_) => None,
        }
    }
}
