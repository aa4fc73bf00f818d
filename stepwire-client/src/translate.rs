//! Error translation
//!
//! The only place that assigns [`ProtocolError`] categories. Controller return
//! codes and local transport failures both pass through here.

use crate::error::ProtocolError;
use crate::transport::TransportError;

/// Return code the controller uses for success
pub const SUCCESS: i32 = 0;

/// Exchange stage a transport failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Open,
    Send,
    Receive,
    Close,
}

/// Translate a controller return code
///
/// Returns `None` for [`SUCCESS`]; every other code is preserved unchanged.
pub fn from_return_code(code: i32) -> Option<ProtocolError> {
    if code == SUCCESS {
        None
    } else {
        Some(ProtocolError::ControllerReturnedError(code))
    }
}

/// Translate a transport failure observed at `stage`
pub fn from_transport_failure(stage: Stage, err: TransportError) -> ProtocolError {
    match stage {
        Stage::Open => ProtocolError::ConnectionFailed(err),
        Stage::Send => ProtocolError::SendFailed(err),
        Stage::Receive => ProtocolError::ReceiveFailed(err),
        Stage::Close => ProtocolError::ShutdownFailed(err),
    }
}
