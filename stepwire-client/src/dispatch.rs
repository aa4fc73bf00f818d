//! Reply dispatch
//!
//! Turns a received reply into either job step data or a [`ProtocolError`].
//! The match below lists every envelope variant; adding a variant to
//! [`MessageEnvelope`] fails to compile until it is handled here.

use stepwire_core::domain::step::JobStepCollection;
use stepwire_core::protocol::{MessageEnvelope, Received};
use tracing::debug;

use crate::error::{ProtocolError, Result, UnexpectedReply};
use crate::translate;

/// Dispatch a reply to a job step request
///
/// A success return code carries no job step payload and yields an empty
/// collection: callers see it exactly as they would see zero records.
pub fn dispatch(received: Received) -> Result<JobStepCollection> {
    let Some(envelope) = received.into_envelope() else {
        return Err(ProtocolError::UnexpectedReplyKind(UnexpectedReply::Empty));
    };

    match envelope {
        MessageEnvelope::ResponseJobStepInfo(collection) => Ok(collection),
        MessageEnvelope::ResponseReturnCode(rc) => {
            match translate::from_return_code(rc.return_code) {
                Some(err) => Err(err),
                None => {
                    debug!("controller returned success without job step data");
                    Ok(JobStepCollection::empty())
                }
            }
        }
        MessageEnvelope::RequestJobStepInfo(_) | MessageEnvelope::Other { .. } => {
            let msg_type = envelope.msg_type();
            Err(ProtocolError::UnexpectedReplyKind(UnexpectedReply::MessageType(msg_type)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolErrorKind;
    use stepwire_core::domain::step::{JobStepQuery, JobStepRecord};

    #[test]
    fn test_collection_reply_is_returned_unchanged() {
        let collection = JobStepCollection::new(
            9,
            vec![JobStepRecord {
                job_id: 4,
                step_id: 2,
                user_id: 0,
                start_time: 1,
                partition: "batch".to_string(),
                nodes: "n[1-4]".to_string(),
            }],
        );
        let result = dispatch(Received::Envelope(MessageEnvelope::ResponseJobStepInfo(
            collection.clone(),
        )));
        assert_eq!(result.unwrap(), collection);
    }

    #[test]
    fn test_nonzero_return_code_is_controller_error() {
        let err = dispatch(Received::Envelope(MessageEnvelope::return_code(5))).unwrap_err();
        assert_eq!(err.return_code(), Some(5));
    }

    #[test]
    fn test_zero_return_code_is_empty_success() {
        let collection = dispatch(Received::Envelope(MessageEnvelope::return_code(0))).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_unknown_message_type_is_unexpected() {
        let err = dispatch(Received::Envelope(MessageEnvelope::Other {
            msg_type: 1234,
            data: serde_json::Value::Null,
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedReplyKind(UnexpectedReply::MessageType(1234))
        ));
    }

    #[test]
    fn test_echoed_request_is_unexpected() {
        let err = dispatch(Received::Envelope(MessageEnvelope::RequestJobStepInfo(
            JobStepQuery::all_steps(1),
        )))
        .unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::UnexpectedReplyKind);
    }

    #[test]
    fn test_empty_reply_is_unexpected() {
        let err = dispatch(Received::Empty).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedReplyKind(UnexpectedReply::Empty)
        ));
    }
}
