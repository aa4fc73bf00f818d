//! Request handling
//!
//! Maps one decoded request to exactly one reply envelope.

use stepwire_core::protocol::{MessageEnvelope, Received};

use crate::table::StepTable;

/// Return code for a request the controller does not serve
pub const RC_UNEXPECTED_MESSAGE: i32 = 1;
/// Return code for a job with no matching steps
pub const RC_INVALID_JOB_ID: i32 = 2017;

/// Build the reply for `request`
pub fn handle(table: &StepTable, request: Received) -> MessageEnvelope {
    let envelope = match request {
        Received::Envelope(envelope) => envelope,
        Received::Empty => {
            tracing::warn!("Empty request frame");
            return MessageEnvelope::return_code(RC_UNEXPECTED_MESSAGE);
        }
    };

    match envelope {
        MessageEnvelope::RequestJobStepInfo(query) => {
            let steps = table.lookup(query.job_id, query.step_id);
            if steps.is_empty() {
                tracing::debug!("No steps for job {} step {}", query.job_id, query.step_id);
                return MessageEnvelope::return_code(RC_INVALID_JOB_ID);
            }
            tracing::debug!("Returning {} step(s) for job {}", steps.len(), query.job_id);
            MessageEnvelope::ResponseJobStepInfo(steps)
        }
        other => {
            tracing::warn!("Unexpected message type {}", other.msg_type());
            MessageEnvelope::return_code(RC_UNEXPECTED_MESSAGE)
        }
    }
}
