//! Job step query

use stepwire_core::domain::step::{JobStepCollection, JobStepQuery, StepId};
use stepwire_core::protocol::{MessageEnvelope, Received};
use tracing::{debug, warn};

use crate::JobStepQueryClient;
use crate::connection::ControllerConnection;
use crate::dispatch;
use crate::error::Result;
use crate::transport::Transport;

impl<T: Transport> JobStepQueryClient<T> {
    /// Fetch job step state from the controller
    ///
    /// # Arguments
    /// * `job_id` - The job to query
    /// * `step_id` - One step, or [`StepId::ALL`] for every step of the job
    ///
    /// # Returns
    /// The job steps in controller order. A success return code without data
    /// is returned as an empty collection.
    ///
    /// # Errors
    /// The first transport failure (open, send, receive) wins, followed by
    /// any error carried by the reply itself. A failed close is reported
    /// only when the reply would otherwise have been returned.
    pub async fn query(
        &self,
        job_id: u32,
        step_id: impl Into<StepId>,
    ) -> Result<JobStepCollection> {
        self.get_job_steps(JobStepQuery {
            job_id,
            step_id: step_id.into(),
        })
        .await
    }

    /// Same as [`JobStepQueryClient::query`], taking a prepared [`JobStepQuery`]
    pub async fn get_job_steps(&self, query: JobStepQuery) -> Result<JobStepCollection> {
        debug!(job_id = query.job_id, step_id = %query.step_id, "querying job steps");

        let mut conn = ControllerConnection::open(&self.transport).await?;
        let exchanged = conn
            .exchange(MessageEnvelope::RequestJobStepInfo(query))
            .await;
        let closed = conn.close().await;

        settle(exchanged, closed)
    }
}

/// Decide the query outcome once the connection is closed
///
/// A close failure is recorded but only returned when neither the exchange
/// nor the dispatched reply produced an error of its own.
fn settle(exchanged: Result<Received>, closed: Result<()>) -> Result<JobStepCollection> {
    let outcome = exchanged.and_then(dispatch::dispatch);
    match (outcome, closed) {
        (outcome, Ok(())) => outcome,
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "ignoring close failure after earlier error");
            Err(err)
        }
    }
}
