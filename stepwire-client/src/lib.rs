//! Stepwire Client
//!
//! Client side of the job step exchange with the cluster controller.
//!
//! A query opens one session, sends a `REQUEST_JOB_STEP_INFO` envelope,
//! receives one reply, closes the session and then dispatches the reply into
//! either a [`JobStepCollection`] or a [`ProtocolError`].
//!
//! # Example
//!
//! ```no_run
//! use stepwire_client::JobStepQueryClient;
//! use stepwire_core::domain::step::StepId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = JobStepQueryClient::connect("127.0.0.1:6817");
//!
//!     let steps = client.query(100, StepId::ALL).await?;
//!     println!("{} step(s)", steps.len());
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod dispatch;
pub mod error;
mod steps;
pub mod tcp;
pub mod translate;
pub mod transport;

#[cfg(test)]
mod mock;

// Re-export commonly used types
pub use error::{ProtocolError, ProtocolErrorKind, Result, UnexpectedReply};
pub use stepwire_core::domain::step::{JobStepCollection, JobStepQuery, JobStepRecord, StepId};
pub use tcp::{TcpTransport, TcpTransportConfig};
pub use transport::{Session, Transport, TransportError};

/// Job step query client
///
/// Holds only the transport. Every query opens and closes its own session,
/// so no state is shared between queries.
#[derive(Debug, Clone)]
pub struct JobStepQueryClient<T> {
    transport: T,
}

impl<T: Transport> JobStepQueryClient<T> {
    /// Create a client on top of any transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl JobStepQueryClient<TcpTransport> {
    /// Create a client that talks TCP to the controller at `addr`
    ///
    /// # Example
    /// ```
    /// use stepwire_client::JobStepQueryClient;
    ///
    /// let client = JobStepQueryClient::connect("127.0.0.1:6817");
    /// assert_eq!(client.transport().config().addr, "127.0.0.1:6817");
    /// ```
    pub fn connect(addr: impl Into<String>) -> Self {
        Self::new(TcpTransport::new(addr))
    }

    /// Create a TCP client with custom timeouts or frame limits
    pub fn with_config(config: TcpTransportConfig) -> Self {
        Self::new(TcpTransport::with_config(config))
    }
}
