//! Transport collaborator
//!
//! The client never touches sockets directly. A [`Transport`] opens one
//! [`Session`] per query, and each session call performs exactly one network
//! interaction. Retries, timeouts and authentication belong to the transport.

use async_trait::async_trait;
use stepwire_core::protocol::{CodecError, MessageEnvelope, Received};
use thiserror::Error;

/// Errors reported by a transport implementation
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not establish a session with the controller
    #[error("cannot connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket level failure on an established session
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Frame could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Peer closed the session before a reply arrived
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Operation exceeded the transport's configured deadline
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Opens sessions to the controller
#[async_trait]
pub trait Transport: Send + Sync {
    type Session: Session;

    /// Open a new session
    async fn open(&self) -> Result<Self::Session, TransportError>;
}

/// One exclusive session with the controller
#[async_trait]
pub trait Session: Send + Sized {
    /// Send one envelope
    async fn send(&mut self, envelope: MessageEnvelope) -> Result<(), TransportError>;

    /// Receive one reply
    ///
    /// A zero-length reply is returned as [`Received::Empty`], not as an error.
    async fn receive(&mut self) -> Result<Received, TransportError>;

    /// Shut the session down
    async fn close(self) -> Result<(), TransportError>;
}
