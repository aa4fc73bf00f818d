//! Controller connection
//!
//! Owns one transport session for the lifetime of a single query. Each
//! operation is one network interaction and maps its failure through
//! [`crate::translate`].
//!
//! [`ControllerConnection::close`] consumes the connection. A connection that
//! is dropped without being closed (for instance when the query future is
//! cancelled) still releases its session through the session's own
//! destructor.

use stepwire_core::protocol::{MessageEnvelope, Received};
use tracing::{debug, warn};

use crate::error::Result;
use crate::translate::{self, Stage};
use crate::transport::{Session, Transport, TransportError};

pub struct ControllerConnection<S: Session> {
    session: Option<S>,
}

impl<S: Session> ControllerConnection<S> {
    /// Open a session through `transport`
    pub async fn open<T>(transport: &T) -> Result<Self>
    where
        T: Transport<Session = S>,
    {
        let session = transport
            .open()
            .await
            .map_err(|e| translate::from_transport_failure(Stage::Open, e))?;
        debug!("controller connection opened");

        Ok(Self {
            session: Some(session),
        })
    }

    pub async fn send(&mut self, envelope: MessageEnvelope) -> Result<()> {
        let msg_type = envelope.msg_type();
        self.session(Stage::Send)?
            .send(envelope)
            .await
            .map_err(|e| translate::from_transport_failure(Stage::Send, e))?;
        debug!(msg_type, "request sent");
        Ok(())
    }

    pub async fn receive(&mut self) -> Result<Received> {
        let received = self
            .session(Stage::Receive)?
            .receive()
            .await
            .map_err(|e| translate::from_transport_failure(Stage::Receive, e))?;
        match &received {
            Received::Empty => debug!("received empty reply"),
            Received::Envelope(envelope) => {
                debug!(msg_type = envelope.msg_type(), "reply received")
            }
        }
        Ok(received)
    }

    /// Send `request` and wait for its reply
    pub async fn exchange(&mut self, request: MessageEnvelope) -> Result<Received> {
        self.send(request).await?;
        self.receive().await
    }

    /// Shut the session down
    pub async fn close(mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        session
            .close()
            .await
            .map_err(|e| translate::from_transport_failure(Stage::Close, e))?;
        debug!("controller connection closed");
        Ok(())
    }

    fn session(&mut self, stage: Stage) -> Result<&mut S> {
        let closed = || translate::from_transport_failure(stage, TransportError::ConnectionClosed);
        self.session.as_mut().ok_or_else(closed)
    }
}

impl<S: Session> Drop for ControllerConnection<S> {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!("controller connection dropped without close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolErrorKind;
    use crate::mock::{Call, Fail, ScriptedTransport};
    use stepwire_core::domain::step::{JobStepCollection, JobStepQuery};

    fn request() -> MessageEnvelope {
        MessageEnvelope::RequestJobStepInfo(JobStepQuery::all_steps(1))
    }

    #[tokio::test]
    async fn test_exchange_then_close() {
        let reply = MessageEnvelope::ResponseJobStepInfo(JobStepCollection::empty());
        let transport = ScriptedTransport::replying(reply.clone());

        let mut conn = ControllerConnection::open(&transport).await.unwrap();
        let received = conn.exchange(request()).await.unwrap();
        conn.close().await.unwrap();

        assert_eq!(received, Received::Envelope(reply));
        assert_eq!(
            transport.calls(),
            vec![Call::Open, Call::Send(request()), Call::Receive, Call::Close]
        );
    }

    #[tokio::test]
    async fn test_open_failure_is_connection_failed() {
        let transport = ScriptedTransport::failing(Fail::Open);
        let err = ControllerConnection::open(&transport).await.err().unwrap();
        assert_eq!(err.kind(), ProtocolErrorKind::ConnectionFailed);
    }

    #[tokio::test]
    async fn test_exchange_stops_after_send_failure() {
        let transport = ScriptedTransport::failing(Fail::Send);
        let mut conn = ControllerConnection::open(&transport).await.unwrap();

        let err = conn.exchange(request()).await.unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::SendFailed);
        assert!(!transport.calls().contains(&Call::Receive));
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_close_failure_is_shutdown_failed() {
        let transport = ScriptedTransport::failing(Fail::Close);
        let conn = ControllerConnection::open(&transport).await.unwrap();

        let err = conn.close().await.unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::ShutdownFailed);
    }

    #[tokio::test]
    async fn test_drop_without_close_releases_session() {
        let transport = ScriptedTransport::replying(MessageEnvelope::return_code(0));
        let conn = ControllerConnection::open(&transport).await.unwrap();
        drop(conn);

        assert_eq!(transport.calls(), vec![Call::Open, Call::Drop]);
    }
}
