//! TCP transport
//!
//! Sessions are plain TCP connections framed with [`MessageCodec`]. Deadlines
//! for connecting and for each read or write are configured here and nowhere
//! else.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use stepwire_core::protocol::{
    CodecError, DEFAULT_MAX_FRAME_LENGTH, MessageCodec, MessageEnvelope, Received,
};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::transport::{Session, Transport, TransportError};

/// Default controller port
pub const DEFAULT_CONTROLLER_PORT: u16 = 6817;

/// TCP transport configuration
#[derive(Debug, Clone)]
pub struct TcpTransportConfig {
    /// Controller address (e.g., "127.0.0.1:6817")
    pub addr: String,
    /// Deadline for establishing the connection
    pub connect_timeout: Option<Duration>,
    /// Deadline for each send, receive and close
    pub io_timeout: Option<Duration>,
    /// Largest reply frame accepted
    pub max_frame_length: usize,
}

impl TcpTransportConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: None,
            io_timeout: None,
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }

    /// Apply the same deadline to connecting and to every I/O operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self.io_timeout = Some(timeout);
        self
    }
}

/// Transport that opens one TCP connection per session
#[derive(Debug, Clone)]
pub struct TcpTransport {
    config: TcpTransportConfig,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(TcpTransportConfig::new(addr))
    }

    pub fn with_config(config: TcpTransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TcpTransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for TcpTransport {
    type Session = TcpSession;

    async fn open(&self) -> Result<TcpSession, TransportError> {
        let addr = self.config.addr.clone();
        let stream = with_timeout(self.config.connect_timeout, async {
            TcpStream::connect(&addr)
                .await
                .map_err(|source| TransportError::Connect {
                    addr: addr.clone(),
                    source,
                })
        })
        .await?;

        Ok(TcpSession {
            framed: Framed::new(
                stream,
                MessageCodec::with_max_frame_length(self.config.max_frame_length),
            ),
            io_timeout: self.config.io_timeout,
        })
    }
}

/// One framed TCP connection
pub struct TcpSession {
    framed: Framed<TcpStream, MessageCodec>,
    io_timeout: Option<Duration>,
}

#[async_trait]
impl Session for TcpSession {
    async fn send(&mut self, envelope: MessageEnvelope) -> Result<(), TransportError> {
        let framed = &mut self.framed;
        with_timeout(self.io_timeout, async {
            framed.send(envelope).await.map_err(from_codec)
        })
        .await
    }

    async fn receive(&mut self) -> Result<Received, TransportError> {
        let framed = &mut self.framed;
        with_timeout(self.io_timeout, async {
            match framed.next().await {
                Some(Ok(received)) => Ok(received),
                Some(Err(e)) => Err(from_codec(e)),
                None => Err(TransportError::ConnectionClosed),
            }
        })
        .await
    }

    async fn close(mut self) -> Result<(), TransportError> {
        let framed = &mut self.framed;
        with_timeout(self.io_timeout, async {
            SinkExt::<MessageEnvelope>::close(framed)
                .await
                .map_err(from_codec)
        })
        .await
    }
}

fn from_codec(err: CodecError) -> TransportError {
    match err {
        CodecError::Io(e) => TransportError::Io(e),
        other => TransportError::Codec(other),
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TransportError::Timeout(limit))?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwire_core::domain::step::JobStepQuery;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_config_defaults() {
        let config = TcpTransportConfig::new("127.0.0.1:6817");
        assert!(config.connect_timeout.is_none());
        assert!(config.io_timeout.is_none());
        assert_eq!(config.max_frame_length, DEFAULT_MAX_FRAME_LENGTH);

        let config = config.with_timeout(Duration::from_secs(3));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.io_timeout, Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_connect_refused_is_connect_error() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = TcpTransport::new(addr).open().await.err().unwrap();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_zero_length_reply_is_received_as_empty() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut framed = Framed::new(socket, MessageCodec::new());
            assert!(framed.next().await.is_some());
            framed.get_mut().write_all(&[0, 0, 0, 0]).await.unwrap();
            // Wait for the client to shut down its side
            assert!(framed.next().await.is_none());
        });

        let mut session = TcpTransport::new(addr).open().await.unwrap();
        let request = MessageEnvelope::RequestJobStepInfo(JobStepQuery::all_steps(1));
        session.send(request).await.unwrap();
        assert_eq!(session.receive().await.unwrap(), Received::Empty);
        session.close().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_peer_close_before_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let mut session = TcpTransport::new(addr).open().await.unwrap();
        server.await.unwrap();
        let err = session.receive().await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::ConnectionClosed | TransportError::Io(_)
        ));
    }

    #[tokio::test]
    async fn test_receive_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(socket);
        });

        let config = TcpTransportConfig::new(addr).with_timeout(Duration::from_millis(50));
        let mut session = TcpTransport::with_config(config).open().await.unwrap();
        let err = session.receive().await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
        server.await.unwrap();
    }
}
