//! TCP server
//!
//! Accepts connections and answers exactly one request per connection, then
//! closes it. A failed accept is logged and the loop keeps going.

use std::io;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream};
use futures::{SinkExt, StreamExt};
use stepwire_core::protocol::{CodecError, MessageCodec, MessageEnvelope};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::service;
use crate::table::StepTable;

/// Pause after a failed accept so a persistent error does not spin
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(25);

type Accepted = io::Result<(TcpStream, SocketAddr)>;

/// Serve requests on `listener` for as long as the process runs
pub async fn serve(listener: TcpListener, table: Arc<StepTable>, max_frame_length: usize) {
    serve_incoming(incoming(listener), table, max_frame_length).await
}

fn incoming(listener: TcpListener) -> impl Stream<Item = Accepted> {
    stream::unfold(listener, |listener| async move {
        let accepted = listener.accept().await;
        Some((accepted, listener))
    })
}

async fn serve_incoming<I>(incoming: I, table: Arc<StepTable>, max_frame_length: usize)
where
    I: Stream<Item = Accepted>,
{
    let mut incoming = pin!(incoming);
    while let Some(accepted) = incoming.next().await {
        let (socket, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        let table = Arc::clone(&table);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, peer, &table, max_frame_length).await {
                warn!("Connection from {} failed: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    table: &StepTable,
    max_frame_length: usize,
) -> Result<(), CodecError> {
    let codec = MessageCodec::with_max_frame_length(max_frame_length);
    let mut framed = Framed::new(socket, codec);

    let Some(request) = framed.next().await.transpose()? else {
        debug!("{} disconnected without a request", peer);
        return Ok(());
    };

    let reply = service::handle(table, request);
    info!("Answering {} with message type {}", peer, reply.msg_type());
    framed.send(reply).await?;
    SinkExt::<MessageEnvelope>::close(&mut framed).await?;

    Ok(())
}
