//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`], a handle to one connection running on its own
//! task. Lifecycle events for every handle go into a single caller-owned
//! channel, tagged with the handle's [`Generation`] so the session can tell
//! current events from stale ones.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use roomline_core::{Generation, TransportEvent};
use tokio::{sync::mpsc, task::AbortHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::TransportError;

/// Default time allowed for the WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default outbound queue depth per connection.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Time allowed for the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Outbound queue depth.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Handle to one WebSocket connection.
///
/// Dropping the handle (or calling [`ConnectedClient::close`]) closes the
/// socket gracefully. [`ConnectedClient::stop`] aborts the I/O task without a
/// close handshake.
#[derive(Debug)]
pub struct ConnectedClient {
    generation: Generation,
    to_server: mpsc::Sender<String>,
    abort_handle: AbortHandle,
}

impl ConnectedClient {
    /// Generation this handle was opened with.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Queue a text frame for the server.
    pub async fn send(&self, text: String) -> Result<(), TransportError> {
        self.to_server.send(text).await.map_err(|_| TransportError::Closed)
    }

    /// Close the connection with a WebSocket Close frame.
    ///
    /// The I/O task reports `Closed` once the socket is shut.
    pub fn close(self) {
        drop(self.to_server);
    }

    /// Abort the I/O task. No further events are reported for this handle.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Open a connection to `address` on a background task.
///
/// Emits `Opened` once the handshake completes, `Frame` for every inbound
/// text frame, and exactly one `Closed` when the connection ends for any
/// reason, including a failed or timed-out handshake.
pub fn spawn(
    generation: Generation,
    address: impl Into<String>,
    config: &TransportConfig,
    events: mpsc::Sender<TransportEvent>,
) -> ConnectedClient {
    let address = address.into();
    let connect_timeout = config.connect_timeout;
    let (to_server, outbound) = mpsc::channel(config.channel_capacity.max(1));

    let handle = tokio::spawn(async move {
        let reason =
            match run_connection(generation, &address, connect_timeout, outbound, &events).await {
                Ok(reason) => reason,
                Err(error) => {
                    tracing::warn!(%generation, %address, %error, "connection ended");
                    error.to_string()
                },
            };

        // Receiver gone means the front end is shutting down
        let _ = events.send(TransportEvent::closed(generation, reason)).await;
    });

    ConnectedClient { generation, to_server, abort_handle: handle.abort_handle() }
}

/// Run the connection, bridging between the channels and the socket.
///
/// Returns the close reason on an orderly shutdown from either side.
async fn run_connection(
    generation: Generation,
    address: &str,
    connect_timeout: Duration,
    mut outbound: mpsc::Receiver<String>,
    events: &mpsc::Sender<TransportEvent>,
) -> Result<String, TransportError> {
    let (socket, _response) = tokio::time::timeout(connect_timeout, connect_async(address))
        .await
        .map_err(|_| TransportError::Timeout(connect_timeout))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    tracing::debug!(%generation, %address, "websocket open");
    emit(events, TransportEvent::opened(generation)).await?;

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            text = outbound.recv() => {
                let Some(text) = text else {
                    // Handle closed locally; start the close handshake
                    sink.close()
                        .await
                        .map_err(|e| TransportError::Stream(format!("close failed: {e}")))?;
                    return Ok("closed locally".to_string());
                };

                sink.send(Message::text(text))
                    .await
                    .map_err(|e| TransportError::Stream(format!("write failed: {e}")))?;
            }

            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    emit(events, TransportEvent::frame(generation, text.as_str())).await?;
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|r| !r.is_empty())
                        .unwrap_or_else(|| "closed by server".to_string());
                    return Ok(reason);
                },
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!(%generation, len = data.len(), "ignoring binary frame");
                },
                // Pings are answered by tungstenite on the next read
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {},
                Some(Err(e)) => return Err(TransportError::Stream(format!("read failed: {e}"))),
                None => return Ok("connection reset".to_string()),
            },
        }
    }
}

async fn emit(
    events: &mpsc::Sender<TransportEvent>,
    event: TransportEvent,
) -> Result<(), TransportError> {
    events.send(event).await.map_err(|_| TransportError::Closed)
}
