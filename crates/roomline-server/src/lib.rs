//! Roomline relay server.
//!
//! A single chat room over WebSocket. Every connected client receives every
//! line; newcomers get the recent history first.
//!
//! # Architecture
//!
//! [`RelayDriver`] follows the Sans-IO pattern: it consumes [`RelayEvent`]s
//! and returns [`RelayAction`]s without touching a socket. [`Server`] owns the
//! TCP listener, runs one task per connection, and executes the actions
//! through per-client outboxes.
//!
//! # Components
//!
//! - [`RelayDriver`]: Action-based relay logic (pure, no I/O)
//! - [`Server`]: Tokio runtime that executes driver actions
//! - [`History`]: Bounded line history replayed to newcomers
//! - [`SystemEnv`]: Production environment (real time, OS RNG)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod env;
mod error;
mod history;
mod system_env;

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

pub use driver::{
    DEFAULT_HEARTBEAT_TIMEOUT, DEFAULT_HISTORY_CAPACITY, RelayAction, RelayConfig, RelayDriver,
    RelayEvent, USER_ID_MAX, USER_ID_MIN,
};
pub use env::Environment;
pub use error::ServerError;
use futures::{SinkExt, StreamExt};
pub use history::History;
pub use roomline_proto::FrameFormat;
pub use system_env::SystemEnv;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{Mutex, mpsc},
};
use tokio_tungstenite::{
    accept_async,
    tungstenite::{
        Message,
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Default number of live frames queued per client.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Default interval between heartbeat pings.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0:8080")
    pub bind_address: String,
    /// Live frames queued per client before lines are dropped for it
    pub outbox_capacity: usize,
    /// Interval between heartbeat ticks
    pub heartbeat_interval: Duration,
    /// Relay configuration (history, timeouts, format)
    pub relay: RelayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            relay: RelayConfig::default(),
        }
    }
}

/// Frame queued for one connection task.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Ping,
    Close(String),
}

/// Driver plus the outboxes its actions are delivered to.
struct Relay {
    driver: RelayDriver<SystemEnv>,
    outboxes: HashMap<u64, mpsc::Sender<Outbound>>,
}

type SharedRelay = Arc<Mutex<Relay>>;

/// Production Roomline relay.
///
/// Wraps [`RelayDriver`] with a TCP listener and WebSocket connections.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Bind the listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        if config.outbox_capacity == 0 {
            return Err(ServerError::Config("outbox capacity must be positive".to_string()));
        }
        if config.heartbeat_interval.is_zero() {
            return Err(ServerError::Config("heartbeat interval must be positive".to_string()));
        }

        let listener = TcpListener::bind(&config.bind_address).await?;
        Ok(Self { listener, config })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server, accepting connections and relaying lines.
    ///
    /// This method runs until the task is cancelled or accepting fails.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(address = %self.local_addr()?, "relay starting");

        let driver = RelayDriver::new(SystemEnv::new(), self.config.relay.clone());
        let relay = Arc::new(Mutex::new(Relay { driver, outboxes: HashMap::new() }));

        // A newcomer's outbox must hold the whole replay ahead of live lines
        let outbox_capacity = self.config.outbox_capacity + self.config.relay.history_capacity;

        let heartbeat =
            tokio::spawn(run_heartbeat(Arc::clone(&relay), self.config.heartbeat_interval));

        let mut next_client_id: u64 = 1;
        let result = loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let client_id = next_client_id;
                    next_client_id += 1;
                    let relay = Arc::clone(&relay);

                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, client_id, relay, outbox_capacity).await
                        {
                            tracing::debug!(client_id, %peer, error = %e, "connection error");
                        }
                    });
                },
                Err(e) => {
                    tracing::error!(error = %e, "accept error");
                    break Err(ServerError::Transport(e));
                },
            }
        };

        heartbeat.abort();
        result
    }
}

/// Feed periodic ticks into the driver.
async fn run_heartbeat(relay: SharedRelay, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let mut relay = relay.lock().await;
        match relay.driver.process_event(RelayEvent::Tick) {
            Ok(actions) => execute_actions(&mut relay, actions),
            Err(e) => tracing::warn!(error = %e, "tick processing error"),
        }
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    client_id: u64,
    relay: SharedRelay,
    outbox_capacity: usize,
) -> Result<(), ServerError> {
    let ws = accept_async(stream).await.map_err(|e| ServerError::WebSocket(e.to_string()))?;
    let (mut sink, mut source) = ws.split();
    let (outbox, mut inbox) = mpsc::channel(outbox_capacity);

    {
        let mut relay = relay.lock().await;
        relay.outboxes.insert(client_id, outbox);
        match relay.driver.process_event(RelayEvent::ClientAccepted { client_id }) {
            Ok(actions) => execute_actions(&mut relay, actions),
            Err(e) => {
                relay.outboxes.remove(&client_id);
                return Err(e);
            },
        }
    }

    let reason = loop {
        tokio::select! {
            outbound = inbox.recv() => {
                let message = match outbound {
                    Some(Outbound::Text(text)) => Message::text(text),
                    Some(Outbound::Ping) => Message::Ping(Vec::<u8>::new().into()),
                    Some(Outbound::Close(reason)) => {
                        let frame =
                            CloseFrame { code: CloseCode::Away, reason: reason.clone().into() };
                        let _ = sink.send(Message::Close(Some(frame))).await;
                        break reason;
                    },
                    None => break "dropped by relay".to_string(),
                };

                if let Err(e) = sink.send(message).await {
                    break format!("write failed: {e}");
                }
            }

            inbound = source.next() => {
                let event = match inbound {
                    Some(Ok(Message::Text(text))) => {
                        RelayEvent::TextReceived { client_id, text: text.as_str().to_string() }
                    },
                    Some(Ok(Message::Pong(_))) => RelayEvent::PongReceived { client_id },
                    Some(Ok(Message::Close(_))) | None => break "closed by peer".to_string(),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => break format!("read failed: {e}"),
                };

                let mut relay = relay.lock().await;
                match relay.driver.process_event(event) {
                    Ok(actions) => execute_actions(&mut relay, actions),
                    Err(e) => tracing::warn!(client_id, error = %e, "frame processing error"),
                }
            }
        }
    };

    tracing::debug!(client_id, %reason, "connection ended");

    let mut relay = relay.lock().await;
    relay.outboxes.remove(&client_id);
    let actions = relay.driver.process_event(RelayEvent::ClientClosed { client_id, reason })?;
    execute_actions(&mut relay, actions);

    Ok(())
}

/// Execute relay actions against the outboxes.
///
/// Never blocks: a full outbox loses the frame for that client only.
fn execute_actions(relay: &mut Relay, actions: Vec<RelayAction>) {
    for action in actions {
        match action {
            RelayAction::SendTo { client_id, text } => {
                deliver(relay, client_id, Outbound::Text(text));
            },

            RelayAction::Broadcast { text } => {
                for (&client_id, outbox) in &relay.outboxes {
                    if outbox.try_send(Outbound::Text(text.clone())).is_err() {
                        tracing::warn!(client_id, "outbox full, dropping line");
                    }
                }
            },

            RelayAction::Ping { client_id } => {
                deliver(relay, client_id, Outbound::Ping);
            },

            RelayAction::Close { client_id, reason } => {
                tracing::info!(client_id, %reason, "closing connection");
                // Dropping the sender ends the connection even if the close
                // frame does not fit
                if let Some(outbox) = relay.outboxes.remove(&client_id) {
                    let _ = outbox.try_send(Outbound::Close(reason));
                }
            },
        }
    }
}

fn deliver(relay: &Relay, client_id: u64, frame: Outbound) {
    let Some(outbox) = relay.outboxes.get(&client_id) else {
        tracing::debug!(client_id, "no outbox for client");
        return;
    };

    if outbox.try_send(frame).is_err() {
        tracing::warn!(client_id, "outbox full, dropping frame");
    }
}
