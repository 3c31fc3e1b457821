//! Relay driver.
//!
//! Sans-IO core of the relay: assigns user ids, stamps and records lines,
//! replays history to newcomers, and tracks heartbeats. The runtime feeds it
//! [`RelayEvent`]s and executes the returned [`RelayAction`]s.

use std::{collections::BTreeMap, time::Duration};

use roomline_proto::{ChatLine, FrameFormat};

use crate::{Environment, ServerError, history::History};

/// Smallest user id handed out.
pub const USER_ID_MIN: u32 = 1000;

/// One past the largest user id handed out.
pub const USER_ID_MAX: u32 = 10_000;

/// Default number of history lines kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5000;

/// Default silence allowed before a client is dropped.
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(15);

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// History lines kept for replay
    pub history_capacity: usize,
    /// Silence allowed before a client is dropped
    pub heartbeat_timeout: Duration,
    /// Outbound frame encoding
    pub format: FrameFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            format: FrameFormat::Legacy,
        }
    }
}

/// Events that the relay driver processes.
///
/// These are produced by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// WebSocket handshake completed
    ClientAccepted {
        /// Connection ID assigned by the runtime
        client_id: u64,
    },

    /// Text frame received from a client
    TextReceived {
        /// Client that sent the frame
        client_id: u64,
        /// Frame text
        text: String,
    },

    /// Pong received from a client
    PongReceived {
        /// Client that answered
        client_id: u64,
    },

    /// Connection ended (by peer, error, or a `Close` action)
    ClientClosed {
        /// Client that went away
        client_id: u64,
        /// Reason for closure
        reason: String,
    },

    /// Periodic heartbeat tick
    Tick,
}

/// Actions that the relay driver produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayAction {
    /// Send a frame to one client
    SendTo {
        /// Target client
        client_id: u64,
        /// Frame text
        text: String,
    },

    /// Send a frame to every connected client
    Broadcast {
        /// Frame text
        text: String,
    },

    /// Send a WebSocket ping
    Ping {
        /// Target client
        client_id: u64,
    },

    /// Close a connection
    Close {
        /// Client to close
        client_id: u64,
        /// Reason for closure
        reason: String,
    },
}

#[derive(Debug, Clone)]
struct Client<I> {
    user_id: u32,
    last_seen: I,
}

/// Action-based relay driver.
pub struct RelayDriver<E: Environment> {
    /// Connected clients by connection ID
    clients: BTreeMap<u64, Client<E::Instant>>,
    /// Lines replayed to newcomers
    history: History,
    /// Environment (time, RNG)
    env: E,
    /// Relay configuration
    config: RelayConfig,
}

impl<E: Environment> RelayDriver<E> {
    /// Create a new relay driver.
    pub fn new(env: E, config: RelayConfig) -> Self {
        Self { clients: BTreeMap::new(), history: History::new(config.history_capacity), env, config }
    }

    /// Process a relay event and return actions to execute.
    pub fn process_event(&mut self, event: RelayEvent) -> Result<Vec<RelayAction>, ServerError> {
        match event {
            RelayEvent::ClientAccepted { client_id } => self.handle_accepted(client_id),
            RelayEvent::TextReceived { client_id, text } => self.handle_text(client_id, text),
            RelayEvent::PongReceived { client_id } => {
                let now = self.env.now();
                let client =
                    self.clients.get_mut(&client_id).ok_or(ServerError::ClientNotFound(client_id))?;
                client.last_seen = now;
                Ok(vec![])
            },
            RelayEvent::ClientClosed { client_id, reason } => self.handle_closed(client_id, &reason),
            RelayEvent::Tick => Ok(self.handle_tick()),
        }
    }

    /// User id assigned to a connection.
    pub fn user_id(&self, client_id: u64) -> Option<u32> {
        self.clients.get(&client_id).map(|c| c.user_id)
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Recorded history.
    pub fn history(&self) -> &History {
        &self.history
    }

    fn handle_accepted(&mut self, client_id: u64) -> Result<Vec<RelayAction>, ServerError> {
        if self.clients.contains_key(&client_id) {
            return Err(ServerError::ClientAlreadyExists(client_id));
        }

        let Some(user_id) = self.allocate_user_id() else {
            return Ok(vec![RelayAction::Close { client_id, reason: "room full".to_string() }]);
        };

        let mut actions = Vec::with_capacity(self.history.len() + 1);
        for line in self.history.iter() {
            actions.push(RelayAction::SendTo { client_id, text: line.encode(self.config.format)? });
        }

        self.clients.insert(client_id, Client { user_id, last_seen: self.env.now() });
        tracing::info!(client_id, user_id, replayed = actions.len(), "client joined");

        actions.push(self.record(ChatLine::joined(user_id, self.env.wall_clock()))?);
        Ok(actions)
    }

    fn handle_text(&mut self, client_id: u64, text: String) -> Result<Vec<RelayAction>, ServerError> {
        let now = self.env.now();
        let client =
            self.clients.get_mut(&client_id).ok_or(ServerError::ClientNotFound(client_id))?;
        client.last_seen = now;
        let user_id = client.user_id;

        Ok(vec![self.record(ChatLine::message(user_id, self.env.wall_clock(), text))?])
    }

    /// Announce a departure. Unknown clients are ignored so a connection
    /// that is reported closed twice leaves only once.
    fn handle_closed(
        &mut self,
        client_id: u64,
        reason: &str,
    ) -> Result<Vec<RelayAction>, ServerError> {
        let Some(client) = self.clients.remove(&client_id) else {
            return Ok(vec![]);
        };

        tracing::info!(client_id, user_id = client.user_id, %reason, "client left");
        Ok(vec![self.record(ChatLine::left(client.user_id, self.env.wall_clock()))?])
    }

    fn handle_tick(&self) -> Vec<RelayAction> {
        let now = self.env.now();

        self.clients
            .iter()
            .map(|(&client_id, client)| {
                if now - client.last_seen > self.config.heartbeat_timeout {
                    tracing::info!(client_id, user_id = client.user_id, "heartbeat timeout");
                    RelayAction::Close { client_id, reason: "heartbeat timeout".to_string() }
                } else {
                    RelayAction::Ping { client_id }
                }
            })
            .collect()
    }

    /// Store a line and broadcast it.
    fn record(&mut self, line: ChatLine) -> Result<RelayAction, ServerError> {
        let text = line.encode(self.config.format)?;
        self.history.push(line);
        Ok(RelayAction::Broadcast { text })
    }

    /// Random id in `USER_ID_MIN..USER_ID_MAX` not held by a connected client.
    fn allocate_user_id(&self) -> Option<u32> {
        let space = u64::from(USER_ID_MAX - USER_ID_MIN);
        if self.clients.len() as u64 >= space {
            return None;
        }

        loop {
            let candidate = USER_ID_MIN + (self.env.random_u64() % space) as u32;
            if !self.clients.values().any(|c| c.user_id == candidate) {
                return Some(candidate);
            }
        }
    }
}
