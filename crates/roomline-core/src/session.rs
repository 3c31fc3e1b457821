//! Session layer state machine.
//!
//! Owns the single logical connection to the relay. Uses the action pattern:
//! methods take user intents or transport lifecycle events as input and return
//! [`SessionAction`]s for the driver to execute. The state machine performs no
//! I/O, which keeps it deterministic and easy to test.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐  connect   ┌────────────┐   Opened    ┌───────────┐
//! │ Disconnected │───────────>│ Connecting │────────────>│ Connected │
//! └──────────────┘            └────────────┘             └───────────┘
//!        ^                          │                          │
//!        │      disconnect/Closed   │     disconnect/Closed    │
//!        └──────────────────────────┴──────────────────────────┘
//! ```
//!
//! # Generations
//!
//! Every transport handle the session opens is tagged with a fresh
//! [`Generation`]. Lifecycle events carry the generation of the handle that
//! produced them, and events from any generation other than the live one are
//! dropped. A close arriving late from a superseded connection therefore
//! cannot tear down its replacement.

use std::fmt;

use crate::{
    Roster,
    dispatcher::dispatch,
    error::SessionError,
    render::RenderUpdate,
};

/// Relay endpoint used when none is configured.
pub const DEFAULT_SERVER_ADDRESS: &str = "ws://127.0.0.1:8080/";

/// Connection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No transport handle
    #[default]
    Disconnected,
    /// Handle opened, waiting for the transport to report it is open
    Connecting,
    /// Transport open, frames flow both ways
    Connected,
}

impl ConnectionState {
    /// Binary indicator shown by simple status views.
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(text)
    }
}

/// Tag identifying one transport handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Wrap a raw generation number.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw generation number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle events reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    /// Handle that produced the event.
    pub generation: Generation,
    /// What happened.
    pub kind: TransportEventKind,
}

/// Kind of transport lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    /// Connection established.
    Opened,
    /// One complete inbound text frame.
    Frame(String),
    /// Connection ended (peer close, network failure, or local close).
    Closed {
        /// Human-readable cause.
        reason: String,
    },
}

impl TransportEvent {
    /// `Opened` for `generation`.
    pub fn opened(generation: Generation) -> Self {
        Self { generation, kind: TransportEventKind::Opened }
    }

    /// `Frame` for `generation`.
    pub fn frame(generation: Generation, text: impl Into<String>) -> Self {
        Self { generation, kind: TransportEventKind::Frame(text.into()) }
    }

    /// `Closed` for `generation`.
    pub fn closed(generation: Generation, reason: impl Into<String>) -> Self {
        Self { generation, kind: TransportEventKind::Closed { reason: reason.into() } }
    }
}

/// Actions returned by the session state machine.
///
/// The driver executes these in order:
/// - `Open`/`Send`/`Close`: transport commands for a specific handle
/// - `Render`: hand the update to the matching view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a transport handle to `address`, tagged with `generation`.
    Open {
        /// Tag for the new handle.
        generation: Generation,
        /// Relay endpoint.
        address: String,
    },

    /// Send a text frame verbatim on the handle.
    Send {
        /// Target handle.
        generation: Generation,
        /// Frame text.
        text: String,
    },

    /// Close the handle.
    Close {
        /// Handle to close.
        generation: Generation,
    },

    /// Update the display.
    Render(RenderUpdate),
}

/// Session state machine
///
/// Owns the connection state, the live transport generation, and the roster.
/// Constructed once per client and passed by reference; there is no global
/// connection state.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current state
    state: ConnectionState,
    /// Relay endpoint
    address: String,
    /// Most recently issued generation
    last_generation: Generation,
    /// Generation of the live handle. `None` when no handle exists.
    live: Option<Generation>,
    /// Room membership for the live connection
    roster: Roster,
}

impl Session {
    /// Create a disconnected session for `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            address: address.into(),
            last_generation: Generation::default(),
            live: None,
            roster: Roster::new(),
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Relay endpoint
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Generation of the live handle. `None` if disconnected.
    pub fn live_generation(&self) -> Option<Generation> {
        self.live
    }

    /// Current room membership
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Open a fresh connection.
    ///
    /// An existing handle is closed first (a full disconnect transition), so
    /// at most one handle is ever live. Moves to
    /// [`ConnectionState::Connecting`].
    pub fn connect(&mut self) -> Vec<SessionAction> {
        let mut actions = self.disconnect();

        let generation = self.last_generation.next();
        self.last_generation = generation;
        self.live = Some(generation);
        self.state = ConnectionState::Connecting;

        tracing::info!(%generation, address = %self.address, "connecting");

        actions.push(SessionAction::Open { generation, address: self.address.clone() });
        actions.push(SessionAction::Render(RenderUpdate::Status(self.state)));
        actions
    }

    /// Close the live connection and clear the roster.
    ///
    /// No-op when already disconnected.
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        let Some(generation) = self.live.take() else {
            return vec![];
        };

        tracing::info!(%generation, "disconnecting");

        let mut actions = vec![SessionAction::Close { generation }];
        actions.extend(self.enter_disconnected());
        actions
    }

    /// Disconnect if a handle exists, otherwise connect.
    pub fn toggle(&mut self) -> Vec<SessionAction> {
        if self.live.is_some() { self.disconnect() } else { self.connect() }
    }

    /// Send `text` verbatim on the live connection.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotConnected` unless in [`ConnectionState::Connected`]
    pub fn send(&self, text: impl Into<String>) -> Result<Vec<SessionAction>, SessionError> {
        let (ConnectionState::Connected, Some(generation)) = (self.state, self.live) else {
            return Err(SessionError::NotConnected { state: self.state });
        };

        Ok(vec![SessionAction::Send { generation, text: text.into() }])
    }

    /// Process a transport lifecycle event.
    ///
    /// Events from stale generations are ignored.
    pub fn handle_transport(&mut self, event: TransportEvent) -> Vec<SessionAction> {
        if self.live != Some(event.generation) {
            tracing::debug!(
                generation = %event.generation,
                live = ?self.live,
                "dropping event from stale transport"
            );
            return vec![];
        }

        match event.kind {
            TransportEventKind::Opened => self.handle_opened(),
            TransportEventKind::Frame(text) => self.handle_frame(&text),
            TransportEventKind::Closed { reason } => self.handle_closed(&reason),
        }
    }

    fn handle_opened(&mut self) -> Vec<SessionAction> {
        if self.state != ConnectionState::Connecting {
            return vec![];
        }

        self.state = ConnectionState::Connected;
        tracing::info!(generation = ?self.live, "connected");
        vec![SessionAction::Render(RenderUpdate::Status(self.state))]
    }

    fn handle_frame(&mut self, text: &str) -> Vec<SessionAction> {
        dispatch(&mut self.roster, text).into_iter().map(SessionAction::Render).collect()
    }

    /// Transport-initiated close. Same path as [`Session::disconnect`] but
    /// the handle is already gone, so no close command is issued.
    fn handle_closed(&mut self, reason: &str) -> Vec<SessionAction> {
        let generation = self.live.take();
        tracing::info!(?generation, %reason, "connection closed by transport");
        self.enter_disconnected()
    }

    fn enter_disconnected(&mut self) -> Vec<SessionAction> {
        self.state = ConnectionState::Disconnected;
        self.roster.reset();

        vec![
            SessionAction::Render(RenderUpdate::Status(self.state)),
            SessionAction::Render(RenderUpdate::roster(&self.roster)),
        ]
    }
}
