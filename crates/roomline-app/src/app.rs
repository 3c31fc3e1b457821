//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the chat client completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Owns the [`Session`] and translates its actions for the runtime.
//! - Keeps the message log, member list, and status for rendering.
//! - Edits the input line and runs slash commands on submit.

use std::collections::VecDeque;

use roomline_core::{ConnectionState, ParticipantId, RenderUpdate, Session, SessionAction};

use crate::{AppAction, AppEvent, Command, InputState, KeyInput, LogLine};

/// Lines kept in the message log before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable without a terminal or socket.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection lifecycle and roster.
    session: Session,
    /// Connection state as last rendered.
    state: ConnectionState,
    /// Chat log, oldest first.
    log: VecDeque<LogLine>,
    /// Maximum log length.
    log_capacity: usize,
    /// Member list as last rendered.
    members: Vec<ParticipantId>,
    /// Member list title.
    members_label: &'static str,
    /// Input line.
    input: InputState,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App for the relay at `server_address`.
    pub fn new(server_address: impl Into<String>) -> Self {
        Self::with_log_capacity(server_address, DEFAULT_LOG_CAPACITY)
    }

    /// Create a new App keeping at most `log_capacity` log lines.
    pub fn with_log_capacity(server_address: impl Into<String>, log_capacity: usize) -> Self {
        let session = Session::new(server_address);
        let members_label = session.roster().label();
        Self {
            session,
            state: ConnectionState::Disconnected,
            log: VecDeque::new(),
            log_capacity: log_capacity.max(1),
            members: Vec::new(),
            members_label,
            input: InputState::new(),
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Startup: connect once, as if the user pressed the connect toggle.
    pub fn start(&mut self) -> Vec<AppAction> {
        self.toggle()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Transport(event) => {
                let actions = self.session.handle_transport(event);
                self.apply(actions)
            },
        }
    }

    /// Open a fresh connection, replacing any existing one.
    pub fn connect(&mut self) -> Vec<AppAction> {
        let actions = self.session.connect();
        self.apply(actions)
    }

    /// Close the connection.
    pub fn disconnect(&mut self) -> Vec<AppAction> {
        let actions = self.session.disconnect();
        if actions.is_empty() {
            self.set_status("Already disconnected");
            return vec![AppAction::Render];
        }
        self.apply(actions)
    }

    /// Connect or disconnect depending on the current state.
    pub fn toggle(&mut self) -> Vec<AppAction> {
        let actions = self.session.toggle();
        self.apply(actions)
    }

    /// Send chat text on the live connection.
    ///
    /// When not connected nothing is sent and a status message explains why.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        match self.session.send(text) {
            Ok(actions) => {
                let mut actions = self.apply(actions);
                actions.push(AppAction::Render);
                actions
            },
            Err(error) => {
                tracing::debug!(%error, "message not sent");
                self.set_status(capitalize(&error.to_string()));
                vec![AppAction::Render]
            },
        }
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => self.quit(),
            KeyInput::Enter => self.submit(),
            other => {
                if self.input.edit(other) { vec![AppAction::Render] } else { vec![] }
            },
        }
    }

    /// Handle Enter: run a command or send the line.
    fn submit(&mut self) -> Vec<AppAction> {
        let text = self.input.buffer().trim().to_string();
        if text.is_empty() {
            return vec![];
        }

        match Command::parse(&text) {
            Command::Connect => {
                self.input.clear();
                self.connect()
            },
            Command::Disconnect => {
                self.input.clear();
                self.disconnect()
            },
            Command::Toggle => {
                self.input.clear();
                self.toggle()
            },
            Command::Quit => self.quit(),
            Command::Unknown(name) => {
                self.input.clear();
                self.set_status(format!("Unknown command: /{name}"));
                vec![AppAction::Render]
            },
            Command::Message(body) => {
                let actions = self.send_message(&body);
                // Text stays in the input line when the send was refused
                if actions.iter().any(|a| matches!(a, AppAction::Send { .. })) {
                    self.input.clear();
                }
                actions
            },
        }
    }

    /// Translate session actions, folding render updates into the view model.
    fn apply(&mut self, actions: Vec<SessionAction>) -> Vec<AppAction> {
        let mut out = Vec::with_capacity(actions.len());
        let mut render = false;

        for action in actions {
            match action {
                SessionAction::Open { generation, address } => {
                    out.push(AppAction::Open { generation, address });
                },
                SessionAction::Send { generation, text } => {
                    out.push(AppAction::Send { generation, text });
                },
                SessionAction::Close { generation } => {
                    out.push(AppAction::Close { generation });
                },
                SessionAction::Render(update) => {
                    self.apply_render(update);
                    render = true;
                },
            }
        }

        if render {
            out.push(AppAction::Render);
        }
        out
    }

    fn apply_render(&mut self, update: RenderUpdate) {
        match update {
            RenderUpdate::Status(state) => {
                if self.state != state {
                    self.status_message = None;
                }
                self.state = state;
            },
            RenderUpdate::Message(message) => {
                if self.log.len() == self.log_capacity {
                    self.log.pop_front();
                }
                self.log.push_back(message.into());
            },
            RenderUpdate::Roster { members, label } => {
                self.members = members;
                self.members_label = label;
            },
        }
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Relay endpoint.
    pub fn server_address(&self) -> &str {
        self.session.address()
    }

    /// Underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Chat log, oldest first.
    pub fn log(&self) -> &VecDeque<LogLine> {
        &self.log
    }

    /// Room members in join order.
    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    /// Member list title, "Member:" or "Members:".
    pub fn members_label(&self) -> &'static str {
        self.members_label
    }

    /// Input line.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
