//! Observable application state types.
//!
//! View-model data for rendering, free of transport and parsing details.

use roomline_core::{ParticipantId, RenderedMessage};

/// One line in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Author. `None` for unattributed lines.
    pub sender: Option<ParticipantId>,
    /// Text to display.
    pub body: String,
    /// Join/leave announcement. Drawn muted.
    pub notice: bool,
}

impl From<RenderedMessage> for LogLine {
    fn from(message: RenderedMessage) -> Self {
        Self { sender: message.sender, body: message.body, notice: message.notice }
    }
}
