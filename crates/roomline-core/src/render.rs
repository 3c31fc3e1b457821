//! Render updates for the front end.
//!
//! The core never draws anything. It describes what changed and leaves the
//! status, message, and roster views to the caller.

use roomline_proto::{ChatEvent, ParticipantId};

use crate::{ConnectionState, Roster};

/// A change the front end should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderUpdate {
    /// Connection status changed.
    Status(ConnectionState),

    /// A line to append to the chat log.
    Message(RenderedMessage),

    /// Member list changed.
    Roster {
        /// Members in join order.
        members: Vec<ParticipantId>,
        /// "Member:" or "Members:" depending on the count.
        label: &'static str,
    },
}

impl RenderUpdate {
    /// Snapshot of `roster` with its label.
    pub fn roster(roster: &Roster) -> Self {
        Self::Roster { members: roster.current().to_vec(), label: roster.label() }
    }
}

/// Render-ready chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Author. `None` for frames without a recognizable sender.
    pub sender: Option<ParticipantId>,
    /// Text to display.
    pub body: String,
    /// Join/leave announcement rather than chat content.
    pub notice: bool,
}

impl RenderedMessage {
    /// Render pair for a decoded event.
    pub fn from_event(event: &ChatEvent) -> Self {
        Self {
            sender: event.sender().cloned(),
            body: event.display_body().to_string(),
            notice: event.is_membership_change(),
        }
    }
}
