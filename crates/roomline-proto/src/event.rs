//! Decoded frame events.

use std::fmt;

use crate::{JOINED_BODY, LEFT_BODY};

/// Identifier of a room participant as it appears on the wire.
///
/// Opaque to the client. The parser does not enforce uniqueness; the roster
/// does.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u32> for ParticipantId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// One inbound frame, classified.
///
/// Produced per frame and consumed immediately by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Chat content from a participant.
    Message {
        /// Author of the message.
        sender: ParticipantId,
        /// Message text.
        body: String,
    },

    /// A participant entered the room.
    Join {
        /// Participant that joined.
        sender: ParticipantId,
    },

    /// A participant left the room.
    Leave {
        /// Participant that left.
        sender: ParticipantId,
    },

    /// Frame without a recognizable sender.
    Malformed {
        /// Frame text as received.
        raw: String,
    },
}

impl ChatEvent {
    /// Sender of the event. `None` for malformed frames.
    pub fn sender(&self) -> Option<&ParticipantId> {
        match self {
            Self::Message { sender, .. } | Self::Join { sender } | Self::Leave { sender } => {
                Some(sender)
            },
            Self::Malformed { .. } => None,
        }
    }

    /// Text to display for this event.
    ///
    /// Membership events render as their announcement body, malformed frames
    /// as the raw text.
    pub fn display_body(&self) -> &str {
        match self {
            Self::Message { body, .. } => body,
            Self::Join { .. } => JOINED_BODY,
            Self::Leave { .. } => LEFT_BODY,
            Self::Malformed { raw } => raw,
        }
    }

    /// True for join and leave events.
    pub fn is_membership_change(&self) -> bool {
        matches!(self, Self::Join { .. } | Self::Leave { .. })
    }
}
