//! Tagged frame envelope.
//!
//! JSON object whose `kind` field distinguishes chat content from membership
//! changes, so a participant typing "left the room" is never mistaken for a
//! departure:
//!
//! ```text
//! {"kind":"message","user_id":"41","time":"08:16:37","body":"hello"}
//! {"kind":"join","user_id":"7","time":"09:00:00"}
//! ```

use serde::{Deserialize, Serialize};

use crate::{ChatEvent, ParticipantId, errors::Result};

/// Tagged representation of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Envelope {
    /// Chat content.
    Message {
        /// Sender id (ASCII digits).
        user_id: String,
        /// Server timestamp, `HH:MM:SS`.
        time: String,
        /// Message text.
        body: String,
    },

    /// Participant joined.
    Join {
        /// Sender id (ASCII digits).
        user_id: String,
        /// Server timestamp, `HH:MM:SS`.
        time: String,
    },

    /// Participant left.
    Leave {
        /// Sender id (ASCII digits).
        user_id: String,
        /// Server timestamp, `HH:MM:SS`.
        time: String,
    },
}

impl Envelope {
    /// Decode an envelope. `None` if the text is not a valid envelope.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Encode as a single-line JSON text frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sender id carried by the envelope.
    pub fn user_id(&self) -> &str {
        match self {
            Self::Message { user_id, .. } | Self::Join { user_id, .. } | Self::Leave { user_id, .. } => {
                user_id
            },
        }
    }

    /// Convert into a [`ChatEvent`].
    ///
    /// Returns `None` when the sender id is not a non-empty ASCII digit run,
    /// which makes the decoder fall back to the legacy grammar.
    pub fn into_event(self) -> Option<ChatEvent> {
        if !is_valid_id(self.user_id()) {
            return None;
        }

        let event = match self {
            Self::Message { user_id, body, .. } => {
                ChatEvent::Message { sender: ParticipantId::new(user_id), body }
            },
            Self::Join { user_id, .. } => ChatEvent::Join { sender: ParticipantId::new(user_id) },
            Self::Leave { user_id, .. } => ChatEvent::Leave { sender: ParticipantId::new(user_id) },
        };
        Some(event)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}
