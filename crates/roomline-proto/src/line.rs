//! Server-side chat lines.
//!
//! A [`ChatLine`] is what the relay stores in its history and broadcasts. It
//! renders to the legacy grammar through [`std::fmt::Display`] and to the
//! tagged envelope through [`ChatLine::to_envelope`].

use std::fmt;

use chrono::NaiveTime;

use crate::{Envelope, JOINED_BODY, LEFT_BODY, TIMESTAMP_FORMAT, errors::Result};

/// Output encoding for outbound frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameFormat {
    /// `[user_id:ID HH:MM:SS]: BODY`
    #[default]
    Legacy,
    /// Tagged JSON [`Envelope`].
    Envelope,
}

/// What a line announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Text typed by the participant.
    Message(String),
    /// Participant joined the room.
    Joined,
    /// Participant left the room.
    Left,
}

/// One stamped line of room activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Numeric id of the participant.
    pub user_id: u32,
    /// Server time-of-day when the line was created.
    pub created_at: NaiveTime,
    /// Line content.
    pub kind: LineKind,
}

impl ChatLine {
    /// Chat message from `user_id`.
    pub fn message(user_id: u32, created_at: NaiveTime, body: impl Into<String>) -> Self {
        Self { user_id, created_at, kind: LineKind::Message(body.into()) }
    }

    /// Join announcement for `user_id`.
    pub fn joined(user_id: u32, created_at: NaiveTime) -> Self {
        Self { user_id, created_at, kind: LineKind::Joined }
    }

    /// Leave announcement for `user_id`.
    pub fn left(user_id: u32, created_at: NaiveTime) -> Self {
        Self { user_id, created_at, kind: LineKind::Left }
    }

    /// Body text as it appears in the legacy grammar.
    pub fn body(&self) -> &str {
        match &self.kind {
            LineKind::Message(body) => body,
            LineKind::Joined => JOINED_BODY,
            LineKind::Left => LEFT_BODY,
        }
    }

    /// Tagged form of this line.
    pub fn to_envelope(&self) -> Envelope {
        let user_id = self.user_id.to_string();
        let time = self.created_at.format(TIMESTAMP_FORMAT).to_string();
        match &self.kind {
            LineKind::Message(body) => Envelope::Message { user_id, time, body: body.clone() },
            LineKind::Joined => Envelope::Join { user_id, time },
            LineKind::Left => Envelope::Leave { user_id, time },
        }
    }

    /// Encode as a text frame in the given format.
    pub fn encode(&self, format: FrameFormat) -> Result<String> {
        match format {
            FrameFormat::Legacy => Ok(self.to_string()),
            FrameFormat::Envelope => self.to_envelope().encode(),
        }
    }
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[user_id:{} {}]: {}",
            self.user_id,
            self.created_at.format(TIMESTAMP_FORMAT),
            self.body()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChatEvent, parse};

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap_or_default()
    }

    #[test]
    fn legacy_line_matches_grammar() {
        let line = ChatLine::message(41, at(8, 16, 37), "hello");
        assert_eq!(line.to_string(), "[user_id:41 08:16:37]: hello");
    }

    #[test]
    fn announcements_use_reserved_bodies() {
        assert_eq!(ChatLine::joined(7, at(9, 0, 0)).to_string(), "[user_id:7 09:00:00]: joined in the room");
        assert_eq!(ChatLine::left(7, at(9, 0, 0)).to_string(), "[user_id:7 09:00:00]: left the room");
    }

    #[test]
    fn typed_announcement_survives_envelope_format() {
        let line = ChatLine::message(9, at(12, 0, 0), LEFT_BODY);

        let legacy = line.encode(FrameFormat::Legacy).unwrap();
        assert_eq!(parse(&legacy), ChatEvent::Leave { sender: 9.into() });

        let tagged = line.encode(FrameFormat::Envelope).unwrap();
        assert_eq!(parse(&tagged), ChatEvent::Message {
            sender: 9.into(),
            body: LEFT_BODY.to_string()
        });
    }
}
