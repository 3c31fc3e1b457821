//! Roomline wire protocol
//!
//! Text frames exchanged with the relay server. A frame is one complete text
//! unit delivered by the transport; this crate never buffers or reassembles.
//!
//! # Grammar
//!
//! The legacy grammar is a single line:
//!
//! ```text
//! "[user_id:" DIGITS " " TIMESTAMP "]: " BODY
//! ```
//!
//! Membership changes are signalled by the bodies [`JOINED_BODY`] and
//! [`LEFT_BODY`]. Because a user can type those strings, the crate also
//! defines a tagged [`Envelope`] that carries the event kind explicitly. The
//! decoder tries the envelope first and falls back to the legacy grammar.
//!
//! # Components
//!
//! - [`parse`]: Frame text to [`ChatEvent`]
//! - [`Envelope`]: Tagged JSON form of a frame
//! - [`ChatLine`]: Server-side line builder that renders either form

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
pub mod errors;
mod event;
mod line;
mod parse;

pub use envelope::Envelope;
pub use event::{ChatEvent, ParticipantId};
pub use line::{ChatLine, FrameFormat, LineKind};
pub use parse::{parse, parse_legacy};

/// Body announcing that the sender joined the room.
pub const JOINED_BODY: &str = "joined in the room";

/// Body announcing that the sender left the room.
pub const LEFT_BODY: &str = "left the room";

/// Separates the frame header from the body.
pub const BODY_DELIMITER: &str = "]: ";

/// Timestamp format used in frame headers.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";
