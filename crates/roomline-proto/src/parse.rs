//! Frame decoder.
//!
//! Pure functions from frame text to [`ChatEvent`]. Decoding is total: any
//! frame that cannot be attributed to a sender becomes
//! [`ChatEvent::Malformed`] carrying the raw text.

use std::sync::LazyLock;

use regex::Regex;

use crate::{BODY_DELIMITER, ChatEvent, Envelope, JOINED_BODY, LEFT_BODY, ParticipantId};

/// Sender marker: `user_id:` followed by an ASCII digit run.
#[allow(clippy::expect_used)]
static SENDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"user_id:([0-9]+)").expect("sender pattern is valid"));

/// Decode one frame.
///
/// Frames starting with `{` are first decoded as a tagged [`Envelope`]. If
/// that fails the frame is decoded with the legacy grammar, so chat text that
/// happens to look like JSON is still delivered.
pub fn parse(raw: &str) -> ChatEvent {
    if raw.starts_with('{')
        && let Some(event) = Envelope::decode(raw).and_then(Envelope::into_event)
    {
        return event;
    }

    parse_legacy(raw)
}

/// Decode one frame using only the legacy `[user_id:ID TIME]: BODY` grammar.
///
/// The sender is the digit run after `user_id:` in the header (the text before
/// the first `]: `). The body is everything after that delimiter, verbatim.
/// Membership events are recognized by exact body equality.
pub fn parse_legacy(raw: &str) -> ChatEvent {
    let Some((header, body)) = raw.split_once(BODY_DELIMITER) else {
        return malformed(raw);
    };

    let Some(sender) = extract_sender(header) else {
        return malformed(raw);
    };

    classify(sender, body)
}

/// Classify a body from an attributed legacy frame.
pub(crate) fn classify(sender: ParticipantId, body: &str) -> ChatEvent {
    match body {
        JOINED_BODY => ChatEvent::Join { sender },
        LEFT_BODY => ChatEvent::Leave { sender },
        _ => ChatEvent::Message { sender, body: body.to_string() },
    }
}

fn extract_sender(header: &str) -> Option<ParticipantId> {
    SENDER_PATTERN
        .captures(header)
        .and_then(|captures| captures.get(1))
        .map(|id| ParticipantId::new(id.as_str()))
}

fn malformed(raw: &str) -> ChatEvent {
    ChatEvent::Malformed { raw: raw.to_string() }
}
