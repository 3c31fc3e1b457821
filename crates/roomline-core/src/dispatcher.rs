//! Inbound frame dispatch.
//!
//! For each frame: decode it, apply membership changes to the roster, and
//! produce the render updates the front end needs. Every frame yields exactly
//! one [`RenderUpdate::Message`]; membership changes additionally yield one
//! [`RenderUpdate::Roster`] with the updated snapshot.

use roomline_proto::{ChatEvent, parse};

use crate::{
    Roster,
    render::{RenderUpdate, RenderedMessage},
};

/// Dispatch one inbound frame against `roster`.
pub fn dispatch(roster: &mut Roster, raw: &str) -> Vec<RenderUpdate> {
    let event = parse(raw);

    match &event {
        ChatEvent::Join { sender } => {
            roster.apply_join(sender.clone());
        },
        ChatEvent::Leave { sender } => {
            roster.apply_leave(sender);
        },
        ChatEvent::Message { .. } => {},
        ChatEvent::Malformed { raw } => {
            tracing::debug!(frame = %raw, "frame without sender, rendering unattributed");
        },
    }

    let mut updates = vec![RenderUpdate::Message(RenderedMessage::from_event(&event))];
    if event.is_membership_change() {
        updates.push(RenderUpdate::roster(roster));
    }
    updates
}
