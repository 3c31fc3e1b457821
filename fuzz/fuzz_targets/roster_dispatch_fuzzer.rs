//! Fuzz target for roster maintenance
//!
//! Dispatches a sequence of join, leave, chat and raw frames against one
//! roster and compares it with a simple model after every frame.
//!
//! # Invariants
//!
//! - No duplicate members
//! - Members stay in first-join order
//! - Every frame yields exactly one message update
//! - Chat frames with ordinary bodies never change membership

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roomline_core::{dispatch, RenderUpdate, Roster};

#[derive(Debug, Clone, Arbitrary)]
enum Frame {
    Join(u8),
    Leave(u8),
    Chat { id: u8, body: String },
    Raw(String),
}

impl Frame {
    fn text(&self) -> String {
        match self {
            Frame::Join(id) => format!("[user_id:{id} 10:00:00]: joined in the room"),
            Frame::Leave(id) => format!("[user_id:{id} 10:00:00]: left the room"),
            Frame::Chat { id, body } => format!("[user_id:{id} 10:00:00]: {body}"),
            Frame::Raw(raw) => raw.clone(),
        }
    }
}

fn is_announcement(body: &str) -> bool {
    body == roomline_proto::JOINED_BODY || body == roomline_proto::LEFT_BODY
}

fuzz_target!(|frames: Vec<Frame>| {
    let mut roster = Roster::new();
    let mut model: Vec<String> = Vec::new();

    for frame in frames {
        let text = frame.text();
        let before = roster.clone();
        let updates = dispatch(&mut roster, &text);

        let messages = updates.iter().filter(|u| matches!(u, RenderUpdate::Message(_))).count();
        assert_eq!(messages, 1);

        match &frame {
            Frame::Join(id) => {
                let id = id.to_string();
                if !model.contains(&id) {
                    model.push(id);
                }
            },
            Frame::Leave(id) => {
                let id = id.to_string();
                model.retain(|member| *member != id);
            },
            Frame::Chat { body, .. } if !is_announcement(body) => assert_eq!(roster, before),
            // Typed or raw text may itself be a valid announcement
            Frame::Chat { .. } | Frame::Raw(_) => {
                model = roster.current().iter().map(|m| m.as_str().to_string()).collect();
            },
        }

        let current: Vec<&str> = roster.current().iter().map(|m| m.as_str()).collect();
        assert_eq!(current, model.iter().map(String::as_str).collect::<Vec<_>>());
    }
});
