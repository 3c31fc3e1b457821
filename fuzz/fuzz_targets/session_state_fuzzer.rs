//! Fuzz target for the connection state machine
//!
//! Drives a `Session` with user commands and transport events aimed at both
//! the live handle and arbitrary generations.
//!
//! # Invariants
//!
//! - At most one handle is open (opens and closes balance)
//! - Sends are only issued while connected, on the live handle
//! - Events for a non-live generation never change state
//! - The roster is empty whenever the session is disconnected

#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roomline_core::{ConnectionState, Generation, Session, SessionAction, TransportEvent};

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Connect,
    Disconnect,
    Toggle,
    Send(String),
    Event { target: Target, kind: Kind },
}

#[derive(Debug, Clone, Arbitrary)]
enum Target {
    Live,
    Other(u8),
}

#[derive(Debug, Clone, Arbitrary)]
enum Kind {
    Opened,
    Closed,
    Frame(String),
    Join(u8),
}

fuzz_target!(|ops: Vec<Op>| {
    let mut session = Session::new("ws://fuzz.test/");
    let mut open: BTreeSet<Generation> = BTreeSet::new();

    for op in ops {
        let before = (session.state(), session.live_generation(), session.roster().clone());

        let (actions, stale) = match op {
            Op::Connect => (session.connect(), false),
            Op::Disconnect => (session.disconnect(), false),
            Op::Toggle => (session.toggle(), false),
            Op::Send(text) => (session.send(text).unwrap_or_default(), false),
            Op::Event { target, kind } => {
                let generation = match (target, session.live_generation()) {
                    (Target::Live, Some(live)) => live,
                    (Target::Live, None) => Generation::new(0),
                    (Target::Other(n), _) => Generation::new(u64::from(n)),
                };
                let stale = session.live_generation() != Some(generation);
                let event = match kind {
                    Kind::Opened => TransportEvent::opened(generation),
                    Kind::Closed => {
                        // The transport is gone once it reports closed
                        open.remove(&generation);
                        TransportEvent::closed(generation, "fuzz")
                    },
                    Kind::Frame(text) => TransportEvent::frame(generation, text),
                    Kind::Join(id) => TransportEvent::frame(
                        generation,
                        format!("[user_id:{id} 00:00:00]: joined in the room"),
                    ),
                };
                (session.handle_transport(event), stale)
            },
        };

        if stale {
            assert!(actions.is_empty());
            assert_eq!(
                (session.state(), session.live_generation(), session.roster().clone()),
                before
            );
        }

        for action in &actions {
            match action {
                SessionAction::Close { generation } => {
                    open.remove(generation);
                },
                SessionAction::Open { generation, .. } => {
                    assert!(open.is_empty(), "opened {generation} with {open:?} still open");
                    open.insert(*generation);
                },
                SessionAction::Send { generation, .. } => {
                    assert_eq!(session.state(), ConnectionState::Connected);
                    assert_eq!(session.live_generation(), Some(*generation));
                },
                SessionAction::Render(_) => {},
            }
        }

        assert!(open.len() <= 1);
        if session.state() == ConnectionState::Disconnected {
            assert!(session.roster().is_empty());
            assert!(session.live_generation().is_none());
        }
    }
});
