//! Property-based tests for the session state machine.
//!
//! These tests verify critical invariants under arbitrary operation sequences:
//! - At most one transport handle is open at any time
//! - Events from superseded handles never change state
//! - The roster is empty whenever the session is disconnected

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use roomline_core::{
    ConnectionState, DEFAULT_SERVER_ADDRESS, Generation, Session, SessionAction, TransportEvent,
};

#[derive(Debug, Clone)]
enum Op {
    Connect,
    Disconnect,
    Toggle,
    Send(String),
    Opened,
    Closed,
    Join(u32),
    Leave(u32),
    Chat(u32, String),
    Stale(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Connect),
        1 => Just(Op::Disconnect),
        2 => Just(Op::Toggle),
        1 => "[a-z ]{0,12}".prop_map(Op::Send),
        3 => Just(Op::Opened),
        1 => Just(Op::Closed),
        3 => (1000u32..1010).prop_map(Op::Join),
        2 => (1000u32..1010).prop_map(Op::Leave),
        2 => (1000u32..1010, "[a-z ]{0,12}").prop_map(|(id, body)| Op::Chat(id, body)),
        2 => (0u64..4).prop_map(Op::Stale),
    ]
}

/// Tracks which handles a driver would have open after executing actions.
#[derive(Default)]
struct HandleModel {
    open: BTreeSet<Generation>,
}

impl HandleModel {
    fn apply(&mut self, actions: &[SessionAction]) {
        for action in actions {
            match action {
                SessionAction::Open { generation, .. } => {
                    self.open.insert(*generation);
                },
                SessionAction::Close { generation } => {
                    self.open.remove(generation);
                },
                SessionAction::Send { generation, .. } => {
                    assert!(self.open.contains(generation), "send on a handle that is not open");
                },
                SessionAction::Render(_) => {},
            }
        }
    }
}

fn frame(id: u32, body: &str) -> String {
    format!("[user_id:{id} 12:00:00]: {body}")
}

proptest! {
    #[test]
    fn prop_at_most_one_live_handle(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut session = Session::new(DEFAULT_SERVER_ADDRESS);
        let mut model = HandleModel::default();

        for op in ops {
            let live = session.live_generation();
            let actions = match op {
                Op::Connect => session.connect(),
                Op::Disconnect => session.disconnect(),
                Op::Toggle => session.toggle(),
                Op::Send(text) => session.send(text).unwrap_or_default(),
                Op::Opened => live.map_or_else(Vec::new, |g| {
                    session.handle_transport(TransportEvent::opened(g))
                }),
                Op::Closed => match live {
                    Some(g) => {
                        // Transport-initiated close: the handle is gone
                        model.open.remove(&g);
                        session.handle_transport(TransportEvent::closed(g, "peer closed"))
                    },
                    None => vec![],
                },
                Op::Join(id) => live.map_or_else(Vec::new, |g| {
                    session.handle_transport(TransportEvent::frame(g, frame(id, "joined in the room")))
                }),
                Op::Leave(id) => live.map_or_else(Vec::new, |g| {
                    session.handle_transport(TransportEvent::frame(g, frame(id, "left the room")))
                }),
                Op::Chat(id, body) => live.map_or_else(Vec::new, |g| {
                    session.handle_transport(TransportEvent::frame(g, frame(id, &body)))
                }),
                Op::Stale(offset) => {
                    let stale = Generation::new(live.map_or(0, Generation::get) + 1 + offset);
                    session.handle_transport(TransportEvent::closed(stale, "late"))
                },
            };
            model.apply(&actions);

            prop_assert!(model.open.len() <= 1, "more than one handle open: {:?}", model.open);
            prop_assert_eq!(model.open.iter().next().copied(), session.live_generation());
            if session.state() == ConnectionState::Disconnected {
                prop_assert!(session.roster().is_empty());
                prop_assert_eq!(session.live_generation(), None);
            }
        }
    }

    #[test]
    fn prop_stale_events_never_change_state(
        setup in prop::collection::vec(op_strategy(), 0..20),
        id in 1000u32..1010,
    ) {
        let mut session = Session::new(DEFAULT_SERVER_ADDRESS);
        for op in setup {
            match op {
                Op::Connect | Op::Toggle => { session.toggle(); },
                Op::Opened => {
                    if let Some(g) = session.live_generation() {
                        session.handle_transport(TransportEvent::opened(g));
                    }
                },
                Op::Join(id) => {
                    if let Some(g) = session.live_generation() {
                        session.handle_transport(TransportEvent::frame(g, frame(id, "joined in the room")));
                    }
                },
                _ => {},
            }
        }

        // Every generation other than the live one is stale
        let before_state = session.state();
        let before_live = session.live_generation();
        let before_roster = session.roster().clone();
        let newest = before_live.map_or(0, Generation::get);

        for raw in 0..=newest + 2 {
            let stale = Generation::new(raw);
            if Some(stale) == before_live {
                continue;
            }
            for event in [
                TransportEvent::opened(stale),
                TransportEvent::frame(stale, frame(id, "joined in the room")),
                TransportEvent::closed(stale, "late"),
            ] {
                prop_assert!(session.handle_transport(event).is_empty());
            }
        }

        prop_assert_eq!(session.state(), before_state);
        prop_assert_eq!(session.live_generation(), before_live);
        prop_assert_eq!(session.roster(), &before_roster);
    }
}

#[test]
fn reconnect_after_transport_close() {
    let mut session = Session::new(DEFAULT_SERVER_ADDRESS);
    let _ = session.connect();
    let first = session.live_generation().unwrap();
    let _ = session.handle_transport(TransportEvent::opened(first));
    let _ = session.handle_transport(TransportEvent::closed(first, "reset by peer"));
    assert_eq!(session.state(), ConnectionState::Disconnected);

    let actions = session.toggle();
    let second = session.live_generation().unwrap();
    assert!(second > first);
    assert!(matches!(actions[0], SessionAction::Open { generation, .. } if generation == second));
}
