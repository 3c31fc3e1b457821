//! Property-based tests for App state machine.
//!
//! Tests verify that view-model invariants hold under arbitrary event
//! sequences, with transport events aimed at both live and stale handles.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use roomline_app::{App, AppAction, AppEvent, ConnectionState, KeyInput, TransportEvent};

#[derive(Debug, Clone)]
enum Step {
    Key(KeyInput),
    Tick,
    Resize(u16, u16),
    Opened { stale: bool },
    Closed { stale: bool },
    Join(u32),
    Leave(u32),
    Chat(String),
}

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        6 => proptest::char::range('a', 'z').prop_map(KeyInput::Char),
        1 => Just(KeyInput::Char('/')),
        2 => Just(KeyInput::Enter),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => key_strategy().prop_map(Step::Key),
        1 => Just(Step::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| Step::Resize(c, r)),
        2 => any::<bool>().prop_map(|stale| Step::Opened { stale }),
        1 => any::<bool>().prop_map(|stale| Step::Closed { stale }),
        2 => (1000u32..1006).prop_map(Step::Join),
        1 => (1000u32..1006).prop_map(Step::Leave),
        2 => "[a-z ]{1,16}".prop_map(Step::Chat),
    ]
}

fn to_event(app: &App, step: Step) -> AppEvent {
    let live = app.session().live_generation();
    let target = |stale: bool| match (live, stale) {
        (Some(g), false) => g,
        (Some(g), true) => g.next(),
        (None, _) => roomline_app::Generation::new(0),
    };

    match step {
        Step::Key(key) => AppEvent::Key(key),
        Step::Tick => AppEvent::Tick,
        Step::Resize(c, r) => AppEvent::Resize(c, r),
        Step::Opened { stale } => AppEvent::Transport(TransportEvent::opened(target(stale))),
        Step::Closed { stale } => {
            AppEvent::Transport(TransportEvent::closed(target(stale), "test close"))
        },
        Step::Join(id) => AppEvent::Transport(TransportEvent::frame(
            target(false),
            format!("[user_id:{id} 09:00:00]: joined in the room"),
        )),
        Step::Leave(id) => AppEvent::Transport(TransportEvent::frame(
            target(false),
            format!("[user_id:{id} 09:00:00]: left the room"),
        )),
        Step::Chat(body) => AppEvent::Transport(TransportEvent::frame(
            target(false),
            format!("[user_id:1000 09:00:00]: {body}"),
        )),
    }
}

proptest! {
    #[test]
    fn prop_view_matches_session(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let mut app = App::with_log_capacity("ws://relay.test/", 16);
        let _ = app.start();

        for step in steps {
            let event = to_event(&app, step);
            let actions = app.handle(event);

            let sends = actions.iter().filter(|a| matches!(a, AppAction::Send { .. })).count();
            if sends > 0 {
                prop_assert_eq!(app.connection_state(), ConnectionState::Connected);
            }

            prop_assert_eq!(app.connection_state(), app.session().state());
            prop_assert_eq!(app.members(), app.session().roster().current());
            prop_assert_eq!(app.members_label(), app.session().roster().label());
            prop_assert!(app.log().len() <= 16);
            prop_assert!(app.input().cursor() <= app.input().buffer().chars().count());
        }
    }

    #[test]
    fn prop_roster_empty_when_disconnected(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let mut app = App::new("ws://relay.test/");
        let _ = app.start();

        for step in steps {
            let event = to_event(&app, step);
            let _ = app.handle(event);

            if app.connection_state() == ConnectionState::Disconnected {
                prop_assert!(app.members().is_empty());
            }
        }
    }
}
