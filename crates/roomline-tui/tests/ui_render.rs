//! Rendering tests against ratatui's in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use ratatui::{Terminal, backend::TestBackend, style::Color};
use roomline_app::{App, AppEvent, Generation, KeyInput, TransportEvent};
use roomline_tui::ui;

const WIDTH: u16 = 80;
const HEIGHT: u16 = 14;

fn draw(app: &App) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    terminal
}

fn rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
    terminal
        .backend()
        .buffer()
        .content()
        .chunks(usize::from(WIDTH))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

fn screen(terminal: &Terminal<TestBackend>) -> String {
    rows(terminal).join("\n")
}

fn connected_app() -> (App, Generation) {
    let mut app = App::new("ws://127.0.0.1:8080/");
    let _ = app.start();
    let generation = app.session().live_generation().unwrap();
    let _ = app.handle(AppEvent::Transport(TransportEvent::opened(generation)));
    (app, generation)
}

fn receive(app: &mut App, generation: Generation, frame: &str) {
    let _ = app.handle(AppEvent::Transport(TransportEvent::frame(generation, frame)));
}

#[test]
fn empty_chat_shows_placeholder() {
    let app = App::new("ws://127.0.0.1:8080/");
    let screen = screen(&draw(&app));

    assert!(screen.contains("No messages yet"));
    assert!(screen.contains(" Member: "));
    assert!(screen.contains("Disconnected"));
}

#[test]
fn status_bar_colors_follow_connection_state() {
    let (app, _) = connected_app();
    let terminal = draw(&app);
    let status_row = usize::from(HEIGHT - 1);
    let cells = terminal.backend().buffer().content();

    // " Connected" starts one cell in
    let first = &cells[status_row * usize::from(WIDTH) + 1];
    assert_eq!(first.symbol(), "C");
    assert_eq!(first.fg, Color::Green);

    let mut connecting = App::new("ws://127.0.0.1:8080/");
    let _ = connecting.start();
    let terminal = draw(&connecting);
    let cells = terminal.backend().buffer().content();
    assert_eq!(cells[status_row * usize::from(WIDTH) + 1].fg, Color::Yellow);
    assert!(screen(&terminal).contains("Connecting..."));
}

#[test]
fn messages_and_members_render() {
    let (mut app, generation) = connected_app();
    receive(&mut app, generation, "[user_id:1001 10:00:00]: joined in the room");
    receive(&mut app, generation, "[user_id:1002 10:00:01]: joined in the room");
    receive(&mut app, generation, "[user_id:1001 10:00:02]: hello there");
    receive(&mut app, generation, "server restarting soon");

    let screen = screen(&draw(&app));

    assert!(screen.contains("1001: hello there"));
    assert!(screen.contains("1002 joined in the room"));
    assert!(screen.contains(" Members: "));
    assert!(screen.contains("server restarting soon"));
}

#[test]
fn notices_are_muted() {
    let (mut app, generation) = connected_app();
    receive(&mut app, generation, "[user_id:1001 10:00:00]: joined in the room");

    let terminal = draw(&app);
    let rows = rows(&terminal);
    let y = rows.iter().position(|row| row.contains("1001 joined")).unwrap();
    let byte = rows[y].find("1001").unwrap();
    let x = rows[y][..byte].chars().count();

    let cells = terminal.backend().buffer().content();
    assert_eq!(cells[y * usize::from(WIDTH) + x].fg, Color::DarkGray);
}

#[test]
fn input_line_shows_buffer_and_status_message() {
    let mut app = App::new("ws://127.0.0.1:8080/");
    for c in "hi".chars() {
        let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
    }
    let _ = app.handle(AppEvent::Key(KeyInput::Enter));

    let screen = screen(&draw(&app));
    assert!(screen.contains("> hi"));
    assert!(screen.contains("Not connected (disconnected)"));
}

#[test]
fn chat_keeps_newest_lines_visible() {
    let (mut app, generation) = connected_app();
    for i in 0..30 {
        receive(&mut app, generation, &format!("[user_id:1001 10:00:00]: line {i:02}"));
    }

    let screen = screen(&draw(&app));
    assert!(screen.contains("line 29"));
    assert!(!screen.contains("line 00"));
}
