//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Network uses the WebSocket
//! transport from `roomline-client`.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use roomline_app::{App, AppEvent, Driver, KeyInput};
use roomline_client::{ConnectedClient, TransportConfig, TransportEvent, spawn};
use roomline_core::Generation;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ui;

/// Interval between ticks when no input arrives.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Transport events buffered between polls.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the WebSocket
/// transport. At most one [`ConnectedClient`] exists at a time; events from
/// every handle arrive on one channel and the session filters stale ones.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    transport_config: TransportConfig,
    connection: Option<ConnectedClient>,
    events_tx: mpsc::Sender<TransportEvent>,
    events_rx: mpsc::Receiver<TransportEvent>,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new(transport_config: TransportConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            transport_config,
            connection: None,
            events_tx,
            events_rx,
        })
    }

    /// Convert a crossterm key event to `KeyInput`.
    ///
    /// Ctrl-C quits like Esc since raw mode swallows the signal.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(KeyInput::Esc),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    /// Convert one read from the crossterm event stream.
    ///
    /// The stream ending means stdin is gone; that quits like Esc instead of
    /// yielding nothing on every poll.
    fn convert_event(
        maybe_event: Option<io::Result<Event>>,
    ) -> Result<Option<AppEvent>, TerminalError> {
        match maybe_event {
            Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                Ok(Self::convert_key(key_event).map(AppEvent::Key))
            },
            Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
            Some(Ok(_)) => Ok(None),
            Some(Err(e)) => Err(TerminalError::Io(e)),
            None => Ok(Some(AppEvent::Key(KeyInput::Esc))),
        }
    }

    fn live(&self, generation: Generation) -> Option<&ConnectedClient> {
        self.connection.as_ref().filter(|conn| conn.generation() == generation)
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Transport lifecycle
            Some(event) = self.events_rx.recv() => Ok(Some(AppEvent::Transport(event))),

            // Terminal events
            maybe_event = self.event_stream.next() => Self::convert_event(maybe_event),

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => Ok(Some(AppEvent::Tick)),
        }
    }

    async fn open(&mut self, generation: Generation, address: &str) -> Result<(), Self::Error> {
        if let Some(previous) = self.connection.take() {
            tracing::debug!(generation = %previous.generation(), "replacing open handle");
            previous.close();
        }

        let client =
            spawn(generation, address, &self.transport_config, self.events_tx.clone());
        self.connection = Some(client);
        Ok(())
    }

    async fn send(&mut self, generation: Generation, text: String) -> Result<(), Self::Error> {
        let Some(conn) = self.live(generation) else {
            tracing::debug!(%generation, "dropping send for closed handle");
            return Ok(());
        };

        // A failed send is followed by a Closed event for this handle
        if let Err(error) = conn.send(text).await {
            tracing::warn!(%generation, %error, "send failed");
        }
        Ok(())
    }

    fn close(&mut self, generation: Generation) {
        if self.live(generation).is_some()
            && let Some(conn) = self.connection.take()
        {
            conn.close();
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::Esc)
        );
    }

    #[test]
    fn other_control_chords_are_ignored() {
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn shifted_characters_are_typed() {
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('A'))
        );
    }

    #[test]
    fn closed_input_stream_quits() {
        assert_eq!(
            TerminalDriver::convert_event(None).unwrap(),
            Some(AppEvent::Key(KeyInput::Esc))
        );
    }

    #[test]
    fn key_presses_and_resizes_become_events() {
        let press = Event::Key(key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(
            TerminalDriver::convert_event(Some(Ok(press))).unwrap(),
            Some(AppEvent::Key(KeyInput::Char('x')))
        );
        assert_eq!(
            TerminalDriver::convert_event(Some(Ok(Event::Resize(80, 24)))).unwrap(),
            Some(AppEvent::Resize(80, 24))
        );
        assert_eq!(TerminalDriver::convert_event(Some(Ok(Event::FocusGained))).unwrap(), None);
    }

    #[test]
    fn stream_errors_surface() {
        let error = io::Error::other("tty gone");
        assert!(matches!(
            TerminalDriver::convert_event(Some(Err(error))),
            Err(TerminalError::Io(_))
        ));
    }

    #[test]
    fn unmapped_keys() {
        assert_eq!(TerminalDriver::convert_key(key(KeyCode::F(1), KeyModifiers::NONE)), None);
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyInput::Enter)
        );
    }
}
