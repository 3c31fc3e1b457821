//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use roomline_core::Generation;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and in tests.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, tokio-tungstenite for WebSocket
/// - **Tests**: scripted events and recorded commands
///
/// Transport lifecycle (open, frames, close) must come back through
/// [`Driver::poll_event`] as [`AppEvent::Transport`] tagged with the
/// generation passed to [`Driver::open`].
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns the next event or `None` if nothing is ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Open a transport handle to `address` tagged with `generation`.
    ///
    /// Connection failures are reported later as a `Closed` event, not here.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver itself cannot continue.
    fn open(
        &mut self,
        generation: Generation,
        address: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a text frame on the handle tagged `generation`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver itself cannot continue.
    fn send(
        &mut self,
        generation: Generation,
        text: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the handle tagged `generation`.
    fn close(&mut self, generation: Generation);

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop all connections and clean up resources.
    fn stop(&mut self);
}
