//! Terminal UI for Roomline
//!
//! A thin shell over [`roomline_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`roomline_app::Runtime`].
//!
//! This crate only handles terminal events, rendering, and wiring the
//! WebSocket transport into the event loop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use roomline_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
