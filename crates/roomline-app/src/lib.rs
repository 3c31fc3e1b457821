//! Application layer for Roomline
//!
//! Pure view-model state machine and a generic runtime for chat front ends,
//! so the same orchestration runs in the terminal client and in tests.
//!
//! # Components
//!
//! - [`App`]: View model (message log, member list, input line, commands)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod commands;
mod driver;
mod event;
mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::{App, DEFAULT_LOG_CAPACITY};
pub use commands::Command;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput};
pub use roomline_core::{ConnectionState, Generation, ParticipantId, TransportEvent};
pub use runtime::Runtime;
pub use state::LogLine;
