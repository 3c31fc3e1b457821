//! Client transport
//!
//! Async WebSocket I/O for the Sans-IO [`roomline_core::Session`]. This is a
//! thin layer that moves text frames between a socket and channels. All
//! protocol decisions stay in the session.
//!
//! # Components
//!
//! - [`spawn`]: Open a tagged connection on a background task
//! - [`ConnectedClient`]: Handle for sending, closing, and aborting it
//! - [`TransportConfig`]: Timeouts and channel sizes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod transport;

pub use error::TransportError;
pub use roomline_core::{Generation, TransportEvent, TransportEventKind};
pub use transport::{ConnectedClient, TransportConfig, spawn};
