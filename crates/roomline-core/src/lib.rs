//! Roomline core
//!
//! Sans-IO client logic for the Roomline chat protocol: the session state
//! machine, room roster, and inbound frame dispatch. Nothing here performs
//! I/O. Methods take events and return actions for a driver to execute, so the
//! same code runs against a real socket and in tests.
//!
//! # Components
//!
//! - [`Session`]: Connection lifecycle and outbound send gating
//! - [`Roster`]: Ordered, duplicate-free room membership
//! - [`dispatch`]: Frame to roster changes and render updates
//! - [`RenderUpdate`]: What the front end should display

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dispatcher;
mod error;
mod render;
pub mod roster;
mod session;

pub use dispatcher::dispatch;
pub use error::SessionError;
pub use render::{RenderUpdate, RenderedMessage};
pub use roomline_proto::{ChatEvent, ParticipantId};
pub use roster::Roster;
pub use session::{
    ConnectionState, DEFAULT_SERVER_ADDRESS, Generation, Session, SessionAction, TransportEvent,
    TransportEventKind,
};
