//! Error types for the Roomline session core.
//!
//! Only caller errors surface here. Malformed frames are rendered, and
//! transport failures surface as a transition to
//! [`ConnectionState::Disconnected`], never as errors.

use thiserror::Error;

use crate::ConnectionState;

/// Errors that can occur during session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Send attempted without an open connection
    #[error("not connected ({state})")]
    NotConnected {
        /// State when the send was attempted
        state: ConnectionState,
    },
}
