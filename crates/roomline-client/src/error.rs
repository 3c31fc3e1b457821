use std::time::Duration;

use thiserror::Error;

/// Why a transport handle ended.
///
/// These never reach the caller as `Err`. The I/O task renders them into the
/// reason of the final [`crate::TransportEventKind::Closed`] event.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Handshake failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Handshake did not finish in time.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// Read or write on an open socket failed.
    #[error("stream error: {0}")]
    Stream(String),

    /// Handle or event channel is gone.
    #[error("transport closed")]
    Closed,
}
