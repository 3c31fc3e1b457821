//! Server error types.

use roomline_proto::errors::ProtocolError;
use thiserror::Error;

/// Errors that can occur in the relay.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (invalid bind address, etc.).
    ///
    /// Fatal. Prevents server startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport/network error (bind failure, socket I/O).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// WebSocket handshake or stream failure on one connection.
    ///
    /// Fatal for that connection only.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// Outbound frame could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Event referenced a client the driver does not know.
    ///
    /// May be transient if the client was just removed.
    #[error("client {0} not found")]
    ClientNotFound(u64),

    /// Client id registered twice. Indicates a runtime bug.
    #[error("client {0} already registered")]
    ClientAlreadyExists(u64),
}
