//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding frames.
///
/// Decoding never fails: an undecodable frame becomes
/// [`ChatEvent::Malformed`](crate::ChatEvent::Malformed).
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Envelope serialization failed.
    #[error("envelope encode failed: {0}")]
    EnvelopeEncode(#[from] serde_json::Error),
}
