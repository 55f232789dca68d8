//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding packets.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed packet: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid payload for {command}: {source}")]
    InvalidPayload {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown direction: {0:?}")]
    UnknownDirection(String),
}
