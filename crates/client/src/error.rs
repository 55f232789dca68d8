//! Client error types.

use protocol::{ProtocolError, WormId};
use thiserror::Error;

/// Errors surfaced by the worm core. None of them are fatal: callers log
/// and drop the offending message.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Worm {id} reported with no positions")]
    EmptyPositions { id: WormId },

    #[error("Worm {id} was already released")]
    Released { id: WormId },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
