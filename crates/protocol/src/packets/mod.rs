//! Packet definitions for the worm protocol.
//!
//! Every frame is a JSON object `{"Command": <name>, "Payload": <any>}`.
//! This module contains both client->server and server->client packet types.

mod client;
mod server;

pub use client::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw envelope shared by both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    #[serde(rename = "Command")]
    pub command: String,
    #[serde(rename = "Payload", default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Packet {
    pub fn new(command: impl Into<String>, payload: Value) -> Self {
        Self {
            command: command.into(),
            payload,
        }
    }

    /// Parse an envelope from a text frame.
    pub fn decode(text: &str) -> Result<Self, crate::ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the envelope to a text frame.
    pub fn encode(&self) -> String {
        // A `String` command plus a `Value` payload always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}
