//! Shared protocol crate for wormflow.
//!
//! This crate contains:
//! - The `{Command, Payload}` JSON envelope
//! - Client -> server and server -> client packet definitions
//! - Shared types (Position, WormId, Direction)

mod error;
pub mod packets;

pub use error::ProtocolError;
pub use packets::{ClientPacket, Direction, MovePayload, Packet, ServerPacket};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A board cell coordinate. Index 0 of a worm's position list is its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<Position> for glam::IVec2 {
    fn from(p: Position) -> Self {
        glam::IVec2::new(p.x, p.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {} Y: {}", self.x, self.y)
    }
}

/// Opaque worm identifier, stable for the worm's lifetime.
///
/// The server sends `MOVE` ids as JSON numbers and `KILL` ids as decimal
/// strings, so both forms deserialize to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WormId(String);

impl WormId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WormId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WormId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for WormId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for WormId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => WormId(s),
            RawId::Number(n) => WormId(n.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worm_id_accepts_number_and_string() {
        let from_number: WormId = serde_json::from_str("7").unwrap();
        let from_string: WormId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "7");
    }

    #[test]
    fn test_worm_id_rejects_other_shapes() {
        assert!(serde_json::from_str::<WormId>("[1]").is_err());
        assert!(serde_json::from_str::<WormId>("-3").is_err());
    }

    #[test]
    fn test_position_wire_keys() {
        let p: Position = serde_json::from_str(r#"{"X":4,"Y":-2}"#).unwrap();
        assert_eq!(p, Position::new(4, -2));
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"X":4,"Y":-2}"#);
        assert_eq!(glam::IVec2::from(p), glam::IVec2::new(4, -2));
    }
}
