//! Client -> Server packets.

use super::Packet;
use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Arrow-key direction sent with `MOVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];

    /// Wire name of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    /// Accepts the wire names in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::UnknownDirection(s.to_string()))
    }
}

/// Parsed client packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPacket {
    /// Sent once when the connection opens.
    Hello,
    /// Steer the local worm.
    Move(Direction),
}

impl ClientPacket {
    /// Wrap the packet in its wire envelope.
    pub fn to_packet(self) -> Packet {
        match self {
            ClientPacket::Hello => Packet::new("HELLO", serde_json::Value::Null),
            ClientPacket::Move(dir) => Packet::new("MOVE", serde_json::Value::from(dir.as_str())),
        }
    }

    /// Encode to a JSON text frame.
    pub fn encode(self) -> String {
        self.to_packet().encode()
    }

    /// Parse a client packet from a text frame.
    ///
    /// Returns `Ok(None)` for a well-formed envelope whose command is not a
    /// client command.
    pub fn decode(text: &str) -> Result<Option<Self>, ProtocolError> {
        let packet = Packet::decode(text)?;
        match packet.command.to_ascii_lowercase().as_str() {
            "hello" => Ok(Some(ClientPacket::Hello)),
            "move" => {
                let dir: Direction = serde_json::from_value(packet.payload)
                    .map_err(|source| ProtocolError::InvalidPayload { command: "MOVE", source })?;
                Ok(Some(ClientPacket::Move(dir)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_has_no_payload() {
        assert_eq!(ClientPacket::Hello.encode(), r#"{"Command":"HELLO"}"#);
    }

    #[test]
    fn test_move_payload_is_direction_name() {
        assert_eq!(
            ClientPacket::Move(Direction::Left).encode(),
            r#"{"Command":"MOVE","Payload":"LEFT"}"#
        );
        let decoded = ClientPacket::decode(r#"{"Command":"move","Payload":"DOWN"}"#).unwrap();
        assert_eq!(decoded, Some(ClientPacket::Move(Direction::Down)));
    }

    #[test]
    fn test_bad_direction_payload() {
        let err = ClientPacket::decode(r#"{"Command":"MOVE","Payload":"SIDEWAYS"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidPayload { command: "MOVE", .. }));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!(" Right ".parse::<Direction>().unwrap(), Direction::Right);
        assert!("north".parse::<Direction>().is_err());
    }
}
