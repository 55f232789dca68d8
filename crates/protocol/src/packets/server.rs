//! Server -> Client packets.

use super::Packet;
use crate::{Position, ProtocolError, WormId};
use serde::{Deserialize, Serialize};

/// Payload of a `MOVE` packet: the full coordinate list of one worm, head first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    #[serde(rename = "Id")]
    pub id: WormId,
    #[serde(rename = "Positions")]
    pub positions: Vec<Position>,
}

/// Parsed server packet.
///
/// Command names are matched case-insensitively. Anything else decodes to
/// `Unrecognized` so the caller decides how to report it.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerPacket {
    /// Authoritative positions for one worm.
    Move(MovePayload),
    /// The worm with this id died.
    Kill(WormId),
    /// A well-formed envelope with a command this client does not know.
    Unrecognized { command: String },
}

impl ServerPacket {
    /// Interpret a decoded envelope.
    pub fn from_packet(packet: Packet) -> Result<Self, ProtocolError> {
        Self::from_parts(&packet.command, packet.payload)
    }

    /// Interpret a command name and its payload.
    pub fn from_parts(command: &str, payload: serde_json::Value) -> Result<Self, ProtocolError> {
        match command.to_ascii_lowercase().as_str() {
            "move" => serde_json::from_value(payload)
                .map(ServerPacket::Move)
                .map_err(|source| ProtocolError::InvalidPayload { command: "MOVE", source }),
            "kill" => serde_json::from_value(payload)
                .map(ServerPacket::Kill)
                .map_err(|source| ProtocolError::InvalidPayload { command: "KILL", source }),
            _ => Ok(ServerPacket::Unrecognized {
                command: command.to_string(),
            }),
        }
    }

    /// Parse a server packet from a text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Self::from_packet(Packet::decode(text)?)
    }

    /// Encode to a JSON text frame in the server's format.
    pub fn encode(&self) -> String {
        match self {
            ServerPacket::Move(payload) => build_move(&payload.id, &payload.positions),
            ServerPacket::Kill(id) => build_kill(id),
            ServerPacket::Unrecognized { command } => {
                Packet::new(command.clone(), serde_json::Value::Null).encode()
            }
        }
    }
}

/// Build a `MOVE` frame.
///
/// Numeric ids are written as JSON numbers, the way the server does.
pub fn build_move(id: &WormId, positions: &[Position]) -> String {
    let id_value = match id.as_str().parse::<u64>() {
        Ok(n) => serde_json::Value::from(n),
        Err(_) => serde_json::Value::from(id.as_str()),
    };
    let positions = positions
        .iter()
        .map(|p| serde_json::json!({ "X": p.x, "Y": p.y }))
        .collect::<Vec<_>>();
    Packet::new(
        "MOVE",
        serde_json::json!({ "Id": id_value, "Positions": positions }),
    )
    .encode()
}

/// Build a `KILL` frame. The id is always sent as a string.
pub fn build_kill(id: &WormId) -> String {
    Packet::new("KILL", serde_json::Value::from(id.as_str())).encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_move() {
        let packet = ServerPacket::decode(
            r#"{"Command":"MOVE","Payload":{"Id":3,"Positions":[{"X":1,"Y":2},{"X":1,"Y":3}]}}"#,
        )
        .unwrap();
        assert_eq!(
            packet,
            ServerPacket::Move(MovePayload {
                id: WormId::from("3"),
                positions: vec![Position::new(1, 2), Position::new(1, 3)],
            })
        );
    }

    #[test]
    fn test_decode_kill_with_string_id() {
        let packet = ServerPacket::decode(r#"{"Command":"KILL","Payload":"3"}"#).unwrap();
        assert_eq!(packet, ServerPacket::Kill(WormId::from("3")));
    }

    #[test]
    fn test_command_is_case_insensitive() {
        let packet = ServerPacket::decode(r#"{"Command":"kIlL","Payload":9}"#).unwrap();
        assert_eq!(packet, ServerPacket::Kill(WormId::from(9u64)));
    }

    #[test]
    fn test_unknown_command_is_not_an_error() {
        let packet = ServerPacket::decode(r#"{"Command":"SCORE","Payload":12}"#).unwrap();
        assert_eq!(
            packet,
            ServerPacket::Unrecognized {
                command: "SCORE".to_string()
            }
        );
    }

    #[test]
    fn test_move_without_positions_is_invalid() {
        let err = ServerPacket::decode(r#"{"Command":"MOVE","Payload":{"Id":1}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidPayload { command: "MOVE", .. }));
    }

    #[test]
    fn test_build_move_matches_server_shape() {
        let frame = build_move(&WormId::from("12"), &[Position::new(0, 0)]);
        assert_eq!(
            frame,
            r#"{"Command":"MOVE","Payload":{"Id":12,"Positions":[{"X":0,"Y":0}]}}"#
        );
        assert_eq!(build_kill(&WormId::from("12")), r#"{"Command":"KILL","Payload":"12"}"#);
    }
}
