// Command router: inbound frames to registry calls, local input to outbound packets
use protocol::{ClientPacket, Direction, MovePayload, Packet, ServerPacket, WormId};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FlowError;
use crate::field::Field;
use crate::input::InputEvent;
use crate::surface::Surface;

/// What an inbound frame did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Moved { id: WormId, segments: usize },
    Killed { id: WormId, existed: bool },
}

/// Apply one decoded server packet.
pub fn dispatch<S: Surface>(
    field: &mut Field<S>,
    packet: ServerPacket,
) -> Result<Inbound, FlowError> {
    match packet {
        ServerPacket::Move(MovePayload { id, positions }) => {
            let segments = field.apply_positions(&id, &positions)?;
            Ok(Inbound::Moved { id, segments })
        }
        ServerPacket::Kill(id) => {
            let existed = field.remove(&id);
            Ok(Inbound::Killed { id, existed })
        }
        ServerPacket::Unrecognized { command } => Err(FlowError::UnknownCommand(command)),
    }
}

/// Apply a command by name. Names match case-insensitively.
pub fn dispatch_command<S: Surface>(
    field: &mut Field<S>,
    command: &str,
    payload: Value,
) -> Result<Inbound, FlowError> {
    dispatch(field, ServerPacket::from_parts(command, payload)?)
}

/// Decode a raw text frame and apply it.
pub fn dispatch_text<S: Surface>(field: &mut Field<S>, text: &str) -> Result<Inbound, FlowError> {
    let packet = Packet::decode(text)?;
    dispatch_command(field, &packet.command, packet.payload)
}

/// Apply a frame and log the outcome. Errors never stop the caller.
pub fn process_frame<S: Surface>(field: &mut Field<S>, text: &str) -> Option<Inbound> {
    match dispatch_text(field, text) {
        Ok(inbound) => {
            debug!("{:?}", inbound);
            Some(inbound)
        }
        Err(e) => {
            warn!("Dropped frame: {}", e);
            None
        }
    }
}

pub fn build_hello() -> ClientPacket {
    ClientPacket::Hello
}

pub fn build_move(direction: Direction) -> ClientPacket {
    ClientPacket::Move(direction)
}

/// React to a local event. Returns the packet to send, if any.
pub fn handle_input<S: Surface>(field: &mut Field<S>, event: InputEvent) -> Option<ClientPacket> {
    match event {
        InputEvent::Direction(direction) => Some(build_move(direction)),
        InputEvent::ToggleGrid => {
            field.toggle_grid();
            None
        }
        InputEvent::Resize { width, height } => {
            let config = field.config().for_window(width, height);
            field.reconfigure(config);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::surface::Scene;
    use protocol::ProtocolError;
    use serde_json::json;

    fn field() -> Field<Scene> {
        Field::new(Scene::new(), ViewportConfig::default(), 1)
    }

    #[test]
    fn test_dispatch_move_and_kill() {
        let mut f = field();
        let moved = dispatch_text(
            &mut f,
            r#"{"Command":"MOVE","Payload":{"Id":"w1","Positions":[{"X":0,"Y":0},{"X":0,"Y":1},{"X":0,"Y":2}]}}"#,
        )
        .unwrap();
        assert_eq!(
            moved,
            Inbound::Moved {
                id: WormId::from("w1"),
                segments: 2
            }
        );

        let killed = dispatch_text(&mut f, r#"{"Command":"KILL","Payload":"w1"}"#).unwrap();
        assert_eq!(
            killed,
            Inbound::Killed {
                id: WormId::from("w1"),
                existed: true
            }
        );
        assert!(f.is_empty());
    }

    #[test]
    fn test_command_names_ignore_case() {
        let mut f = field();
        let payload = json!({ "Id": 4, "Positions": [{ "X": 1, "Y": 1 }] });
        dispatch_command(&mut f, "Move", payload).unwrap();
        assert!(f.contains(&WormId::from("4")));

        let killed = dispatch_command(&mut f, "kIlL", json!("4")).unwrap();
        assert_eq!(
            killed,
            Inbound::Killed {
                id: WormId::from(4u64),
                existed: true
            }
        );
    }

    #[test]
    fn test_unknown_command_keeps_registry_usable() {
        let mut f = field();
        let err = dispatch_command(&mut f, "SPAWN", Value::Null).unwrap_err();
        assert!(matches!(err, FlowError::UnknownCommand(ref c) if c == "SPAWN"));

        let payload = json!({ "Id": "w1", "Positions": [{ "X": 1, "Y": 1 }, { "X": 2, "Y": 1 }] });
        assert!(dispatch_command(&mut f, "MOVE", payload).is_ok());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_kill_unknown_worm() {
        let mut f = field();
        let killed = dispatch_command(&mut f, "KILL", json!("nobody")).unwrap();
        assert_eq!(
            killed,
            Inbound::Killed {
                id: WormId::from("nobody"),
                existed: false
            }
        );
    }

    #[test]
    fn test_malformed_frames() {
        let mut f = field();
        let err = dispatch_text(&mut f, "not json").unwrap_err();
        assert!(matches!(err, FlowError::Protocol(ProtocolError::Malformed(_))));

        let err = dispatch_text(&mut f, r#"{"Command":"MOVE","Payload":"LEFT"}"#).unwrap_err();
        assert!(matches!(
            err,
            FlowError::Protocol(ProtocolError::InvalidPayload { .. })
        ));
        assert!(process_frame(&mut f, "not json").is_none());
        assert!(f.is_empty());
    }

    #[test]
    fn test_outbound_packets() {
        assert_eq!(build_hello().encode(), r#"{"Command":"HELLO"}"#);
        assert_eq!(
            build_move(Direction::Left).encode(),
            r#"{"Command":"MOVE","Payload":"LEFT"}"#
        );
    }

    #[test]
    fn test_handle_input() {
        let mut f = field();
        assert_eq!(
            handle_input(&mut f, InputEvent::Direction(Direction::Down)),
            Some(ClientPacket::Move(Direction::Down))
        );
        assert_eq!(handle_input(&mut f, InputEvent::ToggleGrid), None);
        assert!(f.grid_visible());

        handle_input(
            &mut f,
            InputEvent::Resize {
                width: 1280.0,
                height: 720.0,
            },
        );
        assert_eq!(f.config().cell_size, 14);
        handle_input(
            &mut f,
            InputEvent::Resize {
                width: 100.0,
                height: 100.0,
            },
        );
        assert_eq!(f.config().cell_size, ViewportConfig::MIN_CELL_SIZE);
    }
}
