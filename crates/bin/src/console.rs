//! Stdin commands for the headless client.

use client::InputEvent;
use protocol::Direction;
use thiserror::Error;

/// One line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Routed through the same path as browser input.
    Input(InputEvent),
    /// Print registry and scene counters.
    Status,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try left/up/right/down, grid, resize W H, status, quit)")]
    Unknown(String),
    #[error("Usage: resize <width> <height>")]
    BadResize,
}

/// Parse one stdin line. Blank lines give `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    if let Ok(direction) = head.parse::<Direction>() {
        return Ok(Some(Command::Input(InputEvent::Direction(direction))));
    }

    let command = match head.to_ascii_lowercase().as_str() {
        "grid" | "g" => Command::Input(InputEvent::ToggleGrid),
        "resize" => {
            let mut size = words.map(str::parse::<f64>);
            match (size.next(), size.next()) {
                (Some(Ok(width)), Some(Ok(height))) => {
                    Command::Input(InputEvent::Resize { width, height })
                }
                _ => return Err(CommandError::BadResize),
            }
        }
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert_eq!(
            parse("left").unwrap(),
            Some(Command::Input(InputEvent::Direction(Direction::Left)))
        );
        assert_eq!(
            parse("  DOWN ").unwrap(),
            Some(Command::Input(InputEvent::Direction(Direction::Down)))
        );
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            parse("resize 1280 720").unwrap(),
            Some(Command::Input(InputEvent::Resize {
                width: 1280.0,
                height: 720.0
            }))
        );
        assert_eq!(parse("resize 1280"), Err(CommandError::BadResize));
        assert_eq!(parse("resize a b"), Err(CommandError::BadResize));
    }

    #[test]
    fn test_misc() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("G").unwrap(), Some(Command::Input(InputEvent::ToggleGrid)));
        assert_eq!(parse("status").unwrap(), Some(Command::Status));
        assert_eq!(parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse("jump"),
            Err(CommandError::Unknown("jump".to_string()))
        );
    }
}
