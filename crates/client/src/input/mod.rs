// Keyboard and window input, queued until the next frame
use std::collections::VecDeque;

use protocol::Direction;

/// A local event the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Arrow key: steer our worm.
    Direction(Direction),
    /// `G`: show or hide the board grid.
    ToggleGrid,
    /// The window changed size, in CSS pixels.
    Resize { width: f64, height: f64 },
}

impl InputEvent {
    /// Map a `KeyboardEvent.key` value. Unbound keys give `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Direction(Direction::Left)),
            "ArrowUp" => Some(Self::Direction(Direction::Up)),
            "ArrowRight" => Some(Self::Direction(Direction::Right)),
            "ArrowDown" => Some(Self::Direction(Direction::Down)),
            "g" | "G" => Some(Self::ToggleGrid),
            _ => None,
        }
    }
}

/// Events collected by DOM listeners, drained once per animation frame.
#[derive(Debug, Default)]
pub struct Input {
    pending: VecDeque<InputEvent>,
    last_size: Option<(f64, f64)>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key press. Returns whether the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        match InputEvent::from_key(key) {
            Some(event) => {
                self.pending.push_back(event);
                true
            }
            None => false,
        }
    }

    /// Record the current window size; queues a resize only when it changed.
    pub fn observe_size(&mut self, width: f64, height: f64) {
        if self.last_size == Some((width, height)) {
            return;
        }
        self.last_size = Some((width, height));
        self.pending.push_back(InputEvent::Resize { width, height });
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Take every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            InputEvent::from_key("ArrowUp"),
            Some(InputEvent::Direction(Direction::Up))
        );
        assert_eq!(
            InputEvent::from_key("ArrowLeft"),
            Some(InputEvent::Direction(Direction::Left))
        );
        assert_eq!(InputEvent::from_key("G"), Some(InputEvent::ToggleGrid));
        assert_eq!(InputEvent::from_key("w"), None);
    }

    #[test]
    fn test_queue_keeps_order() {
        let mut input = Input::new();
        assert!(input.key_down("ArrowRight"));
        assert!(!input.key_down("Shift"));
        assert!(input.key_down("g"));
        let events: Vec<_> = input.drain().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Direction(Direction::Right),
                InputEvent::ToggleGrid
            ]
        );
        assert!(input.is_empty());
    }

    #[test]
    fn test_resize_only_on_change() {
        let mut input = Input::new();
        input.observe_size(800.0, 600.0);
        input.observe_size(800.0, 600.0);
        input.observe_size(1024.0, 768.0);
        assert_eq!(input.drain().count(), 2);
    }
}
