//! Pointer events as seen by the tools.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move { position: Point },
    Down { position: Point, button: MouseButton },
    /// Movement while a button is held.
    Drag { position: Point },
    Up { position: Point, button: MouseButton },
}

impl PointerEvent {
    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position }
    }

    /// Primary-button press.
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
        }
    }

    pub fn dragged(position: Point) -> Self {
        PointerEvent::Drag { position }
    }

    /// Primary-button release.
    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: MouseButton::Left,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Move { position }
            | PointerEvent::Down { position, .. }
            | PointerEvent::Drag { position }
            | PointerEvent::Up { position, .. } => position,
        }
    }
}
