//! Key bindings - action to physical key.

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use tetrion_types::Action;

/// Mapping from each [`Action`] to the physical key that drives it.
///
/// The defaults are the fixed stock layout; hosts may override any subset
/// through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub rotate_cw: KeyCode,
    pub rotate_ccw: KeyCode,
    pub rotate_180: KeyCode,
    pub hard_drop: KeyCode,
    pub soft_drop: KeyCode,
    pub hold: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: KeyCode::Left,
            move_right: KeyCode::Right,
            rotate_cw: KeyCode::Char('x'),
            rotate_ccw: KeyCode::Char('z'),
            rotate_180: KeyCode::Char(' '),
            hard_drop: KeyCode::Down,
            soft_drop: KeyCode::Up,
            hold: KeyCode::Char('c'),
        }
    }
}

impl KeyBindings {
    /// The key bound to an action.
    pub fn key_for(&self, action: Action) -> KeyCode {
        match action {
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::RotateCw => self.rotate_cw,
            Action::RotateCcw => self.rotate_ccw,
            Action::Rotate180 => self.rotate_180,
            Action::HardDrop => self.hard_drop,
            Action::SoftDrop => self.soft_drop,
            Action::Hold => self.hold,
        }
    }
}
