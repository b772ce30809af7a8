//! Shared types module - data structures and constants used across the workspace
//!
//! This crate defines the fundamental types used throughout the engine.
//! All types are pure data structures; the only dependency is `serde` so the
//! host application can supply configuration.
//!
//! # Matrix dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 40 rows total; the bottom [`VISIBLE_HEIGHT`] rows are the
//!   visible field, rows `1..20` are the hidden spawn buffer and row 0 is
//!   the ceiling boundary
//! - **Spawn origin**: `(3, 18)` for most pieces, just above the visible field
//!
//! # Timing constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed simulation tick |
//! | `GRAVITY_MS` | 1000 | Base fall interval |
//! | `LOCK_DELAY_MS` | 500 | On-floor time before a piece locks |
//! | `HARD_DROP_GUARD_MS` | 100 | Hard-drop suppression after a self-lock |

use serde::{Deserialize, Serialize};

/// Matrix dimensions.
pub const MATRIX_WIDTH: usize = 10;
pub const MATRIX_HEIGHT: usize = 40;
pub const VISIBLE_HEIGHT: usize = 20;

/// First visible row (everything above is the hidden spawn buffer).
pub const VISIBLE_TOP: usize = MATRIX_HEIGHT - VISIBLE_HEIGHT;

/// Rows above the visible field that count as the danger band.
pub const DANGER_ROWS: usize = 4;

/// Simulation timing (milliseconds).
pub const TICK_MS: u32 = 16;
pub const GRAVITY_MS: u32 = 1000;
pub const LOCK_DELAY_MS: u32 = 500;
pub const HARD_DROP_GUARD_MS: u32 = 100;

/// Ticks the scheduler may process in one catch-up burst before it
/// forcibly resynchronizes.
pub const MAX_CATCHUP_TICKS: u32 = 8;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    S,
    Z,
    L,
    J,
    O,
    I,
}

impl PieceKind {
    /// All piece kinds, in tile-id order.
    pub const VARIANTS: [PieceKind; 7] = {
        use PieceKind::*;
        [T, S, Z, L, J, O, I]
    };

    /// Nonzero cell value used for this kind in masks and the matrix.
    pub const fn tile_id(self) -> u8 {
        match self {
            PieceKind::T => 1,
            PieceKind::S => 2,
            PieceKind::Z => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::O => 6,
            PieceKind::I => 7,
        }
    }

    /// Single-letter name.
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::O => 'O',
            PieceKind::I => 'I',
        }
    }
}

/// Rotation states (North = spawn orientation)
///
/// Clockwise is `+1 mod 4`, counter-clockwise `-1 mod 4`, 180 is `+2 mod 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationState {
    North,
    East,
    South,
    West,
}

impl RotationState {
    /// All rotation states in index order; `VARIANTS[s.index()] == s`.
    pub const VARIANTS: [RotationState; 4] = {
        use RotationState::*;
        [North, East, South, West]
    };

    /// Numeric state in `0..4`.
    pub const fn index(self) -> usize {
        match self {
            RotationState::North => 0,
            RotationState::East => 1,
            RotationState::South => 2,
            RotationState::West => 3,
        }
    }

    /// State from a numeric index (taken mod 4).
    pub const fn from_index(index: usize) -> Self {
        Self::VARIANTS[index % 4]
    }

    /// Rotate clockwise.
    pub const fn cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise.
    pub const fn ccw(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Rotate 180 degrees.
    pub const fn flip(self) -> Self {
        Self::from_index(self.index() + 2)
    }
}

/// Game actions emitted by the input layer and consumed by the game loop.
///
/// The declaration order is load-bearing: actions that become active on the
/// same tick are enqueued in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft = 0,
    MoveRight,
    RotateCw,
    RotateCcw,
    Rotate180,
    HardDrop,
    SoftDrop,
    Hold,
}

impl Action {
    /// All actions in declaration order; `VARIANTS[a as usize] == a`.
    pub const VARIANTS: [Action; 8] = {
        use Action::*;
        [
            MoveLeft, MoveRight, RotateCw, RotateCcw, Rotate180, HardDrop, SoftDrop, Hold,
        ]
    };

    /// Whether this is a horizontal movement action (subject to DAS/ARR
    /// and left/right priority resolution).
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Action::MoveLeft | Action::MoveRight)
    }

    /// Whether the action triggers while its key is held (`down`) rather
    /// than only on the press edge (`toggled`).
    pub const fn is_continuous(self) -> bool {
        matches!(self, Action::MoveLeft | Action::MoveRight | Action::SoftDrop)
    }

    /// The opposite horizontal direction, for the two movement actions.
    pub const fn opposite(self) -> Option<Action> {
        match self {
            Action::MoveLeft => Some(Action::MoveRight),
            Action::MoveRight => Some(Action::MoveLeft),
            _ => None,
        }
    }
}

impl<T> std::ops::Index<Action> for [T; Action::VARIANTS.len()] {
    type Output = T;

    fn index(&self, action: Action) -> &T {
        &self[action as usize]
    }
}

impl<T> std::ops::IndexMut<Action> for [T; Action::VARIANTS.len()] {
    fn index_mut(&mut self, action: Action) -> &mut T {
        &mut self[action as usize]
    }
}

/// Classification of a committed rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinKind {
    /// Rotation was not a spin.
    #[default]
    None,
    /// Generic spin: a non-T piece rotated into an immobile position.
    Spin,
    /// T-spin mini.
    TSpinMini,
    /// Full T-spin.
    TSpin,
}

impl SpinKind {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            SpinKind::None => None,
            SpinKind::Spin => Some("spin"),
            SpinKind::TSpinMini => Some("t-spin mini"),
            SpinKind::TSpin => Some("t-spin"),
        }
    }
}

/// Input handling configuration, supplied by the host.
///
/// All durations are milliseconds. Every field has a default, so a partial
/// configuration document works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlingConfig {
    /// Auto repeat rate: interval between repeated movements once DAS has
    /// charged. 0 means instant movement across the whole field width.
    pub arr_ms: u32,
    /// Delayed auto shift: time between the initial press and the first
    /// auto-repeated movement.
    pub das_ms: u32,
    /// DAS cut delay: pause applied to ongoing DAS movement after a drop or
    /// rotation. Recognized but not consumed by any code path.
    pub dcd_ms: u32,
    /// Factor by which soft drop scales the current gravity.
    pub soft_drop_factor: u32,
    /// Ignore hard drops for a short window after a piece locks on its own.
    pub prevent_accidental_hard_drops: bool,
    /// Reset the DAS timer when the opposite direction is pressed while the
    /// first is still held.
    pub das_cancel_on_direction_change: bool,
    /// Prioritize soft drop over horizontal movement at very high speeds.
    /// Recognized but not consumed by any code path.
    pub prefer_soft_drop_over_movement: bool,
    /// When both directions are held, the most recently pressed one wins.
    /// When false, neither direction is emitted.
    pub prioritize_most_recent_direction: bool,
}

impl Default for HandlingConfig {
    fn default() -> Self {
        Self {
            arr_ms: 33,
            das_ms: 167,
            dcd_ms: 0,
            soft_drop_factor: 6,
            prevent_accidental_hard_drops: true,
            das_cancel_on_direction_change: false,
            prefer_soft_drop_over_movement: true,
            prioritize_most_recent_direction: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_state_cycle() {
        assert_eq!(RotationState::North.cw(), RotationState::East);
        assert_eq!(RotationState::West.cw(), RotationState::North);
        assert_eq!(RotationState::North.ccw(), RotationState::West);
        assert_eq!(RotationState::East.flip(), RotationState::West);

        for state in RotationState::VARIANTS {
            assert_eq!(state.cw().ccw(), state);
            assert_eq!(state.flip().flip(), state);
            assert_eq!(RotationState::from_index(state.index()), state);
        }
    }

    #[test]
    fn test_action_variant_order_matches_discriminants() {
        for (i, action) in Action::VARIANTS.iter().enumerate() {
            assert_eq!(*action as usize, i);
        }
    }

    #[test]
    fn test_action_classification() {
        assert!(Action::MoveLeft.is_horizontal());
        assert!(Action::MoveRight.is_horizontal());
        assert!(!Action::SoftDrop.is_horizontal());

        assert!(Action::SoftDrop.is_continuous());
        assert!(!Action::RotateCw.is_continuous());
        assert!(!Action::Hold.is_continuous());

        assert_eq!(Action::MoveLeft.opposite(), Some(Action::MoveRight));
        assert_eq!(Action::HardDrop.opposite(), None);
    }

    #[test]
    fn test_tile_ids_are_nonzero_and_unique() {
        let mut seen = [false; 8];
        for kind in PieceKind::VARIANTS {
            let id = kind.tile_id();
            assert!(id != 0);
            assert!(!seen[id as usize], "duplicate tile id {}", id);
            seen[id as usize] = true;
        }
    }

    #[test]
    fn test_handling_config_defaults() {
        let config = HandlingConfig::default();
        assert_eq!(config.arr_ms, 33);
        assert_eq!(config.das_ms, 167);
        assert_eq!(config.dcd_ms, 0);
        assert_eq!(config.soft_drop_factor, 6);
        assert!(config.prevent_accidental_hard_drops);
        assert!(!config.das_cancel_on_direction_change);
        assert!(config.prioritize_most_recent_direction);
    }
}
