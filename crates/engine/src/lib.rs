//! Game loop module - the driver that consumes the core's outputs
//!
//! The engine ties the piece kinematics to real time: it owns the matrix
//! and the active piece, applies consumed input actions, runs gravity and
//! lock delay, clears lines and spawns replacements from the 7-bag.
//!
//! - [`game`]: spawn/lock lifecycle, hold, hard drop, state flags
//! - [`clock`]: fixed-tick scheduling with bounded catch-up
//!
//! Scoring, levels, combos and perfect-clear detection are not part of
//! this engine.

pub mod clock;
pub mod game;

pub use clock::TickClock;
pub use game::{Game, GameFlags};
