//! Piece kinematics module - pure, deterministic, and testable
//!
//! This crate contains the playfield grid and everything the active piece
//! can do on it. It has **zero dependencies** on UI, threading, or I/O:
//!
//! - **Deterministic**: identical inputs produce identical piece state
//! - **Testable**: every rule is exercised against literal grid fixtures
//! - **Portable**: runs in any environment (terminal, headless, benchmarks)
//!
//! # Module structure
//!
//! - [`matrix`]: 10x40 occupancy grid with a hidden spawn buffer, insertion
//!   and line clearing
//! - [`mask`]: canonical piece shape masks and their pure rotations
//! - [`kicks`]: the SRS wall-kick offset tables (90 and 180 degree)
//! - [`tetromino`]: the active piece - movement, kick-resolved rotation,
//!   spin classification, gravity and ghost projection
//! - [`bag`]: seeded 7-bag piece generation
//!
//! # Rules
//!
//! Rotation follows the Super Rotation System: the rotated mask is computed
//! first, then the transition's kick offsets are probed strictly in table
//! order and the first collision-free candidate is committed. If every
//! candidate collides the rotation is rejected and the piece is unchanged -
//! that is a defined outcome, not an error.
//!
//! After a committed rotation the piece classifies the move: T pieces run
//! the corner test (with the guideline exception for kick index 4 on the
//! `0->3` and `2->1` transitions), every other piece sets the generic spin
//! flag when it ends up immobile in all four cardinal directions.

pub mod bag;
pub mod kicks;
pub mod mask;
pub mod matrix;
pub mod tetromino;

pub use bag::SevenBag;
pub use kicks::kicks;
pub use mask::Mask;
pub use matrix::Matrix;
pub use tetromino::Tetromino;
