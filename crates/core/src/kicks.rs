//! Kicks module - SRS wall-kick offset tables
//!
//! Pure static data: for every piece family and every legal rotation
//! transition, an ordered list of candidate offsets. The first entry is
//! always `(0, 0)`; resolution elsewhere probes the list strictly in order
//! and commits the first collision-free candidate.
//!
//! Offsets are stored as published, with positive y meaning *up*. The
//! matrix has y growing downward, so the probing code negates the vertical
//! component ([`Tetromino::rotate`](crate::tetromino::Tetromino::rotate)).
//!
//! Three families share tables: T/S/Z/L/J, I, and O (which never kicks).
//! 90-degree entries exist only for adjacent transitions, 180-degree
//! entries only for the `0<->2` and `1<->3` pairs; any other pair has no
//! table and the transition is rejected outright.

use tetrion_types::{PieceKind, RotationState};

/// A single kick candidate, `(x, y)` with y up.
pub type KickOffset = (i8, i8);

/// Row index for the 90-degree tables, one row per (from, direction).
fn index_90(from: RotationState, clockwise: bool) -> usize {
    match (from, clockwise) {
        (RotationState::North, true) => 0,  // 0->1
        (RotationState::North, false) => 1, // 0->3
        (RotationState::East, false) => 2,  // 1->0
        (RotationState::East, true) => 3,   // 1->2
        (RotationState::South, false) => 4, // 2->1
        (RotationState::South, true) => 5,  // 2->3
        (RotationState::West, false) => 6,  // 3->2
        (RotationState::West, true) => 7,   // 3->0
    }
}

/// Shared 90-degree table for T, S, Z, L and J.
#[rustfmt::skip]
const TSZLJ_KICKS: [[KickOffset; 5]; 8] = [
    [(0, 0), (-1, 0), (-1,  1), (0, -2), (-1, -2)], // 0->1
    [(0, 0), ( 1, 0), ( 1,  1), (0, -2), ( 1, -2)], // 0->3
    [(0, 0), ( 1, 0), ( 1, -1), (0,  2), ( 1,  2)], // 1->0
    [(0, 0), ( 1, 0), ( 1, -1), (0,  2), ( 1,  2)], // 1->2
    [(0, 0), (-1, 0), (-1,  1), (0, -2), (-1, -2)], // 2->1
    [(0, 0), ( 1, 0), ( 1,  1), (0, -2), ( 1, -2)], // 2->3
    [(0, 0), (-1, 0), (-1, -1), (0,  2), (-1,  2)], // 3->2
    [(0, 0), (-1, 0), (-1, -1), (0,  2), (-1,  2)], // 3->0
];

/// 90-degree table for I.
#[rustfmt::skip]
const I_KICKS: [[KickOffset; 5]; 8] = [
    [(0, 0), (-2, 0), ( 1, 0), (-2, -1), ( 1,  2)], // 0->1
    [(0, 0), (-1, 0), ( 2, 0), (-1,  2), ( 2, -1)], // 0->3
    [(0, 0), ( 2, 0), (-1, 0), ( 2,  1), (-1, -2)], // 1->0
    [(0, 0), (-1, 0), ( 2, 0), (-1,  2), ( 2, -1)], // 1->2
    [(0, 0), ( 1, 0), (-2, 0), ( 1, -2), (-2,  1)], // 2->1
    [(0, 0), ( 2, 0), (-1, 0), ( 2,  1), (-1, -2)], // 2->3
    [(0, 0), (-2, 0), ( 1, 0), (-2, -1), ( 1,  2)], // 3->2
    [(0, 0), ( 1, 0), (-2, 0), ( 1, -2), (-2,  1)], // 3->0
];

/// O never kicks.
const O_KICKS: [[KickOffset; 1]; 8] = [[(0, 0)]; 8];

/// Shared 180-degree table for T, S, Z, L and J, one row per from-state.
/// These are the extended guideline kicks with diagonal nudges.
#[rustfmt::skip]
const TSZLJ_FLIP_KICKS: [[KickOffset; 12]; 4] = [
    // 0->2
    [(0, 0), ( 1, 0), ( 2, 0), ( 1,  1), ( 2,  1), (-1, 0), (-2, 0), (-1,  1), (-2,  1), (0, -1), ( 3, 0), (-3, 0)],
    // 1->3
    [(0, 0), ( 0, 1), ( 0, 2), (-1,  1), (-1,  2), (0, -1), (0, -2), (-1, -1), (-1, -2), (1,  0), ( 0, 3), ( 0,-3)],
    // 2->0
    [(0, 0), (-1, 0), (-2, 0), (-1, -1), (-2, -1), ( 1, 0), ( 2, 0), ( 1, -1), ( 2, -1), (0,  1), (-3, 0), ( 3, 0)],
    // 3->1
    [(0, 0), ( 0, 1), ( 0, 2), ( 1,  1), ( 1,  2), (0, -1), (0, -2), ( 1, -1), ( 1, -2), (-1, 0), ( 0, 3), ( 0,-3)],
];

/// 180-degree table for I, one row per from-state.
#[rustfmt::skip]
const I_FLIP_KICKS: [[KickOffset; 6]; 4] = [
    [(0, 0), (-1, 0), (-2, 0), ( 1, 0), ( 2, 0), ( 0,  1)], // 0->2
    [(0, 0), ( 0, 1), ( 0, 2), ( 0,-1), ( 0,-2), (-1,  0)], // 1->3
    [(0, 0), ( 1, 0), ( 2, 0), (-1, 0), (-2, 0), ( 0, -1)], // 2->0
    [(0, 0), ( 0, 1), ( 0, 2), ( 0,-1), ( 0,-2), ( 1,  0)], // 3->1
];

const O_FLIP_KICKS: [[KickOffset; 1]; 4] = [[(0, 0)]; 4];

/// Ordered kick candidates for a rotation transition, or `None` when the
/// transition is not defined (identity, or any pair the tables omit).
pub fn kicks(
    kind: PieceKind,
    from: RotationState,
    to: RotationState,
) -> Option<&'static [KickOffset]> {
    let diff = (to.index() + 4 - from.index()) % 4;
    match diff {
        1 | 3 => {
            let row = index_90(from, diff == 1);
            Some(match kind {
                PieceKind::O => &O_KICKS[row][..],
                PieceKind::I => &I_KICKS[row][..],
                _ => &TSZLJ_KICKS[row][..],
            })
        }
        2 => {
            let row = from.index();
            Some(match kind {
                PieceKind::O => &O_FLIP_KICKS[row][..],
                PieceKind::I => &I_FLIP_KICKS[row][..],
                _ => &TSZLJ_FLIP_KICKS[row][..],
            })
        }
        _ => None,
    }
}
