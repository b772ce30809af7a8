//! Tetromino module - the active piece
//!
//! The piece owns its shape mask, rotation state and bounding-box origin,
//! and queries the [`Matrix`] it plays on - it never owns or mutates the
//! grid. Rotation resolves wall kicks against the static tables in
//! [`kicks`](crate::kicks) and classifies spins immediately after a
//! committed rotation.
//!
//! Collision treats the side walls, the floor and the ceiling row 0 as
//! solid; corner probes during spin classification only treat coordinates
//! *outside* the grid as filled. The asymmetry matches reference guideline
//! behavior at the top of the field.

use tetrion_types::{Action, PieceKind, RotationState, SpinKind, MATRIX_HEIGHT, MATRIX_WIDTH};

use crate::kicks::kicks;
use crate::mask::Mask;
use crate::matrix::Matrix;

/// Bounding-box corners probed by the T-spin test, one "front" pair per
/// target rotation state. The back pair of state `s` is the front pair of
/// `(s + 2) % 4`.
const CORNER_PAIRS: [[(i32, i32); 2]; 4] = [
    [(0, 0), (2, 0)],
    [(2, 0), (2, 2)],
    [(2, 2), (0, 2)],
    [(0, 2), (0, 0)],
];

const ALL_CORNERS: [(i32, i32); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// The active falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    kind: PieceKind,
    state: RotationState,
    x: i32,
    y: i32,
    mask: Mask,
    on_floor: bool,
    spin: SpinKind,
}

impl Tetromino {
    /// Create a piece with its bounding-box origin at `(x, y)`.
    ///
    /// A non-North `state` pre-rotates the canonical mask purely (no kick
    /// resolution), so pieces can enter play already rotated.
    pub fn new(kind: PieceKind, state: RotationState, x: i32, y: i32) -> Self {
        let canonical = Mask::for_kind(kind);
        let mask = match state {
            RotationState::North => canonical,
            RotationState::East => canonical.rotated_cw(),
            RotationState::South => canonical.rotated_180(),
            RotationState::West => canonical.rotated_ccw(),
        };
        Self {
            kind,
            state,
            x,
            y,
            mask,
            on_floor: false,
            spin: SpinKind::None,
        }
    }

    /// Create a piece at its spawn position in the hidden buffer, just
    /// above the visible field.
    pub fn spawn(kind: PieceKind) -> Self {
        let x = match kind {
            PieceKind::O => 4,
            _ => 3,
        };
        Self::new(kind, RotationState::North, x, 18)
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Classification of the most recent committed rotation. Cleared by
    /// any successful translation.
    pub fn spin(&self) -> SpinKind {
        self.spin
    }

    /// Whether the last gravity step found the piece resting on something.
    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    /// Whether `mask` placed at `(x, y)` collides with the field bounds or
    /// an occupied cell. The walls, the floor and ceiling row 0 are solid.
    pub fn collides(mask: &Mask, x: i32, y: i32, matrix: &Matrix) -> bool {
        mask.filled().any(|(dx, dy, _)| {
            let px = x + dx as i32;
            let py = y + dy as i32;
            px < 0
                || px >= MATRIX_WIDTH as i32
                || py <= 0
                || py >= MATRIX_HEIGHT as i32
                || matrix.cell(px, py) != 0
        })
    }

    /// Whether the piece collides at its current position (spawn block-out
    /// check).
    pub fn overlaps(&self, matrix: &Matrix) -> bool {
        Self::collides(&self.mask, self.x, self.y, matrix)
    }

    /// Move one column left or right. A blocked move is a no-op, not an
    /// error. Returns whether the move was committed.
    ///
    /// # Panics
    ///
    /// Passing anything but a horizontal movement action is a caller
    /// contract violation.
    pub fn move_piece(&mut self, action: Action, matrix: &Matrix) -> bool {
        let dx = match action {
            Action::MoveLeft => -1,
            Action::MoveRight => 1,
            other => panic!("invalid movement action: {:?}", other),
        };

        if Self::collides(&self.mask, self.x + dx, self.y, matrix) {
            return false;
        }
        self.x += dx;
        self.spin = SpinKind::None;
        true
    }

    /// Rotate with kick resolution.
    ///
    /// Computes the pure rotated mask, then probes the transition's kick
    /// offsets in table order (vertical component negated into
    /// downward-positive coordinates) and commits rotation state, mask and
    /// position at the first collision-free candidate. Exhausting the
    /// table rejects the rotation and leaves the piece unchanged.
    ///
    /// Returns whether the rotation was committed; a committed rotation
    /// also refreshes [`spin`](Self::spin).
    ///
    /// # Panics
    ///
    /// Passing anything but a rotation action is a caller contract
    /// violation.
    pub fn rotate(&mut self, action: Action, matrix: &Matrix) -> bool {
        let (target, rotated) = match action {
            Action::RotateCw => (self.state.cw(), self.mask.rotated_cw()),
            Action::RotateCcw => (self.state.ccw(), self.mask.rotated_ccw()),
            Action::Rotate180 => (self.state.flip(), self.mask.rotated_180()),
            other => panic!("invalid rotation action: {:?}", other),
        };

        let Some(table) = kicks(self.kind, self.state, target) else {
            return false;
        };

        for (index, &(dx, dy)) in table.iter().enumerate() {
            // Tables are published y-up; the matrix grows downward.
            let px = self.x + dx as i32;
            let py = self.y - dy as i32;

            if Self::collides(&rotated, px, py, matrix) {
                continue;
            }

            self.spin = if self.kind == PieceKind::T {
                classify_t_spin(matrix, self.state, target, index, px, py)
            } else {
                classify_immobile(&rotated, px, py, matrix)
            };
            self.state = target;
            self.mask = rotated;
            self.x = px;
            self.y = py;
            return true;
        }

        false
    }

    /// Gravity step: advance one row, or set the on-floor flag when the
    /// row below collides.
    pub fn attempt_move_down(&mut self, matrix: &Matrix) -> bool {
        if Self::collides(&self.mask, self.x, self.y + 1, matrix) {
            self.on_floor = true;
            return false;
        }
        self.y += 1;
        self.on_floor = false;
        self.spin = SpinKind::None;
        true
    }

    /// Live check for ground contact, without touching the flag.
    pub fn is_on_floor(&self, matrix: &Matrix) -> bool {
        Self::collides(&self.mask, self.x, self.y + 1, matrix)
    }

    /// The row the piece would land on under gravity from its current
    /// column. Pure - never mutates rotation state or position.
    pub fn ghost_y(&self, matrix: &Matrix) -> i32 {
        let mut gy = self.y;
        while !Self::collides(&self.mask, self.x, gy + 1, matrix) {
            gy += 1;
        }
        gy
    }
}

/// Corner probe: filled when outside the grid or over an occupied cell.
/// Unlike piece collision, row 0 is probed as a real cell here.
fn corner_filled(matrix: &Matrix, x: i32, y: i32) -> bool {
    x < 0 || x >= MATRIX_WIDTH as i32 || y < 0 || y >= MATRIX_HEIGHT as i32 || matrix.cell(x, y) != 0
}

/// T-spin corner test for a rotation committed at `(px, py)`.
fn classify_t_spin(
    matrix: &Matrix,
    from: RotationState,
    to: RotationState,
    kick_index: usize,
    px: i32,
    py: i32,
) -> SpinKind {
    let count_filled = |corners: &[(i32, i32)]| {
        corners
            .iter()
            .filter(|&&(cx, cy)| corner_filled(matrix, px + cx, py + cy))
            .count()
    };

    let front = count_filled(&CORNER_PAIRS[to.index()]);
    match front {
        1 => {
            let back = count_filled(&CORNER_PAIRS[(to.index() + 2) % 4]);
            if back < 2 {
                return SpinKind::None;
            }
            // Guideline exception: the farthest kick on 0->3 and 2->1
            // upgrades what the corner test alone would call a mini.
            let exception = kick_index == 4
                && matches!(
                    (from, to),
                    (RotationState::North, RotationState::West)
                        | (RotationState::South, RotationState::East)
                );
            if exception {
                SpinKind::TSpin
            } else {
                SpinKind::TSpinMini
            }
        }
        2 => {
            if count_filled(&ALL_CORNERS) >= 3 {
                SpinKind::TSpin
            } else {
                SpinKind::None
            }
        }
        _ => SpinKind::None,
    }
}

/// Immobility test for non-T pieces: a spin iff the committed placement
/// collides when shifted one cell in every cardinal direction.
fn classify_immobile(mask: &Mask, px: i32, py: i32, matrix: &Matrix) -> SpinKind {
    let blocked = |dx: i32, dy: i32| Tetromino::collides(mask, px + dx, py + dy, matrix);
    if blocked(1, 0) && blocked(-1, 0) && blocked(0, 1) && blocked(0, -1) {
        SpinKind::Spin
    } else {
        SpinKind::None
    }
}
