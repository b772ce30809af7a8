//! Game module - piece lifecycle and timing
//!
//! Owns the matrix and the active piece, applies actions consumed from the
//! input queue and advances gravity and lock delay each tick. A piece is
//! created at spawn and conceptually destroyed at lock; the flags record
//! carries what the renderer and host need to know about the last lock.

use arrayvec::ArrayVec;

use tetrion_core::{Matrix, SevenBag, Tetromino};
use tetrion_types::{
    Action, HandlingConfig, PieceKind, SpinKind, GRAVITY_MS, HARD_DROP_GUARD_MS, LOCK_DELAY_MS,
};

/// Fixed-field state flags, refreshed on every lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFlags {
    /// A spawn was blocked (block-out).
    pub game_over: bool,
    /// The stack has reached the band at the top of the visible field.
    pub danger: bool,
    /// Spin classification the last locked piece carried.
    pub spin: SpinKind,
}

/// A running round of play.
#[derive(Debug)]
pub struct Game {
    matrix: Matrix,
    active: Option<Tetromino>,
    bag: SevenBag,
    hold: Option<PieceKind>,
    can_hold: bool,
    config: HandlingConfig,
    flags: GameFlags,
    gravity_timer_ms: u32,
    lock_timer_ms: u32,
    /// Set by a consumed SoftDrop, cleared at the end of the tick.
    soft_dropping: bool,
    /// Remaining hard-drop suppression after a self-lock.
    hard_drop_guard_ms: u32,
    last_cleared: ArrayVec<usize, 4>,
}

impl Game {
    pub fn new(seed: u32, config: HandlingConfig) -> Self {
        Self {
            matrix: Matrix::new(),
            active: None,
            bag: SevenBag::new(seed),
            hold: None,
            can_hold: true,
            config,
            flags: GameFlags::default(),
            gravity_timer_ms: 0,
            lock_timer_ms: 0,
            soft_dropping: false,
            hard_drop_guard_ms: 0,
            last_cleared: ArrayVec::new(),
        }
    }

    /// Spawn the first piece.
    pub fn start(&mut self) {
        if self.active.is_none() && !self.flags.game_over {
            self.spawn_next();
        }
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    pub fn flags(&self) -> GameFlags {
        self.flags
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    /// Rows cleared by the most recent lock, bottom to top.
    pub fn last_cleared(&self) -> &[usize] {
        &self.last_cleared
    }

    /// Ghost row for the active piece.
    pub fn ghost_y(&self) -> Option<i32> {
        self.active.as_ref().map(|piece| piece.ghost_y(&self.matrix))
    }

    #[cfg(test)]
    pub fn matrix_mut(&mut self) -> &mut Matrix {
        &mut self.matrix
    }

    /// Apply one consumed action.
    pub fn apply(&mut self, action: Action) {
        if self.flags.game_over {
            return;
        }
        match action {
            Action::MoveLeft | Action::MoveRight => {
                if let Some(piece) = self.active.as_mut() {
                    piece.move_piece(action, &self.matrix);
                }
            }
            Action::RotateCw | Action::RotateCcw | Action::Rotate180 => {
                if let Some(piece) = self.active.as_mut() {
                    piece.rotate(action, &self.matrix);
                }
            }
            Action::SoftDrop => self.soft_dropping = true,
            Action::HardDrop => {
                if self.hard_drop_guard_ms == 0 {
                    self.hard_drop();
                }
            }
            Action::Hold => self.hold_active(),
        }
    }

    /// Advance timers by one tick's worth of wall time.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.flags.game_over {
            return;
        }
        let Some(piece) = self.active.as_mut() else {
            return;
        };

        self.hard_drop_guard_ms = self.hard_drop_guard_ms.saturating_sub(elapsed_ms);

        let interval = if self.soft_dropping {
            (GRAVITY_MS / self.config.soft_drop_factor.max(1)).max(1)
        } else {
            GRAVITY_MS
        };

        self.gravity_timer_ms += elapsed_ms;
        while self.gravity_timer_ms >= interval {
            self.gravity_timer_ms -= interval;
            if !piece.attempt_move_down(&self.matrix) {
                break;
            }
        }

        if piece.is_on_floor(&self.matrix) {
            self.lock_timer_ms += elapsed_ms;
            if self.lock_timer_ms >= LOCK_DELAY_MS {
                self.lock_active(true);
            }
        } else {
            self.lock_timer_ms = 0;
        }

        self.soft_dropping = false;
    }

    /// Project the active piece to its ghost row and lock it immediately.
    fn hard_drop(&mut self) {
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let ghost = piece.ghost_y(&self.matrix);
        while piece.y() < ghost {
            piece.attempt_move_down(&self.matrix);
        }
        self.lock_active(false);
    }

    /// Swap the active piece with the held one, once per spawn.
    fn hold_active(&mut self) {
        if !self.can_hold {
            return;
        }
        let Some(piece) = self.active.take() else {
            return;
        };

        let incoming = match self.hold.replace(piece.kind()) {
            Some(held) => held,
            None => self.bag.draw(),
        };
        self.place_new_piece(Tetromino::spawn(incoming));
        self.can_hold = false;
    }

    /// Stamp the active piece into the matrix, clear lines, spawn the
    /// replacement. `self_locked` marks locks caused by lock-delay expiry
    /// rather than a hard drop.
    fn lock_active(&mut self, self_locked: bool) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.flags.spin = piece.spin();
        self.matrix.insert(piece.mask(), piece.x(), piece.y());
        self.last_cleared = self.matrix.clear_full_rows();
        self.flags.danger = self.matrix.in_danger_band();

        if self_locked && self.config.prevent_accidental_hard_drops {
            self.hard_drop_guard_ms = HARD_DROP_GUARD_MS;
        }

        self.can_hold = true;
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let kind = self.bag.draw();
        self.place_new_piece(Tetromino::spawn(kind));
    }

    fn place_new_piece(&mut self, piece: Tetromino) {
        self.gravity_timer_ms = 0;
        self.lock_timer_ms = 0;

        if piece.overlaps(&self.matrix) {
            // Block-out: the spawn cells are already occupied.
            self.flags.game_over = true;
            self.active = None;
            return;
        }
        self.active = Some(piece);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetrion_types::MATRIX_WIDTH;

    fn game() -> Game {
        let mut game = Game::new(292168102, HandlingConfig::default());
        game.start();
        game
    }

    #[test]
    fn test_start_spawns_a_piece() {
        let game = game();
        assert!(game.active().is_some());
        assert!(!game.flags().game_over);
    }

    #[test]
    fn test_moves_apply_to_active_piece() {
        let mut game = game();
        let x = game.active().unwrap().x();

        game.apply(Action::MoveRight);
        assert_eq!(game.active().unwrap().x(), x + 1);

        game.apply(Action::MoveLeft);
        assert_eq!(game.active().unwrap().x(), x);
    }

    #[test]
    fn test_gravity_advances_after_interval() {
        let mut game = game();
        let y = game.active().unwrap().y();

        game.tick(GRAVITY_MS - 1);
        assert_eq!(game.active().unwrap().y(), y);

        game.tick(1);
        assert_eq!(game.active().unwrap().y(), y + 1);
    }

    #[test]
    fn test_soft_drop_scales_gravity() {
        let mut game = game();
        let y = game.active().unwrap().y();

        // Default factor 6: one row every ~166ms while soft dropping.
        game.apply(Action::SoftDrop);
        game.tick(GRAVITY_MS / 6);
        assert_eq!(game.active().unwrap().y(), y + 1);

        // The flag does not stick across ticks.
        game.tick(GRAVITY_MS / 6);
        assert_eq!(game.active().unwrap().y(), y + 1);
    }

    #[test]
    fn test_hard_drop_locks_at_ghost_row() {
        let mut game = game();
        let ghost = game.ghost_y().unwrap();
        let kind = game.active().unwrap().kind();

        game.apply(Action::HardDrop);

        // A new piece spawned and the old one is in the matrix.
        assert!(game.active().is_some());
        let mut found = 0;
        for y in 0..40 {
            for x in 0..MATRIX_WIDTH as i32 {
                if game.matrix().cell(x, y) == kind.tile_id() {
                    found += 1;
                    assert!(y >= ghost);
                }
            }
        }
        assert_eq!(found, 4);
    }

    /// Soft-drop the active piece until it rests on the floor. The landing
    /// tick accrues one `SOFT_STEP_MS` of lock delay.
    const SOFT_STEP_MS: u32 = GRAVITY_MS / 6;

    fn land(game: &mut Game) {
        for _ in 0..60 {
            if game.active().unwrap().is_on_floor(game.matrix()) {
                return;
            }
            game.apply(Action::SoftDrop);
            game.tick(SOFT_STEP_MS);
        }
        panic!("piece never reached the floor");
    }

    fn occupied_cells(game: &Game) -> usize {
        (0..40)
            .flat_map(|y| (0..MATRIX_WIDTH as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| game.matrix().cell(x, y) != 0)
            .count()
    }

    #[test]
    fn test_lock_delay_expiry_locks_piece() {
        let mut game = game();
        land(&mut game);

        // Sits on the floor without locking until the delay runs out.
        game.tick(LOCK_DELAY_MS - SOFT_STEP_MS - 1);
        assert_eq!(occupied_cells(&game), 0, "locked before the delay ran out");

        game.tick(SOFT_STEP_MS + 1);
        assert_eq!(occupied_cells(&game), 4);
    }

    #[test]
    fn test_self_lock_arms_hard_drop_guard() {
        let mut game = game();
        land(&mut game);
        game.tick(LOCK_DELAY_MS);
        assert_eq!(occupied_cells(&game), 4, "lock delay expiry should lock");

        // The freshly spawned piece ignores an immediate hard drop.
        game.apply(Action::HardDrop);
        assert_eq!(occupied_cells(&game), 4);
        assert!(game.active().is_some());

        // After the guard window it works again.
        game.tick(HARD_DROP_GUARD_MS);
        game.apply(Action::HardDrop);
        assert_eq!(occupied_cells(&game), 8);
    }

    #[test]
    fn test_hold_swaps_once_per_spawn() {
        let mut game = game();
        let first = game.active().unwrap().kind();

        game.apply(Action::Hold);
        assert_eq!(game.hold_piece(), Some(first));
        let second = game.active().unwrap().kind();

        // A second hold before locking is ignored.
        game.apply(Action::Hold);
        assert_eq!(game.hold_piece(), Some(first));
        assert_eq!(game.active().unwrap().kind(), second);

        // After a lock the swap brings the held piece back.
        game.apply(Action::HardDrop);
        let third = game.active().unwrap().kind();
        game.apply(Action::Hold);
        assert_eq!(game.active().unwrap().kind(), first);
        assert_eq!(game.hold_piece(), Some(third));
    }

    #[test]
    fn test_line_clear_reported_on_lock() {
        let mut game = game();

        // Fill the bottom row except under the active piece's columns,
        // then fill those too: a complete row that clears on any lock.
        for x in 0..MATRIX_WIDTH as i32 {
            game.matrix_mut().set(x, 39, 9);
        }
        game.apply(Action::HardDrop);

        assert!(!game.last_cleared().is_empty());
        assert!(game.last_cleared().contains(&39));
    }

    #[test]
    fn test_block_out_sets_game_over() {
        let mut game = game();

        // Wall off the spawn columns (not whole rows, so nothing clears).
        for y in 17..21 {
            for x in 2..8 {
                game.matrix_mut().set(x, y, 9);
            }
        }
        game.apply(Action::HardDrop);

        assert!(game.flags().game_over);
        assert!(game.active().is_none());

        // Further actions are inert.
        game.apply(Action::MoveLeft);
        game.tick(GRAVITY_MS);
        assert!(game.active().is_none());
    }

    #[test]
    fn test_danger_flag_tracks_stack_height() {
        let mut game = game();
        assert!(!game.flags().danger);

        // A partial ledge just above the visible field (not a full row).
        for x in 0..MATRIX_WIDTH as i32 - 1 {
            game.matrix_mut().set(x, 23, 9);
        }
        game.apply(Action::HardDrop);
        assert!(game.flags().danger);
    }
}
