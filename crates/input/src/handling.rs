//! Handling module - the precision input-timing engine
//!
//! Converts raw key state into a buffered action stream, once per
//! simulation tick:
//!
//! 1. every action's trigger predicate is evaluated against the current
//!    key state and its `{active, timestamp}` record refreshed - one-shot
//!    actions fire on the press edge (`current && !previous`), continuous
//!    actions while held;
//! 2. when both horizontal keys are held, priority resolution leaves at
//!    most one direction active (most recent wins, or neither, by
//!    configuration);
//! 3. the DAS accumulator charges while a direction stays held, clamped at
//!    its threshold; once charged, the ARR accumulator emits one repeat
//!    per elapsed interval (`arr_ms == 0` emits a full field width of
//!    repeats per tick instead);
//! 4. every active action is appended to the FIFO queue in enumeration
//!    order with its timestamp - horizontal actions go through the DAS/ARR
//!    emission rule instead of being enqueued unconditionally.
//!
//! The queue is drained by the game loop through [`Handling::consume`].
//!
//! Per-direction state machine: Idle -(press)-> Tapped [one action]
//! -(held past DAS)-> Charging -(interval elapsed)-> Repeating [action,
//! reset interval] -(release)-> Idle.

use std::collections::VecDeque;
use std::time::Duration;

use tetrion_types::{Action, HandlingConfig, MATRIX_WIDTH};

use crate::bindings::KeyBindings;
use crate::capture::KeySnapshot;

const ACTION_COUNT: usize = Action::VARIANTS.len();

/// Two-layer key state, the raw material of edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub current: bool,
    pub previous: bool,
}

impl KeyState {
    /// Press edge this tick.
    pub fn toggled(self) -> bool {
        self.current && !self.previous
    }

    /// Held right now.
    pub fn down(self) -> bool {
        self.current
    }

    /// Held through a full tick boundary.
    fn held(self) -> bool {
        self.current && self.previous
    }
}

/// Per-action trigger record, refreshed every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionRecord {
    pub active: bool,
    pub timestamp: Duration,
}

/// A queue entry: the action and the time its trigger was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEvent {
    pub action: Action,
    pub timestamp: Duration,
}

/// The input-timing engine. Constructed once per session; persists across
/// pieces and is ticked by the simulation loop.
#[derive(Debug)]
pub struct Handling {
    config: HandlingConfig,
    bindings: KeyBindings,
    keys: [KeyState; ACTION_COUNT],
    records: [ActionRecord; ACTION_COUNT],
    queue: VecDeque<ActionEvent>,
    /// Direction remembered from the last tick where exactly one was held;
    /// the tie-break when both are held.
    current_direction: Option<Action>,
    /// Whether the initial tap has been emitted for the ongoing hold.
    tap_emitted: bool,
    das: Duration,
    arr: Duration,
    prev: Duration,
}

impl Handling {
    pub fn new(config: HandlingConfig, bindings: KeyBindings) -> Self {
        Self {
            config,
            bindings,
            keys: [KeyState::default(); ACTION_COUNT],
            records: [ActionRecord::default(); ACTION_COUNT],
            queue: VecDeque::new(),
            current_direction: None,
            tap_emitted: false,
            das: Duration::ZERO,
            arr: Duration::ZERO,
            prev: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &HandlingConfig {
        &self.config
    }

    /// The trigger record of an action, as of the last tick.
    pub fn record(&self, action: Action) -> ActionRecord {
        self.records[action]
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Run one tick at time `now` (monotonic, since session start) against
    /// the latest key snapshot.
    pub fn tick(&mut self, now: Duration, snapshot: &KeySnapshot) {
        let dt = now.saturating_sub(self.prev);

        // Current key state per bound key. Keys with no binding never
        // surface here.
        for action in Action::VARIANTS {
            self.keys[action].current = snapshot.is_down(self.bindings.key_for(action));
        }

        // Trigger predicates and horizontal priority resolution. Has to
        // run before key states are forwarded or edges would never be
        // seen.
        for action in Action::VARIANTS {
            let triggered = if action.is_continuous() {
                self.keys[action].down()
            } else {
                self.keys[action].toggled()
            };
            if triggered {
                if action.is_horizontal() {
                    self.resolve_horizontal(action, now);
                } else {
                    self.set_record(action, true, now);
                }
            } else {
                self.set_record(action, false, now);
            }
        }

        self.update_das(dt);
        self.buffer_actions();

        // Forward key states for next tick's edge detection.
        for action in Action::VARIANTS {
            self.keys[action].previous = self.keys[action].current;
        }
        self.prev = now;
    }

    /// Pop the oldest queued action, front first. Called by the game loop,
    /// typically once per simulation step and repeatedly during an
    /// `arr_ms == 0` burst.
    pub fn consume(&mut self) -> Option<ActionEvent> {
        self.queue.pop_front()
    }

    fn set_record(&mut self, action: Action, active: bool, now: Duration) {
        self.records[action] = ActionRecord {
            active,
            timestamp: now,
        };
    }

    /// Leave at most one horizontal direction active. With both keys held
    /// the remembered direction loses to the newcomer (or neither is
    /// emitted, by configuration); with one key held it becomes the
    /// remembered direction.
    fn resolve_horizontal(&mut self, action: Action, now: Duration) {
        let left = self.keys[Action::MoveLeft].down();
        let right = self.keys[Action::MoveRight].down();

        if left && right {
            if self.config.prioritize_most_recent_direction {
                if self.current_direction == Some(Action::MoveLeft) {
                    self.set_record(Action::MoveRight, true, now);
                    self.set_record(Action::MoveLeft, false, now);
                } else {
                    self.set_record(Action::MoveLeft, true, now);
                    self.set_record(Action::MoveRight, false, now);
                }
            } else {
                self.set_record(action, false, now);
            }
        } else if left {
            self.current_direction = Some(Action::MoveLeft);
            self.set_record(Action::MoveLeft, true, now);
        } else if right {
            self.current_direction = Some(Action::MoveRight);
            self.set_record(Action::MoveRight, true, now);
        }
    }

    /// Charge or reset the DAS/ARR accumulators from this tick's delta.
    fn update_das(&mut self, dt: Duration) {
        if self.config.das_cancel_on_direction_change {
            self.cancel_das_on_reversal();
        }

        let held =
            self.keys[Action::MoveLeft].held() || self.keys[Action::MoveRight].held();
        if held {
            let threshold = Duration::from_millis(u64::from(self.config.das_ms));
            let was_charged = self.das >= threshold;
            self.das = (self.das + dt).min(threshold);
            // The repeat accumulator only gains time while a direction is
            // actually emitting; a both-held stalemate must not bank
            // repeats for later.
            let emitting = self.records[Action::MoveLeft].active
                || self.records[Action::MoveRight].active;
            if was_charged && emitting {
                self.arr += dt;
            }
        } else {
            // Released (or just pressed this tick): both accumulators and
            // the tap flag restart.
            self.das = Duration::ZERO;
            self.arr = Duration::ZERO;
            self.tap_emitted = false;
        }
    }

    /// Optional mode: pressing the opposite direction while one is held
    /// zeroes the charge immediately.
    fn cancel_das_on_reversal(&mut self) {
        let left = self.keys[Action::MoveLeft];
        let right = self.keys[Action::MoveRight];
        if (left.toggled() && right.down()) || (right.toggled() && left.down()) {
            self.das = Duration::ZERO;
            self.arr = Duration::ZERO;
        }
    }

    /// Append every active action to the queue, in enumeration order.
    fn buffer_actions(&mut self) {
        for action in Action::VARIANTS {
            if !self.records[action].active {
                continue;
            }
            if action.is_horizontal() {
                self.emit_horizontal(action);
            } else {
                self.queue.push_back(ActionEvent {
                    action,
                    timestamp: self.records[action].timestamp,
                });
            }
        }
    }

    /// DAS/ARR emission for the resolved horizontal direction.
    fn emit_horizontal(&mut self, action: Action) {
        let event = ActionEvent {
            action,
            timestamp: self.records[action].timestamp,
        };

        // The initial tap, exactly once per hold.
        if !self.tap_emitted {
            self.queue.push_back(event);
            self.tap_emitted = true;
        }

        let threshold = Duration::from_millis(u64::from(self.config.das_ms));
        if self.das < threshold {
            return;
        }

        if self.config.arr_ms == 0 {
            // Infinite repeat rate: one action per column, the wall stops
            // the rest.
            for _ in 0..MATRIX_WIDTH {
                self.queue.push_back(event);
            }
        } else {
            let interval = Duration::from_millis(u64::from(self.config.arr_ms));
            while self.arr >= interval {
                self.queue.push_back(event);
                self.arr -= interval;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn handling() -> Handling {
        Handling::new(HandlingConfig::default(), KeyBindings::default())
    }

    fn drain(handling: &mut Handling) -> Vec<Action> {
        std::iter::from_fn(|| handling.consume())
            .map(|event| event.action)
            .collect()
    }

    #[test]
    fn test_tap_enqueues_single_move() {
        let mut h = handling();
        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Left, true);

        h.tick(ms(0), &keys);
        assert_eq!(drain(&mut h), vec![Action::MoveLeft]);

        // Still held, DAS not charged: nothing more.
        h.tick(ms(16), &keys);
        assert_eq!(drain(&mut h), vec![]);
    }

    #[test]
    fn test_one_shot_actions_fire_on_press_edge_only() {
        let mut h = handling();
        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Char('x'), true);

        h.tick(ms(0), &keys);
        h.tick(ms(16), &keys);
        h.tick(ms(32), &keys);
        assert_eq!(drain(&mut h), vec![Action::RotateCw]);

        // Release and re-press: a new edge, a new action.
        keys.set_down(KeyCode::Char('x'), false);
        h.tick(ms(48), &keys);
        keys.set_down(KeyCode::Char('x'), true);
        h.tick(ms(64), &keys);
        assert_eq!(drain(&mut h), vec![Action::RotateCw]);
    }

    #[test]
    fn test_soft_drop_enqueues_every_tick_while_held() {
        let mut h = handling();
        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Up, true);

        h.tick(ms(0), &keys);
        h.tick(ms(16), &keys);
        h.tick(ms(32), &keys);
        assert_eq!(
            drain(&mut h),
            vec![Action::SoftDrop, Action::SoftDrop, Action::SoftDrop]
        );
    }

    #[test]
    fn test_same_tick_actions_follow_enumeration_order() {
        let mut h = handling();
        let mut keys = KeySnapshot::default();
        // Pressed "simultaneously": hold, hard drop, rotate, soft drop.
        keys.set_down(KeyCode::Char('c'), true);
        keys.set_down(KeyCode::Down, true);
        keys.set_down(KeyCode::Char('z'), true);
        keys.set_down(KeyCode::Up, true);

        h.tick(ms(0), &keys);
        assert_eq!(
            drain(&mut h),
            vec![
                Action::RotateCcw,
                Action::HardDrop,
                Action::SoftDrop,
                Action::Hold
            ]
        );
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut h = handling();
        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Char('?'), true);
        keys.set_down(KeyCode::F(5), true);

        h.tick(ms(0), &keys);
        assert_eq!(drain(&mut h), vec![]);
    }

    #[test]
    fn test_records_carry_tick_timestamps() {
        let mut h = handling();
        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Up, true);

        h.tick(ms(100), &keys);
        let record = h.record(Action::SoftDrop);
        assert!(record.active);
        assert_eq!(record.timestamp, ms(100));

        let event = h.consume().unwrap();
        assert_eq!(event.timestamp, ms(100));

        // Refreshed on the next tick even while inactive.
        keys.set_down(KeyCode::Up, false);
        h.tick(ms(116), &keys);
        let record = h.record(Action::SoftDrop);
        assert!(!record.active);
        assert_eq!(record.timestamp, ms(116));
    }

    #[test]
    fn test_neither_direction_when_priority_disabled() {
        let config = HandlingConfig {
            prioritize_most_recent_direction: false,
            ..HandlingConfig::default()
        };
        let mut h = Handling::new(config, KeyBindings::default());

        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Left, true);
        h.tick(ms(0), &keys);
        drain(&mut h);

        keys.set_down(KeyCode::Right, true);
        h.tick(ms(16), &keys);
        assert!(!h.record(Action::MoveLeft).active);
        assert!(!h.record(Action::MoveRight).active);
        assert_eq!(drain(&mut h), vec![]);
    }

    #[test]
    fn test_das_cancel_on_reversal_resets_charge() {
        let config = HandlingConfig {
            das_ms: 100,
            arr_ms: 25,
            das_cancel_on_direction_change: true,
            ..HandlingConfig::default()
        };
        let mut h = Handling::new(config, KeyBindings::default());

        let mut keys = KeySnapshot::default();
        keys.set_down(KeyCode::Left, true);
        h.tick(ms(0), &keys);
        h.tick(ms(100), &keys); // fully charged
        drain(&mut h);

        // Pressing right while left is held zeroes the charge; the
        // newcomer has to re-charge before repeating.
        keys.set_down(KeyCode::Right, true);
        h.tick(ms(116), &keys);
        h.tick(ms(132), &keys);
        assert_eq!(drain(&mut h), vec![]);
    }
}
