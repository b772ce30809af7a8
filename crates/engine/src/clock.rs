//! Tick clock - fixed-step scheduling with bounded catch-up
//!
//! The simulation advances in fixed ticks. When the host falls behind, at
//! most [`MAX_CATCHUP_TICKS`] pending ticks are processed in one iteration;
//! a larger deficit is forcibly reset with a diagnostic instead of letting
//! the loop spiral. Falling behind is self-healing, never fatal.

use tetrion_types::MAX_CATCHUP_TICKS;

/// Accumulates wall-clock time and converts it into whole simulation
/// ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    tick_ms: u32,
    deficit_ms: u32,
    max_catchup: u32,
}

impl TickClock {
    pub fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            deficit_ms: 0,
            max_catchup: MAX_CATCHUP_TICKS,
        }
    }

    #[cfg(test)]
    fn with_max_catchup(tick_ms: u32, max_catchup: u32) -> Self {
        Self {
            max_catchup,
            ..Self::new(tick_ms)
        }
    }

    /// Feed elapsed wall time and get the number of ticks to run now.
    ///
    /// A deficit beyond the catch-up cap is dropped: the returned tick
    /// count is clamped and the remainder discarded.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        self.deficit_ms = self.deficit_ms.saturating_add(elapsed_ms);
        let pending = self.deficit_ms / self.tick_ms;

        if pending > self.max_catchup {
            log::warn!(
                "simulation fell behind: {} pending ticks, clamping to {} and resynchronizing",
                pending,
                self.max_catchup
            );
            self.deficit_ms = 0;
            return self.max_catchup;
        }

        self.deficit_ms -= pending * self.tick_ms;
        pending
    }

    /// Milliseconds still owed to the simulation.
    pub fn deficit_ms(&self) -> u32 {
        self.deficit_ms
    }
}
