//! Wall clock → fixed simulation ticks.

use std::time::{Duration, Instant};

use crate::constants::{MAX_TICKS_PER_FRAME, TICK};

/// Converts frame callbacks into a bounded number of fixed-length ticks.
///
/// Leftover time smaller than one tick is carried into the next frame, so the
/// simulation runs at the same pace regardless of the render rate.  A long
/// stall (suspended terminal, debugger) is clamped to `max_ticks` so the game
/// never races to catch up.
#[derive(Clone, Debug)]
pub struct TickDriver {
    tick: Duration,
    max_ticks: u32,
    last: Option<Instant>,
    backlog: Duration,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new(TICK, MAX_TICKS_PER_FRAME)
    }
}

impl TickDriver {
    pub fn new(tick: Duration, max_ticks: u32) -> Self {
        Self {
            tick,
            max_ticks: max_ticks.max(1),
            last: None,
            backlog: Duration::ZERO,
        }
    }

    pub fn tick_length(&self) -> Duration {
        self.tick
    }

    /// Number of ticks to simulate for a frame delivered at `now`.
    ///
    /// The very first frame always yields one tick.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last.replace(now) else {
            return 1;
        };

        let cap = self.tick * self.max_ticks;
        self.backlog = (self.backlog + now.saturating_duration_since(last)).min(cap);

        let mut ticks = 0;
        while self.backlog >= self.tick && ticks < self.max_ticks {
            self.backlog -= self.tick;
            ticks += 1;
        }
        ticks
    }
}
