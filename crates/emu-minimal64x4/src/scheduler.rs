//! Wall-clock pacing for the windowed frontend.
//!
//! Each redraw asks the scheduler how many cycles the machine owes since the
//! last one. Tests never come through here; they step the machine directly.

use std::time::{Duration, Instant};

use emu_core::{MasterClock, Ticks};

/// Effective clock rate of the board.
pub const CLOCK_HZ: u64 = 8_000_000;

/// Longest gap that is caught up in one go. A window drag or a debugger
/// pause would otherwise queue seconds of emulation into a single frame.
pub const MAX_CATCH_UP: Duration = Duration::from_millis(250);

/// Converts elapsed host time into cycle budgets.
#[derive(Debug, Clone)]
pub struct Scheduler {
    clock: MasterClock,
    last: Instant,
    /// Host time not yet spent on a whole cycle.
    carry: Duration,
}

impl Scheduler {
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self::with_clock(MasterClock::new(CLOCK_HZ), start)
    }

    #[must_use]
    pub fn with_clock(clock: MasterClock, start: Instant) -> Self {
        Self {
            clock,
            last: start,
            carry: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn clock(&self) -> MasterClock {
        self.clock
    }

    /// Cycles to run for the time between the previous call and `now`.
    pub fn advance(&mut self, now: Instant) -> Ticks {
        let mut elapsed = now.saturating_duration_since(self.last) + self.carry;
        self.last = now;
        if elapsed > MAX_CATCH_UP {
            log::debug!("scheduler: dropping {:?} of host time", elapsed - MAX_CATCH_UP);
            elapsed = MAX_CATCH_UP;
        }
        let (ticks, carry) = self.clock.ticks_with_remainder(elapsed);
        self.carry = carry;
        ticks
    }
}
