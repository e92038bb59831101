//! Master clock configuration.

use std::time::Duration;

use crate::Ticks;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Master clock configuration for a system.
///
/// The clock is the only bridge between host time and emulated time. The
/// conversion is a pure function so a test can ask "how many cycles is
/// 1.5 ms?" without a real clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Effective frequency in Hz (e.g., `8_000_000` for 8 MHz).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Cycles elapsed in `elapsed`, rounded down.
    #[must_use]
    pub fn ticks_in(&self, elapsed: Duration) -> Ticks {
        let (ticks, _) = self.ticks_with_remainder(elapsed);
        ticks
    }

    /// Cycles elapsed in `elapsed`, plus the host time that did not add up
    /// to a whole cycle.
    ///
    /// Feeding the remainder back into the next frame keeps long-run cycle
    /// counts exact even though each frame is floored.
    #[must_use]
    pub fn ticks_with_remainder(&self, elapsed: Duration) -> (Ticks, Duration) {
        if self.frequency_hz == 0 {
            return (Ticks::ZERO, elapsed);
        }
        let scaled = elapsed.as_nanos() * u128::from(self.frequency_hz);
        let ticks = scaled / NANOS_PER_SECOND;
        let leftover_nanos = (scaled % NANOS_PER_SECOND) / u128::from(self.frequency_hz);
        let ticks = u64::try_from(ticks).unwrap_or(u64::MAX);
        (
            Ticks::new(ticks),
            Duration::from_nanos(leftover_nanos as u64),
        )
    }
}
