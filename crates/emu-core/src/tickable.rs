//! Trait for components that can be advanced by clock cycles.

use crate::Ticks;

/// A component that can be advanced by clock cycles.
pub trait Tickable {
    /// Advance the component by exactly one clock cycle.
    fn tick(&mut self);

    /// Advance the component by `count` cycles.
    ///
    /// Default implementation calls `tick()` in a loop. Components may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
