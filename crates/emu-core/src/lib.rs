//! Core traits and types for cycle-driven emulation.
//!
//! A machine advances one clock cycle at a time. Host time only enters
//! through [`MasterClock`], which turns elapsed wall-clock time into a
//! cycle count; everything below that works in [`Ticks`].

mod clock;
mod observable;
mod tickable;
mod ticks;

pub use clock::MasterClock;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
