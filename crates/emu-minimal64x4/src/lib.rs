//! Minimal 64x4 emulator.
//!
//! The Minimal 64x4 is an 8-bit breadboard computer with no CPU chip: a
//! 4-bit step counter, the instruction register and five flag bits address
//! a 24-bit wide microcode ROM, and each control word drives the bus,
//! register and memory enables for one clock. The board runs at 8 MHz with
//! 64 KiB of RAM, a 512 KiB SST39SF040 flash holding the OS, a PS/2 keyboard,
//! a UART and a 512×256 monochrome VGA display mapped into RAM.
//!
//! [`Minimal64x4`] is the machine; [`ClockEngine::step`] is one cycle.

pub mod alu;
pub mod bus;
pub mod config;
mod control;
mod engine;
mod error;
pub mod flags;
pub mod io;
mod keyboard;
mod machine;
mod memory;
mod registers;
mod scheduler;
pub mod video;

#[cfg(feature = "native")]
pub mod capture;
#[cfg(feature = "native")]
pub mod keyboard_map;

pub use alu::AluOutput;
pub use bus::{Driver, Resolution};
pub use config::Minimal64x4Config;
pub use control::{ACTIVE_LOW_MASK, CONTROL_ROM_WORDS, ControlRom, ControlWord, Signal};
pub use engine::{ClockEngine, EmulatorState};
pub use error::{LoadError, Plane};
pub use flags::FlagLines;
pub use io::{IoChannel, SerialTransmitter};
pub use keyboard::{BREAK_PREFIX, Ps2Key};
pub use machine::Minimal64x4;
pub use memory::Memory;
pub use registers::Registers;
pub use scheduler::{CLOCK_HZ, Scheduler};

pub use sst_39sf040::{CommandState, Sst39sf040};
