//! Top-level Minimal 64x4 system.
//!
//! Ties the clock engine to the machine state and exposes what a frontend
//! or a test needs: stepping by count, reset, key and serial input, serial
//! output, and the framebuffer.

use emu_core::{Observable, Tickable, Ticks, Value};
use sst_39sf040::Sst39sf040;

use crate::config::Minimal64x4Config;
use crate::control::ControlWord;
use crate::engine::{ClockEngine, EmulatorState};
use crate::error::LoadError;
use crate::keyboard::Ps2Key;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::video;

/// Minimal 64x4 system.
pub struct Minimal64x4 {
    engine: ClockEngine,
    state: EmulatorState,
    /// Cycles executed since power-on.
    cycles: u64,
}

impl Minimal64x4 {
    /// Power on with the given ROM and flash contents.
    pub fn new(config: Minimal64x4Config) -> Result<Self, LoadError> {
        let memory = Memory::new(&config.flash_image)?;
        Ok(Self {
            engine: ClockEngine::new(config.control_rom),
            state: EmulatorState::new(memory),
            cycles: 0,
        })
    }

    /// Run one cycle. Returns the control word that was executed.
    pub fn step(&mut self) -> ControlWord {
        self.cycles += 1;
        self.engine.step(&mut self.state)
    }

    /// Run exactly `count` cycles.
    pub fn run_cycles(&mut self, count: u64) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Pull the reset line: SC, PC, MAR and Bank go to zero. Memory, the
    /// other registers and pending I/O are untouched.
    pub fn reset(&mut self) {
        log::info!("reset at cycle {}", self.cycles);
        self.state.regs.reset();
    }

    /// Queue the PS/2 bytes for a key press or release. Returns false if
    /// the keyboard FIFO overflowed.
    pub fn key_event(&mut self, key: Ps2Key, pressed: bool) -> bool {
        let bytes = key.event_bytes(pressed);
        self.state.keyboard.enqueue_all(&bytes) == bytes.len()
    }

    /// Replace anything still waiting on the serial line with `bytes`.
    pub fn upload_serial(&mut self, bytes: &[u8]) -> usize {
        self.state.serial.clear_pending();
        let accepted = self.state.serial.enqueue_all(bytes);
        log::info!("serial: uploading {accepted} bytes");
        accepted
    }

    /// Bytes the machine has transmitted since the last call.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.state.serial_tx.take_output()
    }

    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.state.regs
    }

    /// Direct register access for test setup and debugging.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.state.regs
    }

    #[must_use]
    pub fn ram(&self) -> &[u8] {
        self.state.memory.ram()
    }

    pub fn ram_mut(&mut self) -> &mut [u8] {
        self.state.memory.ram_mut()
    }

    #[must_use]
    pub fn flash(&self) -> &Sst39sf040 {
        self.state.memory.flash()
    }

    /// CPU view of memory at `bank:addr`, without side effects.
    #[must_use]
    pub fn peek(&self, bank: u8, addr: u16) -> u8 {
        self.state.memory.read(bank, addr)
    }

    /// Last value driven onto the data bus.
    #[must_use]
    pub fn bus(&self) -> u8 {
        self.state.bus
    }

    #[must_use]
    pub fn keyboard_ready(&self) -> bool {
        self.state.keyboard.ready()
    }

    #[must_use]
    pub fn serial_ready(&self) -> bool {
        self.state.serial.ready()
    }

    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Draw video RAM into an ARGB32 buffer of
    /// [`video::WIDTH`] × [`video::HEIGHT`] pixels.
    pub fn render_framebuffer(&self, out: &mut [u32]) {
        video::render(self.ram(), out);
    }

    #[must_use]
    pub fn state(&self) -> &EmulatorState {
        &self.state
    }
}

impl Tickable for Minimal64x4 {
    fn tick(&mut self) {
        self.step();
    }

    fn tick_n(&mut self, count: Ticks) {
        self.run_cycles(count.get());
    }
}

/// Parse a 16-bit address in `$1234`, `0x1234` or decimal form.
fn parse_u16(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

impl Observable for Minimal64x4 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.state.regs;
        if let Some(rest) = path.strip_prefix("memory.") {
            // `memory.<bank>:<addr>` or `memory.<addr>` (RAM view).
            let (bank, addr) = match rest.split_once(':') {
                Some((bank, addr)) => (u8::try_from(parse_u16(bank)?).ok()?, parse_u16(addr)?),
                None => (0x80, parse_u16(rest)?),
            };
            return Some(self.peek(bank, addr).into());
        }
        match path {
            "cpu.a" => Some(regs.a.into()),
            "cpu.b" => Some(regs.b.into()),
            "cpu.pc" => Some(regs.pc.into()),
            "cpu.mar" => Some(regs.mar.into()),
            "cpu.bank" => Some(regs.bank.into()),
            "cpu.fr" => Some(regs.fr.into()),
            "cpu.sc" => Some(regs.sc.into()),
            "cpu.ir" => Some(regs.ir.into()),
            "bus" => Some(self.state.bus.into()),
            "flash.state" => Some(self.flash().state().name().into()),
            "keyboard.ready" => Some(self.state.keyboard.ready().into()),
            "serial.ready" => Some(self.state.serial.ready().into()),
            "serial.tx_busy" => Some(self.state.serial_tx.busy().into()),
            "cycles" => Some(self.cycles.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.a",
            "cpu.b",
            "cpu.pc",
            "cpu.mar",
            "cpu.bank",
            "cpu.fr",
            "cpu.sc",
            "cpu.ir",
            "bus",
            "flash.state",
            "keyboard.ready",
            "serial.ready",
            "serial.tx_busy",
            "cycles",
            "memory.<bank>:<address>",
            "memory.<address>",
        ]
    }
}
