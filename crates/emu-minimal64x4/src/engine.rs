//! One machine cycle.
//!
//! [`ClockEngine`] owns the immutable control ROM; [`EmulatorState`] owns
//! everything the cycle mutates. A cycle is the fixed sequence:
//!
//! 1. I/O timers
//! 2. Control word decode from FR, IR and SC
//! 3. ALU evaluation (always, whether or not it drives the bus)
//! 4. Bus arbitration
//! 5. Memory write at the pre-cycle Bank:MAR
//! 6. Register loads (A, B, Bank, FR, IR)
//! 7. PC increment, then byte loads
//! 8. MAR increment, then byte loads
//! 9. Serial transmit strobe
//! 10. Step counter

#![allow(clippy::cast_possible_truncation)]

use crate::alu::{self, AluOutput};
use crate::bus::{self, Driver, Resolution};
use crate::control::{ControlRom, ControlWord, Signal};
use crate::flags::FlagLines;
use crate::io::{IoChannel, SerialTransmitter};
use crate::memory::Memory;
use crate::registers::Registers;

/// All mutable machine state.
pub struct EmulatorState {
    pub regs: Registers,
    pub memory: Memory,
    pub keyboard: IoChannel,
    pub serial: IoChannel,
    pub serial_tx: SerialTransmitter,
    /// Bus value of the last cycle. A floating bus keeps it.
    pub bus: u8,
}

impl EmulatorState {
    #[must_use]
    pub fn new(memory: Memory) -> Self {
        Self {
            regs: Registers::new(),
            memory,
            keyboard: IoChannel::keyboard(),
            serial: IoChannel::serial(),
            serial_tx: SerialTransmitter::new(),
            bus: 0,
        }
    }

    /// Live flag lines for the ALU output of this cycle.
    #[must_use]
    pub fn flag_lines(&self, alu: AluOutput) -> FlagLines {
        FlagLines {
            zero: alu.zero(),
            carry: alu.carry(),
            negative: alu.negative(),
            serial_ready: self.serial.ready(),
            keyboard_ready: self.keyboard.ready(),
        }
    }
}

/// Executes cycles against an [`EmulatorState`].
#[derive(Debug)]
pub struct ClockEngine {
    rom: ControlRom,
}

impl ClockEngine {
    #[must_use]
    pub fn new(rom: ControlRom) -> Self {
        Self { rom }
    }

    #[must_use]
    pub fn rom(&self) -> &ControlRom {
        &self.rom
    }

    /// Run one clock cycle. Returns the control word that was executed.
    pub fn step(&self, state: &mut EmulatorState) -> ControlWord {
        state.keyboard.tick();
        state.serial.tick();
        state.serial_tx.tick();

        let regs = state.regs;
        let ctrl = self.rom.decode(regs.fr, regs.ir, regs.sc);
        let alu = alu::compute(regs.a, regs.b, ctrl.has(Signal::Es), ctrl.has(Signal::Ec));

        let Resolution { value: data, .. } =
            bus::resolve(ctrl, regs.fr, state.bus, |driver| match driver {
                Driver::Ones => 0xFF,
                Driver::Accumulator => regs.a,
                Driver::BRegister => regs.b,
                Driver::Alu => bus::alu_output(ctrl, alu),
                Driver::Memory => state.memory.read(regs.bank, regs.mar),
                Driver::SerialIn => state.serial.take(),
                Driver::KeyboardIn => state.keyboard.take(),
                Driver::PcLow => regs.pc as u8,
                Driver::PcHigh => (regs.pc >> 8) as u8,
            });
        state.bus = data;

        if ctrl.has(Signal::Ri) {
            state.memory.write(regs.bank, regs.mar, data);
        }

        let lines = state.flag_lines(alu);
        let r = &mut state.regs;
        if ctrl.has(Signal::Ai) {
            r.a = data;
        }
        if ctrl.has(Signal::Bi) {
            r.b = data;
        }
        if ctrl.has(Signal::Ni) {
            r.bank = data;
        }
        if ctrl.has(Signal::Fi) {
            r.fr = lines.bits();
        }
        if ctrl.has(Signal::Ii) {
            r.ir = data;
        }

        if ctrl.has(Signal::Ce) {
            r.pc = r.pc.wrapping_add(1);
        }
        if ctrl.has(Signal::Cil) {
            r.pc = (r.pc & 0xFF00) | u16::from(data);
        }
        if ctrl.has(Signal::Cih) {
            r.pc = (r.pc & 0x00FF) | (u16::from(data) << 8);
        }

        if ctrl.has(Signal::Me) {
            r.mar = r.mar.wrapping_add(1);
        }
        if ctrl.has(Signal::Mil) {
            let low = if ctrl.has(Signal::Mc) { r.pc & 0x00FF } else { u16::from(data) };
            r.mar = (r.mar & 0xFF00) | low;
        }
        if ctrl.has(Signal::Mih) {
            let high = if ctrl.has(Signal::Mz) {
                0
            } else if ctrl.has(Signal::Mc) {
                r.pc & 0xFF00
            } else {
                u16::from(data) << 8
            };
            r.mar = (r.mar & 0x00FF) | high;
        }

        if ctrl.has_all(&[Signal::Mz, Signal::Ao]) {
            state.serial_tx.send(data);
        }

        if ctrl.has(Signal::Ic) {
            r.sc = 0;
        } else {
            r.advance_step();
        }

        ctrl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{C, K, N, T, Z};

    /// Every state runs the same word.
    fn engine(word: ControlWord) -> ClockEngine {
        ClockEngine::new(ControlRom::from_fn(move |_, _, _| word))
    }

    fn state() -> EmulatorState {
        EmulatorState::new(Memory::new(&[]).expect("empty image"))
    }

    fn word(signals: &[Signal]) -> ControlWord {
        ControlWord::from_signals(signals)
    }

    #[test]
    fn idle_cycles_only_advance_step_counter() {
        let eng = engine(ControlWord::NONE);
        let mut st = state();
        for expected in [1, 2, 3] {
            eng.step(&mut st);
            assert_eq!(st.regs.sc, expected);
        }
        assert_eq!(st.regs.pc, 0);
    }

    #[test]
    fn step_counter_wraps_after_sixteen_cycles() {
        let eng = engine(ControlWord::NONE);
        let mut st = state();
        st.regs.sc = 5;
        for _ in 0..16 {
            eng.step(&mut st);
        }
        assert_eq!(st.regs.sc, 5);
    }

    #[test]
    fn clear_signal_resets_step_counter() {
        let eng = engine(word(&[Signal::Ic]));
        let mut st = state();
        st.regs.sc = 9;
        eng.step(&mut st);
        assert_eq!(st.regs.sc, 0);
    }

    #[test]
    fn alu_sum_loads_accumulator() {
        let eng = engine(word(&[Signal::Eo, Signal::Ai]));
        let mut st = state();
        st.regs.a = 0x05;
        st.regs.b = 0x03;
        eng.step(&mut st);
        assert_eq!(st.regs.a, 0x08);
        assert_eq!(st.bus, 0x08);
    }

    #[test]
    fn flags_latch_only_on_fi() {
        let mut st = state();
        st.regs.a = 0x05;
        st.regs.b = 0x03;

        // Subtract without FI: FR keeps its old contents.
        engine(word(&[Signal::Eo, Signal::Es, Signal::Ec])).step(&mut st);
        assert_eq!(st.regs.fr, 0);

        engine(word(&[Signal::Es, Signal::Ec, Signal::Fi])).step(&mut st);
        assert_eq!(st.regs.fr, C | T | K);

        st.regs.a = 0x03;
        st.regs.b = 0x05;
        engine(word(&[Signal::Es, Signal::Ec, Signal::Fi])).step(&mut st);
        assert_eq!(st.regs.fr, N | T | K);

        st.regs.b = 0x03;
        engine(word(&[Signal::Es, Signal::Ec, Signal::Fi])).step(&mut st);
        assert_eq!(st.regs.fr, Z | C | T | K);
    }

    #[test]
    fn memory_write_uses_address_before_increment() {
        let eng = engine(word(&[Signal::Ao, Signal::Ri, Signal::Me]));
        let mut st = state();
        st.regs.a = 0x5A;
        st.regs.mar = 0x8000;
        eng.step(&mut st);
        assert_eq!(st.memory.ram()[0x8000], 0x5A);
        assert_eq!(st.regs.mar, 0x8001);
    }

    #[test]
    fn pc_load_overrides_increment() {
        let eng = engine(word(&[Signal::Ff, Signal::Ce, Signal::Cil]));
        let mut st = state();
        st.regs.pc = 0x12FF;
        eng.step(&mut st);
        // CE carries into the high byte, then CIL replaces the low byte.
        assert_eq!(st.regs.pc, 0x13FF);
    }

    #[test]
    fn mar_transfer_uses_updated_pc() {
        let eng = engine(word(&[Signal::Ce, Signal::Mil, Signal::Mih, Signal::Mc]));
        let mut st = state();
        st.regs.pc = 0x20FF;
        eng.step(&mut st);
        assert_eq!(st.regs.pc, 0x2100);
        assert_eq!(st.regs.mar, 0x2100);
    }

    #[test]
    fn zero_page_clears_mar_high() {
        let eng = engine(word(&[Signal::Bo, Signal::Mil, Signal::Mih, Signal::Mz]));
        let mut st = state();
        st.regs.b = 0x42;
        st.regs.mar = 0xBEEF;
        eng.step(&mut st);
        assert_eq!(st.regs.mar, 0x0042);
    }

    #[test]
    fn mar_high_from_bus() {
        let eng = engine(word(&[Signal::Ao, Signal::Mih]));
        let mut st = state();
        st.regs.a = 0xC1;
        st.regs.mar = 0x0033;
        eng.step(&mut st);
        assert_eq!(st.regs.mar, 0xC133);
    }

    #[test]
    fn serial_read_clears_register_and_loads_a() {
        let eng = engine(word(&[Signal::Mz, Signal::Ai]));
        let mut st = state();
        st.serial.enqueue(b'x');
        for _ in 0..crate::io::SERIAL_BYTE_DELAY {
            st.serial.tick();
        }
        assert!(st.serial.ready());
        st.regs.fr = K; // T clear: serial byte waiting

        eng.step(&mut st);
        assert_eq!(st.regs.a, b'x');
        assert!(!st.serial.ready());
        assert_eq!(st.serial.hold(), 0xFF);
    }

    #[test]
    fn serial_read_ignored_when_fr_shows_empty() {
        let eng = engine(word(&[Signal::Mz, Signal::Ai]));
        let mut st = state();
        st.bus = 0x11;
        st.regs.fr = T | K;
        eng.step(&mut st);
        // Floating bus: A picks up the previous value.
        assert_eq!(st.regs.a, 0x11);
    }

    #[test]
    fn zero_page_accumulator_out_transmits() {
        let eng = engine(word(&[Signal::Mz, Signal::Ao]));
        let mut st = state();
        st.regs.a = b'!';
        eng.step(&mut st);
        assert!(st.serial_tx.busy());
        assert_eq!(st.serial_tx.take_output(), b"!");
    }

    #[test]
    fn bank_register_loads_from_bus() {
        let eng = engine(word(&[Signal::Bo, Signal::Ni, Signal::Ii]));
        let mut st = state();
        st.regs.b = 0x83;
        eng.step(&mut st);
        assert_eq!(st.regs.bank, 0x83);
        assert_eq!(st.regs.ir, 0x83);
    }
}
