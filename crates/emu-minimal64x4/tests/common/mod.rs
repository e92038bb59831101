//! A tiny instruction set microcoded for tests.
//!
//! Step 0 of every instruction except `HLT` is the fetch `RO II CE ME`, which
//! relies on MAR tracking PC between instructions. Each instruction puts MAR
//! back on PC before its final `IC`. Jumps use B to hold the low byte of
//! the target, so a taken branch clobbers B.

#![allow(dead_code)]

use emu_minimal64x4::flags::{K, T, Z};
use emu_minimal64x4::{ControlRom, ControlWord, Minimal64x4, Minimal64x4Config, Signal};

use emu_minimal64x4::Signal::{
    Ai, Ao, Bi, Bo, Ce, Cih, Cil, Ec, Eo, Es, Fi, Ic, Ii, Mc, Me, Mih, Mil, Mz, Ni, Ri, Ro,
};

pub const NOP: u8 = 0x00;
/// `LDA #imm`
pub const LDA: u8 = 0x01;
/// `LDB #imm`
pub const LDB: u8 = 0x02;
/// A = A + B, latch flags.
pub const ADD: u8 = 0x03;
/// A = A - B, latch flags.
pub const SUB: u8 = 0x04;
/// `STA abs` (little-endian operand). Clobbers B.
pub const STA: u8 = 0x05;
/// Send A over the serial line.
pub const OUT: u8 = 0x06;
/// Serial receive register into A.
pub const IN: u8 = 0x07;
/// Latch the flag lines into FR.
pub const FLG: u8 = 0x08;
/// `JT abs`: jump while the serial register is empty.
pub const JT: u8 = 0x09;
/// `JZ abs`
pub const JZ: u8 = 0x0A;
/// `JMP abs`
pub const JMP: u8 = 0x0B;
/// Keyboard receive register into B.
pub const INK: u8 = 0x0C;
/// A = B
pub const TBA: u8 = 0x0D;
/// `JK abs`: jump while the keyboard register is empty.
pub const JK: u8 = 0x0E;
/// `BNK #imm`: load the bank register.
pub const BNK: u8 = 0x0F;
/// `STZ zp`: store A in the zero page of the current bank.
pub const STZ: u8 = 0x10;
/// Stop fetching. The step counter keeps cycling.
pub const HLT: u8 = 0xFF;

const FETCH: &[Signal] = &[Ro, Ii, Ce, Me];

const JUMP: &[&[Signal]] = &[&[Ro, Bi, Ce, Me], &[Ro, Cih], &[Bo, Cil], &[Mil, Mih, Mc, Ic]];
const SKIP: &[&[Signal]] = &[&[Ce, Me], &[Ce, Me, Ic]];

fn branch(taken: bool) -> &'static [&'static [Signal]] {
    if taken { JUMP } else { SKIP }
}

/// Control word for one processor state of the test instruction set.
pub fn microcode(flags: u8, instruction: u8, step: u8) -> ControlWord {
    if instruction == HLT {
        return ControlWord::NONE;
    }
    if step == 0 {
        return ControlWord::from_signals(FETCH);
    }
    let steps: &[&[Signal]] = match instruction {
        NOP => &[&[Ic]],
        LDA => &[&[Ro, Ai, Ce, Me, Ic]],
        LDB => &[&[Ro, Bi, Ce, Me, Ic]],
        ADD => &[&[Eo, Ai, Fi, Ic]],
        SUB => &[&[Eo, Es, Ec, Ai, Fi, Ic]],
        STA => &[
            &[Ro, Bi, Ce, Me],
            &[Ro, Mih, Ce],
            &[Bo, Mil],
            &[Ao, Ri],
            &[Mil, Mih, Mc, Ic],
        ],
        OUT => &[&[Mz, Ao, Ic]],
        IN => &[&[Mz, Ai, Ic]],
        FLG => &[&[Fi, Ic]],
        JT => branch(flags & T != 0),
        JZ => branch(flags & Z != 0),
        JMP => JUMP,
        INK => &[&[Mz, Bi, Ic]],
        TBA => &[&[Bo, Ai, Ic]],
        JK => branch(flags & K != 0),
        BNK => &[&[Ro, Ni, Ce, Me, Ic]],
        STZ => &[&[Ro, Mil, Mih, Mz, Ce], &[Ao, Ri], &[Mil, Mih, Mc, Ic]],
        _ => &[],
    };
    steps
        .get(usize::from(step) - 1)
        .map_or(ControlWord::NONE, |signals| ControlWord::from_signals(signals))
}

pub fn control_rom() -> ControlRom {
    ControlRom::from_fn(microcode)
}

/// A machine booting `program` from flash page 0.
pub fn boot_from_flash(program: &[u8]) -> Minimal64x4 {
    let mut flash = vec![0xFF; 0x1_0000];
    flash[..program.len()].copy_from_slice(program);
    Minimal64x4::new(Minimal64x4Config {
        control_rom: control_rom(),
        flash_image: flash,
    })
    .expect("valid config")
}

/// A machine running `program` from RAM at `$8000`, with the given flash.
pub fn run_from_ram(program: &[u8], flash_image: Vec<u8>) -> Minimal64x4 {
    let mut m = Minimal64x4::new(Minimal64x4Config {
        control_rom: control_rom(),
        flash_image,
    })
    .expect("valid config");
    m.ram_mut()[0x8000..0x8000 + program.len()].copy_from_slice(program);
    let regs = m.registers_mut();
    regs.pc = 0x8000;
    regs.mar = 0x8000;
    m
}

/// Step until the machine reaches `HLT`, up to `limit` cycles.
pub fn run_until_halt(m: &mut Minimal64x4, limit: u64) {
    for _ in 0..limit {
        if m.registers().ir == HLT {
            return;
        }
        m.step();
    }
    panic!("no HLT within {limit} cycles (pc=${:04X})", m.registers().pc);
}
