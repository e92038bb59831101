//! Processor registers.

/// Register set of the Minimal 64x4 datapath.
///
/// - A, B: 8-bit accumulators (B is also the ALU's second operand)
/// - PC: 16-bit program counter
/// - MAR: 16-bit memory address register
/// - Bank: selects a 4 KiB flash window, or RAM when bit 7 is set
/// - FR: flags latched by FI; the ROM decodes from these, not the live lines
/// - SC: 4-bit microcode step counter
/// - IR: instruction register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub pc: u16,
    pub mar: u16,
    pub bank: u8,
    pub fr: u8,
    pub sc: u8,
    pub ir: u8,
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            pc: 0,
            mar: 0,
            bank: 0,
            fr: 0,
            sc: 0,
            ir: 0,
        }
    }

    /// Apply the reset line: SC, PC, MAR and Bank go to zero. A, B, FR and
    /// IR keep their contents.
    pub fn reset(&mut self) {
        self.sc = 0;
        self.pc = 0;
        self.mar = 0;
        self.bank = 0;
    }

    /// Advance the step counter, wrapping at 16.
    pub fn advance_step(&mut self) {
        self.sc = (self.sc + 1) & 0x0F;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_data_registers() {
        let mut regs = Registers {
            a: 1,
            b: 2,
            pc: 0x1234,
            mar: 0x8000,
            bank: 0x81,
            fr: 0x1F,
            sc: 7,
            ir: 0x42,
        };
        regs.reset();
        assert_eq!((regs.pc, regs.mar, regs.bank, regs.sc), (0, 0, 0, 0));
        assert_eq!((regs.a, regs.b, regs.fr, regs.ir), (1, 2, 0x1F, 0x42));
    }

    #[test]
    fn step_counter_wraps() {
        let mut regs = Registers::new();
        regs.sc = 15;
        regs.advance_step();
        assert_eq!(regs.sc, 0);
    }
}
