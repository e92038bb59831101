//! Flag bits, as wired into FR and the control ROM address.
//!
//! Z, C and N come from the adder. T and K are the receive "empty" lines of
//! the serial and keyboard registers: they read 1 while the register has
//! nothing for the CPU and drop to 0 when a byte is waiting.

/// ALU result is zero.
pub const Z: u8 = 0b0_0001;
/// Carry out of the adder.
pub const C: u8 = 0b0_0010;
/// Bit 7 of the ALU result.
pub const N: u8 = 0b0_0100;
/// Serial receive register empty.
pub const T: u8 = 0b0_1000;
/// Keyboard receive register empty.
pub const K: u8 = 0b1_0000;

/// Live (unlatched) flag lines for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagLines {
    pub zero: bool,
    pub carry: bool,
    pub negative: bool,
    /// A serial byte is waiting in the receive register.
    pub serial_ready: bool,
    /// A keyboard byte is waiting in the receive register.
    pub keyboard_ready: bool,
}

impl FlagLines {
    /// Pack into the 5-bit layout latched by FI.
    #[must_use]
    pub const fn bits(self) -> u8 {
        let mut bits = 0;
        if self.zero {
            bits |= Z;
        }
        if self.carry {
            bits |= C;
        }
        if self.negative {
            bits |= N;
        }
        if !self.serial_ready {
            bits |= T;
        }
        if !self.keyboard_ready {
            bits |= K;
        }
        bits
    }
}

/// True when a latched flags value says a serial byte is waiting.
#[must_use]
pub const fn serial_ready(fr: u8) -> bool {
    fr & T == 0
}

/// True when a latched flags value says a keyboard byte is waiting.
#[must_use]
pub const fn keyboard_ready(fr: u8) -> bool {
    fr & K == 0
}
