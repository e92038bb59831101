//! 8-bit adder with optional B inversion and carry in.
//!
//! There is no subtract circuit: A - B is A + !B + 1, so subtraction is ES
//! (invert) together with EC (carry in). The AND and OR outputs are gated
//! onto the bus by the same two signals when the sum is not selected.

use crate::flags::{C, N, Z};

/// All outputs of the ALU for one pair of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    /// 9-bit sum; bit 8 is the carry out.
    pub sum: u16,
    pub and: u8,
    pub or: u8,
}

impl AluOutput {
    /// Result byte as it appears on the bus.
    #[must_use]
    pub const fn result(self) -> u8 {
        self.sum as u8
    }

    #[must_use]
    pub const fn carry(self) -> bool {
        self.sum > 0xFF
    }

    #[must_use]
    pub const fn zero(self) -> bool {
        self.sum & 0xFF == 0
    }

    #[must_use]
    pub const fn negative(self) -> bool {
        self.sum & 0x80 != 0
    }

    /// Z, C and N packed in flag-register layout.
    #[must_use]
    pub const fn flags(self) -> u8 {
        let mut bits = 0;
        if self.zero() {
            bits |= Z;
        }
        if self.carry() {
            bits |= C;
        }
        if self.negative() {
            bits |= N;
        }
        bits
    }
}

/// Evaluate the ALU. Pure: the same inputs always give the same outputs.
///
/// AND and OR always see the uninverted B operand.
#[must_use]
pub const fn compute(a: u8, b: u8, invert_b: bool, carry_in: bool) -> AluOutput {
    let c = if invert_b { !b } else { b };
    let sum = a as u16 + c as u16 + carry_in as u16;
    AluOutput {
        sum,
        and: a & b,
        or: a | b,
    }
}
