//! Data bus arbitration.
//!
//! Every driver whose enable is asserted puts its value on the bus in the
//! order of [`PRIORITY`]; the last one wins. On the board this is whichever
//! tristate buffer sits closest to the sense point, and real microcode relies
//! on it (`RO` together with `AO`, for example, reads memory).
//!
//! Drivers are evaluated even when a later one overrides them. The receive
//! registers clear on read, so a shadowed serial read still consumes its byte.

use crate::alu::AluOutput;
use crate::control::{ControlWord, Signal};
use crate::flags;

/// Something that can drive the data bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Constant $FF.
    Ones,
    Accumulator,
    BRegister,
    /// Sum, AND or OR depending on the ALU select lines.
    Alu,
    Memory,
    /// Serial receive register.
    SerialIn,
    /// Keyboard receive register.
    KeyboardIn,
    PcLow,
    PcHigh,
}

/// Lowest priority first.
pub const PRIORITY: [Driver; 9] = [
    Driver::Ones,
    Driver::Accumulator,
    Driver::BRegister,
    Driver::Alu,
    Driver::Memory,
    Driver::SerialIn,
    Driver::KeyboardIn,
    Driver::PcLow,
    Driver::PcHigh,
];

impl Driver {
    /// Whether this driver's output enable is asserted.
    ///
    /// `fr` is the latched flags register: the receive registers only
    /// drive the bus when FR already shows a byte waiting.
    #[must_use]
    pub fn enabled(self, ctrl: ControlWord, fr: u8) -> bool {
        match self {
            Self::Ones => ctrl.has(Signal::Ff),
            Self::Accumulator => ctrl.has(Signal::Ao),
            Self::BRegister => ctrl.has(Signal::Bo),
            Self::Alu => ctrl.has(Signal::Eo) || ctrl.has(Signal::Es) || ctrl.has(Signal::Ec),
            Self::Memory => ctrl.has(Signal::Ro),
            Self::SerialIn => ctrl.has_all(&[Signal::Mz, Signal::Ai]) && flags::serial_ready(fr),
            Self::KeyboardIn => {
                ctrl.has_all(&[Signal::Mz, Signal::Bi]) && flags::keyboard_ready(fr)
            }
            Self::PcLow => ctrl.has(Signal::Col),
            Self::PcHigh => ctrl.has(Signal::Coh),
        }
    }
}

/// ALU output selected by EO, ES and EC: EO gives the sum, otherwise ES
/// gives AND and EC gives OR.
#[must_use]
pub fn alu_output(ctrl: ControlWord, alu: AluOutput) -> u8 {
    if ctrl.has(Signal::Eo) {
        alu.result()
    } else if ctrl.has(Signal::Es) {
        alu.and
    } else {
        alu.or
    }
}

/// Outcome of one cycle's arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub value: u8,
    /// Winning driver, or `None` if the bus floated.
    pub driver: Option<Driver>,
}

/// Resolve the bus for one cycle.
///
/// `value_of` is called once for every enabled driver, in priority order.
/// With no driver enabled the bus keeps `previous`.
pub fn resolve(
    ctrl: ControlWord,
    fr: u8,
    previous: u8,
    mut value_of: impl FnMut(Driver) -> u8,
) -> Resolution {
    PRIORITY
        .iter()
        .filter(|driver| driver.enabled(ctrl, fr))
        .fold(
            Resolution {
                value: previous,
                driver: None,
            },
            |_, &driver| Resolution {
                value: value_of(driver),
                driver: Some(driver),
            },
        )
}
