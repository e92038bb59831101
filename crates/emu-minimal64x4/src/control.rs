//! Microcode control ROM.
//!
//! The sequencer is three 8-bit ROMs addressed by the processor state:
//!
//! ```text
//!  16      12 11             4 3      0
//! +----------+----------------+--------+
//! |  flags   |  instruction   |  step  |
//! +----------+----------------+--------+
//! ```
//!
//! The low, mid and high ROMs supply bits 0-7, 8-15 and 16-23 of the control
//! word. Most signals on the real board are active low. The inversion is
//! undone once, when the planes are loaded, so every [`ControlWord`] in a
//! [`ControlRom`] is active high.

use std::fmt;

use crate::error::{LoadError, Plane};

/// Number of control words: 5 flag bits + 8 instruction bits + 4 step bits.
pub const CONTROL_ROM_WORDS: usize = 1 << (5 + 8 + 4);

/// Bits set here are active low in the ROM images.
pub const ACTIVE_LOW_MASK: u32 = 0x3F_7FF9;

const WORD_MASK: u32 = 0xFF_FFFF;

/// One control signal, numbered by its bit in the control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Signal {
    /// ALU sum out.
    Eo = 0,
    /// ALU subtract (invert B). Selects AND out when `Eo` is clear.
    Es = 1,
    /// ALU carry in. Selects OR out when `Eo` and `Es` are clear.
    Ec = 2,
    /// B in.
    Bi = 3,
    /// B out.
    Bo = 4,
    /// A in.
    Ai = 5,
    /// A out.
    Ao = 6,
    /// Bank register in.
    Ni = 7,
    /// Flags register in.
    Fi = 8,
    /// Instruction register in.
    Ii = 9,
    /// Step counter clear.
    Ic = 10,
    /// Program counter low byte in.
    Cil = 11,
    /// Program counter high byte in.
    Cih = 12,
    /// Program counter low byte out.
    Col = 13,
    /// Program counter high byte out.
    Coh = 14,
    /// Program counter increment.
    Ce = 15,
    /// Drive $FF onto the bus.
    Ff = 16,
    /// Memory in (write).
    Ri = 17,
    /// Memory out (read).
    Ro = 18,
    /// Memory address low byte in.
    Mil = 19,
    /// Memory address high byte in.
    Mih = 20,
    /// Zero page. Also qualifies the receive/transmit strobes.
    Mz = 21,
    /// Transfer program counter into the memory address register.
    Mc = 22,
    /// Memory address increment.
    Me = 23,
}

impl Signal {
    pub const ALL: [Signal; 24] = [
        Signal::Eo,
        Signal::Es,
        Signal::Ec,
        Signal::Bi,
        Signal::Bo,
        Signal::Ai,
        Signal::Ao,
        Signal::Ni,
        Signal::Fi,
        Signal::Ii,
        Signal::Ic,
        Signal::Cil,
        Signal::Cih,
        Signal::Col,
        Signal::Coh,
        Signal::Ce,
        Signal::Ff,
        Signal::Ri,
        Signal::Ro,
        Signal::Mil,
        Signal::Mih,
        Signal::Mz,
        Signal::Mc,
        Signal::Me,
    ];

    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self as u32
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Eo => "EO",
            Self::Es => "ES",
            Self::Ec => "EC",
            Self::Bi => "BI",
            Self::Bo => "BO",
            Self::Ai => "AI",
            Self::Ao => "AO",
            Self::Ni => "NI",
            Self::Fi => "FI",
            Self::Ii => "II",
            Self::Ic => "IC",
            Self::Cil => "CIL",
            Self::Cih => "CIH",
            Self::Col => "COL",
            Self::Coh => "COH",
            Self::Ce => "CE",
            Self::Ff => "FF",
            Self::Ri => "RI",
            Self::Ro => "RO",
            Self::Mil => "MIL",
            Self::Mih => "MIH",
            Self::Mz => "MZ",
            Self::Mc => "MC",
            Self::Me => "ME",
        }
    }
}

/// A decoded, active-high 24-bit control word.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ControlWord(u32);

impl ControlWord {
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & WORD_MASK)
    }

    #[must_use]
    pub fn from_signals(signals: &[Signal]) -> Self {
        Self(signals.iter().fold(0, |acc, s| acc | s.mask()))
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn has(self, signal: Signal) -> bool {
        self.0 & signal.mask() != 0
    }

    /// True when every one of `signals` is asserted.
    #[must_use]
    pub fn has_all(self, signals: &[Signal]) -> bool {
        signals.iter().all(|&s| self.has(s))
    }
}

impl fmt::Debug for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlWord(${:06X}", self.0)?;
        for signal in Signal::ALL {
            if self.has(signal) {
                write!(f, " {}", signal.mnemonic())?;
            }
        }
        f.write_str(")")
    }
}

/// Fully decoded control ROM, one active-high word per processor state.
pub struct ControlRom {
    words: Box<[ControlWord]>,
}

impl ControlRom {
    /// ROM index for a processor state. Each field is masked to its width,
    /// so every input maps to a valid entry.
    #[must_use]
    pub const fn address(flags: u8, instruction: u8, step: u8) -> usize {
        (((flags & 0x1F) as usize) << 12) | ((instruction as usize) << 4) | (step & 0x0F) as usize
    }

    /// Combine the three byte planes into an active-high table.
    ///
    /// Each plane must hold at least [`CONTROL_ROM_WORDS`] bytes. Longer
    /// images (a full 19-bit EEPROM dump) use only the first
    /// [`CONTROL_ROM_WORDS`] bytes, since the upper address lines are tied low.
    pub fn from_planes(lsb: &[u8], msb: &[u8], hsb: &[u8]) -> Result<Self, LoadError> {
        for (plane, bytes) in [(Plane::Low, lsb), (Plane::Mid, msb), (Plane::High, hsb)] {
            if bytes.len() < CONTROL_ROM_WORDS {
                return Err(LoadError::ControlPlaneTooShort {
                    plane,
                    len: bytes.len(),
                    needed: CONTROL_ROM_WORDS,
                });
            }
        }

        let words = (0..CONTROL_ROM_WORDS)
            .map(|i| {
                let raw = u32::from(lsb[i]) | (u32::from(msb[i]) << 8) | (u32::from(hsb[i]) << 16);
                ControlWord::from_bits(raw ^ ACTIVE_LOW_MASK)
            })
            .collect();

        Ok(Self { words })
    }

    /// Build a table from a function of the processor state.
    ///
    /// `microcode` returns active-high words; no inversion is applied.
    pub fn from_fn(mut microcode: impl FnMut(u8, u8, u8) -> ControlWord) -> Self {
        let words = (0..CONTROL_ROM_WORDS)
            .map(|i| {
                let flags = (i >> 12) as u8;
                let instruction = (i >> 4) as u8;
                let step = (i & 0x0F) as u8;
                microcode(flags, instruction, step)
            })
            .collect();
        Self { words }
    }

    /// Encode back into the three active-low byte planes the EEPROMs hold.
    #[must_use]
    pub fn to_planes(&self) -> [Vec<u8>; 3] {
        let mut planes = [
            Vec::with_capacity(CONTROL_ROM_WORDS),
            Vec::with_capacity(CONTROL_ROM_WORDS),
            Vec::with_capacity(CONTROL_ROM_WORDS),
        ];
        for word in &*self.words {
            let raw = word.bits() ^ ACTIVE_LOW_MASK;
            planes[0].push(raw as u8);
            planes[1].push((raw >> 8) as u8);
            planes[2].push((raw >> 16) as u8);
        }
        planes
    }

    /// Control word for the given processor state.
    #[must_use]
    pub fn decode(&self, flags: u8, instruction: u8, step: u8) -> ControlWord {
        self.words[Self::address(flags, instruction, step)]
    }
}

impl fmt::Debug for ControlRom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlRom")
            .field("words", &self.words.len())
            .finish()
    }
}
