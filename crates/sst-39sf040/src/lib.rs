//! SST39SF040 NOR flash (512 KiB, 4 KiB sectors).
//!
//! Reads return the array contents directly. Writes never store data on
//! their own: they feed a command decoder that must see the exact JEDEC
//! unlock sequence before it programs a byte or erases a sector.
//!
//! # Command sequences
//!
//! | Cycle | Byte program   | Sector erase   |
//! |-------|----------------|----------------|
//! | 1     | $5555 ← $AA    | $5555 ← $AA    |
//! | 2     | $2AAA ← $55    | $2AAA ← $55    |
//! | 3     | $5555 ← $A0    | $5555 ← $80    |
//! | 4     | addr ← data    | $5555 ← $AA    |
//! | 5     |                | $2AAA ← $55    |
//! | 6     |                | sector ← $30   |
//!
//! Command addresses are compared on A14-A0 only. Any write that breaks a
//! sequence silently returns the decoder to idle, as the real part does.
//! Programming can only clear bits; only an erase sets them back to 1.

use std::fmt;

/// Total array size in bytes.
pub const FLASH_SIZE: usize = 0x8_0000;

/// Erase granularity in bytes.
pub const SECTOR_SIZE: usize = 0x1000;

const OFFSET_MASK: u32 = (FLASH_SIZE as u32) - 1;
const COMMAND_ADDR_MASK: u32 = 0x7FFF;

const UNLOCK_ADDR_1: u32 = 0x5555;
const UNLOCK_ADDR_2: u32 = 0x2AAA;
const UNLOCK_DATA_1: u8 = 0xAA;
const UNLOCK_DATA_2: u8 = 0x55;
const CMD_BYTE_PROGRAM: u8 = 0xA0;
const CMD_ERASE_SETUP: u8 = 0x80;
const CMD_SECTOR_ERASE: u8 = 0x30;

/// Position of the command decoder within a program or erase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Idle,
    /// First unlock cycle seen.
    Unlock1,
    /// Second unlock cycle seen; waiting for the command byte.
    Unlock2,
    /// Byte-program command accepted; the next write is programmed.
    WritePending,
    /// Erase setup accepted; waiting for the second unlock pair.
    EraseArmed,
    EraseUnlock1,
    /// Waiting for the erase command byte.
    EraseUnlock2,
}

/// What a write does to the array once the decoder has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// AND the data into the addressed byte.
    Program,
    /// Fill the sector containing the address with $FF.
    EraseSector,
}

impl CommandState {
    /// Decoder transition for a write of `data` at command address `addr`.
    ///
    /// Total over every `(state, addr, data)` triple: anything not listed in
    /// the sequence table lands in [`CommandState::Idle`] with no effect.
    #[must_use]
    pub fn next(self, addr: u32, data: u8) -> (Self, Effect) {
        let addr = addr & COMMAND_ADDR_MASK;
        match (self, addr, data) {
            (Self::Idle, UNLOCK_ADDR_1, UNLOCK_DATA_1) => (Self::Unlock1, Effect::None),
            (Self::Unlock1, UNLOCK_ADDR_2, UNLOCK_DATA_2) => (Self::Unlock2, Effect::None),
            (Self::Unlock2, UNLOCK_ADDR_1, CMD_BYTE_PROGRAM) => (Self::WritePending, Effect::None),
            (Self::Unlock2, UNLOCK_ADDR_1, CMD_ERASE_SETUP) => (Self::EraseArmed, Effect::None),
            (Self::WritePending, _, _) => (Self::Idle, Effect::Program),
            (Self::EraseArmed, UNLOCK_ADDR_1, UNLOCK_DATA_1) => (Self::EraseUnlock1, Effect::None),
            (Self::EraseUnlock1, UNLOCK_ADDR_2, UNLOCK_DATA_2) => {
                (Self::EraseUnlock2, Effect::None)
            }
            (Self::EraseUnlock2, _, CMD_SECTOR_ERASE) => (Self::Idle, Effect::EraseSector),
            _ => (Self::Idle, Effect::None),
        }
    }

    /// Short name for logs and state queries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Unlock1 => "Unlock1",
            Self::Unlock2 => "Unlock2",
            Self::WritePending => "WritePending",
            Self::EraseArmed => "EraseArmed",
            Self::EraseUnlock1 => "EraseUnlock1",
            Self::EraseUnlock2 => "EraseUnlock2",
        }
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SST39SF040 flash chip: the cell array plus its command decoder.
pub struct Sst39sf040 {
    cells: Box<[u8]>,
    state: CommandState,
}

impl Sst39sf040 {
    /// Create a chip with every cell zeroed and the decoder idle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![0u8; FLASH_SIZE].into_boxed_slice(),
            state: CommandState::Idle,
        }
    }

    /// Replace the array contents with `image`.
    ///
    /// Bytes past the end of the image are zeroed; bytes past the end of the
    /// chip are ignored. Returns the number of bytes copied.
    pub fn load(&mut self, image: &[u8]) -> usize {
        let len = image.len().min(FLASH_SIZE);
        self.cells[..len].copy_from_slice(&image[..len]);
        self.cells[len..].fill(0);
        self.state = CommandState::Idle;
        len
    }

    /// Read the byte at `offset` (wraps at the chip size).
    #[must_use]
    pub fn read(&self, offset: u32) -> u8 {
        self.cells[(offset & OFFSET_MASK) as usize]
    }

    /// Present a write cycle to the chip.
    pub fn write(&mut self, offset: u32, data: u8) {
        let offset = offset & OFFSET_MASK;
        let (next, effect) = self.state.next(offset, data);
        match effect {
            Effect::None => {
                if next == CommandState::Idle && self.state != CommandState::Idle {
                    log::debug!(
                        "flash: sequence aborted in {} by ${data:02X} at ${offset:05X}",
                        self.state
                    );
                }
            }
            Effect::Program => {
                let cell = &mut self.cells[offset as usize];
                *cell &= data;
                log::debug!("flash: programmed ${offset:05X} = ${:02X}", *cell);
            }
            Effect::EraseSector => {
                let start = offset as usize & !(SECTOR_SIZE - 1);
                self.cells[start..start + SECTOR_SIZE].fill(0xFF);
                log::debug!("flash: erased sector ${start:05X}");
            }
        }
        self.state = next;
    }

    /// Current command decoder state.
    #[must_use]
    pub fn state(&self) -> CommandState {
        self.state
    }

    /// The whole cell array.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Sst39sf040 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(chip: &mut Sst39sf040, offset: u32, data: u8) {
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAA, 0x55);
        chip.write(0x5555, 0xA0);
        chip.write(offset, data);
    }

    fn erase_sector(chip: &mut Sst39sf040, offset: u32) {
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAA, 0x55);
        chip.write(0x5555, 0x80);
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAA, 0x55);
        chip.write(offset, 0x30);
    }

    #[test]
    fn plain_write_is_ignored() {
        let mut chip = Sst39sf040::new();
        chip.write(0x0123, 0x42);
        assert_eq!(chip.read(0x0123), 0x00);
        assert_eq!(chip.state(), CommandState::Idle);
    }

    #[test]
    fn unlock_sequence_walks_states() {
        let mut chip = Sst39sf040::new();
        chip.write(0x5555, 0xAA);
        assert_eq!(chip.state(), CommandState::Unlock1);
        chip.write(0x2AAA, 0x55);
        assert_eq!(chip.state(), CommandState::Unlock2);
        chip.write(0x5555, 0x80);
        assert_eq!(chip.state(), CommandState::EraseArmed);
        chip.write(0x5555, 0xAA);
        assert_eq!(chip.state(), CommandState::EraseUnlock1);
        chip.write(0x2AAA, 0x55);
        assert_eq!(chip.state(), CommandState::EraseUnlock2);
    }

    #[test]
    fn sector_erase_fills_only_that_sector() {
        let mut chip = Sst39sf040::new();
        erase_sector(&mut chip, 0x5555);
        assert!(chip.data()[0x5000..0x6000].iter().all(|&b| b == 0xFF));
        assert_eq!(chip.read(0x4FFF), 0x00);
        assert_eq!(chip.read(0x6000), 0x00);
        assert_eq!(chip.state(), CommandState::Idle);
    }

    #[test]
    fn erase_targets_sector_of_final_write() {
        let mut chip = Sst39sf040::new();
        erase_sector(&mut chip, 0x7_3ABC);
        assert!(chip.data()[0x7_3000..0x7_4000].iter().all(|&b| b == 0xFF));
        assert_eq!(chip.read(0x7_2FFF), 0x00);
    }

    #[test]
    fn program_only_clears_bits() {
        let mut chip = Sst39sf040::new();
        erase_sector(&mut chip, 0x0000);
        program(&mut chip, 0x0040, 0x3C);
        assert_eq!(chip.read(0x0040), 0x3C);

        program(&mut chip, 0x0040, 0xFF);
        assert_eq!(chip.read(0x0040), 0x3C);

        program(&mut chip, 0x0040, 0x0F);
        assert_eq!(chip.read(0x0040), 0x0C);
    }

    #[test]
    fn wrong_data_at_unlock2_aborts_without_side_effects() {
        let mut chip = Sst39sf040::new();
        chip.load(&[0x11; 16]);
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAA, 0x55);
        chip.write(0x5555, 0x90);
        assert_eq!(chip.state(), CommandState::Idle);

        // The next write is a plain write again, not a program.
        chip.write(0x0003, 0x00);
        assert_eq!(chip.read(0x0003), 0x11);
    }

    #[test]
    fn wrong_address_at_unlock1_aborts() {
        let mut chip = Sst39sf040::new();
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAB, 0x55);
        assert_eq!(chip.state(), CommandState::Idle);
    }

    #[test]
    fn erase_with_wrong_command_aborts() {
        let mut chip = Sst39sf040::new();
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAA, 0x55);
        chip.write(0x5555, 0x80);
        chip.write(0x5555, 0xAA);
        chip.write(0x2AAA, 0x55);
        chip.write(0x5555, 0x10);
        assert_eq!(chip.state(), CommandState::Idle);
        assert!(chip.data().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn command_addresses_ignore_a15_and_up() {
        let mut chip = Sst39sf040::new();
        chip.write(0x1_5555, 0xAA);
        chip.write(0x4_2AAA, 0x55);
        chip.write(0x7_D555, 0xA0);
        assert_eq!(chip.state(), CommandState::WritePending);
    }

    #[test]
    fn transition_table_is_total() {
        let states = [
            CommandState::Idle,
            CommandState::Unlock1,
            CommandState::Unlock2,
            CommandState::WritePending,
            CommandState::EraseArmed,
            CommandState::EraseUnlock1,
            CommandState::EraseUnlock2,
        ];
        for state in states {
            for data in 0..=255u8 {
                for addr in [0x0000, 0x2AAA, 0x5555, 0x7FFF] {
                    let (next, effect) = state.next(addr, data);
                    if effect != Effect::None {
                        assert_eq!(next, CommandState::Idle);
                    }
                }
            }
        }
    }

    #[test]
    fn load_zero_fills_tail_and_resets_decoder() {
        let mut chip = Sst39sf040::new();
        erase_sector(&mut chip, 0x0000);
        chip.write(0x5555, 0xAA);
        let copied = chip.load(&[1, 2, 3]);
        assert_eq!(copied, 3);
        assert_eq!(chip.read(0), 1);
        assert_eq!(chip.read(3), 0);
        assert_eq!(chip.read(0x0FFF), 0);
        assert_eq!(chip.state(), CommandState::Idle);
    }

    #[test]
    fn offsets_wrap_at_chip_size() {
        let mut chip = Sst39sf040::new();
        chip.load(&[0x77]);
        assert_eq!(chip.read(FLASH_SIZE as u32), 0x77);
    }
}
