//! Minimal 64x4 memory subsystem.
//!
//! Layout seen by the CPU:
//! - $0000-$0FFF (bank < $80): 4 KiB window into the flash chip, page = bank
//! - $1000-$7FFF (bank < $80): same window, mirrored (only A0-A11 reach flash)
//! - $8000-$FFFF: RAM
//! - anything with bank bit 7 set: RAM at the raw address
//!
//! Flash reads go straight to the array; only writes pass through the
//! chip's command decoder.

#![allow(clippy::cast_possible_truncation)] // Intentional: u16 addresses index into arrays.

use sst_39sf040::Sst39sf040;

use crate::error::LoadError;

pub const RAM_SIZE: usize = 0x1_0000;

/// Flash bytes visible through one bank.
pub const FLASH_PAGE_SIZE: u32 = 0x1000;

/// RAM plus the banked flash chip.
pub struct Memory {
    ram: Box<[u8]>,
    flash: Sst39sf040,
}

impl Memory {
    /// Zeroed RAM and a flash chip holding `flash_image`.
    ///
    /// Images shorter than the chip leave the remainder zero-filled.
    pub fn new(flash_image: &[u8]) -> Result<Self, LoadError> {
        if flash_image.len() > sst_39sf040::FLASH_SIZE {
            return Err(LoadError::FlashImageTooLarge {
                len: flash_image.len(),
                capacity: sst_39sf040::FLASH_SIZE,
            });
        }
        let mut flash = Sst39sf040::new();
        let loaded = flash.load(flash_image);
        log::debug!("flash: loaded {loaded} bytes");
        Ok(Self {
            ram: vec![0; RAM_SIZE].into_boxed_slice(),
            flash,
        })
    }

    /// True when `(bank, addr)` resolves to RAM.
    #[must_use]
    pub const fn is_ram(bank: u8, addr: u16) -> bool {
        addr & 0x8000 != 0 || bank & 0x80 != 0
    }

    /// Flash chip offset for a CPU access: `(bank << 12) | (addr & $FFF)`.
    #[must_use]
    pub const fn flash_offset(bank: u8, addr: u16) -> u32 {
        ((bank as u32) << 12) | (addr as u32 & (FLASH_PAGE_SIZE - 1))
    }

    #[must_use]
    pub fn read(&self, bank: u8, addr: u16) -> u8 {
        if Self::is_ram(bank, addr) {
            self.ram[addr as usize]
        } else {
            self.flash.read(Self::flash_offset(bank, addr))
        }
    }

    pub fn write(&mut self, bank: u8, addr: u16, value: u8) {
        if Self::is_ram(bank, addr) {
            self.ram[addr as usize] = value;
        } else {
            self.flash.write(Self::flash_offset(bank, addr), value);
        }
    }

    /// The full 64 KiB of RAM.
    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    #[must_use]
    pub fn flash(&self) -> &Sst39sf040 {
        &self.flash
    }
}
