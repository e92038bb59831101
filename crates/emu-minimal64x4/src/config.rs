//! Machine configuration and image loading.

use std::fs;
use std::path::Path;

use crate::control::ControlRom;
use crate::error::LoadError;

/// File names of the three control ROM planes inside a ROM directory.
pub const CONTROL_PLANE_FILES: [&str; 3] = ["ctrl_lsb.bin", "ctrl_msb.bin", "ctrl_hsb.bin"];

/// Default flash dump name.
pub const FLASH_FILE: &str = "flash.bin";

/// Everything needed to build a [`crate::Minimal64x4`].
#[derive(Debug)]
pub struct Minimal64x4Config {
    pub control_rom: ControlRom,
    /// Raw flash contents, at most 512 KiB. Shorter images are zero-filled.
    pub flash_image: Vec<u8>,
}

impl Minimal64x4Config {
    /// Load `ctrl_*.bin` from `rom_dir` and the flash dump from `flash`.
    pub fn load(rom_dir: &Path, flash: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            control_rom: load_control_rom(rom_dir)?,
            flash_image: load_flash(flash)?,
        })
    }
}

/// Read the three control ROM planes from `dir`.
pub fn load_control_rom(dir: &Path) -> Result<ControlRom, LoadError> {
    let [lsb, msb, hsb] = CONTROL_PLANE_FILES;
    let lsb = read_file(&dir.join(lsb))?;
    let msb = read_file(&dir.join(msb))?;
    let hsb = read_file(&dir.join(hsb))?;
    ControlRom::from_planes(&lsb, &msb, &hsb)
}

/// Read a flash dump. Size is checked when the machine is built.
pub fn load_flash(path: &Path) -> Result<Vec<u8>, LoadError> {
    read_file(path)
}

/// Read a whole file, tagging failures with the path.
pub fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
