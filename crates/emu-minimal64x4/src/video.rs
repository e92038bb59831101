//! Monochrome bitmap display.
//!
//! The VGA board scans RAM $4000-$7FFF directly: 256 lines of 64 bytes, one
//! bit per pixel, least significant bit leftmost. Nothing else is needed to
//! draw a frame, so the host renders straight from RAM.

/// First byte of video RAM.
pub const VRAM_START: usize = 0x4000;
/// Bytes per scanline.
pub const BYTES_PER_ROW: usize = 64;

pub const WIDTH: u32 = (BYTES_PER_ROW * 8) as u32;
pub const HEIGHT: u32 = 256;

/// Bytes of video RAM.
pub const VRAM_SIZE: usize = BYTES_PER_ROW * HEIGHT as usize;

/// Lit pixel (ARGB32).
pub const FOREGROUND: u32 = 0xFFE8_E4E0;
/// Unlit pixel (ARGB32).
pub const BACKGROUND: u32 = 0xFF28_2420;

/// Convert video RAM into an ARGB32 framebuffer of `WIDTH * HEIGHT` pixels.
///
/// `ram` is the full 64 KiB. Pixels beyond the end of `out` are skipped.
pub fn render(ram: &[u8], out: &mut [u32]) {
    let vram = &ram[VRAM_START..VRAM_START + VRAM_SIZE];
    let pixels = vram
        .iter()
        .flat_map(|&byte| (0..8).map(move |bit| (byte >> bit) & 1 != 0));
    for (dst, lit) in out.iter_mut().zip(pixels) {
        *dst = if lit { FOREGROUND } else { BACKGROUND };
    }
}
