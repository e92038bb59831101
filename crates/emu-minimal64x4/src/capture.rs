//! Headless capture: PNG screenshots.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::{Minimal64x4, video};

/// Save the current display as a PNG file.
///
/// The framebuffer is ARGB32 (`u32` array). This converts to RGBA bytes
/// for the PNG encoder.
pub fn save_screenshot(machine: &Minimal64x4, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut fb = vec![0u32; (video::WIDTH * video::HEIGHT) as usize];
    machine.render_framebuffer(&mut fb);

    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), video::WIDTH, video::HEIGHT);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let rgba: Vec<u8> = fb
        .iter()
        .flat_map(|&pixel| {
            let [_, r, g, b] = pixel.to_be_bytes();
            [r, g, b, 0xFF]
        })
        .collect();

    writer.write_image_data(&rgba)?;
    log::info!("saved screenshot to {}", path.display());
    Ok(())
}
