//! PNG output for region masks.
//!
//! Coverage becomes the alpha channel of the region colour. Images are
//! written with y increasing upwards, so the last mask row is the top row
//! of the PNG.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{RegionError, Result};
use crate::types::Colour;

use super::RegionMask;

/// Tint a mask: one colour per pixel, row-major with the top row first.
pub fn mask_pixels(mask: &RegionMask, colour: Colour) -> Vec<Vec<Colour>> {
    mask.data()
        .rows()
        .into_iter()
        .rev()
        .map(|row| row.iter().map(|&v| colour.with_coverage(v)).collect())
        .collect()
}

/// Write a mask to a PNG file.
///
/// # Arguments
///
/// * `mask` - The mask to write
/// * `colour` - Colour of fully covered pixels
/// * `path` - Output file path
/// * `scale` - Integer scale factor (1 = no scaling)
pub fn write_mask_png(mask: &RegionMask, colour: Colour, path: &Path, scale: u32) -> Result<()> {
    let pixels = scale_pixels(&mask_pixels(mask, colour), scale.max(1));

    let height = pixels.len() as u32;
    let width = pixels.first().map_or(0, |r| r.len()) as u32;

    let mut img: RgbaImage = ImageBuffer::new(width, height);
    for (y, row) in pixels.iter().enumerate() {
        for (x, colour) in row.iter().enumerate() {
            img.put_pixel(x as u32, y as u32, Rgba(colour.to_rgba()));
        }
    }

    img.save(path).map_err(|e| RegionError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}

/// Scale a pixel grid by an integer factor.
///
/// Uses nearest-neighbour scaling so pixel edges stay crisp.
pub fn scale_pixels(pixels: &[Vec<Colour>], scale: u32) -> Vec<Vec<Colour>> {
    if scale <= 1 {
        return pixels.to_vec();
    }

    let scale = scale as usize;
    pixels
        .iter()
        .flat_map(|row| {
            let scaled: Vec<Colour> = row
                .iter()
                .flat_map(|&colour| std::iter::repeat(colour).take(scale))
                .collect();
            std::iter::repeat(scaled).take(scale)
        })
        .collect()
}
