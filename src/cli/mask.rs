//! Mask command implementation.
//!
//! Reads region files, validates them and writes one PNG mask per region.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Settings;
use crate::error::{RegionError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{write_mask_png, MaskMode};
use crate::types::{Colour, MetaValue, PixelRegion, Shape};
use crate::validation::validate_regions_with;

/// Rasterize regions to PNG masks
#[derive(Args, Debug)]
pub struct MaskArgs {
    /// Region files to render
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Mask mode: center, subpixels or exact
    #[arg(long)]
    pub mode: Option<String>,

    /// Subpixel factor for the subpixels mode
    #[arg(long)]
    pub subpixels: Option<i64>,

    /// Output directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Scale factor for output (integer upscaling)
    #[arg(long)]
    pub scale: Option<u32>,
}

impl MaskArgs {
    fn mode(&self, settings: &Settings) -> Result<MaskMode> {
        let mode = self.mode.as_deref().unwrap_or(&settings.mode);
        MaskMode::parse(mode, self.subpixels.unwrap_or(settings.subpixels))
    }
}

pub fn run(args: MaskArgs, settings: &Settings, printer: &Printer) -> Result<()> {
    let mode = args.mode(settings)?;
    let output = args.output.clone().unwrap_or_else(|| settings.output.clone());
    let scale = args.scale.unwrap_or(settings.scale);

    let loaded = super::load_all(&args.files)?;

    for (file, regions) in &loaded {
        let result = validate_regions_with(regions, settings.max_mask_pixels);
        for d in result.iter() {
            log::warn!("{}: {}", display_path(file), d);
        }
        if result.has_errors() {
            printer.diagnostics(&result);
            return Err(RegionError::Validation {
                message: format!("{} has invalid regions", display_path(file)),
                help: Some("Run `regions validate` for details".to_string()),
            });
        }
    }

    if !output.exists() {
        fs::create_dir_all(&output).map_err(|e| RegionError::Io {
            path: output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut written = 0;
    for (file, regions) in &loaded {
        let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("regions");

        for (index, region) in regions.iter().enumerate() {
            if matches!(region.shape, Shape::Point(_) | Shape::Line(_)) {
                printer.warning("Skipping", &format!("{} {} has no area", region.name(), index + 1));
                continue;
            }

            let path = output.join(mask_file_name(stem, index, region));
            render_one(region, mode, &path, scale, printer)?;
            written += 1;
        }
    }

    printer.status(
        "Finished",
        &format!("{} ({}) in {}", plural(written, "mask", "masks"), mode, display_path(&output)),
    );
    Ok(())
}

fn render_one(region: &PixelRegion, mode: MaskMode, path: &Path, scale: u32, printer: &Printer) -> Result<()> {
    let mask = region.to_mask(mode)?;
    let (rows, cols) = mask.shape();
    printer.status("Rendering", &format!("{} ({}x{})", region.name(), cols, rows));
    write_mask_png(&mask, region_colour(region), path, scale)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// The region's `color` if it parses, green otherwise.
fn region_colour(region: &PixelRegion) -> Colour {
    region
        .visual
        .get("color")
        .and_then(MetaValue::as_str)
        .and_then(|s| Colour::parse(s).ok())
        .unwrap_or(Colour::DS9_GREEN)
}

/// `<file stem>-<label or 1-based index>.png`
fn mask_file_name(stem: &str, index: usize, region: &PixelRegion) -> String {
    let id = region
        .meta
        .get("label")
        .and_then(MetaValue::as_str)
        .map(|label| {
            label
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| (index + 1).to_string());
    format!("{stem}-{id}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Circle, PixCoord, RegionMeta, RegionVisual};

    fn circle() -> PixelRegion {
        PixelRegion::new(Circle::new(PixCoord::new(3.0, 3.0), 2.0).unwrap())
    }

    #[test]
    fn test_mask_file_name() {
        assert_eq!(mask_file_name("sources", 0, &circle()), "sources-1.png");

        let labelled = circle().with_meta(RegionMeta::new().with("label", "M 31/core").unwrap());
        assert_eq!(mask_file_name("sources", 4, &labelled), "sources-M_31_core.png");
    }

    #[test]
    fn test_region_colour() {
        assert_eq!(region_colour(&circle()), Colour::DS9_GREEN);

        let red = circle().with_visual(RegionVisual::new().with("color", "red").unwrap());
        assert_eq!(region_colour(&red), Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_mode_falls_back_to_settings() {
        let args = MaskArgs {
            files: Vec::new(),
            mode: None,
            subpixels: Some(3),
            output: None,
            scale: None,
        };
        let settings = Settings {
            mode: "subpixels".to_string(),
            ..Settings::default()
        };
        assert_eq!(args.mode(&settings).unwrap(), MaskMode::Subpixels(3));
    }
}
