//! Contains command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::types::PixCoord;

/// Test whether a pixel position lies in each region
#[derive(Args, Debug)]
pub struct ContainsArgs {
    /// Region file
    pub file: PathBuf,

    /// Pixel x coordinate
    #[arg(allow_hyphen_values = true)]
    pub x: f64,

    /// Pixel y coordinate
    #[arg(allow_hyphen_values = true)]
    pub y: f64,
}

pub fn run(args: ContainsArgs, printer: &Printer) -> Result<()> {
    let point = PixCoord::new(args.x, args.y);
    let regions = crate::parser::read_region_file(&args.file)?;
    let file = display_path(&args.file);

    let mut hits = 0;
    for (index, region) in regions.iter().enumerate() {
        let inside = region.includes(point)?;
        if inside {
            hits += 1;
        }
        println!("{}:{} {} {}", file, index + 1, printer.cyan(region.name()), inside);
    }

    printer.info("Contained", &format!("{point} in {hits} of {}", regions.len()));
    Ok(())
}
