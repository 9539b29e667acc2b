pub mod completions;
pub mod contains;
pub mod info;
pub mod mask;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::error::Result;
use crate::parser::read_region_file;
use crate::types::PixelRegion;

/// regions - Pixel regions, masks and containment
#[derive(Parser, Debug)]
#[command(name = "regions")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: ./regions.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rasterize regions to PNG masks
    Mask(mask::MaskArgs),

    /// Print area and bounding box of each region
    Info(info::InfoArgs),

    /// Test whether a pixel position lies in each region
    Contains(contains::ContainsArgs),

    /// Validate region files without rendering
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

impl Cli {
    pub fn settings(&self) -> Result<Settings> {
        Settings::discover(self.config.as_deref())
    }
}

/// Read every file, tagging each region with the file it came from.
pub(crate) fn load_all(files: &[PathBuf]) -> Result<Vec<(PathBuf, Vec<PixelRegion>)>> {
    files
        .iter()
        .map(|file| Ok((file.clone(), read_region_file(file)?)))
        .collect()
}
