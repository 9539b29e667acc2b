//! Validate command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::{RegionError, Result};
use crate::output::{display_path, plural, Printer};
use crate::validation::validate_regions_with;

/// Validate region files without rendering
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Region files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, settings: &Settings, printer: &Printer) -> Result<()> {
    let mut failed = 0;

    for (file, regions) in super::load_all(&args.files)? {
        printer.status(
            "Validating",
            &format!("{} ({})", display_path(&file), plural(regions.len(), "region", "regions")),
        );

        let result = validate_regions_with(&regions, settings.max_mask_pixels);
        if !result.is_ok() {
            printer.diagnostics(&result);
        }
        if result.has_errors() || (args.strict && result.has_warnings()) {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(RegionError::Validation {
            message: format!("{} failed validation", plural(failed, "file", "files")),
            help: None,
        });
    }

    printer.status("Finished", &plural(args.files.len(), "file", "files"));
    Ok(())
}
