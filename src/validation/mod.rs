//! Validation system for regions.
//!
//! Runs a suite of checks against loaded regions and reports errors
//! and warnings. Used by `regions validate` and before `regions mask`; the CLI prints
//! results through `output::Printer`.

mod checks;
mod warning;

pub use warning::{Diagnostic, RegionRef, Severity, ValidationResult};

use crate::config::Settings;
use crate::types::PixelRegion;

/// Run all validation checks with the default mask budget.
pub fn validate_regions(regions: &[PixelRegion]) -> ValidationResult {
    validate_regions_with(regions, Settings::default().max_mask_pixels)
}

/// Run all validation checks.
pub fn validate_regions_with(regions: &[PixelRegion], max_mask_pixels: u64) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_dimensions(regions));
    result.merge(checks::check_polygons(regions));
    result.merge(checks::check_annuli(regions));
    result.merge(checks::check_colours(regions));
    result.merge(checks::check_mask_sizes(regions, max_mask_pixels));

    result
}
