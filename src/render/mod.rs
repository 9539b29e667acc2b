//! Rendering module for regions.
//!
//! This module turns shapes into coverage masks, combines masks for annuli
//! and compound regions, and exports masks and plot descriptors.

mod artist;
mod compose;
mod mask;
mod overlap;
mod png;
mod raster;

pub use artist::{as_artist, Artist, ArtistGeometry};
pub use compose::{combine_masks, compose_mask};
pub use mask::RegionMask;
pub use overlap::polygon_disk_overlap;
pub use png::{mask_pixels, scale_pixels, write_mask_png};
pub use raster::{to_mask, MaskMode};
