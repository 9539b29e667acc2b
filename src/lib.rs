//! regions - Geometric regions on pixel grids
//!
//! Shapes defined in pixel coordinates, with containment tests, masks
//! rasterized by pixel centre, subpixel sampling or exact overlap, boolean
//! composition, plotting descriptors and conversion to and from sky
//! coordinates through a world coordinate transform.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod render;
pub mod types;
pub mod validation;

pub use config::Settings;
pub use error::{RegionError, Result};
pub use parser::{parse_region_file, read_region_file, write_region_file};
pub use render::{as_artist, compose_mask, to_mask, write_mask_png, Artist, MaskMode, RegionMask};
pub use types::{
    Angle, BoundingBox, Circle, CircleAnnulus, Colour, Combinator, Compound, Containment, Ellipse,
    EllipseAnnulus, Line, LinearSkyTransform, PixCoord, PixelCoords, PixelRegion, Point, Polygon,
    Rectangle, RectangleAnnulus, RegionMeta, RegionVisual, RegularPolygon, Shape, SkyCoord,
    SkyRegion, SkyTransform,
};
pub use validation::{validate_regions, Diagnostic, Severity, ValidationResult};
