//! Core domain types for regions.
//!
//! This module contains the value types used throughout the crate:
//! - `Shape` and its primitives - geometry with closed-form answers
//! - `PixelRegion` / `SkyRegion` - a shape plus metadata, in pixel or sky coordinates
//! - `BoundingBox` - integer pixel extents
//! - `Meta` - validated metadata maps
//! - `Colour` - RGBA colour values

mod angle;
mod bbox;
mod colour;
mod metadata;
mod pixcoord;
mod region;
mod shape;
mod sky;

pub use angle::Angle;
pub use bbox::{BoundingBox, OverlapSlices};
pub use colour::Colour;
pub use metadata::{
    ArtistKind, Meta, MetaSchema, MetaValue, PlotStyle, RegionKeys, RegionMeta, RegionVisual,
    VisualKeys,
};
pub use pixcoord::{Containment, PixCoord, PixelCoords};
pub use region::PixelRegion;
pub(crate) use bbox::MAX_PIXEL;
pub(crate) use shape::signed_area;
pub use shape::{
    AnnulusExtent, Circle, CircleAnnulus, Combinator, Compound, Ellipse, EllipseAnnulus, Line,
    Point, Polygon, Rectangle, RectangleAnnulus, RegularPolygon, Shape,
};
pub use sky::{LinearSkyTransform, SkyCoord, SkyRegion, SkyShape, SkyTransform};
