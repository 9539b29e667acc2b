//! Rasterizer - converts shapes to coverage masks.
//!
//! Every mask is computed over the shape's bounding box. `Center` samples
//! each pixel centre, `Subpixels(n)` samples an n x n grid of sub-cell
//! centres, and `Exact` computes the true area of overlap for the shapes
//! that have a closed form.

use std::borrow::Cow;
use std::fmt;

use ndarray::Array2;

use crate::error::{RegionError, Result};
use crate::types::Shape;

use super::compose::compose_mask;
use super::overlap::{circle_pixel, ellipse_pixel, rectangle_pixel};
use super::RegionMask;

/// How pixel coverage is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    /// A pixel is in when its centre is.
    #[default]
    Center,
    /// Fraction of `n * n` sub-cell centres that are in.
    Subpixels(usize),
    /// True fractional overlap.
    Exact,
}

impl MaskMode {
    pub const DEFAULT_SUBPIXELS: i64 = 5;

    /// Parse a mode name; `subpixels` only matters for `"subpixels"`.
    pub fn parse(mode: &str, subpixels: i64) -> Result<Self> {
        if subpixels <= 0 {
            return Err(RegionError::InvalidArgument {
                message: format!("subpixels must be a strictly positive integer, got {subpixels}"),
                help: None,
            });
        }
        match mode {
            "center" => Ok(MaskMode::Center),
            "subpixels" => Ok(MaskMode::Subpixels(subpixels as usize)),
            "exact" => Ok(MaskMode::Exact),
            other => Err(RegionError::InvalidArgument {
                message: format!("invalid mask mode: {other}"),
                help: Some("use one of center, subpixels, exact".to_string()),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MaskMode::Center => "center",
            MaskMode::Subpixels(_) => "subpixels",
            MaskMode::Exact => "exact",
        }
    }
}

impl fmt::Display for MaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskMode::Subpixels(n) => write!(f, "subpixels({n})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Rasterize a shape over its bounding box.
pub fn to_mask(shape: &Shape, mode: MaskMode) -> Result<RegionMask> {
    if let Some((region1, region2, op)) = shape.components() {
        return compose_mask(&region1, &region2, op, mode);
    }

    match (shape, mode) {
        (Shape::Point(_) | Shape::Line(_), _) => Err(RegionError::unimplemented(
            format!("a {} region covers no pixels and has no mask", shape.name()),
            None,
        )),
        (_, MaskMode::Center) => sample(shape, 1),
        (_, MaskMode::Subpixels(n)) => sample(shape, n),
        (_, MaskMode::Exact) => exact(shape),
    }
}

fn sample(shape: &Shape, subpixels: usize) -> Result<RegionMask> {
    let bbox = shape.bounding_box();
    log::debug!("sampling {} over {} at {}x{}", shape.name(), bbox, subpixels, subpixels);

    let shape: Cow<'_, Shape> = match shape {
        Shape::RegularPolygon(p) => Cow::Owned(Shape::Polygon(p.to_polygon())),
        other => Cow::Borrowed(other),
    };

    let n = subpixels.max(1);
    let step = 1.0 / n as f64;
    let offsets: Vec<f64> = (0..n).map(|k| -0.5 + (k as f64 + 0.5) * step).collect();
    let norm = (n * n) as f64;

    let data = Array2::from_shape_fn(bbox.shape(), |(row, col)| {
        let x = (bbox.ixmin + col as i64) as f64;
        let y = (bbox.iymin + row as i64) as f64;
        let mut hits = 0usize;
        for dy in &offsets {
            for dx in &offsets {
                if shape.contains((x + dx, y + dy).into()) {
                    hits += 1;
                }
            }
        }
        hits as f64 / norm
    });

    RegionMask::new(data, bbox)
}

fn exact(shape: &Shape) -> Result<RegionMask> {
    let bbox = shape.bounding_box();
    log::debug!("exact overlap for {} over {}", shape.name(), bbox);

    let coverage: Box<dyn Fn(f64, f64) -> f64 + '_> = match shape {
        Shape::Circle(c) => Box::new(move |x: f64, y: f64| circle_pixel(c.center, c.radius, x, y)),
        Shape::Ellipse(e) => Box::new(move |x: f64, y: f64| ellipse_pixel(e, x, y)),
        Shape::Rectangle(r) => Box::new(move |x: f64, y: f64| rectangle_pixel(r, x, y)),
        _ => {
            return Err(RegionError::unimplemented(
                format!("exact mode is not implemented for {} regions", shape.name()),
                Some("use mode \"subpixels\" with a large subpixels value instead"),
            ))
        }
    };

    let data = Array2::from_shape_fn(bbox.shape(), |(row, col)| {
        coverage(
            (bbox.ixmin + col as i64) as f64,
            (bbox.iymin + row as i64) as f64,
        )
    });
    RegionMask::new(data, bbox)
}
