//! Integer pixel bounding boxes.
//!
//! Pixel `i` covers `[i - 0.5, i + 0.5)`, so a box `(ixmin, ixmax)` spans
//! the continuous range `[ixmin - 0.5, ixmax - 0.5)`. Bounds are half-open.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

/// Largest pixel coordinate magnitude (2^52). Shape constructors reject
/// anything beyond it and `from_float` clamps to it, so extents always fit
/// in `i64` and `usize`.
pub(crate) const MAX_PIXEL: f64 = 4_503_599_627_370_496.0;

fn to_pixel_index(v: f64) -> i64 {
    v.clamp(-MAX_PIXEL, MAX_PIXEL) as i64
}

/// A half-open integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ixmin: i64,
    pub ixmax: i64,
    pub iymin: i64,
    pub iymax: i64,
}

/// Row and column ranges into a large image and a smaller mask array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapSlices {
    pub large: (Range<usize>, Range<usize>),
    pub small: (Range<usize>, Range<usize>),
}

impl BoundingBox {
    /// Create a box, rejecting empty or inverted extents.
    pub fn new(ixmin: i64, ixmax: i64, iymin: i64, iymax: i64) -> Result<Self> {
        if ixmax <= ixmin || iymax <= iymin {
            return Err(RegionError::InvalidArgument {
                message: format!(
                    "bounding box must have ixmax > ixmin and iymax > iymin, got ({ixmin}, {ixmax}, {iymin}, {iymax})"
                ),
                help: None,
            });
        }
        Ok(Self {
            ixmin,
            ixmax,
            iymin,
            iymax,
        })
    }

    /// The smallest box whose pixels cover the float extent.
    ///
    /// A degenerate extent still produces a box one pixel wide.
    pub fn from_float(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        let ixmin = to_pixel_index((xmin + 0.5).floor());
        let ixmax = to_pixel_index((xmax + 0.5).ceil()).max(ixmin + 1);
        let iymin = to_pixel_index((ymin + 0.5).floor());
        let iymax = to_pixel_index((ymax + 0.5).ceil()).max(iymin + 1);
        Self {
            ixmin,
            ixmax,
            iymin,
            iymax,
        }
    }

    pub fn width(&self) -> usize {
        self.ixmax.saturating_sub(self.ixmin).max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.iymax.saturating_sub(self.iymin).max(0) as usize
    }

    /// Number of pixels in the box, saturating at `u64::MAX`.
    pub fn pixel_count(&self) -> u64 {
        (self.width() as u64).saturating_mul(self.height() as u64)
    }

    /// Array shape `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Continuous pixel-edge extent `(xmin, xmax, ymin, ymax)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (
            self.ixmin as f64 - 0.5,
            self.ixmax as f64 - 0.5,
            self.iymin as f64 - 0.5,
            self.iymax as f64 - 0.5,
        )
    }

    /// Geometric centre `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.ixmin as f64 + self.ixmax as f64 - 1.0),
            0.5 * (self.iymin as f64 + self.iymax as f64 - 1.0),
        )
    }

    /// The smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            ixmin: self.ixmin.min(other.ixmin),
            ixmax: self.ixmax.max(other.ixmax),
            iymin: self.iymin.min(other.iymin),
            iymax: self.iymax.max(other.iymax),
        }
    }

    /// The shared pixels, if any.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let ixmin = self.ixmin.max(other.ixmin);
        let ixmax = self.ixmax.min(other.ixmax);
        let iymin = self.iymin.max(other.iymin);
        let iymax = self.iymax.min(other.iymax);
        if ixmax > ixmin && iymax > iymin {
            Some(BoundingBox {
                ixmin,
                ixmax,
                iymin,
                iymax,
            })
        } else {
            None
        }
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.ixmin <= other.ixmin
            && self.ixmax >= other.ixmax
            && self.iymin <= other.iymin
            && self.iymax >= other.iymax
    }

    /// Slices for placing this box into an image of `shape = (ny, nx)`
    /// whose pixel (0, 0) sits at the origin.
    ///
    /// Returns `None` when the box and the image do not overlap.
    pub fn get_overlap_slices(&self, shape: (usize, usize)) -> Option<OverlapSlices> {
        let image = BoundingBox {
            ixmin: 0,
            ixmax: shape.1 as i64,
            iymin: 0,
            iymax: shape.0 as i64,
        };
        let overlap = self.intersection(&image)?;

        let large = (
            overlap.iymin as usize..overlap.iymax as usize,
            overlap.ixmin as usize..overlap.ixmax as usize,
        );
        let small = (
            (overlap.iymin - self.iymin) as usize..(overlap.iymax - self.iymin) as usize,
            (overlap.ixmin - self.ixmin) as usize..(overlap.ixmax - self.ixmin) as usize,
        );
        Some(OverlapSlices { large, small })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox(ixmin={}, ixmax={}, iymin={}, iymax={})",
            self.ixmin, self.ixmax, self.iymin, self.iymax
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert!(BoundingBox::new(1, 1, 0, 2).is_err());
        assert!(BoundingBox::new(0, 2, 3, 1).is_err());
        assert!(BoundingBox::new(0, 2, 0, 2).is_ok());
    }

    #[test]
    fn test_from_float_rounds_outward() {
        let bbox = BoundingBox::from_float(1.0, 3.0, 1.0, 4.0);
        assert_eq!(bbox, BoundingBox::new(1, 4, 1, 5).unwrap());
        assert_eq!(bbox.shape(), (4, 3));
    }

    #[test]
    fn test_from_float_negative() {
        let bbox = BoundingBox::from_float(-2.0, 14.0, -2.0, 14.0);
        assert_eq!(bbox, BoundingBox::new(-2, 15, -2, 15).unwrap());
    }

    #[test]
    fn test_from_float_degenerate_is_one_pixel() {
        let bbox = BoundingBox::from_float(1.5, 1.5, 2.0, 2.0);
        assert_eq!(bbox.width(), 1);
        assert_eq!(bbox.height(), 1);
    }

    #[test]
    fn test_from_float_huge_extent_is_clamped() {
        let bbox = BoundingBox::from_float(-1e300, 1e300, -3e9, 3e9);
        assert_eq!(bbox.ixmin, -(MAX_PIXEL as i64));
        assert_eq!(bbox.ixmax, MAX_PIXEL as i64);
        assert_eq!(bbox.width(), 2 * MAX_PIXEL as usize);
        assert_eq!(bbox.height(), 6_000_000_001);
        assert_eq!(bbox.pixel_count(), u64::MAX);
    }

    #[test]
    fn test_width_of_raw_extreme_box() {
        let bbox = BoundingBox {
            ixmin: i64::MIN,
            ixmax: i64::MAX,
            iymin: 0,
            iymax: 2,
        };
        assert_eq!(bbox.width(), i64::MAX as usize);
        assert_eq!(bbox.pixel_count(), 2 * i64::MAX as u64);
    }

    #[test]
    fn test_extent_and_center() {
        let bbox = BoundingBox::new(1, 4, 1, 5).unwrap();
        assert_eq!(bbox.extent(), (0.5, 3.5, 0.5, 4.5));
        assert_eq!(bbox.center(), (2.0, 2.5));
    }

    #[test]
    fn test_union_and_intersection() {
        let a = BoundingBox::new(0, 4, 0, 4).unwrap();
        let b = BoundingBox::new(2, 6, -1, 3).unwrap();

        assert_eq!(a.union(&b), BoundingBox::new(0, 6, -1, 4).unwrap());
        assert_eq!(a.intersection(&b), Some(BoundingBox::new(2, 4, 0, 3).unwrap()));

        let far = BoundingBox::new(10, 12, 10, 12).unwrap();
        assert_eq!(a.intersection(&far), None);
        assert!(a.union(&b).contains_box(&a));
    }

    #[test]
    fn test_overlap_slices_partial() {
        let bbox = BoundingBox::new(-1, 2, 3, 6).unwrap();
        let slices = bbox.get_overlap_slices((5, 5)).unwrap();
        assert_eq!(slices.large, (3..5, 0..2));
        assert_eq!(slices.small, (0..2, 1..3));
    }

    #[test]
    fn test_overlap_slices_none() {
        let bbox = BoundingBox::new(10, 12, 10, 12).unwrap();
        assert!(bbox.get_overlap_slices((5, 5)).is_none());
    }
}
