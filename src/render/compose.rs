//! Boolean composition of masks.
//!
//! Operands are rasterized on their own boxes, padded with zeros into the
//! union box by their absolute pixel offsets, then combined element-wise.

use ndarray::{s, Array2, Zip};

use crate::error::Result;
use crate::types::{BoundingBox, Combinator, Shape};

use super::raster::{to_mask, MaskMode};
use super::RegionMask;

/// Rasterize both operands and combine them.
pub fn compose_mask(
    region1: &Shape,
    region2: &Shape,
    op: Combinator,
    mode: MaskMode,
) -> Result<RegionMask> {
    let mask1 = to_mask(region1, mode)?;
    let mask2 = to_mask(region2, mode)?;
    combine_masks(&mask1, &mask2, op)
}

/// Combine two masks over the union of their boxes.
pub fn combine_masks(mask1: &RegionMask, mask2: &RegionMask, op: Combinator) -> Result<RegionMask> {
    let bbox = mask1.bbox().union(mask2.bbox());
    log::trace!(
        "{} of masks at {} and {} into {}",
        op.name(),
        mask1.bbox(),
        mask2.bbox(),
        bbox
    );

    let padded1 = align(mask1, &bbox);
    let padded2 = align(mask2, &bbox);
    let data = Zip::from(&padded1)
        .and(&padded2)
        .map_collect(|&a, &b| op.combine(a, b));
    RegionMask::new(data, bbox)
}

/// Copy a mask into a zeroed array covering `bbox`, which must contain it.
fn align(mask: &RegionMask, bbox: &BoundingBox) -> Array2<f64> {
    let mut out = Array2::zeros(bbox.shape());
    let (ny, nx) = mask.shape();
    let row = (mask.bbox().iymin - bbox.iymin) as usize;
    let col = (mask.bbox().ixmin - bbox.ixmin) as usize;
    out.slice_mut(s![row..row + ny, col..col + nx])
        .assign(mask.data());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Circle, PixCoord, Rectangle, Angle};
    use ndarray::array;

    fn mask(data: Array2<f64>, ixmin: i64, iymin: i64) -> RegionMask {
        let (ny, nx) = data.dim();
        let bbox = BoundingBox::new(ixmin, ixmin + nx as i64, iymin, iymin + ny as i64).unwrap();
        RegionMask::new(data, bbox).unwrap()
    }

    #[test]
    fn test_combine_aligns_by_offset() {
        let a = mask(array![[1.0, 1.0], [1.0, 1.0]], 0, 0);
        let b = mask(array![[0.5, 0.5], [0.5, 0.5]], 1, 1);

        let or = combine_masks(&a, &b, Combinator::Or).unwrap();
        assert_eq!(*or.bbox(), BoundingBox::new(0, 3, 0, 3).unwrap());
        assert_eq!(
            or.data(),
            &array![[1.0, 1.0, 0.0], [1.0, 1.0, 0.5], [0.0, 0.5, 0.5]]
        );

        let and = combine_masks(&a, &b, Combinator::And).unwrap();
        assert_eq!(and.sum(), 0.5);
        assert_eq!(and.get(1, 1), 0.5);

        let xor = combine_masks(&a, &b, Combinator::Xor).unwrap();
        assert_eq!(xor.get(1, 1), 0.5);
        assert_eq!(xor.get(0, 0), 1.0);
        assert_eq!(xor.get(2, 2), 0.5);
    }

    #[test]
    fn test_disjoint_operands() {
        let left: Shape = Circle::new(PixCoord::new(0.0, 0.0), 1.0).unwrap().into();
        let right: Shape = Circle::new(PixCoord::new(10.0, 0.0), 1.0).unwrap().into();

        let and = compose_mask(&left, &right, Combinator::And, MaskMode::Center).unwrap();
        assert_eq!(and.sum(), 0.0);

        let or = compose_mask(&left, &right, Combinator::Or, MaskMode::Center).unwrap();
        let parts = to_mask(&left, MaskMode::Center).unwrap().sum()
            + to_mask(&right, MaskMode::Center).unwrap().sum();
        assert_eq!(or.sum(), parts);
        assert_eq!(*or.bbox(), left.bounding_box().union(&right.bounding_box()));
    }

    #[test]
    fn test_compound_shape_mask() {
        let square: Shape = Rectangle::new(PixCoord::new(2.0, 2.0), 5.0, 5.0, Angle::ZERO)
            .unwrap()
            .into();
        let dot: Shape = Circle::new(PixCoord::new(2.0, 2.0), 0.4).unwrap().into();
        let holed = Shape::compound(square, dot, Combinator::Xor);

        let mask = to_mask(&holed, MaskMode::Center).unwrap();
        assert_eq!(mask.sum(), 24.0);
        assert_eq!(mask.get(2, 2), 0.0);
    }
}
