//! Pixel regions: a shape plus its metadata.

use std::ops::{BitAnd, BitOr, BitXor};

use crate::error::Result;
use crate::render::{self, Artist, MaskMode, RegionMask};

use super::sky::{SkyRegion, SkyTransform};
use super::{
    Angle, BoundingBox, Combinator, Containment, PixCoord, PixelCoords, RegionMeta, RegionVisual,
    Shape,
};

/// A region defined in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelRegion {
    pub shape: Shape,
    pub meta: RegionMeta,
    pub visual: RegionVisual,
}

impl PixelRegion {
    /// A region with empty metadata.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            meta: RegionMeta::new(),
            visual: RegionVisual::new(),
        }
    }

    pub fn with_meta(mut self, meta: RegionMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_visual(mut self, visual: RegionVisual) -> Self {
        self.visual = visual;
        self
    }

    /// Shape name, e.g. `"circle"`.
    pub fn name(&self) -> &'static str {
        self.shape.name()
    }

    /// Containment of one or many positions.
    ///
    /// The result has the same form as the input. A region whose `include`
    /// flag is false reports the complement.
    pub fn contains(&self, coords: impl Into<PixelCoords>) -> Containment {
        let result = coords.into().map(|p| self.shape.contains(p));
        if self.meta.include() {
            result
        } else {
            result.negate()
        }
    }

    /// Containment of a single position; arrays are a `TypeMismatch`.
    pub fn includes(&self, coords: impl Into<PixelCoords>) -> Result<bool> {
        let p = coords.into().to_scalar()?;
        Ok(self.contains(p).as_scalar().unwrap_or_default())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.shape.bounding_box()
    }

    pub fn area(&self) -> Result<f64> {
        self.shape.area()
    }

    pub fn to_mask(&self, mode: MaskMode) -> Result<RegionMask> {
        render::to_mask(&self.shape, mode)
    }

    /// `to_mask` with the mode given by name, e.g. `("subpixels", 5)`.
    pub fn to_mask_with(&self, mode: &str, subpixels: i64) -> Result<RegionMask> {
        self.to_mask(MaskMode::parse(mode, subpixels)?)
    }

    /// A copy rotated about `pivot`; metadata is carried over.
    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            shape: self.shape.rotate(pivot, angle),
            meta: self.meta.clone(),
            visual: self.visual.clone(),
        }
    }

    pub fn as_artist(&self, origin: PixCoord) -> Result<Artist> {
        render::as_artist(self, origin)
    }

    /// The equivalent region on the sky.
    pub fn to_sky<T: SkyTransform + ?Sized>(&self, wcs: &T) -> SkyRegion {
        SkyRegion::from_pixel(self, wcs)
    }

    /// Join with another region; the result has empty metadata.
    pub fn compound(&self, other: &PixelRegion, op: Combinator) -> PixelRegion {
        PixelRegion::new(Shape::compound(self.shape.clone(), other.shape.clone(), op))
    }
}

impl BitAnd for &PixelRegion {
    type Output = PixelRegion;

    fn bitand(self, rhs: &PixelRegion) -> PixelRegion {
        self.compound(rhs, Combinator::And)
    }
}

impl BitOr for &PixelRegion {
    type Output = PixelRegion;

    fn bitor(self, rhs: &PixelRegion) -> PixelRegion {
        self.compound(rhs, Combinator::Or)
    }
}

impl BitXor for &PixelRegion {
    type Output = PixelRegion;

    fn bitxor(self, rhs: &PixelRegion) -> PixelRegion {
        self.compound(rhs, Combinator::Xor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegionError;
    use crate::types::{Circle, Point, Polygon};

    fn circle(x: f64, y: f64, r: f64) -> PixelRegion {
        PixelRegion::new(Circle::new(PixCoord::new(x, y), r).unwrap())
    }

    #[test]
    fn test_contains_keeps_form() {
        let region = circle(0.0, 0.0, 2.0);
        assert_eq!(
            region.contains(PixCoord::new(1.0, 1.0)),
            Containment::Scalar(true)
        );

        let coords = PixelCoords::from_xy(&[0.0, 3.0, -1.0], &[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(
            region.contains(coords),
            Containment::Array(vec![true, false, true])
        );
    }

    #[test]
    fn test_include_false_negates() {
        let meta = RegionMeta::new().with("include", false).unwrap();
        let region = circle(0.0, 0.0, 2.0).with_meta(meta);
        assert_eq!(region.contains(PixCoord::new(0.0, 0.0)), Containment::Scalar(false));
        assert_eq!(region.contains(PixCoord::new(5.0, 0.0)), Containment::Scalar(true));

        // masks describe the shape itself
        let mask = region.to_mask(MaskMode::Center).unwrap();
        assert_eq!(mask.get(0, 0), 1.0);
    }

    #[test]
    fn test_includes_rejects_arrays() {
        let region = circle(0.0, 0.0, 2.0);
        assert!(region.includes(PixCoord::new(0.5, 0.5)).unwrap());
        let coords = PixelCoords::from(vec![PixCoord::new(0.0, 0.0)]);
        assert!(matches!(
            region.includes(coords),
            Err(RegionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_to_mask_with_mode_names() {
        let region = circle(3.0, 3.0, 2.0);
        assert!(region.to_mask_with("subpixels", 5).is_ok());
        assert!(matches!(
            region.to_mask_with("bogus", 5),
            Err(RegionError::InvalidArgument { .. })
        ));
        assert!(matches!(
            region.to_mask_with("subpixels", 0),
            Err(RegionError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_point_has_no_mask() {
        let region = PixelRegion::new(Shape::Point(Point {
            center: PixCoord::new(1.0, 1.0),
        }));
        assert!(matches!(
            region.to_mask(MaskMode::Center),
            Err(RegionError::Unimplemented { .. })
        ));
    }

    #[test]
    fn test_operators_build_compounds() {
        let a = circle(0.0, 0.0, 2.0);
        let b = circle(2.0, 0.0, 2.0);
        let p = PixCoord::new(1.0, 0.0);
        let q = PixCoord::new(-1.5, 0.0);

        assert!((&a & &b).includes(p).unwrap());
        assert!(!(&a & &b).includes(q).unwrap());
        assert!((&a | &b).includes(q).unwrap());
        assert!(!(&a ^ &b).includes(p).unwrap());
        assert!((&a ^ &b).includes(q).unwrap());
    }

    #[test]
    fn test_rotate_keeps_metadata() {
        let meta = RegionMeta::new().with("label", "src").unwrap();
        let triangle = Polygon::new(vec![
            PixCoord::new(1.0, 1.0),
            PixCoord::new(3.0, 1.0),
            PixCoord::new(1.0, 4.0),
        ])
        .unwrap();
        let region = PixelRegion::new(triangle).with_meta(meta.clone());
        let rotated = region.rotate(PixCoord::new(3.0, 1.0), Angle::from_degrees(-90.0));
        assert_eq!(rotated.meta, meta);
        assert!((rotated.area().unwrap() - 3.0).abs() < 1e-12);
    }
}
