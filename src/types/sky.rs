//! Sky regions and the pixel/sky coordinate seam.
//!
//! A `SkyTransform` maps between pixel and celestial positions. Converting
//! a region evaluates the local pixel scale and the direction of north at
//! the region centre; lengths scale by the former and angles shift by the
//! latter.

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

use super::{
    Angle, AnnulusExtent, Circle, CircleAnnulus, Combinator, Ellipse, EllipseAnnulus, Line,
    PixCoord, PixelRegion, Point, Polygon, Rectangle, RectangleAnnulus, RegionMeta, RegionVisual,
    Shape,
};

/// Offset used to probe the local scale and north direction.
const PROBE_ARCSEC: f64 = 1.0;

/// A celestial position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkyCoord {
    pub lon: f64,
    pub lat: f64,
}

impl SkyCoord {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Mapping between pixel and sky positions.
pub trait SkyTransform {
    fn pixel_to_sky(&self, pixel: PixCoord) -> SkyCoord;

    fn sky_to_pixel(&self, sky: SkyCoord) -> PixCoord;

    /// Pixel position, scale in arcsec per pixel and the pixel-frame angle
    /// of north at `sky`.
    fn scale_angle_at(&self, sky: SkyCoord) -> (PixCoord, f64, Angle) {
        let probe = PROBE_ARCSEC / 3600.0;
        // step south instead when north would cross the pole
        let (dlat, sign) = if sky.lat + probe > 90.0 {
            (-probe, -1.0)
        } else {
            (probe, 1.0)
        };

        let pixel = self.sky_to_pixel(sky);
        let offset = self.sky_to_pixel(SkyCoord::new(sky.lon, sky.lat + dlat));
        let dx = sign * (offset.x - pixel.x);
        let dy = sign * (offset.y - pixel.y);

        let scale = PROBE_ARCSEC / dx.hypot(dy);
        (pixel, scale, Angle::from_radians(dy.atan2(dx)))
    }
}

/// A flat, exactly invertible projection.
///
/// Pixel offsets from `crpix` are rotated by `rotation` and scaled by
/// `cdelt` degrees per pixel along each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSkyTransform {
    pub crpix: PixCoord,
    pub crval: SkyCoord,
    pub cdelt: (f64, f64),
    pub rotation: Angle,
}

impl LinearSkyTransform {
    pub fn new(crpix: PixCoord, crval: SkyCoord, cdelt: (f64, f64), rotation: Angle) -> Result<Self> {
        let ok = |v: f64| v.is_finite() && v != 0.0;
        if !ok(cdelt.0) || !ok(cdelt.1) {
            return Err(RegionError::InvalidArgument {
                message: format!("cdelt must be finite and non-zero, got {:?}", cdelt),
                help: None,
            });
        }
        Ok(Self {
            crpix,
            crval,
            cdelt,
            rotation,
        })
    }

    /// Square pixels of `scale` degrees, north up.
    pub fn simple(crpix: PixCoord, crval: SkyCoord, scale: f64) -> Result<Self> {
        Self::new(crpix, crval, (scale, scale), Angle::ZERO)
    }
}

impl SkyTransform for LinearSkyTransform {
    fn pixel_to_sky(&self, pixel: PixCoord) -> SkyCoord {
        let d = (pixel - self.crpix).rotate(PixCoord::default(), self.rotation);
        SkyCoord::new(
            self.crval.lon + d.x * self.cdelt.0,
            self.crval.lat + d.y * self.cdelt.1,
        )
    }

    fn sky_to_pixel(&self, sky: SkyCoord) -> PixCoord {
        let d = PixCoord::new(
            (sky.lon - self.crval.lon) / self.cdelt.0,
            (sky.lat - self.crval.lat) / self.cdelt.1,
        );
        self.crpix + d.rotate(PixCoord::default(), -self.rotation)
    }
}

/// Sky shapes. Lengths are in arcseconds; angles are measured from the
/// same reference as the pixel angle after removing the north offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum SkyShape {
    Circle {
        center: SkyCoord,
        radius: f64,
    },
    Ellipse {
        center: SkyCoord,
        width: f64,
        height: f64,
        angle: Angle,
    },
    Rectangle {
        center: SkyCoord,
        width: f64,
        height: f64,
        angle: Angle,
    },
    Polygon {
        vertices: Vec<SkyCoord>,
    },
    Point {
        center: SkyCoord,
    },
    Line {
        start: SkyCoord,
        end: SkyCoord,
    },
    CircleAnnulus {
        center: SkyCoord,
        inner_radius: f64,
        outer_radius: f64,
    },
    EllipseAnnulus {
        center: SkyCoord,
        inner_width: f64,
        inner_height: f64,
        outer_width: f64,
        outer_height: f64,
        angle: Angle,
    },
    RectangleAnnulus {
        center: SkyCoord,
        inner_width: f64,
        inner_height: f64,
        outer_width: f64,
        outer_height: f64,
        angle: Angle,
    },
    Compound {
        region1: Box<SkyShape>,
        region2: Box<SkyShape>,
        op: Combinator,
    },
}

/// A region defined in sky coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyRegion {
    pub shape: SkyShape,
    pub meta: RegionMeta,
    pub visual: RegionVisual,
}

struct Frame {
    scale: f64,
    north: Angle,
}

impl Frame {
    fn at<T: SkyTransform + ?Sized>(wcs: &T, sky: SkyCoord) -> Self {
        let (_, scale, north) = wcs.scale_angle_at(sky);
        Self { scale, north }
    }

    fn sky_angle(&self, angle: Angle) -> Angle {
        angle - (self.north - Angle::from_degrees(90.0))
    }

    fn pixel_angle(&self, angle: Angle) -> Angle {
        angle + (self.north - Angle::from_degrees(90.0))
    }
}

impl SkyRegion {
    /// Convert a pixel region, scaling lengths at its centre.
    pub fn from_pixel<T: SkyTransform + ?Sized>(region: &PixelRegion, wcs: &T) -> Self {
        Self {
            shape: shape_to_sky(&region.shape, wcs),
            meta: region.meta.clone(),
            visual: region.visual.clone(),
        }
    }

    /// Convert back to pixels; shape parameters are revalidated.
    pub fn to_pixel<T: SkyTransform + ?Sized>(&self, wcs: &T) -> Result<PixelRegion> {
        Ok(PixelRegion {
            shape: shape_to_pixel(&self.shape, wcs)?,
            meta: self.meta.clone(),
            visual: self.visual.clone(),
        })
    }

    /// Whether the region contains a sky position, evaluated in pixels.
    pub fn contains<T: SkyTransform + ?Sized>(&self, sky: SkyCoord, wcs: &T) -> Result<bool> {
        let region = self.to_pixel(wcs)?;
        region.includes(wcs.sky_to_pixel(sky))
    }
}

fn shape_to_sky<T: SkyTransform + ?Sized>(shape: &Shape, wcs: &T) -> SkyShape {
    let sky = |p: PixCoord| wcs.pixel_to_sky(p);

    match shape {
        Shape::Circle(c) => {
            let center = sky(c.center);
            let frame = Frame::at(wcs, center);
            SkyShape::Circle {
                center,
                radius: c.radius * frame.scale,
            }
        }
        Shape::Ellipse(e) => {
            let center = sky(e.center);
            let frame = Frame::at(wcs, center);
            SkyShape::Ellipse {
                center,
                width: e.width * frame.scale,
                height: e.height * frame.scale,
                angle: frame.sky_angle(e.angle),
            }
        }
        Shape::Rectangle(r) => {
            let center = sky(r.center);
            let frame = Frame::at(wcs, center);
            SkyShape::Rectangle {
                center,
                width: r.width * frame.scale,
                height: r.height * frame.scale,
                angle: frame.sky_angle(r.angle),
            }
        }
        Shape::Polygon(p) => SkyShape::Polygon {
            vertices: p.vertices.iter().map(|&v| sky(v)).collect(),
        },
        Shape::RegularPolygon(p) => SkyShape::Polygon {
            vertices: p.vertices().into_iter().map(sky).collect(),
        },
        Shape::Point(p) => SkyShape::Point {
            center: sky(p.center),
        },
        Shape::Line(l) => SkyShape::Line {
            start: sky(l.start),
            end: sky(l.end),
        },
        Shape::CircleAnnulus(a) => {
            let center = sky(a.center);
            let frame = Frame::at(wcs, center);
            SkyShape::CircleAnnulus {
                center,
                inner_radius: a.inner_radius * frame.scale,
                outer_radius: a.outer_radius * frame.scale,
            }
        }
        Shape::EllipseAnnulus(EllipseAnnulus(e)) | Shape::RectangleAnnulus(RectangleAnnulus(e)) => {
            let center = sky(e.center);
            let frame = Frame::at(wcs, center);
            let (inner_width, inner_height) = (e.inner_width * frame.scale, e.inner_height * frame.scale);
            let (outer_width, outer_height) = (e.outer_width * frame.scale, e.outer_height * frame.scale);
            let angle = frame.sky_angle(e.angle);
            if matches!(shape, Shape::EllipseAnnulus(_)) {
                SkyShape::EllipseAnnulus {
                    center,
                    inner_width,
                    inner_height,
                    outer_width,
                    outer_height,
                    angle,
                }
            } else {
                SkyShape::RectangleAnnulus {
                    center,
                    inner_width,
                    inner_height,
                    outer_width,
                    outer_height,
                    angle,
                }
            }
        }
        Shape::Compound(c) => SkyShape::Compound {
            region1: Box::new(shape_to_sky(&c.region1, wcs)),
            region2: Box::new(shape_to_sky(&c.region2, wcs)),
            op: c.op,
        },
    }
}

fn shape_to_pixel<T: SkyTransform + ?Sized>(shape: &SkyShape, wcs: &T) -> Result<Shape> {
    let pix = |s: SkyCoord| wcs.sky_to_pixel(s);

    Ok(match shape {
        SkyShape::Circle { center, radius } => {
            let frame = Frame::at(wcs, *center);
            Circle::new(pix(*center), radius / frame.scale)?.into()
        }
        SkyShape::Ellipse {
            center,
            width,
            height,
            angle,
        } => {
            let frame = Frame::at(wcs, *center);
            Ellipse::new(
                pix(*center),
                width / frame.scale,
                height / frame.scale,
                frame.pixel_angle(*angle),
            )?
            .into()
        }
        SkyShape::Rectangle {
            center,
            width,
            height,
            angle,
        } => {
            let frame = Frame::at(wcs, *center);
            Rectangle::new(
                pix(*center),
                width / frame.scale,
                height / frame.scale,
                frame.pixel_angle(*angle),
            )?
            .into()
        }
        SkyShape::Polygon { vertices } => {
            Polygon::new(vertices.iter().map(|&v| pix(v)).collect())?.into()
        }
        SkyShape::Point { center } => Shape::Point(Point {
            center: pix(*center),
        }),
        SkyShape::Line { start, end } => Shape::Line(Line {
            start: pix(*start),
            end: pix(*end),
        }),
        SkyShape::CircleAnnulus {
            center,
            inner_radius,
            outer_radius,
        } => {
            let frame = Frame::at(wcs, *center);
            CircleAnnulus::new(
                pix(*center),
                inner_radius / frame.scale,
                outer_radius / frame.scale,
            )?
            .into()
        }
        SkyShape::EllipseAnnulus {
            center,
            inner_width,
            inner_height,
            outer_width,
            outer_height,
            angle,
        }
        | SkyShape::RectangleAnnulus {
            center,
            inner_width,
            inner_height,
            outer_width,
            outer_height,
            angle,
        } => {
            let frame = Frame::at(wcs, *center);
            let extent = AnnulusExtent::new(
                pix(*center),
                inner_width / frame.scale,
                inner_height / frame.scale,
                outer_width / frame.scale,
                outer_height / frame.scale,
                frame.pixel_angle(*angle),
            )?;
            if matches!(shape, SkyShape::EllipseAnnulus { .. }) {
                EllipseAnnulus(extent).into()
            } else {
                RectangleAnnulus(extent).into()
            }
        }
        SkyShape::Compound {
            region1,
            region2,
            op,
        } => Shape::compound(
            shape_to_pixel(region1, wcs)?,
            shape_to_pixel(region2, wcs)?,
            *op,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegularPolygon;

    fn tilted() -> LinearSkyTransform {
        LinearSkyTransform::new(
            PixCoord::new(50.0, 50.0),
            SkyCoord::new(150.0, 2.0),
            (-0.5 / 3600.0, 0.5 / 3600.0),
            Angle::from_degrees(30.0),
        )
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_linear_transform_inverts() {
        let wcs = tilted();
        let p = PixCoord::new(12.5, -3.25);
        let back = wcs.sky_to_pixel(wcs.pixel_to_sky(p));
        assert!(close(back.x, p.x) && close(back.y, p.y), "{back:?}");
    }

    #[test]
    fn test_linear_transform_rejects_zero_cdelt() {
        let err = LinearSkyTransform::new(
            PixCoord::default(),
            SkyCoord::default(),
            (0.0, 1.0),
            Angle::ZERO,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_scale_angle_simple() {
        let wcs = LinearSkyTransform::simple(PixCoord::new(0.0, 0.0), SkyCoord::new(10.0, 20.0), 0.5 / 3600.0)
            .unwrap();
        let (pixel, scale, north) = wcs.scale_angle_at(SkyCoord::new(10.0, 20.0));
        assert!(close(pixel.x, 0.0) && close(pixel.y, 0.0));
        assert!(close(scale, 0.5));
        assert!(close(north.degrees(), 90.0));
    }

    #[test]
    fn test_scale_angle_near_pole() {
        let wcs = LinearSkyTransform::simple(PixCoord::new(0.0, 0.0), SkyCoord::new(0.0, 89.9999), 1.0 / 3600.0)
            .unwrap();
        let (_, scale, north) = wcs.scale_angle_at(SkyCoord::new(0.0, 89.9999));
        assert!(close(scale, 1.0));
        assert!(close(north.degrees(), 90.0));
    }

    #[test]
    fn test_circle_radius_scales() {
        let wcs = LinearSkyTransform::simple(PixCoord::new(0.0, 0.0), SkyCoord::new(10.0, 20.0), 0.5 / 3600.0)
            .unwrap();
        let region = PixelRegion::new(Circle::new(PixCoord::new(3.0, 4.0), 4.0).unwrap());
        let sky = region.to_sky(&wcs);
        let SkyShape::Circle { radius, .. } = sky.shape else {
            panic!("expected a circle");
        };
        assert!(close(radius, 2.0));
    }

    #[test]
    fn test_ellipse_round_trip() {
        let wcs = tilted();
        let meta = RegionMeta::new().with("label", "galaxy").unwrap();
        let region = PixelRegion::new(
            Ellipse::new(PixCoord::new(40.0, 61.0), 12.0, 5.0, Angle::from_degrees(20.0)).unwrap(),
        )
        .with_meta(meta.clone());

        let back = region.to_sky(&wcs).to_pixel(&wcs).unwrap();
        let Shape::Ellipse(e) = &back.shape else {
            panic!("expected an ellipse");
        };
        assert!(close(e.center.x, 40.0) && close(e.center.y, 61.0));
        assert!(close(e.width, 12.0) && close(e.height, 5.0));
        assert!(close(e.angle.degrees(), 20.0));
        assert_eq!(back.meta, meta);
    }

    #[test]
    fn test_annulus_and_compound_round_trip() {
        let wcs = tilted();
        let annulus = AnnulusExtent::new(PixCoord::new(45.0, 52.0), 2.0, 1.0, 6.0, 4.0, Angle::from_degrees(-15.0))
            .unwrap();
        let compound = Shape::compound(
            RectangleAnnulus(annulus).into(),
            Circle::new(PixCoord::new(47.0, 52.0), 1.5).unwrap().into(),
            Combinator::Or,
        );
        let region = PixelRegion::new(compound);
        let back = region.to_sky(&wcs).to_pixel(&wcs).unwrap();

        for p in [PixCoord::new(45.0, 52.0), PixCoord::new(48.0, 53.5), PixCoord::new(47.0, 52.0)] {
            assert_eq!(region.includes(p).unwrap(), back.includes(p).unwrap(), "{p}");
        }
    }

    #[test]
    fn test_regular_polygon_becomes_polygon() {
        let wcs = tilted();
        let hex = RegularPolygon::new(PixCoord::new(50.0, 50.0), 6, 3.0, Angle::ZERO).unwrap();
        let sky = PixelRegion::new(hex).to_sky(&wcs);
        let SkyShape::Polygon { vertices } = &sky.shape else {
            panic!("expected a polygon");
        };
        assert_eq!(vertices.len(), 6);
    }

    #[test]
    fn test_sky_contains() {
        let wcs = tilted();
        let region = PixelRegion::new(Circle::new(PixCoord::new(50.0, 50.0), 4.0).unwrap()).to_sky(&wcs);
        assert!(region.contains(SkyCoord::new(150.0, 2.0), &wcs).unwrap());
        assert!(!region.contains(SkyCoord::new(150.1, 2.0), &wcs).unwrap());
    }
}
