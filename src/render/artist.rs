//! Plotting descriptors.
//!
//! An `Artist` is what a plotting backend needs to draw a region: the
//! geometry in plot coordinates and the keyword style built from the
//! region's visual metadata. No plotting library is involved here.

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::Result;
use crate::types::{ArtistKind, Ellipse, PixCoord, PlotStyle, PixelRegion, Shape};

/// Vertices used to outline curved shapes in paths.
const OUTLINE_SEGMENTS: usize = 64;

/// Geometry of a plot artist, already shifted by the plot origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtistGeometry {
    Circle {
        center: PixCoord,
        radius: f64,
    },
    Ellipse {
        center: PixCoord,
        width: f64,
        height: f64,
        angle: f64,
    },
    /// `xy` is the corner the rectangle rotates about.
    Rectangle {
        xy: PixCoord,
        width: f64,
        height: f64,
        angle: f64,
    },
    Polygon {
        vertices: Vec<PixCoord>,
    },
    Marker {
        position: PixCoord,
    },
    Line {
        start: PixCoord,
        end: PixCoord,
    },
    /// Closed rings; inner rings run opposite to outer ones.
    Path {
        rings: Vec<Vec<PixCoord>>,
    },
}

/// A drawable description of a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub kind: ArtistKind,
    pub geometry: ArtistGeometry,
    pub style: PlotStyle,
}

/// Build the artist for a region, with plot coordinates relative to `origin`.
pub fn as_artist(region: &PixelRegion, origin: PixCoord) -> Result<Artist> {
    let shift = |p: PixCoord| p - origin;

    let (kind, geometry) = match &region.shape {
        Shape::Circle(c) => (
            ArtistKind::Patch,
            ArtistGeometry::Circle {
                center: shift(c.center),
                radius: c.radius,
            },
        ),
        Shape::Ellipse(e) => (
            ArtistKind::Patch,
            ArtistGeometry::Ellipse {
                center: shift(e.center),
                width: e.width,
                height: e.height,
                angle: e.angle.degrees(),
            },
        ),
        Shape::Rectangle(r) => (
            ArtistKind::Patch,
            ArtistGeometry::Rectangle {
                xy: shift(r.corners()[0]),
                width: r.width,
                height: r.height,
                angle: r.angle.degrees(),
            },
        ),
        Shape::Polygon(p) => (
            ArtistKind::Patch,
            ArtistGeometry::Polygon {
                vertices: p.vertices.iter().map(|&v| shift(v)).collect(),
            },
        ),
        Shape::RegularPolygon(p) => (
            ArtistKind::Patch,
            ArtistGeometry::Polygon {
                vertices: p.vertices().into_iter().map(shift).collect(),
            },
        ),
        Shape::Point(p) => (
            ArtistKind::Line2D,
            ArtistGeometry::Marker {
                position: shift(p.center),
            },
        ),
        Shape::Line(l) => (
            ArtistKind::Patch,
            ArtistGeometry::Line {
                start: shift(l.start),
                end: shift(l.end),
            },
        ),
        shape => (
            ArtistKind::Patch,
            ArtistGeometry::Path {
                rings: outline(shape)
                    .into_iter()
                    .map(|ring| ring.into_iter().map(shift).collect())
                    .collect(),
            },
        ),
    };

    Ok(Artist {
        kind,
        geometry,
        style: region.visual.plot_style(kind)?,
    })
}

/// Closed outlines of a shape, outer rings counter-clockwise.
fn outline(shape: &Shape) -> Vec<Vec<PixCoord>> {
    match shape {
        Shape::Circle(c) => vec![sample_ellipse(&Ellipse {
            center: c.center,
            width: 2.0 * c.radius,
            height: 2.0 * c.radius,
            angle: Default::default(),
        })],
        Shape::Ellipse(e) => vec![sample_ellipse(e)],
        Shape::Rectangle(r) => vec![r.corners().to_vec()],
        Shape::Polygon(p) => vec![p.vertices.clone()],
        Shape::RegularPolygon(p) => vec![p.vertices()],
        Shape::Point(_) | Shape::Line(_) => Vec::new(),
        Shape::Compound(c) => {
            let mut rings = outline(&c.region1);
            rings.extend(outline(&c.region2));
            rings
        }
        annulus => match annulus.components() {
            Some((outer, inner, _)) => {
                let mut rings = outline(&outer);
                rings.extend(outline(&inner).into_iter().map(|mut ring| {
                    ring.reverse();
                    ring
                }));
                rings
            }
            None => Vec::new(),
        },
    }
}

fn sample_ellipse(e: &Ellipse) -> Vec<PixCoord> {
    (0..OUTLINE_SEGMENTS)
        .map(|k| {
            let t = 2.0 * PI * k as f64 / OUTLINE_SEGMENTS as f64;
            let local = PixCoord::new(e.width / 2.0 * t.cos(), e.height / 2.0 * t.sin());
            (e.center + local).rotate(e.center, e.angle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Angle, Circle, CircleAnnulus, MetaValue, Point, Rectangle, RegionVisual};

    #[test]
    fn test_circle_artist_shifted() {
        let region = PixelRegion::new(Circle::new(PixCoord::new(5.0, 6.0), 2.0).unwrap());
        let artist = as_artist(&region, PixCoord::new(1.0, 1.0)).unwrap();
        assert_eq!(artist.kind, ArtistKind::Patch);
        assert_eq!(
            artist.geometry,
            ArtistGeometry::Circle {
                center: PixCoord::new(4.0, 5.0),
                radius: 2.0
            }
        );
        assert_eq!(artist.style.get("fill"), Some(&MetaValue::Bool(false)));
    }

    #[test]
    fn test_rectangle_artist_uses_corner() {
        let region = PixelRegion::new(
            Rectangle::new(PixCoord::new(2.0, 2.0), 4.0, 2.0, Angle::ZERO).unwrap(),
        );
        let artist = as_artist(&region, PixCoord::default()).unwrap();
        let ArtistGeometry::Rectangle { xy, .. } = artist.geometry else {
            panic!("expected a rectangle");
        };
        assert_eq!(xy, PixCoord::new(0.0, 1.0));
    }

    #[test]
    fn test_point_artist_is_marker() {
        let visual = RegionVisual::new().with("color", "red").unwrap();
        let region = PixelRegion::new(Shape::Point(Point {
            center: PixCoord::new(3.0, 4.0),
        }))
        .with_visual(visual);
        let artist = as_artist(&region, PixCoord::default()).unwrap();
        assert_eq!(artist.kind, ArtistKind::Line2D);
        assert_eq!(artist.style.get("markeredgecolor"), Some(&MetaValue::from("red")));
        assert_eq!(artist.style.get("marker"), Some(&MetaValue::from("o")));
    }

    #[test]
    fn test_annulus_artist_has_two_rings() {
        let region = PixelRegion::new(CircleAnnulus::new(PixCoord::new(0.0, 0.0), 1.0, 2.0).unwrap());
        let artist = as_artist(&region, PixCoord::default()).unwrap();
        let ArtistGeometry::Path { rings } = artist.geometry else {
            panic!("expected a path");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), OUTLINE_SEGMENTS);
        assert!((rings[1][0].separation(PixCoord::default()) - 1.0).abs() < 1e-12);
    }
}
