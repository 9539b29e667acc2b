//! YAML region files.
//!
//! A region file is a list of records, either at the top level or under a
//! `regions:` key:
//!
//! ```yaml
//! regions:
//!   - shape: circle
//!     params: [10, 12, 4.5]
//!     meta: { label: star }
//!     visual: { color: red }
//!   - shape: box
//!     params: [30, 30, 8, 4, 45]
//!   - shape: compound
//!     op: xor
//!     operands:
//!       - { shape: circle, params: [5, 5, 3] }
//!       - { shape: circle, params: [6, 5, 3] }
//! ```
//!
//! Parsing checks structure only (known shape, parameter count, integral
//! vertex counts, finite numbers). Value checks such as positive radii are
//! the job of validation, so a file with bad values still loads and can be
//! reported on.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};
use crate::types::{
    Angle, AnnulusExtent, Circle, CircleAnnulus, Combinator, Ellipse, EllipseAnnulus, Line,
    PixCoord, PixelRegion, Point, Polygon, Rectangle, RectangleAnnulus, RegionMeta, RegionVisual,
    RegularPolygon, Shape,
};

/// Accepted shape names and the canonical shape they stand for.
const SHAPE_ALIASES: &[(&str, &str)] = &[
    ("circle", "circle"),
    ("ellipse", "ellipse"),
    ("rectangle", "rectangle"),
    ("box", "rectangle"),
    ("rotbox", "rectangle"),
    ("centerbox", "rectangle"),
    ("polygon", "polygon"),
    ("poly", "polygon"),
    ("regularpolygon", "regularpolygon"),
    ("ngon", "regularpolygon"),
    ("point", "point"),
    ("line", "line"),
    ("circleannulus", "circleannulus"),
    ("annulus", "circleannulus"),
    ("ellipseannulus", "ellipseannulus"),
    ("elliptannulus", "ellipseannulus"),
    ("rectangleannulus", "rectangleannulus"),
    ("compound", "compound"),
];

/// One region as written in a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub shape: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<Combinator>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<RegionRecord>,

    #[serde(default, skip_serializing_if = "RegionMeta::is_empty")]
    pub meta: RegionMeta,

    #[serde(default, skip_serializing_if = "RegionVisual::is_empty")]
    pub visual: RegionVisual,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegionFile {
    List(Vec<RegionRecord>),
    Wrapped { regions: Vec<RegionRecord> },
}

#[derive(Serialize)]
struct RegionFileOut<'a> {
    regions: &'a [RegionRecord],
}

/// Resolve a shape name or alias to its canonical name.
pub fn resolve_shape(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    SHAPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
}

/// Parse a region file from a YAML string.
pub fn parse_region_file(content: &str) -> Result<Vec<PixelRegion>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: RegionFile = serde_yaml::from_str(content).map_err(|e| RegionError::Parse {
        message: format!("Invalid region file: {}", e),
        help: Some("Expected a list of {shape, params} records, optionally under `regions:`".to_string()),
    })?;

    let records = match file {
        RegionFile::List(records) | RegionFile::Wrapped { regions: records } => records,
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let region = record.to_region().map_err(|e| match e {
                RegionError::Parse { message, help } => RegionError::Parse {
                    message: format!("region {}: {}", index + 1, message),
                    help,
                },
                other => other,
            })?;
            log::debug!("region {}: {}", index + 1, region.name());
            Ok(region)
        })
        .collect()
}

/// Read and parse a region file.
pub fn read_region_file(path: &Path) -> Result<Vec<PixelRegion>> {
    let content = std::fs::read_to_string(path).map_err(|e| RegionError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read region file: {}", e),
    })?;
    parse_region_file(&content)
}

/// Serialize regions to the YAML region file format.
pub fn write_region_file(regions: &[PixelRegion]) -> Result<String> {
    let records: Vec<RegionRecord> = regions.iter().map(RegionRecord::from_region).collect();
    serde_yaml::to_string(&RegionFileOut { regions: &records }).map_err(|e| RegionError::Parse {
        message: format!("Failed to serialize regions: {}", e),
        help: None,
    })
}

fn count_error(shape: &str, expected: &str, got: usize) -> RegionError {
    RegionError::Parse {
        message: format!("{shape} expects {expected}, got {got} parameters"),
        help: Some(format!("params for {shape}: [{expected}]")),
    }
}

/// Split params into the required ones and an optional trailing angle.
fn with_angle<'a>(shape: &str, params: &'a [f64], required: usize, names: &str) -> Result<(&'a [f64], Angle)> {
    match params.len() {
        n if n == required => Ok((params, Angle::ZERO)),
        n if n == required + 1 => Ok((&params[..required], Angle::from_degrees(params[required]))),
        n => Err(count_error(shape, names, n)),
    }
}

impl RegionRecord {
    /// Build the region this record describes.
    pub fn to_region(&self) -> Result<PixelRegion> {
        Ok(PixelRegion {
            shape: self.to_shape()?,
            meta: self.meta.clone(),
            visual: self.visual.clone(),
        })
    }

    fn to_shape(&self) -> Result<Shape> {
        let name = resolve_shape(&self.shape).ok_or_else(|| RegionError::Parse {
            message: format!("Unknown shape: {}", self.shape),
            help: Some(format!(
                "Known shapes: {}",
                SHAPE_ALIASES
                    .iter()
                    .map(|(alias, _)| *alias)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        })?;

        if let Some(bad) = self.params.iter().find(|v| !v.is_finite()) {
            return Err(RegionError::Parse {
                message: format!("{name} has a non-finite parameter: {bad}"),
                help: None,
            });
        }

        let p = self.params.as_slice();
        let at = |i: usize| PixCoord::new(p[i], p[i + 1]);

        let shape = match name {
            "circle" => match p {
                [x, y, radius] => Shape::Circle(Circle {
                    center: PixCoord::new(*x, *y),
                    radius: *radius,
                }),
                _ => return Err(count_error(name, "x y radius", p.len())),
            },
            "ellipse" | "rectangle" => {
                let (p, angle) = with_angle(name, p, 4, "x y width height [angle]")?;
                let (center, width, height) = (PixCoord::new(p[0], p[1]), p[2], p[3]);
                if name == "ellipse" {
                    Shape::Ellipse(Ellipse {
                        center,
                        width,
                        height,
                        angle,
                    })
                } else {
                    Shape::Rectangle(Rectangle {
                        center,
                        width,
                        height,
                        angle,
                    })
                }
            }
            "polygon" => {
                if p.len() < 6 || p.len() % 2 != 0 {
                    return Err(count_error(name, "x0 y0 x1 y1 x2 y2 ...", p.len()));
                }
                Shape::Polygon(Polygon {
                    vertices: (0..p.len()).step_by(2).map(at).collect(),
                })
            }
            "regularpolygon" => {
                let (p, angle) = with_angle(name, p, 4, "x y nvertices radius [angle]")?;
                let n = p[2];
                let max = RegularPolygon::MAX_VERTICES;
                if n.fract() != 0.0 || n < 3.0 || n > max as f64 {
                    return Err(RegionError::Parse {
                        message: format!("regularpolygon needs an integer nvertices in 3..={max}, got {n}"),
                        help: Some("use a polygon for shapes with more vertices".to_string()),
                    });
                }
                Shape::RegularPolygon(RegularPolygon {
                    center: at(0),
                    nvertices: n as usize,
                    radius: p[3],
                    angle,
                })
            }
            "point" => match p {
                [x, y] => Shape::Point(Point {
                    center: PixCoord::new(*x, *y),
                }),
                _ => return Err(count_error(name, "x y", p.len())),
            },
            "line" => match p {
                [_, _, _, _] => Shape::Line(Line {
                    start: at(0),
                    end: at(2),
                }),
                _ => return Err(count_error(name, "x0 y0 x1 y1", p.len())),
            },
            "circleannulus" => match p {
                [x, y, inner, outer] => Shape::CircleAnnulus(CircleAnnulus {
                    center: PixCoord::new(*x, *y),
                    inner_radius: *inner,
                    outer_radius: *outer,
                }),
                _ => return Err(count_error(name, "x y inner_radius outer_radius", p.len())),
            },
            "ellipseannulus" | "rectangleannulus" => {
                let (p, angle) = with_angle(
                    name,
                    p,
                    6,
                    "x y inner_width inner_height outer_width outer_height [angle]",
                )?;
                let extent = AnnulusExtent {
                    center: at(0),
                    inner_width: p[2],
                    inner_height: p[3],
                    outer_width: p[4],
                    outer_height: p[5],
                    angle,
                };
                if name == "ellipseannulus" {
                    Shape::EllipseAnnulus(EllipseAnnulus(extent))
                } else {
                    Shape::RectangleAnnulus(RectangleAnnulus(extent))
                }
            }
            _ => {
                let op = self.op.ok_or_else(|| RegionError::Parse {
                    message: "compound region needs an `op`".to_string(),
                    help: Some("op is one of and, or, xor".to_string()),
                })?;
                match self.operands.as_slice() {
                    [first, second] => Shape::compound(first.to_shape()?, second.to_shape()?, op),
                    other => {
                        return Err(RegionError::Parse {
                            message: format!("compound region needs 2 operands, got {}", other.len()),
                            help: None,
                        })
                    }
                }
            }
        };

        Ok(shape)
    }

    /// Describe a region as a record with its canonical shape name.
    pub fn from_region(region: &PixelRegion) -> Self {
        Self {
            meta: region.meta.clone(),
            visual: region.visual.clone(),
            ..Self::from_shape(&region.shape)
        }
    }

    fn from_shape(shape: &Shape) -> Self {
        let (params, op, operands) = match shape {
            Shape::Circle(c) => (vec![c.center.x, c.center.y, c.radius], None, Vec::new()),
            Shape::Ellipse(Ellipse {
                center,
                width,
                height,
                angle,
            })
            | Shape::Rectangle(Rectangle {
                center,
                width,
                height,
                angle,
            }) => (
                vec![center.x, center.y, *width, *height, angle.degrees()],
                None,
                Vec::new(),
            ),
            Shape::Polygon(p) => (
                p.vertices.iter().flat_map(|v| [v.x, v.y]).collect(),
                None,
                Vec::new(),
            ),
            Shape::RegularPolygon(p) => (
                vec![
                    p.center.x,
                    p.center.y,
                    p.nvertices as f64,
                    p.radius,
                    p.angle.degrees(),
                ],
                None,
                Vec::new(),
            ),
            Shape::Point(p) => (vec![p.center.x, p.center.y], None, Vec::new()),
            Shape::Line(l) => (vec![l.start.x, l.start.y, l.end.x, l.end.y], None, Vec::new()),
            Shape::CircleAnnulus(a) => (
                vec![a.center.x, a.center.y, a.inner_radius, a.outer_radius],
                None,
                Vec::new(),
            ),
            Shape::EllipseAnnulus(EllipseAnnulus(e)) | Shape::RectangleAnnulus(RectangleAnnulus(e)) => (
                vec![
                    e.center.x,
                    e.center.y,
                    e.inner_width,
                    e.inner_height,
                    e.outer_width,
                    e.outer_height,
                    e.angle.degrees(),
                ],
                None,
                Vec::new(),
            ),
            Shape::Compound(c) => (
                Vec::new(),
                Some(c.op),
                vec![Self::from_shape(&c.region1), Self::from_shape(&c.region2)],
            ),
        };

        Self {
            shape: shape.name().to_string(),
            params,
            op,
            operands,
            meta: RegionMeta::new(),
            visual: RegionVisual::new(),
        }
    }
}
