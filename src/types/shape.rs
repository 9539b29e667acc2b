//! Geometric shapes in pixel space.
//!
//! Each primitive carries its own parameters and answers the closed-form
//! questions: does it contain a point, what is its area, which integer
//! pixels bound it, and what does it look like after a rigid rotation.
//! `Shape` is the closed set of variants the rest of the crate dispatches on.
//!
//! Widths and heights are full extents before rotation; angles turn
//! counter-clockwise from the positive x axis.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

use super::bbox::MAX_PIXEL;
use super::{Angle, BoundingBox, PixCoord};

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(RegionError::InvalidArgument {
            message: format!("{name} must be a strictly positive finite number, got {value}"),
            help: None,
        });
    }
    if value > MAX_PIXEL {
        return Err(RegionError::InvalidArgument {
            message: format!("{name} {value} is larger than the pixel grid ({MAX_PIXEL})"),
            help: None,
        });
    }
    Ok(())
}

fn check_position(name: &str, p: PixCoord) -> Result<()> {
    let ok = |v: f64| v.is_finite() && v.abs() <= MAX_PIXEL;
    if ok(p.x) && ok(p.y) {
        Ok(())
    } else {
        Err(RegionError::invalid(format!(
            "{name} must be finite and within the pixel grid, got {p}"
        )))
    }
}

fn check_nested(what: &str, inner: f64, outer: f64) -> Result<()> {
    if inner < outer {
        Ok(())
    } else {
        Err(RegionError::InvalidArgument {
            message: format!("inner {what} ({inner}) must be smaller than outer {what} ({outer})"),
            help: Some("an annulus needs its inner shape strictly inside the outer one".to_string()),
        })
    }
}

/// A circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: PixCoord,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: PixCoord, radius: f64) -> Result<Self> {
        check_position("center", center)?;
        check_positive("radius", radius)?;
        Ok(Self { center, radius })
    }

    pub fn contains(&self, p: PixCoord) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_float(
            self.center.x - self.radius,
            self.center.x + self.radius,
            self.center.y - self.radius,
            self.center.y + self.radius,
        )
    }

    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            center: self.center.rotate(pivot, angle),
            radius: self.radius,
        }
    }
}

/// An ellipse; `width` lies along the x axis when `angle` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: PixCoord,
    pub width: f64,
    pub height: f64,
    pub angle: Angle,
}

impl Ellipse {
    pub fn new(center: PixCoord, width: f64, height: f64, angle: Angle) -> Result<Self> {
        check_position("center", center)?;
        check_positive("width", width)?;
        check_positive("height", height)?;
        Ok(Self {
            center,
            width,
            height,
            angle,
        })
    }

    pub fn contains(&self, p: PixCoord) -> bool {
        let local = p.to_local(self.center, self.angle);
        let u = 2.0 * local.x / self.width;
        let v = 2.0 * local.y / self.height;
        u * u + v * v <= 1.0
    }

    pub fn area(&self) -> f64 {
        PI / 4.0 * self.width * self.height
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let (sin, cos) = self.angle.sin_cos();
        let a = self.width / 2.0;
        let b = self.height / 2.0;
        let dx = (a * cos).hypot(b * sin);
        let dy = (a * sin).hypot(b * cos);
        BoundingBox::from_float(
            self.center.x - dx,
            self.center.x + dx,
            self.center.y - dy,
            self.center.y + dy,
        )
    }

    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            center: self.center.rotate(pivot, angle),
            angle: self.angle + angle,
            ..self.clone()
        }
    }
}

/// A rectangle; `width` lies along the x axis when `angle` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub center: PixCoord,
    pub width: f64,
    pub height: f64,
    pub angle: Angle,
}

impl Rectangle {
    pub fn new(center: PixCoord, width: f64, height: f64, angle: Angle) -> Result<Self> {
        check_position("center", center)?;
        check_positive("width", width)?;
        check_positive("height", height)?;
        Ok(Self {
            center,
            width,
            height,
            angle,
        })
    }

    pub fn contains(&self, p: PixCoord) -> bool {
        let local = p.to_local(self.center, self.angle);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corners in counter-clockwise order, starting bottom-left of the
    /// unrotated rectangle.
    pub fn corners(&self) -> [PixCoord; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .map(|(x, y)| (self.center + PixCoord::new(x, y)).rotate(self.center, self.angle))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        bounding_box_of(&self.corners())
    }

    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            center: self.center.rotate(pivot, angle),
            angle: self.angle + angle,
            ..self.clone()
        }
    }
}

/// A polygon given by its ordered vertices.
///
/// Containment uses the even-odd rule with half-open edges: an edge counts
/// as crossed when exactly one of its endpoints lies strictly above the test
/// row. Points on the left and bottom edges are therefore usually inside and
/// points on the right and top edges outside; collinear or repeated vertices
/// never produce a division by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<PixCoord>,
}

impl Polygon {
    pub fn new(vertices: Vec<PixCoord>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(RegionError::InvalidArgument {
                message: format!("a polygon needs at least 3 vertices, got {}", vertices.len()),
                help: None,
            });
        }
        for v in &vertices {
            check_position("vertex", *v)?;
        }
        Ok(Self { vertices })
    }

    /// Vertices given relative to `origin`.
    pub fn with_origin(vertices: Vec<PixCoord>, origin: PixCoord) -> Result<Self> {
        Self::new(vertices.into_iter().map(|v| v + origin).collect())
    }

    pub fn contains(&self, p: PixCoord) -> bool {
        let v = &self.vertices;
        let Some(mut j) = v.len().checked_sub(1) else {
            return false;
        };
        let mut inside = false;
        for i in 0..v.len() {
            let (a, b) = (v[i], v[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Shoelace area (always non-negative).
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        bounding_box_of(&self.vertices)
    }

    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v.rotate(pivot, angle)).collect(),
        }
    }
}

/// A regular polygon; the first vertex sits `angle` from the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularPolygon {
    pub center: PixCoord,
    pub nvertices: usize,
    pub radius: f64,
    pub angle: Angle,
}

impl RegularPolygon {
    /// Most vertices a regular polygon may have.
    pub const MAX_VERTICES: usize = 10_000;

    pub fn new(center: PixCoord, nvertices: usize, radius: f64, angle: Angle) -> Result<Self> {
        if !(3..=Self::MAX_VERTICES).contains(&nvertices) {
            return Err(RegionError::InvalidArgument {
                message: format!(
                    "nvertices must be between 3 and {}, got {nvertices}",
                    Self::MAX_VERTICES
                ),
                help: None,
            });
        }
        check_position("center", center)?;
        check_positive("radius", radius)?;
        Ok(Self {
            center,
            nvertices,
            radius,
            angle,
        })
    }

    /// Vertices in counter-clockwise order.
    pub fn vertices(&self) -> Vec<PixCoord> {
        let step = 2.0 * PI / self.nvertices as f64;
        (0..self.nvertices)
            .map(|k| {
                let theta = self.angle.radians() + step * k as f64;
                PixCoord::new(
                    self.center.x + self.radius * theta.cos(),
                    self.center.y + self.radius * theta.sin(),
                )
            })
            .collect()
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon {
            vertices: self.vertices(),
        }
    }

    /// Side length.
    pub fn side_length(&self) -> f64 {
        2.0 * self.radius * (PI / self.nvertices as f64).sin()
    }

    pub fn area(&self) -> f64 {
        0.5 * self.nvertices as f64 * self.radius * self.radius * (2.0 * PI / self.nvertices as f64).sin()
    }

    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            center: self.center.rotate(pivot, angle),
            angle: self.angle + angle,
            ..self.clone()
        }
    }
}

/// A single position. Points cover no area.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub center: PixCoord,
}

/// A line segment. Lines cover no area.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: PixCoord,
    pub end: PixCoord,
}

/// Circular annulus.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleAnnulus {
    pub center: PixCoord,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl CircleAnnulus {
    pub fn new(center: PixCoord, inner_radius: f64, outer_radius: f64) -> Result<Self> {
        check_position("center", center)?;
        check_positive("inner_radius", inner_radius)?;
        check_positive("outer_radius", outer_radius)?;
        check_nested("radius", inner_radius, outer_radius)?;
        Ok(Self {
            center,
            inner_radius,
            outer_radius,
        })
    }

    pub fn inner(&self) -> Circle {
        Circle {
            center: self.center,
            radius: self.inner_radius,
        }
    }

    pub fn outer(&self) -> Circle {
        Circle {
            center: self.center,
            radius: self.outer_radius,
        }
    }
}

/// Parameters shared by elliptical and rectangular annuli.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnulusExtent {
    pub center: PixCoord,
    pub inner_width: f64,
    pub inner_height: f64,
    pub outer_width: f64,
    pub outer_height: f64,
    pub angle: Angle,
}

impl AnnulusExtent {
    pub fn new(
        center: PixCoord,
        inner_width: f64,
        inner_height: f64,
        outer_width: f64,
        outer_height: f64,
        angle: Angle,
    ) -> Result<Self> {
        check_position("center", center)?;
        check_positive("inner_width", inner_width)?;
        check_positive("inner_height", inner_height)?;
        check_positive("outer_width", outer_width)?;
        check_positive("outer_height", outer_height)?;
        check_nested("width", inner_width, outer_width)?;
        check_nested("height", inner_height, outer_height)?;
        Ok(Self {
            center,
            inner_width,
            inner_height,
            outer_width,
            outer_height,
            angle,
        })
    }

    fn rotate(&self, pivot: PixCoord, angle: Angle) -> Self {
        Self {
            center: self.center.rotate(pivot, angle),
            angle: self.angle + angle,
            ..self.clone()
        }
    }
}

/// Elliptical annulus.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseAnnulus(pub AnnulusExtent);

impl EllipseAnnulus {
    pub fn inner(&self) -> Ellipse {
        let e = &self.0;
        Ellipse {
            center: e.center,
            width: e.inner_width,
            height: e.inner_height,
            angle: e.angle,
        }
    }

    pub fn outer(&self) -> Ellipse {
        let e = &self.0;
        Ellipse {
            center: e.center,
            width: e.outer_width,
            height: e.outer_height,
            angle: e.angle,
        }
    }
}

/// Rectangular annulus.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleAnnulus(pub AnnulusExtent);

impl RectangleAnnulus {
    pub fn inner(&self) -> Rectangle {
        let e = &self.0;
        Rectangle {
            center: e.center,
            width: e.inner_width,
            height: e.inner_height,
            angle: e.angle,
        }
    }

    pub fn outer(&self) -> Rectangle {
        let e = &self.0;
        Rectangle {
            center: e.center,
            width: e.outer_width,
            height: e.outer_height,
            angle: e.angle,
        }
    }
}

/// Boolean operator joining two regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
    Xor,
}

impl Combinator {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Combinator::And => a && b,
            Combinator::Or => a || b,
            Combinator::Xor => a != b,
        }
    }

    /// Fractional analogue on coverage values in `[0, 1]`.
    ///
    /// Exact for 0/1 inputs; for xor it is exact whenever one operand covers
    /// a subset of the other within the pixel, which holds for annuli.
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Combinator::And => a.min(b),
            Combinator::Or => a.max(b),
            Combinator::Xor => (a - b).abs(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
            Combinator::Xor => "xor",
        }
    }
}

/// Two shapes joined by a boolean operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub region1: Shape,
    pub region2: Shape,
    pub op: Combinator,
}

/// Every shape the crate knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Polygon(Polygon),
    RegularPolygon(RegularPolygon),
    Point(Point),
    Line(Line),
    CircleAnnulus(CircleAnnulus),
    EllipseAnnulus(EllipseAnnulus),
    RectangleAnnulus(RectangleAnnulus),
    Compound(Box<Compound>),
}

impl Shape {
    /// Join two shapes with a boolean operator.
    pub fn compound(region1: Shape, region2: Shape, op: Combinator) -> Shape {
        Shape::Compound(Box::new(Compound {
            region1,
            region2,
            op,
        }))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Rectangle(_) => "rectangle",
            Shape::Polygon(_) => "polygon",
            Shape::RegularPolygon(_) => "regularpolygon",
            Shape::Point(_) => "point",
            Shape::Line(_) => "line",
            Shape::CircleAnnulus(_) => "circleannulus",
            Shape::EllipseAnnulus(_) => "ellipseannulus",
            Shape::RectangleAnnulus(_) => "rectangleannulus",
            Shape::Compound(_) => "compound",
        }
    }

    /// The two operands and operator of an annulus or compound.
    ///
    /// Annuli produce `(outer, inner, Xor)`; the pair is built fresh on
    /// every call.
    pub fn components(&self) -> Option<(Shape, Shape, Combinator)> {
        match self {
            Shape::CircleAnnulus(a) => Some((
                Shape::Circle(a.outer()),
                Shape::Circle(a.inner()),
                Combinator::Xor,
            )),
            Shape::EllipseAnnulus(a) => Some((
                Shape::Ellipse(a.outer()),
                Shape::Ellipse(a.inner()),
                Combinator::Xor,
            )),
            Shape::RectangleAnnulus(a) => Some((
                Shape::Rectangle(a.outer()),
                Shape::Rectangle(a.inner()),
                Combinator::Xor,
            )),
            Shape::Compound(c) => Some((c.region1.clone(), c.region2.clone(), c.op)),
            _ => None,
        }
    }

    /// Geometric containment of a single position.
    pub fn contains(&self, p: PixCoord) -> bool {
        match self {
            Shape::Circle(s) => s.contains(p),
            Shape::Ellipse(s) => s.contains(p),
            Shape::Rectangle(s) => s.contains(p),
            Shape::Polygon(s) => s.contains(p),
            Shape::RegularPolygon(s) => s.to_polygon().contains(p),
            Shape::Point(_) | Shape::Line(_) => false,
            Shape::CircleAnnulus(a) => a.outer().contains(p) && !a.inner().contains(p),
            Shape::EllipseAnnulus(a) => a.outer().contains(p) && !a.inner().contains(p),
            Shape::RectangleAnnulus(a) => a.outer().contains(p) && !a.inner().contains(p),
            Shape::Compound(c) => c.op.apply(c.region1.contains(p), c.region2.contains(p)),
        }
    }

    /// Area in square pixels.
    ///
    /// Annuli subtract the inner area from the outer one. Compounds have no
    /// closed form and report `Unimplemented`.
    pub fn area(&self) -> Result<f64> {
        Ok(match self {
            Shape::Circle(s) => s.area(),
            Shape::Ellipse(s) => s.area(),
            Shape::Rectangle(s) => s.area(),
            Shape::Polygon(s) => s.area(),
            Shape::RegularPolygon(s) => s.area(),
            Shape::Point(_) | Shape::Line(_) => 0.0,
            Shape::CircleAnnulus(a) => a.outer().area() - a.inner().area(),
            Shape::EllipseAnnulus(a) => a.outer().area() - a.inner().area(),
            Shape::RectangleAnnulus(a) => a.outer().area() - a.inner().area(),
            Shape::Compound(_) => {
                return Err(RegionError::unimplemented(
                    "area of a compound region",
                    Some("sum a subpixels mask instead"),
                ))
            }
        })
    }

    /// Integer pixel box covering every pixel the shape can touch.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Circle(s) => s.bounding_box(),
            Shape::Ellipse(s) => s.bounding_box(),
            Shape::Rectangle(s) => s.bounding_box(),
            Shape::Polygon(s) => s.bounding_box(),
            Shape::RegularPolygon(s) => bounding_box_of(&s.vertices()),
            Shape::Point(s) => {
                BoundingBox::from_float(s.center.x, s.center.x, s.center.y, s.center.y)
            }
            Shape::Line(s) => bounding_box_of(&[s.start, s.end]),
            Shape::CircleAnnulus(a) => a.outer().bounding_box(),
            Shape::EllipseAnnulus(a) => a.outer().bounding_box(),
            Shape::RectangleAnnulus(a) => a.outer().bounding_box(),
            Shape::Compound(c) => c.region1.bounding_box().union(&c.region2.bounding_box()),
        }
    }

    /// A copy rotated counter-clockwise by `angle` about `pivot`.
    pub fn rotate(&self, pivot: PixCoord, angle: Angle) -> Shape {
        match self {
            Shape::Circle(s) => Shape::Circle(s.rotate(pivot, angle)),
            Shape::Ellipse(s) => Shape::Ellipse(s.rotate(pivot, angle)),
            Shape::Rectangle(s) => Shape::Rectangle(s.rotate(pivot, angle)),
            Shape::Polygon(s) => Shape::Polygon(s.rotate(pivot, angle)),
            Shape::RegularPolygon(s) => Shape::RegularPolygon(s.rotate(pivot, angle)),
            Shape::Point(s) => Shape::Point(Point {
                center: s.center.rotate(pivot, angle),
            }),
            Shape::Line(s) => Shape::Line(Line {
                start: s.start.rotate(pivot, angle),
                end: s.end.rotate(pivot, angle),
            }),
            Shape::CircleAnnulus(a) => Shape::CircleAnnulus(CircleAnnulus {
                center: a.center.rotate(pivot, angle),
                ..a.clone()
            }),
            Shape::EllipseAnnulus(a) => Shape::EllipseAnnulus(EllipseAnnulus(a.0.rotate(pivot, angle))),
            Shape::RectangleAnnulus(a) => {
                Shape::RectangleAnnulus(RectangleAnnulus(a.0.rotate(pivot, angle)))
            }
            Shape::Compound(c) => Shape::compound(
                c.region1.rotate(pivot, angle),
                c.region2.rotate(pivot, angle),
                c.op,
            ),
        }
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Ellipse> for Shape {
    fn from(s: Ellipse) -> Self {
        Shape::Ellipse(s)
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<Polygon> for Shape {
    fn from(s: Polygon) -> Self {
        Shape::Polygon(s)
    }
}

impl From<RegularPolygon> for Shape {
    fn from(s: RegularPolygon) -> Self {
        Shape::RegularPolygon(s)
    }
}

impl From<CircleAnnulus> for Shape {
    fn from(s: CircleAnnulus) -> Self {
        Shape::CircleAnnulus(s)
    }
}

impl From<EllipseAnnulus> for Shape {
    fn from(s: EllipseAnnulus) -> Self {
        Shape::EllipseAnnulus(s)
    }
}

impl From<RectangleAnnulus> for Shape {
    fn from(s: RectangleAnnulus) -> Self {
        Shape::RectangleAnnulus(s)
    }
}

/// Signed shoelace area; positive for counter-clockwise vertices.
pub(crate) fn signed_area(vertices: &[PixCoord]) -> f64 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    0.5 * sum
}

fn bounding_box_of(points: &[PixCoord]) -> BoundingBox {
    if points.is_empty() {
        return BoundingBox::from_float(0.0, 0.0, 0.0, 0.0);
    }
    let (mut xmin, mut xmax) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut ymin, mut ymax) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        xmin = xmin.min(p.x);
        xmax = xmax.max(p.x);
        ymin = ymin.min(p.y);
        ymax = ymax.max(p.y);
    }
    BoundingBox::from_float(xmin, xmax, ymin, ymax)
}
