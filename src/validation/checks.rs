//! Validation checks for regions.
//!
//! Each check takes the loaded regions and returns a `ValidationResult`.
//! Regions read from files are not range-checked on load, so these checks
//! are where bad values surface.

use crate::types::{AnnulusExtent, Colour, PixelRegion, RegularPolygon, Shape, MAX_PIXEL};

use super::warning::{Diagnostic, RegionRef, ValidationResult};

/// The shape and, for compounds, every operand below it.
fn walk(shape: &Shape) -> Vec<&Shape> {
    match shape {
        Shape::Compound(c) => {
            let mut all = vec![shape];
            all.extend(walk(&c.region1));
            all.extend(walk(&c.region2));
            all
        }
        other => vec![other],
    }
}

/// Every shape of every region, paired with the region it belongs to.
fn shapes(regions: &[PixelRegion]) -> impl Iterator<Item = (RegionRef, &Shape)> {
    regions.iter().enumerate().flat_map(|(index, region)| {
        walk(&region.shape)
            .into_iter()
            .map(move |shape| (RegionRef::of(index, region), shape))
    })
}

fn usable_size(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= MAX_PIXEL
}

fn extent_sizes(e: &AnnulusExtent) -> Vec<(&'static str, f64)> {
    vec![
        ("inner_width", e.inner_width),
        ("inner_height", e.inner_height),
        ("outer_width", e.outer_width),
        ("outer_height", e.outer_height),
    ]
}

/// Check for zero, negative, non-finite or off-grid sizes.
pub fn check_dimensions(regions: &[PixelRegion]) -> ValidationResult {
    shapes(regions)
        .flat_map(|(at, shape)| {
            let sizes = match shape {
                Shape::Circle(c) => vec![("radius", c.radius)],
                Shape::Ellipse(e) => vec![("width", e.width), ("height", e.height)],
                Shape::Rectangle(r) => vec![("width", r.width), ("height", r.height)],
                Shape::RegularPolygon(p) => vec![("radius", p.radius)],
                Shape::CircleAnnulus(a) => vec![
                    ("inner_radius", a.inner_radius),
                    ("outer_radius", a.outer_radius),
                ],
                Shape::EllipseAnnulus(a) => extent_sizes(&a.0),
                Shape::RectangleAnnulus(a) => extent_sizes(&a.0),
                _ => Vec::new(),
            };
            sizes
                .into_iter()
                .filter(|(_, value)| !usable_size(*value))
                .map(move |(name, value)| {
                    Diagnostic::error(
                        "regions::validate::non-positive-size",
                        at.clone(),
                        format!("{name} {value} must be strictly positive and at most {MAX_PIXEL}"),
                    )
                    .with_help("Use a positive finite size")
                })
        })
        .collect()
}

/// Check for polygons that enclose nothing or repeat vertices.
pub fn check_polygons(regions: &[PixelRegion]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (at, shape) in shapes(regions) {
        match shape {
            Shape::Polygon(p) if p.vertices.len() < 3 => {
                result.push(Diagnostic::error(
                    "regions::validate::degenerate-polygon",
                    at,
                    format!("needs at least 3 vertices, has {}", p.vertices.len()),
                ));
            }
            Shape::Polygon(p) => {
                if p.area() == 0.0 {
                    result.push(
                        Diagnostic::error(
                            "regions::validate::degenerate-polygon",
                            at.clone(),
                            "vertices enclose no area",
                        )
                        .with_help("Check for collinear vertices"),
                    );
                }

                let n = p.vertices.len();
                let repeats = (0..n)
                    .filter(|&i| p.vertices[i] == p.vertices[(i + 1) % n])
                    .count();
                if repeats > 0 {
                    result.push(
                        Diagnostic::warning(
                            "regions::validate::repeated-vertex",
                            at,
                            format!("{repeats} repeated consecutive vertex(es)"),
                        )
                        .with_help("Remove the duplicate vertices"),
                    );
                }
            }
            Shape::RegularPolygon(p)
                if !(3..=RegularPolygon::MAX_VERTICES).contains(&p.nvertices) =>
            {
                result.push(Diagnostic::error(
                    "regions::validate::degenerate-polygon",
                    at,
                    format!(
                        "needs between 3 and {} vertices, has {}",
                        RegularPolygon::MAX_VERTICES,
                        p.nvertices
                    ),
                ));
            }
            _ => {}
        }
    }

    result
}

/// Check that every annulus has its inner shape strictly inside the outer.
pub fn check_annuli(regions: &[PixelRegion]) -> ValidationResult {
    shapes(regions)
        .flat_map(|(at, shape)| {
            let pairs = match shape {
                Shape::CircleAnnulus(a) => vec![("radius", a.inner_radius, a.outer_radius)],
                Shape::EllipseAnnulus(a) => vec![
                    ("width", a.0.inner_width, a.0.outer_width),
                    ("height", a.0.inner_height, a.0.outer_height),
                ],
                Shape::RectangleAnnulus(a) => vec![
                    ("width", a.0.inner_width, a.0.outer_width),
                    ("height", a.0.inner_height, a.0.outer_height),
                ],
                _ => Vec::new(),
            };
            pairs
                .into_iter()
                .filter(|(_, inner, outer)| inner >= outer)
                .map(move |(what, inner, outer)| {
                    Diagnostic::error(
                        "regions::validate::annulus-not-nested",
                        at.clone(),
                        format!("inner {what} {inner} is not smaller than outer {what} {outer}"),
                    )
                    .with_help("Swap the inner and outer values")
                })
        })
        .collect()
}

/// Check that `color` values name a colour.
pub fn check_colours(regions: &[PixelRegion]) -> ValidationResult {
    regions
        .iter()
        .enumerate()
        .filter_map(|(index, region)| {
            let value = region.visual.get("color")?;
            let known = value.as_str().is_some_and(|s| Colour::parse(s).is_ok());
            (!known).then(|| {
                Diagnostic::warning(
                    "regions::validate::unknown-colour",
                    RegionRef::of(index, region),
                    format!("unknown colour {value}"),
                )
                .with_help("Use a colour name such as 'green' or a hex value like #00ff00")
            })
        })
        .collect()
}

/// Check for masks larger than the pixel budget.
pub fn check_mask_sizes(regions: &[PixelRegion], max_mask_pixels: u64) -> ValidationResult {
    regions
        .iter()
        .enumerate()
        .filter(|(_, region)| {
            // check_polygons reports these; their vertex lists are not built
            !walk(&region.shape).into_iter().any(|s| {
                matches!(s, Shape::RegularPolygon(p) if p.nvertices > RegularPolygon::MAX_VERTICES)
            })
        })
        .filter_map(|(index, region)| {
            let pixels = region.bounding_box().pixel_count();
            (pixels > max_mask_pixels).then(|| {
                Diagnostic::warning(
                    "regions::validate::large-mask",
                    RegionRef::of(index, region),
                    format!("mask would cover {pixels} pixels (limit {max_mask_pixels})"),
                )
                .with_help("Raise max_mask_pixels in regions.yaml if this is intended")
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Angle, AnnulusExtent, Circle, CircleAnnulus, Combinator, EllipseAnnulus, PixCoord, Polygon,
        RegionMeta, RegionVisual,
    };

    fn pc(x: f64, y: f64) -> PixCoord {
        PixCoord::new(x, y)
    }

    #[test]
    fn test_negative_radius() {
        let region = PixelRegion::new(Shape::Circle(Circle {
            center: pc(0.0, 0.0),
            radius: -2.0,
        }));
        let result = check_dimensions(&[region]);
        assert_eq!(result.error_count(), 1);
        let d = result.iter().next().unwrap();
        assert_eq!(d.code, "regions::validate::non-positive-size");
        assert_eq!(d.region.index, 0);
        assert!(d.to_string().starts_with("Region 1 (circle): radius -2"), "{d}");
    }

    #[test]
    fn test_dimensions_inside_compound() {
        let bad = Shape::Circle(Circle {
            center: pc(0.0, 0.0),
            radius: 0.0,
        });
        let good = Shape::from(Circle::new(pc(0.0, 0.0), 1.0).unwrap());
        let region = PixelRegion::new(Shape::compound(good, bad, Combinator::Or));
        assert!(check_dimensions(&[region]).has_errors());
    }

    #[test]
    fn test_collinear_polygon() {
        let region = PixelRegion::new(Shape::Polygon(Polygon {
            vertices: vec![pc(0.0, 0.0), pc(1.0, 1.0), pc(2.0, 2.0)],
        }));
        let result = check_polygons(&[region]);
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_repeated_vertex_warns() {
        let region = PixelRegion::new(Shape::Polygon(Polygon {
            vertices: vec![pc(0.0, 0.0), pc(2.0, 0.0), pc(2.0, 0.0), pc(0.0, 2.0)],
        }));
        let result = check_polygons(&[region]);
        assert!(!result.has_errors());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_annulus_not_nested() {
        let region = PixelRegion::new(Shape::CircleAnnulus(CircleAnnulus {
            center: pc(0.0, 0.0),
            inner_radius: 5.0,
            outer_radius: 3.0,
        }));
        assert_eq!(check_annuli(&[region]).error_count(), 1);

        let extent = AnnulusExtent {
            center: pc(0.0, 0.0),
            inner_width: 2.0,
            inner_height: 6.0,
            outer_width: 4.0,
            outer_height: 4.0,
            angle: Angle::ZERO,
        };
        let region = PixelRegion::new(Shape::EllipseAnnulus(EllipseAnnulus(extent)));
        assert_eq!(check_annuli(&[region]).error_count(), 1);
    }

    #[test]
    fn test_unknown_colour() {
        let circle = Circle::new(pc(0.0, 0.0), 1.0).unwrap();
        let good = PixelRegion::new(circle.clone())
            .with_visual(RegionVisual::new().with("color", "cyan").unwrap());
        let bad = PixelRegion::new(circle)
            .with_visual(RegionVisual::new().with("color", "sparkly").unwrap())
            .with_meta(RegionMeta::new().with("label", "m31").unwrap());

        let result = check_colours(&[good, bad]);
        assert_eq!(result.warning_count(), 1);
        let d = result.iter().next().unwrap();
        assert_eq!(d.region.label.as_deref(), Some("m31"));
        assert_eq!(d.to_string(), "Region 2 'm31' (circle): unknown colour sparkly");
    }

    #[test]
    fn test_huge_regions_warn_without_overflow() {
        let huge = PixelRegion::new(Circle::new(pc(0.0, 0.0), 3e9).unwrap());
        let result = check_mask_sizes(&[huge], 16_777_216);
        assert_eq!(result.warning_count(), 1);

        // loaded from a file, so no constructor clamps it
        let enormous = PixelRegion::new(Shape::Circle(Circle {
            center: pc(0.0, 0.0),
            radius: 1e300,
        }));
        assert_eq!(check_mask_sizes(&[enormous.clone()], u64::MAX - 1).warning_count(), 1);
        assert_eq!(check_dimensions(&[enormous]).error_count(), 1);
    }

    #[test]
    fn test_regular_polygon_vertex_limit() {
        let ngon = PixelRegion::new(Shape::RegularPolygon(RegularPolygon {
            center: pc(0.0, 0.0),
            nvertices: 1_000_000_000_000,
            radius: 1.0,
            angle: Angle::ZERO,
        }));
        assert_eq!(check_polygons(&[ngon.clone()]).error_count(), 1);
        assert!(check_mask_sizes(&[ngon], 1).is_ok());
    }

    #[test]
    fn test_large_mask() {
        let region = PixelRegion::new(Circle::new(pc(0.0, 0.0), 100.0).unwrap());
        assert_eq!(check_mask_sizes(&[region.clone()], 1_000).warning_count(), 1);
        assert!(check_mask_sizes(&[region], 1_000_000).is_ok());
    }
}
