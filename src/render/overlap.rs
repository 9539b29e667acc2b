//! Exact area of overlap between a pixel square and a shape.
//!
//! Circles and ellipses reduce to the area shared by a convex polygon and a
//! disk centred on the origin. That area is a sum over polygon edges of the
//! signed area common to the disk and the triangle spanned by the origin and
//! the edge. Rectangles clip the pixel square against the rectangle in its
//! own frame and take the shoelace area of what is left.

use crate::types::{signed_area, Ellipse, PixCoord, Rectangle};

fn cross(a: PixCoord, b: PixCoord) -> f64 {
    a.x * b.y - a.y * b.x
}

fn dot(a: PixCoord, b: PixCoord) -> f64 {
    a.x * b.x + a.y * b.y
}

fn lerp(a: PixCoord, b: PixCoord, t: f64) -> PixCoord {
    PixCoord::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Signed area of the circular sector from `a` to `b`.
fn sector(a: PixCoord, b: PixCoord, r2: f64) -> f64 {
    0.5 * r2 * cross(a, b).atan2(dot(a, b))
}

/// Signed area of disk(origin, r) intersected with triangle(origin, a, b).
fn triangle_disk(a: PixCoord, b: PixCoord, r: f64) -> f64 {
    let r2 = r * r;
    let a_in = dot(a, a) <= r2;
    let b_in = dot(b, b) <= r2;

    if a_in && b_in {
        return 0.5 * cross(a, b);
    }

    let d = b - a;
    let qa = dot(d, d);
    if qa == 0.0 {
        return 0.0;
    }
    let qb = dot(a, d);
    let qc = dot(a, a) - r2;
    let disc = qb * qb - qa * qc;

    if a_in {
        let t = (-qb + disc.max(0.0).sqrt()) / qa;
        let p = lerp(a, b, t);
        return 0.5 * cross(a, p) + sector(p, b, r2);
    }
    if b_in {
        let t = (-qb - disc.max(0.0).sqrt()) / qa;
        let p = lerp(a, b, t);
        return sector(a, p, r2) + 0.5 * cross(p, b);
    }

    if disc > 0.0 {
        let root = disc.sqrt();
        let t1 = (-qb - root) / qa;
        let t2 = (-qb + root) / qa;
        if t1 > 0.0 && t2 < 1.0 {
            let p1 = lerp(a, b, t1);
            let p2 = lerp(a, b, t2);
            return sector(a, p1, r2) + 0.5 * cross(p1, p2) + sector(p2, b, r2);
        }
    }
    sector(a, b, r2)
}

/// Area shared by a polygon and the disk of radius `r` at the origin.
pub fn polygon_disk_overlap(vertices: &[PixCoord], r: f64) -> f64 {
    let n = vertices.len();
    let total: f64 = (0..n)
        .map(|i| triangle_disk(vertices[i], vertices[(i + 1) % n], r))
        .sum();
    total.abs()
}

/// Corners of the unit pixel centred on `(x, y)`, counter-clockwise.
fn pixel_corners(x: f64, y: f64) -> [PixCoord; 4] {
    [
        PixCoord::new(x - 0.5, y - 0.5),
        PixCoord::new(x + 0.5, y - 0.5),
        PixCoord::new(x + 0.5, y + 0.5),
        PixCoord::new(x - 0.5, y + 0.5),
    ]
}

/// Fraction of pixel `(x, y)` covered by the circle.
pub fn circle_pixel(center: PixCoord, radius: f64, x: f64, y: f64) -> f64 {
    let corners = pixel_corners(x - center.x, y - center.y);
    polygon_disk_overlap(&corners, radius).min(1.0)
}

/// Fraction of pixel `(x, y)` covered by the ellipse.
///
/// The pixel is mapped into the frame where the ellipse is the unit circle;
/// areas there scale by `1 / (a b)`.
pub fn ellipse_pixel(ellipse: &Ellipse, x: f64, y: f64) -> f64 {
    let a = ellipse.width / 2.0;
    let b = ellipse.height / 2.0;
    let corners = pixel_corners(x, y).map(|p| {
        let local = p.to_local(ellipse.center, ellipse.angle);
        PixCoord::new(local.x / a, local.y / b)
    });
    (polygon_disk_overlap(&corners, 1.0) * a * b).min(1.0)
}

/// Keep the part of a convex polygon where `dist(p) <= 0`.
fn clip_half_plane<F>(polygon: &[PixCoord], dist: F) -> Vec<PixCoord>
where
    F: Fn(PixCoord) -> f64,
{
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let cur = polygon[i];
        let next = polygon[(i + 1) % n];
        let dc = dist(cur);
        let dn = dist(next);
        if dc <= 0.0 {
            out.push(cur);
        }
        if (dc <= 0.0) != (dn <= 0.0) {
            out.push(lerp(cur, next, dc / (dc - dn)));
        }
    }
    out
}

/// Fraction of pixel `(x, y)` covered by the rectangle.
pub fn rectangle_pixel(rect: &Rectangle, x: f64, y: f64) -> f64 {
    let hw = rect.width / 2.0;
    let hh = rect.height / 2.0;
    let square: Vec<PixCoord> = pixel_corners(x, y)
        .iter()
        .map(|p| p.to_local(rect.center, rect.angle))
        .collect();

    let clipped = clip_half_plane(&square, |p| p.x - hw);
    let clipped = clip_half_plane(&clipped, |p| -hw - p.x);
    let clipped = clip_half_plane(&clipped, |p| p.y - hh);
    let clipped = clip_half_plane(&clipped, |p| -hh - p.y);
    if clipped.len() < 3 {
        return 0.0;
    }
    signed_area(&clipped).abs().min(1.0)
}
