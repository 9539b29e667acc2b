//! Pixel coordinates.
//!
//! `PixCoord` is a single `(x, y)` position. `PixelCoords` is what the
//! containment API accepts: either one point or a flat array of points, and
//! the two cases stay distinguishable at run time.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

use super::Angle;

/// A position in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixCoord {
    pub x: f64,
    pub y: f64,
}

impl PixCoord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn separation(self, other: PixCoord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate about `center`; positive angles turn counter-clockwise.
    pub fn rotate(self, center: PixCoord, angle: Angle) -> PixCoord {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        PixCoord::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
    }

    /// Express this position in a frame centred on `center` and turned by `angle`.
    pub(crate) fn to_local(self, center: PixCoord, angle: Angle) -> PixCoord {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        PixCoord::new(dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

impl Add for PixCoord {
    type Output = PixCoord;

    fn add(self, rhs: PixCoord) -> PixCoord {
        PixCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PixCoord {
    type Output = PixCoord;

    fn sub(self, rhs: PixCoord) -> PixCoord {
        PixCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for PixCoord {
    fn from((x, y): (f64, f64)) -> Self {
        PixCoord::new(x, y)
    }
}

impl fmt::Display for PixCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixCoord(x={}, y={})", self.x, self.y)
    }
}

/// One position or an array of positions.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelCoords {
    Scalar(PixCoord),
    Array(Vec<PixCoord>),
}

impl PixelCoords {
    /// Build an array from parallel x and y slices.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(RegionError::InvalidArgument {
                message: format!(
                    "x and y must have the same length (got {} and {})",
                    x.len(),
                    y.len()
                ),
                help: None,
            });
        }
        Ok(PixelCoords::Array(
            x.iter().zip(y).map(|(&x, &y)| PixCoord::new(x, y)).collect(),
        ))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, PixelCoords::Scalar(_))
    }

    /// The single position, or `TypeMismatch` for arrays.
    pub fn to_scalar(&self) -> Result<PixCoord> {
        match self {
            PixelCoords::Scalar(p) => Ok(*p),
            PixelCoords::Array(points) => Err(RegionError::TypeMismatch {
                message: format!("coord must be scalar, got an array of {}", points.len()),
                help: Some("use contains() for arrays of coordinates".to_string()),
            }),
        }
    }

    /// Apply a predicate to every position, keeping the scalar/array form.
    pub fn map<F>(&self, mut f: F) -> Containment
    where
        F: FnMut(PixCoord) -> bool,
    {
        match self {
            PixelCoords::Scalar(p) => Containment::Scalar(f(*p)),
            PixelCoords::Array(points) => Containment::Array(points.iter().map(|&p| f(p)).collect()),
        }
    }
}

impl From<PixCoord> for PixelCoords {
    fn from(p: PixCoord) -> Self {
        PixelCoords::Scalar(p)
    }
}

impl From<Vec<PixCoord>> for PixelCoords {
    fn from(points: Vec<PixCoord>) -> Self {
        PixelCoords::Array(points)
    }
}

/// Result of a containment test, shaped like its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Containment {
    Scalar(bool),
    Array(Vec<bool>),
}

impl Containment {
    /// Element-wise combination of two results of the same shape.
    pub(crate) fn zip_with<F>(self, other: Containment, f: F) -> Containment
    where
        F: Fn(bool, bool) -> bool,
    {
        match (self, other) {
            (Containment::Scalar(a), Containment::Scalar(b)) => Containment::Scalar(f(a, b)),
            (Containment::Array(a), Containment::Array(b)) => {
                Containment::Array(a.into_iter().zip(b).map(|(a, b)| f(a, b)).collect())
            }
            (a, _) => a,
        }
    }

    pub(crate) fn negate(self) -> Containment {
        match self {
            Containment::Scalar(v) => Containment::Scalar(!v),
            Containment::Array(v) => Containment::Array(v.into_iter().map(|b| !b).collect()),
        }
    }

    /// The scalar result, if this came from a scalar input.
    pub fn as_scalar(&self) -> Option<bool> {
        match self {
            Containment::Scalar(v) => Some(*v),
            Containment::Array(_) => None,
        }
    }

    /// All results as a slice-like vector (length one for scalars).
    pub fn to_vec(&self) -> Vec<bool> {
        match self {
            Containment::Scalar(v) => vec![*v],
            Containment::Array(v) => v.clone(),
        }
    }
}
