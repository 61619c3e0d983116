//! Geometry value types shared across the crate.
//!
//! All coordinates are viewport-relative CSS pixels. Rects come from the host
//! via [`crate::element::ElementHandle::rect`] and are well-formed but may be
//! degenerate (zero area) for detached or hidden elements; validation rejects
//! those before a pin is created.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A viewport-relative bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Size of the rect.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point of the rect.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Point at the normalized position `(ratio_x, ratio_y)` within the rect,
    /// where `(0, 0)` is the top-left corner and `(1, 1)` the bottom-right.
    #[must_use]
    pub fn point_at(&self, ratio_x: f64, ratio_y: f64) -> Point {
        Point::new(self.left + self.width * ratio_x, self.top + self.height * ratio_y)
    }

    /// Whether either dimension is zero or negative.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A 2D affine transform in CSS `matrix(a, b, c, d, e, f)` order.
///
/// `(a, b)` and `(c, d)` are the columns of the linear part; `(e, f)` is the
/// translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2d {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix2d {
    /// The identity transform.
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Horizontal scale component. Skew is ignored.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.a.abs()
    }

    /// Vertical scale component. Skew is ignored.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.d.abs()
    }
}

/// Round to `digits` fractional digits.
///
/// Snapshot output only; internal math keeps full precision.
#[must_use]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
