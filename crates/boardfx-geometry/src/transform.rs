//! 2D affine matrix with the same layout as the browser's `DOMMatrix`.
//!
//! The six coefficients follow the CSS `matrix(a, b, c, d, e, f)` notation:
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! `(a, b)` and `(c, d)` are the x and y basis columns (rotation and scale),
//! `(e, f)` is the translation.
//!
//! # Usage
//!
//! ```
//! use boardfx_geometry::Transform2D;
//!
//! let m = Transform2D::translate(100.0, 50.0)
//!     .then(&Transform2D::rotate_deg(90.0))
//!     .then(&Transform2D::scale_uniform(2.0));
//!
//! // Only the translation survives once scale and rotation are stripped.
//! let pinned = m.without_scale().without_rotation();
//! assert!(pinned.approx_eq(&Transform2D::translate(100.0, 50.0), 1e-9));
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Below this norm a basis column is considered collapsed.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// A 2D affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// Translate X.
    pub e: f64,
    /// Translate Y.
    pub f: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity transform (no change).
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Create a translation transform.
    pub const fn translate(e: f64, f: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, e, f)
    }

    /// Create a uniform scale transform.
    pub const fn scale_uniform(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// Create a non-uniform scale transform.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Create a rotation transform from radians.
    pub fn rotate(angle_rad: f64) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Create a rotation transform from degrees.
    pub fn rotate_deg(angle_deg: f64) -> Self {
        Self::rotate(angle_deg * PI / 180.0)
    }

    /// Create a skew transform, angles in radians.
    pub fn skew(skew_x: f64, skew_y: f64) -> Self {
        Self::new(1.0, skew_y.tan(), skew_x.tan(), 1.0, 0.0, 0.0)
    }

    /// Compose this transform with another (this * other).
    ///
    /// The resulting transform applies `other` first, then `self`, which is
    /// what `DOMMatrix::multiply` does.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Apply this transform to a point.
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the x basis column.
    pub fn scale_x(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Length of the y basis column.
    pub fn scale_y(&self) -> f64 {
        self.c.hypot(self.d)
    }

    /// Rotation of the x basis column, in radians.
    pub fn rotation(&self) -> f64 {
        self.b.atan2(self.a)
    }

    pub fn translation(&self) -> (f64, f64) {
        (self.e, self.f)
    }

    /// Remove the scale part, keeping rotation and translation.
    ///
    /// Each basis column is divided by its own length. A collapsed column
    /// (zero-size element, `scale(0)`) cannot be normalised, so it is replaced
    /// by its unit axis instead of producing `NaN`.
    pub fn without_scale(&self) -> Self {
        let (a, b) = normalize_column(self.a, self.b, (1.0, 0.0));
        let (c, d) = normalize_column(self.c, self.d, (0.0, 1.0));
        Self {
            a,
            b,
            c,
            d,
            e: self.e,
            f: self.f,
        }
    }

    /// Remove the rotation part: the basis becomes `diag(scale_x, scale_y)`.
    pub fn without_rotation(&self) -> Self {
        Self::new(self.scale_x(), 0.0, 0.0, self.scale_y(), self.e, self.f)
    }

    /// Remove the translation part.
    pub fn without_translation(&self) -> Self {
        Self {
            e: 0.0,
            f: 0.0,
            ..*self
        }
    }

    /// Copy the diagonal scale coefficients (`a`, `d`) of `other`.
    pub fn with_scale_of(&self, other: &Self) -> Self {
        Self {
            a: other.a,
            d: other.d,
            ..*self
        }
    }

    /// Component-wise average of scale, rotation and translation.
    pub fn average(&self, other: &Self) -> Self {
        let scale_x = (self.scale_x() + other.scale_x()) / 2.0;
        let scale_y = (self.scale_y() + other.scale_y()) / 2.0;
        let rotation = (self.rotation() + other.rotation()) / 2.0;
        let (sin, cos) = rotation.sin_cos();

        Self {
            a: scale_x * cos,
            b: scale_x * sin,
            c: -scale_y * sin,
            d: scale_y * cos,
            e: (self.e + other.e) / 2.0,
            f: (self.f + other.f) / 2.0,
        }
    }

    /// Check if this is approximately an identity transform.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::identity(), epsilon)
    }

    /// True when the basis is the identity (translation may be anything).
    pub fn is_translation(&self, epsilon: f64) -> bool {
        self.without_translation().is_identity(epsilon)
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.c - other.c).abs() < epsilon
            && (self.d - other.d).abs() < epsilon
            && (self.e - other.e).abs() < epsilon
            && (self.f - other.f).abs() < epsilon
    }

    /// The CSS `matrix(...)` form used in keyframes and inline styles.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

fn normalize_column(x: f64, y: f64, fallback: (f64, f64)) -> (f64, f64) {
    let len = x.hypot(y);
    if len < DEGENERATE_EPSILON {
        tracing::warn!(x, y, "degenerate basis column, substituting unit axis");
        return fallback;
    }
    (x / len, y / len)
}

impl fmt::Display for Transform2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_eq_loose(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_identity() {
        let t = Transform2D::identity();
        assert!(t.is_identity(EPSILON));

        let (x, y) = t.apply_point(100.0, 200.0);
        assert!(approx_eq(x, 100.0));
        assert!(approx_eq(y, 200.0));
    }

    #[test]
    fn test_rotate_90() {
        let t = Transform2D::rotate_deg(90.0);
        let (x, y) = t.apply_point(1.0, 0.0);
        assert!(approx_eq_loose(x, 0.0));
        assert!(approx_eq_loose(y, 1.0));
    }

    #[test]
    fn test_then_applies_right_operand_first() {
        let t = Transform2D::translate(10.0, 0.0).then(&Transform2D::scale(2.0, 2.0));
        let (x, y) = t.apply_point(5.0, 5.0);
        assert!(approx_eq(x, 20.0));
        assert!(approx_eq(y, 10.0));

        let t = Transform2D::scale(2.0, 2.0).then(&Transform2D::translate(10.0, 0.0));
        let (x, _) = t.apply_point(5.0, 5.0);
        assert!(approx_eq(x, 30.0));
    }

    #[test]
    fn test_without_scale_keeps_rotation_and_translation() {
        let m = Transform2D::translate(5.0, 6.0)
            .then(&Transform2D::rotate_deg(30.0))
            .then(&Transform2D::scale(3.0, 2.0));
        let stripped = m.without_scale();
        let expected = Transform2D::translate(5.0, 6.0).then(&Transform2D::rotate_deg(30.0));
        assert!(stripped.approx_eq(&expected, 1e-9));
    }

    #[test]
    fn test_without_rotation_keeps_scale() {
        let m = Transform2D::rotate_deg(45.0).then(&Transform2D::scale(3.0, 2.0));
        let stripped = m.without_rotation();
        assert!(stripped.approx_eq(&Transform2D::scale(3.0, 2.0), 1e-9));
    }

    #[test]
    fn test_strip_operations_commute() {
        let samples = [
            Transform2D::new(2.0, 0.5, -0.3, 1.5, 10.0, 20.0),
            Transform2D::translate(-4.0, 8.0).then(&Transform2D::rotate_deg(170.0)),
            Transform2D::scale(0.25, 4.0).then(&Transform2D::skew(0.2, 0.0)),
        ];
        for m in samples {
            let one = m.without_scale().without_rotation();
            let two = m.without_rotation().without_scale();
            assert!(one.approx_eq(&two, 1e-9), "{one} != {two}");
            assert!(one.is_translation(1e-9));
            assert!(approx_eq(one.e, m.e) && approx_eq(one.f, m.f));
        }
    }

    #[test]
    fn test_degenerate_scale_uses_unit_axis() {
        let m = Transform2D::new(0.0, 0.0, 0.0, 0.0, 7.0, 8.0);
        let stripped = m.without_scale();
        assert!(stripped.approx_eq(&Transform2D::translate(7.0, 8.0), EPSILON));
        assert!(!stripped.a.is_nan());
    }

    #[test]
    fn test_with_scale_of_copies_diagonal() {
        let m = Transform2D::translate(1.0, 2.0);
        let scaled = m.with_scale_of(&Transform2D::scale(0.5, 0.75));
        assert!(approx_eq(scaled.a, 0.5));
        assert!(approx_eq(scaled.d, 0.75));
        assert!(approx_eq(scaled.e, 1.0));
    }

    #[test]
    fn test_average() {
        let m1 = Transform2D::translate(0.0, 0.0);
        let m2 = Transform2D::translate(100.0, 50.0)
            .then(&Transform2D::rotate_deg(90.0))
            .then(&Transform2D::scale_uniform(3.0));
        let avg = m1.average(&m2);
        let (x, y) = avg.translation();
        assert!(approx_eq_loose(x, 50.0));
        assert!(approx_eq_loose(y, 25.0));
        assert!(approx_eq_loose(avg.scale_x(), 2.0));
        assert!(approx_eq_loose(avg.scale_y(), 2.0));
        assert!(approx_eq_loose(avg.rotation(), PI / 4.0));
    }

    #[test]
    fn test_css_output() {
        let m = Transform2D::new(1.0, 0.0, 0.0, 1.0, 300.5, -2.0);
        assert_eq!(m.to_css(), "matrix(1, 0, 0, 1, 300.5, -2)");
    }
}
