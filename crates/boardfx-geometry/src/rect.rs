use serde::{Deserialize, Serialize};

use crate::transform::Transform2D;

/// An axis-aligned rectangle, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.left + self.width / 2.0,
            self.top + self.height / 2.0,
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// Smallest rectangle containing all `points`.
    pub fn bounding(points: &[(f64, f64)]) -> Self {
        let Some(&(x0, y0)) = points.first() else {
            return Self::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for &(x, y) in &points[1..] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Bounding box of this rectangle after `transform`.
    pub fn transformed_bounds(&self, transform: &Transform2D) -> Self {
        let corners = [
            transform.apply_point(self.left, self.top),
            transform.apply_point(self.right(), self.top),
            transform.apply_point(self.left, self.bottom()),
            transform.apply_point(self.right(), self.bottom()),
        ];
        Self::bounding(&corners)
    }
}
