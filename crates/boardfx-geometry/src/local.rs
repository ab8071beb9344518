use serde::{Deserialize, Serialize};

use crate::css::{self, CssParseError};
use crate::transform::Transform2D;

/// The three computed-style inputs that make up one element's own matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    /// Value of `transform`.
    pub transform: Transform2D,
    /// Value of the individual `rotate` property, in radians.
    pub rotate: f64,
    /// Value of the non-standard `zoom` property.
    pub zoom: f64,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            transform: Transform2D::identity(),
            rotate: 0.0,
            zoom: 1.0,
        }
    }
}

impl LocalTransform {
    /// Build from the raw computed-style strings.
    pub fn parse(
        transform: &str,
        rotate: &str,
        zoom: &str,
    ) -> Result<Self, CssParseError> {
        Ok(Self {
            transform: css::parse_transform(transform)?,
            rotate: css::parse_rotate_property(rotate)?,
            zoom: css::parse_zoom(zoom)?,
        })
    }

    /// Rotation and scale contributed by this element relative to its parent:
    /// `zoom * transform * rotate`, with the transform's translation dropped.
    pub fn rotation_and_scale(&self) -> Transform2D {
        Transform2D::scale_uniform(self.zoom)
            .then(&self.transform.without_translation())
            .then(&Transform2D::rotate(self.rotate))
    }

    /// Full local matrix, translation included: what the element's box is
    /// multiplied by around its transform origin.
    pub fn matrix(&self) -> Transform2D {
        Transform2D::scale_uniform(self.zoom)
            .then(&self.transform)
            .then(&Transform2D::rotate(self.rotate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_is_ignored() {
        let local = LocalTransform::parse("translate(40px, 40px) scale(2)", "none", "normal").unwrap();
        assert!(local
            .rotation_and_scale()
            .approx_eq(&Transform2D::scale_uniform(2.0), 1e-9));
    }

    #[test]
    fn test_zoom_transform_rotate_order() {
        let local = LocalTransform::parse("scale(2, 1)", "90deg", "0.5").unwrap();
        let expected = Transform2D::scale_uniform(0.5)
            .then(&Transform2D::scale(2.0, 1.0))
            .then(&Transform2D::rotate_deg(90.0));
        assert!(local.rotation_and_scale().approx_eq(&expected, 1e-9));
    }

    #[test]
    fn test_default_is_identity() {
        assert!(LocalTransform::default().matrix().is_identity(1e-12));
    }
}
