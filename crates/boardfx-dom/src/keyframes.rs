//! Keyframe effects handed to the document's native animation primitive.
//!
//! A [`KeyframeEffect`] is the Rust shape of the `element.animate(keyframes,
//! options)` arguments: a list of property maps with optional offsets, and a
//! single [`Timing`].
//!
//! ```
//! use boardfx_dom::{Keyframe, KeyframeEffect, Timing};
//!
//! let bump = KeyframeEffect::new(
//!     vec![Keyframe::new().transform("translate(0, -30px) scale(1.2)").offset(0.5)],
//!     Timing::millis(500.0),
//! );
//! assert_eq!(bump.keyframes[0].get("transform"), Some("translate(0, -30px) scale(1.2)"));
//! ```

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;

/// One keyframe: CSS property/value pairs, optionally pinned to an offset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in `[0, 1]`. `None` lets the browser distribute frames evenly.
    pub offset: Option<f64>,
    /// Properties in camelCase keyframe notation (`zIndex`, not `z-index`).
    pub properties: Vec<(String, String)>,
}

impl Keyframe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.properties.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((property.to_string(), value)),
        }
        self
    }

    pub fn transform(self, value: impl Into<String>) -> Self {
        self.set("transform", value)
    }

    pub fn opacity(self, value: f64) -> Self {
        self.set("opacity", value.to_string())
    }

    pub fn width_px(self, value: f64) -> Self {
        self.set("width", format!("{value}px"))
    }

    pub fn height_px(self, value: f64) -> Self {
        self.set("height", format!("{value}px"))
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset.clamp(0.0, 1.0));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }
}

/// Fill behaviour once the effect completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    None,
    Forwards,
}

impl FillMode {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
        }
    }
}

/// Timing options shared by a primary animation and its parallel effects.
/// Iterations are always 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub duration_ms: f64,
    pub easing: EasingFunction,
    pub fill: FillMode,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration_ms: 500.0,
            easing: EasingFunction::EaseInOut,
            fill: FillMode::None,
        }
    }
}

impl Timing {
    pub fn millis(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeEffect {
    pub keyframes: Vec<Keyframe>,
    pub timing: Timing,
}

impl KeyframeEffect {
    pub fn new(keyframes: Vec<Keyframe>, timing: Timing) -> Self {
        Self { keyframes, timing }
    }

    /// A two-frame transform animation between two CSS transform strings.
    pub fn transform(from: impl Into<String>, to: impl Into<String>, timing: Timing) -> Self {
        Self::new(
            vec![Keyframe::new().transform(from), Keyframe::new().transform(to)],
            timing,
        )
    }

    /// Keyframe with the given explicit offset, if any.
    pub fn keyframe_at(&self, offset: f64) -> Option<&Keyframe> {
        self.keyframes
            .iter()
            .find(|k| k.offset.is_some_and(|o| (o - offset).abs() < 1e-9))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_property() {
        let kf = Keyframe::new().opacity(0.0).opacity(1.0);
        assert_eq!(kf.properties.len(), 1);
        assert_eq!(kf.get("opacity"), Some("1"));
    }

    #[test]
    fn test_offset_is_clamped() {
        assert_eq!(Keyframe::new().offset(1.5).offset, Some(1.0));
    }

    #[test]
    fn test_keyframe_at() {
        let effect = KeyframeEffect::new(
            vec![Keyframe::new().width_px(0.0).height_px(0.0).offset(1.0)],
            Timing::default(),
        );
        assert_eq!(effect.keyframe_at(1.0).and_then(|k| k.get("width")), Some("0px"));
        assert!(effect.keyframe_at(0.0).is_none());
    }
}
