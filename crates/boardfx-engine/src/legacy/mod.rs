//! CSS-transition animations.
//!
//! The older animation style moves the element itself: it is attached to
//! its destination first, shifted back to where it came from with an
//! inline `transform`, then transitioned to its final transform. No
//! surface, no wrappers.
//!
//! Animations are picked with [`LegacyAnimation`] and played by a
//! [`LegacyAnimator`] borrowed from the manager.

mod attach;
mod transition;

use std::fmt;

use boardfx_dom::{Document, EasingFunction};
use boardfx_geometry::Rect;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::error::{AnimationError, Result};
use crate::settings::Callback;
use crate::surface::DEFAULT_TIMEOUT_MARGIN_MS;

/// The transition animations.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyAnimation {
    /// From the origin to `final_transform`.
    Slide,
    /// From the current position to `translate(-dx, -dy)`, staying there.
    SlideTo,
    /// To the center of the viewport, staying there.
    ShowScreenCenter,
    /// Wait for the duration.
    Pause,
    /// Log the element's geometry.
    Log,
    /// Each animation in turn; origin hints only apply to the first.
    Cumulated(Vec<LegacyAnimation>),
}

#[derive(Clone)]
pub struct LegacySettings<E> {
    /// Default 500ms.
    pub duration_ms: Option<f64>,
    /// Cumulated scale of the element; measured deltas are divided by it.
    pub scale: Option<f64>,
    /// Default 10.
    pub z_index: Option<i32>,
    /// Rotation at the start of the slide, in degrees.
    pub rotation_delta_deg: Option<f64>,
    /// Transform the element ends with. Unset clears the inline transform.
    pub final_transform: Option<String>,
    /// Timing function of the screen-center transition. Default linear.
    pub easing: Option<EasingFunction>,
    pub from_delta: Option<(f64, f64)>,
    /// Viewport rect the element comes from, e.g. its own rect before it
    /// was re-attached.
    pub from_rect: Option<Rect>,
    pub from_element: Option<E>,
    pub on_start: Option<Callback<E>>,
    pub on_end: Option<Callback<E>>,
}

impl<E> Default for LegacySettings<E> {
    fn default() -> Self {
        Self {
            duration_ms: None,
            scale: None,
            z_index: None,
            rotation_delta_deg: None,
            final_transform: None,
            easing: None,
            from_delta: None,
            from_rect: None,
            from_element: None,
            on_start: None,
            on_end: None,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for LegacySettings<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacySettings")
            .field("duration_ms", &self.duration_ms)
            .field("scale", &self.scale)
            .field("z_index", &self.z_index)
            .field("rotation_delta_deg", &self.rotation_delta_deg)
            .field("final_transform", &self.final_transform)
            .field("easing", &self.easing)
            .field("from_delta", &self.from_delta)
            .field("from_rect", &self.from_rect)
            .field("from_element", &self.from_element)
            .finish_non_exhaustive()
    }
}

impl<E> LegacySettings<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn rotation_delta(mut self, degrees: f64) -> Self {
        self.rotation_delta_deg = Some(degrees);
        self
    }

    pub fn final_transform(mut self, transform: impl Into<String>) -> Self {
        self.final_transform = Some(transform.into());
        self
    }

    pub fn from_delta(mut self, x: f64, y: f64) -> Self {
        self.from_delta = Some((x, y));
        self
    }

    pub fn from_rect(mut self, rect: Rect) -> Self {
        self.from_rect = Some(rect);
        self
    }

    pub fn from_element(mut self, element: E) -> Self {
        self.from_element = Some(element);
        self
    }

    pub fn on_start(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_start = Some(std::rc::Rc::new(callback));
        self
    }

    pub fn on_end(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_end = Some(std::rc::Rc::new(callback));
        self
    }

    pub fn effective_duration_ms(&self) -> f64 {
        self.duration_ms.unwrap_or(500.0).max(0.0)
    }

    pub fn effective_z_index(&self) -> i32 {
        self.z_index.unwrap_or(10)
    }

    pub fn has_origin(&self) -> bool {
        self.from_delta.is_some() || self.from_rect.is_some() || self.from_element.is_some()
    }
}

/// Plays [`LegacyAnimation`]s against a document.
pub struct LegacyAnimator<'a, D: Document> {
    doc: &'a D,
    instantaneous: bool,
    timeout_margin_ms: f64,
}

impl<'a, D: Document> LegacyAnimator<'a, D> {
    pub fn new(doc: &'a D) -> Self {
        Self {
            doc,
            instantaneous: false,
            timeout_margin_ms: DEFAULT_TIMEOUT_MARGIN_MS,
        }
    }

    pub fn instantaneous(mut self, instantaneous: bool) -> Self {
        self.instantaneous = instantaneous;
        self
    }

    pub fn timeout_margin(mut self, margin_ms: f64) -> Self {
        self.timeout_margin_ms = margin_ms.max(0.0);
        self
    }

    /// Checked at the start of every animation.
    pub fn should_animate(&self) -> bool {
        !self.doc.is_hidden() && !self.instantaneous
    }

    /// How far the element has to be shifted back to appear at its origin,
    /// in the element's own (unscaled) pixels.
    pub fn delta_coordinates(
        &self,
        element: &D::Element,
        settings: &LegacySettings<D::Element>,
    ) -> Result<(f64, f64)> {
        let (mut x, mut y) = match settings.from_delta {
            Some(delta) => delta,
            None => {
                let origin = match (settings.from_rect, &settings.from_element) {
                    (Some(rect), _) => rect,
                    (None, Some(from)) => self.doc.bounding_rect(from),
                    (None, None) => {
                        return Err(AnimationError::InvalidArgument(
                            "from_delta, from_rect or from_element must be set".to_string(),
                        ));
                    }
                };
                let (dx, dy) = self.layout_rect(element)?.center();
                let (ox, oy) = origin.center();
                (dx - ox, dy - oy)
            }
        };

        if let Some(scale) = settings.scale.filter(|scale| *scale != 0.0) {
            x /= scale;
            y /= scale;
        }
        Ok((x, y))
    }

    /// Bounding rect with the inline transform cleared.
    fn layout_rect(&self, element: &D::Element) -> Result<Rect> {
        let original = self.doc.style(element, "transform");
        self.doc.set_style(element, "transform", "")?;
        let rect = self.doc.bounding_rect(element);
        self.doc
            .set_style(element, "transform", original.as_deref().unwrap_or(""))?;
        Ok(rect)
    }

    /// Play `animation`. `Ok(false)` when it was skipped.
    pub fn play<'b>(
        &'b self,
        animation: &'b LegacyAnimation,
        element: &'b D::Element,
        settings: &'b LegacySettings<D::Element>,
    ) -> LocalBoxFuture<'b, Result<bool>> {
        async move {
            match animation {
                LegacyAnimation::Slide => self.slide_animation(element, settings).await,
                LegacyAnimation::SlideTo => self.slide_to_animation(element, settings).await,
                LegacyAnimation::ShowScreenCenter => {
                    self.show_screen_center_animation(element, settings).await
                }
                LegacyAnimation::Pause => self.pause_animation(settings).await,
                LegacyAnimation::Log => Ok(self.log_animation(element, settings)),
                LegacyAnimation::Cumulated(list) => {
                    self.cumulated_animations(element, list, settings).await
                }
            }
        }
        .boxed_local()
    }

    /// Run `animations` one after the other. Later animations start from
    /// wherever the previous one left the element.
    pub async fn cumulated_animations(
        &self,
        element: &D::Element,
        animations: &[LegacyAnimation],
        settings: &LegacySettings<D::Element>,
    ) -> Result<bool> {
        let Some((first, rest)) = animations.split_first() else {
            return Err(AnimationError::InvalidArgument(
                "cumulated animations cannot be empty".to_string(),
            ));
        };

        let mut played = self.play(first, element, settings).await?;
        for animation in rest {
            let mut next = settings.clone();
            next.from_delta = None;
            next.from_element = None;
            next.from_rect = Some(self.doc.bounding_rect(element));
            played |= self.play(animation, element, &next).await?;
        }
        debug!(count = animations.len(), played, "cumulated animations");
        Ok(played)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardfx_dom::MemoryDocument;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_delta_requires_origin() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 10.0, 10.0);
        let err = LegacyAnimator::new(&doc)
            .delta_coordinates(&card, &LegacySettings::new())
            .unwrap_err();
        assert!(matches!(err, AnimationError::InvalidArgument(_)));
    }

    #[test]
    fn test_delta_from_rect_ignores_inline_transform() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        doc.set_position(card, 200.0, 100.0);
        doc.set_style(&card, "transform", "translate(50px, 0px)").unwrap();

        let settings = LegacySettings::new().from_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let (x, y) = LegacyAnimator::new(&doc)
            .delta_coordinates(&card, &settings)
            .unwrap();
        assert!(approx_eq(x, 200.0));
        assert!(approx_eq(y, 100.0));
        assert_eq!(
            doc.style(&card, "transform").as_deref(),
            Some("translate(50px, 0px)")
        );
    }

    #[test]
    fn test_delta_divided_by_scale() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        let settings = LegacySettings::new().from_delta(100.0, -40.0).scale(2.0);
        let (x, y) = LegacyAnimator::new(&doc)
            .delta_coordinates(&card, &settings)
            .unwrap();
        assert!(approx_eq(x, 50.0));
        assert!(approx_eq(y, -20.0));
    }

    #[test]
    fn test_should_animate() {
        let doc = MemoryDocument::new();
        assert!(LegacyAnimator::new(&doc).should_animate());
        assert!(!LegacyAnimator::new(&doc).instantaneous(true).should_animate());
        doc.set_hidden(true);
        assert!(!LegacyAnimator::new(&doc).should_animate());
    }

    #[test]
    fn test_cumulated_rejects_empty() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        let animator = LegacyAnimator::new(&doc);
        let err = pollster::block_on(animator.cumulated_animations(
            &card,
            &[],
            &LegacySettings::new(),
        ))
        .unwrap_err();
        assert!(matches!(err, AnimationError::InvalidArgument(_)));
    }
}
