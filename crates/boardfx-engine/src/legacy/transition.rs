use boardfx_dom::{Document, EasingFunction, PlaybackOutcome};
use futures::future::{Either, select};
use tracing::{debug, trace, warn};

use super::{LegacyAnimator, LegacySettings};
use crate::error::Result;

/// Inline styles overwritten for the duration of a transition.
struct SavedStyles {
    z_index: Option<String>,
    transition: Option<String>,
}

impl<D: Document> LegacyAnimator<'_, D> {
    pub async fn slide_animation(
        &self,
        element: &D::Element,
        settings: &LegacySettings<D::Element>,
    ) -> Result<bool> {
        if !self.should_animate() {
            return Ok(false);
        }
        let (x, y) = self.delta_coordinates(element, settings)?;
        let duration = settings.effective_duration_ms();
        let saved = self.lift(element, settings)?;

        self.doc.set_style(element, "transition", "")?;
        self.doc.set_style(
            element,
            "transform",
            &shifted_transform(x, y, settings.rotation_delta_deg, None),
        )?;
        if let Some(on_start) = &settings.on_start {
            on_start(element);
        }

        let final_transform = settings.final_transform.clone().unwrap_or_default();
        self.transition(
            element,
            &format!("transform {duration}ms linear"),
            &final_transform,
            duration,
        )
        .await?;

        self.restore(element, saved)?;
        if let Some(on_end) = &settings.on_end {
            on_end(element);
        }
        Ok(true)
    }

    /// Transition from the current position to the origin delta, scaled by
    /// `settings.scale`. The element stays there.
    pub async fn slide_to_animation(
        &self,
        element: &D::Element,
        settings: &LegacySettings<D::Element>,
    ) -> Result<bool> {
        if !self.should_animate() {
            return Ok(false);
        }
        let (x, y) = self.delta_coordinates(element, settings)?;
        let duration = settings.effective_duration_ms();
        let saved = self.lift(element, settings)?;

        let target = shifted_transform(
            x,
            y,
            settings.rotation_delta_deg,
            Some(settings.scale.unwrap_or(1.0)),
        );
        self.transition(
            element,
            &format!("transform {duration}ms linear"),
            &target,
            duration,
        )
        .await?;
        self.restore(element, saved)?;
        Ok(true)
    }

    /// Transition to the center of the viewport. The element stays there.
    /// With an origin hint, it first jumps back to its origin.
    pub async fn show_screen_center_animation(
        &self,
        element: &D::Element,
        settings: &LegacySettings<D::Element>,
    ) -> Result<bool> {
        if !self.should_animate() {
            return Ok(false);
        }
        if settings.has_origin() {
            let (x, y) = self.delta_coordinates(element, settings)?;
            self.doc.set_style(element, "transition", "")?;
            self.doc.set_style(
                element,
                "transform",
                &shifted_transform(x, y, settings.rotation_delta_deg, None),
            )?;
        }

        let (center_x, center_y) = self.layout_rect(element)?.center();
        let (width, height) = self.doc.viewport_size();
        let x = center_x - width / 2.0;
        let y = center_y - height / 2.0;
        let duration = settings.effective_duration_ms();
        let easing = settings.easing.unwrap_or(EasingFunction::Linear);
        let saved = self.lift(element, settings)?;

        self.transition(
            element,
            &format!("transform {duration}ms {easing}"),
            &shifted_transform(x, y, settings.rotation_delta_deg, None),
            duration,
        )
        .await?;
        self.restore(element, saved)?;
        Ok(true)
    }

    pub async fn pause_animation(&self, settings: &LegacySettings<D::Element>) -> Result<bool> {
        if !self.should_animate() {
            return Ok(false);
        }
        self.doc.sleep(settings.effective_duration_ms()).await;
        Ok(true)
    }

    /// Dump the element's geometry. Never counts as played.
    pub fn log_animation(
        &self,
        element: &D::Element,
        settings: &LegacySettings<D::Element>,
    ) -> bool {
        debug!(
            ?element,
            rect = ?self.doc.bounding_rect(element),
            transform = ?self.doc.style(element, "transform"),
            ?settings,
            "legacy animation state"
        );
        false
    }

    fn lift(
        &self,
        element: &D::Element,
        settings: &LegacySettings<D::Element>,
    ) -> Result<SavedStyles> {
        let saved = SavedStyles {
            z_index: self.doc.style(element, "z-index"),
            transition: self.doc.style(element, "transition"),
        };
        self.doc
            .set_style(element, "z-index", &settings.effective_z_index().to_string())?;
        Ok(saved)
    }

    fn restore(&self, element: &D::Element, saved: SavedStyles) -> Result<()> {
        self.doc.set_style(
            element,
            "z-index",
            saved.z_index.as_deref().unwrap_or(""),
        )?;
        self.doc.set_style(
            element,
            "transition",
            saved.transition.as_deref().unwrap_or(""),
        )?;
        Ok(())
    }

    /// Start a `transform` transition to `target` and wait for it. A
    /// visibility change or a cancelled transition jumps straight to
    /// `target`; a transition that never reports back is abandoned after
    /// the duration plus the timeout margin.
    async fn transition(
        &self,
        element: &D::Element,
        transition: &str,
        target: &str,
        duration_ms: f64,
    ) -> Result<PlaybackOutcome> {
        self.doc.set_style(element, "transition", transition)?;
        self.doc.set_style(element, "transform", target)?;
        trace!(?element, transition, target, "legacy transition");

        let token = self.doc.visibility_token();
        let limit = duration_ms + self.timeout_margin_ms;
        let outcome = match select(
            self.doc.transition_end(element, &token),
            self.doc.sleep(limit),
        )
        .await
        {
            Either::Left((outcome, _)) => outcome,
            Either::Right(_) => {
                warn!(?element, limit_ms = limit, "transition end never fired");
                PlaybackOutcome::TimedOut
            }
        };

        if outcome != PlaybackOutcome::Finished {
            self.doc.set_style(element, "transition", "")?;
            self.doc.set_style(element, "transform", target)?;
        }
        Ok(outcome)
    }
}

fn shifted_transform(x: f64, y: f64, rotation_deg: Option<f64>, scale: Option<f64>) -> String {
    let mut transform = format!(
        "translate({}px, {}px) rotate({}deg)",
        -x,
        -y,
        rotation_deg.unwrap_or(0.0)
    );
    if let Some(scale) = scale {
        transform.push_str(&format!(" scale({scale})"));
    }
    transform
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardfx_dom::MemoryDocument;
    use boardfx_geometry::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_shifted_transform() {
        assert_eq!(
            shifted_transform(10.0, -5.0, None, None),
            "translate(-10px, 5px) rotate(0deg)"
        );
        assert_eq!(
            shifted_transform(0.0, 0.0, Some(90.0), Some(0.5)),
            "translate(-0px, -0px) rotate(90deg) scale(0.5)"
        );
    }

    #[test]
    fn test_slide_restores_styles() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        doc.set_position(card, 300.0, 0.0);
        doc.set_style(&card, "z-index", "3").unwrap();
        let ended = Rc::new(Cell::new(false));
        let flag = ended.clone();
        let settings = LegacySettings::new()
            .from_rect(Rect::new(0.0, 0.0, 20.0, 20.0))
            .on_end(move |_| flag.set(true));

        let animator = LegacyAnimator::new(&doc);
        let played = doc
            .run(animator.slide_animation(&card, &settings))
            .unwrap()
            .unwrap();
        assert!(played);
        assert!(ended.get());
        assert_eq!(doc.now(), 500.0);
        assert_eq!(doc.style(&card, "z-index").as_deref(), Some("3"));
        assert_eq!(doc.style(&card, "transition"), None);
        assert_eq!(doc.style(&card, "transform"), None);
        assert_eq!(
            doc.transitions(),
            vec![(card, "transform 500ms linear".to_string())]
        );
    }

    #[test]
    fn test_stalled_transition_times_out() {
        let doc = MemoryDocument::new();
        doc.set_stall_transitions(true);
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        let settings = LegacySettings::new()
            .from_delta(100.0, 0.0)
            .final_transform("rotate(10deg)");

        let animator = LegacyAnimator::new(&doc);
        let played = doc
            .run(animator.slide_animation(&card, &settings))
            .unwrap()
            .unwrap();
        assert!(played);
        assert_eq!(doc.now(), 600.0);
        assert_eq!(
            doc.style(&card, "transform").as_deref(),
            Some("rotate(10deg)")
        );
        assert_eq!(doc.style(&card, "z-index"), None);
    }

    #[test]
    fn test_skipped_when_instantaneous() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        let settings = LegacySettings::new().from_delta(100.0, 0.0);
        let animator = LegacyAnimator::new(&doc).instantaneous(true);
        let played = pollster::block_on(animator.slide_animation(&card, &settings)).unwrap();
        assert!(!played);
        assert_eq!(doc.style(&card, "transform"), None);
    }

    #[test]
    fn test_log_never_plays() {
        let doc = MemoryDocument::new();
        let card = doc.create_in(doc.body(), "div", 20.0, 20.0);
        assert!(!LegacyAnimator::new(&doc).log_animation(&card, &LegacySettings::new()));
    }
}
