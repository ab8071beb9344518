use boardfx_dom::Document;
use tracing::debug;

use super::{LegacyAnimation, LegacyAnimator, LegacySettings};
use crate::error::Result;
use crate::host::Game;
use crate::manager::AnimationManager;

impl<D: Document, G: Game> AnimationManager<D, G> {
    /// Transition animator bound to this manager's document and game.
    pub fn legacy(&self) -> LegacyAnimator<'_, D> {
        LegacyAnimator::new(self.document())
            .instantaneous(self.game.instantaneous_mode())
            .timeout_margin(self.surface.timeout_margin_ms())
    }

    /// Caller settings, with the scale defaulting to the current zoom.
    fn legacy_settings(
        &self,
        settings: Option<&LegacySettings<D::Element>>,
    ) -> LegacySettings<D::Element> {
        let mut settings = settings.cloned().unwrap_or_default();
        if settings.scale.is_none() {
            settings.scale = self.zoom_level();
        }
        settings
    }

    /// Attach `element` to `to`, then play `animation` from where the
    /// element was.
    pub async fn attach_with_animation(
        &self,
        element: &D::Element,
        to: &D::Element,
        animation: &LegacyAnimation,
        settings: Option<&LegacySettings<D::Element>>,
        before: Option<&D::Element>,
    ) -> Result<bool> {
        let mut settings = self.legacy_settings(settings);
        settings.from_rect = Some(self.document().bounding_rect(element));
        self.surface.attach_to_element(element, to, before)?;
        debug!(?element, ?to, ?animation, "attach with transition");
        self.legacy().play(animation, element, &settings).await
    }

    pub async fn attach_with_slide_animation(
        &self,
        element: &D::Element,
        to: &D::Element,
        settings: Option<&LegacySettings<D::Element>>,
        before: Option<&D::Element>,
    ) -> Result<bool> {
        self.attach_with_animation(element, to, &LegacyAnimation::Slide, settings, before)
            .await
    }

    /// Show the element at the center of the screen for a moment on its way
    /// to `to`.
    pub async fn attach_with_show_to_screen_animation(
        &self,
        element: &D::Element,
        to: &D::Element,
        settings: Option<&LegacySettings<D::Element>>,
        before: Option<&D::Element>,
    ) -> Result<bool> {
        let animation = LegacyAnimation::Cumulated(vec![
            LegacyAnimation::ShowScreenCenter,
            LegacyAnimation::Pause,
            LegacyAnimation::Slide,
        ]);
        self.attach_with_animation(element, to, &animation, settings, before)
            .await
    }

    /// Slide an element that is already in place from `from`'s position.
    pub async fn slide_from_element(
        &self,
        element: &D::Element,
        from: &D::Element,
        settings: Option<&LegacySettings<D::Element>>,
    ) -> Result<bool> {
        let mut settings = self.legacy_settings(settings);
        settings.from_element = Some(from.clone());
        self.legacy()
            .play(&LegacyAnimation::Slide, element, &settings)
            .await
    }
}
