//! Filling spaces: placeholders that keep a container's layout stable while
//! an element travels, growing at the destination and shrinking at the
//! origin.

use boardfx_dom::{Document, Keyframe, KeyframeEffect};
use tracing::trace;

use crate::error::Result;
use crate::settings::{ResolvedSettings, SpaceKind};
use crate::surface::AnimationSurface;

pub const FILLING_SPACE_CLASS: &str = "boardfx-filling-space";

impl<D: Document> AnimationSurface<D> {
    /// Empty element with the layout size of `element`. Not inserted.
    pub fn create_filling_space(&self, element: &D::Element) -> Result<D::Element> {
        let space = self.sized_like(element)?;
        self.document().add_class(&space, FILLING_SPACE_CLASS)?;
        Ok(space)
    }

    /// Insert a full-size filling space into `parent`.
    pub fn add_fixed_space(
        &self,
        element: &D::Element,
        parent: &D::Element,
        before: Option<&D::Element>,
    ) -> Result<D::Element> {
        let space = self.create_filling_space(element)?;
        self.attach_to_element(&space, parent, before)?;
        Ok(space)
    }

    /// Insert a filling space and animate it between zero and the element's
    /// size. The space is inserted before the first suspension point and is
    /// left in place for the caller to remove.
    pub async fn add_animated_space(
        &self,
        element: &D::Element,
        parent: &D::Element,
        kind: SpaceKind,
        settings: &ResolvedSettings<D::Element>,
        before: Option<&D::Element>,
    ) -> Result<D::Element> {
        let space = self.add_fixed_space(element, parent, before)?;
        self.document()
            .add_class(&space, &format!("{FILLING_SPACE_CLASS}-{}", kind.as_str()))?;

        let collapsed = Keyframe::new()
            .width_px(0.0)
            .height_px(0.0)
            .offset(match kind {
                SpaceKind::Grow => 0.0,
                SpaceKind::Shrink => 1.0,
            });
        trace!(?space, kind = kind.as_str(), "filling space");
        self.play(&space, KeyframeEffect::new(vec![collapsed], settings.timing))
            .await;
        Ok(space)
    }

    /// [`Self::add_animated_space`] when `settings.filling_spaces` allows
    /// `kind` and there is a parent to fill.
    pub async fn add_animated_space_if_necessary(
        &self,
        element: &D::Element,
        parent: Option<&D::Element>,
        kind: SpaceKind,
        settings: &ResolvedSettings<D::Element>,
        before: Option<&D::Element>,
    ) -> Result<Option<D::Element>> {
        let Some(parent) = parent else {
            return Ok(None);
        };
        if !settings.filling_spaces.allows(kind) {
            return Ok(None);
        }
        self.add_animated_space(element, parent, kind, settings, before)
            .await
            .map(Some)
    }
}
