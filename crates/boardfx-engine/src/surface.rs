//! The animation surface: an overlay at the page origin on which travelling
//! elements are re-parented, each inside a wrapper whose transform carries
//! the motion.

use boardfx_dom::{Document, ForceCompletion, KeyframeEffect, PlaybackOutcome};
use boardfx_geometry::Transform2D;
use futures::FutureExt;
use futures::future::{Either, join_all, select};
use tracing::{debug, warn};

use crate::error::Result;
use crate::settings::{ParallelTarget, ResolvedSettings};

pub const SURFACE_CLASS: &str = "boardfx-animation-surface";
pub const WRAPPER_CLASS: &str = "boardfx-animation-wrapper";

/// Extra time an animation gets before it is treated as lost.
pub const DEFAULT_TIMEOUT_MARGIN_MS: f64 = 100.0;

/// Result of one [`AnimationSurface::animate_on_surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceAnimation<E> {
    pub wrapper: E,
    pub from_matrix: Transform2D,
    pub to_matrix: Transform2D,
    /// Outcome of the primary (wrapper) animation.
    pub outcome: PlaybackOutcome,
}

/// Owns the overlay element. Dropping the surface removes it.
pub struct AnimationSurface<D: Document> {
    doc: D,
    root: D::Element,
    timeout_margin_ms: f64,
}

impl<D: Document> AnimationSurface<D> {
    pub fn new(doc: D) -> Result<Self> {
        let root = doc.create_element("div")?;
        doc.add_class(&root, SURFACE_CLASS)?;
        for (property, value) in [
            ("position", "absolute"),
            ("left", "0px"),
            ("top", "0px"),
            ("width", "100%"),
            ("height", "100%"),
            ("overflow", "visible"),
            ("pointer-events", "none"),
        ] {
            doc.set_style(&root, property, value)?;
        }
        doc.append_child(&doc.body(), &root)?;

        Ok(Self {
            doc,
            root,
            timeout_margin_ms: DEFAULT_TIMEOUT_MARGIN_MS,
        })
    }

    pub fn with_timeout_margin(mut self, margin_ms: f64) -> Self {
        self.timeout_margin_ms = margin_ms.max(0.0);
        self
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn root(&self) -> &D::Element {
        &self.root
    }

    pub fn timeout_margin_ms(&self) -> f64 {
        self.timeout_margin_ms
    }

    pub fn attach_to_element(
        &self,
        element: &D::Element,
        to: &D::Element,
        before: Option<&D::Element>,
    ) -> Result<()> {
        self.doc.insert_before(to, element, before)?;
        Ok(())
    }

    /// Move `element` onto the surface inside a new wrapper of the same
    /// size, centered on the surface origin.
    pub fn wrap(&self, element: &D::Element) -> Result<D::Element> {
        if !self.doc.is_connected(element) {
            // Detached elements have no layout size until inserted.
            self.doc.append_child(&self.root, element)?;
        }

        let wrapper = self.sized_like(element)?;
        self.doc.add_class(&wrapper, WRAPPER_CLASS)?;
        self.doc.set_style(&wrapper, "position", "absolute")?;
        let (width, height) = self.doc.offset_size(element);
        self.doc
            .set_style(&wrapper, "left", &format!("{}px", -width / 2.0))?;
        self.doc
            .set_style(&wrapper, "top", &format!("{}px", -height / 2.0))?;
        self.doc.append_child(&self.root, &wrapper)?;
        self.doc.append_child(&wrapper, element)?;
        Ok(wrapper)
    }

    /// Insert a new wrapper layer directly around the animated element, so a
    /// secondary effect can run without touching the wrapper's transform.
    pub fn add_wrapper_layer(&self, wrapper: &D::Element) -> Result<D::Element> {
        let element = self.element_in_wrapper(wrapper);
        let parent = self.doc.parent(&element).unwrap_or_else(|| wrapper.clone());
        let layer = self.sized_like(&element)?;
        self.doc.add_class(&layer, WRAPPER_CLASS)?;
        self.doc.insert_before(&parent, &layer, Some(&element))?;
        self.doc.append_child(&layer, &element)?;
        Ok(layer)
    }

    /// The animated element inside a possibly multi-layer wrapper.
    pub fn element_in_wrapper(&self, wrapper: &D::Element) -> D::Element {
        let mut current = wrapper.clone();
        while self.doc.has_class(&current, WRAPPER_CLASS) {
            match self.doc.first_child(&current) {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    /// Empty `div` with the layout size of `element`.
    pub(crate) fn sized_like(&self, element: &D::Element) -> Result<D::Element> {
        let (width, height) = self.doc.offset_size(element);
        let div = self.doc.create_element("div")?;
        self.doc.set_style(&div, "width", &format!("{width}px"))?;
        self.doc.set_style(&div, "height", &format!("{height}px"))?;
        Ok(div)
    }

    /// Play one keyframe effect. Finishes early on a visibility change and
    /// gives up after the duration plus the timeout margin.
    ///
    /// The animation observes its own token, so a lost animation only ends
    /// itself; the document's visibility token is never fired from here.
    pub async fn play(&self, element: &D::Element, effect: KeyframeEffect) -> PlaybackOutcome {
        let visibility = self.doc.visibility_token();
        let own = ForceCompletion::new();
        let limit = effect.timing.duration_ms + self.timeout_margin_ms;
        let mut animation = self.doc.animate(element, &effect, &own);
        let deadline = select(visibility.fired(), self.doc.sleep(limit));

        match select(&mut animation, deadline).await {
            Either::Left((outcome, _)) => outcome,
            Either::Right((Either::Left(_), _)) => {
                own.fire();
                animation
                    .now_or_never()
                    .unwrap_or(PlaybackOutcome::ForcedComplete)
            }
            Either::Right((Either::Right(_), _)) => {
                warn!(?element, limit_ms = limit, "animation never reported completion");
                own.fire();
                // Let the backend jump to the end state if it still can.
                let _ = animation.now_or_never();
                PlaybackOutcome::TimedOut
            }
        }
    }

    /// Move `wrapper` from `from` to `to`, running the parallel effects with
    /// the same timing. The wrapper ends pinned at `to`.
    pub async fn animate_on_surface(
        &self,
        wrapper: &D::Element,
        from: Transform2D,
        to: Transform2D,
        settings: &ResolvedSettings<D::Element>,
    ) -> Result<SurfaceAnimation<D::Element>> {
        let from_css = from.to_css();
        let to_css = to.to_css();
        self.doc.set_style(wrapper, "transform", &from_css)?;
        self.doc
            .set_style(wrapper, "z-index", &settings.z_index.to_string())?;

        let element = self.element_in_wrapper(wrapper);
        if let Some(on_start) = &settings.on_start {
            on_start(&element);
        }

        let mut plays = vec![(
            wrapper.clone(),
            KeyframeEffect::transform(from_css, to_css.clone(), settings.timing),
        )];
        for parallel in &settings.parallel_animations {
            let target = match &parallel.target {
                ParallelTarget::Wrapper => self
                    .doc
                    .first_child(wrapper)
                    .unwrap_or_else(|| wrapper.clone()),
                ParallelTarget::Intermediate => self.add_wrapper_layer(wrapper)?,
                ParallelTarget::Element => element.clone(),
                ParallelTarget::Explicit(target) => target.clone(),
            };
            plays.push((
                target,
                KeyframeEffect::new(parallel.keyframes.clone(), settings.timing),
            ));
        }

        debug!(
            ?wrapper,
            effects = plays.len(),
            duration_ms = settings.duration_ms(),
            "surface animation"
        );
        let outcomes = join_all(
            plays
                .into_iter()
                .map(|(target, effect)| async move { self.play(&target, effect).await }),
        )
        .await;

        self.doc.set_style(wrapper, "transform", &to_css)?;
        if let Some(on_end) = &settings.on_end {
            on_end(&element);
        }

        Ok(SurfaceAnimation {
            wrapper: wrapper.clone(),
            from_matrix: from,
            to_matrix: to,
            outcome: outcomes
                .first()
                .copied()
                .unwrap_or(PlaybackOutcome::Finished),
        })
    }
}

impl<D: Document> Drop for AnimationSurface<D> {
    fn drop(&mut self) {
        self.doc.remove(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects;
    use crate::settings::SettingsLayers;
    use boardfx_dom::MemoryDocument;

    #[test]
    fn test_surface_lifecycle() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        assert_eq!(doc.find_by_class(SURFACE_CLASS), vec![*surface.root()]);
        drop(surface);
        assert!(doc.find_by_class(SURFACE_CLASS).is_empty());
    }

    #[test]
    fn test_wrap_centers_on_origin() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let card = doc.create_in(doc.body(), "div", 40.0, 60.0);

        let wrapper = surface.wrap(&card).unwrap();
        assert_eq!(doc.parent(&card), Some(wrapper));
        assert_eq!(doc.style(&wrapper, "left").as_deref(), Some("-20px"));
        assert_eq!(doc.style(&wrapper, "top").as_deref(), Some("-30px"));
        assert_eq!(surface.element_in_wrapper(&wrapper), card);
    }

    #[test]
    fn test_wrap_detached_element() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let card = doc.create("div");
        doc.set_size(card, 10.0, 10.0);

        let wrapper = surface.wrap(&card).unwrap();
        assert!(doc.is_connected(&card));
        assert_eq!(doc.parent(&wrapper), Some(*surface.root()));
    }

    #[test]
    fn test_layers_nest_around_element() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        let wrapper = surface.wrap(&card).unwrap();

        let first = surface.add_wrapper_layer(&wrapper).unwrap();
        let second = surface.add_wrapper_layer(&wrapper).unwrap();
        assert_eq!(doc.parent(&first), Some(wrapper));
        assert_eq!(doc.parent(&second), Some(first));
        assert_eq!(doc.parent(&card), Some(second));
        assert_eq!(surface.element_in_wrapper(&wrapper), card);
    }

    #[test]
    fn test_animate_on_surface_pins_wrapper() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        let wrapper = surface.wrap(&card).unwrap();

        let settings = SettingsLayers::builtin()
            .resolve()
            .with_leading_effects(effects::bump(Some(1.2)));
        let from = Transform2D::translate(100.0, 100.0);
        let to = Transform2D::translate(300.0, 100.0);

        let result = doc
            .run(surface.animate_on_surface(&wrapper, from, to, &settings))
            .unwrap()
            .unwrap();
        assert_eq!(result.outcome, PlaybackOutcome::Finished);
        assert_eq!(doc.now(), 500.0);
        assert_eq!(doc.style(&wrapper, "transform"), Some(to.to_css()));
        assert_eq!(doc.style(&wrapper, "z-index").as_deref(), Some("10"));
        // wrapper motion plus the bump on its own layer
        assert_eq!(doc.animations().len(), 2);
        assert_eq!(doc.animations_on(wrapper).len(), 1);
    }

    #[test]
    fn test_parallel_targets_resolve_against_layers() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        let counter = doc.create_in(doc.body(), "div", 20.0, 20.0);
        let wrapper = surface.wrap(&card).unwrap();

        let settings = SettingsLayers::builtin().resolve().with_leading_effects([
            effects::fade(effects::Fade::In),
            effects::fade(effects::Fade::In).on(ParallelTarget::Wrapper),
            effects::fade(effects::Fade::In).on(ParallelTarget::Element),
            effects::fade(effects::Fade::In).on(ParallelTarget::Explicit(counter)),
        ]);
        doc.run(surface.animate_on_surface(
            &wrapper,
            Transform2D::identity(),
            Transform2D::translate(10.0, 0.0),
            &settings,
        ))
        .unwrap()
        .unwrap();

        // Intermediate adds a layer; Wrapper then lands on that layer, the
        // wrapper's first child, and never on the moving wrapper itself.
        let layer = doc.first_child(&wrapper).unwrap();
        assert_eq!(doc.parent(&card), Some(layer));
        assert_eq!(doc.animations_on(wrapper).len(), 1);
        assert_eq!(doc.animations_on(layer).len(), 2);
        assert_eq!(doc.animations_on(card).len(), 1);
        assert_eq!(doc.animations_on(counter).len(), 1);
        assert!(
            doc.animations()
                .iter()
                .all(|a| a.outcome == Some(PlaybackOutcome::Finished))
        );
    }

    #[test]
    fn test_lost_animation_does_not_end_later_ones() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let settings = SettingsLayers::<_>::builtin().resolve();
        let to = Transform2D::translate(50.0, 0.0);

        let lost_card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        let lost = surface.wrap(&lost_card).unwrap();
        doc.set_stall_animations(lost, true);
        let result = doc
            .run(surface.animate_on_surface(&lost, Transform2D::identity(), to, &settings))
            .unwrap()
            .unwrap();
        assert_eq!(result.outcome, PlaybackOutcome::TimedOut);
        assert_eq!(doc.now(), 600.0);
        assert_eq!(doc.style(&lost, "transform"), Some(to.to_css()));
        assert!(!doc.visibility_token().is_fired());

        let card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        let wrapper = surface.wrap(&card).unwrap();
        let result = doc
            .run(surface.animate_on_surface(&wrapper, Transform2D::identity(), to, &settings))
            .unwrap()
            .unwrap();
        assert_eq!(result.outcome, PlaybackOutcome::Finished);
        assert_eq!(doc.now(), 1100.0);
    }

    #[test]
    fn test_hidden_page_forces_completion() {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        let card = doc.create_in(doc.body(), "div", 40.0, 40.0);
        let wrapper = surface.wrap(&card).unwrap();
        let settings = SettingsLayers::<_>::builtin().resolve();

        let outcome = doc
            .run(async {
                let hide = async {
                    doc.sleep(100.0).await;
                    doc.set_hidden(true);
                };
                let (_, result) = futures::join!(
                    hide,
                    surface.animate_on_surface(
                        &wrapper,
                        Transform2D::identity(),
                        Transform2D::translate(50.0, 0.0),
                        &settings,
                    )
                );
                result
            })
            .unwrap()
            .unwrap();
        assert_eq!(outcome.outcome, PlaybackOutcome::ForcedComplete);
        assert_eq!(doc.now(), 100.0);
    }
}
