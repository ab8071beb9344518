//! The orchestrator: every high-level operation, built on the surface, the
//! session bookkeeping and the filling spaces.

use std::future::Future;
use std::rc::Rc;

use boardfx_config::BoardFxConfig;
use boardfx_dom::{Document, EasingFunction};
use boardfx_geometry::Transform2D;
use futures::future::{LocalBoxFuture, join_all};
use futures::join;
use tracing::{debug, info, warn};

use crate::effects::{self, Fade};
use crate::error::{AnimationError, Result};
use crate::geometry::{full_matrix, matrix_from_element_center};
use crate::host::{Game, ZoomProvider};
use crate::running::RunningAnimation;
use crate::settings::{
    AnimationSettings, Bump, FillingSpaces, ParallelAnimation, ResolvedSettings, SettingsLayers,
    SpaceKind,
};
use crate::surface::AnimationSurface;

/// How long floating labels stay on screen unless configured otherwise.
pub const DEFAULT_DISPLAY_DURATION_MS: f64 = 2000.0;

pub struct AnimationManager<D: Document, G: Game> {
    pub(crate) surface: AnimationSurface<D>,
    pub(crate) game: G,
    pub(crate) settings: AnimationSettings<D::Element>,
    pub(crate) display_duration_ms: f64,
    pub(crate) zoom: Option<Rc<dyn ZoomProvider>>,
}

impl<D: Document, G: Game> AnimationManager<D, G> {
    pub fn new(doc: D, game: G) -> Result<Self> {
        Self::with_settings(doc, game, AnimationSettings::new())
    }

    /// `settings` becomes the manager layer of every resolution.
    pub fn with_settings(
        doc: D,
        game: G,
        settings: AnimationSettings<D::Element>,
    ) -> Result<Self> {
        Ok(Self {
            surface: AnimationSurface::new(doc)?,
            game,
            settings,
            display_duration_ms: DEFAULT_DISPLAY_DURATION_MS,
            zoom: None,
        })
    }

    /// Build the manager layer from loaded configuration. The
    /// `instantaneous` flag belongs to the game and is not read here.
    pub fn from_config(doc: D, game: G, config: &BoardFxConfig) -> Result<Self> {
        let animations = &config.animations;
        let mut settings = AnimationSettings::new()
            .duration(animations.duration_ms)
            .z_index(animations.z_index)
            .filling_spaces(animations.filling_spaces.parse::<FillingSpaces>()?);
        if let Some(easing) = &animations.easing {
            let easing = easing.parse::<EasingFunction>().map_err(|err| {
                AnimationError::InvalidArgument(format!("configured easing: {err}"))
            })?;
            settings = settings.easing(easing);
        }
        if let Some(bump) = animations.bump {
            settings.bump = Some(Bump::Scale(bump));
        }

        info!(
            duration_ms = animations.duration_ms,
            filling_spaces = %animations.filling_spaces,
            "animation manager configured"
        );
        Ok(Self {
            surface: AnimationSurface::new(doc)?
                .with_timeout_margin(config.legacy.timeout_margin_ms),
            game,
            settings,
            display_duration_ms: config.display.duration_ms,
            zoom: None,
        })
    }

    pub fn document(&self) -> &D {
        self.surface.document()
    }

    pub fn surface(&self) -> &AnimationSurface<D> {
        &self.surface
    }

    pub fn settings(&self) -> &AnimationSettings<D::Element> {
        &self.settings
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Animations play only while the page is visible and the game is not
    /// replaying.
    pub fn animations_active(&self) -> bool {
        !self.document().is_hidden() && !self.game.instantaneous_mode()
    }

    pub fn set_zoom_manager(&mut self, provider: Rc<dyn ZoomProvider>) {
        self.zoom = Some(provider);
    }

    pub fn zoom_level(&self) -> Option<f64> {
        self.zoom.as_ref().map(|zoom| zoom.zoom())
    }

    /// Remove the overlay. Equivalent to dropping the manager.
    pub fn dispose(self) {
        debug!("animation manager disposed");
    }

    pub fn wait(&self, ms: f64) -> LocalBoxFuture<'static, ()> {
        self.document().sleep(ms)
    }

    pub(crate) fn resolve(
        &self,
        operation: &AnimationSettings<D::Element>,
        call: Option<&AnimationSettings<D::Element>>,
    ) -> ResolvedSettings<D::Element> {
        SettingsLayers::builtin()
            .layer(operation)
            .layer(&self.settings)
            .layer_opt(call)
            .resolve()
    }

    /// Slide `element` from where it is into `to`, before `before`.
    pub async fn slide_and_attach(
        &self,
        element: &D::Element,
        to: &D::Element,
        settings: Option<&AnimationSettings<D::Element>>,
        before: Option<&D::Element>,
    ) -> Result<()> {
        if !self.animations_active() {
            return self.surface.attach_to_element(element, to, before);
        }

        let resolved = self.resolve(
            &AnimationSettings::new().easing(EasingFunction::EaseInOut),
            settings,
        );
        let with_bump = resolved
            .clone()
            .with_leading_effects(effects::bump(resolved.bump));

        let mut session = self.surface.start_attach(element, to, before)?;
        debug!(?element, ?to, "slide and attach");
        let (grow, motion, shrink) = join!(
            self.surface.add_animated_space_if_necessary(
                element,
                Some(to),
                SpaceKind::Grow,
                &resolved,
                before,
            ),
            self.surface.animate_on_surface(
                &session.wrapper,
                session.from_matrix,
                session.to_matrix,
                &with_bump,
            ),
            self.surface.add_animated_space_if_necessary(
                element,
                session.from_parent.as_ref(),
                SpaceKind::Shrink,
                &resolved,
                session.from_next_sibling.as_ref(),
            ),
        );

        if let Ok(Some(space)) = &grow {
            session.set_destination_space(space.clone());
        }
        if let Ok(Some(space)) = &shrink {
            session.track(space.clone());
        }
        self.surface.end(&mut session)?;
        grow?;
        motion?;
        shrink?;
        Ok(())
    }

    /// Exchange the places of exactly two elements.
    pub async fn swap(
        &self,
        elements: &[D::Element],
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        let [a, b] = elements else {
            return Err(AnimationError::InvalidArgument(format!(
                "swap takes exactly 2 elements, got {}",
                elements.len()
            )));
        };
        let doc = self.document();
        let (Some(parent_a), Some(parent_b)) = (doc.parent(a), doc.parent(b)) else {
            return Err(AnimationError::InvalidArgument(
                "swapped elements must be attached".to_string(),
            ));
        };

        if !self.animations_active() {
            return self.swap_instantly(a, &parent_a, b, &parent_b);
        }

        let resolved = self.resolve(
            &AnimationSettings::new().easing(EasingFunction::EaseInOut),
            settings,
        );
        let resolved = resolved
            .clone()
            .with_leading_effects(effects::bump(resolved.bump));

        let matrix_a = full_matrix(doc, a);
        let matrix_b = full_matrix(doc, b);
        let space_a = self.surface.add_fixed_space(a, &parent_a, Some(a))?;
        let space_b = match self.surface.add_fixed_space(b, &parent_b, Some(b)) {
            Ok(space) => space,
            Err(err) => {
                doc.remove(&space_a);
                return Err(err);
            }
        };

        debug!(?a, ?b, "swap");
        let result = self
            .swap_on_surface(
                [
                    (a, matrix_a, matrix_b, &parent_b, &space_b),
                    (b, matrix_b, matrix_a, &parent_a, &space_a),
                ],
                &resolved,
            )
            .await;
        doc.remove(&space_a);
        doc.remove(&space_b);
        result
    }

    async fn swap_on_surface(
        &self,
        moves: [(
            &D::Element,
            Transform2D,
            Transform2D,
            &D::Element,
            &D::Element,
        ); 2],
        settings: &ResolvedSettings<D::Element>,
    ) -> Result<()> {
        let mut sessions = Vec::with_capacity(moves.len());
        for (element, from, to, parent, anchor) in moves {
            match self.surface.wrap(element) {
                Ok(wrapper) => {
                    let mut session = RunningAnimation::new(element.clone(), wrapper, from, to);
                    session.to_parent = Some(parent.clone());
                    session.to_space_wrapper = Some(anchor.clone());
                    sessions.push(session);
                }
                Err(err) => {
                    for session in &mut sessions {
                        if let Err(cleanup) = self.surface.end(session) {
                            warn!(%cleanup, "could not restore swapped element");
                        }
                    }
                    return Err(err);
                }
            }
        }

        let motions = join_all(sessions.iter().map(|session| {
            self.surface.animate_on_surface(
                &session.wrapper,
                session.from_matrix,
                session.to_matrix,
                settings,
            )
        }))
        .await;

        let mut result = Ok(());
        for session in &mut sessions {
            let ended = self.surface.end(session);
            result = result.and(ended);
        }
        for motion in motions {
            motion?;
        }
        result
    }

    /// Swap through temporary markers, so adjacent siblings and elements in
    /// different containers land in each other's exact slot.
    fn swap_instantly(
        &self,
        a: &D::Element,
        parent_a: &D::Element,
        b: &D::Element,
        parent_b: &D::Element,
    ) -> Result<()> {
        let doc = self.document();
        let marker_a = doc.create_element("div")?;
        let marker_b = doc.create_element("div")?;

        let moved = (|| {
            doc.insert_before(parent_a, &marker_a, Some(a))?;
            doc.insert_before(parent_b, &marker_b, Some(b))?;
            doc.insert_before(parent_b, a, Some(&marker_b))?;
            doc.insert_before(parent_a, b, Some(&marker_a))
        })();

        doc.remove(&marker_a);
        doc.remove(&marker_b);
        Ok(moved?)
    }

    /// Slide an element that already sits at its destination in from
    /// `from`'s center, or in place.
    pub async fn slide_in(
        &self,
        element: &D::Element,
        from: Option<&D::Element>,
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        self.slide_in_with(element, from, settings, None).await
    }

    pub async fn fade_in(
        &self,
        element: &D::Element,
        from: Option<&D::Element>,
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        self.slide_in_with(element, from, settings, Some(effects::fade(Fade::In)))
            .await
    }

    async fn slide_in_with(
        &self,
        element: &D::Element,
        from: Option<&D::Element>,
        settings: Option<&AnimationSettings<D::Element>>,
        leading: Option<ParallelAnimation<D::Element>>,
    ) -> Result<()> {
        if !self.animations_active() {
            return Ok(());
        }

        let resolved = self
            .resolve(
                &AnimationSettings::new().easing(EasingFunction::EaseOut),
                settings,
            )
            .with_leading_effects(leading);

        let mut session =
            self.surface
                .start_slide_in(element, from, resolved.center_options())?;
        debug!(?element, ?from, "slide in");
        let (grow, motion) = join!(
            self.surface.add_animated_space_if_necessary(
                element,
                session.to_parent.as_ref(),
                SpaceKind::Grow,
                &resolved,
                session.to_next_sibling.as_ref(),
            ),
            self.surface.animate_on_surface(
                &session.wrapper,
                session.from_matrix,
                session.to_matrix,
                &resolved,
            ),
        );

        if let Ok(Some(space)) = &grow {
            session.set_destination_space(space.clone());
        }
        self.surface.end(&mut session)?;
        grow?;
        motion?;
        Ok(())
    }

    /// Slide an element out to `to`'s center (or in place) and remove it.
    pub async fn slide_out_and_destroy(
        &self,
        element: &D::Element,
        to: Option<&D::Element>,
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        self.slide_out_with(
            element,
            to,
            &AnimationSettings::new().easing(EasingFunction::EaseInOut),
            settings,
            None,
        )
        .await
    }

    pub async fn fade_out_and_destroy(
        &self,
        element: &D::Element,
        to: Option<&D::Element>,
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        self.slide_out_with(
            element,
            to,
            &AnimationSettings::new().easing(EasingFunction::EaseIn),
            settings,
            Some(effects::fade(Fade::Out)),
        )
        .await
    }

    async fn slide_out_with(
        &self,
        element: &D::Element,
        to: Option<&D::Element>,
        operation: &AnimationSettings<D::Element>,
        settings: Option<&AnimationSettings<D::Element>>,
        leading: Option<ParallelAnimation<D::Element>>,
    ) -> Result<()> {
        if !self.animations_active() {
            self.document().remove(element);
            return Ok(());
        }

        let resolved = self
            .resolve(operation, settings)
            .with_leading_effects(leading);
        let mut session = self
            .surface
            .start_slide_out(element, to, resolved.center_options())?;
        debug!(?element, ?to, "slide out");
        let (shrink, motion) = join!(
            self.surface.add_animated_space_if_necessary(
                element,
                session.from_parent.as_ref(),
                SpaceKind::Shrink,
                &resolved,
                session.from_next_sibling.as_ref(),
            ),
            self.surface.animate_on_surface(
                &session.wrapper,
                session.from_matrix,
                session.to_matrix,
                &resolved,
            ),
        );

        if let Some(element) = session.release_element() {
            self.document().remove(&element);
        }
        if let Ok(Some(space)) = &shrink {
            session.track(space.clone());
        }
        self.surface.end(&mut session)?;
        shrink?;
        motion?;
        Ok(())
    }

    /// Fly a temporary element from `from`'s center to `to`'s center, then
    /// remove it.
    pub async fn slide_floating_element(
        &self,
        element: &D::Element,
        from: Option<&D::Element>,
        to: &D::Element,
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        if !self.animations_active() {
            self.document().remove(element);
            return Ok(());
        }
        let resolved = self.resolve(
            &AnimationSettings::new().easing(EasingFunction::EaseOut),
            settings,
        );
        let resolved = resolved
            .clone()
            .with_leading_effects(effects::bump(resolved.bump));
        self.float(element, from, to, &resolved).await
    }

    /// Show a temporary element over `to` for the duration. No bump unless
    /// the caller asks for one.
    pub async fn add_floating_element(
        &self,
        element: &D::Element,
        to: &D::Element,
        settings: Option<&AnimationSettings<D::Element>>,
    ) -> Result<()> {
        let floating = AnimationSettings::new().no_bump();
        let settings = match settings {
            Some(settings) => floating.overlay(settings),
            None => floating,
        };
        self.slide_floating_element(element, None, to, Some(&settings))
            .await
    }

    pub(crate) async fn float(
        &self,
        element: &D::Element,
        from: Option<&D::Element>,
        to: &D::Element,
        resolved: &ResolvedSettings<D::Element>,
    ) -> Result<()> {
        let doc = self.document();
        // Wrapping first gives a detached element its layout size.
        let wrapper = self.surface.wrap(element)?;
        let to_matrix =
            matrix_from_element_center(doc, to, resolved.ignore_scale, resolved.ignore_rotation);
        let from_matrix = from
            .map(|from| {
                matrix_from_element_center(
                    doc,
                    from,
                    resolved.ignore_scale,
                    resolved.ignore_rotation,
                )
            })
            .unwrap_or(to_matrix);

        let mut session = RunningAnimation::new(element.clone(), wrapper, from_matrix, to_matrix);
        debug!(?element, ?to, "floating element");
        let motion = self
            .surface
            .animate_on_surface(&session.wrapper, from_matrix, to_matrix, resolved)
            .await;

        if let Some(element) = session.release_element() {
            doc.remove(&element);
        }
        self.surface.end(&mut session)?;
        motion.map(|_| ())
    }

    /// Start every animation at once and wait for all of them.
    pub async fn play_parallel<F, Fut>(&self, animations: Vec<F>) -> Vec<Fut::Output>
    where
        F: FnOnce(usize) -> Fut,
        Fut: Future,
    {
        join_all(
            animations
                .into_iter()
                .enumerate()
                .map(|(index, animation)| animation(index)),
        )
        .await
    }

    /// Start each animation once the previous one has finished.
    pub async fn play_sequentially<F, Fut>(&self, animations: Vec<F>) -> Vec<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let mut outputs = Vec::with_capacity(animations.len());
        for animation in animations {
            outputs.push(animation().await);
        }
        outputs
    }

    /// Start animation `i` at `i * interval_ms` (a quarter of the default
    /// duration when `None`), regardless of earlier completions.
    pub async fn play_interval<F, Fut>(
        &self,
        animations: Vec<F>,
        interval_ms: Option<f64>,
    ) -> Vec<Fut::Output>
    where
        F: FnOnce(usize) -> Fut,
        Fut: Future,
    {
        let interval = interval_ms.unwrap_or_else(|| self.default_duration_ms() / 4.0);
        join_all(
            animations
                .into_iter()
                .enumerate()
                .map(|(index, animation)| {
                    let delay = (index > 0).then(|| self.wait(index as f64 * interval));
                    async move {
                        if let Some(delay) = delay {
                            delay.await;
                        }
                        animation(index).await
                    }
                }),
        )
        .await
    }

    fn default_duration_ms(&self) -> f64 {
        self.resolve(&AnimationSettings::new(), None).duration_ms()
    }
}

impl<D: Document, G: Game> std::fmt::Debug for AnimationManager<D, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationManager")
            .field("surface", self.surface.root())
            .field("settings", &self.settings)
            .field("display_duration_ms", &self.display_duration_ms)
            .field("zoom", &self.zoom_level())
            .finish()
    }
}
