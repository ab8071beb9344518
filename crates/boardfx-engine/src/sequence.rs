//! Multi-leg attach: the element travels through intermediate positions
//! before landing at its destination.

use boardfx_dom::Document;
use boardfx_geometry::Transform2D;
use futures::join;
use tracing::debug;

use crate::error::{AnimationError, Result};
use crate::geometry::{matrix_from_element_center, screen_center_matrix};
use crate::host::Game;
use crate::manager::AnimationManager;
use crate::running::RunningAnimation;
use crate::settings::{AnimationSettings, ResolvedSettings, SpaceKind};

/// Where one leg of a sequence goes.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceLeg<E> {
    /// Center of the visible viewport.
    ScreenCenter,
    /// Center of another element, its scale and rotation stripped per the
    /// leg settings.
    OverElement(E),
    Matrix(Transform2D),
    /// Hold the current position for the given milliseconds.
    Pause(f64),
    /// The element's final slot.
    Destination,
}

/// Settings for a sequence: none, one set shared by all legs, or one set
/// per leg.
#[derive(Debug)]
pub enum LegSettings<'a, E> {
    Default,
    Shared(&'a AnimationSettings<E>),
    PerLeg(&'a [AnimationSettings<E>]),
}

impl<E> Clone for LegSettings<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for LegSettings<'_, E> {}

impl<E> Default for LegSettings<'_, E> {
    fn default() -> Self {
        Self::Default
    }
}

impl<'a, E> LegSettings<'a, E> {
    fn for_leg(&self, index: usize) -> Option<&'a AnimationSettings<E>> {
        match *self {
            Self::Default => None,
            Self::Shared(settings) => Some(settings),
            Self::PerLeg(list) => list.get(index),
        }
    }
}

impl<D: Document, G: Game> AnimationManager<D, G> {
    /// Attach `element` to `to` through `legs`. The shrinking space at the
    /// origin runs with the first leg only, the growing space at the
    /// destination with the last leg only.
    pub async fn sequence_animations_attach(
        &self,
        element: &D::Element,
        to: &D::Element,
        legs: &[SequenceLeg<D::Element>],
        settings: LegSettings<'_, D::Element>,
        before: Option<&D::Element>,
    ) -> Result<()> {
        if legs.is_empty() {
            return Err(AnimationError::InvalidArgument(
                "a sequence needs at least one leg".to_string(),
            ));
        }
        if let LegSettings::PerLeg(list) = &settings {
            if list.len() != legs.len() {
                return Err(AnimationError::InvalidArgument(format!(
                    "{} legs but {} settings",
                    legs.len(),
                    list.len()
                )));
            }
        }

        if !self.animations_active() {
            return self.surface.attach_to_element(element, to, before);
        }

        let resolved: Vec<ResolvedSettings<D::Element>> = legs
            .iter()
            .enumerate()
            .map(|(index, leg)| {
                let mut resolved = self.resolve(&AnimationSettings::new(), settings.for_leg(index));
                if let SequenceLeg::Pause(ms) = leg {
                    resolved.timing.duration_ms = ms.max(0.0);
                }
                resolved
            })
            .collect();

        let mut session = self.surface.start_attach(element, to, before)?;
        let result = self
            .run_legs(&mut session, element, to, legs, &resolved, before)
            .await;
        let ended = self.surface.end(&mut session);
        result.and(ended)
    }

    async fn run_legs(
        &self,
        session: &mut RunningAnimation<D::Element>,
        element: &D::Element,
        to: &D::Element,
        legs: &[SequenceLeg<D::Element>],
        resolved: &[ResolvedSettings<D::Element>],
        before: Option<&D::Element>,
    ) -> Result<()> {
        let last = legs.len() - 1;
        for (index, (leg, settings)) in legs.iter().zip(resolved).enumerate() {
            let target = self.leg_target(leg, session, settings);
            debug!(index, ?leg, "sequence leg");

            let (shrink, grow, motion) = join!(
                async {
                    if index == 0 {
                        self.surface
                            .add_animated_space_if_necessary(
                                element,
                                session.from_parent.as_ref(),
                                SpaceKind::Shrink,
                                settings,
                                session.from_next_sibling.as_ref(),
                            )
                            .await
                    } else {
                        Ok(None)
                    }
                },
                async {
                    if index == last {
                        self.surface
                            .add_animated_space_if_necessary(
                                element,
                                Some(to),
                                SpaceKind::Grow,
                                settings,
                                before,
                            )
                            .await
                    } else {
                        Ok(None)
                    }
                },
                self.surface.animate_on_surface(
                    &session.wrapper,
                    session.from_matrix,
                    target,
                    settings,
                ),
            );

            // The origin space is gone as soon as the element has left.
            if let Ok(Some(space)) = &shrink {
                self.document().remove(space);
            }
            if let Ok(Some(space)) = &grow {
                session.set_destination_space(space.clone());
            }
            shrink?;
            grow?;
            motion?;
            session.advance(target);
        }
        Ok(())
    }

    fn leg_target(
        &self,
        leg: &SequenceLeg<D::Element>,
        session: &RunningAnimation<D::Element>,
        settings: &ResolvedSettings<D::Element>,
    ) -> Transform2D {
        match leg {
            SequenceLeg::ScreenCenter => screen_center_matrix(self.document()),
            SequenceLeg::OverElement(over) => matrix_from_element_center(
                self.document(),
                over,
                settings.ignore_scale,
                settings.ignore_rotation,
            ),
            SequenceLeg::Matrix(matrix) => *matrix,
            SequenceLeg::Pause(_) => session.from_matrix,
            SequenceLeg::Destination => session.to_matrix,
        }
    }

    /// Through the viewport center, then to `to`.
    pub async fn slide_to_screen_center_and_attach(
        &self,
        element: &D::Element,
        to: &D::Element,
        settings: LegSettings<'_, D::Element>,
        before: Option<&D::Element>,
    ) -> Result<()> {
        self.sequence_animations_attach(
            element,
            to,
            &[SequenceLeg::ScreenCenter, SequenceLeg::Destination],
            settings,
            before,
        )
        .await
    }

    /// Over `over`'s center, then to `to`.
    pub async fn slide_to_element_and_attach(
        &self,
        element: &D::Element,
        over: &D::Element,
        to: &D::Element,
        settings: LegSettings<'_, D::Element>,
        before: Option<&D::Element>,
    ) -> Result<()> {
        self.sequence_animations_attach(
            element,
            to,
            &[
                SequenceLeg::OverElement(over.clone()),
                SequenceLeg::Destination,
            ],
            settings,
            before,
        )
        .await
    }
}
