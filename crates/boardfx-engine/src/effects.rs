//! Ready-made parallel effects.

use boardfx_dom::Keyframe;

use crate::settings::{ParallelAnimation, ParallelTarget};

/// Vertical lift at the middle of a bump, in pixels.
pub const BUMP_LIFT_PX: f64 = -30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

/// Lift-and-grow halfway through the motion. `None` (no bump) when `scale`
/// is `None`.
pub fn bump<E>(scale: Option<f64>) -> Option<ParallelAnimation<E>> {
    let scale = scale?;
    Some(ParallelAnimation::new(vec![
        Keyframe::new().offset(0.0),
        Keyframe::new()
            .transform(format!("translate(0, {BUMP_LIFT_PX}px) scale({scale})"))
            .offset(0.5),
        Keyframe::new().offset(1.0),
    ]))
}

pub fn fade<E>(direction: Fade) -> ParallelAnimation<E> {
    let (from, to) = match direction {
        Fade::In => (0.0, 1.0),
        Fade::Out => (1.0, 0.0),
    };
    ParallelAnimation::new(vec![
        Keyframe::new().opacity(from),
        Keyframe::new().opacity(to),
    ])
}

/// Pop in, hold, shrink away. Used by floating messages.
pub fn zoom_in_out<E>() -> ParallelAnimation<E> {
    ParallelAnimation::new(vec![
        Keyframe::new().transform("scale(0)").offset(0.0),
        Keyframe::new().transform("scale(1)").offset(0.2),
        Keyframe::new().transform("scale(1)").offset(0.8),
        Keyframe::new().transform("scale(0)").offset(1.0),
    ])
    .on(ParallelTarget::Intermediate)
}

pub fn fade_in_out<E>() -> ParallelAnimation<E> {
    ParallelAnimation::new(vec![
        Keyframe::new().opacity(0.0).offset(0.0),
        Keyframe::new().opacity(1.0).offset(0.2),
        Keyframe::new().opacity(1.0).offset(0.8),
        Keyframe::new().opacity(0.0).offset(1.0),
    ])
}
