//! Animation settings and their layered resolution.
//!
//! Every operation resolves its settings from four layers, lowest first:
//!
//! ```text
//! built-in       duration 500ms, ease-in-out, z-index 10, bump 1.2, fill all
//! operation      e.g. slide_in defaults to ease-out
//! manager        AnimationManager::with_settings / from_config
//! call site      the settings passed to the operation
//! ```
//!
//! A field set on a higher layer shadows the same field below it; unset
//! fields fall through. Effects injected by an operation (bump, fade) are
//! prepended to the parallel animations after resolution, so they never
//! replace the caller's own.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use boardfx_dom::{EasingFunction, Keyframe, Timing};
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Which containers get an animated placeholder while an element travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillingSpaces {
    /// Origin and destination.
    #[default]
    All,
    None,
    /// Origin only (shrinking space).
    From,
    /// Destination only (growing space).
    To,
}

/// Direction of a filling-space animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceKind {
    /// From zero to the element's size, at the destination.
    Grow,
    /// From the element's size to zero, at the origin.
    Shrink,
}

impl SpaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grow => "grow",
            Self::Shrink => "shrink",
        }
    }
}

impl FillingSpaces {
    pub fn allows(&self, kind: SpaceKind) -> bool {
        matches!(
            (self, kind),
            (Self::All, _) | (Self::From, SpaceKind::Shrink) | (Self::To, SpaceKind::Grow)
        )
    }
}

impl FromStr for FillingSpaces {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            "none" => Ok(Self::None),
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            other => Err(AnimationError::InvalidArgument(format!(
                "filling spaces must be all, none, from or to, got `{other}`"
            ))),
        }
    }
}

/// Element a parallel animation runs on.
#[derive(Debug, Clone, PartialEq)]
pub enum ParallelTarget<E> {
    /// The top-level wrapper's first child, so the effect does not replace
    /// the wrapper's own motion.
    Wrapper,
    /// A fresh wrapper layer inserted around the element for this effect.
    Intermediate,
    /// The innermost animated element.
    Element,
    /// Any element, e.g. a counter elsewhere on the page.
    Explicit(E),
}

impl<E> Default for ParallelTarget<E> {
    fn default() -> Self {
        Self::Intermediate
    }
}

/// A secondary keyframe effect sharing the primary animation's timing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelAnimation<E> {
    pub target: ParallelTarget<E>,
    pub keyframes: Vec<Keyframe>,
}

impl<E> ParallelAnimation<E> {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self {
            target: ParallelTarget::default(),
            keyframes,
        }
    }

    pub fn on(mut self, target: ParallelTarget<E>) -> Self {
        self.target = target;
        self
    }
}

/// Mid-animation lift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bump {
    Off,
    Scale(f64),
}

impl Bump {
    pub const DEFAULT_SCALE: f64 = 1.2;

    /// Scale to apply, or `None` when the bump is disabled. A scale of 1 is
    /// no bump at all.
    pub fn scale(&self) -> Option<f64> {
        match *self {
            Self::Off => None,
            Self::Scale(s) if (s - 1.0).abs() < f64::EPSILON => None,
            Self::Scale(s) => Some(s),
        }
    }
}

pub type Callback<E> = Rc<dyn Fn(&E)>;

/// Per-call (or per-manager) settings. Unset fields fall through to the
/// layer below.
#[derive(Clone)]
pub struct AnimationSettings<E> {
    pub duration_ms: Option<f64>,
    pub easing: Option<EasingFunction>,
    pub z_index: Option<i32>,
    pub bump: Option<Bump>,
    pub filling_spaces: Option<FillingSpaces>,
    pub parallel_animations: Option<Vec<ParallelAnimation<E>>>,
    /// Ignore the reference element's scale when centering on it.
    pub ignore_scale: Option<bool>,
    /// Ignore the reference element's rotation when centering on it.
    pub ignore_rotation: Option<bool>,
    /// Force the travelling matrix to keep the element's own scale.
    pub preserve_scale: Option<bool>,
    pub on_start: Option<Callback<E>>,
    pub on_end: Option<Callback<E>>,
}

impl<E> Default for AnimationSettings<E> {
    fn default() -> Self {
        Self {
            duration_ms: None,
            easing: None,
            z_index: None,
            bump: None,
            filling_spaces: None,
            parallel_animations: None,
            ignore_scale: None,
            ignore_rotation: None,
            preserve_scale: None,
            on_start: None,
            on_end: None,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for AnimationSettings<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSettings")
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("z_index", &self.z_index)
            .field("bump", &self.bump)
            .field("filling_spaces", &self.filling_spaces)
            .field("parallel_animations", &self.parallel_animations)
            .field("ignore_scale", &self.ignore_scale)
            .field("ignore_rotation", &self.ignore_rotation)
            .field("preserve_scale", &self.preserve_scale)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl<E> AnimationSettings<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bottom layer.
    pub fn builtin() -> Self {
        Self {
            duration_ms: Some(500.0),
            easing: Some(EasingFunction::EaseInOut),
            z_index: Some(10),
            bump: Some(Bump::Scale(Bump::DEFAULT_SCALE)),
            filling_spaces: Some(FillingSpaces::All),
            parallel_animations: Some(Vec::new()),
            ignore_scale: Some(true),
            ignore_rotation: Some(true),
            preserve_scale: Some(true),
            on_start: None,
            on_end: None,
        }
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn bump(mut self, scale: f64) -> Self {
        self.bump = Some(Bump::Scale(scale));
        self
    }

    pub fn no_bump(mut self) -> Self {
        self.bump = Some(Bump::Off);
        self
    }

    pub fn filling_spaces(mut self, policy: FillingSpaces) -> Self {
        self.filling_spaces = Some(policy);
        self
    }

    pub fn parallel(mut self, animation: ParallelAnimation<E>) -> Self {
        self.parallel_animations
            .get_or_insert_with(Vec::new)
            .push(animation);
        self
    }

    pub fn ignore_scale(mut self, ignore: bool) -> Self {
        self.ignore_scale = Some(ignore);
        self
    }

    pub fn ignore_rotation(mut self, ignore: bool) -> Self {
        self.ignore_rotation = Some(ignore);
        self
    }

    pub fn preserve_scale(mut self, preserve: bool) -> Self {
        self.preserve_scale = Some(preserve);
        self
    }

    pub fn on_start(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_start = Some(Rc::new(callback));
        self
    }

    pub fn on_end(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_end = Some(Rc::new(callback));
        self
    }
}

impl<E: Clone> AnimationSettings<E> {
    /// `upper` shadows `self` field by field.
    pub fn overlay(&self, upper: &Self) -> Self {
        Self {
            duration_ms: upper.duration_ms.or(self.duration_ms),
            easing: upper.easing.or(self.easing),
            z_index: upper.z_index.or(self.z_index),
            bump: upper.bump.or(self.bump),
            filling_spaces: upper.filling_spaces.or(self.filling_spaces),
            parallel_animations: upper
                .parallel_animations
                .clone()
                .or_else(|| self.parallel_animations.clone()),
            ignore_scale: upper.ignore_scale.or(self.ignore_scale),
            ignore_rotation: upper.ignore_rotation.or(self.ignore_rotation),
            preserve_scale: upper.preserve_scale.or(self.preserve_scale),
            on_start: upper.on_start.clone().or_else(|| self.on_start.clone()),
            on_end: upper.on_end.clone().or_else(|| self.on_end.clone()),
        }
    }
}

/// Layered builder, see the module docs for the precedence.
pub struct SettingsLayers<E> {
    merged: AnimationSettings<E>,
}

impl<E: Clone> SettingsLayers<E> {
    pub fn builtin() -> Self {
        Self {
            merged: AnimationSettings::builtin(),
        }
    }

    pub fn layer(mut self, settings: &AnimationSettings<E>) -> Self {
        self.merged = self.merged.overlay(settings);
        self
    }

    pub fn layer_opt(self, settings: Option<&AnimationSettings<E>>) -> Self {
        match settings {
            Some(settings) => self.layer(settings),
            None => self,
        }
    }

    pub fn resolve(self) -> ResolvedSettings<E> {
        let builtin = AnimationSettings::<E>::builtin();
        let m = self.merged;
        let pick = |v: Option<bool>, d: Option<bool>| v.or(d).unwrap_or(true);

        ResolvedSettings {
            timing: Timing {
                duration_ms: m.duration_ms.unwrap_or(500.0).max(0.0),
                easing: m.easing.unwrap_or_default(),
                ..Timing::default()
            },
            z_index: m.z_index.unwrap_or(10),
            bump: m.bump.unwrap_or(Bump::Scale(Bump::DEFAULT_SCALE)).scale(),
            filling_spaces: m.filling_spaces.unwrap_or_default(),
            parallel_animations: m.parallel_animations.unwrap_or_default(),
            ignore_scale: pick(m.ignore_scale, builtin.ignore_scale),
            ignore_rotation: pick(m.ignore_rotation, builtin.ignore_rotation),
            preserve_scale: pick(m.preserve_scale, builtin.preserve_scale),
            on_start: m.on_start,
            on_end: m.on_end,
        }
    }
}

/// Flags used when a matrix is derived from a reference element's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterOptions {
    pub ignore_scale: bool,
    pub ignore_rotation: bool,
    pub preserve_scale: bool,
}

/// Fully resolved settings for one animation.
#[derive(Clone)]
pub struct ResolvedSettings<E> {
    pub timing: Timing,
    pub z_index: i32,
    /// `None` when no bump should be injected.
    pub bump: Option<f64>,
    pub filling_spaces: FillingSpaces,
    pub parallel_animations: Vec<ParallelAnimation<E>>,
    pub ignore_scale: bool,
    pub ignore_rotation: bool,
    pub preserve_scale: bool,
    pub on_start: Option<Callback<E>>,
    pub on_end: Option<Callback<E>>,
}

impl<E> ResolvedSettings<E> {
    pub fn duration_ms(&self) -> f64 {
        self.timing.duration_ms
    }

    pub fn center_options(&self) -> CenterOptions {
        CenterOptions {
            ignore_scale: self.ignore_scale,
            ignore_rotation: self.ignore_rotation,
            preserve_scale: self.preserve_scale,
        }
    }

    /// Put `effects` in front of the configured parallel animations.
    pub fn with_leading_effects(
        mut self,
        effects: impl IntoIterator<Item = ParallelAnimation<E>>,
    ) -> Self {
        let mut all: Vec<_> = effects.into_iter().collect();
        all.append(&mut self.parallel_animations);
        self.parallel_animations = all;
        self
    }
}
