//! boardfx animation engine
//!
//! Moves board-game pieces between containers with an animation that looks
//! continuous even when origin and destination sit under different
//! rotations, scales and zooms.
//!
//! # Architecture
//!
//! ```text
//! AnimationManager            high-level operations (slide, swap, fade,
//!   │                         sequences, floating labels, combinators)
//!   ├── AnimationSurface      overlay at the page origin, wrappers, layers
//!   │     ├── space           growing / shrinking filling spaces
//!   │     └── running         RunningAnimation session bookkeeping
//!   ├── geometry              page-space matrices of elements
//!   ├── settings              layered settings resolution
//!   └── legacy                CSS-transition animations
//! ```
//!
//! Everything runs against the [`Document`](boardfx_dom::Document) trait:
//! the browser in `boardfx-web`, or [`MemoryDocument`](boardfx_dom::MemoryDocument)
//! with virtual time in tests.

pub mod display;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod host;
pub mod legacy;
pub mod manager;
pub mod running;
pub mod sequence;
pub mod settings;
pub mod space;
pub mod surface;

pub use display::{MessageEffect, MessageOptions};
pub use error::{AnimationError, Result};
pub use host::{FixedZoom, Game, InstantaneousFlag, ZoomProvider};
pub use legacy::{LegacyAnimation, LegacyAnimator, LegacySettings};
pub use manager::AnimationManager;
pub use running::{RunningAnimation, SessionState};
pub use sequence::{LegSettings, SequenceLeg};
pub use settings::{
    AnimationSettings, Bump, CenterOptions, FillingSpaces, ParallelAnimation, ParallelTarget,
    ResolvedSettings, SettingsLayers, SpaceKind,
};
pub use surface::{AnimationSurface, SurfaceAnimation};
