//! DOM boundary for the boardfx animation engine.
//!
//! # Architecture
//!
//! ```text
//! Document (trait)
//!   ├── tree mutation, styles, measurement
//!   ├── animate(effect, token)      -> finished future
//!   ├── transition_end(token)       -> legacy CSS transitions
//!   └── sleep(ms)
//!
//! MemoryDocument   in-process tree + virtual clock (tests, headless demo)
//! ```
//!
//! The web implementation lives in `boardfx-web`.

pub mod document;
pub mod easing;
pub mod keyframes;
pub mod memory;
pub mod token;

pub use document::{Document, DomError};
pub use easing::{EasingFunction, EasingParseError, StepPosition};
pub use keyframes::{FillMode, Keyframe, KeyframeEffect, Timing};
pub use memory::{MemoryDocument, NodeId, RecordedAnimation, Stalled};
pub use token::{ForceCompletion, PlaybackOutcome};
