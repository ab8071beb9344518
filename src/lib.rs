//! boardfx: DOM animation choreography for turn-based board and card games.
//!
//! This crate re-exports the workspace:
//!
//! - [`geometry`]: affine matrices and CSS transform parsing;
//! - [`dom`]: the [`Document`](dom::Document) boundary and the in-memory
//!   document used for tests;
//! - [`config`]: `boardfx.toml` and `BOARDFX_*` configuration;
//! - [`engine`]: the animation manager and everything it is built from;
//! - `web` (wasm32 only): the browser document.
//!
//! ```
//! use boardfx::prelude::*;
//!
//! let doc = MemoryDocument::new();
//! let manager = AnimationManager::new(doc.clone(), InstantaneousFlag::new(true)).unwrap();
//! let hand = doc.create_in(doc.body(), "div", 200.0, 90.0);
//! let table = doc.create_in(doc.body(), "div", 300.0, 160.0);
//! let card = doc.create_in(hand, "div", 60.0, 90.0);
//!
//! // Replaying: the card lands immediately.
//! pollster::block_on(manager.slide_and_attach(&card, &table, None, None)).unwrap();
//! assert_eq!(doc.parent(&card), Some(table));
//! ```

pub use boardfx_config as config;
pub use boardfx_dom as dom;
pub use boardfx_engine as engine;
pub use boardfx_geometry as geometry;
#[cfg(target_arch = "wasm32")]
pub use boardfx_web as web;

pub mod prelude {
    pub use boardfx_config::BoardFxConfig;
    pub use boardfx_dom::{
        Document, EasingFunction, Keyframe, KeyframeEffect, MemoryDocument, PlaybackOutcome,
        Timing,
    };
    pub use boardfx_engine::settings::{FillingSpaces, ParallelAnimation, ParallelTarget};
    pub use boardfx_engine::{
        AnimationError, AnimationManager, AnimationSettings, FixedZoom, Game, InstantaneousFlag,
        LegSettings, LegacyAnimation, LegacySettings, MessageEffect, MessageOptions, SequenceLeg,
        ZoomProvider,
    };
    pub use boardfx_geometry::{Rect, Transform2D};
    #[cfg(target_arch = "wasm32")]
    pub use boardfx_web::WebDocument;
}
