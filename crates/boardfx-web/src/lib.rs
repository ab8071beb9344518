//! Browser backend for the boardfx animation engine.
//!
//! [`WebDocument`] implements [`boardfx_dom::Document`] over `web-sys`:
//!
//! ```text
//! WebDocument
//!   ├── tree, classes, inline style      Element / HtmlElement
//!   ├── measurement                       getBoundingClientRect, getComputedStyle
//!   ├── animate                           Element.animate + Animation.finished
//!   ├── transition_end                    transitionend / transitioncancel listeners
//!   ├── sleep                             setTimeout
//!   └── visibility tokens                 document `visibilitychange`
//! ```
//!
//! Every future returned here is `!Send` and must be driven by
//! `wasm_bindgen_futures::spawn_local` or awaited from another local future.

mod document;
mod events;
mod keyframes;

pub use document::WebDocument;
