//! Matrix math for positioning elements across nested CSS transforms.
//!
//! - [`Transform2D`]: affine matrix with `DOMMatrix` semantics and the
//!   scale/rotation/translation stripping operations.
//! - [`css`]: parsers for `transform`, `rotate` and `zoom` computed values.
//! - [`Rect`]: bounding rectangles.
//! - [`LocalTransform`]: one element's own contribution to the chain.

pub mod css;
pub mod local;
pub mod rect;
pub mod transform;

pub use css::CssParseError;
pub use local::LocalTransform;
pub use rect::Rect;
pub use transform::Transform2D;
