use std::fmt;

use boardfx_geometry::{LocalTransform, Rect};
use futures::future::LocalBoxFuture;
use thiserror::Error;

use crate::keyframes::KeyframeEffect;
use crate::token::{ForceCompletion, PlaybackOutcome};

/// Failure reported by a document backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    #[error("failed to create <{tag}>: {reason}")]
    CreateElement { tag: String, reason: String },
    #[error("failed to insert node: {0}")]
    Insert(String),
    #[error("failed to set style `{property}`: {reason}")]
    Style { property: String, reason: String },
    #[error("failed to update class list: {0}")]
    ClassList(String),
    #[error("animation failed: {0}")]
    Animation(String),
    #[error("{0} is not available")]
    Unavailable(&'static str),
}

/// The DOM surface the animation engine works against.
///
/// Implementations are single-threaded handles (cheap to clone, `!Send`),
/// mirroring the browser: mutation through `&self`, futures that are not
/// `Send`.
pub trait Document {
    type Element: Clone + PartialEq + fmt::Debug + 'static;

    // Tree.
    fn body(&self) -> Self::Element;
    fn document_element(&self) -> Self::Element;
    fn create_element(&self, tag: &str) -> Result<Self::Element, DomError>;
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;
    fn next_sibling(&self, element: &Self::Element) -> Option<Self::Element>;
    fn first_child(&self, element: &Self::Element) -> Option<Self::Element>;
    /// True when the element is attached below the document element.
    fn is_connected(&self, element: &Self::Element) -> bool;
    /// Insert `child` into `parent` before `before`, or append when `None`.
    /// Moves `child` if it is already attached somewhere.
    fn insert_before(
        &self,
        parent: &Self::Element,
        child: &Self::Element,
        before: Option<&Self::Element>,
    ) -> Result<(), DomError>;
    /// Detach from the parent. No-op when already detached.
    fn remove(&self, element: &Self::Element);

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    // Classes, inline style and text.
    fn add_class(&self, element: &Self::Element, class: &str) -> Result<(), DomError>;
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    /// Set an inline style property (kebab-case). An empty value removes it.
    fn set_style(&self, element: &Self::Element, property: &str, value: &str)
    -> Result<(), DomError>;
    /// Inline style value, if set.
    fn style(&self, element: &Self::Element, property: &str) -> Option<String>;
    fn set_text(&self, element: &Self::Element, text: &str);

    // Measurement.
    /// Viewport-relative bounding box, transforms included.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;
    /// Layout size, transforms excluded.
    fn offset_size(&self, element: &Self::Element) -> (f64, f64);
    /// Parsed computed `transform`, `rotate` and `zoom`.
    fn local_transform(&self, element: &Self::Element) -> LocalTransform;
    fn scroll_offset(&self) -> (f64, f64);
    fn viewport_size(&self) -> (f64, f64);

    // Visibility.
    fn is_hidden(&self) -> bool;
    /// Token fired by the next visibility change.
    fn visibility_token(&self) -> ForceCompletion;

    // Time.
    /// Play `effect` on `element`. Resolves when the animation finishes, or
    /// finishes it immediately and resolves when `token` fires.
    fn animate(
        &self,
        element: &Self::Element,
        effect: &KeyframeEffect,
        token: &ForceCompletion,
    ) -> LocalBoxFuture<'static, PlaybackOutcome>;
    /// Resolves on the element's next `transitionend`, or on
    /// `transitioncancel` / token fire with [`PlaybackOutcome::ForcedComplete`].
    fn transition_end(
        &self,
        element: &Self::Element,
        token: &ForceCompletion,
    ) -> LocalBoxFuture<'static, PlaybackOutcome>;
    fn sleep(&self, ms: f64) -> LocalBoxFuture<'static, ()>;
}
