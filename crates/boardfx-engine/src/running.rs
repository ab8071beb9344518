//! Bookkeeping for one element in flight.
//!
//! A session goes `Created -> InProgress -> Ended`. Ending it puts the
//! element into its final parent (or leaves it removed for destroy
//! operations) and removes every wrapper and filling space it tracked,
//! whether or not the animation succeeded.

use boardfx_dom::Document;
use boardfx_geometry::Transform2D;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{full_matrix, matrix_from_element_center};
use crate::settings::CenterOptions;
use crate::surface::AnimationSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    InProgress,
    Ended,
}

#[derive(Debug, Clone)]
pub struct RunningAnimation<E> {
    /// `None` once the element has been destroyed.
    pub element: Option<E>,
    pub wrapper: E,
    pub from_parent: Option<E>,
    pub from_next_sibling: Option<E>,
    pub to_parent: Option<E>,
    pub to_next_sibling: Option<E>,
    pub from_matrix: Transform2D,
    pub to_matrix: Transform2D,
    /// Destination filling space; the element is inserted before it.
    pub to_space_wrapper: Option<E>,
    /// Removed when the session ends.
    pub wrappers_to_remove: Vec<E>,
    state: SessionState,
}

impl<E: Clone> RunningAnimation<E> {
    pub fn new(element: E, wrapper: E, from_matrix: Transform2D, to_matrix: Transform2D) -> Self {
        Self {
            element: Some(element),
            wrappers_to_remove: vec![wrapper.clone()],
            wrapper,
            from_parent: None,
            from_next_sibling: None,
            to_parent: None,
            to_next_sibling: None,
            from_matrix,
            to_matrix,
            to_space_wrapper: None,
            state: SessionState::Created,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Record that a leg reached `matrix`: the next leg starts from there.
    pub fn advance(&mut self, matrix: Transform2D) {
        self.from_matrix = matrix;
        self.state = SessionState::InProgress;
    }

    /// Remove `node` when the session ends.
    pub fn track(&mut self, node: E) {
        self.wrappers_to_remove.push(node);
    }

    /// Use `space` as the destination anchor, and remove it at the end.
    pub fn set_destination_space(&mut self, space: E) {
        self.to_space_wrapper = Some(space.clone());
        self.track(space);
    }

    /// The element will not be re-attached at the end.
    pub fn release_element(&mut self) -> Option<E> {
        self.element.take()
    }
}

impl<D: Document> AnimationSurface<D> {
    /// Measure `element` where it is and at its destination, then move it
    /// onto the surface.
    pub fn start_attach(
        &self,
        element: &D::Element,
        to: &D::Element,
        before: Option<&D::Element>,
    ) -> Result<RunningAnimation<D::Element>> {
        let doc = self.document();
        let from_parent = doc.parent(element);
        let from_next_sibling = doc.next_sibling(element);
        let from_matrix = full_matrix(doc, element);

        self.attach_to_element(element, to, before)?;
        let to_matrix = full_matrix(doc, element);
        let wrapper = self.wrap(element)?;

        let mut session = RunningAnimation::new(element.clone(), wrapper, from_matrix, to_matrix);
        session.from_parent = from_parent;
        session.from_next_sibling = from_next_sibling;
        session.to_parent = Some(to.clone());
        session.to_next_sibling = before.cloned();
        Ok(session)
    }

    /// The element stays where it is and comes in from `from`'s center (or
    /// from its own place when `from` is `None`).
    pub fn start_slide_in(
        &self,
        element: &D::Element,
        from: Option<&D::Element>,
        options: CenterOptions,
    ) -> Result<RunningAnimation<D::Element>> {
        let doc = self.document();
        let to_parent = doc.parent(element);
        let to_next_sibling = doc.next_sibling(element);
        let to_matrix = full_matrix(doc, element);
        let mut from_matrix = from
            .map(|from| {
                matrix_from_element_center(doc, from, options.ignore_scale, options.ignore_rotation)
            })
            .unwrap_or(to_matrix);
        if options.preserve_scale {
            from_matrix = from_matrix.with_scale_of(&to_matrix);
        }
        let wrapper = self.wrap(element)?;

        let mut session = RunningAnimation::new(element.clone(), wrapper, from_matrix, to_matrix);
        session.from_parent = from.cloned();
        session.to_parent = to_parent;
        session.to_next_sibling = to_next_sibling;
        Ok(session)
    }

    /// The element leaves its place for `to`'s center (or fades in place
    /// when `to` is `None`).
    pub fn start_slide_out(
        &self,
        element: &D::Element,
        to: Option<&D::Element>,
        options: CenterOptions,
    ) -> Result<RunningAnimation<D::Element>> {
        let doc = self.document();
        let from_parent = doc.parent(element);
        let from_next_sibling = doc.next_sibling(element);
        let from_matrix = full_matrix(doc, element);
        let mut to_matrix = to
            .map(|to| matrix_from_element_center(doc, to, options.ignore_scale, options.ignore_rotation))
            .unwrap_or(from_matrix);
        if options.preserve_scale {
            to_matrix = to_matrix.with_scale_of(&from_matrix);
        }
        let wrapper = self.wrap(element)?;

        let mut session = RunningAnimation::new(element.clone(), wrapper, from_matrix, to_matrix);
        session.from_parent = from_parent;
        session.from_next_sibling = from_next_sibling;
        session.to_parent = to.cloned();
        Ok(session)
    }

    /// Finish a session. Calling it again is a no-op.
    pub fn end(&self, session: &mut RunningAnimation<D::Element>) -> Result<()> {
        if session.state == SessionState::Ended {
            return Ok(());
        }
        let doc = self.document();

        let attached = match (&session.element, &session.to_parent) {
            (Some(element), Some(parent)) => {
                let anchor = session
                    .to_space_wrapper
                    .as_ref()
                    .or(session.to_next_sibling.as_ref())
                    .filter(|anchor| doc.parent(anchor).as_ref() == Some(parent));
                self.attach_to_element(element, parent, anchor)
            }
            (Some(element), None) => {
                warn!(?element, "no destination left, element removed");
                doc.remove(element);
                Ok(())
            }
            (None, _) => Ok(()),
        };

        for node in session.wrappers_to_remove.drain(..) {
            doc.remove(&node);
        }
        session.state = SessionState::Ended;
        debug!(wrapper = ?session.wrapper, "animation session ended");
        attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardfx_dom::MemoryDocument;

    fn setup() -> (MemoryDocument, AnimationSurface<MemoryDocument>) {
        let doc = MemoryDocument::new();
        let surface = AnimationSurface::new(doc.clone()).unwrap();
        (doc, surface)
    }

    #[test]
    fn test_start_attach_measures_both_ends() {
        let (doc, surface) = setup();
        let from = doc.create_in(doc.body(), "div", 50.0, 50.0);
        doc.set_position(from, 100.0, 100.0);
        let to = doc.create_in(doc.body(), "div", 50.0, 50.0);
        doc.set_position(to, 300.0, 100.0);
        let card = doc.create_in(from, "div", 50.0, 50.0);

        let session = surface.start_attach(&card, &to, None).unwrap();
        assert_eq!(session.state(), SessionState::Created);
        assert_eq!(session.from_matrix, Transform2D::translate(125.0, 125.0));
        assert_eq!(session.to_matrix, Transform2D::translate(325.0, 125.0));
        assert_eq!(session.from_parent, Some(from));
        assert_eq!(doc.parent(&card), Some(session.wrapper));
    }

    #[test]
    fn test_end_is_idempotent() {
        let (doc, surface) = setup();
        let from = doc.create_in(doc.body(), "div", 50.0, 50.0);
        let to = doc.create_in(doc.body(), "div", 50.0, 50.0);
        let card = doc.create_in(from, "div", 50.0, 50.0);
        let other = doc.create_in(to, "div", 10.0, 10.0);

        let mut session = surface.start_attach(&card, &to, Some(&other)).unwrap();
        let wrapper = session.wrapper;
        surface.end(&mut session).unwrap();
        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(doc.children(to), vec![card, other]);
        assert!(!doc.is_connected(&wrapper));

        // a second end must not move the element again
        doc.append_child(&to, &card).unwrap();
        surface.end(&mut session).unwrap();
        assert_eq!(doc.children(to), vec![other, card]);
    }

    #[test]
    fn test_end_with_stale_anchor_appends() {
        let (doc, surface) = setup();
        let from = doc.create_in(doc.body(), "div", 50.0, 50.0);
        let to = doc.create_in(doc.body(), "div", 50.0, 50.0);
        let card = doc.create_in(from, "div", 50.0, 50.0);
        let other = doc.create_in(to, "div", 10.0, 10.0);

        let mut session = surface.start_attach(&card, &to, Some(&other)).unwrap();
        doc.remove(&other);
        surface.end(&mut session).unwrap();
        assert_eq!(doc.children(to), vec![card]);
    }

    #[test]
    fn test_released_element_is_not_reattached() {
        let (doc, surface) = setup();
        let from = doc.create_in(doc.body(), "div", 50.0, 50.0);
        let card = doc.create_in(from, "div", 50.0, 50.0);

        let mut session = surface
            .start_slide_out(
                &card,
                None,
                CenterOptions {
                    ignore_scale: true,
                    ignore_rotation: true,
                    preserve_scale: true,
                },
            )
            .unwrap();
        assert_eq!(session.from_matrix, session.to_matrix);
        doc.remove(&card);
        session.release_element();
        surface.end(&mut session).unwrap();
        assert!(!doc.is_connected(&card));
        assert!(doc.children(from).is_empty());
    }

    #[test]
    fn test_slide_in_preserves_destination_scale() {
        let (doc, surface) = setup();
        let deck = doc.create_in(doc.body(), "div", 60.0, 60.0);
        doc.set_position(deck, 0.0, 0.0);
        let board = doc.create_in(doc.body(), "div", 200.0, 200.0);
        doc.set_position(board, 400.0, 0.0);
        doc.set_style(&board, "transform", "scale(0.5)").unwrap();
        let card = doc.create_in(board, "div", 40.0, 40.0);

        let session = surface
            .start_slide_in(
                &card,
                Some(&deck),
                CenterOptions {
                    ignore_scale: true,
                    ignore_rotation: true,
                    preserve_scale: true,
                },
            )
            .unwrap();
        assert!((session.from_matrix.a - 0.5).abs() < 1e-9);
        assert!((session.from_matrix.e - 30.0).abs() < 1e-9);
        assert_eq!(session.to_parent, Some(board));
    }
}
