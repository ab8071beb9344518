//! In-process [`Document`] with deterministic geometry and virtual time.
//!
//! Layout is deliberately simple:
//! - a node with inline `left`/`top` sits at that offset inside its parent;
//! - any other node flows left to right after its in-flow siblings;
//! - `position: fixed` nodes are placed relative to the viewport.
//!
//! Sizes come from inline `width`/`height` in pixels, else from
//! [`MemoryDocument::set_size`]. Transforms (`transform`, `rotate`, `zoom`)
//! apply around the box center.
//!
//! Time only moves inside [`MemoryDocument::run`], which jumps the clock to
//! the next pending timer whenever the driven future cannot progress.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};

use boardfx_geometry::{LocalTransform, Rect, Transform2D};
use futures::FutureExt;
use futures::future::{Either, LocalBoxFuture};
use futures::task::ArcWake;
use thiserror::Error;
use tracing::{trace, warn};

use crate::document::{Document, DomError};
use crate::keyframes::KeyframeEffect;
use crate::token::{ForceCompletion, PlaybackOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Returned by [`MemoryDocument::run`] when the future is pending and no
/// timer is left to advance to.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("future stalled at t={at_ms}ms with no pending timers")]
pub struct Stalled {
    pub at_ms: f64,
}

#[derive(Default)]
struct WakeFlag(AtomicBool);

impl ArcWake for WakeFlag {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.store(true, Ordering::SeqCst);
    }
}

/// One call to [`Document::animate`], kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAnimation {
    pub element: NodeId,
    pub effect: KeyframeEffect,
    pub started_at: f64,
    /// `None` while still running.
    pub outcome: Option<PlaybackOutcome>,
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: String,
    size: (f64, f64),
}

#[derive(Default)]
struct TimerState {
    done: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

struct Timer {
    deadline: f64,
    state: Rc<TimerState>,
}

struct Sleep {
    state: Rc<TimerState>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.state.done.get() {
            Poll::Ready(())
        } else {
            *self.state.waker.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

struct Inner {
    nodes: Vec<Node>,
    document_element: NodeId,
    body: NodeId,
    scroll: (f64, f64),
    viewport: (f64, f64),
    hidden: bool,
    visibility: ForceCompletion,
    now: f64,
    timers: Vec<Timer>,
    animations: Vec<RecordedAnimation>,
    transitions: Vec<(NodeId, String)>,
    stall_transitions: bool,
    stalled_animations: BTreeSet<NodeId>,
}

/// Cheap-to-clone handle; clones share the same tree and clock.
#[derive(Clone)]
pub struct MemoryDocument {
    inner: Rc<RefCell<Inner>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryDocument")
            .field("nodes", &inner.nodes.len())
            .field("now", &inner.now)
            .finish()
    }
}

impl MemoryDocument {
    /// An empty `<html><body>` document with a 1280x720 viewport.
    pub fn new() -> Self {
        let html = Node {
            tag: "html".into(),
            children: vec![NodeId(1)],
            ..Node::default()
        };
        let body = Node {
            tag: "body".into(),
            parent: Some(NodeId(0)),
            ..Node::default()
        };
        Self {
            inner: Rc::new(RefCell::new(Inner {
                nodes: vec![html, body],
                document_element: NodeId(0),
                body: NodeId(1),
                scroll: (0.0, 0.0),
                viewport: (1280.0, 720.0),
                hidden: false,
                visibility: ForceCompletion::new(),
                now: 0.0,
                timers: Vec::new(),
                animations: Vec::new(),
                transitions: Vec::new(),
                stall_transitions: false,
                stalled_animations: BTreeSet::new(),
            })),
        }
    }

    /// Create a detached element.
    pub fn create(&self, tag: &str) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        inner.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        NodeId(inner.nodes.len() - 1)
    }

    /// Create an element of the given size and append it to `parent`.
    pub fn create_in(&self, parent: NodeId, tag: &str, width: f64, height: f64) -> NodeId {
        let id = self.create(tag);
        self.set_size(id, width, height);
        self.attach(parent, id, None);
        id
    }

    /// Intrinsic size, used when no inline `width`/`height` is set.
    pub fn set_size(&self, id: NodeId, width: f64, height: f64) {
        self.inner.borrow_mut().nodes[id.0].size = (width, height);
    }

    /// Pin the element at `left`/`top` inside its parent.
    pub fn set_position(&self, id: NodeId, left: f64, top: f64) {
        let mut inner = self.inner.borrow_mut();
        let styles = &mut inner.nodes[id.0].styles;
        styles.insert("position".into(), "absolute".into());
        styles.insert("left".into(), format!("{left}px"));
        styles.insert("top".into(), format!("{top}px"));
    }

    pub fn set_scroll(&self, x: f64, y: f64) {
        self.inner.borrow_mut().scroll = (x, y);
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.inner.borrow_mut().viewport = (width, height);
    }

    /// Change page visibility. Fires the current visibility token.
    pub fn set_hidden(&self, hidden: bool) {
        let token = {
            let mut inner = self.inner.borrow_mut();
            if inner.hidden == hidden {
                return;
            }
            inner.hidden = hidden;
            std::mem::replace(&mut inner.visibility, ForceCompletion::new())
        };
        trace!(hidden, "visibility change");
        token.fire();
    }

    /// Make `transition_end` never resolve on its own, as when a browser
    /// drops the `transitionend` event.
    pub fn set_stall_transitions(&self, stall: bool) {
        self.inner.borrow_mut().stall_transitions = stall;
    }

    /// Make animations on `element` never finish on their own; they only
    /// settle when their token fires.
    pub fn set_stall_animations(&self, element: NodeId, stall: bool) {
        let mut inner = self.inner.borrow_mut();
        if stall {
            inner.stalled_animations.insert(element);
        } else {
            inner.stalled_animations.remove(&element);
        }
    }

    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.inner.borrow().nodes[id.0].children.clone()
    }

    pub fn tag(&self, id: NodeId) -> String {
        self.inner.borrow().nodes[id.0].tag.clone()
    }

    pub fn text(&self, id: NodeId) -> String {
        self.inner.borrow().nodes[id.0].text.clone()
    }

    /// Connected elements carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        (0..inner.nodes.len())
            .map(NodeId)
            .filter(|id| inner.nodes[id.0].classes.contains(class) && inner.connected(*id))
            .collect()
    }

    pub fn animations(&self) -> Vec<RecordedAnimation> {
        self.inner.borrow().animations.clone()
    }

    pub fn animations_on(&self, id: NodeId) -> Vec<RecordedAnimation> {
        self.inner
            .borrow()
            .animations
            .iter()
            .filter(|a| a.element == id)
            .cloned()
            .collect()
    }

    /// `(element, transition style)` of every `transition_end` call.
    pub fn transitions(&self) -> Vec<(NodeId, String)> {
        self.inner.borrow().transitions.clone()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Drive `future` to completion, advancing virtual time between polls.
    pub fn run<F: Future>(&self, future: F) -> Result<F::Output, Stalled> {
        let mut future = std::pin::pin!(future);
        let woken = Arc::new(WakeFlag::default());
        let waker = futures::task::waker(woken.clone());
        let mut cx = Context::from_waker(&waker);

        loop {
            woken.0.store(false, Ordering::SeqCst);
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return Ok(output);
            }
            // Woken while polling: progress is possible without moving time.
            if woken.0.load(Ordering::SeqCst) {
                continue;
            }
            if !self.advance_to_next_timer() {
                return Err(Stalled { at_ms: self.now() });
            }
        }
    }

    fn advance_to_next_timer(&self) -> bool {
        let due = {
            let mut inner = self.inner.borrow_mut();
            let Some(next) = inner
                .timers
                .iter()
                .map(|t| t.deadline)
                .min_by(|a, b| a.total_cmp(b))
            else {
                return false;
            };
            inner.now = inner.now.max(next);
            let now = inner.now;
            let (due, pending): (Vec<_>, Vec<_>) =
                inner.timers.drain(..).partition(|t| t.deadline <= now);
            inner.timers = pending;
            due
        };

        for timer in due {
            timer.state.done.set(true);
            if let Some(waker) = timer.state.waker.borrow_mut().take() {
                waker.wake();
            }
        }
        true
    }

    fn timer(&self, ms: f64) -> Sleep {
        let state = Rc::new(TimerState::default());
        let mut inner = self.inner.borrow_mut();
        let deadline = inner.now + ms.max(0.0);
        inner.timers.push(Timer {
            deadline,
            state: state.clone(),
        });
        Sleep { state }
    }

    fn attach(&self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        let mut inner = self.inner.borrow_mut();
        inner.detach(child);
        let children = &mut inner.nodes[parent.0].children;
        let index = before
            .and_then(|b| children.iter().position(|c| *c == b))
            .unwrap_or(children.len());
        children.insert(index, child);
        inner.nodes[child.0].parent = Some(parent);
    }
}

fn px(value: Option<&String>) -> Option<f64> {
    value
        .and_then(|v| v.trim().strip_suffix("px"))
        .and_then(|v| v.trim().parse().ok())
}

impl Inner {
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    fn connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.document_element {
                return true;
            }
            current = self.nodes[node.0].parent;
        }
        false
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes[node.0].parent;
        }
        false
    }

    fn size(&self, id: NodeId) -> (f64, f64) {
        let node = &self.nodes[id.0];
        (
            px(node.styles.get("width")).unwrap_or(node.size.0),
            px(node.styles.get("height")).unwrap_or(node.size.1),
        )
    }

    fn is_positioned(&self, id: NodeId) -> bool {
        let styles = &self.nodes[id.0].styles;
        styles.contains_key("left")
            || styles.contains_key("top")
            || styles.get("position").is_some_and(|p| p == "fixed")
    }

    fn is_fixed(&self, id: NodeId) -> bool {
        self.nodes[id.0]
            .styles
            .get("position")
            .is_some_and(|p| p == "fixed")
    }

    /// Offset of the box inside its parent's box.
    fn position(&self, id: NodeId) -> (f64, f64) {
        let node = &self.nodes[id.0];
        if self.is_positioned(id) {
            return (
                px(node.styles.get("left")).unwrap_or(0.0),
                px(node.styles.get("top")).unwrap_or(0.0),
            );
        }
        let Some(parent) = node.parent else {
            return (0.0, 0.0);
        };
        let x = self.nodes[parent.0]
            .children
            .iter()
            .take_while(|c| **c != id)
            .filter(|c| !self.is_positioned(**c))
            .map(|c| self.size(*c).0)
            .sum();
        (x, 0.0)
    }

    fn local_transform(&self, id: NodeId) -> LocalTransform {
        let styles = &self.nodes[id.0].styles;
        let get = |p: &str| styles.get(p).map(String::as_str).unwrap_or("none");
        let zoom = styles.get("zoom").map(String::as_str).unwrap_or("normal");
        match LocalTransform::parse(get("transform"), get("rotate"), zoom) {
            Ok(local) => local,
            Err(err) => {
                warn!(?id, %err, "unparsable transform style, using identity");
                LocalTransform::default()
            }
        }
    }

    /// Box-to-parent-box matrix: offset, then the local transform around
    /// the box center.
    fn box_matrix(&self, id: NodeId) -> Transform2D {
        let (x, y) = self.position(id);
        let (w, h) = self.size(id);
        Transform2D::translate(x + w / 2.0, y + h / 2.0)
            .then(&self.local_transform(id).matrix())
            .then(&Transform2D::translate(-w / 2.0, -h / 2.0))
    }

    fn page_matrix(&self, id: NodeId) -> Transform2D {
        let own = self.box_matrix(id);
        if self.is_fixed(id) {
            return Transform2D::translate(self.scroll.0, self.scroll.1).then(&own);
        }
        match self.nodes[id.0].parent {
            Some(parent) => self.page_matrix(parent).then(&own),
            None => own,
        }
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    fn document_element(&self) -> NodeId {
        self.inner.borrow().document_element
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.create(tag))
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes[element.0].parent
    }

    fn next_sibling(&self, element: &NodeId) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let parent = inner.nodes[element.0].parent?;
        let siblings = &inner.nodes[parent.0].children;
        let index = siblings.iter().position(|c| c == element)?;
        siblings.get(index + 1).copied()
    }

    fn first_child(&self, element: &NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes[element.0].children.first().copied()
    }

    fn is_connected(&self, element: &NodeId) -> bool {
        self.inner.borrow().connected(*element)
    }

    fn insert_before(
        &self,
        parent: &NodeId,
        child: &NodeId,
        before: Option<&NodeId>,
    ) -> Result<(), DomError> {
        {
            let inner = self.inner.borrow();
            if inner.is_ancestor(*child, *parent) {
                return Err(DomError::Insert(format!(
                    "{child:?} is an ancestor of {parent:?}"
                )));
            }
            if let Some(before) = before {
                if inner.nodes[before.0].parent != Some(*parent) {
                    return Err(DomError::Insert(format!(
                        "{before:?} is not a child of {parent:?}"
                    )));
                }
            }
        }
        // Inserting a node before itself leaves it in place.
        if before == Some(child) {
            return Ok(());
        }
        self.attach(*parent, *child, before.copied());
        Ok(())
    }

    fn remove(&self, element: &NodeId) {
        self.inner.borrow_mut().detach(*element);
    }

    fn add_class(&self, element: &NodeId, class: &str) -> Result<(), DomError> {
        self.inner.borrow_mut().nodes[element.0]
            .classes
            .insert(class.to_string());
        Ok(())
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.inner.borrow().nodes[element.0].classes.contains(class)
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let styles = &mut inner.nodes[element.0].styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn style(&self, element: &NodeId, property: &str) -> Option<String> {
        self.inner.borrow().nodes[element.0]
            .styles
            .get(property)
            .cloned()
    }

    fn set_text(&self, element: &NodeId, text: &str) {
        self.inner.borrow_mut().nodes[element.0].text = text.to_string();
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        let inner = self.inner.borrow();
        let (w, h) = inner.size(*element);
        Rect::new(0.0, 0.0, w, h)
            .transformed_bounds(&inner.page_matrix(*element))
            .translated(-inner.scroll.0, -inner.scroll.1)
    }

    fn offset_size(&self, element: &NodeId) -> (f64, f64) {
        self.inner.borrow().size(*element)
    }

    fn local_transform(&self, element: &NodeId) -> LocalTransform {
        self.inner.borrow().local_transform(*element)
    }

    fn scroll_offset(&self) -> (f64, f64) {
        self.inner.borrow().scroll
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.inner.borrow().viewport
    }

    fn is_hidden(&self) -> bool {
        self.inner.borrow().hidden
    }

    fn visibility_token(&self) -> ForceCompletion {
        self.inner.borrow().visibility.clone()
    }

    fn animate(
        &self,
        element: &NodeId,
        effect: &KeyframeEffect,
        token: &ForceCompletion,
    ) -> LocalBoxFuture<'static, PlaybackOutcome> {
        let index = {
            let mut inner = self.inner.borrow_mut();
            let started_at = inner.now;
            inner.animations.push(RecordedAnimation {
                element: *element,
                effect: effect.clone(),
                started_at,
                outcome: None,
            });
            inner.animations.len() - 1
        };
        trace!(?element, duration = effect.timing.duration_ms, "animate");

        let doc = self.clone();
        let fired = token.fired();
        if self.inner.borrow().stalled_animations.contains(element) {
            return async move {
                fired.await;
                doc.inner.borrow_mut().animations[index].outcome =
                    Some(PlaybackOutcome::ForcedComplete);
                PlaybackOutcome::ForcedComplete
            }
            .boxed_local();
        }

        let done = self.timer(effect.timing.duration_ms);
        async move {
            let outcome = match futures::future::select(done, fired).await {
                Either::Left(_) => PlaybackOutcome::Finished,
                Either::Right(_) => PlaybackOutcome::ForcedComplete,
            };
            doc.inner.borrow_mut().animations[index].outcome = Some(outcome);
            outcome
        }
        .boxed_local()
    }

    fn transition_end(
        &self,
        element: &NodeId,
        token: &ForceCompletion,
    ) -> LocalBoxFuture<'static, PlaybackOutcome> {
        let (transition, stall) = {
            let inner = self.inner.borrow();
            let transition = inner.nodes[element.0]
                .styles
                .get("transition")
                .cloned()
                .unwrap_or_default();
            (transition, inner.stall_transitions)
        };
        self.inner
            .borrow_mut()
            .transitions
            .push((*element, transition.clone()));

        let fired = token.fired();
        if stall {
            return async move {
                fired.await;
                PlaybackOutcome::ForcedComplete
            }
            .boxed_local();
        }

        let done = self.timer(transition_duration_ms(&transition));
        async move {
            match futures::future::select(done, fired).await {
                Either::Left(_) => PlaybackOutcome::Finished,
                Either::Right(_) => PlaybackOutcome::ForcedComplete,
            }
        }
        .boxed_local()
    }

    fn sleep(&self, ms: f64) -> LocalBoxFuture<'static, ()> {
        self.timer(ms).boxed_local()
    }
}

/// First duration in a `transition` shorthand, e.g. `transform 500ms linear`.
fn transition_duration_ms(transition: &str) -> f64 {
    transition
        .split(|c: char| c.is_whitespace() || c == ',')
        .find_map(|part| {
            if let Some(ms) = part.strip_suffix("ms") {
                ms.parse::<f64>().ok()
            } else {
                part.strip_suffix('s')
                    .and_then(|s| s.parse::<f64>().ok())
                    .map(|s| s * 1000.0)
            }
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_flow_layout() {
        let doc = MemoryDocument::new();
        let row = doc.create_in(doc.body(), "div", 300.0, 50.0);
        let a = doc.create_in(row, "div", 40.0, 50.0);
        let b = doc.create_in(row, "div", 60.0, 50.0);

        assert_eq!(doc.bounding_rect(&a), Rect::new(0.0, 0.0, 40.0, 50.0));
        assert_eq!(doc.bounding_rect(&b), Rect::new(40.0, 0.0, 60.0, 50.0));

        doc.remove(&a);
        assert_eq!(doc.bounding_rect(&b).left, 0.0);
    }

    #[test]
    fn test_rotated_parent_bounds() {
        let doc = MemoryDocument::new();
        let parent = doc.create_in(doc.body(), "div", 100.0, 100.0);
        doc.set_position(parent, 100.0, 100.0);
        doc.set_style(&parent, "rotate", "90deg").unwrap();
        let child = doc.create_in(parent, "div", 100.0, 20.0);

        let rect = doc.bounding_rect(&child);
        // The strip at the top of the parent ends up on its right side.
        assert!(approx_eq(rect.width, 20.0));
        assert!(approx_eq(rect.height, 100.0));
        assert!(approx_eq(rect.left, 180.0));
    }

    #[test]
    fn test_scroll_shifts_bounding_rect() {
        let doc = MemoryDocument::new();
        let el = doc.create_in(doc.body(), "div", 10.0, 10.0);
        doc.set_position(el, 50.0, 500.0);
        doc.set_scroll(0.0, 200.0);
        assert!(approx_eq(doc.bounding_rect(&el).top, 300.0));
    }

    #[test]
    fn test_insert_before_rules() {
        let doc = MemoryDocument::new();
        let outer = doc.create_in(doc.body(), "div", 0.0, 0.0);
        let inner = doc.create_in(outer, "div", 0.0, 0.0);
        let stray = doc.create("div");

        assert!(doc.insert_before(&inner, &outer, None).is_err());
        assert!(doc.insert_before(&doc.body(), &stray, Some(&inner)).is_err());
        assert!(doc.insert_before(&outer, &inner, Some(&inner)).is_ok());
        assert_eq!(doc.children(outer), vec![inner]);

        doc.insert_before(&outer, &stray, Some(&inner)).unwrap();
        assert_eq!(doc.children(outer), vec![stray, inner]);
        assert_eq!(doc.next_sibling(&stray), Some(inner));
        assert!(doc.is_connected(&stray));
    }

    #[test]
    fn test_run_advances_virtual_time() {
        let doc = MemoryDocument::new();
        let d = doc.clone();
        let elapsed = doc
            .run(async move {
                d.sleep(120.0).await;
                d.sleep(30.0).await;
                d.now()
            })
            .unwrap();
        assert!(approx_eq(elapsed, 150.0));
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn test_run_reports_stall() {
        let doc = MemoryDocument::new();
        let token = ForceCompletion::new();
        assert!(doc.run(token.fired()).is_err());
    }

    #[test]
    fn test_hidden_forces_animation_completion() {
        let doc = MemoryDocument::new();
        let el = doc.create_in(doc.body(), "div", 10.0, 10.0);
        let token = doc.visibility_token();
        let effect = KeyframeEffect::transform("none", "none", crate::Timing::millis(1000.0));

        let d = doc.clone();
        let (outcome, _) = doc
            .run(futures::future::join(
                doc.animate(&el, &effect, &token),
                async move {
                    d.sleep(100.0).await;
                    d.set_hidden(true);
                },
            ))
            .unwrap();

        assert_eq!(outcome, PlaybackOutcome::ForcedComplete);
        assert_eq!(doc.animations()[0].outcome, Some(PlaybackOutcome::ForcedComplete));
        assert!(doc.is_hidden());
    }

    #[test]
    fn test_transition_duration_parsing() {
        assert!(approx_eq(transition_duration_ms("transform 500ms linear"), 500.0));
        assert!(approx_eq(transition_duration_ms("transform 0.25s"), 250.0));
        assert!(approx_eq(transition_duration_ms(""), 0.0));
    }
}
