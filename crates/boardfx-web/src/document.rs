use std::cell::RefCell;
use std::rc::Rc;

use boardfx_dom::{Document, DomError, ForceCompletion, KeyframeEffect, PlaybackOutcome};
use boardfx_geometry::{LocalTransform, Rect};
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{Either, LocalBoxFuture, ready, select};
use tracing::{debug, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, EventTarget, HtmlElement, KeyframeAnimationOptions, Node, Window};

use crate::events::{EventListener, Timeout};
use crate::keyframes;

struct Inner {
    window: Window,
    document: web_sys::Document,
    root: Element,
    body: Element,
    visibility: Rc<RefCell<ForceCompletion>>,
    _visibility_listener: Option<EventListener>,
}

/// The page the game runs in. Clones share the same visibility tracking.
#[derive(Clone)]
pub struct WebDocument {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for WebDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDocument")
            .field("hidden", &self.inner.document.hidden())
            .finish_non_exhaustive()
    }
}

impl WebDocument {
    /// Bind to the current window. Fails outside a browser main thread or
    /// before `<body>` exists.
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::Unavailable("window"))?;
        let document = window
            .document()
            .ok_or(DomError::Unavailable("window.document"))?;
        let root = document
            .document_element()
            .ok_or(DomError::Unavailable("document.documentElement"))?;
        let body: Element = document
            .body()
            .ok_or(DomError::Unavailable("document.body"))?
            .into();

        // Every visibility change fires the current token and installs a
        // fresh one for the animations started afterwards.
        let visibility = Rc::new(RefCell::new(ForceCompletion::new()));
        let slot = visibility.clone();
        let listener = EventListener::new(document.as_ref(), "visibilitychange", move |_| {
            let fired = std::mem::replace(&mut *slot.borrow_mut(), ForceCompletion::new());
            debug!("visibility changed, forcing running animations to complete");
            fired.fire();
        });

        Ok(Self {
            inner: Rc::new(Inner {
                window,
                document,
                root,
                body,
                visibility,
                _visibility_listener: listener,
            }),
        })
    }

    pub fn window(&self) -> &Window {
        &self.inner.window
    }

    /// Look up an element by id.
    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        self.inner.document.get_element_by_id(id)
    }

    fn html<'a>(&self, element: &'a Element, property: &str) -> Result<&'a HtmlElement, DomError> {
        element.dyn_ref::<HtmlElement>().ok_or_else(|| DomError::Style {
            property: property.to_string(),
            reason: format!("<{}> has no inline style", element.tag_name()),
        })
    }

    fn computed(&self, element: &Element, property: &str) -> String {
        self.inner
            .window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }
}

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl Document for WebDocument {
    type Element = Element;

    fn body(&self) -> Element {
        self.inner.body.clone()
    }

    fn document_element(&self) -> Element {
        self.inner.root.clone()
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.inner
            .document
            .create_element(tag)
            .map_err(|err| DomError::CreateElement {
                tag: tag.to_string(),
                reason: js_error(err),
            })
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn next_sibling(&self, element: &Element) -> Option<Element> {
        element.next_element_sibling()
    }

    fn first_child(&self, element: &Element) -> Option<Element> {
        element.first_element_child()
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn insert_before(
        &self,
        parent: &Element,
        child: &Element,
        before: Option<&Element>,
    ) -> Result<(), DomError> {
        let before: Option<&Node> = before.map(|node| node.as_ref());
        parent
            .insert_before(child.as_ref(), before)
            .map(|_| ())
            .map_err(|err| DomError::Insert(js_error(err)))
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn add_class(&self, element: &Element, class: &str) -> Result<(), DomError> {
        element
            .class_list()
            .add_1(class)
            .map_err(|err| DomError::ClassList(js_error(err)))
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let style = self.html(element, property)?.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        result.map_err(|err| DomError::Style {
            property: property.to_string(),
            reason: js_error(err),
        })
    }

    fn style(&self, element: &Element, property: &str) -> Option<String> {
        let html = element.dyn_ref::<HtmlElement>()?;
        html.style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn offset_size(&self, element: &Element) -> (f64, f64) {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => (html.offset_width() as f64, html.offset_height() as f64),
            None => (element.client_width() as f64, element.client_height() as f64),
        }
    }

    fn local_transform(&self, element: &Element) -> LocalTransform {
        let transform = self.computed(element, "transform");
        let rotate = self.computed(element, "rotate");
        let zoom = self.computed(element, "zoom");
        LocalTransform::parse(&transform, &rotate, &zoom).unwrap_or_else(|err| {
            warn!(
                ?element,
                %err,
                %transform,
                %rotate,
                %zoom,
                "unparsable computed transform, using identity"
            );
            LocalTransform::default()
        })
    }

    fn scroll_offset(&self) -> (f64, f64) {
        let window = &self.inner.window;
        (
            window.scroll_x().unwrap_or(0.0),
            window.scroll_y().unwrap_or(0.0),
        )
    }

    fn viewport_size(&self) -> (f64, f64) {
        let window = &self.inner.window;
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
        };
        (dimension(window.inner_width()), dimension(window.inner_height()))
    }

    fn is_hidden(&self) -> bool {
        self.inner.document.hidden()
    }

    fn visibility_token(&self) -> ForceCompletion {
        self.inner.visibility.borrow().clone()
    }

    fn animate(
        &self,
        element: &Element,
        effect: &KeyframeEffect,
        token: &ForceCompletion,
    ) -> LocalBoxFuture<'static, PlaybackOutcome> {
        let started = keyframes::keyframes(effect).and_then(|frames| {
            let options: KeyframeAnimationOptions =
                keyframes::options(&effect.timing)?.unchecked_into();
            Ok(element.animate_with_keyframe_animation_options(Some(&*frames), &options))
        });
        let animation = match started {
            Ok(animation) => animation,
            Err(err) => {
                warn!(?element, %err, "could not start animation");
                return ready(PlaybackOutcome::ForcedComplete).boxed_local();
            }
        };
        trace!(?element, duration_ms = effect.timing.duration_ms, "animate");

        let finished = match animation.finished() {
            Ok(promise) => JsFuture::from(promise),
            Err(err) => {
                warn!(?element, err = %js_error(err), "animation has no finished promise");
                return ready(PlaybackOutcome::ForcedComplete).boxed_local();
            }
        };
        let fired = token.fired();
        async move {
            match select(finished, fired).await {
                Either::Left((Ok(_), _)) => PlaybackOutcome::Finished,
                // Rejected: the animation was cancelled, e.g. its element
                // was removed.
                Either::Left((Err(_), _)) => PlaybackOutcome::ForcedComplete,
                Either::Right(_) => {
                    if let Err(err) = animation.finish() {
                        debug!(err = %js_error(err), "could not finish animation");
                    }
                    PlaybackOutcome::ForcedComplete
                }
            }
        }
        .boxed_local()
    }

    fn transition_end(
        &self,
        element: &Element,
        token: &ForceCompletion,
    ) -> LocalBoxFuture<'static, PlaybackOutcome> {
        let (sender, receiver) = oneshot::channel();
        let sender = Rc::new(RefCell::new(Some(sender)));
        let target: EventTarget = element.clone().into();

        let listen = |event: &'static str, outcome: PlaybackOutcome| {
            let sender = sender.clone();
            let own = target.clone();
            EventListener::new(&target, event, move |event: Event| {
                // Transitions of descendants bubble up.
                if event.target().as_ref() != Some(&own) {
                    return;
                }
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(outcome);
                }
            })
        };
        let on_end = listen("transitionend", PlaybackOutcome::Finished);
        let on_cancel = listen("transitioncancel", PlaybackOutcome::ForcedComplete);

        let fired = token.fired();
        async move {
            let _listeners = (on_end, on_cancel);
            match select(receiver, fired).await {
                Either::Left((Ok(outcome), _)) => outcome,
                Either::Left((Err(_), _)) | Either::Right(_) => PlaybackOutcome::ForcedComplete,
            }
        }
        .boxed_local()
    }

    fn sleep(&self, ms: f64) -> LocalBoxFuture<'static, ()> {
        let (sender, receiver) = oneshot::channel();
        let Some(timeout) = Timeout::new(&self.inner.window, ms, move || {
            let _ = sender.send(());
        }) else {
            return ready(()).boxed_local();
        };
        async move {
            let _timeout = timeout;
            let _ = receiver.await;
        }
        .boxed_local()
    }
}
