use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget, Window};

/// An event listener that is removed again when dropped. Owns its closure,
/// so the callback stays alive exactly as long as the registration.
pub(crate) struct EventListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub(crate) fn new(
        target: &EventTarget,
        event: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::<dyn FnMut(Event)>::new(callback);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                closure,
            }),
            Err(err) => {
                tracing::warn!(event, ?err, "could not add event listener");
                None
            }
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A pending `setTimeout`, cleared when dropped before it fires.
pub(crate) struct Timeout {
    window: Window,
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub(crate) fn new(window: &Window, ms: f64, callback: impl FnOnce() + 'static) -> Option<Self> {
        let closure: Closure<dyn FnMut()> = Closure::once(callback);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            timeout_delay(ms),
        ) {
            Ok(handle) => Some(Self {
                window: window.clone(),
                handle,
                _closure: closure,
            }),
            Err(err) => {
                tracing::warn!(ms, ?err, "setTimeout failed");
                None
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        // Clearing a timeout that already fired is a no-op.
        self.window.clear_timeout_with_handle(self.handle);
    }
}

/// `setTimeout` delay for a duration in milliseconds.
pub(crate) fn timeout_delay(ms: f64) -> i32 {
    if ms.is_nan() {
        return 0;
    }
    ms.ceil().clamp(0.0, i32::MAX as f64) as i32
}
