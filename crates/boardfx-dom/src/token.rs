//! Forced-completion tokens.
//!
//! A token is handed to every animation call. When it fires (the page was
//! hidden or shown), each animation observing it jumps to its end state and
//! resolves. Firing never cancels: the caller's cleanup still runs.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Default)]
struct Inner {
    fired: Cell<bool>,
    next_slot: Cell<u64>,
    /// One entry per pending [`Fired`]; removed when it is dropped.
    wakers: RefCell<BTreeMap<u64, Waker>>,
}

/// Shared, single-threaded trigger. Clones observe the same state.
#[derive(Clone, Default)]
pub struct ForceCompletion {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for ForceCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceCompletion")
            .field("fired", &self.inner.fired.get())
            .finish()
    }
}

impl ForceCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        if self.inner.fired.replace(true) {
            return;
        }
        let wakers = std::mem::take(&mut *self.inner.wakers.borrow_mut());
        for waker in wakers.into_values() {
            waker.wake();
        }
    }

    pub fn is_fired(&self) -> bool {
        self.inner.fired.get()
    }

    /// Resolves once [`fire`](Self::fire) has been called.
    pub fn fired(&self) -> Fired {
        Fired {
            token: self.clone(),
            slot: None,
        }
    }

    #[cfg(test)]
    fn pending_wakers(&self) -> usize {
        self.inner.wakers.borrow().len()
    }
}

pub struct Fired {
    token: ForceCompletion,
    slot: Option<u64>,
}

impl Future for Fired {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        let inner = &this.token.inner;
        if inner.fired.get() {
            return Poll::Ready(());
        }
        let slot = *this.slot.get_or_insert_with(|| {
            let slot = inner.next_slot.get();
            inner.next_slot.set(slot + 1);
            slot
        });
        let mut wakers = inner.wakers.borrow_mut();
        match wakers.get_mut(&slot) {
            Some(waker) if waker.will_wake(cx.waker()) => {}
            _ => {
                wakers.insert(slot, cx.waker().clone());
            }
        }
        Poll::Pending
    }
}

impl Drop for Fired {
    fn drop(&mut self) {
        if let Some(slot) = self.slot {
            self.token.inner.wakers.borrow_mut().remove(&slot);
        }
    }
}

/// How an animation future settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The animation ran to its end.
    Finished,
    /// A [`ForceCompletion`] token fired first.
    ForcedComplete,
    /// The safety timer elapsed before any completion signal.
    TimedOut,
}
