//! Hooks into the hosting game.

use std::cell::Cell;
use std::rc::Rc;

/// The game shell the manager animates for.
pub trait Game {
    /// True while replaying or fast-forwarding: every operation then jumps
    /// straight to its end state.
    fn instantaneous_mode(&self) -> bool;
}

/// Current page zoom, used to convert measured deltas back to layout pixels.
pub trait ZoomProvider {
    fn zoom(&self) -> f64;
}

impl<G: Game + ?Sized> Game for Rc<G> {
    fn instantaneous_mode(&self) -> bool {
        (**self).instantaneous_mode()
    }
}

/// Shared toggle, for hosts that only need the replay flag.
#[derive(Debug, Clone, Default)]
pub struct InstantaneousFlag(Rc<Cell<bool>>);

impl InstantaneousFlag {
    pub fn new(instantaneous: bool) -> Self {
        Self(Rc::new(Cell::new(instantaneous)))
    }

    pub fn set(&self, instantaneous: bool) {
        self.0.set(instantaneous);
    }
}

impl Game for InstantaneousFlag {
    fn instantaneous_mode(&self) -> bool {
        self.0.get()
    }
}

/// Fixed zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedZoom(pub f64);

impl ZoomProvider for FixedZoom {
    fn zoom(&self) -> f64 {
        self.0
    }
}
