//! Deterministic frame clock
//!
//! Time only moves when told to, and frames only run when fired. Used by the
//! test suite and the native headless binary.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{FrameCallback, FrameClock};

#[derive(Default)]
struct ManualState {
    now: Cell<f64>,
    pending: RefCell<Option<FrameCallback>>,
    requests: Cell<u64>,
}

/// Manually driven clock. Clones share the same time and pending frame.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<ManualState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `now` milliseconds
    pub fn starting_at(now: f64) -> Self {
        let clock = Self::new();
        clock.state.now.set(now);
        clock
    }

    /// Move time forward without running a frame
    pub fn advance(&self, ms: f64) {
        self.state.now.set(self.state.now.get() + ms.max(0.0));
    }

    /// Whether a frame request is waiting
    pub fn has_pending_frame(&self) -> bool {
        self.state.pending.borrow().is_some()
    }

    /// Total number of frame requests received
    pub fn request_count(&self) -> u64 {
        self.state.requests.get()
    }

    /// Run the pending frame callback at the current time
    ///
    /// Returns false when nothing was scheduled.
    pub fn fire_frame(&self) -> bool {
        let callback = self.state.pending.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback(self.state.now.get());
                true
            }
            None => false,
        }
    }

    /// Advance by `ms` then fire the pending frame
    pub fn step(&self, ms: f64) -> bool {
        self.advance(ms);
        self.fire_frame()
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> f64 {
        self.state.now.get()
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.state.requests.set(self.state.requests.get() + 1);
        *self.state.pending.borrow_mut() = Some(callback);
    }

    fn cancel_frame(&self) {
        self.state.pending.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_runs_pending_callback_once() {
        let clock = ManualClock::starting_at(100.0);
        let seen = Rc::new(Cell::new(0.0));
        let s = seen.clone();
        clock.request_frame(Box::new(move |t| s.set(t)));

        assert!(clock.step(16.0));
        assert_eq!(seen.get(), 116.0);
        assert!(!clock.fire_frame());
    }

    #[test]
    fn test_cancel_drops_request() {
        let clock = ManualClock::new();
        clock.request_frame(Box::new(|_| panic!("cancelled frame ran")));
        clock.cancel_frame();
        assert!(!clock.has_pending_frame());
        assert!(!clock.fire_frame());
        assert_eq!(clock.request_count(), 1);
    }
}
