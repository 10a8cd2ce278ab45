//! Platform abstraction layer
//!
//! The engine core never talks to the browser directly. Hosts provide:
//! - a [`FrameClock`]: current time and per-frame callback scheduling
//! - a [`crate::renderer::Surface`] to draw into
//!
//! `manual` is the deterministic host used by tests and the native binary;
//! `web` mounts a canvas and drives the loop with `requestAnimationFrame`.

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

pub use manual::ManualClock;

/// Callback invoked with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Time source and frame scheduler
pub trait FrameClock {
    /// Monotonic time in milliseconds
    fn now(&self) -> f64;

    /// Schedule `callback` for the next display frame, replacing any pending request
    fn request_frame(&self, callback: FrameCallback);

    /// Drop the pending frame request, if any
    fn cancel_frame(&self);
}

/// Clock shared by the engine loop and every scene's timer scheduler
pub type SharedClock = Rc<dyn FrameClock>;
