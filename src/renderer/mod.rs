//! Immediate-mode 2D rendering
//!
//! Every frame the active scenes are translated into [`DrawCommand`]s and
//! handed to a [`Surface`]. Nothing is cached between frames.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
mod draw;
mod hit;
mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw::render_frame;
pub use hit::{dispatch_pointer, PointerKind};
pub use surface::{DrawCommand, RecordingSurface, Surface};
