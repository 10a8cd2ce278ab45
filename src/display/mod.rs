//! Drawables and the per-scene display list

mod list;
mod object;
pub mod style;

pub use list::DisplayList;
pub use object::{GameObject, ObjectState, PointerEvent, Shape, POINTER_DOWN, POINTER_OUT, POINTER_OVER};
pub use style::{Color, Padding, Shadow, Stroke, TextStyle};
