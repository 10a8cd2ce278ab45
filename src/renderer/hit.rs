//! Pointer hit-testing against interactive text

use glam::Vec2;

use crate::display::{GameObject, PointerEvent, Shape, POINTER_DOWN, POINTER_OUT, POINTER_OVER};
use crate::scene::SceneContext;

/// Kind of pointer input reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Pointer moved over the surface
    Move,
    /// Pointer left the surface
    Leave,
    /// Primary button clicked
    Down,
}

/// Route a pointer event to the interactive objects of `scenes`
pub fn dispatch_pointer(scenes: &[SceneContext], kind: PointerKind, x: f32, y: f32) {
    let point = Vec2::new(x, y);
    let payload = PointerEvent { x, y };

    for ctx in scenes {
        for object in ctx.add.objects() {
            if let Some(event) = pointer_transition(&object, kind, point) {
                object.emit(event, &payload);
            }
        }
    }
}

/// Update hover state and pick the event to emit, if any
fn pointer_transition(object: &GameObject, kind: PointerKind, point: Vec2) -> Option<&'static str> {
    object.with_state_mut(|state| {
        let hittable = state.interactive && state.visible && matches!(state.shape, Shape::Text { .. });
        if !hittable {
            return None;
        }
        let inside = state.bounds().contains_point(point);

        match kind {
            PointerKind::Move if inside && !state.hovered => {
                state.hovered = true;
                Some(POINTER_OVER)
            }
            PointerKind::Move if !inside && state.hovered => {
                state.hovered = false;
                Some(POINTER_OUT)
            }
            PointerKind::Leave if state.hovered => {
                state.hovered = false;
                Some(POINTER_OUT)
            }
            PointerKind::Down if inside => Some(POINTER_DOWN),
            _ => None,
        }
    })
}
