//! Drawable game objects
//!
//! A [`GameObject`] is a shared handle: the display list, the physics world
//! and scene code all hold clones of the same object.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::style::{approx_text_size, Color, Shadow, Stroke, TextStyle};
use crate::events::{EventEmitter, SubscriptionId};
use crate::physics::{Aabb, BodyState};

/// Pointer entered the object's hit box
pub const POINTER_OVER: &str = "pointerover";
/// Pointer left the object's hit box
pub const POINTER_OUT: &str = "pointerout";
/// Pointer pressed inside the object's hit box
pub const POINTER_DOWN: &str = "pointerdown";

/// Payload of pointer events, in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
}

/// What an object draws
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle {
        width: f32,
        height: f32,
        fill: Color,
    },
    Circle {
        radius: f32,
        fill: Color,
    },
    Text {
        content: String,
        style: TextStyle,
        shadow: Option<Shadow>,
    },
}

impl Shape {
    /// Extent used for bounds; text uses the approximate box
    pub fn size(&self) -> Vec2 {
        match self {
            Shape::Rectangle { width, height, .. } => Vec2::new(*width, *height),
            Shape::Circle { radius, .. } => Vec2::splat(radius * 2.0),
            Shape::Text { content, style, .. } => approx_text_size(content, style),
        }
    }
}

/// Mutable state behind a [`GameObject`]
#[derive(Debug, Clone)]
pub struct ObjectState {
    pub position: Vec2,
    /// Anchor within the object's box, (0.5, 0.5) is the centre
    pub origin: Vec2,
    pub alpha: f32,
    pub visible: bool,
    pub stroke: Option<Stroke>,
    pub interactive: bool,
    pub shape: Shape,
    pub(crate) body: Option<BodyState>,
    pub(crate) hovered: bool,
    destroyed: bool,
}

impl ObjectState {
    fn new(position: Vec2, shape: Shape) -> Self {
        Self {
            position,
            origin: Vec2::splat(0.5),
            alpha: 1.0,
            visible: true,
            stroke: None,
            interactive: false,
            shape,
            body: None,
            hovered: false,
            destroyed: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_anchor(self.position, self.shape.size(), self.origin)
    }
}

struct ObjectCell {
    state: RefCell<ObjectState>,
    events: EventEmitter<PointerEvent>,
}

/// Shared handle to a drawable
#[derive(Clone)]
pub struct GameObject {
    cell: Rc<ObjectCell>,
}

impl PartialEq for GameObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("state", &*self.cell.state.borrow())
            .finish()
    }
}

impl GameObject {
    pub fn new(position: Vec2, shape: Shape) -> Self {
        Self {
            cell: Rc::new(ObjectCell {
                state: RefCell::new(ObjectState::new(position, shape)),
                events: EventEmitter::new(),
            }),
        }
    }

    /// Read the full state
    pub fn with_state<R>(&self, f: impl FnOnce(&ObjectState) -> R) -> R {
        f(&self.cell.state.borrow())
    }

    pub(crate) fn with_state_mut<R>(&self, f: impl FnOnce(&mut ObjectState) -> R) -> R {
        f(&mut self.cell.state.borrow_mut())
    }

    pub(crate) fn with_body<R>(&self, f: impl FnOnce(&BodyState) -> R) -> Option<R> {
        self.cell.state.borrow().body.as_ref().map(f)
    }

    pub(crate) fn with_body_mut<R>(&self, f: impl FnOnce(&mut BodyState) -> R) -> Option<R> {
        self.cell.state.borrow_mut().body.as_mut().map(f)
    }

    /// Attach a default body unless one exists. Returns false for destroyed objects.
    pub(crate) fn ensure_body(&self) -> bool {
        let mut state = self.cell.state.borrow_mut();
        if state.destroyed {
            return false;
        }
        if state.body.is_none() {
            state.body = Some(BodyState::default());
        }
        true
    }

    pub fn x(&self) -> f32 {
        self.cell.state.borrow().position.x
    }

    pub fn y(&self) -> f32 {
        self.cell.state.borrow().position.y
    }

    pub fn position(&self) -> Vec2 {
        self.cell.state.borrow().position
    }

    pub fn set_position(&self, x: f32, y: f32) -> &Self {
        self.cell.state.borrow_mut().position = Vec2::new(x, y);
        self
    }

    pub fn set_origin(&self, x: f32, y: f32) -> &Self {
        self.cell.state.borrow_mut().origin = Vec2::new(x, y);
        self
    }

    pub fn set_alpha(&self, alpha: f32) -> &Self {
        self.cell.state.borrow_mut().alpha = alpha;
        self
    }

    pub fn set_visible(&self, visible: bool) -> &Self {
        self.cell.state.borrow_mut().visible = visible;
        self
    }

    pub fn set_stroke_style(&self, width: f32, color: u32, alpha: f32) -> &Self {
        self.cell.state.borrow_mut().stroke = Some(Stroke {
            width,
            color: Color(color),
            alpha,
        });
        self
    }

    /// Change the fill of a rectangle or circle; ignored for text
    pub fn set_fill_color(&self, color: u32) -> &Self {
        match &mut self.cell.state.borrow_mut().shape {
            Shape::Rectangle { fill, .. } | Shape::Circle { fill, .. } => *fill = Color(color),
            Shape::Text { .. } => {}
        }
        self
    }

    /// Opt in to pointer hit-testing
    pub fn set_interactive(&self, interactive: bool) -> &Self {
        let mut state = self.cell.state.borrow_mut();
        state.interactive = interactive;
        if !interactive {
            state.hovered = false;
        }
        drop(state);
        self
    }

    pub fn set_text(&self, text: &str) -> &Self {
        if let Shape::Text { content, .. } = &mut self.cell.state.borrow_mut().shape {
            *content = text.to_string();
        }
        self
    }

    /// Merge `patch` into the text style
    pub fn set_style(&self, patch: &TextStyle) -> &Self {
        if let Shape::Text { style, .. } = &mut self.cell.state.borrow_mut().shape {
            style.merge(patch);
        }
        self
    }

    pub fn set_shadow(&self, offset_x: f32, offset_y: f32, color: &str, blur: f32) -> &Self {
        if let Shape::Text { shadow, .. } = &mut self.cell.state.borrow_mut().shape {
            *shadow = Some(Shadow {
                offset: Vec2::new(offset_x, offset_y),
                color: color.to_string(),
                blur,
            });
        }
        self
    }

    /// Current text, `None` for non-text objects
    pub fn text(&self) -> Option<String> {
        match &self.cell.state.borrow().shape {
            Shape::Text { content, .. } => Some(content.clone()),
            _ => None,
        }
    }

    pub fn on(&self, event: &str, handler: impl FnMut(&PointerEvent) + 'static) -> SubscriptionId {
        self.cell.events.on(event, handler)
    }

    pub fn off(&self, event: &str, id: SubscriptionId) -> bool {
        self.cell.events.off(event, id)
    }

    pub(crate) fn emit(&self, event: &str, payload: &PointerEvent) -> bool {
        self.cell.events.emit(event, payload)
    }

    /// Destroy the object: it stops drawing, loses its body and its listeners
    pub fn destroy(&self) {
        {
            let mut state = self.cell.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.body = None;
            state.hovered = false;
        }
        self.cell.events.remove_all();
    }

    pub fn is_destroyed(&self) -> bool {
        self.cell.state.borrow().destroyed
    }

    pub fn is_visible(&self) -> bool {
        self.cell.state.borrow().visible
    }

    pub fn is_interactive(&self) -> bool {
        self.cell.state.borrow().interactive
    }

    pub fn size(&self) -> Vec2 {
        self.cell.state.borrow().shape.size()
    }

    pub fn bounds(&self) -> Aabb {
        self.cell.state.borrow().bounds()
    }
}
