//! Keyboard input mapping
//!
//! Keys are identified by platform key codes (`KeyboardEvent.code`), e.g.
//! `"KeyW"` or `"ArrowUp"`. A [`Keyboard`] hands out one shared [`Key`]
//! handle per code; the host feeds presses and releases in.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::events::{EventEmitter, SubscriptionId};

/// Common key codes
pub mod codes {
    pub const W: &str = "KeyW";
    pub const A: &str = "KeyA";
    pub const S: &str = "KeyS";
    pub const D: &str = "KeyD";
    pub const UP: &str = "ArrowUp";
    pub const DOWN: &str = "ArrowDown";
    pub const LEFT: &str = "ArrowLeft";
    pub const RIGHT: &str = "ArrowRight";
    pub const ENTER: &str = "Enter";
    pub const SPACE: &str = "Space";
    pub const ESCAPE: &str = "Escape";
}

#[derive(Debug)]
struct KeyState {
    code: String,
    is_down: Cell<bool>,
}

/// Shared handle to a single key's pressed state
#[derive(Debug, Clone)]
pub struct Key {
    state: Rc<KeyState>,
}

impl Key {
    fn new(code: &str) -> Self {
        Self {
            state: Rc::new(KeyState {
                code: code.to_string(),
                is_down: Cell::new(false),
            }),
        }
    }

    pub fn is_down(&self) -> bool {
        self.state.is_down.get()
    }

    pub fn is_up(&self) -> bool {
        !self.is_down()
    }

    pub fn code(&self) -> &str {
        &self.state.code
    }

    /// Whether both handles refer to the same key
    pub fn same_key(&self, other: &Key) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.same_key(other)
    }
}

/// The four arrow keys
#[derive(Debug, Clone)]
pub struct CursorKeys {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
}

/// Payload of keyboard events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: String,
}

struct KeyboardInner {
    keys: RefCell<HashMap<String, Key>>,
    events: EventEmitter<KeyEvent>,
}

/// Per-scene keyboard
///
/// Emits `keydown`/`keyup` and `keydown-<code>`/`keyup-<code>` for every
/// key the host reports, mapped or not.
#[derive(Clone)]
pub struct Keyboard {
    inner: Rc<KeyboardInner>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(KeyboardInner {
                keys: RefCell::new(HashMap::new()),
                events: EventEmitter::new(),
            }),
        }
    }

    /// Get the handle for `code`, creating it on first request
    pub fn add_key(&self, code: &str) -> Key {
        self.inner
            .keys
            .borrow_mut()
            .entry(code.to_string())
            .or_insert_with(|| Key::new(code))
            .clone()
    }

    /// Map several named keys at once
    pub fn add_keys(&self, keys: &[(&str, &str)]) -> HashMap<String, Key> {
        keys.iter()
            .map(|(name, code)| (name.to_string(), self.add_key(code)))
            .collect()
    }

    pub fn create_cursor_keys(&self) -> CursorKeys {
        CursorKeys {
            up: self.add_key(codes::UP),
            down: self.add_key(codes::DOWN),
            left: self.add_key(codes::LEFT),
            right: self.add_key(codes::RIGHT),
        }
    }

    /// Subscribe to a keyboard event such as `"keydown-Enter"`
    pub fn on(&self, event: &str, handler: impl FnMut(&KeyEvent) + 'static) -> SubscriptionId {
        self.inner.events.on(event, handler)
    }

    pub fn off(&self, event: &str, id: SubscriptionId) -> bool {
        self.inner.events.off(event, id)
    }

    /// Host reported a key press
    pub fn press(&self, code: &str) {
        self.set_state(code, true);
        self.dispatch("keydown", code);
    }

    /// Host reported a key release
    pub fn release(&self, code: &str) {
        self.set_state(code, false);
        self.dispatch("keyup", code);
    }

    /// Update the pressed state without emitting events (inactive scenes)
    pub(crate) fn set_state(&self, code: &str, down: bool) {
        if let Some(key) = self.inner.keys.borrow().get(code) {
            key.state.is_down.set(down);
        }
    }

    /// Drop every keyboard event subscription
    pub fn remove_all_listeners(&self) {
        self.inner.events.remove_all();
    }

    /// Release every held key, e.g. when the page loses focus
    pub fn release_all(&self) {
        for key in self.inner.keys.borrow().values() {
            key.state.is_down.set(false);
        }
    }

    fn dispatch(&self, kind: &str, code: &str) {
        let event = KeyEvent {
            code: code.to_string(),
        };
        self.inner.events.emit(kind, &event);
        self.inner.events.emit(&format!("{}-{}", kind, code), &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_add_key_is_idempotent() {
        let keyboard = Keyboard::new();
        let a = keyboard.add_key(codes::W);
        let b = keyboard.add_key(codes::W);
        assert!(a.same_key(&b));
        assert!(!a.is_down());

        keyboard.press(codes::W);
        assert!(a.is_down());
        assert!(b.is_down());

        keyboard.release(codes::W);
        assert!(!a.is_down());
        assert!(!b.is_down());
    }

    #[test]
    fn test_cursor_keys_share_arrow_handles() {
        let keyboard = Keyboard::new();
        let cursors = keyboard.create_cursor_keys();
        let left = keyboard.add_key(codes::LEFT);
        assert!(cursors.left.same_key(&left));
        assert!(!cursors.left.same_key(&cursors.right));

        keyboard.press(codes::LEFT);
        assert!(cursors.left.is_down());
        assert!(cursors.right.is_up());
    }

    #[test]
    fn test_add_keys_maps_names() {
        let keyboard = Keyboard::new();
        let wasd = keyboard.add_keys(&[("w", codes::W), ("a", codes::A)]);
        keyboard.press(codes::A);
        assert!(wasd["a"].is_down());
        assert!(!wasd["w"].is_down());
    }

    #[test]
    fn test_unmapped_keys_emit_events() {
        let keyboard = Keyboard::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        keyboard.on("keydown-Enter", move |event| {
            assert_eq!(event.code, codes::ENTER);
            h.set(h.get() + 1);
        });

        keyboard.press(codes::ENTER);
        keyboard.press(codes::SPACE);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_never_pressed_without_host_events() {
        let keyboard = Keyboard::new();
        let cursors = keyboard.create_cursor_keys();
        assert!(cursors.up.is_up() && cursors.down.is_up());
    }

    #[test]
    fn test_release_all() {
        let keyboard = Keyboard::new();
        let d = keyboard.add_key(codes::D);
        keyboard.set_state(codes::D, true);
        assert!(d.is_down());
        keyboard.release_all();
        assert!(d.is_up());
    }
}
