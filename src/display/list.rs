//! Per-scene display list

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::object::{GameObject, Shape};
use super::style::{Color, TextStyle};

/// Ordered set of drawables owned by one scene. Draw order is insertion order.
#[derive(Clone, Default)]
pub struct DisplayList {
    objects: Rc<RefCell<Vec<GameObject>>>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, object: GameObject) -> GameObject {
        self.objects.borrow_mut().push(object.clone());
        object
    }

    /// Filled rectangle centred on `(x, y)`
    pub fn rectangle(&self, x: f32, y: f32, width: f32, height: f32, fill: u32, alpha: f32) -> GameObject {
        let object = GameObject::new(
            Vec2::new(x, y),
            Shape::Rectangle {
                width,
                height,
                fill: Color(fill),
            },
        );
        object.set_alpha(alpha);
        self.push(object)
    }

    /// Filled circle centred on `(x, y)`
    pub fn circle(&self, x: f32, y: f32, radius: f32, fill: u32, alpha: f32) -> GameObject {
        let object = GameObject::new(
            Vec2::new(x, y),
            Shape::Circle {
                radius,
                fill: Color(fill),
            },
        );
        object.set_alpha(alpha);
        self.push(object)
    }

    /// Text centred on `(x, y)`
    pub fn text(&self, x: f32, y: f32, content: &str, style: TextStyle) -> GameObject {
        self.push(GameObject::new(
            Vec2::new(x, y),
            Shape::Text {
                content: content.to_string(),
                style,
                shadow: None,
            },
        ))
    }

    /// Destroy and detach one object
    pub fn remove(&self, object: &GameObject) {
        object.destroy();
        self.objects.borrow_mut().retain(|o| o != object);
    }

    /// Destroy every object
    pub fn clear(&self) {
        let objects = std::mem::take(&mut *self.objects.borrow_mut());
        for object in &objects {
            object.destroy();
        }
    }

    /// Live objects in draw order
    pub fn objects(&self) -> Vec<GameObject> {
        let mut objects = self.objects.borrow_mut();
        objects.retain(|o| !o.is_destroyed());
        objects.clone()
    }

    pub fn len(&self) -> usize {
        self.objects.borrow().iter().filter(|o| !o.is_destroyed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_pruning() {
        let list = DisplayList::new();
        let bg = list.rectangle(480.0, 360.0, 960.0, 720.0, 0x0c1326, 1.0);
        let title = list.text(480.0, 200.0, "Arcade Dash", TextStyle::sized("64px", "#22c55e"));
        let dot = list.circle(10.0, 10.0, 4.0, 0xffffff, 0.5);

        assert_eq!(list.objects(), vec![bg.clone(), title.clone(), dot.clone()]);

        title.destroy();
        assert_eq!(list.objects(), vec![bg.clone(), dot.clone()]);
        assert_eq!(list.len(), 2);

        list.remove(&bg);
        assert!(bg.is_destroyed());
        assert_eq!(list.objects(), vec![dot]);
    }

    #[test]
    fn test_clear_destroys_everything() {
        let list = DisplayList::new();
        let a = list.rectangle(0.0, 0.0, 1.0, 1.0, 0, 1.0);
        let b = list.text(0.0, 0.0, "b", TextStyle::default());
        list.clear();
        assert!(list.is_empty());
        assert!(a.is_destroyed() && b.is_destroyed());
    }

    #[test]
    fn test_rectangle_keeps_alpha() {
        let list = DisplayList::new();
        let enemy = list.rectangle(0.0, 0.0, 20.0, 20.0, 0xef4444, 0.95);
        enemy.with_state(|s| assert_eq!(s.alpha, 0.95));
    }
}
