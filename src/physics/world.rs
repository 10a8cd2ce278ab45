//! Arcade physics world
//!
//! Bodies are integrated with explicit Euler in milliseconds, clamped into the
//! world rectangle, decayed by drag, then overlap rules are evaluated against
//! the new positions. Overlap never separates objects; it only reports them.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::body::Body;
use crate::display::GameObject;

/// World rectangle bodies are clamped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl Bounds {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            right: width,
            top: 0.0,
            bottom: height,
            center_x: width / 2.0,
            center_y: height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Collection of objects tested together by an overlap rule
#[derive(Clone, Default)]
pub struct Group {
    members: Rc<RefCell<Vec<GameObject>>>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `object` unless it is already a member
    pub fn add(&self, object: &GameObject) {
        let mut members = self.members.borrow_mut();
        if !members.iter().any(|m| m == object) {
            members.push(object.clone());
        }
    }

    pub fn remove(&self, object: &GameObject) {
        self.members.borrow_mut().retain(|m| m != object);
    }

    pub fn contains(&self, object: &GameObject) -> bool {
        self.members.borrow().iter().any(|m| m == object)
    }

    /// Live members in insertion order
    pub fn members(&self) -> Vec<GameObject> {
        let mut members = self.members.borrow_mut();
        members.retain(|m| !m.is_destroyed());
        members.clone()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().iter().filter(|m| !m.is_destroyed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty the group, optionally destroying the members as well
    pub fn clear(&self, destroy_members: bool) {
        let members = std::mem::take(&mut *self.members.borrow_mut());
        if destroy_members {
            for member in &members {
                member.destroy();
            }
        }
    }
}

/// Identifies an overlap rule for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapId(u64);

type OverlapCallback = Rc<RefCell<dyn FnMut(&GameObject, &GameObject)>>;

#[derive(Clone)]
struct OverlapRule {
    id: OverlapId,
    tracked: GameObject,
    group: Group,
    callback: OverlapCallback,
}

struct WorldState {
    bounds: Bounds,
    gravity: Vec2,
    bodies: Vec<GameObject>,
    groups: Vec<Group>,
    rules: Vec<OverlapRule>,
    next_rule: u64,
}

/// Per-scene physics world
#[derive(Clone)]
pub struct PhysicsWorld {
    state: Rc<RefCell<WorldState>>,
}

impl PhysicsWorld {
    pub fn new(bounds: Bounds, gravity_y: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(WorldState {
                bounds,
                gravity: Vec2::new(0.0, gravity_y),
                bodies: Vec::new(),
                groups: Vec::new(),
                rules: Vec::new(),
                next_rule: 0,
            })),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.state.borrow().bounds
    }

    /// Give `object` a body. An object that already has one keeps it.
    pub fn add_existing(&self, object: &GameObject) -> Body {
        if object.ensure_body() {
            let mut state = self.state.borrow_mut();
            if !state.bodies.iter().any(|b| b == object) {
                state.bodies.push(object.clone());
            }
        }
        Body::new(object.clone())
    }

    pub fn add_group(&self) -> Group {
        let group = Group::new();
        self.state.borrow_mut().groups.push(group.clone());
        group
    }

    /// Report every step in which `tracked` overlaps a member of `group`
    pub fn add_overlap(
        &self,
        tracked: &GameObject,
        group: &Group,
        callback: impl FnMut(&GameObject, &GameObject) + 'static,
    ) -> OverlapId {
        let mut state = self.state.borrow_mut();
        let id = OverlapId(state.next_rule);
        state.next_rule += 1;
        state.rules.push(OverlapRule {
            id,
            tracked: tracked.clone(),
            group: group.clone(),
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    pub fn remove_overlap(&self, id: OverlapId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.rules.len();
        state.rules.retain(|r| r.id != id);
        state.rules.len() != before
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.state
            .borrow()
            .bodies
            .iter()
            .filter(|b| !b.is_destroyed())
            .count()
    }

    /// Advance the simulation by `dt_ms` milliseconds
    pub fn step(&self, dt_ms: f64) {
        let (bodies, bounds, gravity) = {
            let mut state = self.state.borrow_mut();
            state.bodies.retain(|b| !b.is_destroyed());
            (state.bodies.clone(), state.bounds, state.gravity)
        };
        let dt = (dt_ms / 1000.0) as f32;

        for object in &bodies {
            object.with_state_mut(|s| {
                let size = s.shape.size();
                let origin = s.origin;
                let Some(body) = s.body.as_mut() else {
                    return;
                };

                if body.allow_gravity {
                    body.velocity += gravity * dt;
                }
                s.position += body.velocity * dt;

                if body.collide_world_bounds {
                    let lo = Vec2::new(bounds.left, bounds.top) + size * origin;
                    let hi = Vec2::new(bounds.right, bounds.bottom) - size * (Vec2::ONE - origin);
                    let clamped = s.position.max(lo).min(hi);
                    if clamped.x != s.position.x {
                        body.velocity.x *= reflect(body.bounce.x);
                    }
                    if clamped.y != s.position.y {
                        body.velocity.y *= reflect(body.bounce.y);
                    }
                    s.position = clamped;
                }

                body.velocity *= body.drag;
            });
        }

        self.run_overlaps();
    }

    fn run_overlaps(&self) {
        let rules = self.state.borrow().rules.clone();
        for rule in &rules {
            if !self.state.borrow().rules.iter().any(|r| r.id == rule.id) {
                continue;
            }
            for member in rule.group.members() {
                if rule.tracked.is_destroyed() {
                    break;
                }
                if member.is_destroyed() {
                    continue;
                }
                if !rule.tracked.bounds().overlaps(&member.bounds()) {
                    continue;
                }
                match rule.callback.try_borrow_mut() {
                    Ok(mut callback) => (*callback)(&rule.tracked, &member),
                    Err(_) => log::warn!("overlap callback re-entered, skipping"),
                }
            }
        }
    }

    /// Drop every body, group and overlap rule
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        for object in state.bodies.drain(..) {
            object.with_state_mut(|s| s.body = None);
        }
        state.groups.clear();
        state.rules.clear();
    }
}

/// Velocity factor applied on a bounds hit; a zero bounce still reflects
fn reflect(bounce: f32) -> f32 {
    if bounce == 0.0 { -1.0 } else { -bounce }
}
