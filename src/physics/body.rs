//! Arcade bodies
//!
//! A body is velocity state attached to exactly one [`GameObject`]. The state
//! lives inside the object, so destroying the object releases the body.

use glam::Vec2;

use crate::display::GameObject;

/// Default velocity clamp applied by `set_velocity*`
pub const DEFAULT_MAX_VELOCITY: f32 = 1000.0;

/// Physics state of one object
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub velocity: Vec2,
    pub max_velocity: f32,
    /// Per-step multiplicative decay; 1 keeps velocity, (0, 1) decays it
    pub drag: f32,
    /// Reflection coefficients on a world-bound hit; 0 reflects by -1
    pub bounce: Vec2,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            max_velocity: DEFAULT_MAX_VELOCITY,
            drag: 1.0,
            bounce: Vec2::ZERO,
            allow_gravity: true,
            collide_world_bounds: false,
        }
    }
}

impl BodyState {
    /// Clamp without `f32::clamp`, which panics on a negative limit
    fn clamp_axis(value: f32, max: f32) -> f32 {
        value.min(max).max(-max)
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(
            Self::clamp_axis(x, self.max_velocity),
            Self::clamp_axis(y, self.max_velocity),
        );
    }
}

/// Handle for configuring the body of an object
///
/// Every setter is a no-op once the owning object has been destroyed.
#[derive(Clone)]
pub struct Body {
    object: GameObject,
}

impl Body {
    pub(crate) fn new(object: GameObject) -> Self {
        Self { object }
    }

    pub fn game_object(&self) -> &GameObject {
        &self.object
    }

    /// Whether the body is still attached to a live object
    pub fn is_attached(&self) -> bool {
        self.object.with_body(|_| ()).is_some()
    }

    pub fn velocity(&self) -> Vec2 {
        self.object.with_body(|b| b.velocity).unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&self, x: f32, y: f32) -> &Self {
        self.object.with_body_mut(|b| b.set_velocity(x, y));
        self
    }

    pub fn set_velocity_x(&self, x: f32) -> &Self {
        self.object.with_body_mut(|b| b.set_velocity(x, b.velocity.y));
        self
    }

    pub fn set_velocity_y(&self, y: f32) -> &Self {
        self.object.with_body_mut(|b| b.set_velocity(b.velocity.x, y));
        self
    }

    /// Keep the direction, set the magnitude (a zero velocity stays zero)
    pub fn scale_velocity_to(&self, speed: f32) -> &Self {
        self.object
            .with_body_mut(|b| b.velocity = b.velocity.normalize_or_zero() * speed);
        self
    }

    pub fn set_max_velocity(&self, max: f32) -> &Self {
        self.object.with_body_mut(|b| b.max_velocity = max);
        self
    }

    pub fn set_drag(&self, drag: f32) -> &Self {
        self.object.with_body_mut(|b| b.drag = drag);
        self
    }

    pub fn set_bounce(&self, x: f32, y: f32) -> &Self {
        self.object.with_body_mut(|b| b.bounce = Vec2::new(x, y));
        self
    }

    pub fn set_allow_gravity(&self, allow: bool) -> &Self {
        self.object.with_body_mut(|b| b.allow_gravity = allow);
        self
    }

    pub fn set_collide_world_bounds(&self, collide: bool) -> &Self {
        self.object.with_body_mut(|b| b.collide_world_bounds = collide);
        self
    }

    /// Snapshot of the current body state
    pub fn state(&self) -> Option<BodyState> {
        self.object.with_body(BodyState::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let body = BodyState::default();
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.drag, 1.0);
        assert!(body.allow_gravity);
        assert!(!body.collide_world_bounds);
    }

    #[test]
    fn test_set_velocity_clamps_each_axis() {
        let mut body = BodyState {
            max_velocity: 260.0,
            ..Default::default()
        };
        body.set_velocity(-500.0, 100.0);
        assert_eq!(body.velocity, Vec2::new(-260.0, 100.0));
    }

    #[test]
    fn test_negative_max_velocity_does_not_panic() {
        let mut body = BodyState {
            max_velocity: -5.0,
            ..Default::default()
        };
        body.set_velocity(10.0, -10.0);
        assert!(body.velocity.x.is_finite());
    }
}
