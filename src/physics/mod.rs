//! Arcade physics: velocity bodies, world bounds and overlap rules

mod body;
mod geom;
mod world;

pub use body::{Body, BodyState, DEFAULT_MAX_VELOCITY};
pub use geom::Aabb;
pub use world::{Bounds, Group, OverlapId, PhysicsWorld};
