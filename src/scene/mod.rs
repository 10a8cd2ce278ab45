//! Scenes and their lifecycle
//!
//! Every registered scene is instantiated once when the engine is built and
//! reused for the lifetime of the engine. Activation runs `create` against an
//! empty display list; deactivation discards the scene's objects and bodies.

mod context;
mod manager;

pub use context::{SceneCommand, SceneContext, ScenePlugin};
pub(crate) use context::SceneServices;
pub use manager::SceneManager;

/// Opaque scene payload, also used for scene events
pub type SceneData = serde_json::Value;

/// Emitted on a scene's `events` right before it is deactivated
pub const SHUTDOWN: &str = "shutdown";

/// A unit of game state
pub trait Scene {
    /// Unique registration key
    fn key(&self) -> &str;

    /// Called once per activation with an empty display list
    fn create(&mut self, _ctx: &SceneContext, _data: &SceneData) {}

    /// Called once per frame while active, before the physics step
    fn update(&mut self, _ctx: &SceneContext) {}
}
