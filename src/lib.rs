//! Arcade Dash - a small scene-based 2D engine and the dodge game built on it
//!
//! Core modules:
//! - `events`: Publish/subscribe with token-based unsubscription
//! - `input`: Per-scene keyboard state and key events
//! - `time`: Scene timers pumped from the frame loop and the host
//! - `display`: Drawables and per-scene display lists
//! - `physics`: Arcade bodies, world bounds and overlap rules
//! - `scene`: Scene lifecycle and the command queue scenes use
//! - `renderer`: Immediate-mode drawing and pointer hit-testing
//! - `game`: The engine handle and frame loop
//! - `platform`: Host clocks and the browser mount
//! - `scenes`: The Arcade Dash scenes

pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod math;
pub mod physics;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod time;

pub use config::GameConfig;
pub use error::{EngineError, Result};
pub use game::{Game, Host, WeakGame};
pub use scene::{Scene, SceneContext, SceneData};

/// Engine configuration constants
pub mod consts {
    /// Default surface size
    pub const DEFAULT_WIDTH: u32 = 960;
    pub const DEFAULT_HEIGHT: u32 = 720;

    /// Period of the host interval that fires timers between frames
    pub const TIMER_PUMP_INTERVAL_MS: i32 = 4;
}
