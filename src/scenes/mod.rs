//! Arcade Dash: dodge the red drones for as long as possible
//!
//! Four scenes talk to each other only through scene keys and events:
//! the menu starts the run and the HUD, the run reports score changes and
//! launches the game-over panel, which restarts the run.

mod game_over;
mod hud;
mod menu;
mod play;

pub use game_over::GameOverScene;
pub use hud::HudScene;
pub use menu::MenuScene;
pub use play::MainScene;

use crate::scene::Scene;

pub const MENU: &str = "MenuScene";
pub const MAIN: &str = "MainScene";
pub const HUD: &str = "UIScene";
pub const GAME_OVER: &str = "GameOverScene";

/// Emitted by the run with `{"score", "enemySpeed"}`
pub const SCORE_CHANGED: &str = "score-changed";
/// Emitted by the run with `{"score"}` when the player is hit
pub const GAME_OVER_EVENT: &str = "game-over";

pub(crate) const FONT_FAMILY: &str = "Inter, sans-serif";
pub(crate) const ACCENT: &str = "#22c55e";
pub(crate) const ACCENT_HOVER: &str = "#34d399";
pub(crate) const INK: &str = "#0b1221";

/// Every Arcade Dash scene, menu first
pub fn arcade_dash() -> Vec<Box<dyn Scene>> {
    vec![
        Box::new(MenuScene),
        Box::new(MainScene::default()),
        Box::new(HudScene),
        Box::new(GameOverScene::default()),
    ]
}
