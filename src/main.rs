//! Arcade Dash entry point
//!
//! In the browser the game is started from JavaScript through
//! `WebGame`; this module only installs logging and the panic hook.
//! Natively it plays a short scripted run headlessly and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Arcade Dash (wasm) loaded, create a WebGame to start");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Dash (native) starting headless run...");

    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use arcade_dash::consts::TIMER_PUMP_INTERVAL_MS;
    use arcade_dash::input::codes;
    use arcade_dash::platform::ManualClock;
    use arcade_dash::renderer::{PointerKind, RecordingSurface};
    use arcade_dash::scenes::{self, GAME_OVER};
    use arcade_dash::{Game, GameConfig, Host, Result};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 120;

    /// Click play, then circle the arena until a drone gets through
    pub fn run() -> Result<()> {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let host = Host {
            clock: Rc::new(clock.clone()),
            surface: Box::new(surface.clone()),
        };
        let config = GameConfig::default().with_seed(0x5eed);
        let game = Game::new(config, scenes::arcade_dash(), host)?;

        clock.step(FRAME_MS);
        game.pointer(PointerKind::Move, 480.0, 410.0);
        game.pointer(PointerKind::Down, 480.0, 410.0);
        log::info!("active scenes: {:?}", game.active_scene_keys());

        let pattern = [codes::RIGHT, codes::DOWN, codes::LEFT, codes::UP];
        let mut held = None;
        for frame in 0..MAX_FRAMES {
            let key = pattern[(frame / 90) as usize % pattern.len()];
            if held != Some(key) {
                if let Some(previous) = held {
                    game.key_up(previous);
                }
                game.key_down(key);
                held = Some(key);
            }

            // Timers are pumped between frames as the browser interval would
            let mut elapsed = 0.0;
            while elapsed + (TIMER_PUMP_INTERVAL_MS as f64) < FRAME_MS {
                clock.advance(TIMER_PUMP_INTERVAL_MS as f64);
                game.advance_timers();
                elapsed += TIMER_PUMP_INTERVAL_MS as f64;
            }
            clock.step(FRAME_MS - elapsed);

            if game.is_scene_active(GAME_OVER) {
                break;
            }
        }

        if game.is_scene_active(GAME_OVER) {
            log::info!("run over after {} frames", game.frame_count());
            log::info!("panel shows: {:?}", surface.texts());
        } else {
            log::info!("survived {} frames", game.frame_count());
        }

        game.destroy();
        Ok(())
    }
}
