//! Result panel with a retry button

use std::rc::Rc;

use super::{ACCENT, FONT_FAMILY, GAME_OVER, HUD, INK, MAIN};
use crate::display::{Padding, TextStyle, POINTER_DOWN};
use crate::input::codes;
use crate::scene::{Scene, SceneContext, SceneData, SHUTDOWN};

/// Final score of the last run, as passed by the run
#[derive(Default)]
pub struct GameOverScene {
    last_score: u64,
}

impl GameOverScene {
    pub fn last_score(&self) -> u64 {
        self.last_score
    }
}

impl Scene for GameOverScene {
    fn key(&self) -> &str {
        GAME_OVER
    }

    fn create(&mut self, ctx: &SceneContext, data: &SceneData) {
        self.last_score = data["score"].as_u64().unwrap_or(0);
        let bounds = ctx.physics.bounds();
        let (cx, cy) = (bounds.center_x, bounds.center_y);

        ctx.add
            .rectangle(cx, cy, 520.0, 300.0, 0x0b1221, 0.92)
            .set_stroke_style(2.0, 0x22c55e, 0.4);
        ctx.add.text(
            cx,
            280.0,
            "Game Over",
            TextStyle::sized("52px", "#e2e8f0").family(FONT_FAMILY),
        );
        ctx.add.text(
            cx,
            340.0,
            &format!("Score : {}", self.last_score),
            TextStyle::sized("28px", "#c7f9cc").family(FONT_FAMILY),
        );

        let retry = ctx.add.text(
            cx,
            420.0,
            "↻ Rejouer",
            TextStyle::sized("24px", INK)
                .bold()
                .background(ACCENT, Padding { x: 16.0, y: 12.0 }),
        );
        retry.set_interactive(true);

        let scene = ctx.scene.clone();
        let restart: Rc<dyn Fn()> = Rc::new(move || {
            log::info!("restarting the run");
            scene.stop(GAME_OVER);
            scene.stop(MAIN);
            scene.stop(HUD);
            scene.start(MAIN, SceneData::Null);
            scene.launch(HUD, SceneData::Null);
        });

        let r = restart.clone();
        retry.on(POINTER_DOWN, move |_| r());

        let mut subscriptions = Vec::new();
        for code in [codes::ENTER, codes::SPACE] {
            let event = format!("keydown-{}", code);
            let r = restart.clone();
            let id = ctx.input.on(&event, move |_| r());
            subscriptions.push((event, id));
        }

        let input = ctx.input.clone();
        ctx.events.once(SHUTDOWN, move |_| {
            for (event, id) in &subscriptions {
                input.off(event, *id);
            }
        });
    }
}
