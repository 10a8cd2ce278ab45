//! Score overlay drawn above the run

use super::{FONT_FAMILY, GAME_OVER_EVENT, HUD, MAIN, SCORE_CHANGED};
use crate::display::{GameObject, TextStyle};
use crate::scene::{Scene, SceneContext, SceneData, SHUTDOWN};

#[derive(Clone)]
struct HudTexts {
    score: GameObject,
    speed: GameObject,
}

impl HudTexts {
    fn show_progress(&self, payload: &SceneData) {
        let score = payload["score"].as_u64().unwrap_or(0);
        self.score.set_text(&format!("Score : {}", score));
        if let Some(speed) = payload["enemySpeed"].as_f64() {
            self.speed
                .set_text(&format!("Vitesse ennemis : {}", speed.round() as i64));
        }
    }

    fn show_final(&self, payload: &SceneData) {
        let score = payload["score"].as_u64().unwrap_or(0);
        self.score.set_text(&format!("Score final : {}", score));
    }
}

/// Heads-up display listening to the run's events
pub struct HudScene;

impl HudScene {
    fn label(ctx: &SceneContext, y: f32, text: &str, style: TextStyle) -> GameObject {
        let label = ctx.add.text(16.0, y, text, style.family(FONT_FAMILY));
        label.set_origin(0.0, 0.0).set_shadow(0.0, 0.0, "#000", 10.0);
        label
    }
}

impl Scene for HudScene {
    fn key(&self) -> &str {
        HUD
    }

    fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
        let texts = HudTexts {
            score: Self::label(ctx, 14.0, "Score : 0", TextStyle::sized("22px", "#e2e8f0")),
            speed: Self::label(ctx, 44.0, "Vitesse ennemis : 0", TextStyle::sized("16px", "#a5f3fc")),
        };

        let Some(main) = ctx.scene.get(MAIN) else {
            log::warn!("HUD started without a run to follow");
            return;
        };

        let progress = texts.clone();
        let on_score = main
            .events
            .on(SCORE_CHANGED, move |payload| progress.show_progress(payload));
        let on_game_over = main
            .events
            .on(GAME_OVER_EVENT, move |payload| texts.show_final(payload));

        ctx.events.once(SHUTDOWN, move |_| {
            main.events.off(SCORE_CHANGED, on_score);
            main.events.off(GAME_OVER_EVENT, on_game_over);
        });
    }
}
