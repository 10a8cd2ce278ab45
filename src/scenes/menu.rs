//! Title screen

use super::{ACCENT, ACCENT_HOVER, FONT_FAMILY, HUD, INK, MAIN, MENU};
use crate::display::{Padding, TextStyle, POINTER_DOWN, POINTER_OUT, POINTER_OVER};
use crate::scene::{Scene, SceneContext, SceneData};

pub struct MenuScene;

impl Scene for MenuScene {
    fn key(&self) -> &str {
        MENU
    }

    fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
        let bounds = ctx.physics.bounds();
        let cx = bounds.center_x;

        ctx.add
            .rectangle(0.0, 0.0, 2000.0, 2000.0, 0x0b1221, 0.8)
            .set_origin(0.0, 0.0);
        ctx.add
            .rectangle(0.0, 0.0, 2000.0, 2000.0, 0x22c55e, 0.05)
            .set_origin(0.0, 0.0);

        ctx.add.text(
            cx,
            250.0,
            "Arcade Dash",
            TextStyle::sized("64px", ACCENT).family(FONT_FAMILY).bold(),
        );
        ctx.add.text(
            cx,
            320.0,
            "Esquivez les drones rouges et survivez !",
            TextStyle::sized("22px", "#e2e8f0").family(FONT_FAMILY),
        );

        let play = ctx.add.text(
            cx,
            410.0,
            "▶ Commencer",
            TextStyle::sized("26px", INK)
                .family(FONT_FAMILY)
                .bold()
                .background(ACCENT, Padding { x: 18.0, y: 12.0 }),
        );
        play.set_interactive(true);

        ctx.add.text(
            cx,
            480.0,
            "Contrôles : WASD ou flèches | Évitez le contact",
            TextStyle::sized("16px", "#e5e7eb").family(FONT_FAMILY),
        );

        let button = play.clone();
        play.on(POINTER_OVER, move |_| {
            button.set_style(&TextStyle {
                background_color: Some(ACCENT_HOVER.to_string()),
                ..Default::default()
            });
        });
        let button = play.clone();
        play.on(POINTER_OUT, move |_| {
            button.set_style(&TextStyle {
                background_color: Some(ACCENT.to_string()),
                ..Default::default()
            });
        });

        let scene = ctx.scene.clone();
        play.on(POINTER_DOWN, move |_| {
            log::info!("run starting from the menu");
            scene.start(MAIN, SceneData::Null);
            scene.launch(HUD, SceneData::Null);
        });
    }
}
