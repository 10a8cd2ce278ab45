/// Integration tests for the Arcade Dash scenes
///
/// A whole session is played headlessly: menu, run with HUD, game over
/// panel and restart.
use std::cell::Cell;
use std::rc::Rc;

use arcade_dash::input::codes;
use arcade_dash::platform::ManualClock;
use arcade_dash::renderer::{PointerKind, RecordingSurface};
use arcade_dash::scenes::{self, GAME_OVER, GAME_OVER_EVENT, HUD, MAIN, MENU, SCORE_CHANGED};
use arcade_dash::{Game, GameConfig, Host, SceneContext};

const FRAME_MS: f64 = 16.0;
/// Upper bound for a stationary player to be caught
const MAX_RUN_FRAMES: u32 = 120_000 / 16;

struct Session {
    clock: ManualClock,
    surface: RecordingSurface,
    game: Game,
}

fn start_session() -> Session {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let host = Host {
        clock: Rc::new(clock.clone()),
        surface: Box::new(surface.clone()),
    };
    let config = GameConfig::default().with_seed(7);
    let game = Game::new(config, scenes::arcade_dash(), host).unwrap();
    Session { clock, surface, game }
}

fn texts_of(ctx: &SceneContext) -> Vec<String> {
    ctx.add.objects().iter().filter_map(|o| o.text()).collect()
}

fn click_play(session: &Session) {
    session.game.pointer(PointerKind::Move, 480.0, 410.0);
    session.game.pointer(PointerKind::Down, 480.0, 410.0);
}

#[test]
fn test_menu_is_shown_first() {
    let session = start_session();
    session.clock.step(FRAME_MS);

    assert_eq!(session.game.active_scene_keys(), vec![MENU.to_string()]);
    let texts = session.surface.texts();
    assert!(texts.iter().any(|t| t == "▶ Commencer"));
}

#[test]
fn test_play_button_starts_run_and_hud() {
    let session = start_session();
    session.clock.step(FRAME_MS);
    click_play(&session);

    assert_eq!(
        session.game.active_scene_keys(),
        vec![MAIN.to_string(), HUD.to_string()]
    );
    let hud = session.game.get_scene(HUD).unwrap();
    assert!(texts_of(&hud).contains(&"Score : 0".to_string()));
    assert!(session.game.get_scene(MENU).unwrap().add.is_empty());
}

#[test]
fn test_hud_follows_score() {
    let session = start_session();
    session.clock.step(FRAME_MS);
    click_play(&session);

    session.clock.advance(500.0);
    session.game.advance_timers();

    let hud = session.game.get_scene(HUD).unwrap();
    let texts = texts_of(&hud);
    assert!(texts.contains(&"Score : 35".to_string()), "{:?}", texts);
    assert!(texts.contains(&"Vitesse ennemis : 120".to_string()), "{:?}", texts);
}

#[test]
fn test_clicking_outside_the_button_does_nothing() {
    let session = start_session();
    session.clock.step(FRAME_MS);
    session.game.pointer(PointerKind::Down, 20.0, 20.0);
    assert_eq!(session.game.active_scene_keys(), vec![MENU.to_string()]);
}

#[test]
fn test_full_session_game_over_and_restart() {
    let session = start_session();
    session.clock.step(FRAME_MS);
    click_play(&session);

    let main = session.game.get_scene(MAIN).unwrap();
    let final_score = Rc::new(Cell::new(None));
    let seen = final_score.clone();
    main.events.on(GAME_OVER_EVENT, move |payload| {
        seen.set(payload["score"].as_u64());
    });
    assert_eq!(main.events.listener_count(SCORE_CHANGED), 1);

    // Stand still in the middle until a drone arrives
    for _ in 0..MAX_RUN_FRAMES {
        session.clock.step(FRAME_MS);
        if session.game.is_scene_active(GAME_OVER) {
            break;
        }
    }
    assert!(session.game.is_scene_active(GAME_OVER), "player was never hit");
    assert!(!session.game.is_scene_active(MAIN));
    assert!(!session.game.is_scene_active(HUD));

    let score = final_score.get().expect("game-over event carries the score");
    assert!(score > 0);
    assert_eq!(score % 35, 0);
    // HUD unsubscribed on shutdown
    assert_eq!(main.events.listener_count(SCORE_CHANGED), 0);

    session.clock.step(FRAME_MS);
    let texts = session.surface.texts();
    assert!(texts.contains(&"Game Over".to_string()));
    assert!(texts.contains(&format!("Score : {}", score)));

    session.game.key_down(codes::ENTER);
    session.game.key_up(codes::ENTER);
    assert_eq!(
        session.game.active_scene_keys(),
        vec![MAIN.to_string(), HUD.to_string()]
    );
    let hud = session.game.get_scene(HUD).unwrap();
    assert!(texts_of(&hud).contains(&"Score : 0".to_string()));
    assert_eq!(main.events.listener_count(SCORE_CHANGED), 1);

    // The panel's keys are gone with it
    session.game.key_down(codes::SPACE);
    assert!(!session.game.is_scene_active(GAME_OVER));
    assert_eq!(main.events.listener_count(SCORE_CHANGED), 1);
}

#[test]
fn test_destroy_mid_run_stops_everything() {
    let session = start_session();
    session.clock.step(FRAME_MS);
    click_play(&session);
    session.clock.step(FRAME_MS);

    let main = session.game.get_scene(MAIN).unwrap();
    assert!(main.time.active_count() >= 3);

    session.game.destroy();
    assert!(!session.game.is_running());
    assert!(session.game.active_scene_keys().is_empty());
    assert_eq!(main.time.active_count(), 0);
    assert!(!session.clock.step(FRAME_MS));
}
