/// Integration tests for the engine core
///
/// These drive a `Game` through a manual clock and a recording surface and
/// check scene lifecycle, physics and teardown as a host would see them.
use std::cell::Cell;
use std::rc::Rc;

use arcade_dash::display::TextStyle;
use arcade_dash::platform::ManualClock;
use arcade_dash::renderer::RecordingSurface;
use arcade_dash::{Game, GameConfig, Host, Scene, SceneContext, SceneData};

fn host(clock: &ManualClock, surface: &RecordingSurface) -> Host {
    Host {
        clock: Rc::new(clock.clone()),
        surface: Box::new(surface.clone()),
    }
}

/// Labels itself, optionally hands over to another scene, counts updates
struct Labelled {
    key: &'static str,
    hand_over_to: Option<&'static str>,
    updates: Rc<Cell<u32>>,
}

impl Labelled {
    fn boxed(key: &'static str, hand_over_to: Option<&'static str>) -> (Box<dyn Scene>, Rc<Cell<u32>>) {
        let updates = Rc::new(Cell::new(0));
        let scene = Labelled {
            key,
            hand_over_to,
            updates: updates.clone(),
        };
        (Box::new(scene), updates)
    }
}

impl Scene for Labelled {
    fn key(&self) -> &str {
        self.key
    }

    fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
        ctx.add
            .text(100.0, 100.0, &format!("from {}", self.key), TextStyle::sized("20px", "#fff"));
        if let Some(next) = self.hand_over_to {
            ctx.scene.start(next, SceneData::Null);
        }
    }

    fn update(&mut self, _ctx: &SceneContext) {
        self.updates.set(self.updates.get() + 1);
    }
}

#[test]
fn test_scene_handing_over_in_create_never_updates() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let (a, a_updates) = Labelled::boxed("A", Some("B"));
    let (b, b_updates) = Labelled::boxed("B", None);
    let game = Game::new(GameConfig::default(), vec![a, b], host(&clock, &surface)).unwrap();

    assert_eq!(game.active_scene_keys(), vec!["B".to_string()]);
    assert!(!game.is_scene_active("A"));

    clock.step(16.0);
    assert_eq!(a_updates.get(), 0);
    assert_eq!(b_updates.get(), 1);
    assert_eq!(surface.texts(), vec!["from B".to_string()]);

    // A's objects went away with its shutdown
    assert!(game.get_scene("A").unwrap().add.is_empty());
}

#[test]
fn test_reactivation_starts_from_an_empty_display_list() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let (a, _) = Labelled::boxed("A", None);
    let game = Game::new(GameConfig::default(), vec![a], host(&clock, &surface)).unwrap();
    let ctx = game.get_scene("A").unwrap();
    ctx.add.rectangle(5.0, 5.0, 2.0, 2.0, 0xffffff, 1.0);
    assert_eq!(ctx.add.len(), 2);

    game.deactivate_scene("A");
    assert!(ctx.add.is_empty());
    assert!(!ctx.is_active());

    game.activate_scene("A", SceneData::Null);
    assert_eq!(ctx.add.len(), 1);
    assert_eq!(ctx.add.objects()[0].text().as_deref(), Some("from A"));
}

#[test]
fn test_unknown_scene_key_is_ignored() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let (a, _) = Labelled::boxed("A", None);
    let game = Game::new(GameConfig::default(), vec![a], host(&clock, &surface)).unwrap();

    game.activate_scene("Nope", SceneData::Null);
    game.deactivate_scene("Nope");
    assert_eq!(game.active_scene_keys(), vec!["A".to_string()]);
    assert!(game.get_scene("Nope").is_none());
}

/// Moving box, a static box and an overlap counter between them
struct Arena {
    hits: Rc<Cell<u32>>,
}

impl Scene for Arena {
    fn key(&self) -> &str {
        "Arena"
    }

    fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
        let mover = ctx.add.rectangle(100.0, 100.0, 10.0, 10.0, 0x34d399, 1.0);
        ctx.physics.add_existing(&mover).set_velocity(100.0, 0.0);

        let wall = ctx.add.rectangle(300.0, 100.0, 10.0, 10.0, 0xef4444, 1.0);
        ctx.physics.add_existing(&wall);
        let walls = ctx.physics.add_group();
        walls.add(&wall);

        let hits = self.hits.clone();
        ctx.physics
            .add_overlap(&mover, &walls, move |_, _| hits.set(hits.get() + 1));
    }
}

#[test]
fn test_velocity_moves_bodies_by_elapsed_time() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let hits = Rc::new(Cell::new(0));
    let arena = Arena { hits: hits.clone() };
    let game = Game::new(GameConfig::default(), vec![Box::new(arena)], host(&clock, &surface)).unwrap();

    clock.step(500.0);
    let mover = game.get_scene("Arena").unwrap().add.objects()[0].clone();
    assert!((mover.x() - 150.0).abs() < 1e-3);
    assert!((mover.y() - 100.0).abs() < 1e-3);
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_long_gap_moves_bodies_by_the_whole_gap() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let hits = Rc::new(Cell::new(0));
    let arena = Arena { hits: hits.clone() };
    let game = Game::new(GameConfig::default(), vec![Box::new(arena)], host(&clock, &surface)).unwrap();

    // e.g. a tab coming back from the background
    clock.step(1500.0);
    let mover = game.get_scene("Arena").unwrap().add.objects()[0].clone();
    assert!((mover.x() - 250.0).abs() < 1e-3);
}

#[test]
fn test_overlap_fires_every_step_while_touching() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let hits = Rc::new(Cell::new(0));
    let arena = Arena { hits: hits.clone() };
    let game = Game::new(GameConfig::default(), vec![Box::new(arena)], host(&clock, &surface)).unwrap();
    let objects = game.get_scene("Arena").unwrap().add.objects();
    let (mover, wall) = (objects[0].clone(), objects[1].clone());

    // Park the mover on top of the wall
    game.get_scene("Arena").unwrap().physics.add_existing(&mover).set_velocity(0.0, 0.0);
    mover.set_position(wall.x(), wall.y());

    clock.step(16.0);
    assert_eq!(hits.get(), 1);
    clock.step(16.0);
    assert_eq!(hits.get(), 2);

    mover.set_position(500.0, 500.0);
    clock.step(16.0);
    assert_eq!(hits.get(), 2);
}

#[test]
fn test_destroy_stops_loop_and_ignores_later_calls() {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(960, 720);
    let (a, updates) = Labelled::boxed("A", None);
    let (b, _) = Labelled::boxed("B", None);
    let game = Game::new(GameConfig::default(), vec![a, b], host(&clock, &surface)).unwrap();
    clock.step(16.0);
    let frames = game.frame_count();

    game.destroy();
    assert!(!game.is_running());
    assert!(!clock.has_pending_frame());
    assert!(!clock.step(16.0));
    assert_eq!(game.frame_count(), frames);
    assert_eq!(updates.get(), 1);

    game.activate_scene("B", SceneData::Null);
    assert!(!game.is_scene_active("B"));
    game.destroy();
}
