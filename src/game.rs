//! Engine handle and frame loop
//!
//! [`Game`] owns the scene manager, the host's clock and drawing surface.
//! There is no global instance: whoever builds a `Game` holds it, and the
//! scheduled frame callback only keeps a weak reference.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::GameConfig;
use crate::error::Result;
use crate::math::Random;
use crate::platform::SharedClock;
use crate::renderer::{dispatch_pointer, render_frame, PointerKind, Surface};
use crate::scene::{Scene, SceneContext, SceneData, SceneManager, SceneServices};

/// What the host environment provides to the engine
pub struct Host {
    pub clock: SharedClock,
    pub surface: Box<dyn Surface>,
}

struct Engine {
    config: GameConfig,
    clock: SharedClock,
    surface: Box<dyn Surface>,
    scenes: SceneManager,
    /// A frame is scheduled or about to be
    running: bool,
    destroyed: bool,
    last_time: f64,
    frames: u64,
}

/// Shared handle to a running engine
#[derive(Clone)]
pub struct Game {
    engine: Rc<RefCell<Engine>>,
}

/// Non-owning handle, for host callbacks
#[derive(Clone)]
pub struct WeakGame {
    engine: Weak<RefCell<Engine>>,
}

impl WeakGame {
    pub fn upgrade(&self) -> Option<Game> {
        self.engine.upgrade().map(|engine| Game { engine })
    }
}

impl Game {
    /// Build the engine and activate the first scene.
    ///
    /// Fails on invalid dimensions or duplicate scene keys; in that case no
    /// scene is created and no frame is requested.
    pub fn new(config: GameConfig, scenes: Vec<Box<dyn Scene>>, host: Host) -> Result<Game> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| host.clock.now().to_bits());
        let services = SceneServices {
            clock: Rc::clone(&host.clock),
            bounds: config.world_bounds(),
            gravity_y: config.physics.gravity_y,
            random: Random::new(seed),
        };
        let scenes = SceneManager::new(scenes, &services)?;
        let first = scenes.first_key();

        log::info!(
            "engine ready: {}x{}, seed {}",
            config.output_width,
            config.output_height,
            seed
        );

        let game = Game {
            engine: Rc::new(RefCell::new(Engine {
                config,
                clock: host.clock,
                surface: host.surface,
                scenes,
                running: false,
                destroyed: false,
                last_time: 0.0,
                frames: 0,
            })),
        };

        if let Some(first) = first {
            game.activate_scene(&first, SceneData::Null);
        }
        Ok(game)
    }

    pub fn downgrade(&self) -> WeakGame {
        WeakGame {
            engine: Rc::downgrade(&self.engine),
        }
    }

    pub fn config(&self) -> GameConfig {
        self.engine.borrow().config.clone()
    }

    /// Activate `key` and make sure the frame loop runs. Unknown keys are ignored.
    pub fn activate_scene(&self, key: &str, data: SceneData) {
        let activated = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            let known = engine.scenes.activate(key, &data);
            engine.scenes.drain_commands() || known
        };
        if activated {
            self.ensure_loop();
        }
    }

    pub fn deactivate_scene(&self, key: &str) {
        let activated = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            engine.scenes.deactivate(key);
            engine.scenes.drain_commands()
        };
        if activated {
            self.ensure_loop();
        }
    }

    pub fn get_scene(&self, key: &str) -> Option<SceneContext> {
        self.engine.borrow().scenes.get(key)
    }

    /// Active scene keys in activation order
    pub fn active_scene_keys(&self) -> Vec<String> {
        self.engine.borrow().scenes.active_keys()
    }

    pub fn is_scene_active(&self, key: &str) -> bool {
        self.engine.borrow().scenes.is_active(key)
    }

    /// Whether the frame loop is scheduled
    pub fn is_running(&self) -> bool {
        let engine = self.engine.borrow();
        engine.running && !engine.destroyed
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.engine.borrow().frames
    }

    fn ensure_loop(&self) {
        {
            let mut engine = self.engine.borrow_mut();
            if engine.running || engine.destroyed {
                return;
            }
            engine.running = true;
            engine.last_time = engine.clock.now();
        }
        log::debug!("frame loop started");
        self.schedule_frame();
    }

    fn schedule_frame(&self) {
        let clock = Rc::clone(&self.engine.borrow().clock);
        let weak = self.downgrade();
        clock.request_frame(Box::new(move |now| {
            if let Some(game) = weak.upgrade() {
                game.tick(now);
            }
        }));
    }

    /// Run one frame at `now` (ms): timers, update + physics per active
    /// scene, queued scene commands, render, then schedule the next frame
    pub fn tick(&self, now: f64) {
        let reschedule = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            let dt = (now - engine.last_time).max(0.0);
            engine.last_time = now;
            engine.frames += 1;

            engine.scenes.pump_timers();
            engine.scenes.update(dt);

            let active = engine.scenes.active_contexts();
            render_frame(engine.surface.as_mut(), &active);
            engine.running
        };
        if reschedule {
            self.schedule_frame();
        }
    }

    /// Fire due timers between frames. Hosts call this from an interval timer.
    pub fn advance_timers(&self) {
        let activated = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            engine.scenes.pump_timers()
        };
        if activated {
            self.ensure_loop();
        }
    }

    /// Host reported a key press. Only active scenes get keyboard events;
    /// inactive ones just track the key state.
    pub fn key_down(&self, code: &str) {
        self.key_event(code, true);
    }

    pub fn key_up(&self, code: &str) {
        self.key_event(code, false);
    }

    fn key_event(&self, code: &str, down: bool) {
        let activated = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            let contexts: Vec<SceneContext> = engine.scenes.contexts().cloned().collect();
            for ctx in &contexts {
                match (ctx.is_active(), down) {
                    (true, true) => ctx.input.press(code),
                    (true, false) => ctx.input.release(code),
                    (false, _) => ctx.input.set_state(code, down),
                }
            }
            engine.scenes.drain_commands()
        };
        if activated {
            self.ensure_loop();
        }
    }

    /// Release every held key, e.g. on focus loss
    pub fn release_keys(&self) {
        let engine = self.engine.borrow();
        for ctx in engine.scenes.contexts() {
            ctx.input.release_all();
        }
    }

    /// Host reported pointer input at surface coordinates
    pub fn pointer(&self, kind: PointerKind, x: f32, y: f32) {
        let activated = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            let active = engine.scenes.active_contexts();
            dispatch_pointer(&active, kind, x, y);
            engine.scenes.drain_commands()
        };
        if activated {
            self.ensure_loop();
        }
    }

    /// Stop the loop and tear every scene down. Later calls are no-ops.
    pub fn destroy(&self) {
        let clock = {
            let mut engine = self.engine.borrow_mut();
            if engine.destroyed {
                return;
            }
            engine.destroyed = true;
            engine.running = false;
            engine.scenes.halt();
            Rc::clone(&engine.clock)
        };
        clock.cancel_frame();
        log::info!("engine destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::platform::{FrameClock, ManualClock};
    use crate::renderer::RecordingSurface;
    use crate::time::TimerConfig;
    use std::cell::Cell;

    struct Counter {
        key: &'static str,
        updates: Rc<Cell<u32>>,
    }

    impl Scene for Counter {
        fn key(&self) -> &str {
            self.key
        }

        fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
            ctx.add.rectangle(10.0, 10.0, 4.0, 4.0, 0xffffff, 1.0);
        }

        fn update(&mut self, _ctx: &SceneContext) {
            self.updates.set(self.updates.get() + 1);
        }
    }

    fn host(clock: &ManualClock, surface: &RecordingSurface) -> Host {
        Host {
            clock: Rc::new(clock.clone()),
            surface: Box::new(surface.clone()),
        }
    }

    fn counter(key: &'static str) -> (Box<dyn Scene>, Rc<Cell<u32>>) {
        let updates = Rc::new(Cell::new(0));
        (
            Box::new(Counter {
                key,
                updates: updates.clone(),
            }),
            updates,
        )
    }

    #[test]
    fn test_first_scene_starts_and_loop_is_scheduled() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let (a, updates) = counter("A");
        let (b, _) = counter("B");
        let game = Game::new(GameConfig::default(), vec![a, b], host(&clock, &surface)).unwrap();

        assert_eq!(game.active_scene_keys(), vec!["A".to_string()]);
        assert!(game.is_running());
        assert!(clock.has_pending_frame());

        clock.step(16.0);
        clock.step(16.0);
        assert_eq!(updates.get(), 2);
        assert_eq!(game.frame_count(), 2);
        assert_eq!(surface.last_frame().len(), 2);
    }

    #[test]
    fn test_construction_errors() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let (a, _) = counter("A");
        let (a2, _) = counter("A");
        let err = Game::new(GameConfig::default(), vec![a, a2], host(&clock, &surface)).err();
        assert!(matches!(err, Some(EngineError::DuplicateScene(_))));
        assert!(!clock.has_pending_frame());

        let config = GameConfig {
            output_width: 0,
            ..Default::default()
        };
        let err = Game::new(config, Vec::new(), host(&clock, &surface)).err();
        assert!(matches!(err, Some(EngineError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_long_frame_steps_full_elapsed_time() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);

        struct Mover;
        impl Scene for Mover {
            fn key(&self) -> &str {
                "Mover"
            }
            fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
                let obj = ctx.add.rectangle(100.0, 100.0, 10.0, 10.0, 0xffffff, 1.0);
                ctx.physics.add_existing(&obj).set_velocity(100.0, 0.0);
            }
        }

        let game = Game::new(GameConfig::default(), vec![Box::new(Mover)], host(&clock, &surface)).unwrap();
        clock.step(1500.0);
        let ctx = game.get_scene("Mover").unwrap();
        let x = ctx.add.objects()[0].x();
        assert!((x - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_keys_reach_active_scenes_only() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let (a, _) = counter("A");
        let (b, _) = counter("B");
        let game = Game::new(GameConfig::default(), vec![a, b], host(&clock, &surface)).unwrap();

        let a_ctx = game.get_scene("A").unwrap();
        let b_ctx = game.get_scene("B").unwrap();
        let a_key = a_ctx.input.add_key("Enter");
        let b_key = b_ctx.input.add_key("Enter");
        let b_events = Rc::new(Cell::new(0));
        let e = b_events.clone();
        b_ctx.input.on("keydown-Enter", move |_| e.set(e.get() + 1));

        game.key_down("Enter");
        assert!(a_key.is_down());
        assert!(b_key.is_down());
        assert_eq!(b_events.get(), 0);

        game.release_keys();
        assert!(!a_key.is_down() && !b_key.is_down());
    }

    #[test]
    fn test_destroy_stops_loop_and_timers() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let (a, updates) = counter("A");
        let (b, _) = counter("B");
        let game = Game::new(GameConfig::default(), vec![a, b], host(&clock, &surface)).unwrap();

        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        let timer = game
            .get_scene("A")
            .unwrap()
            .time
            .add_event(TimerConfig::every(10.0), move || f.set(f.get() + 1));

        game.destroy();
        game.destroy();
        assert!(timer.is_removed());
        assert!(!game.is_running());
        assert!(!clock.has_pending_frame());
        assert!(game.active_scene_keys().is_empty());

        clock.advance(100.0);
        game.advance_timers();
        game.tick(clock.now());
        game.activate_scene("B", SceneData::Null);
        assert_eq!(fired.get(), 0);
        assert_eq!(updates.get(), 0);
        assert!(game.active_scene_keys().is_empty());
    }

    #[test]
    fn test_dropping_the_game_ends_the_loop() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let (a, updates) = counter("A");
        let game = Game::new(GameConfig::default(), vec![a], host(&clock, &surface)).unwrap();
        let weak = game.downgrade();
        drop(game);

        assert!(weak.upgrade().is_none());
        clock.step(16.0);
        assert_eq!(updates.get(), 0);
        assert!(!clock.has_pending_frame());
    }

    #[test]
    fn test_timers_fire_between_frames() {
        let clock = ManualClock::new();
        let surface = RecordingSurface::new(960, 720);
        let (a, _) = counter("A");
        let game = Game::new(GameConfig::default(), vec![a], host(&clock, &surface)).unwrap();

        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        game.get_scene("A")
            .unwrap()
            .time
            .add_event(TimerConfig::once(5.0), move || f.set(f.get() + 1));

        clock.advance(5.0);
        game.advance_timers();
        assert_eq!(fired.get(), 1);
    }
}
