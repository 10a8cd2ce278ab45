//! The run: steer the green square, dodge the drones, score over time

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::json;

use super::{GAME_OVER, GAME_OVER_EVENT, HUD, MAIN, SCORE_CHANGED};
use crate::display::GameObject;
use crate::input::{codes, CursorKeys, Key};
use crate::math::direction;
use crate::physics::{Body, Group};
use crate::scene::{Scene, SceneContext, SceneData, SHUTDOWN};
use crate::time::{TimerConfig, TimerEvent};

pub const PLAYER_SPEED: f32 = 260.0;
pub const ENEMY_BASE_SPEED: f32 = 120.0;
pub const ENEMY_ACCELERATION: f32 = 12.0;
pub const SCORE_TICK: u64 = 35;

const PLAYER_SIZE: f32 = 46.0;
const PLAYER_COLOR: u32 = 0x34d399;
const PLAYER_DRAG: f32 = 0.85;
const ENEMY_COLOR: u32 = 0xef4444;
const ENEMY_ALPHA: f32 = 0.95;

pub const SPAWN_DELAY_MS: f64 = 1200.0;
pub const MIN_SPAWN_DELAY_MS: f64 = 450.0;
const SPAWN_DELAY_STEP_MS: f64 = 60.0;
pub const SCORE_DELAY_MS: f64 = 500.0;
pub const DIFFICULTY_DELAY_MS: f64 = 7000.0;

/// State of one run, from `create` until the player is hit
struct Run {
    ctx: SceneContext,
    player: GameObject,
    player_body: Body,
    cursors: CursorKeys,
    wasd: HashMap<String, Key>,
    enemies: Group,
    score: Cell<u64>,
    enemy_speed: Cell<f32>,
    spawn_timer: RefCell<Option<TimerEvent>>,
    timers: RefCell<Vec<TimerEvent>>,
    running: Cell<bool>,
}

impl Run {
    fn start(ctx: &SceneContext) -> Rc<Run> {
        ctx.add
            .rectangle(0.0, 0.0, 2000.0, 2000.0, 0x0b1221, 0.65)
            .set_origin(0.0, 0.0);
        ctx.add
            .rectangle(0.0, 0.0, 2000.0, 2000.0, 0x16a34a, 0.06)
            .set_origin(0.0, 0.0);

        let cursors = ctx.input.create_cursor_keys();
        let wasd = ctx
            .input
            .add_keys(&[("w", codes::W), ("a", codes::A), ("s", codes::S), ("d", codes::D)]);

        let bounds = ctx.physics.bounds();
        let player = ctx.add.rectangle(
            bounds.center_x,
            bounds.center_y,
            PLAYER_SIZE,
            PLAYER_SIZE,
            PLAYER_COLOR,
            1.0,
        );
        let player_body = ctx.physics.add_existing(&player);
        player_body
            .set_collide_world_bounds(true)
            .set_max_velocity(PLAYER_SPEED)
            .set_drag(PLAYER_DRAG);

        let run = Rc::new(Run {
            ctx: ctx.clone(),
            player,
            player_body,
            cursors,
            wasd,
            enemies: ctx.physics.add_group(),
            score: Cell::new(0),
            enemy_speed: Cell::new(ENEMY_BASE_SPEED),
            spawn_timer: RefCell::new(None),
            timers: RefCell::new(Vec::new()),
            running: Cell::new(true),
        });

        let spawn = ctx
            .time
            .add_event(TimerConfig::every(SPAWN_DELAY_MS), with_run(&run, Run::spawn_enemy));
        let score = ctx.time.add_event(
            TimerConfig::every(SCORE_DELAY_MS),
            with_run(&run, |run| run.add_score(SCORE_TICK)),
        );
        let difficulty = ctx.time.add_event(
            TimerConfig::every(DIFFICULTY_DELAY_MS),
            with_run(&run, Run::increase_difficulty),
        );
        *run.spawn_timer.borrow_mut() = Some(spawn.clone());
        *run.timers.borrow_mut() = vec![spawn, score, difficulty];

        let weak = Rc::downgrade(&run);
        ctx.physics.add_overlap(&run.player, &run.enemies, move |_, _| {
            if let Some(run) = weak.upgrade() {
                run.finish();
            }
        });

        let weak = Rc::downgrade(&run);
        ctx.events.once(SHUTDOWN, move |_| {
            if let Some(run) = weak.upgrade() {
                run.stop_timers();
            }
        });

        run.emit_score();
        run
    }

    fn held(&self, cursor: &Key, letter: &str) -> bool {
        cursor.is_down() || self.wasd.get(letter).is_some_and(Key::is_down)
    }

    fn handle_movement(&self) {
        let body = &self.player_body;
        body.set_velocity(0.0, 0.0);

        if self.held(&self.cursors.left, "a") {
            body.set_velocity_x(-PLAYER_SPEED);
        }
        if self.held(&self.cursors.right, "d") {
            body.set_velocity_x(PLAYER_SPEED);
        }
        if self.held(&self.cursors.up, "w") {
            body.set_velocity_y(-PLAYER_SPEED);
        }
        if self.held(&self.cursors.down, "s") {
            body.set_velocity_y(PLAYER_SPEED);
        }

        body.scale_velocity_to(PLAYER_SPEED);
    }

    fn spawn_enemy(&self) {
        let bounds = self.ctx.physics.bounds();
        let rng = &self.ctx.random;
        let size = rng.between(20, 40) as f32;
        let across_x = || rng.between(bounds.left as i32, bounds.right as i32) as f32;
        let across_y = || rng.between(bounds.top as i32, bounds.bottom as i32) as f32;

        let (x, y) = match rng.between(0, 3) {
            0 => (bounds.left - size, across_y()),
            1 => (bounds.right + size, across_y()),
            2 => (across_x(), bounds.top - size),
            _ => (across_x(), bounds.bottom + size),
        };

        let enemy = self.ctx.add.rectangle(x, y, size, size, ENEMY_COLOR, ENEMY_ALPHA);
        let heading = direction(enemy.position(), self.player.position()) * self.enemy_speed.get();
        self.ctx
            .physics
            .add_existing(&enemy)
            .set_velocity(heading.x, heading.y)
            .set_allow_gravity(false)
            .set_bounce(1.0, 1.0)
            .set_collide_world_bounds(true);
        self.enemies.add(&enemy);
    }

    fn add_score(&self, amount: u64) {
        self.score.set(self.score.get() + amount);
        self.emit_score();
    }

    fn emit_score(&self) {
        self.ctx.events.emit(
            SCORE_CHANGED,
            &json!({ "score": self.score.get(), "enemySpeed": self.enemy_speed.get() }),
        );
    }

    fn increase_difficulty(&self) {
        self.enemy_speed.set(self.enemy_speed.get() + ENEMY_ACCELERATION);
        if let Some(spawn) = self.spawn_timer.borrow().as_ref() {
            spawn.set_delay((spawn.delay() - SPAWN_DELAY_STEP_MS).max(MIN_SPAWN_DELAY_MS));
        }
        log::debug!("enemy speed now {}", self.enemy_speed.get());
    }

    fn stop_timers(&self) {
        for timer in self.timers.borrow().iter() {
            timer.remove();
        }
    }

    /// Player hit: end the run once, hand over to the game-over panel
    fn finish(&self) {
        if !self.running.replace(false) {
            return;
        }
        let score = self.score.get();
        log::info!("run over with score {}", score);

        self.stop_timers();
        self.enemies.clear(true);

        self.ctx.events.emit(GAME_OVER_EVENT, &json!({ "score": score }));
        self.ctx.scene.launch(GAME_OVER, json!({ "score": score }));
        self.ctx.scene.stop(HUD);
        self.ctx.scene.stop_self();
    }
}

/// Timer callback that calls `f` while the run is alive
fn with_run(run: &Rc<Run>, f: impl Fn(&Run) + 'static) -> impl FnMut() + 'static {
    let weak: Weak<Run> = Rc::downgrade(run);
    move || {
        if let Some(run) = weak.upgrade() {
            f(&run);
        }
    }
}

/// Main gameplay scene
#[derive(Default)]
pub struct MainScene {
    run: Option<Rc<Run>>,
}

impl Scene for MainScene {
    fn key(&self) -> &str {
        MAIN
    }

    fn create(&mut self, ctx: &SceneContext, _data: &SceneData) {
        self.run = Some(Run::start(ctx));
    }

    fn update(&mut self, _ctx: &SceneContext) {
        if let Some(run) = &self.run {
            run.handle_movement();
        }
    }
}
