//! Scene registry, activation order and command processing

use std::collections::HashSet;
use std::rc::Rc;

use super::context::{SceneBus, SceneCommand, SceneServices};
use super::{Scene, SceneContext, SceneData, SHUTDOWN};
use crate::error::{EngineError, Result};

/// Upper bound on commands applied per drain, so two scenes that keep
/// restarting each other cannot hang a frame
const MAX_COMMANDS_PER_DRAIN: usize = 256;

struct SceneSlot {
    scene: Box<dyn Scene>,
    ctx: SceneContext,
}

/// Owns every scene and decides which ones are active
pub struct SceneManager {
    slots: Vec<SceneSlot>,
    /// Slot indices in activation order
    active: Vec<usize>,
    bus: Rc<SceneBus>,
}

impl SceneManager {
    pub(crate) fn new(scenes: Vec<Box<dyn Scene>>, services: &SceneServices) -> Result<Self> {
        let bus = Rc::new(SceneBus::default());
        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(scenes.len());

        for scene in scenes {
            let key = scene.key().to_string();
            if !seen.insert(key.clone()) {
                return Err(EngineError::DuplicateScene(key));
            }
            let ctx = SceneContext::new(&key, services, Rc::downgrade(&bus));
            bus.register(ctx.clone());
            slots.push(SceneSlot { scene, ctx });
        }

        Ok(Self {
            slots,
            active: Vec::new(),
            bus,
        })
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.ctx.key() == key)
    }

    /// Key of the first registered scene
    pub fn first_key(&self) -> Option<String> {
        self.slots.first().map(|slot| slot.ctx.key().to_string())
    }

    /// Activate `key`, running `create` if it was inactive.
    ///
    /// Returns false for unknown keys.
    pub fn activate(&mut self, key: &str, data: &SceneData) -> bool {
        let Some(index) = self.index_of(key) else {
            log::debug!("activate: no scene registered as `{}`", key);
            return false;
        };
        if self.slots[index].ctx.is_active() {
            return true;
        }

        log::info!("scene `{}` starting", key);
        let slot = &mut self.slots[index];
        slot.ctx.set_active(true);
        self.active.push(index);
        slot.scene.create(&slot.ctx, data);
        true
    }

    /// Deactivate `key`, discarding its objects and bodies
    pub fn deactivate(&mut self, key: &str) {
        let Some(index) = self.index_of(key) else {
            log::debug!("deactivate: no scene registered as `{}`", key);
            return;
        };
        let ctx = self.slots[index].ctx.clone();
        if !ctx.is_active() {
            return;
        }

        log::info!("scene `{}` shutting down", key);
        ctx.events.emit(SHUTDOWN, &SceneData::Null);
        ctx.set_active(false);
        ctx.add.clear();
        ctx.physics.reset();
        self.active.retain(|&i| i != index);
    }

    pub fn get(&self, key: &str) -> Option<SceneContext> {
        self.index_of(key).map(|i| self.slots[i].ctx.clone())
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.get(key).is_some_and(|ctx| ctx.is_active())
    }

    /// Active scene keys in activation order
    pub fn active_keys(&self) -> Vec<String> {
        self.active
            .iter()
            .map(|&i| self.slots[i].ctx.key().to_string())
            .collect()
    }

    /// Contexts of the active scenes in activation order
    pub fn active_contexts(&self) -> Vec<SceneContext> {
        self.active.iter().map(|&i| self.slots[i].ctx.clone()).collect()
    }

    /// Every registered context, active or not
    pub fn contexts(&self) -> impl Iterator<Item = &SceneContext> {
        self.slots.iter().map(|slot| &slot.ctx)
    }

    /// Apply queued scene commands in FIFO order.
    ///
    /// Returns true when at least one known scene was activated.
    pub fn drain_commands(&mut self) -> bool {
        let mut activated = false;
        for _ in 0..MAX_COMMANDS_PER_DRAIN {
            let Some(command) = self.bus.pop() else {
                return activated;
            };
            match command {
                SceneCommand::Activate { key, data } => activated |= self.activate(&key, &data),
                SceneCommand::Deactivate(key) => self.deactivate(&key),
            }
        }
        log::warn!("scene command limit reached, dropping the rest of the queue");
        self.bus.clear();
        activated
    }

    /// Run `update` and the physics step of every active scene
    pub fn update(&mut self, dt_ms: f64) -> bool {
        let mut activated = false;
        for index in self.active.clone() {
            let slot = &mut self.slots[index];
            if !slot.ctx.is_active() {
                continue;
            }
            slot.scene.update(&slot.ctx);
            slot.ctx.physics.step(dt_ms);
            activated |= self.drain_commands();
        }
        activated
    }

    /// Fire due timers of every scene
    pub fn pump_timers(&mut self) -> bool {
        for slot in &self.slots {
            slot.ctx.time.update();
        }
        self.drain_commands()
    }

    /// Tear every scene down for good: timers, listeners, objects and bodies
    /// are dropped without running shutdown listeners
    pub fn halt(&mut self) {
        for slot in &self.slots {
            let ctx = &slot.ctx;
            ctx.time.remove_all();
            ctx.events.remove_all();
            ctx.input.remove_all_listeners();
            ctx.add.clear();
            ctx.physics.reset();
            ctx.set_active(false);
        }
        self.active.clear();
        self.bus.clear();
    }
}
