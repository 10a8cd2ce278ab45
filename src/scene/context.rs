//! Capabilities handed to scene code

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use super::SceneData;
use crate::display::DisplayList;
use crate::events::EventEmitter;
use crate::input::Keyboard;
use crate::math::Random;
use crate::physics::{Bounds, PhysicsWorld};
use crate::platform::SharedClock;
use crate::time::TimePlugin;

/// Deferred scene-manager operation
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Activate { key: String, data: SceneData },
    Deactivate(String),
}

/// Command queue and scene directory shared by every [`ScenePlugin`]
#[derive(Default)]
pub(crate) struct SceneBus {
    commands: RefCell<VecDeque<SceneCommand>>,
    directory: RefCell<HashMap<String, SceneContext>>,
}

impl SceneBus {
    pub(crate) fn push(&self, command: SceneCommand) {
        self.commands.borrow_mut().push_back(command);
    }

    pub(crate) fn pop(&self) -> Option<SceneCommand> {
        self.commands.borrow_mut().pop_front()
    }

    pub(crate) fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    pub(crate) fn register(&self, ctx: SceneContext) {
        self.directory.borrow_mut().insert(ctx.key().to_string(), ctx);
    }

    fn lookup(&self, key: &str) -> Option<SceneContext> {
        self.directory.borrow().get(key).cloned()
    }
}

/// Scene transitions as seen from inside one scene
///
/// Requests are queued and applied by the engine once the current
/// create/update/callback pass returns.
#[derive(Clone)]
pub struct ScenePlugin {
    owner: String,
    bus: Weak<SceneBus>,
}

impl ScenePlugin {
    pub(crate) fn new(owner: &str, bus: Weak<SceneBus>) -> Self {
        Self {
            owner: owner.to_string(),
            bus,
        }
    }

    fn send(&self, command: SceneCommand) {
        match self.bus.upgrade() {
            Some(bus) => bus.push(command),
            None => log::debug!("scene `{}` sent a command after engine teardown", self.owner),
        }
    }

    /// Stop this scene and activate `key`
    pub fn start(&self, key: &str, data: SceneData) {
        self.send(SceneCommand::Deactivate(self.owner.clone()));
        self.send(SceneCommand::Activate {
            key: key.to_string(),
            data,
        });
    }

    /// Activate `key` alongside this scene
    pub fn launch(&self, key: &str, data: SceneData) {
        self.send(SceneCommand::Activate {
            key: key.to_string(),
            data,
        });
    }

    pub fn stop(&self, key: &str) {
        self.send(SceneCommand::Deactivate(key.to_string()));
    }

    pub fn stop_self(&self) {
        self.send(SceneCommand::Deactivate(self.owner.clone()));
    }

    /// Capabilities of another scene, e.g. to subscribe to its events
    pub fn get(&self, key: &str) -> Option<SceneContext> {
        self.bus.upgrade()?.lookup(key)
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.get(key).is_some_and(|ctx| ctx.is_active())
    }
}

/// Everything a scene may touch. Cloning shares the same scene.
#[derive(Clone)]
pub struct SceneContext {
    key: Rc<str>,
    active: Rc<Cell<bool>>,
    /// Display list factory
    pub add: DisplayList,
    pub physics: PhysicsWorld,
    pub time: TimePlugin,
    pub input: Keyboard,
    /// Intra- and inter-scene events; also receives [`super::SHUTDOWN`]
    pub events: EventEmitter<SceneData>,
    pub scene: ScenePlugin,
    pub random: Random,
}

/// Shared engine services used to build each scene's context
#[derive(Clone)]
pub(crate) struct SceneServices {
    pub clock: SharedClock,
    pub bounds: Bounds,
    pub gravity_y: f32,
    pub random: Random,
}

impl SceneContext {
    pub(crate) fn new(key: &str, services: &SceneServices, bus: Weak<SceneBus>) -> Self {
        Self {
            key: Rc::from(key),
            active: Rc::new(Cell::new(false)),
            add: DisplayList::new(),
            physics: PhysicsWorld::new(services.bounds, services.gravity_y),
            time: TimePlugin::new(Rc::clone(&services.clock)),
            input: Keyboard::new(),
            events: EventEmitter::new(),
            scene: ScenePlugin::new(key, bus),
            random: services.random.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.set(active);
    }
}
