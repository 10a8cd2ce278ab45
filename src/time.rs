//! Timer events
//!
//! Each scene owns a [`TimePlugin`]. Timers are armed against the shared
//! [`FrameClock`](crate::platform::FrameClock) and fire whenever the plugin
//! is pumped, which the engine does from its frame tick and from the host's
//! interval timer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::platform::SharedClock;

/// Shortest allowed delay, so a repeating timer can never spin
pub const MIN_TIMER_DELAY_MS: f64 = 1.0;

/// Most catch-up fires a single timer may do in one pump
const MAX_CATCH_UP_FIRES: u32 = 64;

/// Timer creation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerConfig {
    /// Milliseconds between fires
    pub delay_ms: f64,
    /// Fire every `delay_ms` until removed, instead of once
    pub repeating: bool,
}

impl TimerConfig {
    /// Fire once after `delay_ms`
    pub fn once(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            repeating: false,
        }
    }

    /// Fire every `delay_ms`
    pub fn every(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            repeating: true,
        }
    }
}

struct TimerShared {
    delay: Cell<f64>,
    repeating: bool,
    next_fire_at: Cell<f64>,
    /// Bumped on every re-arm so a callback that re-arms its own timer wins
    generation: Cell<u64>,
    removed: Cell<bool>,
    fire_count: Cell<u32>,
    callback: RefCell<Box<dyn FnMut()>>,
    clock: SharedClock,
}

/// Handle to an armed timer
#[derive(Clone)]
pub struct TimerEvent {
    shared: Rc<TimerShared>,
}

impl TimerEvent {
    /// Cancel delivery. Safe to call any number of times.
    pub fn remove(&self) {
        if !self.shared.removed.replace(true) {
            log::debug!("timer removed after {} fires", self.shared.fire_count.get());
        }
    }

    pub fn is_removed(&self) -> bool {
        self.shared.removed.get()
    }

    pub fn delay(&self) -> f64 {
        self.shared.delay.get()
    }

    /// Change the period and re-arm from now
    pub fn set_delay(&self, delay_ms: f64) {
        let delay = delay_ms.max(MIN_TIMER_DELAY_MS);
        self.shared.delay.set(delay);
        self.shared
            .next_fire_at
            .set(self.shared.clock.now() + delay);
        self.shared.generation.set(self.shared.generation.get() + 1);
    }

    pub fn is_repeating(&self) -> bool {
        self.shared.repeating
    }

    /// Milliseconds until the next fire, never negative
    pub fn get_remaining(&self) -> f64 {
        if self.is_removed() {
            return 0.0;
        }
        (self.shared.next_fire_at.get() - self.shared.clock.now()).max(0.0)
    }

    /// How many times the callback has run
    pub fn fire_count(&self) -> u32 {
        self.shared.fire_count.get()
    }

    fn same_timer(&self, other: &TimerEvent) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Fire as many times as are due at `now`
    fn run_due(&self, now: f64) {
        let shared = &self.shared;
        let mut fires = 0;
        while !shared.removed.get() && shared.next_fire_at.get() <= now {
            if fires == MAX_CATCH_UP_FIRES {
                // Drop the backlog rather than stall the frame
                shared.next_fire_at.set(now + shared.delay.get());
                log::warn!("timer fell {} periods behind, skipping ahead", fires);
                break;
            }

            let generation = shared.generation.get();
            match shared.callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(),
                Err(_) => {
                    log::warn!("timer callback re-entered, skipping");
                    return;
                }
            }
            fires += 1;
            shared.fire_count.set(shared.fire_count.get() + 1);

            if shared.removed.get() {
                break;
            }
            if !shared.repeating {
                shared.removed.set(true);
                break;
            }
            if shared.generation.get() == generation {
                shared
                    .next_fire_at
                    .set(shared.next_fire_at.get() + shared.delay.get());
            }
        }
    }
}

/// Per-scene timer scheduler
#[derive(Clone)]
pub struct TimePlugin {
    timers: Rc<RefCell<Vec<TimerEvent>>>,
    clock: SharedClock,
}

impl TimePlugin {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            timers: Rc::new(RefCell::new(Vec::new())),
            clock,
        }
    }

    /// Current clock time in milliseconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Create and arm a timer
    pub fn add_event(&self, config: TimerConfig, callback: impl FnMut() + 'static) -> TimerEvent {
        let delay = config.delay_ms.max(MIN_TIMER_DELAY_MS);
        let timer = TimerEvent {
            shared: Rc::new(TimerShared {
                delay: Cell::new(delay),
                repeating: config.repeating,
                next_fire_at: Cell::new(self.clock.now() + delay),
                generation: Cell::new(0),
                removed: Cell::new(false),
                fire_count: Cell::new(0),
                callback: RefCell::new(Box::new(callback)),
                clock: Rc::clone(&self.clock),
            }),
        };
        self.timers.borrow_mut().push(timer.clone());
        timer
    }

    /// Fire every due timer and forget removed ones
    pub fn update(&self) {
        let now = self.clock.now();
        let snapshot: Vec<TimerEvent> = self.timers.borrow().clone();
        for timer in &snapshot {
            timer.run_due(now);
        }
        self.timers.borrow_mut().retain(|t| !t.is_removed());
    }

    /// Remove a timer from this scheduler
    pub fn remove_event(&self, timer: &TimerEvent) {
        timer.remove();
        self.timers.borrow_mut().retain(|t| !t.same_timer(timer));
    }

    /// Remove every live timer
    pub fn remove_all(&self) {
        let timers = std::mem::take(&mut *self.timers.borrow_mut());
        for timer in &timers {
            timer.remove();
        }
    }

    /// Number of timers still armed
    pub fn active_count(&self) -> usize {
        self.timers.borrow().iter().filter(|t| !t.is_removed()).count()
    }
}
