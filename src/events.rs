//! Publish/subscribe primitive shared by every engine component
//!
//! Subscriptions are identified by [`SubscriptionId`] tokens returned from
//! `on`/`once`, so unsubscribing never depends on closure identity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Token identifying one subscription on one emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Listener<T> {
    id: SubscriptionId,
    once: bool,
    handler: Handler<T>,
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            handler: Rc::clone(&self.handler),
        }
    }
}

struct Registry<T> {
    next_id: u64,
    listeners: HashMap<String, Vec<Listener<T>>>,
}

impl<T> Registry<T> {
    fn is_subscribed(&self, event: &str, id: SubscriptionId) -> bool {
        self.listeners
            .get(event)
            .is_some_and(|list| list.iter().any(|l| l.id == id))
    }

    fn remove(&mut self, event: &str, id: SubscriptionId) -> bool {
        let Some(list) = self.listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(event);
        }
        removed
    }
}

/// Event emitter handle
///
/// Cloning is cheap and every clone talks to the same subscriber registry.
/// Handlers receive the payload by reference.
pub struct EventEmitter<T = ()> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 1,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Subscribe `handler` to `event`
    pub fn on(&self, event: &str, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.subscribe(event, false, Rc::new(RefCell::new(handler)))
    }

    /// Subscribe `handler` for a single delivery
    ///
    /// The subscription is dropped before the handler runs, so an `off` for
    /// it from inside the handler is a no-op.
    pub fn once(&self, event: &str, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.subscribe(event, true, Rc::new(RefCell::new(handler)))
    }

    fn subscribe(&self, event: &str, once: bool, handler: Handler<T>) -> SubscriptionId {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry
            .listeners
            .entry(event.to_string())
            .or_default()
            .push(Listener { id, once, handler });
        id
    }

    /// Remove one subscription. Returns false if it was already gone.
    pub fn off(&self, event: &str, id: SubscriptionId) -> bool {
        self.registry.borrow_mut().remove(event, id)
    }

    /// Drop every subscription on every event
    pub fn remove_all(&self) {
        self.registry.borrow_mut().listeners.clear();
    }

    /// Number of live subscriptions for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Deliver `payload` to the subscribers of `event`
    ///
    /// Delivery walks a snapshot taken before the first handler runs:
    /// handlers added meanwhile wait for the next emit, handlers removed
    /// meanwhile are skipped. Returns whether any handler ran.
    pub fn emit(&self, event: &str, payload: &T) -> bool {
        let snapshot: Vec<Listener<T>> = match self.registry.borrow().listeners.get(event) {
            Some(list) => list.clone(),
            None => return false,
        };

        let mut delivered = false;
        for listener in snapshot {
            {
                let mut registry = self.registry.borrow_mut();
                if !registry.is_subscribed(event, listener.id) {
                    continue;
                }
                if listener.once {
                    registry.remove(event, listener.id);
                }
            }

            match listener.handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (*handler)(payload);
                    delivered = true;
                }
                Err(_) => {
                    log::warn!("skipping re-entrant delivery of `{}`", event);
                }
            }
        }
        delivered
    }
}
