//! Listener registration with explicit, idempotent removal handles
//!
//! The host renderer exposes discrete events (clock tick, tracked-target
//! changed). Listeners are registered against an [`EventSource`] and removed
//! through the returned [`Subscription`]; cancelling twice, or after the
//! source is gone, is a safe no-op. Dispatch iterates over a snapshot so a
//! listener may remove itself (or its peers) while the event is firing.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

/// A single-threaded, multi-listener event channel.
pub struct EventSource<T> {
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
}

impl<T> EventSource<T> {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    /// Register `listener`; it stays active until the returned handle is
    /// cancelled or dropped.
    pub fn subscribe(self: &Rc<Self>, listener: impl Fn(&T) + 'static) -> Subscription<T> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription {
            source: Rc::downgrade(self),
            id,
        }
    }

    /// Invoke every active listener with `value`.
    pub fn emit(&self, value: &T) {
        // Snapshot so listeners can unsubscribe mid-dispatch.
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Removal handle for one registered listener.
///
/// Cancellation is idempotent and also runs on drop, so holding the handle is
/// what keeps the listener alive.
pub struct Subscription<T> {
    source: Weak<EventSource<T>>,
    id: u64,
}

impl<T> Subscription<T> {
    pub fn cancel(&self) {
        if let Some(source) = self.source.upgrade() {
            source.remove(self.id);
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
