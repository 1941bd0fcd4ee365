//! Fixed-capacity publish/subscribe event bus.
//!
//! Subscribers live in a slot array. Unregistering leaves a tombstone that any
//! later registration may reuse. Dispatch is synchronous and in slot order.
//!
//! The bus takes `&self` everywhere so callbacks can re-enter it (trigger,
//! subscribe, register) from inside a dispatch. Cycles are the caller's
//! problem.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::types::{Event, EventMask, Propagation, MAX_SUBSCRIBERS};

/// Opaque identity of a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u32);

/// Subscriber callback. Receives the bus so it can publish follow-up events.
pub type Callback = Rc<dyn Fn(&EventBus, SubscriberId, &Event) -> Propagation>;

struct Subscription {
    id: SubscriberId,
    callback: Callback,
    mask: EventMask,
}

pub struct EventBus {
    slots: RefCell<[Option<Subscription>; MAX_SUBSCRIBERS]>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(std::array::from_fn(|_| None)),
        }
    }

    /// Register `id`, or replace its callback if already registered.
    ///
    /// A new subscriber starts with an empty mask and takes the first free
    /// slot. Returns `false` when every slot is taken.
    pub fn register<F>(&self, id: SubscriberId, callback: F) -> bool
    where
        F: Fn(&EventBus, SubscriberId, &Event) -> Propagation + 'static,
    {
        let callback: Callback = Rc::new(callback);
        let mut slots = self.slots.borrow_mut();

        if let Some(existing) = slots.iter_mut().flatten().find(|s| s.id == id) {
            existing.callback = callback;
            return true;
        }
        match slots.iter_mut().find(|s| s.is_none()) {
            Some(free) => {
                *free = Some(Subscription {
                    id,
                    callback,
                    mask: EventMask::empty(),
                });
                true
            }
            None => {
                warn!(subscriber = id.0, "event bus full, registration rejected");
                false
            }
        }
    }

    /// Tombstone the slot of `id`. Returns `false` if it was not registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.id == id))
        {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Add categories to a subscriber's mask. No-op for unknown ids.
    pub fn subscribe(&self, id: SubscriberId, mask: EventMask) {
        self.update_mask(id, |m| *m |= mask);
    }

    /// Remove categories from a subscriber's mask. No-op for unknown ids.
    pub fn unsubscribe(&self, id: SubscriberId, mask: EventMask) {
        self.update_mask(id, |m| *m &= !mask);
    }

    fn update_mask(&self, id: SubscriberId, f: impl FnOnce(&mut EventMask)) {
        let mut slots = self.slots.borrow_mut();
        if let Some(s) = slots.iter_mut().flatten().find(|s| s.id == id) {
            f(&mut s.mask);
        }
    }

    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.mask_of(id).is_some()
    }

    pub fn mask_of(&self, id: SubscriberId) -> Option<EventMask> {
        self.slots
            .borrow()
            .iter()
            .flatten()
            .find(|s| s.id == id)
            .map(|s| s.mask)
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.slots.borrow().iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every subscriber whose mask intersects its category,
    /// in slot order. A `Stop` answer does not end the dispatch.
    ///
    /// Returns the number of callbacks invoked.
    pub fn trigger(&self, event: &Event) -> usize {
        let kind = event.mask();
        let mut invoked = 0;
        for i in 0..MAX_SUBSCRIBERS {
            // Release the borrow before calling out so the callback may re-enter.
            let target = match &self.slots.borrow()[i] {
                Some(s) if s.mask.intersects(kind) => Some((s.id, Rc::clone(&s.callback))),
                _ => None,
            };
            if let Some((id, callback)) = target {
                if callback(self, id, event) == Propagation::Stop {
                    trace!(subscriber = id.0, ?kind, "subscriber asked to stop; bus continues");
                }
                invoked += 1;
            }
        }
        invoked
    }
}
