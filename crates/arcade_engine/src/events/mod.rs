//! Broadcast subscription lists
//!
//! Key principles:
//! - Registration system (only notify interested subscribers)
//! - Delivery in subscription order, immediately on `broadcast`
//! - Weak subscriptions remove themselves once their owner is dropped
//!
//! Everything here is single-threaded; subscribers run on the frame thread
//! that calls [`Broadcast::broadcast`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identifies one subscription on one [`Broadcast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Box<dyn FnMut(&T) -> Delivery>;

/// What a subscriber wants after receiving an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Keep,
    Drop,
}

struct Subscription<T> {
    id: SubscriptionId,
    handler: Handler<T>,
}

/// Ordered list of subscribers for events of type `T`
pub struct Broadcast<T> {
    subscriptions: Vec<Subscription<T>>,
    next_id: u64,
}

impl<T: 'static> Broadcast<T> {
    /// Create an empty broadcast
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    fn push(&mut self, handler: Handler<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, handler });
        id
    }

    /// Subscribe a closure; it stays registered until unsubscribed
    pub fn subscribe<F>(&mut self, mut handler: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        self.push(Box::new(move |event| {
            handler(event);
            Delivery::Keep
        }))
    }

    /// Subscribe a method on a shared owner without keeping the owner alive
    ///
    /// The subscription is dropped on the first broadcast after the owner
    /// has been freed. If the owner is already mutably borrowed when the
    /// event arrives (it is the one broadcasting) the event is skipped for it.
    pub fn subscribe_weak<O>(&mut self, owner: &Rc<RefCell<O>>, method: fn(&mut O, &T)) -> SubscriptionId
    where
        O: 'static,
    {
        let weak: Weak<RefCell<O>> = Rc::downgrade(owner);
        self.push(Box::new(move |event| {
            let Some(owner) = weak.upgrade() else {
                return Delivery::Drop;
            };
            match owner.try_borrow_mut() {
                Ok(mut owner) => method(&mut *owner, event),
                Err(_) => log::warn!("Skipped broadcast to a subscriber that is already borrowed"),
            }
            Delivery::Keep
        }))
    }

    /// Remove a subscription; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        before != self.subscriptions.len()
    }

    /// Deliver `event` to every subscriber in subscription order
    pub fn broadcast(&mut self, event: &T) {
        self.subscriptions
            .retain_mut(|sub| (sub.handler)(event) == Delivery::Keep);
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// True when nothing is subscribed
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Remove every subscription (useful for state transitions)
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl<T: 'static> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
