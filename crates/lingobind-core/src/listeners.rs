#![forbid(unsafe_code)]

//! Event fan-out to weakly held callbacks.
//!
//! [`ListenerSet<E>`] is the value-less sibling of
//! [`Observable`](crate::Observable): nothing is stored, every `emit` is
//! delivered. Translators use it to publish language and namespace events.
//!
//! # Invariants
//!
//! 1. Listeners run in registration order.
//! 2. `emit` collects the live callbacks before calling any of them, so a
//!    listener registered during an emission only sees later events.
//! 3. A listener whose [`Subscription`] was dropped before `emit` started is
//!    not called.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info_span};
use web_time::Instant;

use crate::subscription::Subscription;

type ListenerRc<E> = Rc<dyn Fn(&E)>;
type ListenerWeak<E> = Weak<dyn Fn(&E)>;

/// Shared list of event listeners. Clones share the same list.
pub struct ListenerSet<E> {
    listeners: Rc<RefCell<Vec<ListenerWeak<E>>>>,
}

impl<E> Clone for ListenerSet<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E> std::fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("registered", &self.listeners.borrow().len())
            .finish()
    }
}

impl<E: std::fmt::Debug + 'static> ListenerSet<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered while the guard lives.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let strong: ListenerRc<E> = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::downgrade(&strong));
        Subscription::new(Box::new(strong))
    }

    /// Deliver `event` to every live listener. Returns how many ran.
    pub fn emit(&self, event: &E) -> usize {
        let live: Vec<ListenerRc<E>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|w| w.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        if live.is_empty() {
            return 0;
        }

        let started = Instant::now();
        let _span = info_span!(
            "lingobind.emit",
            listeners = live.len() as u64,
            duration_us = tracing::field::Empty
        )
        .entered();
        for listener in &live {
            listener(event);
        }
        let duration_us = started.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        debug!(?event, delivered = live.len(), duration_us, "event delivered");
        live.len()
    }

    /// Listeners whose guard is still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Registered entries, including dead ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }
}
