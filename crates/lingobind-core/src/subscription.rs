#![forbid(unsafe_code)]

//! RAII subscription guard shared by [`Observable`](crate::Observable) and
//! [`ListenerSet`](crate::ListenerSet).

use std::any::Any;

/// Keeps a registered callback alive.
///
/// The container only holds a `Weak` reference to the callback. The strong
/// reference lives here, type-erased, so dropping the guard makes the
/// callback unreachable and it is pruned on the next notification cycle.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    pub(crate) fn new(guard: Box<dyn Any>) -> Self {
        Self { guard: Some(guard) }
    }

    /// A guard that holds nothing. Useful for translator implementations
    /// without an event capability.
    pub fn detached() -> Self {
        Self { guard: None }
    }

    /// Whether this guard keeps a callback registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.guard.is_some()
    }

    /// Drop the callback now, leaving an empty guard behind.
    pub fn cancel(&mut self) {
        self.guard = None;
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.is_attached())
            .finish()
    }
}
