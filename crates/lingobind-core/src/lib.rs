#![forbid(unsafe_code)]

//! Change-notification primitives for lingobind.
//!
//! - [`Observable`]: a shared, version-tracked value whose subscribers are
//!   told when it changes.
//! - [`ListenerSet`]: a fan-out list of event callbacks with no stored value.
//! - [`Subscription`]: RAII guard returned by both. Dropping it detaches the
//!   callback.
//!
//! # Architecture
//!
//! Both containers live behind `Rc<RefCell<..>>` and keep subscribers as
//! `Weak` callbacks. The strong side of each callback lives in the
//! [`Subscription`] guard, so ownership of the guard *is* the registration.
//! Dead entries are pruned lazily on the next notification.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. No internal borrow is held while a callback runs, so callbacks may read
//!    or mutate the container they were registered on.
//! 3. A callback whose guard was dropped before a notification starts is
//!    never invoked by that notification.

pub mod listeners;
pub mod observable;
pub mod subscription;

pub use listeners::ListenerSet;
pub use observable::Observable;
pub use subscription::Subscription;
