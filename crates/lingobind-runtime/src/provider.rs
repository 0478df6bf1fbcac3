#![forbid(unsafe_code)]

//! Scoped translator injection.
//!
//! A [`Provider`] hands a translator and a default namespace to every view
//! mounted under it. Views are mounted under a provider either explicitly
//! ([`ViewTree::mount_in`](crate::ViewTree::mount_in)) or by mounting inside
//! [`Provider::scope`], where the innermost enclosing provider wins.
//!
//! The provided values live in an [`Observable`]. Mounted views subscribe to
//! it, so [`Provider::set_i18n`] and [`Provider::set_default_ns`] schedule a
//! re-render of each of them. The provider never subscribes to the
//! translator itself.

use std::cell::RefCell;
use std::fmt;

use lingobind_core::{Observable, Subscription};
use lingobind_engine::{I18n, same_instance};
use tracing::debug;

/// Values a provider exposes to its views.
#[derive(Clone, Default)]
pub struct ProviderValue {
    pub i18n: Option<I18n>,
    pub default_ns: Option<String>,
}

impl PartialEq for ProviderValue {
    fn eq(&self, other: &Self) -> bool {
        let same_i18n = match (&self.i18n, &other.i18n) {
            (Some(a), Some(b)) => same_instance(a, b),
            (None, None) => true,
            _ => false,
        };
        same_i18n && self.default_ns == other.default_ns
    }
}

impl fmt::Debug for ProviderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderValue")
            .field("has_i18n", &self.i18n.is_some())
            .field("default_ns", &self.default_ns)
            .finish()
    }
}

/// Cloneable handle to one provider. Clones share the provided values.
#[derive(Clone, Debug)]
pub struct Provider {
    value: Observable<ProviderValue>,
}

thread_local! {
    static SCOPE_STACK: RefCell<Vec<Provider>> = const { RefCell::new(Vec::new()) };
}

impl Provider {
    pub fn new(i18n: I18n) -> Self {
        Self::from_value(ProviderValue {
            i18n: Some(i18n),
            default_ns: None,
        })
    }

    /// A provider that supplies no translator. Views under it still pick up
    /// its default namespace and resolve the translator elsewhere.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_value(ProviderValue::default())
    }

    #[must_use]
    pub fn from_value(value: ProviderValue) -> Self {
        Self {
            value: Observable::new(value),
        }
    }

    #[must_use]
    pub fn with_default_ns(self, ns: impl Into<String>) -> Self {
        let ns = ns.into();
        self.value.update(|v| v.default_ns = Some(ns));
        self
    }

    /// Snapshot of the provided values.
    #[must_use]
    pub fn value(&self) -> ProviderValue {
        self.value.get()
    }

    #[must_use]
    pub fn i18n(&self) -> Option<I18n> {
        self.value.with(|v| v.i18n.clone())
    }

    #[must_use]
    pub fn default_ns(&self) -> Option<String> {
        self.value.with(|v| v.default_ns.clone())
    }

    /// Swap the provided translator. Views under this provider re-render on
    /// the next flush; setting the same instance again does nothing.
    pub fn set_i18n(&self, i18n: Option<I18n>) {
        debug!(present = i18n.is_some(), "provider translator replaced");
        self.value.update(|v| v.i18n = i18n);
    }

    pub fn set_default_ns(&self, ns: Option<String>) {
        debug!(default_ns = ?ns, "provider default namespace replaced");
        self.value.update(|v| v.default_ns = ns);
    }

    /// Number of changes made to the provided values.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.value.version()
    }

    /// Call `on_change` whenever the provided values change.
    pub fn observe(&self, on_change: impl Fn() + 'static) -> Subscription {
        self.value.subscribe(move |_| on_change())
    }

    /// Views with a live subscription to this provider.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.value.live_subscriber_count()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.value.ptr_eq(&other.value)
    }

    /// Run `f` with this provider as the innermost one. Views mounted inside
    /// `f` are mounted under it.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        SCOPE_STACK.with(|stack| stack.borrow_mut().push(self.clone()));
        let _pop = ScopeGuard;
        f()
    }
}

/// Pops the scope stack even if the scoped closure panics.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The innermost provider entered with [`Provider::scope`] on this thread.
#[must_use]
pub fn current_provider() -> Option<Provider> {
    SCOPE_STACK.with(|stack| stack.borrow().last().cloned())
}
