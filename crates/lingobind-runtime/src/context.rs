#![forbid(unsafe_code)]

//! Default translator holder.
//!
//! A [`ContextCell`] is the last place the hook looks for a translator after
//! explicit options and providers. Each UI thread has one global cell,
//! reachable through [`set_i18n`], [`clear_i18n`] and [`get_i18n`]; a
//! [`ViewTree`](crate::ViewTree) can be given its own cell instead.
//!
//! # Invariants
//!
//! 1. Last write wins. Nothing is validated.
//! 2. Clones of a cell share the slot.
//! 3. The global cell starts empty and is created on first use.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lingobind_engine::{I18n, same_instance};
use tracing::debug;

/// What the hook hands back as `i18n`: a translator, or the empty
/// placeholder reported in degraded mode.
#[derive(Clone, Default)]
pub enum I18nRef {
    Instance(I18n),
    #[default]
    Placeholder,
}

impl I18nRef {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    #[must_use]
    pub fn instance(&self) -> Option<&I18n> {
        match self {
            Self::Instance(i18n) => Some(i18n),
            Self::Placeholder => None,
        }
    }

    /// Whether this refers to exactly `other`.
    #[must_use]
    pub fn is(&self, other: &I18n) -> bool {
        self.instance().is_some_and(|i18n| same_instance(i18n, other))
    }

    /// Current language of the instance. `None` for the placeholder.
    #[must_use]
    pub fn language(&self) -> Option<String> {
        self.instance().and_then(|i18n| i18n.language())
    }

    /// Resolution chain of the instance. Empty for the placeholder.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.instance().map(|i18n| i18n.languages()).unwrap_or_default()
    }
}

impl From<I18n> for I18nRef {
    fn from(i18n: I18n) -> Self {
        Self::Instance(i18n)
    }
}

impl From<Option<I18n>> for I18nRef {
    fn from(i18n: Option<I18n>) -> Self {
        i18n.map_or(Self::Placeholder, Self::Instance)
    }
}

impl PartialEq for I18nRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Instance(a), Self::Instance(b)) => same_instance(a, b),
            (Self::Placeholder, Self::Placeholder) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for I18nRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(i18n) => f
                .debug_struct("Instance")
                .field("ptr", &Rc::as_ptr(i18n).cast::<()>())
                .field("language", &i18n.language())
                .finish(),
            Self::Placeholder => f.write_str("Placeholder"),
        }
    }
}

/// Holder of one default translator.
#[derive(Clone, Default)]
pub struct ContextCell {
    slot: Rc<RefCell<Option<I18n>>>,
}

impl fmt::Debug for ContextCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextCell")
            .field("value", &self.get())
            .finish()
    }
}

thread_local! {
    static GLOBAL: ContextCell = ContextCell::default();
}

impl ContextCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell pre-filled with `i18n`.
    #[must_use]
    pub fn with_instance(i18n: I18n) -> Self {
        let cell = Self::new();
        cell.set(Some(i18n));
        cell
    }

    /// Handle to this thread's global cell.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.with(Clone::clone)
    }

    /// Replace the stored instance. `None` clears it.
    pub fn set(&self, i18n: Option<I18n>) {
        debug!(present = i18n.is_some(), "context cell set");
        *self.slot.borrow_mut() = i18n;
    }

    pub fn clear(&self) {
        self.set(None);
    }

    /// The stored instance, or the placeholder.
    #[must_use]
    pub fn get(&self) -> I18nRef {
        self.instance().into()
    }

    #[must_use]
    pub fn instance(&self) -> Option<I18n> {
        self.slot.borrow().clone()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Whether both handles share one slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

/// Set the global default translator. `None` clears it.
pub fn set_i18n(i18n: Option<I18n>) {
    ContextCell::global().set(i18n);
}

/// Clear the global default translator.
pub fn clear_i18n() {
    ContextCell::global().clear();
}

/// The global default translator, or the placeholder.
#[must_use]
pub fn get_i18n() -> I18nRef {
    ContextCell::global().get()
}

/// Installs a translator on the global cell and restores the previous value
/// when dropped.
#[must_use = "the previous default is restored as soon as the guard is dropped"]
pub struct ScopedDefaultI18n {
    previous: Option<I18n>,
}

impl ScopedDefaultI18n {
    pub fn new(i18n: I18n) -> Self {
        let global = ContextCell::global();
        let previous = global.instance();
        global.set(Some(i18n));
        Self { previous }
    }
}

impl Drop for ScopedDefaultI18n {
    fn drop(&mut self) {
        ContextCell::global().set(self.previous.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingobind_engine::MemoryTranslator;

    fn instance() -> I18n {
        MemoryTranslator::builder().language("en").init().unwrap()
    }

    #[test]
    fn last_write_wins_and_clear_empties() {
        let cell = ContextCell::new();
        assert!(cell.get().is_placeholder());

        let a = instance();
        let b = instance();
        cell.set(Some(a.clone()));
        cell.set(Some(b.clone()));
        assert!(cell.get().is(&b));
        assert!(!cell.get().is(&a));

        cell.clear();
        assert_eq!(cell.get(), I18nRef::Placeholder);
    }

    #[test]
    fn clones_share_the_slot() {
        let cell = ContextCell::new();
        let other = cell.clone();
        other.set(Some(instance()));
        assert!(cell.is_set());
        assert!(cell.ptr_eq(&other));
        assert!(!cell.ptr_eq(&ContextCell::new()));
    }

    #[test]
    fn placeholder_equality() {
        let a = instance();
        assert_eq!(I18nRef::Placeholder, I18nRef::default());
        assert_ne!(I18nRef::from(a.clone()), I18nRef::Placeholder);
        assert_eq!(I18nRef::from(a.clone()), I18nRef::from(Some(a)));
        assert!(I18nRef::Placeholder.languages().is_empty());
        assert_eq!(I18nRef::Placeholder.language(), None);
    }

    #[test]
    fn scoped_default_restores_previous() {
        let outer = instance();
        let inner = instance();
        set_i18n(Some(outer.clone()));
        {
            let _guard = ScopedDefaultI18n::new(inner.clone());
            assert!(get_i18n().is(&inner));
        }
        assert!(get_i18n().is(&outer));
        clear_i18n();
        assert!(get_i18n().is_placeholder());
    }
}
