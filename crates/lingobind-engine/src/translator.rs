#![forbid(unsafe_code)]

//! The contract an i18n engine fulfils for the binding layer.

use std::rc::Rc;

use lingobind_core::Subscription;

use crate::event::{LoadState, TranslatorEvent};
use crate::options::{EventKind, TranslatorOptions};
use crate::request::TranslateRequest;
use crate::tracker::NamespaceTracker;

/// Shared handle to a translator. Identity is the allocation.
pub type I18n = Rc<dyn Translator>;

/// An i18n engine as seen by views.
///
/// Implementations are single threaded and mutated from the same event loop
/// that renders views. Methods take `&self`; engines use interior mutability.
pub trait Translator {
    fn is_initialized(&self) -> bool;

    /// Current language, if one has been chosen.
    fn language(&self) -> Option<String>;

    /// Resolution chain for the current language, most specific first.
    fn languages(&self) -> Vec<String>;

    fn options(&self) -> TranslatorOptions;

    /// Resolve a lookup. `None` means this translator cannot translate at
    /// all; a missing key is the translator's own business and still
    /// returns `Some`.
    fn translate(&self, _request: &TranslateRequest<'_>) -> Option<String> {
        None
    }

    fn has_resource_bundle(&self, lng: &str, ns: &str) -> bool;

    fn load_state(&self, lng: &str, ns: &str) -> LoadState;

    /// Whether missing namespaces can be fetched at all.
    fn has_backend(&self) -> bool;

    /// Start loading `namespaces` for the chain of `lng`, or of the current
    /// language when `None`. Completion is announced through
    /// [`TranslatorEvent::Loaded`] or [`TranslatorEvent::Failed`].
    fn load_namespaces(&self, lng: Option<&str>, namespaces: &[String]);

    /// Listen for events of the given kinds. Translators without events
    /// return a detached guard.
    fn subscribe(
        &self,
        _kinds: &[EventKind],
        _listener: Box<dyn Fn(&TranslatorEvent)>,
    ) -> Subscription {
        Subscription::detached()
    }

    /// Used-namespace tracker, if this translator keeps one.
    fn namespace_tracker(&self) -> Option<NamespaceTracker> {
        None
    }
}

/// Pointer identity for translator handles, ignoring vtables.
#[must_use]
pub fn same_instance(a: &I18n, b: &I18n) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
