#![forbid(unsafe_code)]

//! The translation hook.
//!
//! [`use_translation`] is called from a render function. It resolves which
//! translator and namespaces the view uses, keeps the view subscribed to
//! that translator for as long as it stays mounted and returns the bound
//! lookup function together with readiness.
//!
//! # Translator resolution
//!
//! First match wins: [`HookOptions::i18n`], the provider the view was mounted
//! under, the tree's [`ContextCell`](crate::ContextCell). With none of them
//! the hook runs degraded: it warns, reports the placeholder instance, is
//! never ready and never suspends.
//!
//! # Re-render contract
//!
//! - One live subscription per view. It is replaced when the translator, the
//!   bound event kinds or the namespace list change; the old one is dropped
//!   first.
//! - `LanguageChanged` always re-renders. Bound `Loaded`, `Added` and
//!   `Removed` events re-render when they concern one of the view's
//!   namespaces.
//! - `Initialized`, `Loaded` and `Failed` are always observed. Unless bound,
//!   they only re-render a view that is still waiting for its namespaces.
//! - Events emitted while the hook itself requests a load are ignored; the
//!   hook re-checks readiness right after the request.
//! - Unmounting drops the subscription. An emission already in flight sees
//!   the cleared `alive` flag and does nothing.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use lingobind_core::Subscription;
use lingobind_engine::{EventKind, I18n, NsMode, TranslatorEvent, same_instance};
use tracing::{debug, trace, warn};

use crate::context::I18nRef;
use crate::lookup::TFunction;
use crate::namespaces::{Namespaces, search_order};
use crate::provider::Provider;
use crate::readiness::{is_ready, pending_namespaces};
use crate::result::{Suspension, TranslationPoll, UseTranslation};
use crate::scheduler::ViewId;
use crate::view::{RenderCx, ViewHandle};

/// Events observed regardless of binding options; they end a suspension.
const LIFECYCLE_EVENTS: [EventKind; 3] =
    [EventKind::Initialized, EventKind::Loaded, EventKind::Failed];

/// Per-call overrides. Unset fields come from the translator's
/// [`BindingOptions`](lingobind_engine::BindingOptions).
#[derive(Clone, Default)]
pub struct HookOptions {
    pub i18n: Option<I18n>,
    pub wait: Option<bool>,
    pub ns_mode: Option<NsMode>,
    /// Prepended to every key with the translator's key separator.
    pub key_prefix: Option<String>,
    /// Fixed language for lookups and readiness.
    pub lng: Option<String>,
    pub bind_events: Option<Vec<EventKind>>,
}

impl fmt::Debug for HookOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookOptions")
            .field("has_i18n", &self.i18n.is_some())
            .field("wait", &self.wait)
            .field("ns_mode", &self.ns_mode)
            .field("key_prefix", &self.key_prefix)
            .field("lng", &self.lng)
            .field("bind_events", &self.bind_events)
            .finish()
    }
}

impl HookOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn i18n(mut self, i18n: I18n) -> Self {
        self.i18n = Some(i18n);
        self
    }

    #[must_use]
    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = Some(wait);
        self
    }

    #[must_use]
    pub fn ns_mode(mut self, mode: NsMode) -> Self {
        self.ns_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn lng(mut self, lng: impl Into<String>) -> Self {
        self.lng = Some(lng.into());
        self
    }

    #[must_use]
    pub fn bind_events(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
        self.bind_events = Some(kinds.into_iter().collect());
        self
    }
}

/// A view's live subscription to one translator.
struct Binding {
    instance: I18n,
    /// Kinds bound by options, without the lifecycle events.
    kinds: Vec<EventKind>,
    namespaces: Vec<String>,
    alive: Rc<Cell<bool>>,
    waiting: Rc<Cell<bool>>,
    /// Set while the hook's own load request runs.
    muted: Rc<Cell<bool>>,
    /// Language the last load request was made for.
    load_requested_for: Option<String>,
    view: ViewId,
    _subscription: Subscription,
}

impl Binding {
    fn subscribe(
        i18n: &I18n,
        kinds: Vec<EventKind>,
        namespaces: &[String],
        handle: &ViewHandle,
    ) -> Self {
        let alive = Rc::new(Cell::new(true));
        let waiting = Rc::new(Cell::new(false));
        let muted = Rc::new(Cell::new(false));
        let listener = {
            let alive = Rc::clone(&alive);
            let waiting = Rc::clone(&waiting);
            let muted = Rc::clone(&muted);
            let bound = kinds.clone();
            let namespaces = namespaces.to_vec();
            let handle = handle.clone();
            move |event: &TranslatorEvent| {
                if !alive.get() || muted.get() {
                    return;
                }
                if is_relevant(event, &bound, &namespaces, waiting.get()) {
                    trace!(
                        view = handle.id(),
                        kind = ?event.kind(),
                        "translator event requests render"
                    );
                    handle.request_render();
                }
            }
        };
        let mut observed = kinds.clone();
        observed.extend(LIFECYCLE_EVENTS);
        observed.sort_unstable();
        observed.dedup();
        let subscription = i18n.subscribe(&observed, Box::new(listener));
        debug!(view = handle.id(), ?kinds, ?namespaces, "view bound to translator");
        Self {
            instance: Rc::clone(i18n),
            kinds,
            namespaces: namespaces.to_vec(),
            alive,
            waiting,
            muted,
            load_requested_for: None,
            view: handle.id(),
            _subscription: subscription,
        }
    }

    fn matches(&self, i18n: &I18n, kinds: &[EventKind], namespaces: &[String]) -> bool {
        same_instance(&self.instance, i18n) && self.kinds == kinds && self.namespaces == namespaces
    }

    /// Ask the translator for `namespaces` without waking this view.
    fn request_load(&mut self, i18n: &I18n, lng: Option<&str>, language: Option<String>) {
        self.load_requested_for = language;
        self.muted.set(true);
        i18n.load_namespaces(lng, &self.namespaces);
        self.muted.set(false);
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.alive.set(false);
        debug!(view = self.view, "view unbound from translator");
    }
}

fn is_relevant(
    event: &TranslatorEvent,
    bound: &[EventKind],
    namespaces: &[String],
    waiting: bool,
) -> bool {
    let touches_view = || {
        event
            .namespace_keys()
            .iter()
            .any(|key| namespaces.contains(&key.ns))
    };
    let kind = event.kind();
    let wanted = waiting || bound.contains(&kind);
    match kind {
        EventKind::LanguageChanged => true,
        EventKind::Initialized => waiting,
        EventKind::Failed => waiting && touches_view(),
        EventKind::Loaded | EventKind::Added | EventKind::Removed => wanted && touches_view(),
    }
}

/// Inputs the lookup function is built from.
struct MemoKey {
    instance: Option<I18n>,
    language: Option<String>,
    lng: Option<String>,
    namespaces: Vec<String>,
    ns_mode: NsMode,
    key_prefix: Option<String>,
}

impl PartialEq for MemoKey {
    fn eq(&self, other: &Self) -> bool {
        let same = match (&self.instance, &other.instance) {
            (Some(a), Some(b)) => same_instance(a, b),
            (None, None) => true,
            _ => false,
        };
        same
            && self.language == other.language
            && self.lng == other.lng
            && self.namespaces == other.namespaces
            && self.ns_mode == other.ns_mode
            && self.key_prefix == other.key_prefix
    }
}

/// Hook state kept in the view's slot.
#[derive(Default)]
struct TranslationState {
    binding: Option<Binding>,
    memo: Option<(MemoKey, TFunction)>,
}

impl TranslationState {
    fn bind(
        &mut self,
        i18n: &I18n,
        kinds: Vec<EventKind>,
        namespaces: &[String],
        handle: &ViewHandle,
    ) -> &mut Binding {
        let binding = match self.binding.take() {
            Some(current) if current.matches(i18n, &kinds, namespaces) => current,
            stale => {
                // The previous subscription goes away before the new one exists.
                drop(stale);
                Binding::subscribe(i18n, kinds, namespaces, handle)
            }
        };
        self.binding.insert(binding)
    }

    fn lookup_fn(&mut self, key: MemoKey) -> TFunction {
        if let Some((cached, t)) = &self.memo
            && *cached == key
        {
            return t.clone();
        }
        let t = TFunction::new(
            key.instance.clone(),
            key.namespaces.clone(),
            key.lng.clone(),
            key.key_prefix.clone(),
        );
        self.memo = Some((key, t.clone()));
        t
    }
}

/// Bind the calling view to a translator and return its lookup function.
///
/// `namespaces` accepts `Namespaces::Default`, a single name, or a list
/// whose first entry is primary. See the module docs for how the translator
/// is found and when the view is re-rendered.
pub fn use_translation(
    cx: &mut RenderCx<'_>,
    namespaces: impl Into<Namespaces>,
    options: HookOptions,
) -> TranslationPoll {
    let requested = namespaces.into();
    let handle = cx.handle().clone();
    let provided = cx.provider().map(Provider::value);
    let provider_ns = provided.as_ref().and_then(|value| value.default_ns.clone());
    let resolved = options
        .i18n
        .clone()
        .or_else(|| provided.and_then(|value| value.i18n))
        .or_else(|| cx.context().instance());
    let state = cx.use_slot(TranslationState::default);

    let Some(i18n) = resolved else {
        warn!(
            view = handle.id(),
            "use_translation: no translator instance; pass one in HookOptions, mount under a Provider or set the context cell"
        );
        state.binding = None;
        let namespaces = requested.resolve(provider_ns.as_deref(), None);
        let t = state.lookup_fn(MemoKey {
            instance: None,
            language: None,
            lng: None,
            namespaces,
            ns_mode: NsMode::Default,
            key_prefix: None,
        });
        return TranslationPoll::Ready(UseTranslation {
            t,
            i18n: I18nRef::Placeholder,
            ready: false,
        });
    };

    let settings = i18n.options();
    let wait = options.wait.unwrap_or(settings.binding.wait);
    let ns_mode = options.ns_mode.unwrap_or(settings.binding.ns_mode);
    let mut kinds = options
        .bind_events
        .clone()
        .unwrap_or_else(|| settings.binding.subscribed_events());
    kinds.sort_unstable();
    kinds.dedup();

    let namespaces = requested.resolve(provider_ns.as_deref(), Some(settings.default_ns.as_str()));
    if let Some(tracker) = i18n.namespace_tracker() {
        tracker.add_used_namespaces(&namespaces);
    }

    let lng = options.lng.as_deref();
    let language = lng.map(str::to_string).or_else(|| i18n.language());
    let binding = state.bind(&i18n, kinds, &namespaces, &handle);
    let mut ready = is_ready(&*i18n, &namespaces, lng);
    if !ready && binding.load_requested_for != language {
        debug!(view = handle.id(), ?namespaces, ?language, "requesting namespaces");
        binding.request_load(&i18n, lng, language.clone());
        // Synchronous backends have already finished.
        ready = is_ready(&*i18n, &namespaces, lng);
    }
    binding.waiting.set(!ready);

    let t = state.lookup_fn(MemoKey {
        instance: Some(Rc::clone(&i18n)),
        language: i18n.language(),
        lng: options.lng.clone(),
        namespaces: search_order(&namespaces, ns_mode),
        ns_mode,
        key_prefix: options.key_prefix.clone(),
    });
    let result = UseTranslation {
        t,
        i18n: I18nRef::Instance(Rc::clone(&i18n)),
        ready,
    };
    if ready || !wait {
        return TranslationPoll::Ready(result);
    }

    let pending = pending_namespaces(&*i18n, &namespaces, lng);
    debug!(view = handle.id(), ?pending, "view suspended");
    TranslationPoll::Suspended(Suspension {
        i18n: result.i18n.clone(),
        language,
        pending,
        fallback: result,
    })
}
