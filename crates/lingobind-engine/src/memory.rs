#![forbid(unsafe_code)]

//! In-memory reference translator.
//!
//! [`MemoryTranslator`] keeps one [`ResourceBundle`] per (language,
//! namespace), resolves lookups along a language chain and publishes
//! [`TranslatorEvent`]s when the language or the store changes.
//!
//! # Lookup order
//!
//! Keys first to last, then namespaces in request order, then languages in
//! chain order. `ns:key` pins a key to one namespace. With a `count` the
//! `key_one`/`key_other` forms are tried before the bare key.
//!
//! # Re-entrancy
//!
//! State lives in a `RefCell`. No borrow is held while a backend runs or an
//! event is emitted, so listeners and synchronous backends may call back in.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use lingobind_core::{ListenerSet, Subscription};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::CIMODE;
use crate::backend::Backend;
use crate::config::TranslatorConfig;
use crate::error::I18nError;
use crate::event::{LoadState, NamespaceKey, TranslatorEvent};
use crate::options::{BindingOptions, EventKind, TranslatorOptions};
use crate::request::TranslateRequest;
use crate::resources::{ResourceBundle, interpolate};
use crate::tracker::NamespaceTracker;
use crate::translator::Translator;

/// Language used when neither `lng` nor a fallback is configured.
const DEV_LANGUAGE: &str = "dev";

struct State {
    initialized: bool,
    language: Option<String>,
    languages: Vec<String>,
    options: TranslatorOptions,
    store: BTreeMap<NamespaceKey, ResourceBundle>,
    load_states: BTreeMap<NamespaceKey, LoadState>,
}

pub struct MemoryTranslator {
    state: RefCell<State>,
    initial_lng: Option<String>,
    events: ListenerSet<TranslatorEvent>,
    tracker: NamespaceTracker,
    backend: Option<Box<dyn Backend>>,
    this: Weak<MemoryTranslator>,
}

impl std::fmt::Debug for MemoryTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryTranslator")
            .field("initialized", &state.initialized)
            .field("language", &state.language)
            .field("bundles", &state.store.len())
            .field("has_backend", &self.backend.is_some())
            .finish()
    }
}

/// Builder for [`MemoryTranslator`].
#[derive(Default)]
pub struct MemoryTranslatorBuilder {
    config: TranslatorConfig,
    bundles: Vec<(NamespaceKey, ResourceBundle)>,
    backend: Option<Box<dyn Backend>>,
}

impl MemoryTranslatorBuilder {
    #[must_use]
    pub fn config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn language(mut self, lng: impl Into<String>) -> Self {
        self.config.lng = Some(lng.into());
        self
    }

    #[must_use]
    pub fn fallback_language(mut self, lng: impl Into<String>) -> Self {
        self.config.fallback_lng.push(lng.into());
        self
    }

    #[must_use]
    pub fn default_ns(mut self, ns: impl Into<String>) -> Self {
        self.config.default_ns = ns.into();
        self
    }

    /// Namespaces loaded at init.
    #[must_use]
    pub fn namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ns = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Bundle a nested JSON object for `lng`/`ns`.
    #[must_use]
    pub fn resource(mut self, lng: &str, ns: &str, value: Value) -> Self {
        self.config
            .resources
            .entry(lng.to_string())
            .or_default()
            .insert(ns.to_string(), value);
        self
    }

    /// Bundle an already flattened bundle for `lng`/`ns`.
    #[must_use]
    pub fn bundle(mut self, lng: &str, ns: &str, bundle: ResourceBundle) -> Self {
        self.bundles.push((NamespaceKey::new(lng, ns), bundle));
        self
    }

    #[must_use]
    pub fn binding(mut self, binding: BindingOptions) -> Self {
        self.config.binding = binding;
        self
    }

    #[must_use]
    pub fn partial_bundled_languages(mut self, partial: bool) -> Self {
        self.config.partial_bundled_languages = partial;
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: impl Backend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Build without initializing. The translator reports
    /// `is_initialized() == false` until [`MemoryTranslator::init`].
    pub fn build(self) -> Result<Rc<MemoryTranslator>, I18nError> {
        let Self {
            config,
            bundles,
            backend,
        } = self;
        let mut options = config.options();
        options.has_bundled_resources |= !bundles.is_empty();

        let mut store = BTreeMap::new();
        let mut load_states = BTreeMap::new();
        for (lng, namespaces) in &config.resources {
            for (ns, value) in namespaces {
                let bundle =
                    ResourceBundle::from_json_value(lng, ns, value, &config.key_separator)?;
                let key = NamespaceKey::new(lng.as_str(), ns.as_str());
                load_states.insert(key.clone(), LoadState::Loaded);
                store.insert(key, bundle);
            }
        }
        for (key, bundle) in bundles {
            load_states.insert(key.clone(), LoadState::Loaded);
            store
                .entry(key)
                .or_insert_with(ResourceBundle::new)
                .merge(bundle);
        }

        Ok(Rc::new_cyclic(|this| MemoryTranslator {
            state: RefCell::new(State {
                initialized: false,
                language: None,
                languages: Vec::new(),
                options,
                store,
                load_states,
            }),
            initial_lng: config.lng,
            events: ListenerSet::new(),
            tracker: NamespaceTracker::new(),
            backend,
            this: this.clone(),
        }))
    }

    /// Build and initialize.
    pub fn init(self) -> Result<Rc<MemoryTranslator>, I18nError> {
        let translator = self.build()?;
        translator.init();
        Ok(translator)
    }
}

impl MemoryTranslator {
    #[must_use]
    pub fn builder() -> MemoryTranslatorBuilder {
        MemoryTranslatorBuilder::default()
    }

    pub fn from_config(config: TranslatorConfig) -> Result<Rc<Self>, I18nError> {
        Self::builder().config(config).init()
    }

    /// Pick the initial language, load the configured namespaces and emit
    /// [`TranslatorEvent::LanguageChanged`] followed by
    /// [`TranslatorEvent::Initialized`]. Calling it twice is a no-op.
    pub fn init(&self) {
        let namespaces = {
            let mut state = self.state.borrow_mut();
            if state.initialized {
                return;
            }
            let lng = self
                .initial_lng
                .clone()
                .or_else(|| state.options.fallback_lng.first().cloned())
                .unwrap_or_else(|| DEV_LANGUAGE.to_string());
            state.languages = resolution_chain(&lng, &state.options.fallback_lng);
            state.language = Some(lng);
            state.initialized = true;
            state.options.ns.clone()
        };
        self.load_namespaces(None, &namespaces);
        let lng = self.language().unwrap_or_default();
        info!(language = %lng, "translator initialized");
        self.events.emit(&TranslatorEvent::LanguageChanged { lng });
        self.events.emit(&TranslatorEvent::Initialized);
    }

    /// Switch language, load the namespaces in use for it and emit
    /// [`TranslatorEvent::LanguageChanged`].
    pub fn change_language(&self, lng: &str) {
        let namespaces = {
            let mut state = self.state.borrow_mut();
            state.languages = resolution_chain(lng, &state.options.fallback_lng);
            state.language = Some(lng.to_string());
            let mut namespaces = state.options.ns.clone();
            for ns in self.tracker.used_namespaces() {
                if !namespaces.contains(&ns) {
                    namespaces.push(ns);
                }
            }
            namespaces
        };
        self.load_namespaces(None, &namespaces);
        debug!(lng, "language changed");
        self.events.emit(&TranslatorEvent::LanguageChanged {
            lng: lng.to_string(),
        });
    }

    /// Merge a bundle into the store and emit [`TranslatorEvent::Added`].
    pub fn add_resource_bundle(&self, lng: &str, ns: &str, bundle: ResourceBundle) {
        let key = NamespaceKey::new(lng, ns);
        {
            let mut state = self.state.borrow_mut();
            state
                .store
                .entry(key.clone())
                .or_insert_with(ResourceBundle::new)
                .merge(bundle);
            state.load_states.insert(key.clone(), LoadState::Loaded);
        }
        self.events.emit(&TranslatorEvent::Added { key });
    }

    /// Like [`add_resource_bundle`](Self::add_resource_bundle) for a nested
    /// JSON object.
    pub fn add_resources(&self, lng: &str, ns: &str, value: &Value) -> Result<(), I18nError> {
        let separator = self.state.borrow().options.key_separator.clone();
        let bundle = ResourceBundle::from_json_value(lng, ns, value, &separator)?;
        self.add_resource_bundle(lng, ns, bundle);
        Ok(())
    }

    /// Set a single entry and emit [`TranslatorEvent::Added`].
    pub fn add_resource(&self, lng: &str, ns: &str, key: &str, value: &str) {
        let mut bundle = ResourceBundle::new();
        bundle.insert(key, value);
        self.add_resource_bundle(lng, ns, bundle);
    }

    /// Drop a bundle and emit [`TranslatorEvent::Removed`] if one existed.
    pub fn remove_resource_bundle(&self, lng: &str, ns: &str) -> bool {
        let key = NamespaceKey::new(lng, ns);
        let removed = {
            let mut state = self.state.borrow_mut();
            state.load_states.remove(&key);
            state.store.remove(&key).is_some()
        };
        if removed {
            self.events.emit(&TranslatorEvent::Removed { key });
        }
        removed
    }

    #[must_use]
    pub fn resource_bundle(&self, lng: &str, ns: &str) -> Option<ResourceBundle> {
        self.state
            .borrow()
            .store
            .get(&NamespaceKey::new(lng, ns))
            .cloned()
    }

    pub fn set_binding_options(&self, binding: BindingOptions) {
        self.state.borrow_mut().options.binding = binding;
    }

    pub fn update_binding_options(&self, f: impl FnOnce(&mut BindingOptions)) {
        f(&mut self.state.borrow_mut().options.binding);
    }

    /// Listeners with a live guard.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.events.live_count()
    }

    /// The used-namespace tracker.
    #[must_use]
    pub fn tracker(&self) -> &NamespaceTracker {
        &self.tracker
    }

    fn finish_read(&self, key: NamespaceKey, result: Result<Value, I18nError>) {
        let separator = self.state.borrow().options.key_separator.clone();
        let parsed = result.and_then(|value| {
            ResourceBundle::from_json_value(&key.lng, &key.ns, &value, &separator)
        });
        let event = match parsed {
            Ok(bundle) => {
                let mut state = self.state.borrow_mut();
                state
                    .store
                    .entry(key.clone())
                    .or_insert_with(ResourceBundle::new)
                    .merge(bundle);
                state.load_states.insert(key.clone(), LoadState::Loaded);
                debug!(%key, "namespace loaded");
                TranslatorEvent::Loaded { loaded: vec![key] }
            }
            Err(err) => {
                self.state
                    .borrow_mut()
                    .load_states
                    .insert(key.clone(), LoadState::Failed);
                warn!(%key, error = %err, "namespace failed to load");
                TranslatorEvent::Failed {
                    key,
                    reason: err.to_string(),
                }
            }
        };
        self.events.emit(&event);
    }

    fn lookup(&self, request: &TranslateRequest<'_>) -> String {
        let state = self.state.borrow();
        let options = &state.options;
        let languages = match request.language() {
            Some(lng) => resolution_chain(lng, &options.fallback_lng),
            None => state.languages.clone(),
        };

        let last_key = request.keys.last().unwrap_or_default().to_string();
        if languages.first().map(String::as_str) == Some(CIMODE) {
            return request.keys.first().unwrap_or_default().to_string();
        }

        let default_ns = [options.default_ns.clone()];
        let namespaces = match request.search_namespaces() {
            [] => &default_ns[..],
            list => list,
        };

        let mut vars = request.options.vars.clone();
        if let Some(count) = request.options.count {
            vars.entry("count".to_string())
                .or_insert_with(|| count.to_string());
        }

        for raw in request.keys.as_slice() {
            let (pinned_ns, key) = split_namespace(raw, &options.ns_separator);
            let key = match request.key_prefix {
                Some(prefix) if !prefix.is_empty() => {
                    format!("{prefix}{}{key}", options.key_separator)
                }
                _ => key.to_string(),
            };
            let candidates = plural_candidates(&key, request.options.count);
            let pinned = pinned_ns.map(|ns| [ns.to_string()]);
            let search = pinned.as_ref().map_or(namespaces, |p| &p[..]);

            for ns in search {
                for lng in &languages {
                    let Some(bundle) =
                        state.store.get(&NamespaceKey::new(lng.as_str(), ns.as_str()))
                    else {
                        continue;
                    };
                    for candidate in &candidates {
                        if let Some(template) = bundle.get(candidate) {
                            return interpolate(template, &vars);
                        }
                    }
                }
            }
        }

        match &request.options.default_value {
            Some(default) => interpolate(default, &vars),
            None => last_key,
        }
    }
}

impl Translator for MemoryTranslator {
    fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    fn language(&self) -> Option<String> {
        self.state.borrow().language.clone()
    }

    fn languages(&self) -> Vec<String> {
        self.state.borrow().languages.clone()
    }

    fn options(&self) -> TranslatorOptions {
        self.state.borrow().options.clone()
    }

    fn translate(&self, request: &TranslateRequest<'_>) -> Option<String> {
        Some(self.lookup(request))
    }

    fn has_resource_bundle(&self, lng: &str, ns: &str) -> bool {
        self.state
            .borrow()
            .store
            .contains_key(&NamespaceKey::new(lng, ns))
    }

    fn load_state(&self, lng: &str, ns: &str) -> LoadState {
        self.state
            .borrow()
            .load_states
            .get(&NamespaceKey::new(lng, ns))
            .copied()
            .unwrap_or_default()
    }

    fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    fn load_namespaces(&self, lng: Option<&str>, namespaces: &[String]) {
        let Some(backend) = &self.backend else {
            return;
        };
        let to_read: Vec<NamespaceKey> = {
            let mut state = self.state.borrow_mut();
            let languages = match lng {
                Some(lng) => resolution_chain(lng, &state.options.fallback_lng),
                None => state.languages.clone(),
            };
            let mut to_read = Vec::new();
            for lng in languages {
                if lng == CIMODE {
                    continue;
                }
                for ns in namespaces {
                    let key = NamespaceKey::new(lng.as_str(), ns.as_str());
                    if state.store.contains_key(&key) {
                        continue;
                    }
                    let current = state.load_states.get(&key).copied().unwrap_or_default();
                    if current != LoadState::NotRequested {
                        continue;
                    }
                    state.load_states.insert(key.clone(), LoadState::Pending);
                    to_read.push(key);
                }
            }
            to_read
        };

        for key in to_read {
            debug!(%key, "requesting namespace from backend");
            let this = self.this.clone();
            let pending = key.clone();
            backend.read(
                &key.lng,
                &key.ns,
                Box::new(move |result| {
                    if let Some(translator) = this.upgrade() {
                        translator.finish_read(pending, result);
                    }
                }),
            );
        }
    }

    fn subscribe(
        &self,
        kinds: &[EventKind],
        listener: Box<dyn Fn(&TranslatorEvent)>,
    ) -> Subscription {
        let kinds = kinds.to_vec();
        self.events.subscribe(move |event: &TranslatorEvent| {
            if kinds.contains(&event.kind()) {
                listener(event);
            }
        })
    }

    fn namespace_tracker(&self) -> Option<NamespaceTracker> {
        Some(self.tracker.clone())
    }
}

/// `de-AT` with fallbacks `[en]` → `[de-AT, de, en]`.
fn resolution_chain(lng: &str, fallbacks: &[String]) -> Vec<String> {
    if lng == CIMODE {
        return vec![CIMODE.to_string()];
    }
    let mut chain = vec![lng.to_string()];
    if let Some((base, _)) = lng.split_once('-')
        && !base.is_empty()
    {
        chain.push(base.to_string());
    }
    for fallback in fallbacks {
        if !chain.contains(fallback) {
            chain.push(fallback.clone());
        }
    }
    chain
}

fn split_namespace<'k>(key: &'k str, separator: &str) -> (Option<&'k str>, &'k str) {
    if separator.is_empty() {
        return (None, key);
    }
    match key.split_once(separator) {
        Some((ns, rest)) if !ns.is_empty() && !ns.contains(char::is_whitespace) => {
            (Some(ns), rest)
        }
        _ => (None, key),
    }
}

fn plural_candidates(key: &str, count: Option<i64>) -> Vec<String> {
    match count {
        Some(n) if n.unsigned_abs() == 1 => vec![format!("{key}_one"), key.to_string()],
        Some(_) => vec![format!("{key}_other"), key.to_string()],
        None => vec![key.to_string()],
    }
}
