#![forbid(unsafe_code)]

//! Options a translator exposes to the binding layer.

use serde::{Deserialize, Serialize};

/// How a multi-namespace request is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NsMode {
    /// Only the first namespace is searched; the rest are just loaded.
    #[default]
    Default,
    /// Every namespace is searched in order, first hit wins.
    Fallback,
}

/// Event categories a view can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Initialized,
    LanguageChanged,
    Loaded,
    Failed,
    Added,
    Removed,
}

/// View-binding configuration carried by a translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingOptions {
    /// Suspend views until their namespaces are ready.
    pub wait: bool,
    pub ns_mode: NsMode,
    /// Translator events that trigger a re-render.
    pub bind_events: Vec<EventKind>,
    /// Resource store events that trigger a re-render.
    pub bind_store_events: Vec<EventKind>,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            wait: true,
            ns_mode: NsMode::Default,
            bind_events: vec![EventKind::LanguageChanged, EventKind::Loaded],
            bind_store_events: Vec::new(),
        }
    }
}

impl BindingOptions {
    /// Union of translator and store events, sorted and deduplicated.
    #[must_use]
    pub fn subscribed_events(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self
            .bind_events
            .iter()
            .chain(self.bind_store_events.iter())
            .copied()
            .collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }
}

/// Snapshot of the translator settings relevant to views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    pub default_ns: String,
    /// Namespaces loaded at init.
    pub ns: Vec<String>,
    pub fallback_lng: Vec<String>,
    /// Separator for nested keys. Empty disables nesting.
    pub key_separator: String,
    /// Separator for `ns:key` lookups. Empty disables the prefix syntax.
    pub ns_separator: String,
    /// Resources were handed over at construction time.
    pub has_bundled_resources: bool,
    /// Bundled resources may be incomplete; missing pairs still load.
    pub partial_bundled_languages: bool,
    pub binding: BindingOptions,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            default_ns: crate::DEFAULT_NAMESPACE.to_string(),
            ns: vec![crate::DEFAULT_NAMESPACE.to_string()],
            fallback_lng: Vec::new(),
            key_separator: ".".to_string(),
            ns_separator: ":".to_string(),
            has_bundled_resources: false,
            partial_bundled_languages: false,
            binding: BindingOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binding_listens_for_language_and_loads() {
        let binding = BindingOptions::default();
        assert!(binding.wait);
        assert_eq!(binding.ns_mode, NsMode::Default);
        assert_eq!(
            binding.subscribed_events(),
            vec![EventKind::LanguageChanged, EventKind::Loaded]
        );
    }

    #[test]
    fn store_events_are_merged_without_duplicates() {
        let binding = BindingOptions {
            bind_events: vec![EventKind::Loaded, EventKind::LanguageChanged],
            bind_store_events: vec![EventKind::Added, EventKind::Loaded],
            ..BindingOptions::default()
        };
        assert_eq!(
            binding.subscribed_events(),
            vec![EventKind::LanguageChanged, EventKind::Loaded, EventKind::Added]
        );
    }
}
