#![forbid(unsafe_code)]

//! Translator events and per-namespace load state.

use std::fmt;

use crate::options::EventKind;

/// A (language, namespace) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceKey {
    pub lng: String,
    pub ns: String,
}

impl NamespaceKey {
    pub fn new(lng: impl Into<String>, ns: impl Into<String>) -> Self {
        Self {
            lng: lng.into(),
            ns: ns.into(),
        }
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.lng, self.ns)
    }
}

/// Something a view may need to re-render for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorEvent {
    Initialized,
    LanguageChanged { lng: String },
    /// Namespaces that finished loading in one batch.
    Loaded { loaded: Vec<NamespaceKey> },
    Failed { key: NamespaceKey, reason: String },
    /// A bundle was added to the resource store.
    Added { key: NamespaceKey },
    /// A bundle was removed from the resource store.
    Removed { key: NamespaceKey },
}

impl TranslatorEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Initialized => EventKind::Initialized,
            Self::LanguageChanged { .. } => EventKind::LanguageChanged,
            Self::Loaded { .. } => EventKind::Loaded,
            Self::Failed { .. } => EventKind::Failed,
            Self::Added { .. } => EventKind::Added,
            Self::Removed { .. } => EventKind::Removed,
        }
    }

    /// Pairs this event is about. Empty for language-wide events.
    #[must_use]
    pub fn namespace_keys(&self) -> &[NamespaceKey] {
        match self {
            Self::Loaded { loaded } => loaded,
            Self::Failed { key, .. } | Self::Added { key } | Self::Removed { key } => {
                std::slice::from_ref(key)
            }
            Self::Initialized | Self::LanguageChanged { .. } => &[],
        }
    }
}

/// Where a (language, namespace) pair is in its loading lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotRequested,
    Pending,
    Loaded,
    Failed,
}

impl LoadState {
    /// Loading finished, successfully or not.
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}
