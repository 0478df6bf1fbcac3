#![forbid(unsafe_code)]

//! The bound lookup function handed to views.

use std::fmt;
use std::rc::Rc;

use lingobind_engine::{I18n, Keys, TOptions, TranslateRequest};

struct Bound {
    i18n: Option<I18n>,
    namespaces: Vec<String>,
    lng: Option<String>,
    key_prefix: Option<String>,
}

/// Translates keys against one translator, namespace list, fixed language
/// and key prefix.
///
/// Cheap to clone. Clones are the same function: [`TFunction::ptr_eq`] and
/// `==` compare identity, which the hook keeps stable across renders while
/// its inputs are unchanged.
#[derive(Clone)]
pub struct TFunction {
    bound: Rc<Bound>,
}

impl TFunction {
    pub(crate) fn new(
        i18n: Option<I18n>,
        namespaces: Vec<String>,
        lng: Option<String>,
        key_prefix: Option<String>,
    ) -> Self {
        Self {
            bound: Rc::new(Bound {
                i18n,
                namespaces,
                lng,
                key_prefix,
            }),
        }
    }

    /// A function with no translator behind it.
    #[must_use]
    pub fn degraded(namespaces: Vec<String>) -> Self {
        Self::new(None, namespaces, None, None)
    }

    pub fn translate(&self, keys: impl Into<Keys>) -> String {
        self.translate_with(keys, &TOptions::default())
    }

    pub fn translate_with(&self, keys: impl Into<Keys>, options: &TOptions) -> String {
        let keys = keys.into();
        let bound = &*self.bound;
        if let Some(i18n) = &bound.i18n {
            let request = TranslateRequest {
                keys: &keys,
                namespaces: &bound.namespaces,
                lng: bound.lng.as_deref(),
                key_prefix: bound.key_prefix.as_deref(),
                options,
            };
            if let Some(text) = i18n.translate(&request) {
                return text;
            }
        }
        untranslated(&keys, options)
    }

    /// Namespaces searched implicitly, in order.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.bound.namespaces
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.bound.lng.as_deref()
    }

    #[must_use]
    pub fn key_prefix(&self) -> Option<&str> {
        self.bound.key_prefix.as_deref()
    }

    /// No translator is bound.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.bound.i18n.is_none()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bound, &other.bound)
    }
}

impl PartialEq for TFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for TFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TFunction")
            .field("degraded", &self.is_degraded())
            .field("namespaces", &self.bound.namespaces)
            .field("lng", &self.bound.lng)
            .field("key_prefix", &self.bound.key_prefix)
            .finish()
    }
}

/// Best readable text when nothing translates: the default value, else the
/// first alternative that reads like a sentence, else the last alternative.
#[must_use]
pub fn untranslated(keys: &Keys, options: &TOptions) -> String {
    if let Some(default_value) = &options.default_value {
        return default_value.clone();
    }
    match keys {
        Keys::One(key) => key.clone(),
        Keys::Many(list) => list
            .iter()
            .find(|key| key.contains(char::is_whitespace))
            .or_else(|| list.last())
            .cloned()
            .unwrap_or_default(),
    }
}
