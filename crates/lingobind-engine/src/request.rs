#![forbid(unsafe_code)]

//! Lookup requests passed from a bound lookup function to a translator.

use std::collections::BTreeMap;

/// One key, or ordered alternatives tried first to last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    /// Keys in lookup order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(key) => std::slice::from_ref(key),
            Self::Many(keys) => keys,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.as_slice().first().map(String::as_str)
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.as_slice().last().map(String::as_str)
    }

    #[must_use]
    pub fn is_alternatives(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Self::One(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Self::One(key)
    }
}

impl From<&String> for Keys {
    fn from(key: &String) -> Self {
        Self::One(key.clone())
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Self::Many(keys)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        Self::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Self::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Self::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

/// Per-call lookup options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TOptions {
    /// Returned when no key resolves.
    pub default_value: Option<String>,
    /// Selects a plural form and is exposed as `{{count}}`.
    pub count: Option<i64>,
    /// Interpolation values.
    pub vars: BTreeMap<String, String>,
    /// Overrides the language for this call.
    pub lng: Option<String>,
    /// Overrides the searched namespaces for this call.
    pub ns: Option<Vec<String>>,
}

impl TOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.vars.insert(name.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn lng(mut self, lng: impl Into<String>) -> Self {
        self.lng = Some(lng.into());
        self
    }

    #[must_use]
    pub fn ns<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ns = Some(namespaces.into_iter().map(Into::into).collect());
        self
    }
}

/// Everything a translator needs to resolve one lookup.
#[derive(Debug, Clone, Copy)]
pub struct TranslateRequest<'a> {
    pub keys: &'a Keys,
    /// Namespaces to search, in order.
    pub namespaces: &'a [String],
    /// Fixed language for this lookup function, if any.
    pub lng: Option<&'a str>,
    /// Prepended to every key with the key separator.
    pub key_prefix: Option<&'a str>,
    pub options: &'a TOptions,
}

impl TranslateRequest<'_> {
    /// Language for this lookup: per-call override, then the fixed one.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.options.lng.as_deref().or(self.lng)
    }

    /// Namespaces for this lookup: per-call override, then the bound ones.
    #[must_use]
    pub fn search_namespaces(&self) -> &[String] {
        self.options.ns.as_deref().unwrap_or(self.namespaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_from_variants() {
        assert_eq!(Keys::from("a"), Keys::One("a".into()));
        assert_eq!(
            Keys::from(["a", "b c"]),
            Keys::Many(vec!["a".into(), "b c".into()])
        );
        let keys = Keys::from(vec!["x", "y"]);
        assert_eq!(keys.first(), Some("x"));
        assert_eq!(keys.last(), Some("y"));
        assert!(keys.is_alternatives());
        assert!(!Keys::from("x").is_alternatives());
    }

    #[test]
    fn per_call_overrides_win() {
        let keys = Keys::from("k");
        let bound = vec!["translation".to_string()];
        let opts = TOptions::new().lng("fr").ns(["common"]);
        let request = TranslateRequest {
            keys: &keys,
            namespaces: &bound,
            lng: Some("de"),
            key_prefix: None,
            options: &opts,
        };
        assert_eq!(request.language(), Some("fr"));
        assert_eq!(request.search_namespaces(), &["common".to_string()]);

        let plain = TOptions::new();
        let request = TranslateRequest {
            options: &plain,
            ..request
        };
        assert_eq!(request.language(), Some("de"));
        assert_eq!(request.search_namespaces(), bound.as_slice());
    }
}
