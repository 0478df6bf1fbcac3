#![forbid(unsafe_code)]

//! Namespace requests and their resolution.

use lingobind_engine::{DEFAULT_NAMESPACE, NsMode};

/// Namespaces a view asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Namespaces {
    /// Use the provider's default, then the translator's.
    #[default]
    Default,
    One(String),
    /// First is primary; the rest are loaded and, in fallback mode, searched.
    Many(Vec<String>),
}

impl Namespaces {
    /// Concrete namespace list, most important first. Never empty.
    #[must_use]
    pub fn resolve(
        &self,
        provider_default: Option<&str>,
        instance_default: Option<&str>,
    ) -> Vec<String> {
        let fallback = || {
            vec![
                provider_default
                    .or(instance_default)
                    .filter(|ns| !ns.is_empty())
                    .unwrap_or(DEFAULT_NAMESPACE)
                    .to_string(),
            ]
        };
        match self {
            Self::Default => fallback(),
            Self::One(ns) => vec![ns.clone()],
            Self::Many(list) if list.is_empty() => fallback(),
            Self::Many(list) => list.clone(),
        }
    }
}

/// Namespaces a lookup searches implicitly.
#[must_use]
pub fn search_order(resolved: &[String], mode: NsMode) -> Vec<String> {
    match mode {
        NsMode::Fallback => resolved.to_vec(),
        NsMode::Default => resolved.first().cloned().into_iter().collect(),
    }
}

impl From<&str> for Namespaces {
    fn from(ns: &str) -> Self {
        Self::One(ns.to_string())
    }
}

impl From<String> for Namespaces {
    fn from(ns: String) -> Self {
        Self::One(ns)
    }
}

impl From<Vec<String>> for Namespaces {
    fn from(list: Vec<String>) -> Self {
        Self::Many(list)
    }
}

impl From<Vec<&str>> for Namespaces {
    fn from(list: Vec<&str>) -> Self {
        Self::Many(list.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Namespaces {
    fn from(list: &[&str]) -> Self {
        Self::Many(list.iter().map(|ns| (*ns).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Namespaces {
    fn from(list: [&str; N]) -> Self {
        Self::Many(list.iter().map(|ns| (*ns).to_string()).collect())
    }
}

impl<T: Into<Namespaces>> From<Option<T>> for Namespaces {
    fn from(ns: Option<T>) -> Self {
        ns.map_or(Self::Default, Into::into)
    }
}
