#![forbid(unsafe_code)]

//! Resource bundles and `{{var}}` interpolation.
//!
//! A bundle is the flattened string table of one (language, namespace)
//! pair. Nested JSON objects are flattened with the key separator, so
//! `{"menu": {"open": "Open"}}` becomes `menu.open`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::I18nError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBundle {
    entries: BTreeMap<String, String>,
}

impl ResourceBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries of `other` overwrite entries of `self`.
    pub fn merge(&mut self, other: ResourceBundle) {
        self.entries.extend(other.entries);
    }

    /// Flatten a JSON object. Strings, numbers and booleans become entries,
    /// arrays are indexed (`list.0`), `null` is skipped.
    pub fn from_json_value(
        lng: &str,
        ns: &str,
        value: &Value,
        key_separator: &str,
    ) -> Result<Self, I18nError> {
        let Value::Object(map) = value else {
            return Err(I18nError::NotAnObject {
                lng: lng.to_string(),
                ns: ns.to_string(),
            });
        };
        let mut bundle = Self::new();
        for (key, child) in map {
            flatten_into(&mut bundle.entries, key.clone(), child, key_separator);
        }
        Ok(bundle)
    }

    pub fn from_json_str(
        lng: &str,
        ns: &str,
        json: &str,
        key_separator: &str,
    ) -> Result<Self, I18nError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(lng, ns, &value, key_separator)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResourceBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn flatten_into(out: &mut BTreeMap<String, String>, key: String, value: &Value, sep: &str) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            out.insert(key, s.clone());
        }
        Value::Bool(b) => {
            out.insert(key, b.to_string());
        }
        Value::Number(n) => {
            out.insert(key, n.to_string());
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_into(out, child_key(&key, sep, &i.to_string()), item, sep);
            }
        }
        Value::Object(map) => {
            for (child, item) in map {
                flatten_into(out, child_key(&key, sep, child), item, sep);
            }
        }
    }
}

fn child_key(parent: &str, sep: &str, child: &str) -> String {
    format!("{parent}{sep}{child}")
}

/// Replace `{{ name }}` placeholders with values from `vars`.
///
/// Substituted values are not scanned again. Unknown placeholders and an
/// unterminated `{{` are copied through unchanged.
#[must_use]
pub fn interpolate(template: &str, vars: &BTreeMap<String, String>) -> String {
    if vars.is_empty() || !template.contains("{{") {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        match vars.get(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
