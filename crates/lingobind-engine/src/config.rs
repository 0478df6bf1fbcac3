#![forbid(unsafe_code)]

//! Translator configuration loaded from TOML or JSON.
//!
//! ```toml
//! lng = "en"
//! fallback_lng = ["en"]
//! ns = ["translation", "common"]
//! default_ns = "translation"
//!
//! [binding]
//! wait = false
//! ns_mode = "fallback"
//! bind_events = ["languageChanged", "loaded"]
//!
//! [resources.en.translation]
//! key1 = "test"
//! ```
//!
//! Every field has a default, so an empty document is a valid config.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::options::{BindingOptions, TranslatorOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Initial language. Falls back to the first `fallback_lng`, then `dev`.
    pub lng: Option<String>,
    pub fallback_lng: Vec<String>,
    /// Namespaces loaded at init.
    pub ns: Vec<String>,
    pub default_ns: String,
    pub key_separator: String,
    pub ns_separator: String,
    pub partial_bundled_languages: bool,
    pub binding: BindingOptions,
    /// Bundled resources: language → namespace → nested object.
    pub resources: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            lng: None,
            fallback_lng: Vec::new(),
            ns: vec![crate::DEFAULT_NAMESPACE.to_string()],
            default_ns: crate::DEFAULT_NAMESPACE.to_string(),
            key_separator: ".".to_string(),
            ns_separator: ":".to_string(),
            partial_bundled_languages: false,
            binding: BindingOptions::default(),
            resources: BTreeMap::new(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.ensure_valid()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.ensure_valid()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validation messages. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.default_ns.trim().is_empty() {
            errors.push("default_ns must not be empty".into());
        }
        if let Some(lng) = &self.lng
            && lng.trim().is_empty()
        {
            errors.push("lng must not be empty when set".into());
        }
        if self.fallback_lng.iter().any(|l| l.trim().is_empty()) {
            errors.push("fallback_lng entries must not be empty".into());
        }
        if self.ns.iter().any(|n| n.trim().is_empty()) {
            errors.push("ns entries must not be empty".into());
        }
        for (lng, namespaces) in &self.resources {
            for (ns, value) in namespaces {
                if !value.is_object() {
                    errors.push(format!("resources.{lng}.{ns} must be a table"));
                }
            }
        }

        errors
    }

    fn ensure_valid(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The options a translator built from this config reports.
    #[must_use]
    pub fn options(&self) -> TranslatorOptions {
        TranslatorOptions {
            default_ns: self.default_ns.clone(),
            ns: self.ns.clone(),
            fallback_lng: self.fallback_lng.clone(),
            key_separator: self.key_separator.clone(),
            ns_separator: self.ns_separator.clone(),
            has_bundled_resources: !self.resources.is_empty(),
            partial_bundled_languages: self.partial_bundled_languages,
            binding: self.binding.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{EventKind, NsMode};

    #[test]
    fn empty_document_is_default() {
        let config = TranslatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, TranslatorConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn toml_with_binding_and_resources() {
        let config = TranslatorConfig::from_toml_str(
            r#"
            lng = "en"
            ns = ["translation", "common"]

            [binding]
            wait = false
            ns_mode = "fallback"
            bind_store_events = ["added"]

            [resources.en.translation]
            key1 = "test"

            [resources.en.translation.nested]
            deep = "value"
            "#,
        )
        .unwrap();

        assert_eq!(config.lng.as_deref(), Some("en"));
        assert!(!config.binding.wait);
        assert_eq!(config.binding.ns_mode, NsMode::Fallback);
        assert_eq!(config.binding.bind_store_events, vec![EventKind::Added]);
        assert_eq!(
            config.binding.bind_events,
            vec![EventKind::LanguageChanged, EventKind::Loaded],
            "unset fields keep their defaults"
        );
        assert_eq!(config.resources["en"]["translation"]["nested"]["deep"], "value");
        assert!(config.options().has_bundled_resources);
    }

    #[test]
    fn json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i18n.json");
        std::fs::write(
            &path,
            r#"{"lng": "de", "fallback_lng": ["en"], "default_ns": "app"}"#,
        )
        .unwrap();
        let config = TranslatorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.lng.as_deref(), Some("de"));
        assert_eq!(config.fallback_lng, vec!["en"]);
        assert_eq!(config.options().default_ns, "app");
    }

    #[test]
    fn validation_collects_every_problem() {
        let err = TranslatorConfig::from_json_str(
            r#"{"default_ns": "", "lng": " ", "resources": {"en": {"translation": "flat"}}}"#,
        )
        .unwrap_err();
        let ConfigError::Validation(errors) = err else {
            panic!("expected validation error, got {err}");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("resources.en.translation")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TranslatorConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
