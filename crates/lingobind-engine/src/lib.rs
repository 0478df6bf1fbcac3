#![forbid(unsafe_code)]

//! The translator side of lingobind.
//!
//! This crate defines what the binding layer expects from an i18n engine
//! ([`Translator`]) and ships [`MemoryTranslator`], a small engine that
//! satisfies it: resource bundles per (language, namespace), `{{var}}`
//! interpolation, a language resolution chain, pluggable [`Backend`]s and
//! language/namespace events.
//!
//! # How it fits in the system
//! `lingobind-runtime` only talks to `dyn Translator`. Anything that can
//! report load state and publish [`TranslatorEvent`]s can sit behind a view.

pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod memory;
pub mod options;
pub mod request;
pub mod resources;
pub mod tracker;
pub mod translator;

pub use backend::{Backend, FsBackend, QueuedBackend, ReadCallback, StaticBackend};
pub use config::{ConfigError, TranslatorConfig};
pub use error::I18nError;
pub use event::{LoadState, NamespaceKey, TranslatorEvent};
pub use memory::{MemoryTranslator, MemoryTranslatorBuilder};
pub use options::{BindingOptions, EventKind, NsMode, TranslatorOptions};
pub use request::{Keys, TOptions, TranslateRequest};
pub use resources::{ResourceBundle, interpolate};
pub use tracker::NamespaceTracker;
pub use translator::{I18n, Translator, same_instance};

pub use lingobind_core::Subscription;

/// Language code that makes every lookup return its key.
pub const CIMODE: &str = "cimode";

/// Namespace used when nothing else names one.
pub const DEFAULT_NAMESPACE: &str = "translation";
