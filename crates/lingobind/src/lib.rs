#![forbid(unsafe_code)]

//! lingobind public facade crate.
//!
//! Re-exports the translator contract, the reference engine and the view
//! binding layer, plus a prelude for day-to-day use.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

// --- Core re-exports -------------------------------------------------------

pub use lingobind_core::{ListenerSet, Observable, Subscription};

// --- Engine re-exports -----------------------------------------------------

pub use lingobind_engine::{
    Backend, BindingOptions, CIMODE, ConfigError, DEFAULT_NAMESPACE, EventKind, FsBackend, I18n,
    I18nError, Keys, LoadState, MemoryTranslator, MemoryTranslatorBuilder, NamespaceKey,
    NamespaceTracker, NsMode, QueuedBackend, ResourceBundle, StaticBackend, TOptions,
    TranslateRequest, Translator, TranslatorConfig, TranslatorEvent, TranslatorOptions,
    same_instance,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use lingobind_runtime::{
    ContextCell, HookOptions, I18nRef, MountedView, Namespaces, Provider, RenderCx,
    ScopedDefaultI18n, Suspension, TFunction, TranslationPoll, UseTranslation, ViewHandle,
    ViewTree, clear_i18n, get_i18n, set_i18n, use_translation,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for lingobind setup.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be read or failed validation.
    Config(ConfigError),
    /// Bundled resources could not be turned into a translator.
    Engine(I18nError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Engine(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<I18nError> for Error {
    fn from(err: I18nError) -> Self {
        Self::Engine(err)
    }
}

/// Standard result type for lingobind setup APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Setup ----------------------------------------------------------------

/// Build and initialize a translator from a TOML config file.
pub fn translator_from_toml_file(path: impl AsRef<Path>) -> Result<Rc<MemoryTranslator>> {
    let config = TranslatorConfig::from_toml_file(path)?;
    Ok(MemoryTranslator::from_config(config)?)
}

/// Build and initialize a translator from a JSON config file.
pub fn translator_from_json_file(path: impl AsRef<Path>) -> Result<Rc<MemoryTranslator>> {
    let config = TranslatorConfig::from_json_file(path)?;
    Ok(MemoryTranslator::from_config(config)?)
}

/// Like [`translator_from_toml_file`], with namespace files read from
/// `{resources_dir}/{lng}/{ns}.json` on demand.
pub fn translator_with_fs_backend(
    config_path: impl AsRef<Path>,
    resources_dir: impl AsRef<Path>,
) -> Result<Rc<MemoryTranslator>> {
    let config = TranslatorConfig::from_toml_file(config_path)?;
    Ok(MemoryTranslator::builder()
        .config(config)
        .backend(FsBackend::new(resources_dir.as_ref()))
        .init()?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, EventKind, I18n, Keys, MemoryTranslator, NsMode, Result, TOptions, Translator,
        TranslatorConfig,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        ContextCell, HookOptions, Namespaces, Provider, TFunction, TranslationPoll,
        UseTranslation, ViewTree, use_translation,
    };

    pub use crate::{core, engine};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use lingobind_core as core;
pub use lingobind_engine as engine;
#[cfg(feature = "runtime")]
pub use lingobind_runtime as runtime;
