#![forbid(unsafe_code)]

//! Binding views to a translator.
//!
//! # Architecture
//!
//! - [`ContextCell`]: default translator, one global cell per UI thread.
//! - [`Provider`]: injects a translator and default namespace into the views
//!   mounted under it.
//! - [`ViewTree`]: a small view host. Views render on mount and again on
//!   [`ViewTree::flush`] after asking for it through their [`ViewHandle`].
//! - [`use_translation`]: the hook. Resolves translator and namespaces,
//!   subscribes the view to translator events and returns a [`TFunction`].
//!
//! # Data flow
//!
//! Translator event → hook callback → [`ViewHandle::request_render`] →
//! render queue → [`ViewTree::flush`] → render function calls the hook again
//! and reads the new translations.
//!
//! Everything is single threaded and `!Send`.

pub mod context;
pub mod hook;
pub mod lookup;
pub mod namespaces;
pub mod provider;
pub mod readiness;
pub mod result;
mod scheduler;
pub mod view;

pub use context::{ContextCell, I18nRef, ScopedDefaultI18n, clear_i18n, get_i18n, set_i18n};
pub use hook::{HookOptions, use_translation};
pub use lookup::{TFunction, untranslated};
pub use namespaces::Namespaces;
pub use provider::{Provider, ProviderValue, current_provider};
pub use readiness::{has_loaded_namespace, is_ready};
pub use result::{Suspension, TranslationPoll, UseTranslation};
pub use scheduler::ViewId;
pub use view::{MAX_FLUSH_PASSES, MountedView, RenderCx, ViewHandle, ViewTree};
