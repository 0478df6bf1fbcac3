#![forbid(unsafe_code)]

//! Engine-side failures.
//!
//! None of these reach a view. A failed namespace read is recorded as
//! [`LoadState::Failed`](crate::LoadState::Failed) and published as
//! [`TranslatorEvent::Failed`](crate::TranslatorEvent::Failed).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    /// The backend has nothing for this pair.
    #[error("no resources for {lng}/{ns}")]
    NotFound { lng: String, ns: String },

    /// The backend reported a failure of its own.
    #[error("backend failed to read {lng}/{ns}: {reason}")]
    Backend {
        lng: String,
        ns: String,
        reason: String,
    },

    /// Resource roots must be JSON objects.
    #[error("resources for {lng}/{ns} must be an object")]
    NotAnObject { lng: String, ns: String },

    #[error("invalid resource JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
