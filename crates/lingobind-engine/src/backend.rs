#![forbid(unsafe_code)]

//! Namespace backends.
//!
//! A backend fetches the raw resources of one (language, namespace) pair
//! and reports back through a completion callback. The callback may run
//! before `read` returns ([`StaticBackend`], [`FsBackend`]) or much later
//! ([`QueuedBackend`]); translators handle both.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::error::I18nError;
use crate::event::NamespaceKey;

/// Completion callback handed to [`Backend::read`].
pub type ReadCallback = Box<dyn FnOnce(Result<Value, I18nError>)>;

pub trait Backend {
    /// Fetch resources for `lng`/`ns` and call `done` exactly once.
    fn read(&self, lng: &str, ns: &str, done: ReadCallback);
}

/// In-memory resources, answered synchronously.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    resources: BTreeMap<NamespaceKey, Value>,
}

impl StaticBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, lng: &str, ns: &str, value: Value) -> Self {
        self.resources.insert(NamespaceKey::new(lng, ns), value);
        self
    }
}

impl Backend for StaticBackend {
    fn read(&self, lng: &str, ns: &str, done: ReadCallback) {
        let result = self
            .resources
            .get(&NamespaceKey::new(lng, ns))
            .cloned()
            .ok_or_else(|| I18nError::NotFound {
                lng: lng.to_string(),
                ns: ns.to_string(),
            });
        done(result);
    }
}

/// Reads `{root}/{lng}/{ns}.json` from disk.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, lng: &str, ns: &str) -> PathBuf {
        self.root.join(lng).join(format!("{ns}.json"))
    }

    fn read_value(&self, lng: &str, ns: &str) -> Result<Value, I18nError> {
        let path = self.path_for(lng, ns);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(I18nError::NotFound {
                    lng: lng.to_string(),
                    ns: ns.to_string(),
                });
            }
            Err(source) => return Err(I18nError::Io { path, source }),
        };
        debug!(path = %path.display(), bytes = content.len(), "read namespace file");
        Ok(serde_json::from_str(&content)?)
    }
}

impl Backend for FsBackend {
    fn read(&self, lng: &str, ns: &str, done: ReadCallback) {
        done(self.read_value(lng, ns));
    }
}

/// Backend whose reads stay pending until the owner resolves them.
///
/// Clones share the queue, so one handle can be given to a translator while
/// another drives completion. Useful wherever load timing must be
/// deterministic.
#[derive(Clone, Default)]
pub struct QueuedBackend {
    pending: Rc<RefCell<Vec<(NamespaceKey, ReadCallback)>>>,
}

impl std::fmt::Debug for QueuedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedBackend")
            .field("pending", &self.pending_keys())
            .finish()
    }
}

impl QueuedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs waiting for completion, in request order.
    #[must_use]
    pub fn pending_keys(&self) -> Vec<NamespaceKey> {
        self.pending.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Complete the read for `lng`/`ns`. Returns `false` if none is pending.
    pub fn resolve(&self, lng: &str, ns: &str, value: Value) -> bool {
        self.complete(lng, ns, Ok(value))
    }

    /// Fail the read for `lng`/`ns`. Returns `false` if none is pending.
    pub fn reject(&self, lng: &str, ns: &str, reason: &str) -> bool {
        self.complete(
            lng,
            ns,
            Err(I18nError::Backend {
                lng: lng.to_string(),
                ns: ns.to_string(),
                reason: reason.to_string(),
            }),
        )
    }

    fn complete(&self, lng: &str, ns: &str, result: Result<Value, I18nError>) -> bool {
        let key = NamespaceKey::new(lng, ns);
        // Take the callback out before running it; it may queue new reads.
        let done = {
            let mut pending = self.pending.borrow_mut();
            let Some(pos) = pending.iter().position(|(k, _)| *k == key) else {
                return false;
            };
            pending.remove(pos).1
        };
        done(result);
        true
    }
}

impl Backend for QueuedBackend {
    fn read(&self, lng: &str, ns: &str, done: ReadCallback) {
        self.pending
            .borrow_mut()
            .push((NamespaceKey::new(lng, ns), done));
    }
}
