#![forbid(unsafe_code)]

//! Record of the namespaces views have asked for.
//!
//! Translators load these for every new language, so a language switch
//! brings in exactly what mounted views use.

use std::cell::RefCell;
use std::rc::Rc;

/// Insertion-ordered set of used namespaces. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTracker {
    used: Rc<RefCell<Vec<String>>>,
}

impl NamespaceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_used_namespaces<S: AsRef<str>>(&self, namespaces: &[S]) {
        let mut used = self.used.borrow_mut();
        for ns in namespaces {
            let ns = ns.as_ref();
            if !used.iter().any(|u| u == ns) {
                used.push(ns.to_string());
            }
        }
    }

    #[must_use]
    pub fn used_namespaces(&self) -> Vec<String> {
        self.used.borrow().clone()
    }

    #[must_use]
    pub fn contains(&self, ns: &str) -> bool {
        self.used.borrow().iter().any(|u| u == ns)
    }

    pub fn clear(&self) {
        self.used.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.borrow().is_empty()
    }
}
