#![forbid(unsafe_code)]

//! What [`use_translation`](crate::use_translation) returns.

use crate::context::I18nRef;
use crate::lookup::TFunction;

/// Lookup function, translator and readiness for one render.
///
/// Fields can be read by name or the whole value converted into a
/// `(t, i18n, ready)` tuple; both read the same values.
///
/// ```ignore
/// let UseTranslation { t, i18n, ready } = result.clone();
/// let (t2, i18n2, ready2) = result.into();
/// assert!(t.ptr_eq(&t2) && i18n == i18n2 && ready == ready2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UseTranslation {
    pub t: TFunction,
    pub i18n: I18nRef,
    pub ready: bool,
}

impl UseTranslation {
    #[must_use]
    pub fn t(&self) -> &TFunction {
        &self.t
    }

    #[must_use]
    pub fn i18n(&self) -> &I18nRef {
        &self.i18n
    }

    #[must_use]
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// Borrowed positional view.
    #[must_use]
    pub fn parts(&self) -> (&TFunction, &I18nRef, bool) {
        (&self.t, &self.i18n, self.ready)
    }

    #[must_use]
    pub fn into_parts(self) -> (TFunction, I18nRef, bool) {
        (self.t, self.i18n, self.ready)
    }
}

impl From<UseTranslation> for (TFunction, I18nRef, bool) {
    fn from(result: UseTranslation) -> Self {
        result.into_parts()
    }
}

/// A view that cannot render its translations yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Suspension {
    pub i18n: I18nRef,
    /// Language the view is waiting for.
    pub language: Option<String>,
    /// Namespaces still loading, in request order.
    pub pending: Vec<String>,
    /// What the view would get if it rendered anyway.
    pub fallback: UseTranslation,
}

/// Outcome of [`use_translation`](crate::use_translation).
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationPoll {
    Ready(UseTranslation),
    /// Blocking mode and some namespace is not loaded. The view is re-rendered
    /// once loading makes progress.
    Suspended(Suspension),
}

impl TranslationPoll {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended(_))
    }

    #[must_use]
    pub fn ready_value(&self) -> Option<&UseTranslation> {
        match self {
            Self::Ready(result) => Some(result),
            Self::Suspended(_) => None,
        }
    }

    #[must_use]
    pub fn into_ready(self) -> Option<UseTranslation> {
        match self {
            Self::Ready(result) => Some(result),
            Self::Suspended(_) => None,
        }
    }

    #[must_use]
    pub fn suspension(&self) -> Option<&Suspension> {
        match self {
            Self::Ready(_) => None,
            Self::Suspended(suspension) => Some(suspension),
        }
    }

    /// The ready value, or whatever `f` makes of the suspension.
    pub fn unwrap_or_else(self, f: impl FnOnce(Suspension) -> UseTranslation) -> UseTranslation {
        match self {
            Self::Ready(result) => result,
            Self::Suspended(suspension) => f(suspension),
        }
    }

    /// The value the view would render with, suspended or not.
    #[must_use]
    pub fn into_result(self) -> UseTranslation {
        self.unwrap_or_else(|suspension| suspension.fallback)
    }
}
