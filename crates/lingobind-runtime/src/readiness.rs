#![forbid(unsafe_code)]

//! Whether a view's namespaces can be rendered yet.

use lingobind_engine::{CIMODE, Translator};
use tracing::debug;

/// Whether `ns` is usable for `lng` (or the current language).
///
/// A namespace counts as loaded when its bundle is present, when nothing
/// could ever load it, or when the load for the language and for the last
/// fallback language has settled either way.
#[must_use]
pub fn has_loaded_namespace(i18n: &dyn Translator, ns: &str, lng: Option<&str>) -> bool {
    let languages = i18n.languages();
    let Some(first) = lng.map(str::to_string).or_else(|| languages.first().cloned()) else {
        debug!(ns, "translator has no languages yet; treating namespace as loaded");
        return true;
    };
    if first.eq_ignore_ascii_case(CIMODE) {
        return true;
    }
    if i18n.has_resource_bundle(&first, ns) {
        return true;
    }
    let options = i18n.options();
    if !i18n.has_backend()
        || (options.has_bundled_resources && !options.partial_bundled_languages)
    {
        return true;
    }

    let settled = |language: &str| i18n.load_state(language, ns).is_settled();
    if !settled(&first) {
        return false;
    }
    match options.fallback_lng.last() {
        Some(last) => {
            let last = if lng.is_some() {
                last.as_str()
            } else {
                languages.last().map_or(last.as_str(), String::as_str)
            };
            settled(last)
        }
        None => true,
    }
}

/// Ready means initialized and every namespace loaded.
#[must_use]
pub fn is_ready(i18n: &dyn Translator, namespaces: &[String], lng: Option<&str>) -> bool {
    i18n.is_initialized() && namespaces.iter().all(|ns| has_loaded_namespace(i18n, ns, lng))
}

/// Namespaces still missing, in request order.
#[must_use]
pub fn pending_namespaces(
    i18n: &dyn Translator,
    namespaces: &[String],
    lng: Option<&str>,
) -> Vec<String> {
    namespaces
        .iter()
        .filter(|ns| !has_loaded_namespace(i18n, ns, lng))
        .cloned()
        .collect()
}
