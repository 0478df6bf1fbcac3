//! Property-based invariant tests for the reference translator.
//!
//! 1. Interpolation without placeholders is identity
//! 2. Interpolation does not re-expand substituted values
//! 3. Missing variables leave placeholder tokens intact
//! 4. A missing single key resolves to itself
//! 5. Missing alternatives resolve to the last alternative
//! 6. A bundled key resolves to its value in every namespace position
//!    under fallback search
//! 7. Arbitrary languages never panic and always yield a string

use std::collections::BTreeMap;

use lingobind_engine::{Keys, MemoryTranslator, TOptions, TranslateRequest, Translator, interpolate};
use proptest::prelude::*;
use serde_json::json;

fn translate(tr: &MemoryTranslator, keys: Keys, ns: &[String], opts: &TOptions) -> String {
    tr.translate(&TranslateRequest {
        keys: &keys,
        namespaces: ns,
        lng: None,
        key_prefix: None,
        options: opts,
    })
    .expect("memory translator always translates")
}

proptest! {
    #[test]
    fn interpolation_no_placeholders_identity(text in "[a-zA-Z0-9 .,!?]*") {
        let mut vars = BTreeMap::new();
        vars.insert("name".to_string(), "value".to_string());
        prop_assert_eq!(interpolate(&text, &vars), text);
    }

    #[test]
    fn interpolation_never_recurses(name in "[a-z]{1,10}", other in "[a-z]{1,10}") {
        prop_assume!(name != other);
        let template = format!("Hello {{{{{name}}}}}!");
        let mut vars = BTreeMap::new();
        vars.insert(name.clone(), format!("{{{{{other}}}}}"));
        vars.insert(other.clone(), "boom".to_string());
        let out = interpolate(&template, &vars);
        prop_assert_eq!(out, format!("Hello {{{{{other}}}}}!"));
    }

    #[test]
    fn missing_vars_preserve_tokens(name in "[a-z]{1,10}") {
        let template = format!("Value: {{{{{name}}}}}");
        let mut vars = BTreeMap::new();
        vars.insert(format!("{name}_x"), "ignored".to_string());
        prop_assert_eq!(interpolate(&template, &vars), template);
    }

    #[test]
    fn missing_key_is_returned_unchanged(key in "[a-z][a-z0-9_]{0,15}") {
        let tr = MemoryTranslator::builder()
            .language("en")
            .resource("en", "translation", json!({ "present": "yes" }))
            .init()
            .unwrap();
        prop_assume!(key != "present");
        let ns = vec!["translation".to_string()];
        prop_assert_eq!(translate(&tr, Keys::from(key.as_str()), &ns, &TOptions::new()), key);
    }

    #[test]
    fn missing_alternatives_return_last(keys in proptest::collection::vec("[a-z]{1,8}", 1..5)) {
        let tr = MemoryTranslator::builder().language("en").init().unwrap();
        let ns = vec!["translation".to_string()];
        let last = keys.last().cloned().unwrap();
        prop_assert_eq!(translate(&tr, Keys::from(keys), &ns, &TOptions::new()), last);
    }

    #[test]
    fn fallback_search_finds_key_anywhere(position in 0usize..4) {
        let namespaces: Vec<String> = (0..4).map(|i| format!("ns{i}")).collect();
        let tr = MemoryTranslator::builder()
            .language("en")
            .resource("en", &namespaces[position], json!({ "key1": "found" }))
            .init()
            .unwrap();
        prop_assert_eq!(
            translate(&tr, Keys::from("key1"), &namespaces, &TOptions::new()),
            "found"
        );
    }

    #[test]
    fn arbitrary_language_never_panics(lng in "\\PC{0,12}") {
        let tr = MemoryTranslator::builder()
            .language("en")
            .resource("en", "translation", json!({ "k": "v" }))
            .init()
            .unwrap();
        tr.change_language(&lng);
        let ns = vec!["translation".to_string()];
        let out = translate(&tr, Keys::from("k"), &ns, &TOptions::new());
        prop_assert!(out == "v" || out == "k");
    }
}
