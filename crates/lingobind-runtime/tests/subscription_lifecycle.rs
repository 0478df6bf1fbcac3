#![forbid(unsafe_code)]

//! Re-render and teardown guarantees of the translation hook.
//!
//! 1. `language_change`: one re-render per subscribed view per flush
//! 2. `instance_swap`: old subscription dropped before the new one exists
//! 3. `suspension`: blocking vs non-blocking readiness, load completion
//! 4. `unmount`: no renders and no callbacks after teardown
//! 5. `stability`: lookup function identity across renders
//!
//! Run:
//!   cargo test -p lingobind-runtime --test subscription_lifecycle

use std::cell::Cell;
use std::rc::Rc;

use lingobind_engine::{EventKind, I18n, MemoryTranslator, QueuedBackend, StaticBackend, Translator};
use lingobind_runtime::{
    ContextCell, HookOptions, MountedView, Provider, TranslationPoll, UseTranslation, ViewTree,
    use_translation,
};
use serde_json::json;

fn translator() -> Rc<MemoryTranslator> {
    MemoryTranslator::builder()
        .language("en")
        .resource("en", "translation", json!({ "key1": "test" }))
        .resource("de", "translation", json!({ "key1": "Test (de)" }))
        .init()
        .expect("valid resources")
}

fn text_view(tree: &ViewTree, ns: &'static str) -> MountedView<String> {
    tree.mount(move |cx| {
        use_translation(cx, ns, HookOptions::new())
            .into_result()
            .t
            .translate("key1")
    })
}

// =========================================================================
// 1. Language change
// =========================================================================

mod language_change {
    use super::*;

    #[test]
    fn each_view_rerenders_exactly_once_per_flush() {
        let tr = translator();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let a = text_view(&tree, "translation");
        let b = text_view(&tree, "translation");
        assert_eq!(a.latest().as_deref(), Some("test"));
        assert_eq!(tr.listener_count(), 2);

        tr.change_language("de");
        tr.change_language("de");
        assert_eq!(tree.pending_renders(), 2);
        assert_eq!(tree.flush(), 2);

        assert_eq!(a.render_count(), 2);
        assert_eq!(b.render_count(), 2);
        assert_eq!(a.latest().as_deref(), Some("Test (de)"));
        assert_eq!(b.latest().as_deref(), Some("Test (de)"));
        assert_eq!(tree.flush(), 0);
    }

    #[test]
    fn unrelated_namespace_loads_do_not_rerender() {
        let tr = translator();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view = text_view(&tree, "translation");

        tr.add_resource("en", "other", "x", "y");
        assert_eq!(tree.flush(), 0, "store events are not bound by default");

        tr.update_binding_options(|binding| binding.bind_store_events = vec![EventKind::Added]);
        view.rerender();
        tr.add_resource("en", "other", "x", "y");
        assert_eq!(tree.flush(), 0, "namespace not used by the view");
        tr.add_resource("en", "translation", "key1", "changed");
        assert_eq!(tree.flush(), 1);
        assert_eq!(view.latest().as_deref(), Some("changed"));
    }

    #[test]
    fn empty_bind_events_ignore_language_changes() {
        let tr = translator();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view = tree.mount(|cx| {
            use_translation(cx, "translation", HookOptions::new().bind_events([]))
                .into_result()
                .t
                .translate("key1")
        });
        tr.change_language("de");
        assert_eq!(tree.flush(), 0);
        assert_eq!(view.latest().as_deref(), Some("test"));
    }
}

// =========================================================================
// 2. Instance swap
// =========================================================================

mod instance_swap {
    use super::*;

    #[test]
    fn provider_swap_tears_down_old_subscription_first() {
        let first = translator();
        let second = translator();
        let provider = Provider::new(first.clone());
        let tree = ViewTree::with_context(ContextCell::new());
        let view = tree.mount_in(&provider, |cx| {
            use_translation(cx, "translation", HookOptions::new()).into_result()
        });
        assert_eq!(first.listener_count(), 1);
        assert_eq!(second.listener_count(), 0);

        let second_i18n: I18n = second.clone();
        provider.set_i18n(Some(second_i18n.clone()));
        assert_eq!(tree.pending_renders(), 1);
        assert_eq!(tree.flush(), 1);

        assert_eq!(first.listener_count(), 0);
        assert_eq!(second.listener_count(), 1);
        assert!(view.latest().unwrap().i18n.is(&second_i18n));

        first.change_language("de");
        assert_eq!(tree.flush(), 0, "old translator no longer reaches the view");
        second.change_language("de");
        assert_eq!(tree.flush(), 1);
    }

    #[test]
    fn provider_default_ns_change_rerenders() {
        let tr = translator();
        tr.add_resource("en", "admin", "key1", "admin test");
        let provider = Provider::new(tr.clone()).with_default_ns("translation");
        let tree = ViewTree::with_context(ContextCell::new());
        let view = provider.scope(|| {
            tree.mount(|cx| {
                use_translation(cx, lingobind_runtime::Namespaces::Default, HookOptions::new())
                    .into_result()
                    .t
                    .translate("key1")
            })
        });
        assert_eq!(view.latest().as_deref(), Some("test"));

        provider.set_default_ns(Some("admin".into()));
        assert_eq!(tree.flush(), 1);
        assert_eq!(view.latest().as_deref(), Some("admin test"));
        assert_eq!(tr.listener_count(), 1, "namespace change rebinds in place");
    }
}

// =========================================================================
// 3. Suspension
// =========================================================================

mod suspension {
    use super::*;

    fn backed() -> (Rc<MemoryTranslator>, QueuedBackend) {
        let backend = QueuedBackend::new();
        let tr = MemoryTranslator::builder()
            .language("en")
            .backend(backend.clone())
            .init()
            .expect("valid config");
        (tr, backend)
    }

    #[test]
    fn blocking_mode_suspends_until_loaded() {
        let (tr, backend) = backed();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view = tree.mount(|cx| use_translation(cx, "translation", HookOptions::new()));

        let poll = view.latest().unwrap();
        let suspension = poll.suspension().expect("suspended while loading");
        assert_eq!(suspension.pending, vec!["translation"]);
        assert_eq!(suspension.language.as_deref(), Some("en"));

        assert!(backend.resolve("en", "translation", json!({ "key1": "test" })));
        assert_eq!(tree.flush(), 1);
        let poll = view.latest().unwrap();
        let TranslationPoll::Ready(UseTranslation { t, ready, .. }) = &poll else {
            panic!("expected ready after load, got {poll:?}");
        };
        assert!(*ready);
        assert_eq!(t.translate("key1"), "test");
    }

    #[test]
    fn non_blocking_mode_reports_not_ready() {
        let (tr, backend) = backed();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view =
            tree.mount(|cx| use_translation(cx, "translation", HookOptions::new().wait(false)));

        let result = view.latest().unwrap().into_ready().expect("never suspends");
        assert!(!result.ready);
        assert_eq!(result.t.translate("key1"), "key1");

        backend.resolve("en", "translation", json!({ "key1": "test" }));
        tree.flush();
        assert!(view.latest().unwrap().into_ready().unwrap().ready);
    }

    #[test]
    fn failed_load_ends_suspension() {
        let (tr, backend) = backed();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view = tree.mount(|cx| use_translation(cx, "translation", HookOptions::new()));
        assert!(view.latest().unwrap().is_suspended());

        backend.reject("en", "translation", "offline");
        assert_eq!(tree.flush(), 1);
        assert!(view.latest().unwrap().is_ready());
    }

    #[test]
    fn hook_requests_missing_namespaces_once_per_language() {
        let (tr, backend) = backed();
        backend.resolve("en", "translation", json!({}));
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view = tree.mount(|cx| use_translation(cx, ["common", "extra"], HookOptions::new()));
        assert_eq!(backend.pending_keys().len(), 2);

        view.rerender();
        assert_eq!(backend.pending_keys().len(), 2);
        assert!(view.latest().unwrap().is_suspended());
    }

    #[test]
    fn synchronous_backend_is_ready_on_first_render() {
        let backend = StaticBackend::new().with("en", "common", json!({ "ok": "OK" }));
        let tr = MemoryTranslator::builder()
            .language("en")
            .namespaces(Vec::<String>::new())
            .backend(backend)
            .init()
            .expect("valid config");
        let tree = ViewTree::with_context(ContextCell::with_instance(tr));
        let view = tree.mount(|cx| {
            use_translation(cx, "common", HookOptions::new())
                .into_ready()
                .map(|r| r.t.translate("ok"))
        });
        assert_eq!(view.latest().flatten().as_deref(), Some("OK"));
        assert_eq!(tree.pending_renders(), 0);
        assert_eq!(tree.flush(), 0);
    }

    #[test]
    fn blocking_view_without_bound_loaded_wakes_on_its_load() {
        let (tr, backend) = backed();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let options = HookOptions::new().bind_events([EventKind::LanguageChanged]);
        let view = tree.mount(move |cx| use_translation(cx, "translation", options.clone()));
        assert!(view.latest().unwrap().is_suspended());

        assert!(backend.resolve("en", "translation", json!({ "key1": "test" })));
        assert_eq!(tree.flush(), 1);
        let result = view.latest().unwrap().into_ready().expect("ready after load");
        assert!(result.ready);
        assert_eq!(result.t.translate("key1"), "test");

        // Ready views only follow the bound kinds.
        tr.load_namespaces(Some("de"), &["translation".to_string()]);
        assert!(backend.resolve("de", "translation", json!({ "key1": "Test (de)" })));
        assert_eq!(tree.pending_renders(), 0);
    }

    #[test]
    fn non_blocking_view_without_bound_loaded_becomes_ready() {
        let (tr, backend) = backed();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let options = HookOptions::new()
            .wait(false)
            .bind_events([EventKind::LanguageChanged]);
        let view = tree.mount(move |cx| use_translation(cx, "translation", options.clone()));
        assert!(!view.latest().unwrap().into_ready().unwrap().ready);

        backend.resolve("en", "translation", json!({ "key1": "test" }));
        assert_eq!(tree.flush(), 1);
        assert!(view.latest().unwrap().into_ready().unwrap().ready);
    }

    #[test]
    fn uninitialized_translator_suspends_until_init() {
        let tr = MemoryTranslator::builder()
            .language("en")
            .resource("en", "translation", json!({ "key1": "test" }))
            .build()
            .expect("valid resources");
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view = tree.mount(|cx| use_translation(cx, "translation", HookOptions::new()));
        assert!(view.latest().unwrap().is_suspended());

        tr.init();
        assert_eq!(tree.flush(), 1);
        assert!(view.latest().unwrap().is_ready());
    }
}

// =========================================================================
// 4. Unmount
// =========================================================================

mod unmount {
    use super::*;

    #[test]
    fn unmount_while_pending_causes_no_render_or_callback() {
        let backend = QueuedBackend::new();
        let tr = MemoryTranslator::builder()
            .language("en")
            .backend(backend.clone())
            .init()
            .expect("valid config");
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let renders = Rc::new(Cell::new(0u32));
        let renders_clone = Rc::clone(&renders);
        let view = tree.mount(move |cx| {
            renders_clone.set(renders_clone.get() + 1);
            use_translation(cx, "translation", HookOptions::new()).is_ready()
        });
        assert_eq!(view.latest(), Some(false));
        assert_eq!(tr.listener_count(), 1);

        let handle = view.handle();
        view.unmount();
        assert_eq!(tr.listener_count(), 0);

        assert!(backend.resolve("en", "translation", json!({ "key1": "test" })));
        assert_eq!(tree.pending_renders(), 0);
        assert_eq!(tree.flush(), 0);
        assert_eq!(renders.get(), 1);
        assert!(!handle.request_render());
    }

    #[test]
    fn dropping_the_view_unsubscribes() {
        let tr = translator();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        {
            let _view = text_view(&tree, "translation");
            assert_eq!(tr.listener_count(), 1);
        }
        assert_eq!(tr.listener_count(), 0);
        tr.change_language("de");
        assert_eq!(tree.flush(), 0);
    }
}

// =========================================================================
// 5. Stability
// =========================================================================

mod stability {
    use super::*;

    #[test]
    fn lookup_function_is_stable_until_inputs_change() {
        let tr = translator();
        let tree = ViewTree::with_context(ContextCell::with_instance(tr.clone()));
        let view =
            tree.mount(|cx| use_translation(cx, "translation", HookOptions::new()).into_result());
        let first = view.latest().unwrap().t;

        view.rerender();
        assert!(view.latest().unwrap().t.ptr_eq(&first));

        tr.change_language("de");
        tree.flush();
        let after = view.latest().unwrap().t;
        assert!(!after.ptr_eq(&first));
        assert_eq!(after.translate("key1"), "Test (de)");

        view.rerender();
        assert!(view.latest().unwrap().t.ptr_eq(&after));
    }

    #[test]
    fn degraded_lookup_function_is_stable_too() {
        let tree = ViewTree::with_context(ContextCell::new());
        let view =
            tree.mount(|cx| use_translation(cx, "translation", HookOptions::new()).into_result());
        let first = view.latest().unwrap().t;
        view.rerender();
        assert!(view.latest().unwrap().t.ptr_eq(&first));
    }
}
