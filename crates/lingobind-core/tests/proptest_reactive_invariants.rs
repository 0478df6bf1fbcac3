//! Property-based invariants for the reactive primitives.
//!
//! 1. Observable version equals the number of value-changing sets
//! 2. Subscribers are called exactly once per version bump
//! 3. ListenerSet delivers each emit to exactly the live listeners

use std::cell::Cell;
use std::rc::Rc;

use lingobind_core::{ListenerSet, Observable};
use proptest::prelude::*;

proptest! {
    #[test]
    fn version_counts_value_changes(values in proptest::collection::vec(0u8..4, 0..64)) {
        let obs = Observable::new(0u8);
        let calls = Rc::new(Cell::new(0u64));
        let calls_clone = Rc::clone(&calls);
        let _sub = obs.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        let mut expected = 0u64;
        let mut current = 0u8;
        for v in values {
            if v != current {
                expected += 1;
                current = v;
            }
            obs.set(v);
        }
        prop_assert_eq!(obs.version(), expected);
        prop_assert_eq!(calls.get(), expected);
        prop_assert_eq!(obs.get(), current);
    }

    #[test]
    fn emit_reaches_only_live_listeners(keep in proptest::collection::vec(any::<bool>(), 0..32)) {
        let set = ListenerSet::<u32>::new();
        let hits = Rc::new(Cell::new(0usize));
        let mut guards = Vec::new();
        for k in &keep {
            let hits_clone = Rc::clone(&hits);
            let guard = set.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));
            if *k {
                guards.push(guard);
            }
        }
        let live = keep.iter().filter(|k| **k).count();
        prop_assert_eq!(set.live_count(), live);
        prop_assert_eq!(set.emit(&7), live);
        prop_assert_eq!(hits.get(), live);
    }
}
