//! Tests for useEffect dependency tracking and cleanup management

use crate::hooks::test_utils::{
    unmount_component, with_component_id, with_hook_context, with_test_isolate,
};

use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Effects without dependencies run on every render
#[test]
fn test_use_effect_without_deps_runs_every_render() {
    with_test_isolate(|| {
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            with_component_id("AlwaysEffectComponent", |_| {
                let runs = runs.clone();
                use_effect::<(), _, fn()>(
                    move || {
                        runs.set(runs.get() + 1);
                        None
                    },
                    None,
                );
            });
        }

        assert_eq!(runs.get(), 3);
    });
}

/// Empty dependencies run the effect exactly once
#[test]
fn test_use_effect_once_runs_on_first_render_only() {
    with_test_isolate(|| {
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            with_component_id("OnceEffectComponent", |_| {
                let runs = runs.clone();
                use_effect_once(move || {
                    runs.set(runs.get() + 1);
                    || {}
                });
            });
        }

        assert_eq!(runs.get(), 1);
    });
}

/// Changing dependencies re-runs the effect and cleans up the previous run
#[test]
fn test_use_effect_changing_deps() {
    with_test_isolate(|| {
        let log = Rc::new(RefCell::new(Vec::new()));

        for value in [1u32, 1, 2, 2, 3] {
            with_component_id("ChangingDepsComponent", |_| {
                let log = log.clone();
                use_effect(
                    move || {
                        log.borrow_mut().push(format!("run {value}"));
                        let log = log.clone();
                        Some(move || log.borrow_mut().push(format!("cleanup {value}")))
                    },
                    value,
                );
            });
        }

        assert_eq!(
            *log.borrow(),
            vec!["run 1", "cleanup 1", "run 2", "cleanup 2", "run 3"]
        );
    });
}

/// Optional dependencies compare by value
#[test]
fn test_use_effect_option_deps() {
    with_test_isolate(|| {
        let runs = Rc::new(Cell::new(0));

        for value in [None, None, Some(4u16), Some(4u16), None] {
            with_component_id("OptionDepsComponent", |_| {
                let runs = runs.clone();
                use_effect::<Option<u16>, _, fn()>(
                    move || {
                        runs.set(runs.get() + 1);
                        None
                    },
                    Some(value),
                );
            });
        }

        assert_eq!(runs.get(), 3);
    });
}

/// Unmounting the component runs the pending cleanup
#[test]
fn test_cleanup_runs_on_unmount() {
    with_test_isolate(|| {
        let cleaned = Rc::new(Cell::new(false));

        with_component_id("UnmountEffectComponent", |_| {
            let cleaned = cleaned.clone();
            use_effect_once(move || move || cleaned.set(true));
        });

        assert!(!cleaned.get());
        unmount_component("UnmountEffectComponent");
        assert!(cleaned.get());
    });
}

/// Cleanup closures may capture non-Send handles
#[test]
fn test_cleanup_fn_is_idempotent() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let cleanup = CleanupFn::new(move || counter.set(counter.get() + 1));
    let shared = cleanup.clone();

    cleanup.cleanup();
    shared.cleanup();
    cleanup.cleanup();

    assert_eq!(calls.get(), 1);
}

/// Effects may read other hook state of the same component
#[test]
fn test_use_effect_with_use_state() {
    with_hook_context(|_| {
        let (count, set_count) = crate::hooks::state::use_state(|| 0);
        let observed = Rc::new(Cell::new(-1));

        let sink = observed.clone();
        use_effect_once(move || {
            set_count.set(7);
            sink.set(count.get());
            || {}
        });

        assert_eq!(observed.get(), 7);
    });
}

#[test]
fn test_dependency_equality() {
    assert!(5u8.deps_eq(&5u8));
    assert!(!5u8.deps_eq(&6u8));
    assert!(!5u8.deps_eq(&5u16));
    assert!(().deps_eq(&()));
    assert!(String::from("a").deps_eq(&String::from("a")));
    assert_eq!(Some(3i32).debug_deps(), "Some(3)");
}
