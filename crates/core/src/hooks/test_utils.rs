use crate::error::{ResizeError, ResizeResult};
use crate::hooks::{HookContext, clear_hook_context, set_hook_context};
use crate::observer::{
    BoxSize, ContentRect, ObservedBox, ResizeEntry, ResizeHandler, ResizeObserver,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// Thread-local registry to track component contexts by ID for testing
thread_local! {
    static COMPONENT_CONTEXTS: RefCell<HashMap<&'static str, Rc<HookContext>>> =
        RefCell::new(HashMap::new());
    static MOCK_OBSERVER: RefCell<MockObserverState> = RefCell::new(MockObserverState::default());
}

/// Render a component identified by `component_id`.
///
/// Calling again with the same ID is the next render of that component: hook
/// indices restart at zero and every hook finds its previous state.
pub fn with_component_id<F, R>(component_id: &'static str, test_fn: F) -> R
where
    F: FnOnce(&Rc<HookContext>) -> R,
{
    let context = COMPONENT_CONTEXTS.with(|contexts| {
        let mut contexts = contexts.borrow_mut();

        if let Some(existing_context) = contexts.get(component_id) {
            existing_context.reset_hook_index();
            existing_context.clone()
        } else {
            let new_context = Rc::new(HookContext::new());
            contexts.insert(component_id, new_context.clone());
            new_context
        }
    });

    set_hook_context(context.clone());
    let result = test_fn(&context);
    clear_hook_context();

    result
}

/// Unmount a component rendered through [`with_component_id`], running its
/// effect cleanups. The next render with the same ID starts fresh.
pub fn unmount_component(component_id: &'static str) {
    let context = COMPONENT_CONTEXTS.with(|contexts| contexts.borrow_mut().remove(component_id));
    if let Some(context) = context {
        context.unmount();
    }
}

/// Cleanup function to clear all component contexts
pub fn cleanup_component_contexts() {
    let contexts = COMPONENT_CONTEXTS.with(|contexts| std::mem::take(&mut *contexts.borrow_mut()));
    drop(contexts);
}

/// Run a test with clean component contexts and a fresh mock observer,
/// cleaning up again afterwards even if the test panics.
pub fn with_test_isolate<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R,
{
    cleanup_component_contexts();
    MockObserver::reset();

    struct CleanupGuard;
    impl Drop for CleanupGuard {
        fn drop(&mut self) {
            cleanup_component_contexts();
            MockObserver::reset();
        }
    }

    let _guard = CleanupGuard;

    test_fn()
}

/// Run a test inside a fresh, throwaway hook context
pub fn with_hook_context<F, R>(test_fn: F) -> R
where
    F: FnOnce(&Rc<HookContext>) -> R,
{
    let context = Rc::new(HookContext::new());
    set_hook_context(context.clone());

    let result = test_fn(&context);

    clear_hook_context();
    result
}

/// A call made by the adapter on the mock observer
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverCall {
    Connect,
    Observe(&'static str, ObservedBox),
    Unobserve(&'static str),
    Disconnect,
}

#[derive(Default)]
struct MockObserverState {
    calls: Vec<ObserverCall>,
    handler: Option<ResizeHandler<&'static str>>,
    observing: Vec<&'static str>,
    connected: bool,
    fail_connect: bool,
}

/// Scriptable observer whose elements are plain names.
///
/// Every call is recorded in a thread-local log. Reports are pushed by the
/// test through [`MockObserver::deliver`].
pub struct MockObserver;

impl MockObserver {
    pub fn reset() {
        MOCK_OBSERVER.with(|state| *state.borrow_mut() = MockObserverState::default());
    }

    /// Make the next `connect` fail as if the primitive were unavailable
    pub fn fail_next_connect() {
        MOCK_OBSERVER.with(|state| state.borrow_mut().fail_connect = true);
    }

    pub fn calls() -> Vec<ObserverCall> {
        MOCK_OBSERVER.with(|state| state.borrow().calls.clone())
    }

    pub fn count(call: &ObserverCall) -> usize {
        MOCK_OBSERVER.with(|state| state.borrow().calls.iter().filter(|c| *c == call).count())
    }

    pub fn observing() -> Vec<&'static str> {
        MOCK_OBSERVER.with(|state| state.borrow().observing.clone())
    }

    /// Deliver a report the way the native mechanism would: only for an
    /// element that is currently observed by a connected observer.
    pub fn deliver(entry: ResizeEntry<&'static str>) -> bool {
        let handler = MOCK_OBSERVER.with(|state| {
            let state = state.borrow();
            if state.connected && state.observing.contains(&entry.target) {
                state.handler.clone()
            } else {
                None
            }
        });

        match handler {
            Some(handler) => {
                handler(&[entry]);
                true
            }
            None => false,
        }
    }

    /// Deliver a report that was queued before the observer was torn down
    pub fn deliver_in_flight(entry: ResizeEntry<&'static str>) -> bool {
        let handler = MOCK_OBSERVER.with(|state| state.borrow().handler.clone());
        match handler {
            Some(handler) => {
                handler(&[entry]);
                true
            }
            None => false,
        }
    }
}

impl ResizeObserver for MockObserver {
    type Target = &'static str;

    fn connect(handler: ResizeHandler<&'static str>) -> ResizeResult<Self> {
        MOCK_OBSERVER.with(|state| {
            let mut state = state.borrow_mut();
            if std::mem::take(&mut state.fail_connect) {
                return Err(ResizeError::Unsupported("mock observer unavailable".into()));
            }
            state.calls.push(ObserverCall::Connect);
            state.handler = Some(handler);
            state.observing.clear();
            state.connected = true;
            Ok(MockObserver)
        })
    }

    fn observe(&self, target: &&'static str, observed_box: ObservedBox) {
        MOCK_OBSERVER.with(|state| {
            let mut state = state.borrow_mut();
            state.calls.push(ObserverCall::Observe(target, observed_box));
            if !state.observing.contains(target) {
                state.observing.push(target);
            }
        });
    }

    fn unobserve(&self, target: &&'static str) {
        MOCK_OBSERVER.with(|state| {
            let mut state = state.borrow_mut();
            state.calls.push(ObserverCall::Unobserve(target));
            state.observing.retain(|observed| observed != target);
        });
    }

    fn disconnect(&self) {
        MOCK_OBSERVER.with(|state| {
            let mut state = state.borrow_mut();
            state.calls.push(ObserverCall::Disconnect);
            state.observing.clear();
            state.connected = false;
        });
    }
}

/// Report with both box sizes present
pub fn box_entry(
    target: &'static str,
    border: (f64, f64),
    content: (f64, f64),
) -> ResizeEntry<&'static str> {
    ResizeEntry {
        target,
        border_box_size: Some(BoxSize::new(border.0, border.1)),
        content_box_size: Some(BoxSize::new(content.0, content.1)),
        content_rect: ContentRect {
            x: 0.0,
            y: 0.0,
            width: content.0,
            height: content.1,
        },
    }
}

/// Report carrying only a content rectangle, as older engines send
pub fn rect_entry(target: &'static str, width: f64, height: f64) -> ResizeEntry<&'static str> {
    ResizeEntry {
        target,
        border_box_size: None,
        content_box_size: None,
        content_rect: ContentRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::state::use_state;

    #[test]
    fn test_with_component_id_persistence() {
        with_test_isolate(|| {
            with_component_id("PersistentComponent", |_| {
                let (state, setter) = use_state(|| 0);
                assert_eq!(state.get(), 0);
                setter.set(42);
            });

            with_component_id("PersistentComponent", |context| {
                assert_eq!(*context.current_hook.borrow(), 0);
                let (state, _) = use_state(|| 0);
                assert_eq!(state.get(), 42);
            });
        });
    }

    #[test]
    fn test_unmount_component_starts_fresh() {
        with_test_isolate(|| {
            with_component_id("UnmountedComponent", |_| {
                let (_, setter) = use_state(|| 1);
                setter.set(2);
            });

            unmount_component("UnmountedComponent");

            with_component_id("UnmountedComponent", |_| {
                let (state, _) = use_state(|| 1);
                assert_eq!(state.get(), 1);
            });
        });
    }

    #[test]
    fn test_with_hook_context_isolation() {
        with_hook_context(|_| {
            let (state, setter) = use_state(|| 10);
            setter.set(20);
            assert_eq!(state.get(), 20);
        });

        with_hook_context(|_| {
            let (state, _) = use_state(|| 10);
            assert_eq!(state.get(), 10);
        });

        assert!(crate::hooks::get_hook_context().is_none());
    }

    #[test]
    fn test_with_test_isolate_panic_cleanup() {
        let panic_result = std::panic::catch_unwind(|| {
            with_test_isolate(|| {
                with_component_id("PanicTest", |_| {
                    let (_, setter) = use_state(|| 80);
                    setter.set(95);
                });

                panic!("Test panic");
            })
        });

        assert!(panic_result.is_err());

        with_component_id("PanicTest", |_| {
            let (state, _) = use_state(|| 80);
            assert_eq!(state.get(), 80);
        });
        cleanup_component_contexts();
    }

    #[test]
    fn test_mock_observer_records_calls() {
        with_test_isolate(|| {
            let handler: ResizeHandler<&'static str> = Rc::new(|_: &[ResizeEntry<&'static str>]| {});
            let observer = MockObserver::connect(handler).unwrap();
            observer.observe(&"panel", ObservedBox::BorderBox);
            observer.unobserve(&"panel");
            observer.disconnect();

            assert_eq!(
                MockObserver::calls(),
                vec![
                    ObserverCall::Connect,
                    ObserverCall::Observe("panel", ObservedBox::BorderBox),
                    ObserverCall::Unobserve("panel"),
                    ObserverCall::Disconnect,
                ]
            );
            assert!(!MockObserver::deliver(rect_entry("panel", 1.0, 1.0)));
        });
    }
}
