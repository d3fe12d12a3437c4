use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(test)]
mod tests;

use crate::hooks::with_hook_context;

/// Trait for types that can be used as effect dependencies
pub trait EffectDependencies: Any {
    /// Compare this dependency set with another for equality
    fn deps_eq(&self, other: &dyn EffectDependencies) -> bool;

    /// Clone this dependency set as a boxed trait object
    fn clone_deps(&self) -> Box<dyn EffectDependencies>;

    /// Get a debug representation of the dependencies
    fn debug_deps(&self) -> String;
}

impl dyn EffectDependencies {
    pub fn as_any(&self) -> &dyn Any {
        self
    }
}

// Unit represents an empty dependency list: the effect runs once.
impl EffectDependencies for () {
    fn deps_eq(&self, other: &dyn EffectDependencies) -> bool {
        other.as_any().downcast_ref::<()>().is_some()
    }

    fn clone_deps(&self) -> Box<dyn EffectDependencies> {
        Box::new(())
    }

    fn debug_deps(&self) -> String {
        "()".to_string()
    }
}

macro_rules! impl_effect_deps_for_value {
    ($($t:ty),*) => {
        $(
            impl EffectDependencies for $t {
                fn deps_eq(&self, other: &dyn EffectDependencies) -> bool {
                    other
                        .as_any()
                        .downcast_ref::<$t>()
                        .is_some_and(|other_val| self == other_val)
                }

                fn clone_deps(&self) -> Box<dyn EffectDependencies> {
                    Box::new(self.clone())
                }

                fn debug_deps(&self) -> String {
                    format!("{:?}", self)
                }
            }
        )*
    };
}

impl_effect_deps_for_value!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool, char, String
);

impl<T> EffectDependencies for Option<T>
where
    T: EffectDependencies + Clone + PartialEq + std::fmt::Debug,
{
    fn deps_eq(&self, other: &dyn EffectDependencies) -> bool {
        other
            .as_any()
            .downcast_ref::<Option<T>>()
            .is_some_and(|other_option| self == other_option)
    }

    fn clone_deps(&self) -> Box<dyn EffectDependencies> {
        Box::new(self.clone())
    }

    fn debug_deps(&self) -> String {
        format!("{:?}", self)
    }
}

/// Run-once wrapper around an effect's cleanup closure.
///
/// Hook state is confined to the UI thread, so cleanups are not required to
/// be `Send` and may capture `Rc` handles.
pub struct CleanupFn {
    #[allow(clippy::type_complexity)]
    cleanup: Rc<RefCell<Option<Box<dyn FnOnce() + 'static>>>>,
}

impl CleanupFn {
    /// Create a new cleanup function wrapper
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            cleanup: Rc::new(RefCell::new(Some(Box::new(cleanup)))),
        }
    }

    /// Execute the cleanup function if it hasn't been called yet
    pub fn cleanup(&self) {
        let cleanup_fn = self.cleanup.borrow_mut().take();
        if let Some(cleanup_fn) = cleanup_fn {
            cleanup_fn();
        }
    }
}

impl Clone for CleanupFn {
    fn clone(&self) -> Self {
        Self {
            cleanup: self.cleanup.clone(),
        }
    }
}

struct EffectState {
    prev_deps: Option<Box<dyn EffectDependencies>>,
    cleanup: Option<CleanupFn>,
}

impl EffectState {
    fn new() -> Self {
        Self {
            prev_deps: None,
            cleanup: None,
        }
    }
}

// Dropping the slot is how the hook context unmounts a component.
impl Drop for EffectState {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.cleanup();
        }
    }
}

/// Synchronous side effect bound to the component lifecycle.
///
/// - `None` dependencies run the effect on every render
/// - `()` runs it once, on the first render
/// - any other dependency value re-runs it when the value changes
///
/// The cleanup returned by the previous run executes before the effect runs
/// again and when the component is unmounted.
///
/// # Panics
///
/// Panics if called outside of a component render context.
pub fn use_effect<Deps, F, C>(effect: F, deps: impl Into<Option<Deps>>)
where
    Deps: EffectDependencies + Clone + PartialEq + 'static,
    F: FnOnce() -> Option<C> + 'static,
    C: FnOnce() + 'static,
{
    let deps = deps.into();
    with_hook_context(|ctx| {
        let hook_index = ctx.next_hook_index();
        let state_ref = ctx.get_or_init_state(hook_index, EffectState::new);

        let previous_cleanup = {
            let mut effect_state = state_ref.borrow_mut();

            let should_run = match (&deps, &effect_state.prev_deps) {
                (None, _) => true,
                (Some(_), None) => true,
                (Some(current_deps), Some(prev_deps)) => !current_deps.deps_eq(prev_deps.as_ref()),
            };

            if !should_run {
                return;
            }

            effect_state.prev_deps = deps.as_ref().map(|current| current.clone_deps());
            effect_state.cleanup.take()
        };

        // Neither the cleanup nor the effect runs while the slot is borrowed.
        if let Some(cleanup) = previous_cleanup {
            cleanup.cleanup();
        }

        if let Some(cleanup_fn) = effect() {
            state_ref.borrow_mut().cleanup = Some(CleanupFn::new(cleanup_fn));
        }
    });
}

/// Effect that runs only on the first render; its cleanup runs on unmount.
///
/// ```rust,no_run
/// # use measure_core::hooks::effect::use_effect_once;
/// use_effect_once(|| {
///     tracing::info!("mounted");
///     || tracing::info!("unmounted")
/// });
/// ```
pub fn use_effect_once<F, C>(effect: F)
where
    F: FnOnce() -> C + 'static,
    C: FnOnce() + 'static,
{
    use_effect(|| Some(effect()), ())
}
