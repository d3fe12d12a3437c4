use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use crate::redraw::request_redraw;


/// A thread-safe state container that holds the actual state value
#[derive(Debug)]
pub struct StateContainer<T> {
    value: RwLock<T>,
    /// Incremented on every write, usable for change detection
    version: Mutex<u64>,
}

impl<T> StateContainer<T> {
    /// Create a new state container with the initial value from the initializer
    pub fn new<F>(initializer: F) -> Self
    where
        F: FnOnce() -> T,
    {
        Self {
            value: RwLock::new(initializer()),
            version: Mutex::new(0),
        }
    }

    /// Get the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.read().clone()
    }

    fn increment_version_and_notify(&self) {
        {
            let mut version = self.version.lock();
            *version += 1;
        }

        request_redraw();
    }

    /// Set a new value
    pub fn set(&self, new_value: T) {
        {
            let mut value = self.value.write();
            *value = new_value;
        }

        self.increment_version_and_notify();
    }

    /// Update the value using a function of the previous value
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&T) -> T,
    {
        {
            let mut value = self.value.write();
            let new_value = updater(&*value);
            *value = new_value;
        }

        self.increment_version_and_notify();
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        *self.version.lock()
    }
}

/// Read side of a piece of component state
#[derive(Debug)]
pub struct StateHandle<T> {
    container: Arc<StateContainer<T>>,
}

impl<T> StateHandle<T> {
    /// Create a state handle from an existing container
    pub fn from_container(container: Arc<StateContainer<T>>) -> Self {
        Self { container }
    }

    /// Get the current value of the state
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.container.get()
    }

    /// Get the current version of the state
    pub fn version(&self) -> u64 {
        self.container.version()
    }
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
        }
    }
}

/// Write side of a piece of component state.
///
/// Every write bumps the container version and requests a redraw from the host.
#[derive(Debug)]
pub struct StateSetter<T> {
    container: Arc<StateContainer<T>>,
}

impl<T> StateSetter<T> {
    /// Create a new state setter
    pub fn new(container: Arc<StateContainer<T>>) -> Self {
        Self { container }
    }

    /// Set the state to a new value
    pub fn set(&self, new_value: T) {
        self.container.set(new_value);
    }

    /// Update the state from its previous value
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&T) -> T,
    {
        use crate::diagnostics::{catch_panic, panic_reason};

        let safe_updater = |current: &T| -> T {
            match catch_panic(std::panic::AssertUnwindSafe(|| updater(current))) {
                Ok(new_value) => new_value,
                Err(panic_payload) => {
                    let reason = panic_reason(panic_payload.as_ref());

                    tracing::error!(
                        target: "hooks::state",
                        "State updater function panicked: {:?}",
                        reason
                    );

                    panic!("State updater panicked: {}", reason);
                }
            }
        };

        self.container.update(safe_updater);
    }

    #[cfg(test)]
    pub fn container(&self) -> &Arc<StateContainer<T>> {
        &self.container
    }
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
        }
    }
}

/// Component-local state that persists across renders.
///
/// Returns a `(StateHandle, StateSetter)` pair bound to the calling hook slot.
/// The initializer only runs on the first render of the component.
///
/// # Example
///
/// ```rust,no_run
/// # use measure_core::hooks::state::use_state;
/// # use measure_core::hooks::{HookContext, set_hook_context};
/// # use std::rc::Rc;
/// # let context = Rc::new(HookContext::new());
/// # set_hook_context(context);
/// let (count, set_count) = use_state(|| 0);
/// set_count.update(|prev| prev + 1);
/// assert_eq!(count.get(), 1);
/// ```
///
/// # Panics
///
/// Panics if called outside of a component render context.
pub fn use_state<T, F>(initializer: F) -> (StateHandle<T>, StateSetter<T>)
where
    T: 'static,
    F: FnOnce() -> T,
{
    use crate::hooks::with_hook_context;

    with_hook_context(|ctx| {
        let index = ctx.next_hook_index();

        let container_ref =
            ctx.get_or_init_state(index, || Arc::new(StateContainer::new(initializer)));
        let container = container_ref.borrow().clone();

        (
            StateHandle::from_container(container.clone()),
            StateSetter::new(container),
        )
    })
}
