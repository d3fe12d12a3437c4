use std::{any::Any, cell::RefCell, collections::HashMap, rc::Rc};

pub mod callback;
pub mod effect;
pub mod node;
pub mod resize;
pub mod state;

#[cfg(test)]
pub mod test_utils;

thread_local! {
    static HOOK_CONTEXT: RefCell<Option<Rc<HookContext>>> = const { RefCell::new(None) };
}

/// A hook context that manages state for components
pub struct HookContext {
    states: RefCell<HashMap<usize, Box<dyn Any>>>,
    current_hook: RefCell<usize>,
}

impl HookContext {
    /// Create a new hook context
    pub fn new() -> Self {
        Self {
            states: RefCell::new(HashMap::new()),
            current_hook: RefCell::new(0),
        }
    }

    /// Get the current hook index and increment it
    pub fn next_hook_index(&self) -> usize {
        let mut current = self.current_hook.borrow_mut();
        let index = *current;
        *current += 1;
        index
    }

    /// Reset the hook index for a new render cycle
    pub fn reset_hook_index(&self) {
        *self.current_hook.borrow_mut() = 0;
    }

    /// Get or initialize state for a specific hook index
    pub fn get_or_init_state<T: 'static, F>(&self, index: usize, init: F) -> Rc<RefCell<T>>
    where
        F: FnOnce() -> T,
    {
        let mut states = self.states.borrow_mut();

        if let Some(existing) = states.get(&index)
            && let Some(typed_state) = existing.downcast_ref::<Rc<RefCell<T>>>()
        {
            return typed_state.clone();
        }

        let new_state = Rc::new(RefCell::new(init()));
        states.insert(index, Box::new(new_state.clone()));
        new_state
    }

    /// Check if state exists for a hook index
    pub fn has_state(&self, index: usize) -> bool {
        self.states.borrow().contains_key(&index)
    }

    /// Tear down every hook slot of the component.
    ///
    /// Slots are dropped after the internal borrow is released, so effect
    /// cleanups that run on drop may freely touch other hook state.
    pub fn unmount(&self) {
        let states = std::mem::take(&mut *self.states.borrow_mut());
        self.reset_hook_index();
        tracing::debug!(target: "hooks", slots = states.len(), "unmounting hook context");
        drop(states);
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Set the current hook context for the thread
pub fn set_hook_context(context: Rc<HookContext>) {
    HOOK_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Get the current hook context for the thread
pub fn get_hook_context() -> Option<Rc<HookContext>> {
    HOOK_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Clear the hook context for the thread
pub fn clear_hook_context() {
    HOOK_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Get the current hook context
pub fn with_hook_context<R>(f: impl FnOnce(&HookContext) -> R) -> R {
    let context =
        get_hook_context().expect("with_hook_context must be called within a hook context");
    f(&context)
}
