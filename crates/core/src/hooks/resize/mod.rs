//! Element size observation hook
//!
//! [`use_resize_observer`] keeps one [`ResizeAdapter`] per component instance
//! and exposes its stable [`AssignRef`]. Size changes of the assigned element
//! are delivered either to an `on_resize` callback or, without one, through
//! component state that triggers a redraw.

mod adapter;

pub use adapter::{AssignRef, Disconnect, ElementRef, ObserveTarget, ResizeAdapter};

use crate::error::ResizeResult;
use crate::hooks::callback::{Callback, IntoCallback};
use crate::hooks::effect::use_effect_once;
use crate::hooks::state::use_state;
use crate::hooks::with_hook_context;
use crate::observer::{ObservedBox, ObservedDimensions, ResizeObserver};


/// Configuration of [`use_resize_observer`]
#[derive(Debug, Clone)]
pub struct ResizeObserverOptions<T> {
    /// Receives every changed size; when set, component state is not updated
    pub on_resize: Option<Callback<ObservedDimensions>>,
    /// Box reported by the observer, `border-box` by default
    pub observed_box: ObservedBox,
    /// Element observed when nothing is assigned through the returned ref
    pub target: Option<ObserveTarget<T>>,
}

impl<T> Default for ResizeObserverOptions<T> {
    fn default() -> Self {
        Self {
            on_resize: None,
            observed_box: ObservedBox::default(),
            target: None,
        }
    }
}

impl<T> ResizeObserverOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_resize(mut self, on_resize: impl IntoCallback<ObservedDimensions>) -> Self {
        self.on_resize = Some(on_resize.into_callback());
        self
    }

    pub fn observed_box(mut self, observed_box: ObservedBox) -> Self {
        self.observed_box = observed_box;
        self
    }

    /// Observe an element owned by the caller
    pub fn element(mut self, element: T) -> Self {
        self.target = Some(ObserveTarget::Element(element));
        self
    }

    /// Observe whatever element the reference currently holds
    pub fn element_ref(mut self, element_ref: ElementRef<T>) -> Self {
        self.target = Some(ObserveTarget::Ref(element_ref));
        self
    }
}

/// Result of [`use_resize_observer`] for one render
pub struct ResizeObserverHandle<O: ResizeObserver> {
    /// Call with the rendered element; identical across renders
    pub assign_ref: AssignRef<O>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Present while an element is being observed
    pub disconnect: Option<Disconnect<O>>,
}

impl<O: ResizeObserver> ResizeObserverHandle<O> {
    pub fn dimensions(&self) -> ObservedDimensions {
        ObservedDimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Observe the size of one element.
///
/// The native observer is connected on the first render and disconnected
/// when the component unmounts. Assigning an element through the returned
/// [`AssignRef`] (or forwarding one in the options) starts observation.
///
/// Without `on_resize`, `width` and `height` hold the last reported size,
/// rounded to whole cells, and each change requests a redraw.
///
/// # Examples
///
/// ```rust,no_run
/// # use measure_core::hooks::resize::{use_resize_observer, ResizeObserverOptions};
/// # use measure_core::hooks::{HookContext, set_hook_context};
/// # use measure_core::observer::area::{AreaObserver, Node};
/// # use std::rc::Rc;
/// # let context = Rc::new(HookContext::new());
/// # set_hook_context(context);
/// let node = Node::new();
/// let size = use_resize_observer::<AreaObserver>(ResizeObserverOptions::new())?;
/// size.assign_ref.assign(Some(node.clone()));
///
/// if let (Some(width), Some(height)) = (size.width, size.height) {
///     println!("{width}x{height}");
/// }
/// # Ok::<(), measure_core::ResizeError>(())
/// ```
///
/// # Errors
///
/// Returns [`ResizeError::Unsupported`](crate::ResizeError::Unsupported)
/// when the native observer cannot be created.
///
/// # Panics
///
/// Panics if called outside of a component render context.
pub fn use_resize_observer<O: ResizeObserver>(
    options: ResizeObserverOptions<O::Target>,
) -> ResizeResult<ResizeObserverHandle<O>> {
    let ResizeObserverOptions {
        on_resize,
        observed_box,
        target,
    } = options;

    let (dimensions, set_dimensions) = use_state(ObservedDimensions::default);

    let adapter = with_hook_context(|ctx| {
        let index = ctx.next_hook_index();
        let slot = ctx.get_or_init_state(index, || ResizeAdapter::<O>::new(observed_box));
        slot.borrow().clone()
    });

    {
        let adapter = adapter.clone();
        use_effect_once(move || move || adapter.on_detach());
    }

    adapter.set_publisher(set_dimensions);
    adapter.set_on_resize(on_resize);
    adapter.set_observed_box(observed_box);
    adapter.set_forwarded_target(target);
    adapter.on_attach()?;

    let current = dimensions.get();
    Ok(ResizeObserverHandle {
        assign_ref: adapter.assign_ref(),
        width: current.width,
        height: current.height,
        disconnect: adapter.disconnect_handle(),
    })
}
