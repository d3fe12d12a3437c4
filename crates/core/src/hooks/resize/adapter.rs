use std::cell::RefCell;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use crate::diagnostics::{catch_panic, panic_reason};
use crate::error::ResizeResult;
use crate::hooks::callback::Callback;
use crate::hooks::state::StateSetter;
use crate::observer::{ObservedBox, ObservedDimensions, ResizeEntry, ResizeHandler, ResizeObserver};

/// Shared, externally owned slot holding the element a component rendered
pub struct ElementRef<T> {
    current: Rc<RefCell<Option<T>>>,
}

impl<T> ElementRef<T> {
    pub fn new() -> Self {
        Self {
            current: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set(&self, element: Option<T>) {
        *self.current.borrow_mut() = element;
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.current.borrow().clone()
    }
}

impl<T> Default for ElementRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ElementRef<T> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
        }
    }
}

impl<T> PartialEq for ElementRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.current, &other.current)
    }
}

impl<T: fmt::Debug> fmt::Debug for ElementRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.current.borrow()).finish()
    }
}

/// An element to observe that the caller owns instead of assigning it
#[derive(Debug, Clone, PartialEq)]
pub enum ObserveTarget<T> {
    Element(T),
    Ref(ElementRef<T>),
}

impl<T: Clone> ObserveTarget<T> {
    fn resolve(&self) -> Option<T> {
        match self {
            ObserveTarget::Element(element) => Some(element.clone()),
            ObserveTarget::Ref(element_ref) => element_ref.get(),
        }
    }
}

struct Tracked<T> {
    element: T,
    /// False once the element was unobserved without being replaced
    observing: bool,
}

struct AdapterState<O: ResizeObserver> {
    observer: Option<O>,
    observed_box: ObservedBox,
    assigned: Option<O::Target>,
    forwarded: Option<ObserveTarget<O::Target>>,
    tracked: Option<Tracked<O::Target>>,
    last: ObservedDimensions,
    on_resize: Option<Callback<ObservedDimensions>>,
    publisher: Option<StateSetter<ObservedDimensions>>,
    unmounted: bool,
}

impl<O: ResizeObserver> AdapterState<O> {
    fn resolve_target(&self) -> Option<O::Target> {
        self.assigned
            .clone()
            .or_else(|| self.forwarded.as_ref().and_then(ObserveTarget::resolve))
    }

    /// Point the observer at the resolved element, if it changed
    fn sync(&mut self) {
        let Some(observer) = self.observer.as_ref() else {
            return;
        };

        let resolved = self.resolve_target();
        if self.tracked.as_ref().map(|tracked| &tracked.element) == resolved.as_ref() {
            return;
        }

        if let Some(previous) = self.tracked.take()
            && previous.observing
        {
            tracing::debug!(target: "hooks::resize", element = ?previous.element, "unobserving element");
            observer.unobserve(&previous.element);
        }

        if let Some(element) = resolved {
            tracing::debug!(target: "hooks::resize", element = ?element, box_model = %self.observed_box, "observing element");
            observer.observe(&element, self.observed_box);
            self.tracked = Some(Tracked {
                element,
                observing: true,
            });
        }
    }
}

enum Delivery {
    Skip,
    Callback(Callback<ObservedDimensions>, ObservedDimensions),
    Publish(StateSetter<ObservedDimensions>, ObservedDimensions),
}

/// Owns one native observer and forwards normalized, deduplicated size
/// reports of a single element.
///
/// The adapter is driven through three lifecycle calls, usable from any host
/// or directly from tests:
///
/// - [`on_attach`](Self::on_attach) once the owner is mounted
/// - [`on_element_changed`](Self::on_element_changed) whenever the rendered
///   element changes (this is what [`AssignRef`] calls)
/// - [`on_detach`](Self::on_detach) when the owner is torn down
///
/// Clones share the same state.
pub struct ResizeAdapter<O: ResizeObserver> {
    state: Rc<RefCell<AdapterState<O>>>,
}

impl<O: ResizeObserver> Clone for ResizeAdapter<O> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<O: ResizeObserver> ResizeAdapter<O> {
    pub fn new(observed_box: ObservedBox) -> Self {
        Self {
            state: Rc::new(RefCell::new(AdapterState {
                observer: None,
                observed_box,
                assigned: None,
                forwarded: None,
                tracked: None,
                last: ObservedDimensions::default(),
                on_resize: None,
                publisher: None,
                unmounted: false,
            })),
        }
    }

    /// Activate the adapter, connecting the native observer on first use.
    ///
    /// An element assigned before activation is observed right away. Calling
    /// this while already active only re-resolves the target.
    pub fn on_attach(&self) -> ResizeResult<()> {
        let needs_observer = self.state.borrow().observer.is_none();
        if needs_observer {
            let observer = O::connect(self.entry_handler())?;
            let mut state = self.state.borrow_mut();
            state.observer = Some(observer);
            state.tracked = None;
            state.unmounted = false;
            tracing::debug!(target: "hooks::resize", "resize observer connected");
        }

        self.state.borrow_mut().sync();
        Ok(())
    }

    /// Record the element rendered by the owner and observe it.
    ///
    /// `None` detaches; the same element again is a no-op.
    pub fn on_element_changed(&self, element: Option<O::Target>) {
        let mut state = self.state.borrow_mut();
        state.assigned = element;
        state.sync();
    }

    /// Tear the observer down.
    ///
    /// Reports that were already in flight still reach
    /// [`handle_entries`](Self::handle_entries) but are never published.
    pub fn on_detach(&self) {
        let observer = {
            let mut state = self.state.borrow_mut();
            state.unmounted = true;
            if let Some(tracked) = state.tracked.as_mut() {
                tracked.observing = false;
            }
            state.observer.take()
        };

        if let Some(observer) = observer {
            observer.disconnect();
            tracing::debug!(target: "hooks::resize", "resize observer disconnected");
        }
    }

    /// Process one batch of reports from the native observer
    pub fn handle_entries(&self, entries: &[ResizeEntry<O::Target>]) {
        let Some(entry) = entries.first() else {
            return;
        };

        let delivery = {
            let mut state = self.state.borrow_mut();

            let is_tracked = state
                .tracked
                .as_ref()
                .is_some_and(|tracked| tracked.element == entry.target);
            if !is_tracked {
                tracing::trace!(target: "hooks::resize", element = ?entry.target, "dropping report for untracked element");
                return;
            }

            let dimensions = entry.dimensions(state.observed_box);
            if dimensions == state.last {
                tracing::trace!(target: "hooks::resize", ?dimensions, "size unchanged");
                return;
            }
            state.last = dimensions;

            if let Some(on_resize) = state.on_resize.clone() {
                Delivery::Callback(on_resize, dimensions)
            } else if state.unmounted {
                tracing::trace!(target: "hooks::resize", ?dimensions, "report after teardown dropped");
                Delivery::Skip
            } else if let Some(publisher) = state.publisher.clone() {
                Delivery::Publish(publisher, dimensions)
            } else {
                Delivery::Skip
            }
        };

        // The adapter is released before user code runs so it may re-enter.
        match delivery {
            Delivery::Skip => {}
            Delivery::Callback(on_resize, dimensions) => {
                tracing::debug!(target: "hooks::resize", ?dimensions, "resize delivered to callback");
                emit_resize(&on_resize, dimensions);
            }
            Delivery::Publish(publisher, dimensions) => {
                tracing::debug!(target: "hooks::resize", ?dimensions, "resize published to state");
                publisher.set(dimensions);
            }
        }
    }

    /// Replace the pending resize callback without touching the observer
    pub fn set_on_resize(&self, on_resize: Option<Callback<ObservedDimensions>>) {
        self.state.borrow_mut().on_resize = on_resize;
    }

    /// State the adapter publishes into when no callback is registered
    pub fn set_publisher(&self, publisher: StateSetter<ObservedDimensions>) {
        self.state.borrow_mut().publisher = Some(publisher);
    }

    /// Element used when nothing was assigned through [`AssignRef`]
    pub fn set_forwarded_target(&self, target: Option<ObserveTarget<O::Target>>) {
        let mut state = self.state.borrow_mut();
        state.forwarded = target;
        state.sync();
    }

    /// Change the measured box, re-observing the tracked element with it
    pub fn set_observed_box(&self, observed_box: ObservedBox) {
        let mut state = self.state.borrow_mut();
        if state.observed_box == observed_box {
            return;
        }
        state.observed_box = observed_box;

        if let (Some(observer), Some(tracked)) = (state.observer.as_ref(), state.tracked.as_ref())
            && tracked.observing
        {
            observer.unobserve(&tracked.element);
            observer.observe(&tracked.element, observed_box);
        }
    }

    /// Stable assignment handle for this adapter
    pub fn assign_ref(&self) -> AssignRef<O> {
        AssignRef {
            adapter: self.clone(),
        }
    }

    /// Handle that unobserves the element currently being observed
    pub fn disconnect_handle(&self) -> Option<Disconnect<O>> {
        let state = self.state.borrow();
        let tracked = state.tracked.as_ref().filter(|tracked| tracked.observing)?;
        Some(Disconnect {
            adapter: self.clone(),
            element: tracked.element.clone(),
        })
    }

    /// Last dimensions that passed deduplication
    pub fn dimensions(&self) -> ObservedDimensions {
        self.state.borrow().last
    }

    /// Element currently under observation
    pub fn observed_element(&self) -> Option<O::Target> {
        let state = self.state.borrow();
        state
            .tracked
            .as_ref()
            .filter(|tracked| tracked.observing)
            .map(|tracked| tracked.element.clone())
    }

    /// Whether a native observer is currently connected
    pub fn is_active(&self) -> bool {
        self.state.borrow().observer.is_some()
    }

    pub fn is_unmounted(&self) -> bool {
        self.state.borrow().unmounted
    }

    fn unobserve_element(&self, element: &O::Target) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let (Some(observer), Some(tracked)) = (state.observer.as_ref(), state.tracked.as_mut())
        else {
            return;
        };

        if tracked.observing && tracked.element == *element {
            tracing::debug!(target: "hooks::resize", element = ?element, "element disconnected by caller");
            observer.unobserve(element);
            tracked.observing = false;
        }
    }

    fn entry_handler(&self) -> ResizeHandler<O::Target> {
        let state = Rc::downgrade(&self.state);
        Rc::new(move |entries: &[ResizeEntry<O::Target>]| {
            if let Some(state) = state.upgrade() {
                ResizeAdapter { state }.handle_entries(entries);
            }
        })
    }
}

fn emit_resize(on_resize: &Callback<ObservedDimensions>, dimensions: ObservedDimensions) {
    if let Err(payload) = catch_panic(AssertUnwindSafe(|| on_resize.emit(dimensions))) {
        tracing::error!(
            target: "hooks::resize",
            reason = %panic_reason(payload.as_ref()),
            "on_resize callback panicked"
        );
        std::panic::resume_unwind(payload);
    }
}

impl<O: ResizeObserver> fmt::Debug for ResizeAdapter<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ResizeAdapter")
            .field("active", &state.observer.is_some())
            .field("observed_box", &state.observed_box)
            .field("element", &state.tracked.as_ref().map(|t| &t.element))
            .field("last", &state.last)
            .field("unmounted", &state.unmounted)
            .finish()
    }
}

/// The function a component calls with the element it rendered.
///
/// One adapter hands out one identity for its whole lifetime, so comparing
/// handles from different renders yields equality.
pub struct AssignRef<O: ResizeObserver> {
    adapter: ResizeAdapter<O>,
}

impl<O: ResizeObserver> AssignRef<O> {
    pub fn assign(&self, element: Option<O::Target>) {
        self.adapter.on_element_changed(element);
    }
}

impl<O: ResizeObserver> Clone for AssignRef<O> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
        }
    }
}

impl<O: ResizeObserver> PartialEq for AssignRef<O> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.adapter.state, &other.adapter.state)
    }
}

impl<O: ResizeObserver> fmt::Debug for AssignRef<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignRef")
            .field("adapter", &Rc::as_ptr(&self.adapter.state))
            .finish()
    }
}

/// Stops observing the element that was tracked when the handle was taken.
///
/// Observation resumes once a different element is assigned.
pub struct Disconnect<O: ResizeObserver> {
    adapter: ResizeAdapter<O>,
    element: O::Target,
}

impl<O: ResizeObserver> Disconnect<O> {
    pub fn disconnect(&self) {
        self.adapter.unobserve_element(&self.element);
    }

    pub fn element(&self) -> &O::Target {
        &self.element
    }
}

impl<O: ResizeObserver> Clone for Disconnect<O> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
            element: self.element.clone(),
        }
    }
}

impl<O: ResizeObserver> fmt::Debug for Disconnect<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disconnect")
            .field("element", &self.element)
            .finish()
    }
}
