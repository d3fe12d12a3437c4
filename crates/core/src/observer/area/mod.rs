//! Terminal-native size observation.
//!
//! Elements are layout [`Node`]s whose area is recorded while a frame is
//! rendered (see [`crate::component::Measured`]). After the frame, the host
//! calls [`flush_area_observers`], which plays the role of the browser's event
//! loop turn: every live [`AreaObserver`] receives one batch with an entry for
//! each observed node whose measured box changed since it was last reported.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::layout::{Margin, Rect};

use crate::error::ResizeResult;
use crate::observer::{
    BoxSize, ContentRect, ObservedBox, ResizeEntry, ResizeHandler, ResizeObserver,
};


static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static REGISTRY: RefCell<Vec<Weak<AreaObserverInner>>> = const { RefCell::new(Vec::new()) };
}

/// A laid-out terminal element.
///
/// Clones share the same layout record; equality is identity.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    id: u64,
    area: Cell<Option<Rect>>,
    inset: Cell<Margin>,
}

impl Node {
    pub fn new() -> Self {
        Self::with_inset(Margin::default())
    }

    /// Create a node whose content box is its area shrunk by `inset`
    /// (borders and padding drawn by the component).
    pub fn with_inset(inset: Margin) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
                area: Cell::new(None),
                inset: Cell::new(inset),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Record the area the node was rendered into
    pub fn set_area(&self, area: Rect) {
        self.inner.area.set(Some(area));
    }

    /// Forget the recorded area, e.g. when the element stops being rendered
    pub fn clear_area(&self) {
        self.inner.area.set(None);
    }

    /// Border box of the node, if it has been laid out
    pub fn area(&self) -> Option<Rect> {
        self.inner.area.get()
    }

    pub fn set_inset(&self, inset: Margin) {
        self.inner.inset.set(inset);
    }

    pub fn inset(&self) -> Margin {
        self.inner.inset.get()
    }

    /// Content box of the node, if it has been laid out
    pub fn content_area(&self) -> Option<Rect> {
        self.area().map(|area| area.inner(self.inset()))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.inner.id)
            .field("area", &self.inner.area.get())
            .field("inset", &self.inner.inset.get())
            .finish()
    }
}

struct Observation {
    node: Node,
    observed_box: ObservedBox,
    last_reported: Option<(u16, u16)>,
}

impl Observation {
    fn pending_entry(&mut self) -> Option<ResizeEntry<Node>> {
        let border = self.node.area()?;
        let content = border.inner(self.node.inset());

        let measured = match self.observed_box {
            ObservedBox::BorderBox => (border.width, border.height),
            ObservedBox::ContentBox => (content.width, content.height),
        };
        if self.last_reported == Some(measured) {
            return None;
        }
        self.last_reported = Some(measured);

        Some(ResizeEntry {
            target: self.node.clone(),
            border_box_size: Some(BoxSize::new(border.width.into(), border.height.into())),
            content_box_size: Some(BoxSize::new(content.width.into(), content.height.into())),
            content_rect: ContentRect {
                x: content.x.into(),
                y: content.y.into(),
                width: content.width.into(),
                height: content.height.into(),
            },
        })
    }
}

struct AreaObserverInner {
    handler: ResizeHandler<Node>,
    observations: RefCell<Vec<Observation>>,
    connected: Cell<bool>,
}

impl AreaObserverInner {
    fn take_pending_entries(&self) -> Vec<ResizeEntry<Node>> {
        if !self.connected.get() {
            return Vec::new();
        }
        self.observations
            .borrow_mut()
            .iter_mut()
            .filter_map(Observation::pending_entry)
            .collect()
    }
}

/// Size observer for terminal layout nodes
pub struct AreaObserver {
    inner: Rc<AreaObserverInner>,
}

impl AreaObserver {
    /// Number of nodes currently observed
    pub fn observed_count(&self) -> usize {
        self.inner.observations.borrow().len()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.get()
    }
}

impl ResizeObserver for AreaObserver {
    type Target = Node;

    fn connect(handler: ResizeHandler<Node>) -> ResizeResult<Self> {
        let inner = Rc::new(AreaObserverInner {
            handler,
            observations: RefCell::new(Vec::new()),
            connected: Cell::new(true),
        });

        REGISTRY.with(|registry| {
            let mut registry = registry.borrow_mut();
            registry.retain(|observer| observer.strong_count() > 0);
            registry.push(Rc::downgrade(&inner));
        });

        tracing::trace!(target: "observer::area", "area observer connected");
        Ok(Self { inner })
    }

    fn observe(&self, target: &Node, observed_box: ObservedBox) {
        self.inner.connected.set(true);
        let mut observations = self.inner.observations.borrow_mut();

        if let Some(existing) = observations.iter_mut().find(|o| o.node == *target) {
            if existing.observed_box != observed_box {
                existing.observed_box = observed_box;
                existing.last_reported = None;
            }
            return;
        }

        tracing::trace!(target: "observer::area", node = target.id(), %observed_box, "observe");
        observations.push(Observation {
            node: target.clone(),
            observed_box,
            last_reported: None,
        });
    }

    fn unobserve(&self, target: &Node) {
        tracing::trace!(target: "observer::area", node = target.id(), "unobserve");
        self.inner
            .observations
            .borrow_mut()
            .retain(|observation| observation.node != *target);
    }

    fn disconnect(&self) {
        tracing::trace!(target: "observer::area", "area observer disconnected");
        self.inner.connected.set(false);
        self.inner.observations.borrow_mut().clear();
    }
}

/// Deliver pending size reports to every live area observer on this thread.
///
/// Returns the number of entries delivered.
pub fn flush_area_observers() -> usize {
    let observers: Vec<Rc<AreaObserverInner>> = REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        registry.retain(|observer| observer.strong_count() > 0);
        registry.iter().filter_map(Weak::upgrade).collect()
    });

    let mut delivered = 0;
    for observer in observers {
        // Entries are gathered first so handlers may re-enter the observer.
        let entries = observer.take_pending_entries();
        if entries.is_empty() {
            continue;
        }
        delivered += entries.len();
        (observer.handler)(&entries);
    }

    if delivered > 0 {
        tracing::debug!(target: "observer::area", delivered, "flushed area observers");
    }
    delivered
}

/// Number of area observers alive on this thread
pub fn live_area_observers() -> usize {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    })
}
