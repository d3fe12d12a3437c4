use ratatui::Frame;
use ratatui::layout::Rect;

use crate::observer::area::Node;


pub trait Component: 'static {
    /// Called on every render
    fn render(&self, area: Rect, frame: &mut Frame);
}

pub trait IntoElement {
    type Element: Component;
    fn into_element(self) -> Self::Element;
}

impl<T: Component> IntoElement for T {
    type Element = T;
    fn into_element(self) -> Self::Element {
        self
    }
}

/// Renders `inner` and records the area it was given into `node`.
///
/// Observers watching `node` see the new size on the next
/// [`flush_area_observers`](crate::observer::area::flush_area_observers).
pub struct Measured<C> {
    node: Node,
    inner: C,
}

impl<C: Component> Measured<C> {
    pub fn new(node: Node, inner: C) -> Self {
        Self { node, inner }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl<C: Component> Component for Measured<C> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        self.node.set_area(area);
        self.inner.render(area, frame);
    }
}
