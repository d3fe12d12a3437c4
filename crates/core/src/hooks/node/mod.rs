use ratatui::layout::Margin;

use crate::hooks::with_hook_context;
use crate::observer::area::Node;


/// A layout [`Node`] that keeps its identity across renders.
///
/// `inset` is the margin between the node's border box and its content box,
/// typically the border and padding the component draws. It is refreshed on
/// every render.
///
/// # Panics
///
/// Panics if called outside of a component render context.
pub fn use_node(inset: Margin) -> Node {
    with_hook_context(|ctx| {
        let index = ctx.next_hook_index();
        let slot = ctx.get_or_init_state(index, || Node::with_inset(inset));
        let node = slot.borrow().clone();
        node.set_inset(inset);
        node
    })
}
