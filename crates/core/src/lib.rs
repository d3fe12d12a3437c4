mod component;
pub use component::{Component, IntoElement, Measured};

pub mod diagnostics;
pub mod hooks;
pub mod observer;
pub mod redraw;

mod error;
pub use error::{ResizeError, ResizeResult};

// Re-export commonly used items
pub use hooks::node::use_node;
pub use hooks::resize::{ResizeObserverHandle, ResizeObserverOptions, use_resize_observer};
pub use observer::{ObservedBox, ObservedDimensions};
pub use redraw::{request_redraw, take_redraw_request};
