pub use crossterm;
pub use measure_core::{
    Component, IntoElement, Measured, ResizeError, ResizeResult,
    diagnostics::{DiagnosticsConfig, init_diagnostics},
    hooks::{
        callback::{Callback, IntoCallback},
        effect::{EffectDependencies, use_effect, use_effect_once},
        node::use_node,
        resize::{
            AssignRef, Disconnect, ElementRef, ObserveTarget, ResizeAdapter, ResizeObserverHandle,
            ResizeObserverOptions, use_resize_observer,
        },
        state::{StateHandle, StateSetter, use_state},
    },
    observer::{
        BoxSize, ContentRect, ObservedBox, ObservedDimensions, ResizeEntry, ResizeObserver,
        area::{AreaObserver, Node, flush_area_observers},
    },
    redraw::{request_redraw, take_redraw_request},
};

#[cfg(feature = "web")]
pub use measure_core::observer::web::WebResizeObserver;

pub use measure_runtime::*;

pub mod prelude {
    pub use super::*;
    pub use ratatui::{self, Frame, layout::Rect};
}
