use std::cell::Cell;

// Observation reports and state publishes all happen on the UI thread, so the
// pending flag lives next to the hook context instead of in a global.
thread_local! {
    static REDRAW_REQUESTED: Cell<bool> = const { Cell::new(false) };
}

/// Ask the host to draw another frame
pub fn request_redraw() {
    REDRAW_REQUESTED.with(|flag| flag.set(true));
}

/// Check whether a redraw is pending without consuming it
pub fn redraw_requested() -> bool {
    REDRAW_REQUESTED.with(Cell::get)
}

/// Consume the pending redraw request, returning whether one was set
pub fn take_redraw_request() -> bool {
    REDRAW_REQUESTED.with(|flag| flag.replace(false))
}

/// A guard that clears any pending redraw request when dropped
pub struct RedrawGuard;

impl Drop for RedrawGuard {
    fn drop(&mut self) {
        REDRAW_REQUESTED.with(|flag| flag.set(false));
    }
}

/// Create a new redraw guard
pub fn redraw_guard() -> RedrawGuard {
    RedrawGuard
}
