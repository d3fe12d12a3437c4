use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use measure_core::hooks::{HookContext, clear_hook_context, set_hook_context};
use measure_core::observer::area::flush_area_observers;
use measure_core::redraw::{redraw_requested, take_redraw_request};
use measure_core::{Component, IntoElement};
use ratatui::{Terminal, backend::Backend};

use crate::error::RuntimeResult;
use crate::terminal::setup_terminal;

/// Upper bound on frames drawn for one [`RenderSession::render`] call
pub const MAX_SETTLE_FRAMES: usize = 8;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A terminal plus the hook context of the root component drawn into it.
///
/// Every frame resets the hook index, draws the element and then flushes the
/// area observers so size reports for this frame's layout are delivered
/// before the next one.
pub struct RenderSession<B: Backend> {
    terminal: Terminal<B>,
    context: Rc<HookContext>,
    frames: u64,
}

impl<B: Backend> RenderSession<B> {
    pub fn new(backend: B) -> RuntimeResult<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            context: Rc::new(HookContext::new()),
            frames: 0,
        })
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw a single frame, returning how many size reports it produced
    pub fn render_frame<C: Component>(&mut self, element: &C) -> RuntimeResult<usize> {
        self.context.reset_hook_index();
        set_hook_context(self.context.clone());
        let drawn = self
            .terminal
            .draw(|frame| element.render(frame.area(), frame));
        clear_hook_context();
        drawn?;

        self.frames += 1;
        let delivered = flush_area_observers();
        tracing::trace!(target: "runtime", frame = self.frames, delivered, "frame rendered");
        Ok(delivered)
    }

    /// Draw frames until no redraw is pending.
    ///
    /// Size reports published during a frame request another one, so a
    /// layout change usually settles after two frames. Gives up after
    /// [`MAX_SETTLE_FRAMES`] and returns the number of frames drawn.
    pub fn render<C: Component>(&mut self, element: &C) -> RuntimeResult<usize> {
        take_redraw_request();

        let mut frames = 0;
        loop {
            self.render_frame(element)?;
            frames += 1;

            if !take_redraw_request() {
                break;
            }
            if frames >= MAX_SETTLE_FRAMES {
                tracing::warn!(target: "runtime", frames, "layout did not settle, still requesting redraws");
                break;
            }
        }

        Ok(frames)
    }

    /// Tear down every hook of the root component, disconnecting its observers
    pub fn unmount(&mut self) {
        self.context.unmount();
    }
}

impl<B: Backend> Drop for RenderSession<B> {
    fn drop(&mut self) {
        self.context.unmount();
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Runs a component-based TUI application until `q`, `Esc` or `Ctrl+C`.
///
/// The element is redrawn whenever the terminal is resized or a hook
/// requests it. All hooks are unmounted before the terminal is restored.
///
/// # Example
/// ```no_run
/// use measure_runtime::run;
/// use measure_core::Component;
/// use ratatui::{Frame, layout::Rect};
///
/// struct MyComponent;
///
/// impl Component for MyComponent {
///     fn render(&self, _area: Rect, _frame: &mut Frame) {}
/// }
///
/// run(|| MyComponent).unwrap();
/// ```
pub fn run<F, T>(initializer: F) -> RuntimeResult<()>
where
    F: FnOnce() -> T,
    T: IntoElement,
{
    let element = initializer().into_element();
    let mut terminal = setup_terminal()?;
    let session = terminal.session_mut();

    session.render(&element)?;

    loop {
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if is_quit(&key) => break,
                Event::Resize(width, height) => {
                    tracing::debug!(target: "runtime", width, height, "terminal resized");
                    session.render(&element)?;
                    continue;
                }
                _ => {}
            }
        }

        if redraw_requested() {
            session.render(&element)?;
        }
    }

    session.unmount();
    tracing::info!(target: "runtime", frames = session.frames(), "application exited");
    Ok(())
}
