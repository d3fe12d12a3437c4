//! Resize Showcase - element size observation in a terminal UI
//!
//! The left panel reads its own size from hook state. The right panel takes
//! the callback route and keeps a short history of the sizes it was told
//! about. Resize the terminal to watch both update.
//!
//! Set `MEASURE_BOX=content-box` to measure inside the panel borders.

use measure::prelude::*;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const BOX_ENV: &str = "MEASURE_BOX";
const HISTORY_LEN: usize = 6;

/// Bordered panel drawing a few lines of text
struct Panel {
    title: &'static str,
    color: Color,
    lines: Vec<Line<'static>>,
}

impl Component for Panel {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title)
            .border_style(Style::default().fg(self.color));
        frame.render_widget(
            Paragraph::new(self.lines.clone()).block(block),
            area,
        );
    }
}

fn size_line(label: &str, dimensions: ObservedDimensions) -> Line<'static> {
    let value = match (dimensions.width, dimensions.height) {
        (Some(width), Some(height)) => format!("{width} x {height}"),
        _ => "not measured yet".to_string(),
    };
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn error_line(err: &ResizeError) -> Line<'static> {
    Line::styled(err.to_string(), Style::default().fg(Color::Red))
}

/// Publishes its size through hook state
struct StatePanel {
    observed_box: ObservedBox,
}

impl Component for StatePanel {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let node = use_node(Margin::new(1, 1));

        let options = ResizeObserverOptions::new().observed_box(self.observed_box);
        let lines = match use_resize_observer::<AreaObserver>(options) {
            Ok(size) => {
                size.assign_ref.assign(Some(node.clone()));
                vec![
                    Line::from(format!("box: {}", self.observed_box)),
                    size_line("size", size.dimensions()),
                ]
            }
            Err(err) => vec![error_line(&err)],
        };

        let panel = Panel {
            title: " State ",
            color: Color::Cyan,
            lines,
        };
        Measured::new(node, panel).render(area, frame);
    }
}

/// Receives every size change through `on_resize`
struct CallbackPanel {
    observed_box: ObservedBox,
}

impl Component for CallbackPanel {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let node = use_node(Margin::new(1, 1));
        let (history, set_history) = use_state(Vec::<ObservedDimensions>::new);

        let options = ResizeObserverOptions::new()
            .observed_box(self.observed_box)
            .on_resize(move |size: ObservedDimensions| {
                tracing::info!(?size, "panel resized");
                set_history.update(|history| {
                    let mut next = history.clone();
                    next.push(size);
                    if next.len() > HISTORY_LEN {
                        next.remove(0);
                    }
                    next
                });
            });

        let mut lines = match use_resize_observer::<AreaObserver>(options) {
            Ok(size) => {
                size.assign_ref.assign(Some(node.clone()));
                // Callback mode never fills the handle's dimensions
                vec![size_line("handle", size.dimensions())]
            }
            Err(err) => vec![error_line(&err)],
        };

        lines.push(Line::from("history:"));
        lines.extend(
            history
                .get()
                .into_iter()
                .rev()
                .map(|size| size_line("  reported", size)),
        );

        let panel = Panel {
            title: " Callback ",
            color: Color::Magenta,
            lines,
        };
        Measured::new(node, panel).render(area, frame);
    }
}

struct App {
    observed_box: ObservedBox,
}

impl Component for App {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body);

        frame.render_widget(
            Paragraph::new("Resize Showcase")
                .style(Style::default().add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            header,
        );

        StatePanel {
            observed_box: self.observed_box,
        }
        .render(left, frame);
        CallbackPanel {
            observed_box: self.observed_box,
        }
        .render(right, frame);

        frame.render_widget(
            Paragraph::new("Resize the terminal to see new sizes. Press 'q' to quit.")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            footer,
        );
    }
}

fn observed_box_from_env() -> ObservedBox {
    match std::env::var(BOX_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring {BOX_ENV}");
            ObservedBox::default()
        }),
        Err(_) => ObservedBox::default(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The UI owns the terminal, so logs only go to the file
    init_diagnostics(&DiagnosticsConfig::from_env().without_console());

    let observed_box = observed_box_from_env();
    tracing::info!(%observed_box, "starting resize showcase");

    measure::run(move || App { observed_box })?;
    Ok(())
}
