//! Stats panel: latest values, averages, maxima and spike info.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::view::ViewModel;

/// Rows including borders.
pub const HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.view {
        Some(view) => format!(
            " Stats ({} of {} samples) ",
            view.series.len(),
            view.total_samples
        ),
        None => " Stats ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let mut lines = match &app.view {
        Some(view) => lines_for(app, view),
        None => vec![Line::from(Span::styled(
            "Waiting for first fetch...",
            Style::default().add_modifier(Modifier::DIM),
        ))],
    };

    if let Some(err) = &app.load_error {
        lines.push(Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(app.theme.critical)),
            Span::styled(
                format!("Failed to load data: {}", err.message),
                Style::default().fg(app.theme.critical),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn lines_for(app: &App, view: &ViewModel) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let (cpu, memory) = view.latest_values();
    let (cpu_style, memory_style) = match &view.stats {
        Some(s) => (
            app.theme.level_style(s.cpu_level),
            app.theme.level_style(s.memory_level),
        ),
        None => {
            let dim = Style::default().add_modifier(Modifier::DIM);
            (dim, dim)
        }
    };

    let spike_style = if view.spike_count() > 0 {
        Style::default().fg(app.theme.critical)
    } else {
        Style::default()
    };

    vec![
        Line::from(vec![
            Span::styled("Latest CPU: ", bold),
            Span::styled(cpu, cpu_style),
            Span::raw(" | "),
            Span::styled("Latest Memory: ", bold),
            Span::styled(memory, memory_style),
        ]),
        Line::from(view.cpu_summary()),
        Line::from(view.memory_summary()),
        Line::from(Span::styled(view.spike_info(), spike_style)),
    ]
}
