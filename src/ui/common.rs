//! Common UI components.
//!
//! This module contains the header bar, time range bar, status bar, and help overlay.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Bound, DateRange};
use crate::view::format_time;

pub const APP_TITLE: &str = "CPU & Memory Monitor";

/// Render the header bar.
///
/// Displays: status indicator, title, source, pause/resume button, time to next refresh.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status_style = if app.load_error.is_some() {
        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
    } else if !app.refresh.is_active() {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.healthy)
    };

    let next = match app.refresh.remaining(Instant::now()) {
        Some(left) => format!("next refresh in {}s", left.as_secs()),
        None => "paused".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled(
            format!("{} ", APP_TITLE),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(
            format!("[{}]", app.refresh.button_label()),
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(next, Style::default().add_modifier(Modifier::DIM)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the time range bar, or the bound editor while one is being typed.
pub fn render_range(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(input) = &app.range_input {
        Line::from(vec![
            Span::styled(
                format!(" {} date: ", capitalize(input.bound.label())),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}_", input.text),
                Style::default().fg(app.theme.highlight),
            ),
            Span::styled(
                "  (YYYY-MM-DD or RFC 3339, empty clears) Enter:apply Esc:cancel",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(" Time Range: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(range_text(&app.range)),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// "start → end" with unset bounds shown as open.
pub fn range_text(range: &DateRange) -> String {
    if range.is_unbounded() {
        return "all samples".to_string();
    }
    let side = |bound| {
        range
            .get(bound)
            .map(format_time)
            .unwrap_or_else(|| "…".to_string())
    };
    format!("{} → {}", side(Bound::Start), side(Bound::End))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update, loading state, available controls.
/// Temporary status messages take priority.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.range_input.is_some() {
        "Type a date | Enter:apply Esc:cancel"
    } else {
        "p:pause [:start ]:end c:clear r:reload e:export ?:help q:quit"
    };

    let mut parts = Vec::new();
    if app.is_loading() {
        parts.push("Loading...".to_string());
    }
    match app.last_updated {
        Some(at) => parts.push(format!("Updated {:.1}s ago", at.elapsed().as_secs_f64())),
        None if app.load_error.is_some() => parts.push("No data yet".to_string()),
        None => {}
    }
    parts.push(controls.to_string());

    let paragraph = Paragraph::new(format!(" {}", parts.join(" | ")))
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Updates"),
        Line::from("  p / Space   Pause or resume updates"),
        Line::from("  r           Reload now"),
        Line::from(""),
        section(" Time Range"),
        Line::from("  [           Set start date"),
        Line::from("  ]           Set end date"),
        Line::from("  c           Clear range"),
        Line::from("  Enter/Esc   Apply/cancel while typing"),
        Line::from(""),
        section(" General"),
        Line::from("  e           Export CSV (metrics.csv)"),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
