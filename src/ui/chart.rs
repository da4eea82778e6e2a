//! CPU/memory line chart with spike markers.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::view::ViewModel;

pub const CHART_TITLE: &str = " CPU and Memory Usage Over Time ";

/// Padding applied around a single-sample x axis, in seconds.
const SINGLE_POINT_PAD_SECS: f64 = 30.0;

/// Plot-ready points and axis bounds derived from a view model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub cpu: Vec<(f64, f64)>,
    pub memory: Vec<(f64, f64)>,
    pub spikes: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartData {
    /// Convert samples to `(unix seconds, value)` points.
    ///
    /// Non-finite values are skipped; the chart cannot place them.
    pub fn from_view(view: &ViewModel) -> Self {
        let point = |time: DateTime<Utc>, v: f64| {
            v.is_finite().then(|| (time.timestamp_millis() as f64 / 1000.0, v))
        };

        let cpu: Vec<_> = view.series.iter().filter_map(|s| point(s.time, s.cpu)).collect();
        let memory: Vec<_> = view.series.iter().filter_map(|s| point(s.time, s.memory)).collect();
        let spikes: Vec<_> = view.spikes.iter().filter_map(|s| point(s.time, s.cpu)).collect();

        let (x_min, x_max) = cpu
            .iter()
            .chain(memory.iter())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
                (lo.min(x), hi.max(x))
            });
        let x_bounds = if x_min > x_max {
            [0.0, 1.0]
        } else if x_min == x_max {
            [x_min - SINGLE_POINT_PAD_SECS, x_max + SINGLE_POINT_PAD_SECS]
        } else {
            [x_min, x_max]
        };

        let (y_min, y_max) = cpu
            .iter()
            .chain(memory.iter())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        Self {
            cpu,
            memory,
            spikes,
            x_bounds,
            y_bounds: [y_min, y_top],
        }
    }

    fn x_labels(&self) -> Vec<String> {
        let [lo, hi] = self.x_bounds;
        [lo, (lo + hi) / 2.0, hi]
            .iter()
            .map(|&secs| {
                DateTime::<Utc>::from_timestamp_millis((secs * 1000.0) as i64)
                    .map(|t| t.format("%m-%d %H:%M").to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    fn y_labels(&self) -> Vec<String> {
        let [lo, hi] = self.y_bounds;
        vec![format!("{:.1}", lo), format!("{:.1}", (lo + hi) / 2.0), format!("{:.1}", hi)]
    }
}

/// Render the chart, or an empty-state panel when there is nothing to plot.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(CHART_TITLE)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(view) = app.view.as_ref() else {
        let msg = if app.load_error.is_some() { "No data loaded" } else { "Loading..." };
        render_placeholder(frame, block, area, msg);
        return;
    };

    if view.is_empty() {
        render_placeholder(frame, block, area, "No samples in selected time range");
        return;
    }

    let data = ChartData::from_view(view);

    let datasets = vec![
        Dataset::default()
            .name("CPU")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.cpu))
            .data(&data.cpu),
        Dataset::default()
            .name("Memory")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.memory))
            .data(&data.memory),
        Dataset::default()
            .name("Spikes")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD))
            .data(&data.spikes),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Time", Style::default().add_modifier(Modifier::DIM)))
                .style(Style::default().fg(app.theme.border))
                .bounds(data.x_bounds)
                .labels(data.x_labels()),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Usage", Style::default().add_modifier(Modifier::DIM)))
                .style(Style::default().fg(app.theme.border))
                .bounds(data.y_bounds)
                .labels(data.y_labels()),
        );

    frame.render_widget(chart, area);
}

fn render_placeholder(frame: &mut Frame, block: Block, area: Rect, msg: &str) {
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(block);
    frame.render_widget(paragraph, area);
}
