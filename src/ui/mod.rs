//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`chart`]: CPU and memory lines with spike markers
//! - [`stats`]: Latest values, averages, maxima and spike info
//! - [`common`]: Shared components (header, range bar, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Time range (common::render_range)    │
//! ├──────────────────────────────────────┤
//! │ Stats panel (stats::render)          │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Chart (chart::render)                │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod chart;
pub mod common;
pub mod stats;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use theme::Theme;

use crate::app::App;

/// Draw one frame of the dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(stats::HEIGHT),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_range(frame, app, chunks[1]);
    stats::render(frame, app, chunks[2]);
    chart::render(frame, app, chunks[3]);
    common::render_status_bar(frame, app, chunks[4]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
