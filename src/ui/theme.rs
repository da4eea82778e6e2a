//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::ColorLevel;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level values.
    pub warning: Color,
    /// Color for critical-level values and spike markers.
    pub critical: Color,
    /// Color for normal-level values.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// CPU line color.
    pub cpu: Color,
    /// Memory line color.
    pub memory: Color,
    /// Style for section titles.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            cpu: Color::Cyan,
            memory: Color::Magenta,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            cpu: Color::Blue,
            memory: Color::Magenta,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a color level
    pub fn level_style(&self, level: ColorLevel) -> Style {
        match level {
            ColorLevel::Normal => Style::default().fg(self.healthy),
            ColorLevel::Warning => Style::default().fg(self.warning),
            ColorLevel::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_styles_differ() {
        let theme = Theme::dark();
        assert_eq!(theme.level_style(ColorLevel::Normal).fg, Some(Color::Green));
        assert_eq!(theme.level_style(ColorLevel::Warning).fg, Some(Color::Yellow));
        let critical = theme.level_style(ColorLevel::Critical);
        assert_eq!(critical.fg, Some(Color::Red));
        assert!(critical.add_modifier.contains(Modifier::BOLD));
    }
}
