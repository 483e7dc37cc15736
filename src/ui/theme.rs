//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::LivenessState;
use crate::display::RawStatusKind;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for titles and transient messages.
    pub highlight: Color,
    /// Color for `online`.
    pub online: Color,
    /// Color for `offline` and fetch errors.
    pub offline: Color,
    /// Color for `unknown`.
    pub unknown: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color of the trend sparkline.
    pub sparkline: Color,
    /// Style for block titles.
    pub title: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            online: Color::Green,
            offline: Color::Red,
            unknown: Color::Yellow,
            border: Color::Gray,
            sparkline: Color::Green,
            title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            online: Color::Green,
            offline: Color::Red,
            unknown: Color::Magenta,
            border: Color::DarkGray,
            sparkline: Color::Green,
            title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
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

    /// Get style for a liveness indicator
    pub fn liveness_style(&self, state: LivenessState) -> Style {
        match state {
            LivenessState::Online => Style::default().fg(self.online),
            LivenessState::Offline => {
                Style::default().fg(self.offline).add_modifier(Modifier::BOLD)
            }
            LivenessState::Unknown => Style::default().fg(self.unknown),
        }
    }

    /// Get style for the raw status text
    pub fn raw_style(&self, kind: RawStatusKind) -> Style {
        match kind {
            RawStatusKind::Failed => Style::default().fg(self.offline),
            RawStatusKind::Empty => Style::default().add_modifier(Modifier::DIM),
            RawStatusKind::Fetched => Style::default(),
        }
    }
}
