//! Common UI components.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::LivenessState;

/// Overall indicator: worst of the two liveness states.
pub fn overall_state(api: LivenessState, db: LivenessState) -> LivenessState {
    match (api, db) {
        (LivenessState::Offline, _) | (_, LivenessState::Offline) => LivenessState::Offline,
        (LivenessState::Online, LivenessState::Online) => LivenessState::Online,
        _ => LivenessState::Unknown,
    }
}

/// Render the header bar.
///
/// Displays: overall indicator, API and DB states, active connections.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let overall = overall_state(state.api_status, state.db_status);

    let mut spans = vec![
        Span::styled(" ● ", app.theme.liveness_style(overall)),
        Span::styled("STATUS PANEL ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ api "),
        Span::styled(state.api_status.as_str(), app.theme.liveness_style(state.api_status)),
        Span::raw(" │ db "),
        Span::styled(state.db_status.as_str(), app.theme.liveness_style(state.db_status)),
    ];

    if let Some(connections) = state.connections {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            connections.active.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" active"));
    }

    if app.is_refreshing() {
        spans.push(Span::styled(
            " │ refreshing…",
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, last update, available controls, or a temporary message.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = format!(
        " {} | Updated {} | r:refresh e:export ?:help q:quit",
        app.source_description(),
        app.state.updated_text(),
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the panel.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.title)]),
        Line::from(""),
        Line::from("  r / F5    Refresh all signals"),
        Line::from("  e         Export to JSON + SVG"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "The trend chart shows demo data.",
            Style::default().add_modifier(Modifier::ITALIC),
        )]),
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

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 12u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_state() {
        use LivenessState::*;
        assert_eq!(overall_state(Online, Online), Online);
        assert_eq!(overall_state(Online, Offline), Offline);
        assert_eq!(overall_state(Unknown, Offline), Offline);
        assert_eq!(overall_state(Online, Unknown), Unknown);
        assert_eq!(overall_state(Unknown, Unknown), Unknown);
    }
}
