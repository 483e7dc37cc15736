//! The status panel body.
//!
//! Shows the raw status text next to the service indicators, with the demo
//! trend sparkline underneath.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline as SparklineWidget, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::{LivenessState, StubStatus};
use crate::display::RawStatusKind;
use crate::ui::Theme;

/// Render the raw status and indicator blocks side by side.
pub fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Min(24), Constraint::Length(30)]).split(area);
    render_raw(frame, app, chunks[0]);
    render_services(frame, app, chunks[1]);
}

fn block<'a>(theme: &Theme, title: &'a str) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, theme.title))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
}

/// Render the raw status text (or the fetch error).
pub fn render_raw(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let text = match state.raw_kind {
        RawStatusKind::Empty => "Waiting for first refresh...".to_string(),
        _ => state.raw_status.clone(),
    };

    let paragraph = Paragraph::new(text)
        .style(app.theme.raw_style(state.raw_kind))
        .wrap(Wrap { trim: false })
        .block(block(&app.theme, " Raw status "));
    frame.render_widget(paragraph, area);
}

fn indicator_line<'a>(theme: &Theme, label: &'a str, state: LivenessState) -> Line<'a> {
    Line::from(vec![
        Span::raw(format!("{:<9}", label)),
        Span::styled("● ", theme.liveness_style(state)),
        Span::styled(state.as_str(), theme.liveness_style(state)),
    ])
}

fn counter_line(label: &str, value: Option<u64>) -> Line<'static> {
    let value = value.map_or_else(|| "-".to_string(), |v| v.to_string());
    Line::from(vec![
        Span::styled(format!("{:<9}", label), Style::default().add_modifier(Modifier::DIM)),
        Span::raw(value),
    ])
}

fn connection_lines(connections: Option<StubStatus>) -> Vec<Line<'static>> {
    let Some(c) = connections else {
        return vec![Line::from(Span::styled(
            "no connection counters",
            Style::default().add_modifier(Modifier::DIM),
        ))];
    };

    vec![
        counter_line("Active", Some(c.active)),
        counter_line("Requests", c.requests),
        counter_line("Dropped", c.dropped()),
        Line::from(vec![
            Span::styled("R/W/W    ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(format!(
                "{}/{}/{}",
                c.reading.map_or_else(|| "-".to_string(), |v| v.to_string()),
                c.writing.map_or_else(|| "-".to_string(), |v| v.to_string()),
                c.waiting.map_or_else(|| "-".to_string(), |v| v.to_string()),
            )),
        ]),
    ]
}

/// Render the API/DB indicators, last update time and connection counters.
pub fn render_services(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let theme = &app.theme;

    let mut lines = vec![
        indicator_line(theme, "API", state.api_status),
        indicator_line(theme, "DB", state.db_status),
        Line::from(""),
        Line::from(vec![
            Span::styled("Updated  ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(state.updated_text()),
        ]),
        Line::from(""),
    ];
    lines.extend(connection_lines(state.connections));

    let paragraph = Paragraph::new(lines).block(block(theme, " Services "));
    frame.render_widget(paragraph, area);
}

/// Render the trend sparkline. The values are demo data.
pub fn render_trend(frame: &mut Frame, app: &App, area: Rect) {
    let trend_block = block(&app.theme, " Trend (demo data) ");

    let Some(ref sparkline) = app.state.sparkline else {
        let paragraph = Paragraph::new("no data")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(trend_block);
        frame.render_widget(paragraph, area);
        return;
    };

    let bars = sparkline.bars();
    let widget = SparklineWidget::default()
        .block(trend_block)
        .data(&bars)
        .max(crate::data::sparkline::MAX_VALUE as u64)
        .style(Style::default().fg(app.theme.sparkline));
    frame.render_widget(widget, area);
}
