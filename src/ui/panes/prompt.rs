//! Modal prompt rendering, used for `lire` answers and jump targets

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Centered rectangle of `width` columns and `height` rows inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

/// Draw a one-line input box over whatever is already rendered.
pub fn render_prompt(frame: &mut Frame, title: &str, label: &str, buffer: &str) {
    let area = centered(frame.area(), 60, 4);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD),
        );

    let lines = vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(DEFAULT_THEME.comment),
        )),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(buffer.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
            Span::styled("█", Style::default().fg(DEFAULT_THEME.secondary)),
        ]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
