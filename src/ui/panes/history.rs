//! Traced history pane rendering

use crate::trace::TracedSnapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// One row per frozen snapshot, newest last.
pub fn render_history_pane(
    frame: &mut Frame,
    area: Rect,
    history: &[TracedSnapshot],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = super::pane_block(" Traced history ", is_focused);

    if history.is_empty() {
        let paragraph = Paragraph::new("(no traced changes)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    super::clamp_scroll(scroll_offset, history.len(), visible_height);

    let lines: Vec<Line> = history
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|snap| {
            Line::from(vec![
                Span::styled(
                    format!("#{:<4} l.{:<4} ", snap.step, snap.line + 1),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    snap.variable.name().to_string(),
                    Style::default().fg(DEFAULT_THEME.traced),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    super::variables::format_value(snap.variable.value()),
                    Style::default().fg(DEFAULT_THEME.number),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
