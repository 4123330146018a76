//! Console pane rendering: the execution log

use crate::trace::{EntryKind, TraceEntry};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the execution log. `scroll_offset` counts lines from the top;
/// `usize::MAX` pins the view to the newest entry.
pub fn render_console_pane(
    frame: &mut Frame,
    area: Rect,
    entries: &[&TraceEntry],
    dropped: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = if dropped > 0 {
        format!(" Console ({} older entries dropped) ", dropped)
    } else {
        " Console ".to_string()
    };
    let block = super::pane_block(&title, is_focused);

    if entries.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    super::clamp_scroll(scroll_offset, entries.len(), visible_height);

    let visible_items: Vec<ListItem> = entries
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|entry| {
            let color = match entry.kind {
                EntryKind::Output => DEFAULT_THEME.fg,
                EntryKind::Input => DEFAULT_THEME.secondary,
                EntryKind::Error => DEFAULT_THEME.error,
            };
            ListItem::new(entry.to_string()).style(Style::default().fg(color))
        })
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
