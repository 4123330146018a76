//! Variables pane rendering
//!
//! One row per variable in declaration order: name, type, current value and
//! flags (`C` constant, `T` traced). The selected row is the target of the
//! trace toggle key.

use crate::ui::theme::DEFAULT_THEME;
use crate::variables::store::Variable;
use crate::variables::value::Value;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Display form of a value in the table: strings and characters quoted
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("\"{}\"", s),
        Value::Char(c) => format!("'{}'", c.escape_default()),
        other => other.to_string(),
    }
}

pub fn render_variables_pane<'a>(
    frame: &mut Frame,
    area: Rect,
    variables: impl Iterator<Item = &'a Variable>,
    selected: usize,
    is_focused: bool,
) {
    let block = super::pane_block(" Variables ", is_focused);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let first = selected.saturating_sub(visible_height.saturating_sub(1));

    let lines: Vec<Line> = variables
        .enumerate()
        .skip(first)
        .take(visible_height)
        .map(|(idx, var)| {
            let flags = match (var.is_constant(), var.is_traced()) {
                (true, _) => " C ",
                (false, true) => " T ",
                (false, false) => "   ",
            };
            let name_style = if var.is_traced() {
                Style::default()
                    .fg(DEFAULT_THEME.traced)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };

            let mut line = Line::from(vec![
                Span::styled(flags, Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(var.name().to_string(), name_style),
                Span::styled(
                    format!(" : {}", var.var_type()),
                    Style::default().fg(DEFAULT_THEME.type_name),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    format_value(var.value()),
                    Style::default().fg(DEFAULT_THEME.number),
                ),
            ]);
            if is_focused && idx == selected {
                line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
            }
            line
        })
        .collect();

    let paragraph = if lines.is_empty() {
        Paragraph::new("(no variables)").style(Style::default().fg(DEFAULT_THEME.comment))
    } else {
        Paragraph::new(lines)
    };
    frame.render_widget(paragraph.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_quoted_by_type() {
        assert_eq!(format_value(&Value::Str("a b".into())), "\"a b\"");
        assert_eq!(format_value(&Value::Char('\0')), "'\\u{0}'");
        assert_eq!(format_value(&Value::Real(2.0)), "2.0");
        assert_eq!(format_value(&Value::Bool(true)), "vrai");
    }
}
