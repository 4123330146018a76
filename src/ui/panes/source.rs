//! Source pane rendering with syntax highlighting
//!
//! Shows the window of lines around the cursor with basic highlighting of the
//! pseudocode keywords, types, literals and comments. The line under the
//! cursor is highlighted; it turns red when the engine is stuck on it and
//! orange while a `lire` on it waits for input.

use crate::text::fold_accents;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// How the cursor line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMark {
    Current,
    Halted,
    Input,
}

/// Simple syntax highlighting for pseudocode
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;
    let mut chars = line.char_indices().peekable();

    let push_word = |spans: &mut Vec<Span<'_>>, word: &str, next: Option<char>| {
        let style = get_keyword_style(word, next == Some('('));
        spans.push(Span::styled(word.to_string(), style));
    };

    while let Some((i, c)) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            word_start.get_or_insert(i);
            continue;
        }

        if let Some(start) = word_start.take() {
            push_word(&mut spans, &line[start..i], Some(c));
        }

        // Comments run to the end of the line
        if c == '/' && chars.peek().is_some_and(|(_, n)| *n == '/') {
            spans.push(Span::styled(
                line[i..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        if c == '"' || c == '\'' {
            let mut end = line.len();
            let mut escaped = false;
            for (j, d) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if d == '\\' {
                    escaped = true;
                } else if d == c {
                    end = j + d.len_utf8();
                    break;
                }
            }
            spans.push(Span::styled(
                line[i..end].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            continue;
        }

        let style = match c {
            '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
            '←' => Style::default().fg(DEFAULT_THEME.secondary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if let Some(start) = word_start {
        push_word(&mut spans, &line[start..], None);
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_call: bool) -> Style {
    if word.chars().all(|c| c.is_ascii_digit()) {
        return Style::default().fg(DEFAULT_THEME.number);
    }

    match fold_accents(word).as_str() {
        "si" | "alors" | "sinon" | "fsi" | "tant" | "que" | "faire" | "ftq" | "fin" | "debut"
        | "algorithme" | "variables" | "constantes" | "lexique" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "et" | "ou" | "non" | "div" | "mod" => Style::default().fg(DEFAULT_THEME.keyword),
        "entier" | "reel" | "chaine" | "booleen" | "caractere" => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        "vrai" | "vraie" | "faux" | "fausse" => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source pane from the numbered lines of the visible window
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    window: &[(usize, &str)],
    current_line: usize,
    mark: CursorMark,
    is_focused: bool,
) {
    let block = super::pane_block(" Source ", is_focused);

    let visible_lines: Vec<Line> = window
        .iter()
        .map(|(idx, line)| {
            let is_current = *idx == current_line;
            let line_num_str = format!("{:4} ", idx + 1);

            let (num_style, content_base_style) = match (is_current, mark) {
                (true, CursorMark::Halted) => (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                (true, CursorMark::Input) => (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.secondary)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                (true, CursorMark::Current) => (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                ),
                (false, _) => (Style::default().fg(DEFAULT_THEME.comment), Style::default()),
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                for span in &mut content_line.spans {
                    span.style = match mark {
                        CursorMark::Current => span.style.patch(content_base_style),
                        _ => content_base_style,
                    };
                }
            }

            let arrow = if is_current { "▶" } else { " " };
            let mut final_spans = vec![
                Span::styled(arrow, num_style),
                Span::styled(line_num_str, num_style),
            ];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        highlight_source_code(line)
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect()
    }

    #[test]
    fn spans_cover_the_whole_line() {
        let line = "si réel ≠ 2 alors // où ?";
        assert_eq!(texts(line).concat(), line);
        let line = "écrire(\"l'été\", x)";
        assert_eq!(texts(line).concat(), line);
    }

    #[test]
    fn keywords_and_calls() {
        assert_eq!(
            get_keyword_style("FSI", false),
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD)
        );
        assert_eq!(
            get_keyword_style("écrire", true),
            Style::default().fg(DEFAULT_THEME.function)
        );
        assert_eq!(
            get_keyword_style("réel", false),
            Style::default().fg(DEFAULT_THEME.type_name)
        );
    }
}
