//! TUI pane rendering modules
//!
//! Every pane is a stateless render function fed from the engine's query
//! surface.
//!
//! # Pane Modules
//!
//! - [`source`]: window of source lines with keyword highlighting and the cursor
//! - [`variables`]: the variable table with trace flags
//! - [`history`]: frozen snapshots of traced variables
//! - [`console`]: the execution log (`ecrire` output, `lire` answers, errors)
//! - [`status`]: status bar with keybindings and execution state
//! - [`prompt`]: modal boxes for `lire` answers and jump targets

pub mod console;
pub mod history;
pub mod prompt;
pub mod source;
pub mod status;
pub mod variables;

pub use console::render_console_pane;
pub use history::render_history_pane;
pub use prompt::render_prompt;
pub use source::{render_source_pane, CursorMark};
pub use status::{render_status_bar, StatusRenderData};
pub use variables::render_variables_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block whose border shows focus
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp a scroll offset so the last page stays full
pub(crate) fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}
