//! Dashboard footer component
//!
//! Renders the key bindings, or the compose hints while writing a comment

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::super::state::DashboardState;

/// Render footer with the key bindings for the current mode.
pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let footer_text = if state.compose.is_some() {
        "[Enter] Post | [Esc] Cancel"
    } else {
        "[R] Refresh | [+/-] Count | [Up/Down] Select | [D] Delete | [Shift+D] Delete All | [N] New | [Q] Quit"
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
