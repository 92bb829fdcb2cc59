//! Dashboard comments panel component
//!
//! Renders notices, the comment list, the count selector and the compose box

use super::super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap};

pub fn render_comments_panel(f: &mut Frame, area: Rect, state: &DashboardState) {
    let panel = &state.panel;
    let compose_height = if state.compose.is_some() { 3 } else { 0 };
    let notice_height = (panel.notices.len() + usize::from(panel.fallback.is_some())) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(notice_height),
            Constraint::Fill(1),
            Constraint::Length(compose_height),
        ])
        .split(area);

    let mut notice_lines: Vec<Line> = panel
        .notices
        .iter()
        .map(|n| Line::from(Span::styled(n.clone(), Style::default().fg(Color::LightYellow))))
        .collect();
    if let Some(fallback) = &panel.fallback {
        notice_lines.push(Line::from(Span::styled(
            fallback.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }
    f.render_widget(Paragraph::new(notice_lines).wrap(Wrap { trim: true }), chunks[0]);

    let choices: Vec<String> = panel
        .selector
        .options()
        .iter()
        .map(|&n| {
            if n == panel.selector.value() {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    let block = Block::default()
        .title(format!("COMMENTS {}", choices.join(" ")))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    if !panel.panel_visible {
        // Logged out: the panel stays hidden behind the notice above.
        f.render_widget(
            Paragraph::new("Comments are hidden.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[1],
        );
    } else if panel.comments.is_empty() {
        f.render_widget(
            Paragraph::new("No comments yet. Press [N] to write one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem> = panel
            .comments
            .iter()
            .map(|item| {
                let mut header = vec![Span::styled(
                    item.header.clone(),
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                )];
                if item.deletable {
                    header.push(Span::styled("  [delete]", Style::default().fg(Color::Red)));
                }
                ListItem::new(vec![
                    Line::from(header),
                    Line::from(item.content.clone()),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Rgb(40, 48, 56)))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(panel.selected));
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    if let Some(buffer) = &state.compose {
        let compose = Paragraph::new(format!("{}_", buffer)).block(
            Block::default()
                .title("NEW COMMENT")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::LightGreen)),
        );
        f.render_widget(compose, chunks[2]);
    }
}
