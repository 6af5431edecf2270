//! Scrollable conversation feed.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use companion_core::history::Role;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Conversation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = app.history.entries();
    if entries.is_empty() {
        let empty = Paragraph::new("Say something...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    // Bottom-up with scroll offset
    let visible_height = inner.height as usize;
    let total = entries.len();
    let end = total.saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(visible_height * 2); // overshoot for wrapping

    let mut lines: Vec<Line> = Vec::new();
    for entry in &entries[start..end] {
        let (fg, prefix) = match entry.role {
            Role::Human => (Color::Yellow, "< "),
            Role::Ai => (Color::Green, "> "),
            Role::System => (Color::DarkGray, "  "),
        };
        for line in entry.content.lines() {
            lines.push(Line::styled(
                format!("{}{}", prefix, line),
                Style::default().fg(fg),
            ));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
