//! TUI layout compositing — conversation above, footer below.

mod chat;
mod footer;
mod notice;
mod status;

use ratatui::prelude::*;

use crate::app::App;

/// Render the full TUI layout.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // ┌──────────────────────────────────┐
    // │ Conversation                     │
    // │                                  │
    // ├──────────────────────────────────┤
    // │ ▼                                │
    // │ state    │ 📎 composer           │
    // │ mic hand │                       │
    // └──────────────────────────────────┘

    let footer_height = if app.footer.collapsed { 1 } else { 6 };
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),                // conversation
            Constraint::Length(footer_height), // footer
        ])
        .split(area);

    chat::draw(frame, app, main_layout[0]);
    footer::draw(frame, app, main_layout[1]);

    if let Some(text) = &app.notice {
        notice::draw(frame, text, area);
    }
}
