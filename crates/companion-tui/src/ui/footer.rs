//! Footer — toggle chevron, status column, composer with attach hint.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use companion_core::i18n::Translator;

use super::status;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    if app.footer.collapsed {
        let line = Line::from(vec![
            Span::styled(" ▲ ", Style::default().fg(Color::DarkGray)),
            status::ai_state(app.footer.ai_state),
            Span::styled(" F4 to expand", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // status + actions
            Constraint::Min(20),    // composer
        ])
        .split(area);

    draw_controls(frame, app, columns[0]);
    draw_composer(frame, app, columns[1]);
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::styled(" ▼ F4", Style::default().fg(Color::DarkGray)),
        Line::from(vec![Span::raw(" "), status::ai_state(app.footer.ai_state)]),
        Line::raw(""),
        Line::from(vec![
            Span::raw(" "),
            status::mic(app.footer.mic_on),
            Span::raw(" "),
            status::hand(),
        ]),
        Line::styled(" F2   F3", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_composer(frame: &mut Frame, app: &App, area: Rect) {
    let picking = app.is_picking();
    let (title, border_color) = if picking {
        (format!(" {} ", app.pick_prompt()), Color::Yellow)
    } else if app.footer.is_attaching() {
        (
            format!(" {} ", app.labels.translate("footer.reading")),
            Color::Blue,
        )
    } else {
        (
            " 📎 Ctrl+O attach · Enter send · Alt+Enter newline ".to_string(),
            Color::Cyan,
        )
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let composer = if app.input.is_empty() && !picking {
        Paragraph::new(app.footer.placeholder.as_str())
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(app.input.as_str()).style(Style::default().fg(Color::White))
    };
    frame.render_widget(composer.wrap(Wrap { trim: false }), inner);

    // Cursor after the last character of the last line
    let last = app.input.rsplit('\n').next().unwrap_or("");
    let row = app.input.matches('\n').count() as u16;
    frame.set_cursor_position(Position::new(
        inner.x + (last.chars().count() as u16).min(inner.width.saturating_sub(1)),
        inner.y + row.min(inner.height.saturating_sub(1)),
    ));
}
