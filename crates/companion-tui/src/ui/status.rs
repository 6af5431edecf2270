//! AI state indicator and the mic / interrupt badges.

use ratatui::prelude::*;

use companion_core::types::AiState;

pub fn ai_state(state: AiState) -> Span<'static> {
    let color = match state {
        AiState::Idle => Color::DarkGray,
        AiState::ThinkingSpeaking => Color::Green,
        AiState::Interrupted => Color::Red,
        AiState::Loading => Color::Blue,
        AiState::Listening => Color::Cyan,
        AiState::Waiting => Color::Magenta,
    };
    Span::styled(
        format!(" {} ", state),
        Style::default().fg(Color::Black).bg(color),
    )
}

pub fn mic(on: bool) -> Span<'static> {
    let (label, bg) = if on {
        (" MIC ", Color::Green)
    } else {
        (" MUTE ", Color::Red)
    };
    Span::styled(label, Style::default().fg(Color::Black).bg(bg))
}

pub fn hand() -> Span<'static> {
    Span::styled(" ✋ ", Style::default().fg(Color::Black).bg(Color::Yellow))
}
