//! Footer view-model — what the input bar shows, independent of any renderer.

use crate::events::{FooterEvent, PipelineState};
use crate::i18n::Translator;
use crate::types::AiState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub collapsed: bool,
    pub mic_on: bool,
    pub ai_state: AiState,
    pub pipeline: PipelineState,
    pub placeholder: String,
}

impl FooterView {
    pub fn new(labels: &dyn Translator) -> Self {
        Self {
            collapsed: false,
            mic_on: false,
            ai_state: AiState::Idle,
            pipeline: PipelineState::Idle,
            placeholder: labels.translate("footer.typeYourMessage"),
        }
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn toggle_mic(&mut self) {
        self.mic_on = !self.mic_on;
        self.ai_state = if self.mic_on {
            AiState::Listening
        } else {
            AiState::Idle
        };
    }

    pub fn interrupt(&mut self) {
        self.ai_state = AiState::Interrupted;
    }

    /// An attach is in flight; a second picker must not be opened.
    pub fn is_attaching(&self) -> bool {
        self.pipeline != PipelineState::Idle
    }

    pub fn apply(&mut self, event: &FooterEvent) {
        if let FooterEvent::Pipeline(status) = event {
            self.pipeline = status.state;
            self.ai_state = match status.state {
                PipelineState::Reading => AiState::Loading,
                PipelineState::Dispatched => AiState::Waiting,
                _ if self.ai_state == AiState::Loading => AiState::Idle,
                _ => self.ai_state,
            };
        }
    }
}
