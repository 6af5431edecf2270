//! App state, input handling.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use companion_core::dispatch::Dispatcher;
use companion_core::events::FooterEvent;
use companion_core::footer::FooterView;
use companion_core::history::{ChatHistory, Role};
use companion_core::i18n::{fill, Labels, Translator};
use companion_core::picker::{self, parse_path_list, PickerHandle};
use companion_core::pipeline::{AttachmentPipeline, PipelineOutcome};

/// The main application state.
pub struct App {
    pub footer: FooterView,
    pub input: String,
    pub history: Arc<ChatHistory>,
    pub labels: Labels,
    pub notice: Option<String>,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pipeline: Arc<AttachmentPipeline>,
    dispatcher: Arc<Dispatcher>,
    picker: Option<PickerHandle>,
    /// Composer text set aside while the composer collects paths.
    stashed_draft: String,
    attach_task: Option<JoinHandle<PipelineOutcome>>,
}

impl App {
    pub fn new(
        labels: Labels,
        history: Arc<ChatHistory>,
        dispatcher: Arc<Dispatcher>,
        pipeline: Arc<AttachmentPipeline>,
    ) -> Self {
        App {
            footer: FooterView::new(&labels),
            input: String::new(),
            history,
            labels,
            notice: None,
            scroll_offset: 0,
            should_quit: false,
            pipeline,
            dispatcher,
            picker: None,
            stashed_draft: String::new(),
            attach_task: None,
        }
    }

    pub fn is_picking(&self) -> bool {
        self.picker.is_some()
    }

    /// Title shown on the composer while it collects paths.
    pub fn pick_prompt(&self) -> String {
        fill(
            &self.labels.translate("footer.pickFiles"),
            &[("accept", self.pipeline.accept().to_accept_string().as_str())],
        )
    }

    fn attach_in_flight(&self) -> bool {
        self.picker.is_some()
            || self.footer.is_attaching()
            || self
                .attach_task
                .as_ref()
                .is_some_and(|task| !task.is_finished())
    }

    /// Open the path prompt and start a pipeline run waiting on it.
    pub fn start_attach(&mut self) {
        if self.attach_in_flight() {
            return;
        }
        let (handle, picker) = picker::prompt();
        self.attach_task = Some(self.pipeline.trigger(picker));
        self.picker = Some(handle);
        self.stashed_draft = std::mem::take(&mut self.input);
    }

    /// Attach files given up front (command line).
    pub fn attach_paths(&mut self, paths: Vec<std::path::PathBuf>) {
        if paths.is_empty() || self.attach_in_flight() {
            return;
        }
        self.attach_task = Some(
            self.pipeline
                .trigger(picker::PathListPicker::new(paths)),
        );
    }

    pub fn cancel_attach(&mut self) {
        if let Some(handle) = self.picker.take() {
            handle.cancel();
            self.input = std::mem::take(&mut self.stashed_draft);
        }
    }

    /// Enter: submit paths while picking, otherwise send the draft.
    pub fn submit(&mut self) {
        if let Some(handle) = self.picker.take() {
            let paths = parse_path_list(&self.input);
            self.input = std::mem::take(&mut self.stashed_draft);
            info!("Submitting {} path(s) to the picker", paths.len());
            handle.submit(paths);
            return;
        }

        if self.input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        self.dispatcher.send_text(&text);
        self.scroll_offset = 0;
    }

    pub fn handle_event(&mut self, event: FooterEvent) {
        self.footer.apply(&event);
        if let FooterEvent::Notice(notice) = event {
            self.notice = Some(notice.render(&self.labels));
        }
        self.scroll_offset = 0;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn toggle_mic(&mut self) {
        self.footer.toggle_mic();
        info!("Mic {}", if self.footer.mic_on { "on" } else { "off" });
    }

    pub fn interrupt(&mut self) {
        self.footer.interrupt();
        self.history
            .append(Role::System, &self.labels.translate("footer.interrupted"));
    }

    pub fn toggle_collapsed(&mut self) {
        self.footer.toggle_collapsed();
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}
