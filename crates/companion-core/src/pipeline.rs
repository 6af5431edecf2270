//! Attachment pipeline — picker → aggregator → dispatcher, one invocation at a time.
//!
//! Each run walks `Idle → Picking → Reading → {Dispatched | NotifiedNoChannel |
//! Failed} → Idle` and broadcasts every transition as a [`FooterEvent`]. A
//! selection the picker refuses goes `Picking → Failed` without reading.
//! Nothing is carried over between runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::events::{FooterEvent, PipelineState, PipelineStatus};
use crate::picker::{AcceptFilter, FilePicker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The user picked nothing.
    Cancelled,
    Dispatched,
    NotifiedNoChannel,
    SendFailed,
    Failed,
}

pub struct AttachmentPipeline {
    accept: AcceptFilter,
    read_timeout: Option<Duration>,
    dispatcher: Arc<Dispatcher>,
    event_tx: broadcast::Sender<FooterEvent>,
}

impl AttachmentPipeline {
    pub fn new(
        config: &Config,
        dispatcher: Arc<Dispatcher>,
        event_tx: broadcast::Sender<FooterEvent>,
    ) -> Self {
        Self {
            accept: config.accept_filter(),
            read_timeout: config.read_timeout(),
            dispatcher,
            event_tx,
        }
    }

    pub fn accept(&self) -> &AcceptFilter {
        &self.accept
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FooterEvent> {
        self.event_tx.subscribe()
    }

    /// Attach-button entry point: run in the background, result not awaited.
    pub fn trigger<P>(self: &Arc<Self>, picker: P) -> JoinHandle<PipelineOutcome>
    where
        P: FilePicker + Send + 'static,
    {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.run(picker).await })
    }

    pub async fn run<P: FilePicker>(&self, picker: P) -> PipelineOutcome {
        let invocation = Uuid::new_v4().to_string();

        self.set_state(&invocation, PipelineState::Picking);
        let files = match picker.pick(&self.accept).await {
            Ok(files) => files,
            Err(e) => {
                self.dispatcher.report_failure(&e);
                self.set_state(&invocation, PipelineState::Failed);
                self.set_state(&invocation, PipelineState::Idle);
                return PipelineOutcome::Failed;
            }
        };
        if files.is_empty() {
            info!("[{}] No files selected", invocation);
            self.set_state(&invocation, PipelineState::Idle);
            return PipelineOutcome::Cancelled;
        }

        info!("[{}] Selected {} file(s)", invocation, files.len());
        self.set_state(&invocation, PipelineState::Reading);

        let (outcome, terminal) = match aggregate(files, self.read_timeout).await {
            Ok(batch) => {
                info!("[{}] Processed {} file(s)", invocation, batch.len());
                match self.dispatcher.dispatch(batch) {
                    DispatchOutcome::Dispatched => {
                        (PipelineOutcome::Dispatched, PipelineState::Dispatched)
                    }
                    DispatchOutcome::SendFailed => {
                        (PipelineOutcome::SendFailed, PipelineState::Dispatched)
                    }
                    DispatchOutcome::NotifiedNoChannel => (
                        PipelineOutcome::NotifiedNoChannel,
                        PipelineState::NotifiedNoChannel,
                    ),
                }
            }
            Err(e) => {
                self.dispatcher.report_failure(&e);
                (PipelineOutcome::Failed, PipelineState::Failed)
            }
        };

        self.set_state(&invocation, terminal);
        self.set_state(&invocation, PipelineState::Idle);
        outcome
    }

    fn set_state(&self, invocation: &str, state: PipelineState) {
        let _ = self.event_tx.send(FooterEvent::Pipeline(PipelineStatus {
            invocation: invocation.to_string(),
            state,
        }));
    }
}
