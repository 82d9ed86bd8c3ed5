use crate::frames::FrameCollection;
use crate::upload::extraction_client::FrameSource;
use crate::upload::types::{
    AttemptEvent, AttemptMessage, ProgressSink, Transition, UploadState, VideoAsset,
};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Drives one upload at a time against a [`FrameSource`].
///
/// A new `submit` supersedes any attempt still in flight. Every attempt gets a
/// fresh epoch and all of its messages carry it, so anything arriving from an
/// older attempt is dropped in [`UploadOrchestrator::apply`].
pub struct UploadOrchestrator {
    source: Arc<dyn FrameSource>,
    runtime: Handle,
    state: UploadState,
    epoch: u64,
    sender: Sender<AttemptMessage>,
    receiver: Receiver<AttemptMessage>,
}

impl UploadOrchestrator {
    pub fn new(source: Arc<dyn FrameSource>, runtime: Handle) -> Self {
        let (sender, receiver) = channel();
        Self {
            source,
            runtime,
            state: UploadState::Idle,
            epoch: 0,
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Starts a new attempt and returns its epoch.
    pub fn submit(&mut self, asset: VideoAsset) -> u64 {
        let progress = self.begin_attempt();
        let epoch = self.epoch;
        let source = Arc::clone(&self.source);

        info!(epoch, file = %asset.name, bytes = asset.byte_size, "Starting upload attempt");

        self.runtime.spawn(async move {
            let result = source.extract(&asset, progress.clone()).await;
            progress.finish(result);
        });

        epoch
    }

    /// Moves to `Uploading { percent: 0 }` under a new epoch.
    fn begin_attempt(&mut self) -> ProgressSink {
        if self.state.is_uploading() {
            debug!(superseded = self.epoch, "Superseding in-flight upload");
        }
        self.epoch += 1;
        self.state = UploadState::Uploading { percent: 0 };
        ProgressSink::new(self.epoch, self.sender.clone())
    }

    /// Applies every message received since the last poll, in arrival order.
    pub fn poll(&mut self) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            transitions.push(self.apply(message));
        }
        transitions
    }

    pub fn apply(&mut self, message: AttemptMessage) -> Transition {
        if message.epoch != self.epoch {
            debug!(epoch = message.epoch, current = self.epoch, "Dropping stale upload message");
            return Transition::Stale;
        }

        if !self.state.is_uploading() {
            // already resolved
            return Transition::Unchanged;
        }

        match message.event {
            AttemptEvent::Progress(reported) => match &mut self.state {
                UploadState::Uploading { percent } if reported.min(100) > *percent => {
                    *percent = reported.min(100);
                    Transition::Progressed
                }
                _ => Transition::Unchanged,
            },
            AttemptEvent::Finished(Ok(payloads)) => {
                let frames = FrameCollection::from_payloads(self.epoch, payloads);
                info!(epoch = self.epoch, frames = frames.len(), "Upload succeeded");
                self.state = UploadState::Succeeded { frames };
                Transition::Succeeded
            }
            AttemptEvent::Finished(Err(err)) => {
                warn!(epoch = self.epoch, error = %err, "Upload failed");
                self.state = UploadState::Failed {
                    reason: err.reason(),
                };
                Transition::Failed
            }
        }
    }
}
