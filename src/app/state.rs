use crate::export::{ArchiveSink, ExportOutcome, ExportPipeline};
use crate::frames::{FrameCollection, Preview, SelectionSet};
use crate::upload::{Transition, UploadOrchestrator, UploadState, VideoAsset};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportStatus {
    #[default]
    Idle,
    Saved {
        path: PathBuf,
        entries: usize,
    },
    Cancelled,
    Failed {
        reason: String,
    },
}

/// Everything the UI reads, updated only through the methods below.
pub struct SessionState {
    pub asset: Option<VideoAsset>,
    upload: UploadOrchestrator,
    selection: SelectionSet,
    preview: Preview,
    export: ExportStatus,
}

impl SessionState {
    pub fn new(upload: UploadOrchestrator) -> Self {
        Self {
            asset: None,
            upload,
            selection: SelectionSet::new(),
            preview: Preview::default(),
            export: ExportStatus::Idle,
        }
    }

    pub fn upload_state(&self) -> &UploadState {
        self.upload.state()
    }

    pub fn frames(&self) -> Option<&FrameCollection> {
        self.upload.state().frames()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn preview(&self) -> Option<usize> {
        self.preview.shown()
    }

    pub fn export_status(&self) -> &ExportStatus {
        &self.export
    }

    pub fn can_submit(&self) -> bool {
        self.asset.is_some()
    }

    pub fn choose_asset(&mut self, asset: VideoAsset) {
        info!(file = %asset.name, bytes = asset.byte_size, "Video selected");
        self.asset = Some(asset);
    }

    /// Starts an upload of the chosen asset, superseding any attempt in flight.
    pub fn submit(&mut self) -> Option<u64> {
        let asset = self.asset.clone()?;
        self.selection.reset();
        self.preview.dismiss();
        self.export = ExportStatus::Idle;
        Some(self.upload.submit(asset))
    }

    /// Drains upload messages. Returns true if anything visible changed.
    pub fn poll(&mut self) -> bool {
        let transitions = self.upload.poll();
        if transitions.contains(&Transition::Succeeded) {
            if let Some(frames) = self.upload.state().frames() {
                self.selection.scope_to(frames);
            }
            self.preview.dismiss();
        }
        transitions.iter().any(|t| *t != Transition::Stale && *t != Transition::Unchanged)
    }

    pub fn toggle(&mut self, index: usize) {
        self.selection.toggle(index);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn show_preview(&mut self, index: usize) {
        if self.frames().is_some_and(|frames| index < frames.len()) {
            self.preview.show(index);
        }
    }

    pub fn dismiss_preview(&mut self) {
        self.preview.dismiss();
    }

    /// Exports the current selection. Failures land in [`ExportStatus::Failed`].
    pub fn export(&mut self, pipeline: &ExportPipeline, sink: &dyn ArchiveSink) {
        let Some(frames) = self.upload.state().frames() else {
            return;
        };

        self.export = match pipeline.export(&self.selection, frames, sink) {
            Ok(ExportOutcome::NothingSelected) => return,
            Ok(ExportOutcome::Cancelled) => ExportStatus::Cancelled,
            Ok(ExportOutcome::Saved { path, entries }) => ExportStatus::Saved { path, entries },
            Err(e) => {
                error!(error = %e, "Export failed");
                ExportStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
    }
}
