use crate::error::UploadError;
use crate::frames::FrameCollection;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// A video file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    pub name: String,
    pub byte_size: u64,
    pub path: PathBuf,
}

impl VideoAsset {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            name,
            byte_size: metadata.len(),
            path: path.to_path_buf(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading {
        percent: u8,
    },
    Succeeded {
        frames: FrameCollection,
    },
    Failed {
        reason: String,
    },
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }

    pub fn frames(&self) -> Option<&FrameCollection> {
        match self {
            UploadState::Succeeded { frames } => Some(frames),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum AttemptEvent {
    Progress(u8),
    Finished(Result<Vec<String>, UploadError>),
}

/// An event tagged with the epoch of the attempt that produced it.
#[derive(Debug)]
pub struct AttemptMessage {
    pub epoch: u64,
    pub event: AttemptEvent,
}

/// What applying a message did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stale,
    Progressed,
    Unchanged,
    Succeeded,
    Failed,
}

/// Handed to a frame source so it can report upload progress for one attempt.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    epoch: u64,
    sender: Sender<AttemptMessage>,
}

impl ProgressSink {
    pub fn new(epoch: u64, sender: Sender<AttemptMessage>) -> Self {
        Self { epoch, sender }
    }

    /// Reports `sent` of `total` bytes. Nothing is reported when `total` is 0.
    pub fn report(&self, sent: u64, total: u64) {
        if total == 0 {
            return;
        }
        let percent = ((sent.min(total) as f64 / total as f64) * 100.0).round() as u8;
        let _ = self.sender.send(AttemptMessage {
            epoch: self.epoch,
            event: AttemptEvent::Progress(percent),
        });
    }

    pub(crate) fn finish(&self, result: Result<Vec<String>, UploadError>) {
        let _ = self.sender.send(AttemptMessage {
            epoch: self.epoch,
            event: AttemptEvent::Finished(result),
        });
    }
}
