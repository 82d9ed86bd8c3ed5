mod extraction_client;
mod orchestrator;
mod types;

pub use extraction_client::{ExtractionClient, FrameSource};
pub use orchestrator::UploadOrchestrator;
pub use types::{ProgressSink, Transition, UploadState, VideoAsset};
