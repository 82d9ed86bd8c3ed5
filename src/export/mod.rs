mod archive;
mod pipeline;
mod sink;

pub use pipeline::{ExportOutcome, ExportPipeline};
pub use sink::{ArchiveSink, DirectorySink, SaveDialogSink};
