use crate::error::ExportResult;
use rfd::FileDialog;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Where a finished archive goes.
pub trait ArchiveSink {
    /// Returns the written path, or `None` if the user backed out.
    fn save(&self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>>;
}

/// Native "save as" dialog pre-filled with the archive name.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaveDialogSink;

impl ArchiveSink for SaveDialogSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>> {
        let Some(path) = FileDialog::new()
            .set_file_name(file_name)
            .add_filter("Zip archive", &["zip"])
            .save_file()
        else {
            info!("Save dialog dismissed");
            return Ok(None);
        };

        fs::write(&path, bytes)?;
        Ok(Some(path))
    }
}

/// Writes straight into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArchiveSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>> {
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        Ok(Some(path))
    }
}
