use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::export::archive::Archive;
use crate::export::sink::{ArchiveSink, DirectorySink, SaveDialogSink};
use crate::frames::{FrameCollection, SelectionSet};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing was selected, so nothing was built or saved.
    NothingSelected,
    /// The sink declined to save (e.g. dialog cancelled).
    Cancelled,
    Saved { path: PathBuf, entries: usize },
}

/// Bundles selected frames into one archive and hands it to a sink.
#[derive(Debug, Clone, Default)]
pub struct ExportPipeline {
    naming: ExportConfig,
}

/// Selection and collection frozen at the moment export was triggered.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    indices: Vec<usize>,
    collection: FrameCollection,
}

impl ExportSnapshot {
    pub fn take(selection: &SelectionSet, collection: &FrameCollection) -> Self {
        Self {
            indices: selection.members().iter().copied().collect(),
            collection: collection.clone(),
        }
    }
}

impl ExportPipeline {
    pub fn new(naming: ExportConfig) -> Self {
        Self { naming }
    }

    /// Directory-backed sink when an output directory is configured,
    /// otherwise the save dialog.
    pub fn default_sink(&self) -> Box<dyn ArchiveSink> {
        match &self.naming.output_dir {
            Some(dir) => Box::new(DirectorySink::new(dir)),
            None => Box::new(SaveDialogSink),
        }
    }

    pub fn export(
        &self,
        selection: &SelectionSet,
        collection: &FrameCollection,
        sink: &dyn ArchiveSink,
    ) -> ExportResult<ExportOutcome> {
        self.export_snapshot(ExportSnapshot::take(selection, collection), sink)
    }

    pub fn export_snapshot(
        &self,
        snapshot: ExportSnapshot,
        sink: &dyn ArchiveSink,
    ) -> ExportResult<ExportOutcome> {
        if snapshot.indices.is_empty() {
            debug!("Export requested with empty selection");
            return Ok(ExportOutcome::NothingSelected);
        }

        let archive = match Archive::from_frames(&snapshot.indices, &snapshot.collection, &self.naming) {
            Ok(archive) => archive,
            Err(e) => {
                error!(error = %e, "Failed to build archive");
                return Err(e);
            }
        };
        // indices past the end of the collection contribute no entries
        if archive.is_empty() {
            debug!(selected = snapshot.indices.len(), "No selected frame is in the collection");
            return Ok(ExportOutcome::NothingSelected);
        }

        let entries = archive.len();
        let bytes = archive.to_zip().map_err(|e| {
            error!(error = %e, "Failed to serialize archive");
            e
        })?;

        match sink.save(&self.naming.archive_name, &bytes)? {
            Some(path) => {
                info!(entries, bytes = bytes.len(), path = %path.display(), "Archive saved");
                Ok(ExportOutcome::Saved { path, entries })
            }
            None => Ok(ExportOutcome::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use std::cell::RefCell;
    use std::io::{Cursor, Read};

    /// Records every save instead of touching the filesystem.
    #[derive(Default)]
    struct RecordingSink {
        saved: RefCell<Vec<(String, Vec<u8>)>>,
    }

    impl ArchiveSink for RecordingSink {
        fn save(&self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>> {
            self.saved
                .borrow_mut()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(Some(PathBuf::from(file_name)))
        }
    }

    struct DecliningSink;

    impl ArchiveSink for DecliningSink {
        fn save(&self, _file_name: &str, _bytes: &[u8]) -> ExportResult<Option<PathBuf>> {
            Ok(None)
        }
    }

    fn frame_bytes(i: usize) -> Vec<u8> {
        vec![0xFF, 0xD8, i as u8, 0xFF, 0xD9]
    }

    fn collection(n: usize) -> FrameCollection {
        FrameCollection::from_payloads(1, (0..n).map(|i| STANDARD.encode(frame_bytes(i))).collect())
    }

    fn select(collection: &FrameCollection, indices: &[usize]) -> SelectionSet {
        let mut selection = SelectionSet::new();
        selection.scope_to(collection);
        for index in indices {
            selection.toggle(*index);
        }
        selection
    }

    #[test]
    fn empty_selection_saves_nothing() {
        let frames = collection(3);
        let sink = RecordingSink::default();

        let outcome = ExportPipeline::default()
            .export(&SelectionSet::new(), &frames, &sink)
            .unwrap();

        assert_eq!(outcome, ExportOutcome::NothingSelected);
        assert!(sink.saved.borrow().is_empty());
    }

    #[test]
    fn selection_exported_in_ascending_index_order() {
        let frames = collection(6);
        let selection = select(&frames, &[2, 0, 5]);
        let sink = RecordingSink::default();

        let outcome = ExportPipeline::default().export(&selection, &frames, &sink).unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Saved {
                path: PathBuf::from("happy_images.zip"),
                entries: 3
            }
        );

        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "happy_images.zip");

        let mut zip = zip::ZipArchive::new(Cursor::new(saved[0].1.clone())).unwrap();
        assert_eq!(zip.len(), 3);
        for (seq, original) in [0usize, 2, 5].into_iter().enumerate() {
            let mut entry = zip.by_index(seq).unwrap();
            assert_eq!(entry.name(), format!("happy_image_{}.jpeg", seq));
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            assert_eq!(bytes, frame_bytes(original));
        }
    }

    #[test]
    fn repeated_exports_are_byte_identical() {
        let frames = collection(4);
        let selection = select(&frames, &[3, 1]);
        let sink = RecordingSink::default();
        let pipeline = ExportPipeline::default();

        pipeline.export(&selection, &frames, &sink).unwrap();
        pipeline.export(&selection, &frames, &sink).unwrap();

        let saved = sink.saved.borrow();
        assert_eq!(saved[0].1, saved[1].1);
    }

    #[test]
    fn snapshot_ignores_later_toggles() {
        let frames = collection(4);
        let mut selection = select(&frames, &[1]);
        let snapshot = ExportSnapshot::take(&selection, &frames);
        selection.toggle(2);
        selection.toggle(3);

        let sink = RecordingSink::default();
        let outcome = ExportPipeline::default().export_snapshot(snapshot, &sink).unwrap();
        assert!(matches!(outcome, ExportOutcome::Saved { entries: 1, .. }));
    }

    #[test]
    fn selection_outside_collection_saves_nothing() {
        let selection = select(&collection(4), &[3]);
        let sink = RecordingSink::default();

        let outcome = ExportPipeline::default()
            .export(&selection, &collection(2), &sink)
            .unwrap();

        assert_eq!(outcome, ExportOutcome::NothingSelected);
        assert!(sink.saved.borrow().is_empty());
    }

    #[test]
    fn declined_save_is_cancelled() {
        let frames = collection(2);
        let selection = select(&frames, &[0]);
        let outcome = ExportPipeline::default()
            .export(&selection, &frames, &DecliningSink)
            .unwrap();
        assert_eq!(outcome, ExportOutcome::Cancelled);
    }

    #[test]
    fn build_failure_is_reported() {
        let frames = FrameCollection::from_payloads(1, vec!["@@@@".to_string()]);
        let selection = select(&frames, &[0]);
        let sink = RecordingSink::default();

        assert!(ExportPipeline::default().export(&selection, &frames, &sink).is_err());
        assert!(sink.saved.borrow().is_empty());
    }

    #[test]
    fn configured_output_dir_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ExportPipeline::new(ExportConfig {
            output_dir: Some(dir.path().to_path_buf()),
            ..ExportConfig::default()
        });
        let frames = collection(1);
        let selection = select(&frames, &[0]);

        let outcome = pipeline
            .export(&selection, &frames, pipeline.default_sink().as_ref())
            .unwrap();

        assert!(matches!(outcome, ExportOutcome::Saved { entries: 1, .. }));
        assert!(dir.path().join("happy_images.zip").is_file());
    }

    #[test]
    fn writes_archive_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let frames = collection(2);
        let selection = select(&frames, &[0, 1]);

        let outcome = ExportPipeline::default()
            .export(&selection, &frames, &DirectorySink::new(dir.path()))
            .unwrap();

        let path = dir.path().join("happy_images.zip");
        assert_eq!(outcome, ExportOutcome::Saved { path: path.clone(), entries: 2 });
        assert!(path.is_file());
    }
}
