use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::frames::FrameCollection;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub payload: Vec<u8>,
}

/// Named payloads in export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Builds one entry per index, in the order given. Entry names come from
    /// the position in this export, never from the frame index or the clock.
    pub fn from_frames(
        indices: &[usize],
        collection: &FrameCollection,
        naming: &ExportConfig,
    ) -> ExportResult<Self> {
        let mut entries = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(frame) = collection.get(*index) else {
                continue;
            };
            entries.push(ArchiveEntry {
                name: entry_name(naming, entries.len()),
                payload: frame.decode()?,
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes to a zip container. Entries are stored uncompressed with a
    /// fixed timestamp, so equal archives give equal bytes.
    pub fn to_zip(&self) -> ExportResult<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &self.entries {
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.payload)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

pub fn entry_name(naming: &ExportConfig, seq: usize) -> String {
    format!("{}{}.{}", naming.entry_prefix, seq, naming.entry_extension)
}
