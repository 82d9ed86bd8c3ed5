use crate::error::{ExportError, ExportResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;

pub const JPEG_MIME: &str = "image/jpeg";

/// One still image as returned by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    /// Base64 text exactly as received; decoded lazily when rendered or exported
    pub payload: String,
    pub mime_type: &'static str,
}

impl Frame {
    pub fn decode(&self) -> ExportResult<Vec<u8>> {
        STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|source| ExportError::Decode {
                index: self.index,
                source,
            })
    }
}

/// Ordered frames of one successful upload.
///
/// Cloning is cheap: the frames are shared, so an export can hold a snapshot
/// while the UI keeps the live collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCollection {
    epoch: u64,
    frames: Arc<[Frame]>,
}

impl FrameCollection {
    /// Indices follow array order starting at 0. Payloads are not inspected.
    pub fn from_payloads(epoch: u64, payloads: Vec<String>) -> Self {
        let frames = payloads
            .into_iter()
            .enumerate()
            .map(|(index, payload)| Frame {
                index,
                payload,
                mime_type: JPEG_MIME,
            })
            .collect();

        Self { epoch, frames }
    }

    /// Upload attempt this collection came from.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_arrival_order() {
        let collection = FrameCollection::from_payloads(
            3,
            vec!["AAAA".to_string(), "BBBB".to_string(), "AAAA".to_string()],
        );

        assert_eq!(collection.epoch(), 3);
        assert_eq!(collection.len(), 3);
        let indices: Vec<usize> = collection.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        // duplicates are kept as-is
        assert_eq!(collection.get(0).unwrap().payload, collection.get(2).unwrap().payload);
        assert!(collection.iter().all(|f| f.mime_type == "image/jpeg"));
    }

    #[test]
    fn empty_collection_is_valid() {
        let collection = FrameCollection::from_payloads(1, Vec::new());
        assert!(collection.is_empty());
        assert!(collection.get(0).is_none());
    }

    #[test]
    fn malformed_payload_surfaces_on_decode() {
        let collection = FrameCollection::from_payloads(1, vec!["not base64!".to_string()]);
        let err = collection.get(0).unwrap().decode().unwrap_err();
        assert!(matches!(err, ExportError::Decode { index: 0, .. }));
    }

    #[test]
    fn decode_returns_original_bytes() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let collection = FrameCollection::from_payloads(1, vec![STANDARD.encode(&bytes)]);
        assert_eq!(collection.get(0).unwrap().decode().unwrap(), bytes);
    }
}
