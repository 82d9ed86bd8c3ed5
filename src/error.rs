//! Error types for the upload and export paths.

use thiserror::Error;

/// Why an upload attempt ended in `Failed`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("timeout")]
    Timeout,

    #[error("{reason} ({code})")]
    Status { code: u16, reason: String },

    #[error("Failed to parse extraction response: {0}")]
    Parse(String),

    #[error("Failed to read video: {0}")]
    Asset(String),
}

impl UploadError {
    /// Text shown to the user in the failed state.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UploadError::Timeout
        } else if err.is_decode() {
            UploadError::Parse(err.to_string())
        } else {
            UploadError::Network(err.to_string())
        }
    }
}

/// Failures while building or saving an archive.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Frame {index} is not valid base64: {source}")]
    Decode {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to write archive: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reason_carries_code_and_text() {
        let err = UploadError::Status {
            code: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(err.reason(), "Internal Server Error (500)");
    }

    #[test]
    fn timeout_reason_is_plain() {
        assert_eq!(UploadError::Timeout.reason(), "timeout");
    }
}
