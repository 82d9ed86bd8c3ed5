use crate::config::ServiceConfig;
use crate::error::UploadError;
use crate::upload::types::{ProgressSink, VideoAsset};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Anything that turns a video into an ordered list of base64 JPEG payloads.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn extract(
        &self,
        asset: &VideoAsset,
        progress: ProgressSink,
    ) -> Result<Vec<String>, UploadError>;
}

#[derive(Deserialize)]
struct ExtractionResponse {
    happy_frames: Vec<String>,
}

/// HTTP client for the extraction service.
#[derive(Clone)]
pub struct ExtractionClient {
    client: reqwest::Client,
    url: String,
    chunk_bytes: usize,
}

impl ExtractionClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            chunk_bytes: config.upload_chunk_bytes.max(1),
        })
    }

    /// Body that reports progress as the transport pulls each chunk.
    fn progress_body(&self, data: Bytes, progress: ProgressSink) -> Body {
        Body::wrap_stream(chunked(data, self.chunk_bytes, progress))
    }
}

/// Splits `data` into views of at most `chunk_bytes`, reporting cumulative
/// progress as each one is yielded. The views share `data`'s buffer.
fn chunked(
    data: Bytes,
    chunk_bytes: usize,
    progress: ProgressSink,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static {
    let total = data.len();
    let chunk_bytes = chunk_bytes.max(1);
    futures::stream::iter((0..total).step_by(chunk_bytes).map(move |start| {
        let end = (start + chunk_bytes).min(total);
        progress.report(end as u64, total as u64);
        Ok(data.slice(start..end))
    }))
}

#[async_trait]
impl FrameSource for ExtractionClient {
    async fn extract(
        &self,
        asset: &VideoAsset,
        progress: ProgressSink,
    ) -> Result<Vec<String>, UploadError> {
        let data = Bytes::from(
            tokio::fs::read(&asset.path)
                .await
                .map_err(|e| UploadError::Asset(e.to_string()))?,
        );
        let length = data.len() as u64;

        info!(file = %asset.name, bytes = length, url = %self.url, "Uploading video");

        let part = Part::stream_with_length(self.progress_body(data, progress), length)
            .file_name(asset.name.clone())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("video", part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Extraction request failed");
                UploadError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string();
            warn!(status = status.as_u16(), %reason, "Extraction service rejected upload");
            return Err(UploadError::Status {
                code: status.as_u16(),
                reason,
            });
        }

        let body = response.bytes().await?;
        let parsed: ExtractionResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Extraction response did not parse");
            UploadError::Parse(e.to_string())
        })?;

        debug!(frames = parsed.happy_frames.len(), "Extraction response parsed");
        Ok(parsed.happy_frames)
    }
}
