use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Extraction service connection
    pub service: ServiceConfig,
    /// Archive naming
    pub export: ExportConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Endpoint that accepts the multipart video upload
    #[serde(default = "default_service_url")]
    pub url: String,
    /// Whole-request timeout; unset means wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Size of each streamed body chunk, which is also the progress granularity
    #[serde(default = "default_upload_chunk_bytes")]
    pub upload_chunk_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    #[serde(default = "default_entry_prefix")]
    pub entry_prefix: String,
    #[serde(default = "default_entry_extension")]
    pub entry_extension: String,
    /// Save straight into this directory instead of asking with a dialog
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::with_defaults()?
            .add_source(config::File::with_name("happy_frames").required(false))
            // HAPPY_FRAMES__SERVICE__URL -> service.url
            .add_source(
                config::Environment::with_prefix("HAPPY_FRAMES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(Into::into)
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("service.url", default_service_url())?
            .set_default("service.upload_chunk_bytes", default_upload_chunk_bytes() as i64)?
            .set_default("export.archive_name", default_archive_name())?
            .set_default("export.entry_prefix", default_entry_prefix())?
            .set_default("export.entry_extension", default_entry_extension())?
            .set_default("log.level", default_log_level())
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            request_timeout_secs: None,
            upload_chunk_bytes: default_upload_chunk_bytes(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            archive_name: default_archive_name(),
            entry_prefix: default_entry_prefix(),
            entry_extension: default_entry_extension(),
            output_dir: None,
        }
    }
}

fn default_service_url() -> String {
    "http://localhost:5000/extract_happy_frames".to_string()
}

fn default_upload_chunk_bytes() -> usize {
    64 * 1024
}

fn default_archive_name() -> String {
    "happy_images.zip".to_string()
}

fn default_entry_prefix() -> String {
    "happy_image_".to_string()
}

fn default_entry_extension() -> String {
    "jpeg".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
