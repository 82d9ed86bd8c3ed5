mod app;
mod config;
mod error;
mod export;
mod frames;
mod upload;
mod utils;

use anyhow::{anyhow, Context, Result};
use app::{HappyFrames, SessionState};
use config::AppConfig;
use export::ExportPipeline;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use upload::{ExtractionClient, UploadOrchestrator};

fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log.level);

    info!(service = %config.service.url, "Starting Jolly Audience");

    // upload tasks run here; the UI thread only drains their messages
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let client = ExtractionClient::new(&config.service).context("Failed to build HTTP client")?;
    let orchestrator = UploadOrchestrator::new(Arc::new(client), runtime.handle().clone());
    let session = SessionState::new(orchestrator);
    let pipeline = ExportPipeline::new(config.export.clone());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Jolly Audience",
        options,
        Box::new(move |cc: &eframe::CreationContext<'_>| {
            Box::new(HappyFrames::new(cc, session, pipeline))
        }),
    )
    .map_err(|e| anyhow!("UI terminated with error: {}", e))?;

    drop(runtime);
    Ok(())
}

fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}
