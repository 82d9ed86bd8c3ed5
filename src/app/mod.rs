mod state;
mod ui;

use crate::export::ExportPipeline;
use crate::upload::VideoAsset;
use crate::utils::thumbnail;
use eframe::{egui, App};
use rfd::FileDialog;
use std::collections::HashMap;
pub use state::{ExportStatus, SessionState};
use tracing::warn;

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mov", "m4v", "avi", "mkv", "webm", "mpeg"];

/// Decoded thumbnails for the collection currently on screen.
#[derive(Default)]
struct FrameTextures {
    epoch: u64,
    textures: HashMap<usize, Option<egui::TextureHandle>>,
}

pub struct HappyFrames {
    session: SessionState,
    pipeline: ExportPipeline,
    textures: FrameTextures,
    error_message: Option<String>,
}

impl HappyFrames {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: SessionState, pipeline: ExportPipeline) -> Self {
        Self {
            session,
            pipeline,
            textures: FrameTextures::default(),
            error_message: None,
        }
    }

    pub fn pick_video(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Video", &VIDEO_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match VideoAsset::from_path(&path) {
            Ok(asset) => {
                self.error_message = None;
                self.session.choose_asset(asset);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read picked video");
                self.error_message = Some(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    pub fn start_upload(&mut self) {
        self.error_message = None;
        self.session.submit();
    }

    pub fn export_selected(&mut self) {
        let sink = self.pipeline.default_sink();
        self.session.export(&self.pipeline, sink.as_ref());
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.session.poll() {
            ctx.request_repaint();
        }
        // the worker has no handle on the context, so keep polling while it runs
        if self.session.upload_state().is_uploading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    /// Texture for a frame, decoding it on first use. `None` if the payload
    /// cannot be shown.
    fn texture(&mut self, ctx: &egui::Context, index: usize) -> Option<egui::TextureHandle> {
        let frames = self.session.frames()?;
        if self.textures.epoch != frames.epoch() {
            self.textures.textures.clear();
            self.textures.epoch = frames.epoch();
        }

        self.textures
            .textures
            .entry(index)
            .or_insert_with(|| {
                let frame = frames.get(index)?;
                match thumbnail::decode_frame(frame) {
                    Ok(image) => Some(ctx.load_texture(
                        format!("frame-{}-{}", frames.epoch(), index),
                        image,
                        egui::TextureOptions::LINEAR,
                    )),
                    Err(e) => {
                        warn!(index, error = %e, "Frame cannot be displayed");
                        None
                    }
                }
            })
            .clone()
    }
}

impl App for HappyFrames {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
