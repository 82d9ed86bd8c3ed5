use super::{ExportStatus, HappyFrames};
use crate::upload::UploadState;
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align, Color32, RichText};
use std::path::PathBuf;

const ACCENT: Color32 = Color32::from_rgb(245, 166, 35);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
const THUMB_SIZE: f32 = 160.0;

/// User intents collected during a frame and applied once rendering is done.
enum Action {
    PickVideo,
    Upload,
    Toggle(usize),
    Preview(usize),
    DismissPreview,
    SelectAll,
    ClearSelection,
    Export,
    OpenFolder(PathBuf),
}

impl HappyFrames {
    pub fn render(&mut self, ctx: &egui::Context) {
        // cheap clone: frames are shared behind an Arc
        let frames = self.session.frames().cloned();
        let has_frames = frames.as_ref().is_some_and(|frames| !frames.is_empty());
        let thumbs: Vec<Option<egui::TextureHandle>> = frames
            .iter()
            .flat_map(|frames| frames.iter())
            .map(|frame| self.texture(ctx, frame.index))
            .collect();
        let preview = self
            .session
            .preview()
            .map(|index| (index, thumbs.get(index).cloned().flatten()));

        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Jolly Audience");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Pull the happiest moments out of a video")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_picker(ui, &mut actions);
                ui.add_space(20.0);
                self.render_upload_status(ui);

                if has_frames {
                    ui.add_space(20.0);
                    self.render_frames(ui, &thumbs, &mut actions);
                } else if matches!(self.session.upload_state(), UploadState::Succeeded { .. }) {
                    ui.add_space(20.0);
                    ui.label("No happy faces found in this video.");
                }

                ui.add_space(10.0);
                self.render_export_status(ui, &mut actions);

                if let Some(error) = &self.error_message {
                    ui.add_space(5.0);
                    ui.vertical_centered(|ui| {
                        ui.colored_label(ERROR, error);
                    });
                }
                ui.add_space(20.0);
            });
        });

        if let Some((index, texture)) = preview {
            self.render_preview(ctx, index, texture, &mut actions);
        }

        self.apply(actions);
    }

    fn render_picker(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📁 Select Video").clicked() {
                    actions.push(Action::PickVideo);
                }
                if let Some(asset) = &self.session.asset {
                    ui.label(format!(
                        "{} ({})",
                        asset.name,
                        FileSizeUtils::format_size(asset.byte_size)
                    ));
                }
            });
        });

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.session.can_submit(), |ui| {
                let button =
                    egui::Button::new("😊 Extract happy frames").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    actions.push(Action::Upload);
                }
            });
        });
    }

    fn render_upload_status(&self, ui: &mut egui::Ui) {
        match self.session.upload_state() {
            UploadState::Idle | UploadState::Succeeded { .. } => {}
            UploadState::Uploading { percent } if *percent < 100 => {
                ui.group(|ui| {
                    ui.label("📤 Uploading...");
                    let progress_bar = egui::ProgressBar::new(f32::from(*percent) / 100.0)
                        .show_percentage()
                        .animate(false)
                        .fill(ACCENT);
                    ui.add(progress_bar);
                });
            }
            UploadState::Uploading { .. } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Processing...");
                });
            }
            UploadState::Failed { reason } => {
                ui.colored_label(ERROR, format!("❌ Extraction failed: {}", reason));
            }
        }
    }

    fn render_frames(
        &self,
        ui: &mut egui::Ui,
        thumbs: &[Option<egui::TextureHandle>],
        actions: &mut Vec<Action>,
    ) {
        let selection = self.session.selection();

        ui.horizontal(|ui| {
            ui.heading(format!("Happy Faces: {}", thumbs.len()));
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                ui.add_enabled_ui(!selection.is_empty(), |ui| {
                    if ui
                        .button(format!("📦 Download selected ({})", selection.len()))
                        .clicked()
                    {
                        actions.push(Action::Export);
                    }
                });
                if ui.button("Clear").clicked() {
                    actions.push(Action::ClearSelection);
                }
                if ui.button("Select all").clicked() {
                    actions.push(Action::SelectAll);
                }
            });
        });

        ui.add_space(10.0);
        ui.horizontal_wrapped(|ui| {
            for (index, thumb) in thumbs.iter().enumerate() {
                ui.vertical(|ui| {
                    let response = match thumb {
                        Some(texture) => ui.add(
                            egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                                .max_size(egui::vec2(THUMB_SIZE, THUMB_SIZE))
                                .sense(egui::Sense::click()),
                        ),
                        None => ui.add_sized(
                            [THUMB_SIZE, THUMB_SIZE],
                            egui::Label::new(RichText::new("⚠ unreadable").color(ERROR)),
                        ),
                    };
                    if response.on_hover_text("Click to enlarge").clicked() {
                        actions.push(Action::Preview(index));
                    }

                    let mut selected = selection.contains(index);
                    if ui
                        .checkbox(&mut selected, format!("Frame {}", index))
                        .changed()
                    {
                        actions.push(Action::Toggle(index));
                    }
                });
            }
        });
    }

    fn render_export_status(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        match self.session.export_status() {
            ExportStatus::Idle => {}
            ExportStatus::Cancelled => {
                ui.label("Download cancelled.");
            }
            ExportStatus::Saved { path, entries } => {
                ui.horizontal(|ui| {
                    ui.label(format!("✅ Saved {} images to {}", entries, path.display()));
                    if let Some(dir) = path.parent() {
                        if ui.button("Open folder").clicked() {
                            actions.push(Action::OpenFolder(dir.to_path_buf()));
                        }
                    }
                });
            }
            ExportStatus::Failed { reason } => {
                ui.colored_label(ERROR, format!("❌ Download failed: {}", reason));
            }
        }
    }

    fn render_preview(
        &self,
        ctx: &egui::Context,
        index: usize,
        texture: Option<egui::TextureHandle>,
        actions: &mut Vec<Action>,
    ) {
        let mut open = true;
        egui::Window::new(format!("Frame {}", index))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .show(ctx, |ui| match &texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                            .max_size(ui.available_size()),
                    );
                }
                None => {
                    ui.colored_label(ERROR, "This frame could not be decoded.");
                }
            });

        if !open {
            actions.push(Action::DismissPreview);
        }
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::PickVideo => self.pick_video(),
                Action::Upload => self.start_upload(),
                Action::Toggle(index) => self.session.toggle(index),
                Action::Preview(index) => self.session.show_preview(index),
                Action::DismissPreview => self.session.dismiss_preview(),
                Action::SelectAll => self.session.select_all(),
                Action::ClearSelection => self.session.clear_selection(),
                Action::Export => self.export_selected(),
                Action::OpenFolder(dir) => {
                    if let Err(e) = open::that(&dir) {
                        self.error_message = Some(format!("Could not open {}: {}", dir.display(), e));
                    }
                }
            }
        }
    }
}
