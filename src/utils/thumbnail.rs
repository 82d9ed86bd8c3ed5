use crate::frames::Frame;
use eframe::egui::ColorImage;

/// Decodes a frame's JPEG payload into an egui image.
///
/// Returns a description of the problem for payloads that are not valid
/// base64 or not a decodable image; the grid shows a placeholder instead.
pub fn decode_frame(frame: &Frame) -> Result<ColorImage, String> {
    let bytes = frame.decode().map_err(|e| e.to_string())?;
    let rgba = image::load_from_memory(&bytes)
        .map_err(|e| {
            format!(
                "Frame {} is not a readable {}: {}",
                frame.index, frame.mime_type, e
            )
        })?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];

    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
