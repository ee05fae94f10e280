//! Snapshot capture
//!
//! The booth itself never talks to a camera: an external collaborator (here,
//! the native file picker) supplies an already-captured still frame. This
//! module loads that file off the UI thread, validates that it decodes, and
//! records the source dimensions the live renderer needs for cover-fitting.
//! The encoded bytes are kept as-is and become the entity's immutable
//! payload.

use std::path::PathBuf;

use image::imageops::FilterType;
use thiserror::Error;
use tokio::task;

use crate::render::compositor;
use crate::state::entity::Preview;
use crate::state::style;

/// Longest edge of the live preview raster; twice the photo rectangle's
/// design width keeps previews crisp at any allowed zoom.
const PREVIEW_SCALE: u32 = 2;

/// A validated still frame, ready to become a photo entity
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Encoded raster bytes, exactly as read from the source
    pub payload: Vec<u8>,
    /// Decoded pixel width
    pub width: u32,
    /// Decoded pixel height
    pub height: u32,
    /// Cover-cropped raster for the live canvas
    pub preview: Preview,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("could not read snapshot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode snapshot: {0}")]
    Decode(#[from] image::ImageError),
    #[error("background task failed: {0}")]
    Task(String),
}

/// Load and validate a snapshot file.
///
/// Errors are flattened to strings at this boundary so they can travel
/// inside UI messages; the user retries by simply picking a file again.
pub async fn load_snapshot(path: PathBuf) -> Result<Snapshot, String> {
    load_snapshot_inner(path).await.map_err(|e| e.to_string())
}

async fn load_snapshot_inner(path: PathBuf) -> Result<Snapshot, CaptureError> {
    let payload = tokio::fs::read(&path).await?;

    // Decoding and preview generation are CPU-bound; keep them off the
    // async executor.
    task::spawn_blocking(move || {
        let decoded = image::load_from_memory(&payload)?;

        // Cover-crop to the photo rectangle's aspect once, here, so the
        // live canvas can stretch the preview with no further cropping.
        let (dst_w, dst_h) = (style::PHOTO_W * PREVIEW_SCALE, style::PHOTO_H * PREVIEW_SCALE);
        let (cx, cy, cw, ch) =
            compositor::cover_crop(decoded.width(), decoded.height(), dst_w, dst_h);
        let preview = decoded
            .crop_imm(cx, cy, cw, ch)
            .resize_exact(dst_w, dst_h, FilterType::Triangle)
            .to_rgba8();

        Ok(Snapshot {
            width: decoded.width(),
            height: decoded.height(),
            preview: Preview {
                width: preview.width(),
                height: preview.height(),
                rgba: preview.into_raw(),
            },
            payload,
        })
    })
    .await
    .map_err(|e| CaptureError::Task(e.to_string()))?
}
