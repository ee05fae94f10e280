//! Frame export
//!
//! Turns entities into PNG files on disk. Single export composites one
//! frame; batch export walks the whole canvas in stacking order, keeps
//! every entity's outcome independent (one corrupt payload never touches
//! the others), and finishes by writing a JSON manifest describing what
//! was saved. Bundling the results into an archive is an external
//! collaborator's job.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tokio::task;

use crate::render::{self, compositor};
use crate::state::entity::{EntityId, PhotoEntity, Placement};
use crate::state::style::FrameStyle;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("compositing failed: {0}")]
    Compose(#[from] render::ComposeError),
    #[error("could not encode frame: {0}")]
    Encode(#[from] image::ImageError),
    #[error("could not write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Where exports land unless the user picks a folder:
/// the platform pictures directory, or the home directory as a fallback.
pub fn default_export_dir() -> PathBuf {
    let mut dir = dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    dir.push("snapbooth");
    dir
}

fn frame_file_name(id: EntityId, timestamp: &str) -> String {
    format!("snapbooth_{id}_{timestamp}.png")
}

/// Composite one entity and write it as a PNG into `dir`
pub fn export_entity_blocking(entity: &PhotoEntity, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;

    let frame = compositor::compose(entity)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = dir.join(frame_file_name(entity.id, &timestamp));
    frame.save(&path)?;

    Ok(path)
}

/// What one batch run produced
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Paths of successfully written frames
    pub saved: Vec<String>,
    /// Entities whose export failed, with the reason; the rest of the
    /// batch is unaffected
    pub failed: Vec<(EntityId, String)>,
    /// Path of the manifest, if it was written
    pub manifest_path: Option<String>,
    /// Why the manifest could not be written (saved frames stay valid)
    pub manifest_error: Option<String>,
}

impl BatchReport {
    /// One-line summary for the status bar
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Exported {} frame(s).", self.saved.len())
        } else {
            format!(
                "Exported {} frame(s), {} failed.",
                self.saved.len(),
                self.failed.len()
            )
        }
    }
}

#[derive(Serialize)]
struct Manifest {
    exported_at: String,
    frames: Vec<ManifestFrame>,
}

#[derive(Serialize)]
struct ManifestFrame {
    file: String,
    name: String,
    style: FrameStyle,
    placement: Placement,
}

/// Export every entity into `dir`, sequentially, with per-entity isolation.
///
/// Entities should arrive in stacking order; the manifest lists them in the
/// order they were saved.
pub fn export_batch_blocking(entities: &[PhotoEntity], dir: &Path) -> BatchReport {
    let mut report = BatchReport::default();

    if let Err(e) = std::fs::create_dir_all(dir) {
        for entity in entities {
            report.failed.push((entity.id, e.to_string()));
        }
        report.manifest_error = Some(e.to_string());
        return report;
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut manifest_frames = Vec::new();

    for entity in entities {
        // Each entity composites into its own buffer and saves to its own
        // file; a failure here must not disturb the rest of the batch.
        let result = compositor::compose(entity)
            .map_err(ExportError::from)
            .and_then(|frame| {
                let path = dir.join(frame_file_name(entity.id, &timestamp));
                frame.save(&path)?;
                Ok(path)
            });

        match result {
            Ok(path) => {
                let file = path.to_string_lossy().to_string();
                manifest_frames.push(ManifestFrame {
                    file: file.clone(),
                    name: entity.name.clone(),
                    style: entity.style,
                    placement: entity.placement,
                });
                report.saved.push(file);
            }
            Err(e) => {
                eprintln!("⚠️  Export failed for frame {}: {e}", entity.id);
                report.failed.push((entity.id, e.to_string()));
            }
        }
    }

    let manifest = Manifest {
        exported_at: Local::now().to_rfc3339(),
        frames: manifest_frames,
    };
    let manifest_path = dir.join(format!("snapbooth_manifest_{timestamp}.json"));
    match serde_json::to_string_pretty(&manifest)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&manifest_path, json).map_err(|e| e.to_string()))
    {
        Ok(()) => report.manifest_path = Some(manifest_path.to_string_lossy().to_string()),
        Err(e) => report.manifest_error = Some(e),
    }

    report
}

/// Async wrapper for a single-frame export
pub async fn export_one(entity: PhotoEntity, dir: PathBuf) -> Result<String, String> {
    task::spawn_blocking(move || {
        export_entity_blocking(&entity, &dir)
            .map(|p| p.to_string_lossy().to_string())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {e}"))?
}

/// Async wrapper for a batch export
pub async fn export_all(entities: Vec<PhotoEntity>, dir: PathBuf) -> Result<BatchReport, String> {
    task::spawn_blocking(move || export_batch_blocking(&entities, &dir))
        .await
        .map_err(|e| format!("Task join error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_payload(color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(24, 24, Rgba(color));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn entity(id: u64, payload: Vec<u8>) -> PhotoEntity {
        PhotoEntity {
            id: EntityId(id),
            payload,
            px_width: 24,
            px_height: 24,
            preview: crate::state::entity::Preview {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            },
            style: FrameStyle::Sunset,
            name: format!("frame {id}"),
            placement: Placement::new(10.0, 10.0, id as u32),
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snapbooth_export_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_export_entity_writes_full_size_png() {
        let dir = temp_dir("single");
        let path = export_entity_blocking(&entity(1, png_payload([5, 5, 5, 255])), &dir).unwrap();

        let saved = image::open(&path).unwrap();
        let (w, h) = compositor::output_size();
        assert_eq!((saved.width(), saved.height()), (w, h));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_batch_isolates_corrupt_entity() {
        let dir = temp_dir("batch");
        let entities = vec![
            entity(1, png_payload([10, 0, 0, 255])),
            entity(2, vec![0xba, 0xad]), // undecodable payload
            entity(3, png_payload([0, 0, 30, 255])),
        ];

        let report = export_batch_blocking(&entities, &dir);

        assert_eq!(report.saved.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, EntityId(2));
        for path in &report.saved {
            assert!(Path::new(path).exists());
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_batch_writes_manifest_for_saved_frames() {
        let dir = temp_dir("manifest");
        let entities = vec![
            entity(7, png_payload([1, 2, 3, 255])),
            entity(8, vec![0x00]),
        ];

        let report = export_batch_blocking(&entities, &dir);
        let manifest_path = report.manifest_path.expect("manifest must be written");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
        let frames = json["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["name"], "frame 7");
        assert_eq!(frames[0]["style"], "Sunset");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_names_embed_entity_id() {
        assert!(frame_file_name(EntityId(42), "20260807_120000").contains("42"));
        assert_ne!(
            frame_file_name(EntityId(1), "t"),
            frame_file_name(EntityId(2), "t")
        );
    }
}
