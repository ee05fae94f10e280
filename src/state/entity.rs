//! Shared data structures for the booth state
//!
//! These structs represent the domain model that flows between
//! the store, the gesture controller and both renderers.

use cgmath::Point2;
use serde::{Deserialize, Serialize};

use super::style::{self, FrameStyle};

/// Minimum uniform scale an entity can be pinched down to
pub const SCALE_MIN: f32 = 0.3;
/// Maximum uniform scale an entity can be stretched up to
pub const SCALE_MAX: f32 = 3.0;

/// On-canvas footprint of an unscaled frame, in logical canvas units.
/// Half of the 300x380 design grid the compositor renders at.
pub const FOOTPRINT_W: f32 = style::FRAME_W as f32 / 2.0;
pub const FOOTPRINT_H: f32 = style::FRAME_H as f32 / 2.0;

/// Opaque identity of a photo entity, unique for the lifetime of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where and how a frame sits on the canvas
///
/// `x`/`y` are the top-left of the unscaled footprint; rotation and scale
/// pivot on the footprint center, so the visual center never moves when
/// either changes. Serialized into the export manifest so an arrangement
/// can be inspected after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Horizontal position in canvas coordinates
    pub x: f32,
    /// Vertical position in canvas coordinates
    pub y: f32,
    /// Rotation in degrees, clockwise, 0 = upright
    pub rotation: f32,
    /// Uniform scale factor, clamped to [SCALE_MIN, SCALE_MAX]
    pub scale: f32,
    /// Stacking order index; higher draws in front
    pub stack: u32,
}

impl Placement {
    pub fn new(x: f32, y: f32, stack: u32) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            scale: 1.0,
            stack,
        }
    }

    /// Clamp a requested scale into the allowed range
    pub fn clamp_scale(scale: f32) -> f32 {
        scale.clamp(SCALE_MIN, SCALE_MAX)
    }

    /// Visual center of the frame in canvas coordinates.
    ///
    /// The pivot is the center of the unscaled footprint, so this is
    /// independent of the current rotation and scale.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x + FOOTPRINT_W / 2.0, self.y + FOOTPRINT_H / 2.0)
    }

    /// Map a canvas-space point into the frame's local space.
    ///
    /// Local space is centered on the pivot, unrotated and unscaled:
    /// the frame occupies [-FOOTPRINT_W/2, FOOTPRINT_W/2] x
    /// [-FOOTPRINT_H/2, FOOTPRINT_H/2].
    pub fn to_local(&self, point: Point2<f32>) -> Point2<f32> {
        let center = self.center();
        let dx = point.x - center.x;
        let dy = point.y - center.y;

        // Undo rotation, then undo scale
        let rad = -self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        let rx = dx * cos - dy * sin;
        let ry = dx * sin + dy * cos;

        let scale = self.scale.max(f32::EPSILON);
        Point2::new(rx / scale, ry / scale)
    }

    /// Whether a canvas-space point falls inside the transformed footprint
    pub fn contains(&self, point: Point2<f32>) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= FOOTPRINT_W / 2.0 && local.y.abs() <= FOOTPRINT_H / 2.0
    }

    /// Canvas-space position of the rotate/scale handle
    /// (top-right corner of the transformed footprint)
    pub fn handle_position(&self) -> Point2<f32> {
        let center = self.center();
        let lx = FOOTPRINT_W / 2.0 * self.scale;
        let ly = -FOOTPRINT_H / 2.0 * self.scale;

        let rad = self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        Point2::new(
            center.x + lx * cos - ly * sin,
            center.y + lx * sin + ly * cos,
        )
    }
}

/// Small RGBA raster for the live canvas, cover-cropped to the photo
/// rectangle's aspect at capture time so the view can stretch it exactly.
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// Raw RGBA bytes, `width * height * 4` long
    pub rgba: Vec<u8>,
}

/// One captured, placed and styled photo on the canvas
#[derive(Debug, Clone)]
pub struct PhotoEntity {
    /// Unique session-scoped ID, immutable
    pub id: EntityId,
    /// Encoded raster bytes exactly as captured; never mutated
    pub payload: Vec<u8>,
    /// Source pixel width, recorded at capture
    pub px_width: u32,
    /// Source pixel height, recorded at capture
    pub px_height: u32,
    /// Pre-cropped live preview raster
    pub preview: Preview,
    /// Which decorative frame design to render
    pub style: FrameStyle,
    /// Display name shown in the frame header
    pub name: String,
    /// Current position / rotation / scale / stacking index
    pub placement: Placement,
}
