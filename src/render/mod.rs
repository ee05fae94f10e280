//! Export rendering
//!
//! This module turns entity state back into pixels, independent of the
//! live canvas:
//! - compositor.rs - the frame compositor (layout, background, photo)
//! - glyph.rs - decorative shape rasterization
//! - text.rs - deterministic pixel-font text with wrapping
//!
//! The live canvas and this compositor consume the same style table, so
//! they agree on every proportion; only the rasterization differs.

pub mod compositor;
pub mod glyph;
pub mod text;

pub use compositor::ComposeError;
