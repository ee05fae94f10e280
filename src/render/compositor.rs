//! The frame compositor
//!
//! Re-derives a frame design as pixels, independent of anything on screen:
//! given a photo entity, it decodes the stored payload and rasterizes the
//! full 300x380 design grid at `EXPORT_SCALE` into an RGBA buffer ready
//! for encoding. Layers, back to front: style background, border, the
//! cover-fit photo, decorative glyphs, header name, footer caption and
//! attribution.
//!
//! Everything here is table- and constant-driven; two calls with the same
//! entity produce identical buffers.

use image::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use thiserror::Error;

use super::{glyph, text};
use crate::state::entity::PhotoEntity;
use crate::state::style::{self, Background, Tint};

/// Integer upscale from the 300x380 design grid to export pixels
pub const EXPORT_SCALE: u32 = 3;

/// Exact pixel dimensions of every composited frame
pub fn output_size() -> (u32, u32) {
    (style::FRAME_W * EXPORT_SCALE, style::FRAME_H * EXPORT_SCALE)
}

/// Outline color behind header text, for legibility on any background
const HEADER_OUTLINE: Tint = style::rgb(255, 255, 255);

#[derive(Debug, Error)]
pub enum ComposeError {
    /// The entity's stored payload could not be decoded as an image
    #[error("could not decode snapshot payload: {0}")]
    Decode(#[from] image::ImageError),
}

fn pixel(tint: Tint) -> Rgba<u8> {
    Rgba([tint.r, tint.g, tint.b, 255])
}

/// Composite one entity into an export-resolution frame.
///
/// Fails only if the payload cannot be decoded; the caller decides how to
/// surface that (no retry happens here).
pub fn compose(entity: &PhotoEntity) -> Result<RgbaImage, ComposeError> {
    let photo = image::load_from_memory(&entity.payload)?;
    Ok(compose_decoded(entity, &photo))
}

fn compose_decoded(entity: &PhotoEntity, photo: &DynamicImage) -> RgbaImage {
    let s = EXPORT_SCALE;
    let (width, height) = output_size();
    let spec = entity.style.spec();

    let mut img = RgbaImage::new(width, height);

    paint_background(&mut img, &spec.background, s);
    paint_border(&mut img, pixel(spec.border), s);
    paint_photo(&mut img, photo, s);

    for glyph_spec in spec.glyphs {
        glyph::draw_spec(&mut img, glyph_spec, s as f32);
    }

    paint_header(&mut img, &entity.name, pixel(spec.accent), s);
    paint_footer(&mut img, pixel(spec.accent), s);

    img
}

/// The header's final lines: placeholder substitution plus word wrap with
/// character fallback. Scale cancels out of the wrap arithmetic, so the
/// line split is identical at every output resolution.
pub fn header_lines(name: &str) -> Vec<String> {
    let trimmed = name.trim();
    let content = if trimmed.is_empty() {
        style::NAME_PLACEHOLDER
    } else {
        trimmed
    };
    text::wrap(content, style::HEADER_TEXT_SCALE, style::HEADER_WRAP_W)
}

/// Center-crop region of a source image that cover-fits a target rectangle:
/// fills the target completely, preserves aspect, crops the overflow.
pub fn cover_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    debug_assert!(src_w > 0 && src_h > 0 && dst_w > 0 && dst_h > 0);

    // Compare aspect ratios without going through floats
    if src_w as u64 * dst_h as u64 > dst_w as u64 * src_h as u64 {
        // Source is wider than the target: crop the sides.
        let crop_w = ((src_h as u64 * dst_w as u64) / dst_h as u64).max(1) as u32;
        ((src_w - crop_w) / 2, 0, crop_w, src_h)
    } else {
        // Source is taller (or equal): crop top and bottom.
        let crop_h = ((src_w as u64 * dst_h as u64) / dst_w as u64).max(1) as u32;
        (0, (src_h - crop_h) / 2, src_w, crop_h)
    }
}

fn paint_background(img: &mut RgbaImage, background: &Background, s: u32) {
    let (width, height) = (img.width(), img.height());

    match *background {
        Background::Solid(tint) => {
            let color = pixel(tint);
            for p in img.pixels_mut() {
                *p = color;
            }
        }
        Background::VerticalGradient(top, bottom) => {
            for y in 0..height {
                let t = y as f32 / (height - 1).max(1) as f32;
                let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
                let color = Rgba([
                    lerp(top.r, bottom.r),
                    lerp(top.g, bottom.g),
                    lerp(top.b, bottom.b),
                    255,
                ]);
                for x in 0..width {
                    img.put_pixel(x, y, color);
                }
            }
        }
        Background::PolkaDots {
            base,
            dot,
            spacing,
            radius,
        } => {
            let base_px = pixel(base);
            for p in img.pixels_mut() {
                *p = base_px;
            }

            let dot_px = pixel(dot);
            let spacing = (spacing * s) as i64;
            let radius = (radius * s) as i64;
            let r_sq = radius * radius;

            let mut cy = spacing / 2;
            let mut row = 0i64;
            while cy < height as i64 + radius {
                // Offset every other row for a brick-like dot lattice
                let offset = if row % 2 == 0 { spacing / 2 } else { 0 };
                let mut cx = offset;
                while cx < width as i64 + radius {
                    for py in (cy - radius).max(0)..(cy + radius + 1).min(height as i64) {
                        for px in (cx - radius).max(0)..(cx + radius + 1).min(width as i64) {
                            let dx = px - cx;
                            let dy = py - cy;
                            if dx * dx + dy * dy <= r_sq {
                                img.put_pixel(px as u32, py as u32, dot_px);
                            }
                        }
                    }
                    cx += spacing;
                }
                cy += spacing;
                row += 1;
            }
        }
    }
}

fn paint_border(img: &mut RgbaImage, color: Rgba<u8>, s: u32) {
    let (width, height) = (img.width(), img.height());
    let bw = style::BORDER_W * s;

    for y in 0..height {
        for x in 0..width {
            if x < bw || x >= width - bw || y < bw || y >= height - bw {
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn paint_photo(img: &mut RgbaImage, photo: &DynamicImage, s: u32) {
    let dst_w = style::PHOTO_W * s;
    let dst_h = style::PHOTO_H * s;

    let (cx, cy, cw, ch) = cover_crop(photo.width(), photo.height(), dst_w, dst_h);
    let fitted = photo
        .crop_imm(cx, cy, cw, ch)
        .resize_exact(dst_w, dst_h, FilterType::Lanczos3);

    imageops::overlay(
        img,
        &fitted,
        (style::PHOTO_X * s) as i64,
        (style::PHOTO_Y * s) as i64,
    );
}

fn paint_header(img: &mut RgbaImage, name: &str, accent: Rgba<u8>, s: u32) {
    let lines = header_lines(name);
    if lines.is_empty() {
        return;
    }

    let scale = style::HEADER_TEXT_SCALE * s;
    let line_h = text::CHAR_CELL * scale;
    let gap = style::HEADER_LINE_GAP * s;
    let block_h = lines.len() as u32 * line_h + (lines.len() as u32 - 1) * gap;

    let cx = (img.width() / 2) as i32;
    let top = (style::HEADER_ANCHOR_Y * s) as i32 - (block_h / 2) as i32;

    for (i, line) in lines.iter().enumerate() {
        let y = top + i as i32 * (line_h + gap) as i32;
        text::draw_centered_outlined(img, cx, y, line, accent, pixel(HEADER_OUTLINE), scale);
    }
}

fn paint_footer(img: &mut RgbaImage, accent: Rgba<u8>, s: u32) {
    let scale = style::FOOTER_TEXT_SCALE * s;
    let cx = (img.width() / 2) as i32;

    for (line, y) in style::FOOTER_CAPTION.iter().zip(style::FOOTER_LINES_Y) {
        text::draw_centered(img, cx, (y * s) as i32, line, accent, scale);
    }
    for (line, y) in style::ATTRIBUTION.iter().zip(style::ATTRIBUTION_LINES_Y) {
        text::draw_centered(img, cx, (y * s) as i32, line, accent, scale);
    }
}
