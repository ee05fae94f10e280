//! Decorative glyph rasterization
//!
//! Glyphs are drawn by containment testing: every pixel in the glyph's
//! bounding box is mapped into the shape's unit space (inverse rotation,
//! then division by size) and painted if the shape contains it. Purely
//! arithmetic, so the same spec always produces the same pixels.

use image::{Rgba, RgbaImage};

use crate::state::style::{GlyphShape, GlyphSpec};

/// Unit-space half-extent the shapes are designed within; the sampling
/// box is padded to this factor times the glyph size.
const UNIT_PAD: f32 = 1.3;

/// Containment test in unit space ([-1, 1] square, y pointing down)
fn contains(shape: GlyphShape, x: f32, y: f32) -> bool {
    match shape {
        GlyphShape::Heart => heart_contains(x, y),
        GlyphShape::Star => star_contains(x, y),
        GlyphShape::Bloom => bloom_contains(x, y),
    }
}

/// Classic implicit heart curve, remapped so the point faces down in
/// image coordinates.
fn heart_contains(x: f32, y: f32) -> bool {
    let xs = x * 1.2;
    let ys = -y * 1.2 + 0.1;
    let f = (xs * xs + ys * ys - 1.0).powi(3) - xs * xs * ys * ys * ys;
    f <= 0.0
}

/// Five-point star as a 10-vertex polygon, even-odd crossing test
fn star_contains(x: f32, y: f32) -> bool {
    const POINTS: usize = 5;
    const INNER: f32 = 0.45;

    let mut vertices = [(0.0f32, 0.0f32); POINTS * 2];
    for (i, v) in vertices.iter_mut().enumerate() {
        let radius = if i % 2 == 0 { 1.0 } else { INNER };
        let angle = -std::f32::consts::FRAC_PI_2
            + i as f32 * std::f32::consts::PI / POINTS as f32;
        *v = (radius * angle.cos(), radius * angle.sin());
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Flower: a center disc plus five petal discs around it
fn bloom_contains(x: f32, y: f32) -> bool {
    if x * x + y * y <= 0.3 * 0.3 {
        return true;
    }
    const PETAL_ORBIT: f32 = 0.6;
    const PETAL_RADIUS: f32 = 0.4;
    for k in 0..5 {
        let angle = -std::f32::consts::FRAC_PI_2
            + k as f32 * std::f32::consts::TAU / 5.0;
        let px = PETAL_ORBIT * angle.cos();
        let py = PETAL_ORBIT * angle.sin();
        let dx = x - px;
        let dy = y - py;
        if dx * dx + dy * dy <= PETAL_RADIUS * PETAL_RADIUS {
            return true;
        }
    }
    false
}

/// Rasterize one glyph spec anchored at (cx, cy) in pixel coordinates.
///
/// `size_px` is the glyph's half-extent in pixels; rotation is the fixed
/// per-style tilt in degrees.
pub fn draw(
    img: &mut RgbaImage,
    cx: f32,
    cy: f32,
    size_px: f32,
    rotation_deg: f32,
    shape: GlyphShape,
    color: Rgba<u8>,
) {
    if size_px <= 0.0 {
        return;
    }

    let pad = size_px * UNIT_PAD;
    let x0 = (cx - pad).floor().max(0.0) as u32;
    let y0 = (cy - pad).floor().max(0.0) as u32;
    let x1 = ((cx + pad).ceil() as i64).clamp(0, img.width() as i64) as u32;
    let y1 = ((cy + pad).ceil() as i64).clamp(0, img.height() as i64) as u32;

    let rad = -rotation_deg.to_radians();
    let (sin, cos) = rad.sin_cos();

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            // Undo the glyph's rotation, then normalize to unit space.
            let ux = (dx * cos - dy * sin) / size_px;
            let uy = (dx * sin + dy * cos) / size_px;
            if contains(shape, ux, uy) {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Convenience wrapper: draw a `GlyphSpec` from the style table with an
/// overall pixel scale applied to its design-unit placement.
pub fn draw_spec(img: &mut RgbaImage, spec: &GlyphSpec, scale: f32) {
    let (ax, ay) = spec.corner.position();
    let color = Rgba([spec.color.r, spec.color.g, spec.color.b, 255]);
    draw(
        img,
        (ax + spec.dx) * scale,
        (ay + spec.dy) * scale,
        spec.size * scale,
        spec.rotation,
        spec.shape,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_contain_their_center_region() {
        assert!(heart_contains(0.0, 0.1));
        assert!(star_contains(0.0, 0.0));
        assert!(bloom_contains(0.0, 0.0));
    }

    #[test]
    fn test_shapes_exclude_far_corners() {
        for shape in [GlyphShape::Heart, GlyphShape::Star, GlyphShape::Bloom] {
            assert!(!contains(shape, 1.25, 1.25));
            assert!(!contains(shape, -1.25, 1.25));
        }
    }

    #[test]
    fn test_draw_paints_inside_bounding_box_only() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let color = Rgba([10, 200, 30, 255]);
        draw(&mut img, 50.0, 50.0, 12.0, 30.0, GlyphShape::Heart, color);

        let painted: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == color.0)
            .map(|(x, y, _)| (x, y))
            .collect();

        assert!(!painted.is_empty());
        for (x, y) in painted {
            assert!((x as f32 - 50.0).abs() <= 12.0 * UNIT_PAD + 1.0);
            assert!((y as f32 - 50.0).abs() <= 12.0 * UNIT_PAD + 1.0);
        }
    }

    #[test]
    fn test_draw_clips_at_image_edges() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        let color = Rgba([255, 255, 255, 255]);
        // Glyph centered off-canvas must not panic.
        draw(&mut img, -5.0, 10.0, 8.0, 0.0, GlyphShape::Star, color);
        draw(&mut img, 19.5, 19.5, 8.0, 45.0, GlyphShape::Bloom, color);
    }

    #[test]
    fn test_draw_is_deterministic() {
        let color = Rgba([77, 40, 200, 255]);
        let mut a = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        let mut b = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        draw(&mut a, 32.0, 32.0, 14.0, 17.0, GlyphShape::Bloom, color);
        draw(&mut b, 32.0, 32.0, 14.0, 17.0, GlyphShape::Bloom, color);
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
