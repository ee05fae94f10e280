//! Deterministic raster text for exported frames
//!
//! Text is rasterized from the embedded 8x8 pixel font, scaled by integer
//! factors. Every glyph advances exactly `8 * scale` pixels, so measurement
//! is exact and word wrapping is fully deterministic with no font files or
//! platform text stack involved.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};

/// Native cell size of the embedded font, in pixels
pub const CHAR_CELL: u32 = 8;

/// Exact rendered width of `text` at an integer scale
pub fn measure(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * CHAR_CELL * scale
}

/// Word-wrap `text` to fit `max_width` pixels at the given scale.
///
/// Wrapping prefers whitespace boundaries. A single token too wide to fit
/// on a line of its own falls back to wrapping by individual characters,
/// so no input can ever produce a line wider than `max_width` (as long as
/// one character fits). Blank input yields no lines.
pub fn wrap(text: &str, scale: u32, max_width: u32) -> Vec<String> {
    let max_chars = (max_width / (CHAR_CELL * scale)).max(1) as usize;

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            // Token cannot fit on any line: flush, then split by characters.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                lines.push(chunk.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current.chars().count() + 1 + word_len
        };

        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Draw `text` with its top-left corner at (x, y)
pub fn draw(img: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>, scale: u32) {
    let cell = (CHAR_CELL * scale.max(1)) as i32;
    let px_scale = scale.max(1) as i32;
    let mut cursor_x = x;

    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += cell;
            continue;
        };

        for (row_idx, row) in glyph.iter().enumerate() {
            let bits = *row;
            for col_idx in 0..8 {
                if (bits >> col_idx) & 1 == 0 {
                    continue;
                }
                let base_x = cursor_x + col_idx * px_scale;
                let base_y = y + row_idx as i32 * px_scale;
                for sy in 0..px_scale {
                    for sx in 0..px_scale {
                        let tx = base_x + sx;
                        let ty = base_y + sy;
                        if tx >= 0
                            && ty >= 0
                            && (tx as u32) < img.width()
                            && (ty as u32) < img.height()
                        {
                            img.put_pixel(tx as u32, ty as u32, color);
                        }
                    }
                }
            }
        }

        cursor_x += cell;
    }
}

/// Draw `text` horizontally centered on `cx`, top edge at `y`
pub fn draw_centered(
    img: &mut RgbaImage,
    cx: i32,
    y: i32,
    text: &str,
    color: Rgba<u8>,
    scale: u32,
) {
    let x = cx - measure(text, scale) as i32 / 2;
    draw(img, x, y, text, color, scale);
}

/// Draw centered text with a contrasting outline for legibility.
///
/// The outline is the text redrawn at the eight neighboring offsets in the
/// outline color before the fill pass.
pub fn draw_centered_outlined(
    img: &mut RgbaImage,
    cx: i32,
    y: i32,
    text: &str,
    fill: Rgba<u8>,
    outline: Rgba<u8>,
    scale: u32,
) {
    let o = scale.max(1) as i32;
    for (dx, dy) in [
        (-o, -o),
        (0, -o),
        (o, -o),
        (-o, 0),
        (o, 0),
        (-o, o),
        (0, o),
        (o, o),
    ] {
        let x = cx - measure(text, scale) as i32 / 2;
        draw(img, x + dx, y + dy, text, outline, scale);
    }
    draw_centered(img, cx, y, text, fill, scale);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_is_exact_per_char() {
        assert_eq!(measure("", 2), 0);
        assert_eq!(measure("Alex", 1), 4 * 8);
        assert_eq!(measure("Alex", 3), 4 * 8 * 3);
    }

    #[test]
    fn test_wrap_keeps_short_text_on_one_line() {
        let lines = wrap("Alex", 2, 260);
        assert_eq!(lines, vec!["Alex".to_string()]);
    }

    #[test]
    fn test_wrap_breaks_on_word_boundaries() {
        // 10 chars per line at scale 2 in 160px.
        let lines = wrap("the booth crew", 2, 160);
        assert_eq!(lines, vec!["the booth".to_string(), "crew".to_string()]);
    }

    #[test]
    fn test_wrap_blank_input_yields_no_lines() {
        assert!(wrap("", 2, 260).is_empty());
        assert!(wrap("   ", 2, 260).is_empty());
    }

    #[test]
    fn test_wrap_unbroken_token_falls_back_to_characters() {
        // 5 chars per line; a 12-char token has no space to break on.
        let lines = wrap("abcdefghijkl", 1, 40);
        assert!(lines.len() > 1);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
        for line in &lines {
            assert!(measure(line, 1) <= 40);
        }
    }

    #[test]
    fn test_wrap_mixed_words_and_long_token() {
        let lines = wrap("hi abcdefghij yo", 1, 40);
        assert_eq!(lines, vec!["hi", "abcde", "fghij", "yo"]);
    }

    #[test]
    fn test_draw_stays_in_bounds() {
        let mut img = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]));
        // Drawing partially off every edge must not panic.
        draw(&mut img, -5, -5, "W", Rgba([255, 255, 255, 255]), 2);
        draw(&mut img, 12, 12, "W", Rgba([255, 255, 255, 255]), 2);
    }

    #[test]
    fn test_draw_marks_pixels() {
        let mut img = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 255]));
        draw(&mut img, 0, 0, "I", Rgba([255, 0, 0, 255]), 2);
        let touched = img.pixels().filter(|p| p.0 == [255, 0, 0, 255]).count();
        assert!(touched > 0);
    }
}
