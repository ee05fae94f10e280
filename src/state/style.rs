//! The frame design table
//!
//! Every visual fact about the three frame designs lives here: background
//! treatment, border color, accent color, decorative glyph placement and
//! the fixed text of the footer. Both the live canvas renderer and the
//! export compositor read this one table, so the two rendering paths can
//! never drift apart on what a style looks like.
//!
//! All coordinates are in "design units" on the 300x380 frame grid. The
//! export compositor multiplies them by its upscale factor; the live canvas
//! divides them by two for the on-screen footprint.

use serde::{Deserialize, Serialize};

// ========== The design grid ==========

/// Design width of a frame, in design units
pub const FRAME_W: u32 = 300;
/// Design height of a frame, in design units
pub const FRAME_H: u32 = 380;

/// Border stroke width
pub const BORDER_W: u32 = 6;

/// Photo content rectangle, inset from the frame edges
pub const PHOTO_X: u32 = 20;
pub const PHOTO_Y: u32 = 70;
pub const PHOTO_W: u32 = 260;
pub const PHOTO_H: u32 = 250;

/// Vertical anchor the (possibly multi-line) header centers on
pub const HEADER_ANCHOR_Y: u32 = 36;
/// Pixel-font cell multiplier for the header (8 -> 16 design units per char)
pub const HEADER_TEXT_SCALE: u32 = 2;
/// Usable width for header word-wrapping
pub const HEADER_WRAP_W: u32 = FRAME_W - 2 * PHOTO_X;
/// Extra design units between wrapped header lines
pub const HEADER_LINE_GAP: u32 = 4;

/// Pixel-font cell multiplier for footer and attribution text
pub const FOOTER_TEXT_SCALE: u32 = 1;
/// Baselines (top edges) of the two footer caption lines
pub const FOOTER_LINES_Y: [u32; 2] = [330, 341];
/// Baselines (top edges) of the two attribution lines
pub const ATTRIBUTION_LINES_Y: [u32; 2] = [356, 367];

// ========== Fixed text ==========

/// Header fallback when an entity has no (non-blank) display name
pub const NAME_PLACEHOLDER: &str = "your name";

/// Fixed two-line footer caption, never wrapped
pub const FOOTER_CAPTION: [&str; 2] = ["* click * flash *", "strike a pose!"];

/// Fixed two-line attribution, never wrapped
pub const ATTRIBUTION: [&str; 2] = ["made with", "SNAPBOOTH"];

// ========== Table types ==========

/// A framework-neutral opaque color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const fn rgb(r: u8, g: u8, b: u8) -> Tint {
    Tint { r, g, b }
}

/// How a style paints the area behind the photo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Single flat fill
    Solid(Tint),
    /// Vertical gradient, top color to bottom color
    VerticalGradient(Tint, Tint),
    /// Repeating polka-dot pattern over a base fill
    PolkaDots {
        base: Tint,
        dot: Tint,
        /// Center-to-center dot spacing in design units
        spacing: u32,
        /// Dot radius in design units
        radius: u32,
    },
}

/// Decorative shapes a style can scatter around the photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphShape {
    Heart,
    Star,
    Bloom,
}

/// Which corner of the PHOTO rectangle a glyph hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// The corner's position on the design grid
    pub fn position(self) -> (f32, f32) {
        let (x0, y0) = (PHOTO_X as f32, PHOTO_Y as f32);
        let (x1, y1) = ((PHOTO_X + PHOTO_W) as f32, (PHOTO_Y + PHOTO_H) as f32);
        match self {
            Corner::TopLeft => (x0, y0),
            Corner::TopRight => (x1, y0),
            Corner::BottomLeft => (x0, y1),
            Corner::BottomRight => (x1, y1),
        }
    }
}

/// One decorative glyph: what, where, how big, how tilted, what color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSpec {
    pub shape: GlyphShape,
    pub corner: Corner,
    /// Offset from the anchor corner, design units
    pub dx: f32,
    pub dy: f32,
    /// Fixed rotation in degrees
    pub rotation: f32,
    /// Half-extent of the glyph in design units
    pub size: f32,
    pub color: Tint,
}

/// Everything one style defines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSpec {
    /// Human-facing style name (UI labels, export manifest)
    pub name: &'static str,
    pub background: Background,
    pub border: Tint,
    /// Color for header and footer text
    pub accent: Tint,
    pub glyphs: &'static [GlyphSpec],
}

// ========== The three styles ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameStyle {
    /// Bubblegum pink with scattered hearts
    Candy,
    /// Warm orange gradient with stars
    Sunset,
    /// White with blue polka dots and blooms
    Polka,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 3] = [FrameStyle::Candy, FrameStyle::Sunset, FrameStyle::Polka];

    /// Look up this style's row in the design table
    pub fn spec(self) -> &'static StyleSpec {
        match self {
            FrameStyle::Candy => &CANDY,
            FrameStyle::Sunset => &SUNSET,
            FrameStyle::Polka => &POLKA,
        }
    }
}

impl std::fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().name)
    }
}

static CANDY: StyleSpec = StyleSpec {
    name: "Candy",
    background: Background::Solid(rgb(255, 217, 232)),
    border: rgb(255, 92, 138),
    accent: rgb(194, 37, 92),
    glyphs: &[
        GlyphSpec {
            shape: GlyphShape::Heart,
            corner: Corner::TopLeft,
            dx: -4.0,
            dy: -4.0,
            rotation: -15.0,
            size: 16.0,
            color: rgb(255, 92, 138),
        },
        GlyphSpec {
            shape: GlyphShape::Heart,
            corner: Corner::BottomRight,
            dx: 4.0,
            dy: 4.0,
            rotation: 20.0,
            size: 20.0,
            color: rgb(240, 62, 110),
        },
        GlyphSpec {
            shape: GlyphShape::Heart,
            corner: Corner::TopRight,
            dx: 2.0,
            dy: -8.0,
            rotation: 10.0,
            size: 10.0,
            color: rgb(250, 130, 170),
        },
    ],
};

static SUNSET: StyleSpec = StyleSpec {
    name: "Sunset",
    background: Background::VerticalGradient(rgb(255, 232, 204), rgb(255, 179, 107)),
    border: rgb(232, 89, 12),
    accent: rgb(217, 72, 15),
    glyphs: &[
        GlyphSpec {
            shape: GlyphShape::Star,
            corner: Corner::TopRight,
            dx: -2.0,
            dy: -6.0,
            rotation: 12.0,
            size: 18.0,
            color: rgb(247, 131, 47),
        },
        GlyphSpec {
            shape: GlyphShape::Star,
            corner: Corner::BottomLeft,
            dx: 2.0,
            dy: 6.0,
            rotation: -18.0,
            size: 14.0,
            color: rgb(232, 89, 12),
        },
    ],
};

static POLKA: StyleSpec = StyleSpec {
    name: "Polka",
    background: Background::PolkaDots {
        base: rgb(255, 255, 255),
        dot: rgb(208, 235, 255),
        spacing: 24,
        radius: 5,
    },
    border: rgb(51, 154, 240),
    accent: rgb(25, 113, 194),
    glyphs: &[
        GlyphSpec {
            shape: GlyphShape::Bloom,
            corner: Corner::TopLeft,
            dx: -4.0,
            dy: -2.0,
            rotation: 0.0,
            size: 15.0,
            color: rgb(51, 154, 240),
        },
        GlyphSpec {
            shape: GlyphShape::Star,
            corner: Corner::TopRight,
            dx: 0.0,
            dy: -6.0,
            rotation: 24.0,
            size: 10.0,
            color: rgb(116, 192, 252),
        },
        GlyphSpec {
            shape: GlyphShape::Bloom,
            corner: Corner::BottomRight,
            dx: 4.0,
            dy: 2.0,
            rotation: 36.0,
            size: 17.0,
            color: rgb(34, 139, 230),
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_has_two_or_three_glyphs() {
        for style in FrameStyle::ALL {
            let count = style.spec().glyphs.len();
            assert!((2..=3).contains(&count), "{style} has {count} glyphs");
        }
    }

    #[test]
    fn test_style_names_unique() {
        let names: Vec<_> = FrameStyle::ALL.iter().map(|s| s.spec().name).collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_photo_rect_inside_frame() {
        assert!(PHOTO_X + PHOTO_W <= FRAME_W);
        assert!(PHOTO_Y + PHOTO_H <= FRAME_H);
        assert!(ATTRIBUTION_LINES_Y[1] + 8 * FOOTER_TEXT_SCALE <= FRAME_H);
    }

    #[test]
    fn test_corner_positions_match_photo_rect() {
        assert_eq!(Corner::TopLeft.position(), (20.0, 70.0));
        assert_eq!(Corner::BottomRight.position(), (280.0, 320.0));
    }
}
