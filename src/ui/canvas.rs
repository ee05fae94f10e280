//! The live booth canvas
//!
//! Interactive rendering of every entity, back to front, plus pointer and
//! keyboard handling. All visual facts (colors, glyphs, layout) come from
//! the shared style table at half the 300x380 design scale, so the live
//! frames keep exactly the proportions of the exported ones; only the
//! rasterization differs.

use cgmath::Point2;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::{keyboard, Color, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::gesture::GestureController;
use crate::render::compositor;
use crate::state::entity::{self, EntityId, PhotoEntity};
use crate::state::store::BoothStore;
use crate::state::style::{self, Background, GlyphShape, GlyphSpec, Tint};
use crate::Message;

/// Live rendering factor: canvas frames are the design grid at half size
const LIVE: f32 = 0.5;

/// Pointer distance within which a press grabs the rotate/scale handle
const HANDLE_RADIUS: f32 = 12.0;

/// Canvas backdrop behind all frames
const BACKDROP: Color = Color::from_rgb(0.12, 0.12, 0.15);

fn color(tint: Tint) -> Color {
    Color::from_rgb8(tint.r, tint.g, tint.b)
}

/// Per-widget interaction state: the single in-flight gesture
#[derive(Debug, Default)]
pub struct CanvasState {
    controller: GestureController,
}

/// The canvas view over the booth store, rebuilt every `view` call
pub struct BoothCanvas<'a> {
    pub store: &'a BoothStore,
    pub selected: Option<EntityId>,
    /// Cached geometry, owned by the application and cleared on store
    /// revision changes
    pub cache: &'a canvas::Cache,
}

impl<'a> Program<Message> for BoothCanvas<'a> {
    type State = CanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Press: rotate handle first, then frame bodies, topmost wins
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    let point = Point2::new(pos.x, pos.y);

                    // The rotate/scale handle only exists on the selected
                    // entity; it wins over any frame body under it.
                    if let Some(id) = self.selected {
                        if let Some(e) = self.store.get(id) {
                            let handle = e.placement.handle_position();
                            let dx = point.x - handle.x;
                            let dy = point.y - handle.y;
                            if (dx * dx + dy * dy).sqrt() <= HANDLE_RADIUS {
                                state.controller.begin_spin(id, e.placement, point);
                                return (
                                    canvas::event::Status::Captured,
                                    Some(Message::EntityGrabbed(id)),
                                );
                            }
                        }
                    }

                    if let Some(id) = self.store.hit_test(point) {
                        if let Some(e) = self.store.get(id) {
                            state.controller.begin_move(id, e.placement, point);
                            return (
                                canvas::event::Status::Captured,
                                Some(Message::EntityGrabbed(id)),
                            );
                        }
                    }

                    // Pressing empty backdrop drops the selection.
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::SelectionCleared),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.controller.active_id().is_some() {
                    if let Some(pos) = cursor.position_in(bounds) {
                        let update = state.controller.pointer_moved(Point2::new(pos.x, pos.y));
                        if let Some((id, placement)) = update {
                            return (
                                canvas::event::Status::Captured,
                                Some(Message::PlacementChanged(id, placement)),
                            );
                        }
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.controller.is_active() {
                    state.controller.release();
                    return (canvas::event::Status::Captured, Some(Message::GestureEnded));
                }
            }

            canvas::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                if key == keyboard::Key::Named(keyboard::key::Named::Delete) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::DeleteSelected),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), BACKDROP);

            for e in self.store.ordered() {
                draw_entity(frame, e, self.selected == Some(e.id));
            }
        });

        vec![geometry]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.controller.is_active() {
            return mouse::Interaction::Grabbing;
        }
        if let Some(pos) = cursor.position_in(bounds) {
            if self.store.hit_test(Point2::new(pos.x, pos.y)).is_some() {
                return mouse::Interaction::Grab;
            }
        }
        mouse::Interaction::default()
    }
}

/// Draw one frame (background, border, photo, glyphs, text) inside its
/// placement transform.
fn draw_entity(frame: &mut canvas::Frame, e: &PhotoEntity, selected: bool) {
    let placement = e.placement;
    let center = placement.center();
    let spec = e.style.spec();

    frame.with_save(|frame| {
        // Pivot on the visual center, like the CSS transform the design
        // grid assumes: translate, rotate, scale, then draw in local
        // footprint coordinates.
        frame.translate(Vector::new(center.x, center.y));
        frame.rotate(placement.rotation.to_radians());
        frame.scale(placement.scale);
        frame.translate(Vector::new(
            -entity::FOOTPRINT_W / 2.0,
            -entity::FOOTPRINT_H / 2.0,
        ));

        draw_background(frame, &spec.background);
        draw_border(frame, spec.border);
        draw_photo(frame, e);
        for glyph in spec.glyphs {
            draw_glyph(frame, glyph);
        }
        draw_text(frame, e, spec.accent);

        if selected {
            let outline = canvas::Path::rectangle(
                Point::ORIGIN,
                Size::new(entity::FOOTPRINT_W, entity::FOOTPRINT_H),
            );
            frame.stroke(
                &outline,
                canvas::Stroke::default()
                    .with_color(Color::WHITE)
                    .with_width(2.0),
            );
        }
    });

    if selected {
        // Rotate/scale handle at the transformed top-right corner, drawn
        // in canvas space so its size is independent of the entity scale.
        let handle = placement.handle_position();
        let knob = canvas::Path::circle(Point::new(handle.x, handle.y), HANDLE_RADIUS * 0.6);
        frame.fill(&knob, color(spec.border));
        frame.stroke(
            &knob,
            canvas::Stroke::default()
                .with_color(Color::WHITE)
                .with_width(2.0),
        );
    }
}

fn draw_background(frame: &mut canvas::Frame, background: &Background) {
    let size = Size::new(entity::FOOTPRINT_W, entity::FOOTPRINT_H);

    match *background {
        Background::Solid(tint) => {
            frame.fill_rectangle(Point::ORIGIN, size, color(tint));
        }
        Background::VerticalGradient(top, bottom) => {
            // Banded approximation; the export path does per-row lerp.
            const BANDS: u32 = 24;
            let band_h = size.height / BANDS as f32;
            for i in 0..BANDS {
                let t = i as f32 / (BANDS - 1) as f32;
                let lerp = |a: u8, b: u8| a as f32 / 255.0 + (b as f32 - a as f32) / 255.0 * t;
                frame.fill_rectangle(
                    Point::new(0.0, i as f32 * band_h),
                    Size::new(size.width, band_h + 0.5),
                    Color::from_rgb(
                        lerp(top.r, bottom.r),
                        lerp(top.g, bottom.g),
                        lerp(top.b, bottom.b),
                    ),
                );
            }
        }
        Background::PolkaDots {
            base,
            dot,
            spacing,
            radius,
        } => {
            frame.fill_rectangle(Point::ORIGIN, size, color(base));

            let spacing = spacing as f32 * LIVE;
            let radius = radius as f32 * LIVE;
            let mut cy = spacing / 2.0;
            let mut row = 0u32;
            while cy < size.height + radius {
                let offset = if row % 2 == 0 { spacing / 2.0 } else { 0.0 };
                let mut cx = offset;
                while cx < size.width + radius {
                    let circle = canvas::Path::circle(Point::new(cx, cy), radius);
                    frame.fill(&circle, color(dot));
                    cx += spacing;
                }
                cy += spacing;
                row += 1;
            }
        }
    }
}

fn draw_border(frame: &mut canvas::Frame, border: Tint) {
    let bw = style::BORDER_W as f32 * LIVE;
    let rect = canvas::Path::rectangle(
        Point::new(bw / 2.0, bw / 2.0),
        Size::new(entity::FOOTPRINT_W - bw, entity::FOOTPRINT_H - bw),
    );
    frame.stroke(
        &rect,
        canvas::Stroke::default().with_color(color(border)).with_width(bw),
    );
}

fn draw_photo(frame: &mut canvas::Frame, e: &PhotoEntity) {
    // The preview raster was cover-cropped to the photo rectangle's aspect
    // at capture time, so stretching it into the rectangle is exact.
    let rect = Rectangle::new(
        Point::new(style::PHOTO_X as f32 * LIVE, style::PHOTO_Y as f32 * LIVE),
        Size::new(style::PHOTO_W as f32 * LIVE, style::PHOTO_H as f32 * LIVE),
    );
    let handle = Handle::from_rgba(
        e.preview.width,
        e.preview.height,
        e.preview.rgba.clone(),
    );
    frame.draw_image(rect, canvas::Image::new(handle));
}

fn draw_glyph(frame: &mut canvas::Frame, glyph: &GlyphSpec) {
    let (ax, ay) = glyph.corner.position();
    let size = glyph.size * LIVE;

    frame.with_save(|frame| {
        frame.translate(Vector::new(
            (ax + glyph.dx) * LIVE,
            (ay + glyph.dy) * LIVE,
        ));
        frame.rotate(glyph.rotation.to_radians());

        let fill = color(glyph.color);
        match glyph.shape {
            GlyphShape::Heart => {
                let path = canvas::Path::new(|b| {
                    b.move_to(Point::new(0.0, -0.25 * size));
                    b.bezier_curve_to(
                        Point::new(0.55 * size, -1.0 * size),
                        Point::new(1.15 * size, -0.1 * size),
                        Point::new(0.0, 0.9 * size),
                    );
                    b.bezier_curve_to(
                        Point::new(-1.15 * size, -0.1 * size),
                        Point::new(-0.55 * size, -1.0 * size),
                        Point::new(0.0, -0.25 * size),
                    );
                    b.close();
                });
                frame.fill(&path, fill);
            }
            GlyphShape::Star => {
                let path = canvas::Path::new(|b| {
                    for i in 0..10 {
                        let radius = if i % 2 == 0 { size } else { size * 0.45 };
                        let angle = -std::f32::consts::FRAC_PI_2
                            + i as f32 * std::f32::consts::PI / 5.0;
                        let p = Point::new(radius * angle.cos(), radius * angle.sin());
                        if i == 0 {
                            b.move_to(p);
                        } else {
                            b.line_to(p);
                        }
                    }
                    b.close();
                });
                frame.fill(&path, fill);
            }
            GlyphShape::Bloom => {
                for k in 0..5 {
                    let angle = -std::f32::consts::FRAC_PI_2
                        + k as f32 * std::f32::consts::TAU / 5.0;
                    let petal = canvas::Path::circle(
                        Point::new(0.6 * size * angle.cos(), 0.6 * size * angle.sin()),
                        0.4 * size,
                    );
                    frame.fill(&petal, fill);
                }
                let heart_of_bloom = canvas::Path::circle(Point::ORIGIN, 0.3 * size);
                frame.fill(&heart_of_bloom, fill);
            }
        }
    });
}

fn draw_text(frame: &mut canvas::Frame, e: &PhotoEntity, accent: Tint) {
    let fill = color(accent);
    let cx = entity::FOOTPRINT_W / 2.0;

    // Header: same placeholder + wrap decisions as the export path.
    let lines = compositor::header_lines(&e.name);
    let line_h = 8.0 * style::HEADER_TEXT_SCALE as f32 * LIVE;
    let gap = style::HEADER_LINE_GAP as f32 * LIVE;
    let block_h = lines.len() as f32 * line_h + (lines.len().saturating_sub(1)) as f32 * gap;
    let top = style::HEADER_ANCHOR_Y as f32 * LIVE - block_h / 2.0;

    for (i, line) in lines.iter().enumerate() {
        fill_line(
            frame,
            line,
            cx,
            top + i as f32 * (line_h + gap),
            line_h,
            fill,
        );
    }

    let footer_h = 8.0 * style::FOOTER_TEXT_SCALE as f32 * LIVE;
    for (line, y) in style::FOOTER_CAPTION.iter().zip(style::FOOTER_LINES_Y) {
        fill_line(frame, line, cx, y as f32 * LIVE, footer_h, fill);
    }
    for (line, y) in style::ATTRIBUTION.iter().zip(style::ATTRIBUTION_LINES_Y) {
        fill_line(frame, line, cx, y as f32 * LIVE, footer_h, fill);
    }
}

fn fill_line(
    frame: &mut canvas::Frame,
    content: &str,
    cx: f32,
    top: f32,
    height: f32,
    fill: Color,
) {
    frame.fill_text(canvas::Text {
        content: content.to_string(),
        position: Point::new(cx, top),
        color: fill,
        size: height.into(),
        font: iced::Font::MONOSPACE,
        horizontal_alignment: iced::alignment::Horizontal::Center,
        vertical_alignment: iced::alignment::Vertical::Top,
        ..canvas::Text::default()
    });
}
