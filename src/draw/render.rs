//! Cairo-based rendering functions for ink, photos and overlay text.

use super::color::Color;
use super::font::{FontDescriptor, TextWeight};
use super::stroke::Stroke;

/// Fills the entire target with a solid color, replacing existing pixels.
///
/// Fully transparent colors are a no-op since new surfaces start cleared.
pub fn fill_background(ctx: &cairo::Context, color: Color) -> Result<(), cairo::Error> {
    if color.a <= 0.0 {
        return Ok(());
    }
    ctx.save()?;
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_operator(cairo::Operator::Source);
    ctx.paint()?;
    ctx.restore()
}

/// Renders strokes in order (first stroke = bottom).
pub fn render_strokes(ctx: &cairo::Context, strokes: &[Stroke]) {
    for stroke in strokes {
        render_freehand_borrowed(ctx, &stroke.points, stroke.color, stroke.thick);
    }
}

/// Render freehand stroke (polyline through points)
///
/// A single point is drawn as a round dot of the stroke's thickness.
pub fn render_freehand_borrowed(
    ctx: &cairo::Context,
    points: &[(i32, i32)],
    color: Color,
    thick: f64,
) {
    let Some(&(x0, y0)) = points.first() else {
        return;
    };

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(x0 as f64, y0 as f64);
    if points.len() == 1 {
        ctx.line_to(x0 as f64, y0 as f64);
    }
    for &(x, y) in &points[1..] {
        ctx.line_to(x as f64, y as f64);
    }

    let _ = ctx.stroke();
}

/// Draws `image` scaled to fit inside `width` x `height`, centered, preserving
/// its aspect ratio. Anything outside the target rectangle is clipped.
pub fn render_image_fit(
    ctx: &cairo::Context,
    image: &cairo::ImageSurface,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let image_w = image.width() as f64;
    let image_h = image.height() as f64;
    if image_w <= 0.0 || image_h <= 0.0 || width <= 0.0 || height <= 0.0 {
        return Ok(());
    }

    let scale = (width / image_w).min(height / image_h);
    let offset_x = (width - image_w * scale) / 2.0;
    let offset_y = (height - image_h * scale) / 2.0;

    ctx.save()?;
    ctx.rectangle(0.0, 0.0, width, height);
    ctx.clip();
    ctx.translate(offset_x, offset_y);
    ctx.scale(scale, scale);
    ctx.set_source_surface(image, 0.0, 0.0)?;
    ctx.source().set_filter(cairo::Filter::Good);
    ctx.paint()?;
    ctx.restore()
}

/// Renders text with its layout's top-left corner at (`x`, `y`).
///
/// Uses Pango so newlines in `text` produce multiple lines with font-derived
/// spacing. Empty text produces no pixels.
pub fn render_text(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    text: &str,
    color: Color,
    font: &FontDescriptor,
    weight: TextWeight,
) {
    // Save context state to prevent settings from leaking to other drawing operations
    ctx.save().ok();

    // Gray antialiasing; subpixel rendering fringes on an ARGB target
    ctx.set_antialias(cairo::Antialias::Gray);

    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(&font.to_pango_string(weight));
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}
