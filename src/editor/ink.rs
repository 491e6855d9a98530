//! Freehand ink surface.

use super::document::CanvasSize;
use crate::draw::{Color, RasterError, Stroke, raster, render};
use image::RgbaImage;

/// A drawable surface that captures freehand input and yields a raster of it.
///
/// While the surface is not first responder (a text editor has focus),
/// stylus input must not reach it.
pub trait InkLayer {
    /// Rasterizes the current strokes onto a transparent layer of `size`.
    fn snapshot(&self, size: CanvasSize) -> Result<RgbaImage, RasterError>;

    fn set_first_responder(&mut self, active: bool);

    fn is_first_responder(&self) -> bool;

    /// Drops every stroke (new editing session).
    fn clear(&mut self);
}

/// Records pointer strokes and rasterizes them with cairo.
#[derive(Debug, Clone)]
pub struct StrokeCanvas {
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    first_responder: bool,
    /// Pen color for new strokes
    pub pen_color: Color,
    /// Pen thickness in pixels for new strokes
    pub pen_thickness: f64,
}

impl StrokeCanvas {
    pub fn new(pen_color: Color, pen_thickness: f64) -> Self {
        Self {
            strokes: Vec::new(),
            current: None,
            first_responder: false,
            pen_color,
            pen_thickness,
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Starts a stroke. Ignored unless the canvas is first responder.
    pub fn begin_stroke(&mut self, x: i32, y: i32) -> bool {
        if !self.first_responder {
            log::debug!("Ignoring stroke start while ink is not first responder");
            return false;
        }
        self.current = Some(Stroke::new((x, y), self.pen_color, self.pen_thickness));
        true
    }

    pub fn extend_stroke(&mut self, x: i32, y: i32) {
        if let Some(stroke) = self.current.as_mut() {
            stroke.push((x, y));
        }
    }

    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            if !stroke.is_empty() {
                self.strokes.push(stroke);
            }
        }
    }
}

impl Default for StrokeCanvas {
    fn default() -> Self {
        Self::new(crate::draw::BLACK, 5.0)
    }
}

impl InkLayer for StrokeCanvas {
    fn snapshot(&self, size: CanvasSize) -> Result<RgbaImage, RasterError> {
        let surface = raster::blank_surface(size.width, size.height)?;
        {
            let ctx = cairo::Context::new(&surface)?;
            render::render_strokes(&ctx, &self.strokes);
            if let Some(stroke) = &self.current {
                render::render_strokes(&ctx, std::slice::from_ref(stroke));
            }
        }
        raster::surface_to_rgba(surface)
    }

    fn set_first_responder(&mut self, active: bool) {
        if !active {
            // Resigning ends any stroke in progress
            self.end_stroke();
        }
        self.first_responder = active;
    }

    fn is_first_responder(&self) -> bool {
        self.first_responder
    }

    fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RED;

    #[test]
    fn strokes_require_first_responder() {
        let mut canvas = StrokeCanvas::new(RED, 4.0);
        assert!(!canvas.begin_stroke(1, 1));
        canvas.end_stroke();
        assert!(canvas.strokes().is_empty());

        canvas.set_first_responder(true);
        assert!(canvas.begin_stroke(1, 1));
        canvas.extend_stroke(5, 5);
        canvas.end_stroke();
        assert_eq!(canvas.strokes().len(), 1);
    }

    #[test]
    fn snapshot_is_transparent_without_strokes() {
        let canvas = StrokeCanvas::default();
        let layer = canvas.snapshot(CanvasSize::new(8, 6)).expect("snapshot");
        assert_eq!(layer.dimensions(), (8, 6));
        assert!(layer.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn snapshot_contains_stroke_pixels() {
        let mut canvas = StrokeCanvas::new(RED, 6.0);
        canvas.set_first_responder(true);
        canvas.begin_stroke(2, 10);
        canvas.extend_stroke(18, 10);
        canvas.end_stroke();

        let layer = canvas.snapshot(CanvasSize::new(20, 20)).expect("snapshot");
        let center = layer.get_pixel(10, 10);
        assert_eq!(center[3], 255);
        assert!(center[0] > 200 && center[1] < 50 && center[2] < 50);
        assert_eq!(layer.get_pixel(10, 0)[3], 0);
    }

    #[test]
    fn clear_drops_strokes() {
        let mut canvas = StrokeCanvas::default();
        canvas.set_first_responder(true);
        canvas.begin_stroke(0, 0);
        canvas.end_stroke();
        canvas.clear();
        assert!(canvas.strokes().is_empty());
    }
}
