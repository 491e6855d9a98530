//! Flattening of a document into a single exported image.

use super::color::{Color, TRANSPARENT};
use super::font::FontDescriptor;
use super::raster::{self, RasterError};
use super::render;
use crate::config::Config;
use crate::editor::EditorDocument;
use image::RgbaImage;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("No base image loaded")]
    NoBaseImage,

    #[error("Ink raster is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    InkSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl From<cairo::Error> for ComposeError {
    fn from(err: cairo::Error) -> Self {
        ComposeError::Raster(err.into())
    }
}

/// Renders base image + ink + committed text overlays into PNG bytes.
///
/// Layers are drawn bottom to top in a single cairo pass:
/// letterbox fill, aspect-fit photo, ink, then overlays in insertion order.
#[derive(Debug, Clone)]
pub struct CompositionEngine {
    font: FontDescriptor,
    letterbox: Color,
}

impl Default for CompositionEngine {
    fn default() -> Self {
        Self::new(FontDescriptor::default(), TRANSPARENT)
    }
}

impl CompositionEngine {
    pub fn new(font: FontDescriptor, letterbox: Color) -> Self {
        Self { font, letterbox }
    }

    pub fn from_config(config: &Config) -> Self {
        let letterbox = config
            .export
            .letterbox_color
            .as_ref()
            .map_or(TRANSPARENT, |spec| spec.to_color());
        Self::new(config.drawing.font_descriptor(), letterbox)
    }

    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    /// Flattens `document` with `ink` layered over the photo.
    ///
    /// `ink` must be sized to the document's canvas (see
    /// [`EditorDocument::effective_canvas_size`]).
    pub fn flatten(&self, document: &EditorDocument, ink: &RgbaImage) -> Result<Vec<u8>, ComposeError> {
        let base = document.base_image().ok_or(ComposeError::NoBaseImage)?;
        let size = document
            .effective_canvas_size()
            .unwrap_or_else(|| base.size());

        if ink.dimensions() != (size.width, size.height) {
            return Err(ComposeError::InkSizeMismatch {
                expected_width: size.width,
                expected_height: size.height,
                actual_width: ink.width(),
                actual_height: ink.height(),
            });
        }

        let target = raster::blank_surface(size.width, size.height)?;
        let photo = raster::surface_from_rgba(base.pixels())?;
        let ink_layer = raster::surface_from_rgba(ink)?;

        {
            let ctx = cairo::Context::new(&target)?;
            render::fill_background(&ctx, self.letterbox)?;
            render::render_image_fit(&ctx, &photo, size.width as f64, size.height as f64)?;

            ctx.set_source_surface(&ink_layer, 0.0, 0.0)?;
            ctx.paint()?;

            let mut drawn = 0usize;
            for overlay in document.overlays().iter().filter(|o| o.is_committed()) {
                let at = overlay.committed_position();
                render::render_text(
                    &ctx,
                    at.x,
                    at.y,
                    &overlay.text,
                    overlay.text_color,
                    &self.font,
                    overlay.weight(),
                );
                drawn += 1;
            }
            debug!(
                "Flattened {}x{} canvas with {} overlay(s)",
                size.width, size.height, drawn
            );
        }

        let mut buffer = Vec::new();
        target
            .write_to_png(&mut buffer)
            .map_err(RasterError::from)?;
        Ok(buffer)
    }
}
