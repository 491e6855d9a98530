//! In-memory editing document: base photo, text overlays and canvas size.

use super::overlay::{Offset, TextOverlay};
use crate::draw::Color;
use image::RgbaImage;
use log::{debug, info, warn};
use thiserror::Error;

/// Pixel dimensions of the editing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The picked photo: original bytes plus the pixels decoded from them.
#[derive(Clone)]
pub struct BaseImage {
    bytes: Vec<u8>,
    pixels: RgbaImage,
}

impl BaseImage {
    /// Decodes `bytes` with any format the `image` crate was built with.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, image::ImageError> {
        let pixels = image::load_from_memory(&bytes)?.to_rgba8();
        Ok(Self { bytes, pixels })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.pixels.width(), self.pixels.height())
    }
}

impl std::fmt::Debug for BaseImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseImage")
            .field("bytes_len", &self.bytes.len())
            .field("size", &self.size())
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Overlay index {index} out of bounds ({len} overlays)")]
    OverlayOutOfBounds { index: usize, len: usize },
}

/// Result of [`EditorDocument::cancel_active_overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The active overlay was a never-committed draft and has been removed.
    Discarded,
    /// The active overlay was already committed; any edits were rolled back.
    Restored,
    /// Nothing was open for editing.
    NoActiveOverlay,
}

/// Owns the base image, the ordered overlays (insertion order is z-order) and
/// the index of the overlay currently open for text editing.
#[derive(Debug, Clone, Default)]
pub struct EditorDocument {
    base_image: Option<BaseImage>,
    overlays: Vec<TextOverlay>,
    active_overlay: Option<usize>,
    /// Copy of the active overlay taken when editing began, restored on cancel
    editing_backup: Option<TextOverlay>,
    canvas_size: Option<CanvasSize>,
    default_text_color: Color,
}

impl EditorDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document whose new overlays start with `color`.
    pub fn with_text_color(color: Color) -> Self {
        Self {
            default_text_color: color,
            ..Self::default()
        }
    }

    /// Sets the base photo. Bytes that do not decode leave the document
    /// untouched; the return value tells the caller whether it was accepted.
    pub fn set_base_image(&mut self, bytes: Vec<u8>) -> bool {
        match BaseImage::decode(bytes) {
            Ok(image) => {
                info!("Loaded base image ({:?})", image.size());
                self.base_image = Some(image);
                true
            }
            Err(err) => {
                warn!("Ignoring picked image that failed to decode: {}", err);
                false
            }
        }
    }

    pub fn base_image(&self) -> Option<&BaseImage> {
        self.base_image.as_ref()
    }

    pub fn has_base_image(&self) -> bool {
        self.base_image.is_some()
    }

    /// Records the surface size the first time a non-empty one is reported.
    pub fn set_canvas_size(&mut self, size: CanvasSize) -> bool {
        if self.canvas_size.is_some() || size.is_empty() {
            return false;
        }
        debug!("Canvas laid out at {}x{}", size.width, size.height);
        self.canvas_size = Some(size);
        true
    }

    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.canvas_size
    }

    /// The laid-out canvas size, or the photo's own size before layout.
    pub fn effective_canvas_size(&self) -> Option<CanvasSize> {
        self.canvas_size
            .or_else(|| self.base_image.as_ref().map(BaseImage::size))
    }

    pub fn overlays(&self) -> &[TextOverlay] {
        &self.overlays
    }

    pub fn overlay(&self, index: usize) -> Result<&TextOverlay, DocumentError> {
        let len = self.overlays.len();
        self.overlays
            .get(index)
            .ok_or(DocumentError::OverlayOutOfBounds { index, len })
    }

    fn overlay_mut(&mut self, index: usize) -> Result<&mut TextOverlay, DocumentError> {
        let len = self.overlays.len();
        self.overlays
            .get_mut(index)
            .ok_or(DocumentError::OverlayOutOfBounds { index, len })
    }

    pub fn active_overlay_index(&self) -> Option<usize> {
        self.active_overlay
    }

    /// Appends a draft overlay, opens it for editing and returns its index.
    pub fn add_overlay(&mut self) -> usize {
        self.overlays
            .push(TextOverlay::draft(self.default_text_color));
        let index = self.overlays.len() - 1;
        self.active_overlay = Some(index);
        self.editing_backup = None;
        index
    }

    /// Opens an existing overlay for text editing.
    pub fn begin_editing(&mut self, index: usize) -> Result<(), DocumentError> {
        let snapshot = self.overlay(index)?.clone();
        self.active_overlay = Some(index);
        self.editing_backup = Some(snapshot);
        Ok(())
    }

    /// Starts a drag: the live position snaps back to the committed baseline.
    pub fn begin_drag(&mut self, index: usize) -> Result<(), DocumentError> {
        let overlay = self.overlay_mut(index)?;
        overlay.position = overlay.committed_position;
        Ok(())
    }

    pub fn update_drag_position(&mut self, index: usize, delta: Offset) -> Result<(), DocumentError> {
        let overlay = self.overlay_mut(index)?;
        overlay.position = overlay.committed_position + delta;
        Ok(())
    }

    pub fn commit_drag_position(&mut self, index: usize) -> Result<(), DocumentError> {
        let overlay = self.overlay_mut(index)?;
        overlay.committed_position = overlay.position;
        Ok(())
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), DocumentError> {
        self.overlay_mut(index)?.text = text.into();
        Ok(())
    }

    /// Confirms the overlay's text and closes the editor.
    pub fn commit_text(&mut self, index: usize) -> Result<(), DocumentError> {
        self.overlay_mut(index)?.is_committed = true;
        self.active_overlay = None;
        self.editing_backup = None;
        Ok(())
    }

    /// Abandons the open text editor.
    pub fn cancel_active_overlay(&mut self) -> CancelOutcome {
        let backup = self.editing_backup.take();
        let Some(index) = self.active_overlay.take() else {
            return CancelOutcome::NoActiveOverlay;
        };
        let Some(committed) = self.overlays.get(index).map(TextOverlay::is_committed) else {
            return CancelOutcome::NoActiveOverlay;
        };

        if !committed {
            self.overlays.remove(index);
            return CancelOutcome::Discarded;
        }

        if let Some(backup) = backup {
            self.overlays[index] = backup;
        }
        CancelOutcome::Restored
    }

    pub fn toggle_bold(&mut self, index: usize) -> Result<(), DocumentError> {
        let overlay = self.overlay_mut(index)?;
        overlay.is_bold = !overlay.is_bold;
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: Color) -> Result<(), DocumentError> {
        self.overlay_mut(index)?.text_color = color;
        Ok(())
    }

    /// Returns the document to its empty state. The canvas size belongs to
    /// the editing surface and is kept.
    pub fn reset(&mut self) {
        self.base_image = None;
        self.overlays.clear();
        self.active_overlay = None;
        self.editing_backup = None;
    }
}
