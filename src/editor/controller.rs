//! Editor state machine mediating user gestures against the document.

use super::document::{CanvasSize, CancelOutcome, DocumentError, EditorDocument};
use super::ink::InkLayer;
use super::overlay::Offset;
use crate::draw::{Color, CompositionEngine};
use crate::export::{ExportError, ExportResult, ExportSink, FileExportSink};
use log::{debug, error, info};
use std::sync::Arc;

/// Message shown when a picked file is not a usable photo.
pub const IMAGE_LOAD_FAILED_MESSAGE: &str = "Unable to load the selected image";
/// Message shown after a successful export.
pub const SAVE_SUCCEEDED_MESSAGE: &str = "Saved Successfully";

/// Current editor mode.
///
/// `Empty` has no photo; `Editing` has a photo with the ink surface active;
/// `TextEditingDraft` has one overlay's text editor open and the ink surface
/// suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Empty,
    Editing,
    TextEditingDraft { index: usize },
}

/// User gestures and platform callbacks the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ImagePicked(Vec<u8>),
    CanvasLaidOut(CanvasSize),
    AddTextTapped,
    LongPressOverlay(usize),
    TextChanged(String),
    BoldToggled,
    ColorChosen(Color),
    ConfirmTextTapped,
    CancelTextTapped,
    DragBegan(usize),
    DragChanged { index: usize, delta: Offset },
    DragEnded(usize),
    SaveTapped,
    CloseTapped,
    SignedOut,
}

/// Owns the [`EditorDocument`] and the ink surface, and drives both from
/// discrete gesture events. Events that make no sense in the current state are
/// ignored.
pub struct EditorController<I: InkLayer> {
    state: EditorState,
    document: EditorDocument,
    ink: I,
    compositor: CompositionEngine,
    exporter: Arc<dyn ExportSink>,
    message: Option<String>,
    last_export: Option<ExportResult>,
}

impl<I: InkLayer> EditorController<I> {
    pub fn new(document: EditorDocument, ink: I, compositor: CompositionEngine) -> Self {
        Self::with_exporter(document, ink, compositor, Arc::new(FileExportSink::default()))
    }

    /// Create a controller with a custom export destination (useful for testing).
    pub fn with_exporter(
        document: EditorDocument,
        mut ink: I,
        compositor: CompositionEngine,
        exporter: Arc<dyn ExportSink>,
    ) -> Self {
        let state = if document.has_base_image() {
            ink.set_first_responder(true);
            EditorState::Editing
        } else {
            EditorState::Empty
        };
        Self {
            state,
            document,
            ink,
            compositor,
            exporter,
            message: None,
            last_export: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn document(&self) -> &EditorDocument {
        &self.document
    }

    pub fn ink(&self) -> &I {
        &self.ink
    }

    pub fn ink_mut(&mut self) -> &mut I {
        &mut self.ink
    }

    /// The latest user-visible message (load failure, save result).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn last_export(&self) -> Option<&ExportResult> {
        self.last_export.as_ref()
    }

    /// Dispatches one event to the matching transition.
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<(), DocumentError> {
        match event {
            EditorEvent::ImagePicked(bytes) => {
                self.image_picked(bytes);
            }
            EditorEvent::CanvasLaidOut(size) => {
                self.canvas_laid_out(size);
            }
            EditorEvent::AddTextTapped => {
                self.add_text();
            }
            EditorEvent::LongPressOverlay(index) => self.long_press(index)?,
            EditorEvent::TextChanged(text) => self.text_changed(text)?,
            EditorEvent::BoldToggled => self.toggle_bold()?,
            EditorEvent::ColorChosen(color) => self.color_chosen(color)?,
            EditorEvent::ConfirmTextTapped => self.confirm_text()?,
            EditorEvent::CancelTextTapped => {
                self.cancel_text();
            }
            EditorEvent::DragBegan(index) => self.drag_began(index)?,
            EditorEvent::DragChanged { index, delta } => self.drag_changed(index, delta)?,
            EditorEvent::DragEnded(index) => self.drag_ended(index)?,
            EditorEvent::SaveTapped => {
                self.save();
            }
            EditorEvent::CloseTapped => self.close(),
            EditorEvent::SignedOut => self.sign_out(),
        }
        Ok(())
    }

    /// `Empty -> Editing` when `bytes` decode to a photo.
    pub fn image_picked(&mut self, bytes: Vec<u8>) -> bool {
        if self.state != EditorState::Empty {
            debug!("Ignoring picked image in state {:?}", self.state);
            return false;
        }
        if !self.document.set_base_image(bytes) {
            self.message = Some(IMAGE_LOAD_FAILED_MESSAGE.to_string());
            return false;
        }
        self.state = EditorState::Editing;
        self.ink.set_first_responder(true);
        true
    }

    pub fn canvas_laid_out(&mut self, size: CanvasSize) -> bool {
        self.document.set_canvas_size(size)
    }

    /// `Editing -> TextEditingDraft` on a fresh draft overlay.
    pub fn add_text(&mut self) -> Option<usize> {
        if self.state != EditorState::Editing {
            debug!("Ignoring add-text in state {:?}", self.state);
            return None;
        }
        let index = self.document.add_overlay();
        self.ink.set_first_responder(false);
        self.state = EditorState::TextEditingDraft { index };
        Some(index)
    }

    /// `Editing -> TextEditingDraft` on an existing overlay.
    pub fn long_press(&mut self, index: usize) -> Result<(), DocumentError> {
        if self.state != EditorState::Editing {
            debug!("Ignoring long press in state {:?}", self.state);
            return Ok(());
        }
        self.document.begin_editing(index)?;
        self.ink.set_first_responder(false);
        self.state = EditorState::TextEditingDraft { index };
        Ok(())
    }

    fn editing_index(&self) -> Option<usize> {
        match self.state {
            EditorState::TextEditingDraft { index } => Some(index),
            _ => None,
        }
    }

    pub fn text_changed(&mut self, text: impl Into<String>) -> Result<(), DocumentError> {
        match self.editing_index() {
            Some(index) => self.document.set_text(index, text),
            None => Ok(()),
        }
    }

    pub fn toggle_bold(&mut self) -> Result<(), DocumentError> {
        match self.editing_index() {
            Some(index) => self.document.toggle_bold(index),
            None => Ok(()),
        }
    }

    pub fn color_chosen(&mut self, color: Color) -> Result<(), DocumentError> {
        match self.editing_index() {
            Some(index) => self.document.set_color(index, color),
            None => Ok(()),
        }
    }

    /// `TextEditingDraft -> Editing`, keeping the overlay.
    pub fn confirm_text(&mut self) -> Result<(), DocumentError> {
        let Some(index) = self.editing_index() else {
            return Ok(());
        };
        self.document.commit_text(index)?;
        self.resume_ink();
        Ok(())
    }

    /// `TextEditingDraft -> Editing`, dropping a draft or rolling back edits.
    pub fn cancel_text(&mut self) -> CancelOutcome {
        if self.editing_index().is_none() {
            return CancelOutcome::NoActiveOverlay;
        }
        let outcome = self.document.cancel_active_overlay();
        self.resume_ink();
        outcome
    }

    fn resume_ink(&mut self) {
        self.ink.set_first_responder(true);
        self.state = EditorState::Editing;
    }

    pub fn drag_began(&mut self, index: usize) -> Result<(), DocumentError> {
        if self.state != EditorState::Editing {
            return Ok(());
        }
        self.document.begin_drag(index)
    }

    pub fn drag_changed(&mut self, index: usize, delta: Offset) -> Result<(), DocumentError> {
        if self.state != EditorState::Editing {
            return Ok(());
        }
        self.document.update_drag_position(index, delta)
    }

    pub fn drag_ended(&mut self, index: usize) -> Result<(), DocumentError> {
        if self.state != EditorState::Editing {
            return Ok(());
        }
        self.document.commit_drag_position(index)
    }

    /// Flattens the document and hands the PNG to the export sink without
    /// touching the controller state.
    pub fn export(&self) -> Result<ExportResult, ExportError> {
        let size = self
            .document
            .effective_canvas_size()
            .ok_or(crate::draw::ComposeError::NoBaseImage)?;
        let ink = self.ink.snapshot(size)?;
        let image_data = self.compositor.flatten(&self.document, &ink)?;
        let saved_path = self.exporter.export(&image_data)?;
        Ok(ExportResult {
            image_data,
            saved_path,
        })
    }

    /// `Editing -> Editing`: exports and records a user-visible message.
    pub fn save(&mut self) -> Option<&ExportResult> {
        if self.state != EditorState::Editing {
            debug!("Ignoring save in state {:?}", self.state);
            return None;
        }
        match self.export() {
            Ok(result) => {
                info!("Export saved to {}", result.saved_path.display());
                self.message = Some(SAVE_SUCCEEDED_MESSAGE.to_string());
                self.last_export = Some(result);
                self.last_export.as_ref()
            }
            Err(err) => {
                error!("Export failed: {}", err);
                self.message = Some(err.to_string());
                None
            }
        }
    }

    /// Abandons the session: back to `Empty`.
    pub fn close(&mut self) {
        if self.state == EditorState::Empty {
            return;
        }
        self.reset();
    }

    /// Sign-out discards the document from any state.
    pub fn sign_out(&mut self) {
        self.reset();
        self.message = None;
    }

    fn reset(&mut self) {
        self.document.reset();
        self.ink.clear();
        self.ink.set_first_responder(false);
        self.last_export = None;
        self.state = EditorState::Empty;
    }
}
