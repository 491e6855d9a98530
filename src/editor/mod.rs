//! Photo editing: document model, ink surface and the gesture state machine.

pub mod controller;
pub mod document;
pub mod ink;
pub mod overlay;
pub mod picker;
pub mod script;

pub use controller::{EditorController, EditorEvent, EditorState};
pub use document::{BaseImage, CancelOutcome, CanvasSize, DocumentError, EditorDocument};
pub use ink::{InkLayer, StrokeCanvas};
pub use overlay::{Offset, TextOverlay};
pub use picker::{FileImagePicker, ImagePicker};
pub use script::{EditScript, EditStep, ScriptError};
