//! Data types for exporting flattened images.

use crate::draw::{ComposeError, RasterError};
use std::path::PathBuf;
use thiserror::Error;

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Flattened image data (PNG format).
    pub image_data: Vec<u8>,
    /// Path where the image was written.
    pub saved_path: PathBuf,
}

/// Errors that can occur while producing or saving an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to compose image: {0}")]
    Compose(#[from] ComposeError),

    #[error("Failed to capture ink layer: {0}")]
    Ink(#[from] RasterError),

    #[error("Failed to save image: {0}")]
    SaveError(#[from] std::io::Error),
}
