//! Photo source for new editing sessions.

use std::fs;
use std::path::PathBuf;

/// Yields raw image bytes, or `None` when the user cancels.
pub trait ImagePicker {
    fn pick_image(&mut self) -> Option<Vec<u8>>;
}

/// Picks a photo from disk. A missing or unreadable file counts as a cancel.
#[derive(Debug, Clone, Default)]
pub struct FileImagePicker {
    path: Option<PathBuf>,
}

impl FileImagePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ImagePicker for FileImagePicker {
    fn pick_image(&mut self) -> Option<Vec<u8>> {
        let path = self.path.as_ref()?;
        match fs::read(path) {
            Ok(bytes) => {
                log::info!("Picked image {} ({} bytes)", path.display(), bytes.len());
                Some(bytes)
            }
            Err(err) => {
                log::warn!("Failed to read image {}: {}", path.display(), err);
                None
            }
        }
    }
}
