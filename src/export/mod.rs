//! Delivery of flattened images to the platform's save facility.

pub mod file;
pub mod types;

pub use file::SaveLocation;
pub use types::{ExportError, ExportResult};

use std::path::PathBuf;

/// Abstraction over where exported images end up. Mocked in tests.
pub trait ExportSink: Send + Sync {
    fn export(&self, image_data: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes exports to disk, either into a directory under a generated name or
/// to one fixed path.
#[derive(Debug, Clone)]
pub enum FileExportSink {
    Directory(SaveLocation),
    Path(PathBuf),
}

impl Default for FileExportSink {
    fn default() -> Self {
        Self::Directory(SaveLocation::default())
    }
}

impl ExportSink for FileExportSink {
    fn export(&self, image_data: &[u8]) -> Result<PathBuf, ExportError> {
        match self {
            FileExportSink::Directory(location) => file::save_to_directory(image_data, location),
            FileExportSink::Path(path) => {
                file::write_image(image_data, path)?;
                Ok(path.clone())
            }
        }
    }
}
