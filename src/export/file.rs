//! Writing flattened PNGs to disk.

use super::types::ExportError;
use crate::config::ExportConfig;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "png";

/// Directory and naming scheme for exports saved under generated names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLocation {
    pub directory: PathBuf,
    /// chrono format string; the extension is appended
    pub filename_template: String,
}

impl Default for SaveLocation {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl SaveLocation {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            directory: expand_tilde(&config.save_directory),
            filename_template: config.filename_template.clone(),
        }
    }

    /// Picks a path in `directory` that no existing file occupies.
    ///
    /// Two saves within the same template tick get `-1`, `-2`, ... suffixes.
    pub fn next_free_path(&self, now: DateTime<Local>) -> PathBuf {
        let stem = file_stem(&self.filename_template, now);
        let mut candidate = self.directory.join(format!("{stem}.{EXTENSION}"));
        let mut counter = 1u32;
        while candidate.exists() {
            candidate = self
                .directory
                .join(format!("{stem}-{counter}.{EXTENSION}"));
            counter += 1;
        }
        candidate
    }
}

/// Expands the template at `now`, keeping the result a single path component.
fn file_stem(template: &str, now: DateTime<Local>) -> String {
    let stem: String = now
        .format(template)
        .to_string()
        .chars()
        .map(|c| if std::path::is_separator(c) { '-' } else { c })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() || stem == "." || stem == ".." {
        "annotated".to_string()
    } else {
        stem.to_string()
    }
}

/// Saves `image_data` into the location's directory under a fresh name.
pub fn save_to_directory(image_data: &[u8], location: &SaveLocation) -> Result<PathBuf, ExportError> {
    if !location.directory.exists() {
        log::info!("Creating export directory: {}", location.directory.display());
        fs::create_dir_all(&location.directory)?;
    }
    let path = location.next_free_path(Local::now());
    write_image(image_data, &path)?;
    Ok(path)
}

/// Writes `image_data` to `path`, creating missing parent directories.
///
/// The file is readable by its owner only.
pub fn write_image(image_data: &[u8], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, image_data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    log::info!("Exported {} bytes to {}", image_data.len(), path.display());
    Ok(())
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
