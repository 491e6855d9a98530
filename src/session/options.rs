use crate::config::{SessionConfig, SessionStorageMode};
use crate::export::file::expand_tilde;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

const SESSION_FILE_STEM: &str = "session";

/// Runtime options derived from configuration for session persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub base_dir: PathBuf,
}

impl SessionOptions {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn session_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{SESSION_FILE_STEM}.json"))
    }

    pub fn lock_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{SESSION_FILE_STEM}.lock"))
    }
}

/// Build runtime session options from configuration values.
pub fn options_from_config(session_cfg: &SessionConfig, config_dir: &Path) -> Result<SessionOptions> {
    let base_dir = match session_cfg.storage {
        SessionStorageMode::Auto => {
            let root = dirs::data_dir().unwrap_or_else(|| config_dir.to_path_buf());
            root.join("photo-annotator")
        }
        SessionStorageMode::Config => config_dir.to_path_buf(),
        SessionStorageMode::Custom => {
            let raw = session_cfg.custom_directory.as_ref().ok_or_else(|| {
                anyhow!("session.custom_directory must be set when storage = \"custom\"")
            })?;
            let expanded = expand_tilde(raw);
            if expanded.as_os_str().is_empty() {
                return Err(anyhow!(
                    "session.custom_directory resolved to an empty path"
                ));
            }
            expanded
        }
    };

    Ok(SessionOptions::new(base_dir))
}
