use super::options::SessionOptions;
use super::state::SessionState;
use anyhow::{Context, Result};
use chrono::Utc;
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    last_modified: Option<String>,
    #[serde(default)]
    signed_in: bool,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// Result of clearing on-disk session data.
#[derive(Debug, Clone, Copy)]
pub struct ClearOutcome {
    pub removed_session: bool,
    pub removed_lock: bool,
}

/// Summary information about the session file for CLI reporting.
#[derive(Debug, Clone)]
pub struct SessionInspection {
    pub session_path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
    pub last_modified: Option<String>,
    pub signed_in: bool,
}

/// Reads and writes the persisted [`SessionState`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    options: SessionOptions,
}

impl SessionStore {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Loads the persisted state. A missing file means signed out.
    pub fn load(&self) -> Result<SessionState> {
        let session_path = self.options.session_file_path();
        if !session_path.exists() {
            debug!(
                "No session file present at {}, starting signed out",
                session_path.display()
            );
            return Ok(SessionState::default());
        }

        let file = self.with_lock(false, || read_session_file(&session_path))?;
        Ok(SessionState::new(file.signed_in))
    }

    /// Persists `state` atomically (temp file, then rename).
    pub fn save(&self, state: &SessionState) -> Result<()> {
        fs::create_dir_all(&self.options.base_dir).with_context(|| {
            format!(
                "failed to create session directory {}",
                self.options.base_dir.display()
            )
        })?;

        let session_path = self.options.session_file_path();
        self.with_lock(true, || write_session_file(&session_path, state))
    }

    /// Remove persisted session files (session and lock).
    pub fn clear(&self) -> Result<ClearOutcome> {
        let removed_session = remove_file_if_exists(&self.options.session_file_path())?;
        let removed_lock = remove_file_if_exists(&self.options.lock_file_path())?;
        Ok(ClearOutcome {
            removed_session,
            removed_lock,
        })
    }

    /// Inspect the current session file for CLI reporting.
    pub fn inspect(&self) -> Result<SessionInspection> {
        let session_path = self.options.session_file_path();
        let metadata = fs::metadata(&session_path).ok();
        let exists = metadata.is_some();

        let mut last_modified = None;
        let mut signed_in = false;
        if exists {
            let file = self.with_lock(false, || read_session_file(&session_path))?;
            last_modified = file.last_modified;
            signed_in = file.signed_in;
        }

        Ok(SessionInspection {
            size_bytes: metadata.as_ref().map(|m| m.len()),
            modified: metadata.as_ref().and_then(|m| m.modified().ok()),
            session_path,
            exists,
            last_modified,
            signed_in,
        })
    }

    fn with_lock<T>(&self, exclusive: bool, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_path = self.options.lock_file_path();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open session lock file {}", lock_path.display()))?;
        if exclusive {
            lock_file
                .lock_exclusive()
                .with_context(|| format!("failed to lock session file {}", lock_path.display()))?;
        } else {
            lock_file
                .lock_shared()
                .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;
        }

        let result = f();

        lock_file.unlock().unwrap_or_else(|err| {
            warn!(
                "failed to unlock session file {}: {}",
                lock_path.display(),
                err
            )
        });

        result
    }
}

fn read_session_file(session_path: &Path) -> Result<SessionFile> {
    let bytes = fs::read(session_path)
        .with_context(|| format!("failed to read session file {}", session_path.display()))?;
    let file: SessionFile =
        serde_json::from_slice(&bytes).context("failed to parse session json")?;
    if file.version > CURRENT_VERSION {
        warn!(
            "Session file {} has newer version {} (expected {}); reading best effort",
            session_path.display(),
            file.version,
            CURRENT_VERSION
        );
    }
    Ok(file)
}

fn write_session_file(session_path: &Path, state: &SessionState) -> Result<()> {
    let payload = SessionFile {
        version: CURRENT_VERSION,
        last_modified: Some(Utc::now().to_rfc3339()),
        signed_in: state.is_signed_in(),
    };
    let json_bytes = serde_json::to_vec_pretty(&payload).context("failed to serialise session")?;

    let tmp_path = temp_path(session_path);
    {
        let mut tmp_file: File = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!(
                    "failed to open temporary session file {}",
                    tmp_path.display()
                )
            })?;
        tmp_file
            .write_all(&json_bytes)
            .context("failed to write session payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary session file")?;
    }

    fs::rename(&tmp_path, session_path).with_context(|| {
        format!(
            "failed to move temporary session file {} -> {}",
            tmp_path.display(),
            session_path.display()
        )
    })?;

    info!(
        "Session saved to {} (signed_in={})",
        session_path.display(),
        state.is_signed_in()
    );
    Ok(())
}

fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
