//! Session persistence (save/restore) support.
//!
//! Keeps the "user is signed in" flag across restarts: a small JSON file
//! written under an exclusive lock via temp file and rename.

mod options;
mod state;
mod storage;

pub use options::{SessionOptions, options_from_config};
pub use state::SessionState;
pub use storage::{ClearOutcome, SessionInspection, SessionStore};
