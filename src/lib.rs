//! Photo annotation editor core.
//!
//! A picked photo is annotated with freehand ink and draggable styled text
//! overlays, then flattened into one PNG. The editor sits behind an
//! identity-provider sign-in whose "signed in" flag persists across restarts.

pub mod app;
pub mod auth;
pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod session;

pub use app::{PhotoEditorApp, Screen};
pub use config::Config;
