//! Rendering primitives and composition (Cairo-based).
//!
//! This module defines the drawing types used by the editor:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`FontDescriptor`] / [`TextWeight`]: how overlay text is set
//! - [`Stroke`]: a freehand ink polyline
//! - [`CompositionEngine`]: flattens a document into one PNG

pub mod color;
pub mod compose;
pub mod font;
pub mod raster;
pub mod render;
pub mod stroke;

// Re-export commonly used types at module level
pub use color::Color;
pub use compose::{ComposeError, CompositionEngine};
pub use font::{FontDescriptor, TextWeight};
pub use raster::RasterError;
pub use stroke::Stroke;

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
