//! Configuration type definitions.

use super::enums::{ColorSpec, SessionStorageMode};
use crate::draw::FontDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Text overlay appearance.
///
/// New overlays start with `default_text_color`; the font applies to every
/// overlay, bold ones included.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Font family name for overlay text (e.g., "Sans", "Serif", "JetBrains Mono")
    /// Falls back to the system default if the family is not installed
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Overlay font size in points (valid range: 8.0 - 72.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Color of newly added overlays - a named color or an RGB array
    #[serde(default = "default_text_color")]
    pub default_text_color: ColorSpec,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            default_text_color: default_text_color(),
        }
    }
}

impl DrawingConfig {
    pub fn font_descriptor(&self) -> FontDescriptor {
        FontDescriptor::new(self.font_family.clone(), self.font_size)
    }
}

/// Freehand ink pen settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InkConfig {
    /// Pen color for new strokes
    #[serde(default = "default_ink_color")]
    pub default_color: ColorSpec,

    /// Pen thickness in pixels (valid range: 1.0 - 40.0)
    #[serde(default = "default_thickness")]
    pub thickness: f64,
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            default_color: default_ink_color(),
            thickness: default_thickness(),
        }
    }
}

/// Where and how flattened images are written.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for saved images (supports `~/`)
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// Filename template using chrono format specifiers; `.png` is appended
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Fill for canvas areas not covered by the photo. Transparent when unset
    #[serde(default)]
    pub letterbox_color: Option<ColorSpec>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
            letterbox_color: None,
        }
    }
}

/// Persistence of the signed-in flag.
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct SessionConfig {
    /// Storage location: "auto", "config" or "custom"
    #[serde(default)]
    pub storage: SessionStorageMode,

    /// Directory used when `storage = "custom"`
    #[serde(default)]
    pub custom_directory: Option<String>,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_size() -> f64 {
    30.0
}

fn default_text_color() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_ink_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_thickness() -> f64 {
    5.0
}

fn default_save_directory() -> String {
    "~/Pictures/PhotoAnnotator".to_string()
}

fn default_filename_template() -> String {
    "annotated_%Y-%m-%d_%H%M%S".to_string()
}
