//! Font descriptor for overlay text rendering.

use serde::{Deserialize, Serialize};

/// Weight used when drawing a text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextWeight {
    #[default]
    Regular,
    Bold,
}

impl TextWeight {
    pub fn from_bold(is_bold: bool) -> Self {
        if is_bold { Self::Bold } else { Self::Regular }
    }
}

/// Font configuration for text rendering.
///
/// Every overlay is drawn with the same family and size; only the weight
/// varies per overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "JetBrains Mono")
    pub family: String,

    /// Font size in points
    pub size: f64,
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family [Bold] Size", e.g. "Sans Bold 30" or "Monospace 24".
    pub fn to_pango_string(&self, weight: TextWeight) -> String {
        let mut parts = vec![self.family.clone()];

        if weight == TextWeight::Bold {
            parts.push("Bold".to_string());
        }

        parts.push(format!("{}", self.size.round() as i32));

        parts.join(" ")
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Sans", 30.0)
    }
}
