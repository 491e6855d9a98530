//! Scripted editing sessions for headless rendering.
//!
//! A script is a TOML file with a list of `[[step]]` tables replayed against
//! an [`EditorController`] in order:
//!
//! ```toml
//! [[step]]
//! action = "stroke"
//! points = [[10, 10], [120, 80]]
//! color = "red"
//!
//! [[step]]
//! action = "add-text"
//! text = "Hello"
//! bold = true
//! at = [40.0, 60.0]
//! ```

use super::controller::EditorController;
use super::document::DocumentError;
use super::ink::StrokeCanvas;
use super::overlay::Offset;
use crate::config::ColorSpec;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read edit script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse edit script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: DocumentError,
    },

    #[error("Step {step}: no photo loaded")]
    NotEditing { step: usize },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditScript {
    #[serde(default, rename = "step")]
    pub steps: Vec<EditStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum EditStep {
    /// Freehand ink polyline.
    Stroke {
        points: Vec<[i32; 2]>,
        color: Option<ColorSpec>,
        thickness: Option<f64>,
    },
    /// New overlay, committed immediately unless `cancel` is set.
    AddText {
        text: String,
        #[serde(default)]
        bold: bool,
        color: Option<ColorSpec>,
        at: Option<[f64; 2]>,
        #[serde(default)]
        cancel: bool,
    },
    /// Reopen an overlay and replace its text.
    EditText {
        index: usize,
        text: String,
        #[serde(default)]
        cancel: bool,
    },
    Drag { index: usize, dx: f64, dy: f64 },
    ToggleBold { index: usize },
    SetColor { index: usize, color: ColorSpec },
}

impl EditScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies every step through the controller's gesture methods, exactly
    /// as an interactive session would.
    pub fn replay(&self, controller: &mut EditorController<StrokeCanvas>) -> Result<(), ScriptError> {
        for (step, action) in self.steps.iter().enumerate() {
            log::debug!("Replaying step {}: {:?}", step, action);
            apply_step(controller, action).map_err(|source| match source {
                StepFailure::Document(source) => ScriptError::Step { step, source },
                StepFailure::NotEditing => ScriptError::NotEditing { step },
            })?;
        }
        Ok(())
    }
}

enum StepFailure {
    Document(DocumentError),
    NotEditing,
}

impl From<DocumentError> for StepFailure {
    fn from(err: DocumentError) -> Self {
        StepFailure::Document(err)
    }
}

fn apply_step(
    controller: &mut EditorController<StrokeCanvas>,
    step: &EditStep,
) -> Result<(), StepFailure> {
    match step {
        EditStep::Stroke {
            points,
            color,
            thickness,
        } => {
            let ink = controller.ink_mut();
            if let Some(color) = color {
                ink.pen_color = color.to_color();
            }
            if let Some(thickness) = thickness {
                ink.pen_thickness = *thickness;
            }
            let mut points = points.iter();
            let Some([x, y]) = points.next() else {
                return Ok(());
            };
            if !ink.begin_stroke(*x, *y) {
                return Err(StepFailure::NotEditing);
            }
            for [x, y] in points {
                ink.extend_stroke(*x, *y);
            }
            ink.end_stroke();
        }
        EditStep::AddText {
            text,
            bold,
            color,
            at,
            cancel,
        } => {
            let index = controller.add_text().ok_or(StepFailure::NotEditing)?;
            controller.text_changed(text.as_str())?;
            if *bold {
                controller.toggle_bold()?;
            }
            if let Some(color) = color {
                controller.color_chosen(color.to_color())?;
            }
            if *cancel {
                controller.cancel_text();
                return Ok(());
            }
            controller.confirm_text()?;
            if let Some([x, y]) = at {
                drag(controller, index, Offset::new(*x, *y))?;
            }
        }
        EditStep::EditText {
            index,
            text,
            cancel,
        } => {
            open(controller, *index)?;
            controller.text_changed(text.as_str())?;
            if *cancel {
                controller.cancel_text();
            } else {
                controller.confirm_text()?;
            }
        }
        EditStep::Drag { index, dx, dy } => {
            drag(controller, *index, Offset::new(*dx, *dy))?;
        }
        EditStep::ToggleBold { index } => {
            open(controller, *index)?;
            controller.toggle_bold()?;
            controller.confirm_text()?;
        }
        EditStep::SetColor { index, color } => {
            open(controller, *index)?;
            controller.color_chosen(color.to_color())?;
            controller.confirm_text()?;
        }
    }
    Ok(())
}

fn open(controller: &mut EditorController<StrokeCanvas>, index: usize) -> Result<(), StepFailure> {
    if controller.state() != super::EditorState::Editing {
        return Err(StepFailure::NotEditing);
    }
    controller.long_press(index)?;
    Ok(())
}

fn drag(
    controller: &mut EditorController<StrokeCanvas>,
    index: usize,
    delta: Offset,
) -> Result<(), StepFailure> {
    controller.drag_began(index)?;
    controller.drag_changed(index, delta)?;
    controller.drag_ended(index)?;
    Ok(())
}
