//! Freehand ink strokes.

use super::color::Color;
use serde::{Deserialize, Serialize};

/// A freehand polyline traced by pointer or stylus input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Sequence of (x, y) canvas coordinates in input order
    pub points: Vec<(i32, i32)>,
    /// Stroke color
    pub color: Color,
    /// Line thickness in pixels
    pub thick: f64,
}

impl Stroke {
    pub fn new(start: (i32, i32), color: Color, thick: f64) -> Self {
        Self {
            points: vec![start],
            color,
            thick,
        }
    }

    /// Appends a point, skipping exact repeats of the last one.
    pub fn push(&mut self, point: (i32, i32)) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
