//! Text overlay entity.

use crate::draw::{Color, TextWeight};
use serde::{Deserialize, Serialize};
use std::ops::Add;
use uuid::Uuid;

/// 2D offset relative to the canvas origin (top-left), in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A single styled, positionable text annotation.
///
/// `position` tracks the live drag location while `committed_position` is the
/// baseline each new drag starts from; the two only diverge mid-drag.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    id: Uuid,
    pub text: String,
    pub is_bold: bool,
    pub text_color: Color,
    pub(crate) position: Offset,
    pub(crate) committed_position: Offset,
    pub(crate) is_committed: bool,
}

impl TextOverlay {
    /// Creates a draft overlay: empty text, not committed, at the origin.
    pub fn draft(text_color: Color) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: String::new(),
            is_bold: false,
            text_color,
            position: Offset::ZERO,
            committed_position: Offset::ZERO,
            is_committed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn committed_position(&self) -> Offset {
        self.committed_position
    }

    pub fn is_committed(&self) -> bool {
        self.is_committed
    }

    /// Drafts have never been confirmed and are excluded from exports.
    pub fn is_draft(&self) -> bool {
        !self.is_committed
    }

    pub fn weight(&self) -> TextWeight {
        TextWeight::from_bold(self.is_bold)
    }
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self::draft(Color::default())
    }
}
