//! Axis-aligned rectangles in level space
//!
//! Level space has its origin at the top-left, x growing right and y growing
//! down, measured in pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle, rejecting non-positive or non-finite extents
    pub fn checked(x: f32, y: f32, width: f32, height: f32) -> Result<Self, GeometryError> {
        Self::new(x, y, width, height).validate()
    }

    /// Rectangle from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Return self if it has positive finite extents
    pub fn validate(self) -> Result<Self, GeometryError> {
        let parts = [self.x, self.y, self.width, self.height];
        if parts.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(GeometryError::Degenerate {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Strict overlap test; shared edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// Width of the shared horizontal span (negative when apart)
    #[inline]
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }
}

/// AABB overlap: true only when the boxes intersect with positive area on
/// both axes
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}
