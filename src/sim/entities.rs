//! Static level geometry: solid obstacles and non-solid trigger zones

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::error::GeometryError;

/// Visual tag for an obstacle; has no effect on collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleStyle {
    #[default]
    Wall,
    Platform,
}

/// An immovable solid rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    bounds: Rect,
    pub style: ObstacleStyle,
}

impl Obstacle {
    pub fn new(bounds: Rect, style: ObstacleStyle) -> Result<Self, GeometryError> {
        Ok(Self {
            bounds: bounds.validate()?,
            style,
        })
    }

    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }
}

/// What happens when the player enters a trigger zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Sends the player back to spawn unless invincible
    Hazard,
    /// Completes the level
    Goal,
}

/// A non-solid rectangle that fires an effect on overlap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerZone {
    bounds: Rect,
    pub kind: ZoneKind,
}

impl TriggerZone {
    pub fn new(bounds: Rect, kind: ZoneKind) -> Result<Self, GeometryError> {
        Ok(Self {
            bounds: bounds.validate()?,
            kind,
        })
    }

    pub fn hazard(bounds: Rect) -> Result<Self, GeometryError> {
        Self::new(bounds, ZoneKind::Hazard)
    }

    pub fn goal(bounds: Rect) -> Result<Self, GeometryError> {
        Self::new(bounds, ZoneKind::Goal)
    }

    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Check if the zone fires for a player occupying `player`
    #[inline]
    pub fn contains(&self, player: &Rect) -> bool {
        self.bounds.overlaps(player)
    }
}
