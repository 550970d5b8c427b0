//! Level descriptions and loaded levels
//!
//! A [`LevelDescription`] is the external JSON shape served for a level id. It
//! is turned into a [`Level`] exactly once; nothing refers back to the
//! description afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{Obstacle, ObstacleStyle, TriggerZone, ZoneKind};
use super::layout;
use super::player::Player;
use super::rect::Rect;
use crate::consts::DEFAULT_GOAL_SIZE;
use crate::error::LevelError;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDesc {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalDesc {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDesc {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Visual tag, blocks only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ObstacleStyle>,
}

impl RectDesc {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            style: None,
        }
    }

    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// The level as served by the level service
///
/// Every field is optional at the parsing layer so that a missing field
/// surfaces as [`LevelError::MissingField`] naming it, rather than as a bare
/// JSON error. An empty `blocks` or `traps` array is fine; an absent one is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescription {
    pub player_start: Option<PointDesc>,
    pub goal: Option<GoalDesc>,
    pub blocks: Option<Vec<RectDesc>>,
    pub traps: Option<Vec<RectDesc>>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A loaded, playable level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    spawn: Vec2,
    size: Vec2,
    pub player: Player,
    /// Solid geometry, in resolution order
    obstacles: Vec<Obstacle>,
    /// Hazards and goal, in check order
    zones: Vec<TriggerZone>,
}

impl Level {
    /// Assemble a level from already-built parts
    pub fn new(
        id: u32,
        spawn: Vec2,
        size: Vec2,
        obstacles: Vec<Obstacle>,
        zones: Vec<TriggerZone>,
        tuning: &Tuning,
    ) -> Result<Self, LevelError> {
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(LevelError::InvalidBounds {
                width: size.x,
                height: size.y,
            });
        }
        let player = Player::new(spawn, tuning).map_err(LevelError::Player)?;

        Ok(Self {
            id,
            spawn,
            size,
            player,
            obstacles,
            zones,
        })
    }

    /// Build a level from its description
    pub fn load(id: u32, desc: &LevelDescription, tuning: &Tuning) -> Result<Self, LevelError> {
        let start = desc
            .player_start
            .ok_or(LevelError::MissingField("playerStart"))?;
        let goal = desc.goal.ok_or(LevelError::MissingField("goal"))?;
        let blocks = desc
            .blocks
            .as_ref()
            .ok_or(LevelError::MissingField("blocks"))?;
        let traps = desc
            .traps
            .as_ref()
            .ok_or(LevelError::MissingField("traps"))?;
        let width = desc.width.ok_or(LevelError::MissingField("width"))?;
        let height = desc.height.ok_or(LevelError::MissingField("height"))?;

        let obstacles = blocks
            .iter()
            .enumerate()
            .map(|(index, b)| {
                Obstacle::new(b.rect(), b.style.unwrap_or_default()).map_err(|source| {
                    LevelError::Geometry {
                        what: "block",
                        index,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut zones = traps
            .iter()
            .enumerate()
            .map(|(index, t)| {
                TriggerZone::hazard(t.rect()).map_err(|source| LevelError::Geometry {
                    what: "trap",
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let goal_rect = Rect::new(
            goal.x,
            goal.y,
            goal.width.unwrap_or(DEFAULT_GOAL_SIZE),
            goal.height.unwrap_or(DEFAULT_GOAL_SIZE),
        );
        zones.push(TriggerZone::goal(goal_rect).map_err(|source| LevelError::Geometry {
            what: "goal",
            index: 0,
            source,
        })?);

        let level = Self::new(
            id,
            Vec2::new(start.x, start.y),
            Vec2::new(width, height),
            obstacles,
            zones,
            tuning,
        )?;

        log::info!(
            "Loaded level {}: {}x{}, {} blocks, {} traps",
            id,
            width,
            height,
            blocks.len(),
            traps.len()
        );
        Ok(level)
    }

    /// Parse a JSON description and load it
    pub fn from_json(id: u32, json: &str, tuning: &Tuning) -> Result<Self, LevelError> {
        Self::load(id, &LevelDescription::from_json(json)?, tuning)
    }

    /// Load one of the levels bundled as grid layouts
    pub fn builtin(id: u32, tuning: &Tuning) -> Result<Self, LevelError> {
        let desc = layout::builtin_level(id)?;
        Self::load(id, &desc, tuning)
    }

    #[inline]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Level width and height
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn zones(&self) -> &[TriggerZone] {
        &self.zones
    }

    pub fn goal(&self) -> Option<&TriggerZone> {
        self.zones.iter().find(|z| z.kind == ZoneKind::Goal)
    }

    /// The player plus the read-only geometry it moves through
    pub fn split_mut(&mut self) -> (&mut Player, &[Obstacle], &[TriggerZone]) {
        (&mut self.player, &self.obstacles, &self.zones)
    }
}
