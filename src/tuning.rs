//! Physics tuning
//!
//! Every constant the player and collision code reads lives here so a level
//! designer can override it from a JSON file without a rebuild. Missing keys
//! fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::persistence;

/// Which way a wall-jump pushes the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WallJumpPolicy {
    /// Push away from the wall that was touched
    #[default]
    AwayFromWall,
    /// Push against the held horizontal direction, falling back to away-from-wall
    /// when no direction is held
    OppositeInput,
}

impl WallJumpPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallJumpPolicy::AwayFromWall => "away-from-wall",
            WallJumpPolicy::OppositeInput => "opposite-input",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "away-from-wall" | "wall" => Some(WallJumpPolicy::AwayFromWall),
            "opposite-input" | "input" => Some(WallJumpPolicy::OppositeInput),
            _ => None,
        }
    }
}

/// Physics constants, in pixels and ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Body ===
    /// Player box edge length (the box is square)
    pub player_size: f32,

    // === Horizontal ===
    /// Run speed (pixels per tick)
    pub run_speed: f32,

    // === Vertical ===
    /// Velocity set on jump (negative is up)
    pub jump_velocity: f32,
    /// Added to vertical velocity every non-dash tick
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Largest upward speed
    pub max_rise_speed: f32,
    /// Fall speed cap while touching a wall
    pub wall_slide_speed: f32,

    // === Wall jump ===
    /// Horizontal push-off as a multiple of run speed
    pub wall_jump_push: f32,
    /// Ticks of ignored horizontal input after a wall-jump
    pub wall_jump_cooldown_ticks: u32,
    pub wall_jump_policy: WallJumpPolicy,

    // === Dash ===
    pub dash_speed: f32,
    /// Distance covered by one dash
    pub dash_distance: f32,
    /// Ticks between afterimage samples
    pub afterimage_interval_ticks: u32,
    /// Ticks an afterimage stays visible
    pub afterimage_lifetime_ticks: u32,

    // === Collision ===
    /// How far below an obstacle's top the previous bottom edge may sit and
    /// still count as a landing
    pub landing_epsilon: f32,
    /// Minimum horizontal overlap for a landing; narrower hits are resolved
    /// sideways
    pub min_landing_overlap: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 28.0,

            run_speed: 2.5,

            jump_velocity: -8.0,
            gravity: 0.4,
            max_fall_speed: 3.5,
            max_rise_speed: 8.0,
            wall_slide_speed: 0.6,

            wall_jump_push: 1.5,
            // 150 ms at 60 Hz
            wall_jump_cooldown_ticks: 9,
            wall_jump_policy: WallJumpPolicy::AwayFromWall,

            dash_speed: 8.0,
            dash_distance: 128.0,
            // About 33 ms and 400 ms at 60 Hz
            afterimage_interval_ticks: 2,
            afterimage_lifetime_ticks: 24,

            landing_epsilon: 0.5,
            min_landing_overlap: 4.0,
        }
    }
}

impl Tuning {
    /// Tuning with a different player box size
    pub fn with_player_size(size: f32) -> Self {
        Self {
            player_size: size,
            ..Self::default()
        }
    }

    /// Parse tuning from JSON; absent keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let tuning: Tuning = persistence::load_json(path)?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("player_size", self.player_size)?;
        positive("run_speed", self.run_speed)?;
        positive("gravity", self.gravity)?;
        positive("max_fall_speed", self.max_fall_speed)?;
        positive("max_rise_speed", self.max_rise_speed)?;
        positive("dash_speed", self.dash_speed)?;
        positive("dash_distance", self.dash_distance)?;
        non_negative("wall_slide_speed", self.wall_slide_speed)?;
        non_negative("wall_jump_push", self.wall_jump_push)?;
        non_negative("landing_epsilon", self.landing_epsilon)?;
        non_negative("min_landing_overlap", self.min_landing_overlap)?;

        if !(self.jump_velocity.is_finite() && self.jump_velocity < 0.0) {
            return Err(TuningError::OutOfRange {
                name: "jump_velocity",
                requirement: "negative (upward)",
                value: self.jump_velocity,
            });
        }
        if self.min_landing_overlap >= self.player_size {
            return Err(TuningError::OutOfRange {
                name: "min_landing_overlap",
                requirement: "smaller than player_size",
                value: self.min_landing_overlap,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            requirement: "positive",
            value,
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            requirement: "zero or positive",
            value,
        })
    }
}
