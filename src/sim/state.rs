//! Session state and the types handed to collaborators
//!
//! Nothing in here is persisted across runs; a session lives as long as the
//! level is loaded.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{ObstacleStyle, ZoneKind};
use super::level::Level;
use super::player::PlayerVisual;
use super::rect::Rect;
use crate::ticks_to_ms;
use crate::tuning::Tuning;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the simulation
    Playing,
    /// Goal reached; ticks are ignored until restart
    Completed,
}

/// Emitted once when the goal is reached, for the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub level_id: u32,
    pub time_ms: u64,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player touched the goal
    Completed(CompletionEvent),
    /// The player touched a hazard and was sent back to spawn from `from`
    Respawned { from: Vec2 },
}

/// A level being played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub level: Level,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation ticks since the session (re)started
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(level: Level, tuning: Tuning) -> Self {
        Self {
            level,
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
        }
    }

    /// Session time derived from the tick counter
    pub fn elapsed_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks)
    }

    /// Start the level over with a fresh player and a zeroed clock
    pub fn restart(&mut self) {
        let spawn = self.level.spawn();
        self.level.player.reset(spawn, &self.tuning);
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        log::info!("Level {} restarted", self.level.id);
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> DrawSnapshot {
        let player = &self.level.player;
        let lifetime = self.tuning.afterimage_lifetime_ticks;

        DrawSnapshot {
            level_size: self.level.size(),
            player: PlayerDrawable {
                bounds: player.bounds(),
                visual: player.visual(),
                afterimages: player
                    .afterimages
                    .iter()
                    .map(|image| AfterimageDrawable {
                        bounds: Rect::from_pos_size(image.pos, player.body.size),
                        opacity: image.fade(lifetime),
                    })
                    .collect(),
            },
            obstacles: self
                .level
                .obstacles()
                .iter()
                .map(|o| ObstacleDrawable {
                    bounds: *o.bounds(),
                    style: o.style,
                })
                .collect(),
            zones: self
                .level
                .zones()
                .iter()
                .map(|z| ZoneDrawable {
                    bounds: *z.bounds(),
                    kind: z.kind,
                })
                .collect(),
            phase: self.phase,
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfterimageDrawable {
    pub bounds: Rect,
    /// 0.0 (gone) to 1.0 (fresh)
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDrawable {
    pub bounds: Rect,
    pub visual: PlayerVisual,
    pub afterimages: Vec<AfterimageDrawable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleDrawable {
    pub bounds: Rect,
    pub style: ObstacleStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDrawable {
    pub bounds: Rect,
    pub kind: ZoneKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawSnapshot {
    pub level_size: Vec2,
    pub player: PlayerDrawable,
    pub obstacles: Vec<ObstacleDrawable>,
    pub zones: Vec<ZoneDrawable>,
    pub phase: GamePhase,
    pub elapsed_ms: u64,
}
