//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, velocities in pixels per tick
//! - Stable iteration order (list order of obstacles and zones)
//! - No rendering, platform or I/O dependencies

pub mod collision;
pub mod entities;
pub mod input;
pub mod layout;
pub mod level;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Body, ContactInfo, resolve_horizontal, resolve_obstacles, resolve_vertical};
pub use entities::{Obstacle, ObstacleStyle, TriggerZone, ZoneKind};
pub use input::{Actions, InputSnapshot};
pub use level::{Level, LevelDescription};
pub use player::{Afterimage, Player, PlayerState, PlayerVisual};
pub use rect::{Rect, overlaps};
pub use state::{CompletionEvent, DrawSnapshot, GameEvent, GamePhase, GameState};
pub use tick::tick;
