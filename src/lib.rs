//! Wallhop - a 2D platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player kinematics, collisions, triggers)
//! - `tuning`: Data-driven physics constants
//! - `leaderboard`: Per-level best completion times
//! - `persistence`: JSON load/save with atomic writes and backup rotation
//!
//! Rendering, menus and raw input plumbing live outside this crate. The core
//! consumes an [`sim::InputSnapshot`] per tick and hands back a
//! [`sim::DrawSnapshot`] plus [`sim::GameEvent`]s.

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{GeometryError, LayoutError, LevelError, StorageError, TuningError};
pub use leaderboard::Leaderboard;
pub use tuning::{Tuning, WallJumpPolicy};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate. All velocities are pixels per tick.
    pub const TICK_RATE_HZ: u64 = 60;

    /// Grid cell size for layout-authored levels
    pub const TILE_SIZE: f32 = 32.0;
    /// Goal size when the level description omits it
    pub const DEFAULT_GOAL_SIZE: f32 = 32.0;

    /// Leaderboard entries kept per level
    pub const MAX_SCORES_PER_LEVEL: usize = 5;
}

/// Convert a tick count into elapsed milliseconds of session time
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / consts::TICK_RATE_HZ
}
