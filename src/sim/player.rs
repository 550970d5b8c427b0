//! The player entity
//!
//! One tick of player logic is split in two so collision can run in between:
//!
//! 1. [`Player::update`] turns input into velocity, applies gravity or dash
//!    motion, integrates, and clamps to the level box.
//! 2. The caller resolves obstacles and feeds every [`ContactInfo`] back
//!    through [`Player::apply_contact`].
//!
//! `contact` therefore always describes the tick that just finished. The next
//! `update` reads it (can I jump? which wall am I on?) and then clears it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Body, ContactInfo};
use super::input::{Actions, InputSnapshot};
use super::rect::Rect;
use crate::error::GeometryError;
use crate::tuning::{Tuning, WallJumpPolicy};

/// Maximum afterimages kept for rendering
pub const MAX_AFTERIMAGES: usize = 16;

/// Coarse movement state, derived from the player's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded,
    Airborne,
    WallContact,
    Dashing,
}

/// How the renderer should draw the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerVisual {
    Normal,
    Dashing,
}

/// A fading copy of the player left behind while dashing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Afterimage {
    pub pos: Vec2,
    pub age_ticks: u32,
}

impl Afterimage {
    /// Remaining opacity, 1.0 when fresh down to 0.0 at end of life
    pub fn fade(&self, lifetime_ticks: u32) -> f32 {
        if lifetime_ticks == 0 {
            return 0.0;
        }
        (1.0 - self.age_ticks as f32 / lifetime_ticks as f32).clamp(0.0, 1.0)
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Surfaces touched during the last completed tick
    pub contact: ContactInfo,
    pub can_jump: bool,

    pub dashing: bool,
    pub dash_available: bool,
    /// -1 left, 1 right
    pub dash_dir: i8,
    pub dash_traveled: f32,
    pub dash_distance: f32,
    /// Hazards are ignored while set; only ever true during a dash
    pub invincible: bool,

    /// Ticks left during which horizontal input is ignored
    wall_jump_cooldown: u32,

    /// Dash trail, newest last
    #[serde(skip)]
    pub afterimages: Vec<Afterimage>,
    #[serde(skip)]
    ticks_since_afterimage: u32,
}

impl Player {
    /// Create a player at `spawn`. The box size comes from `tuning`.
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Result<Self, GeometryError> {
        let bounds = Rect::checked(spawn.x, spawn.y, tuning.player_size, tuning.player_size)?;
        Ok(Self {
            body: Body::new(bounds.pos(), bounds.size()),
            contact: ContactInfo::NONE,
            can_jump: false,
            dashing: false,
            dash_available: true,
            dash_dir: 1,
            dash_traveled: 0.0,
            dash_distance: tuning.dash_distance,
            invincible: false,
            wall_jump_cooldown: 0,
            afterimages: Vec::with_capacity(MAX_AFTERIMAGES),
            ticks_since_afterimage: 0,
        })
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.body.bounds()
    }

    pub fn on_ground(&self) -> bool {
        self.contact.ground
    }

    pub fn on_wall(&self) -> bool {
        self.contact.wall
    }

    pub fn wall_touch_dir(&self) -> i8 {
        self.contact.wall_dir
    }

    pub fn state(&self) -> PlayerState {
        if self.dashing {
            PlayerState::Dashing
        } else if self.contact.ground {
            PlayerState::Grounded
        } else if self.contact.wall {
            PlayerState::WallContact
        } else {
            PlayerState::Airborne
        }
    }

    pub fn visual(&self) -> PlayerVisual {
        if self.dashing {
            PlayerVisual::Dashing
        } else {
            PlayerVisual::Normal
        }
    }

    /// Ticks of horizontal input lockout left from the last wall-jump
    pub fn wall_jump_cooldown(&self) -> u32 {
        self.wall_jump_cooldown
    }

    /// Advance one tick up to (but not including) obstacle resolution.
    ///
    /// Returns contact with the level box itself (the floor counts as ground).
    pub fn update(&mut self, input: &InputSnapshot, level_size: Vec2, tuning: &Tuning) -> ContactInfo {
        self.body.prev_pos = self.body.pos;
        // Counted down on every tick the lockout covers, including this one
        let input_locked = self.wall_jump_cooldown > 0;
        self.wall_jump_cooldown = self.wall_jump_cooldown.saturating_sub(1);
        self.age_afterimages(tuning);

        if !self.dashing {
            self.apply_input(input, input_locked, tuning);
        }
        // A dash started by this tick's input moves immediately
        if self.dashing {
            self.advance_dash(tuning);
        } else {
            self.apply_gravity(tuning);
        }

        self.body.pos += self.body.vel;

        self.contact = ContactInfo::NONE;
        self.clamp_to_level(level_size)
    }

    fn apply_input(&mut self, input: &InputSnapshot, input_locked: bool, tuning: &Tuning) {
        let grounded = self.contact.ground;
        if !grounded && !self.contact.wall {
            // No midair jumps once contact is lost
            self.can_jump = false;
        }

        if !input_locked {
            self.body.vel.x = input.horizontal() as f32 * tuning.run_speed;
        }

        if input.was_pressed(Actions::JUMP) && self.can_jump {
            self.body.vel.y = tuning.jump_velocity;

            if self.contact.wall_dir != 0 && !grounded {
                let dir = self.wall_jump_dir(input, tuning.wall_jump_policy);
                self.body.vel.x = dir as f32 * tuning.run_speed * tuning.wall_jump_push;
                self.wall_jump_cooldown = tuning.wall_jump_cooldown_ticks;
                log::debug!("Wall jump, push {}", dir);
            }

            self.can_jump = false;
            self.contact.wall_dir = 0;
        }

        if input.is_held(Actions::DASH) && self.dash_available {
            let dir = if self.contact.wall_dir != 0 {
                self.contact.wall_dir
            } else if input.is_held(Actions::MOVE_LEFT) {
                -1
            } else {
                1
            };
            self.start_dash(dir);
        }
    }

    fn wall_jump_dir(&self, input: &InputSnapshot, policy: WallJumpPolicy) -> i8 {
        match policy {
            WallJumpPolicy::AwayFromWall => self.contact.wall_dir,
            WallJumpPolicy::OppositeInput => match input.horizontal() {
                0 => self.contact.wall_dir,
                held => -held,
            },
        }
    }

    fn apply_gravity(&mut self, tuning: &Tuning) {
        self.body.vel.y = (self.body.vel.y + tuning.gravity)
            .clamp(-tuning.max_rise_speed, tuning.max_fall_speed);
    }

    /// Enter the dash state heading `dir` (-1 or 1)
    pub fn start_dash(&mut self, dir: i8) {
        self.dashing = true;
        self.dash_available = false;
        self.dash_traveled = 0.0;
        self.dash_dir = if dir < 0 { -1 } else { 1 };
        self.invincible = true;
        self.body.vel.y = 0.0;
        // First afterimage on the first dash tick
        self.ticks_since_afterimage = u32::MAX;
        log::debug!("Dash started, dir {}", self.dash_dir);
    }

    fn advance_dash(&mut self, tuning: &Tuning) {
        let step = self.dash_dir as f32 * tuning.dash_speed;
        self.body.vel = Vec2::new(step, 0.0);

        self.ticks_since_afterimage = self.ticks_since_afterimage.saturating_add(1);
        if self.ticks_since_afterimage >= tuning.afterimage_interval_ticks {
            self.record_afterimage();
            self.ticks_since_afterimage = 0;
        }

        self.dash_traveled += step.abs();
        if self.dash_traveled >= self.dash_distance {
            self.end_dash();
        }
    }

    fn end_dash(&mut self) {
        self.dashing = false;
        self.invincible = false;
        self.body.vel.x = 0.0;
        log::debug!("Dash ended after {}px", self.dash_traveled);
    }

    fn record_afterimage(&mut self) {
        self.afterimages.push(Afterimage {
            pos: self.body.pos,
            age_ticks: 0,
        });
        if self.afterimages.len() > MAX_AFTERIMAGES {
            self.afterimages.remove(0);
        }
    }

    fn age_afterimages(&mut self, tuning: &Tuning) {
        for image in &mut self.afterimages {
            image.age_ticks += 1;
        }
        self.afterimages
            .retain(|image| image.age_ticks < tuning.afterimage_lifetime_ticks);
    }

    /// Keep the box inside the level horizontally and above its floor
    fn clamp_to_level(&mut self, level_size: Vec2) -> ContactInfo {
        let mut contact = ContactInfo::NONE;
        let size = self.body.size;

        if self.body.pos.y + size.y >= level_size.y {
            self.body.pos.y = level_size.y - size.y;
            self.body.vel.y = 0.0;
            contact.ground = true;
        }

        let max_x = (level_size.x - size.x).max(0.0);
        if self.body.pos.x > max_x {
            self.body.pos.x = max_x;
            self.body.vel.x = 0.0;
        } else if self.body.pos.x < 0.0 {
            self.body.pos.x = 0.0;
            self.body.vel.x = 0.0;
        }

        contact
    }

    /// Fold contact detected this tick into the player's state
    pub fn apply_contact(&mut self, contact: ContactInfo, tuning: &Tuning) {
        if contact.ground {
            self.touched_ground();
        }
        if contact.wall {
            self.touched_wall(contact.wall_dir, tuning);
        }
    }

    fn touched_ground(&mut self) {
        self.body.vel.y = 0.0;
        self.contact.ground = true;
        self.can_jump = true;
        // A dash in progress keeps its charge spent until it finishes
        if !self.dashing {
            self.dash_available = true;
        }
    }

    fn touched_wall(&mut self, dir: i8, tuning: &Tuning) {
        self.body.vel.x = 0.0;
        self.contact.wall = true;
        self.body.vel.y = self.body.vel.y.min(tuning.wall_slide_speed);
        self.can_jump = true;
        self.contact.wall_dir = dir;
    }

    /// Soft reset after a hazard: back to spawn, at rest
    pub fn respawn(&mut self, spawn: Vec2) {
        self.body.pos = spawn;
        self.body.prev_pos = spawn;
        self.body.vel = Vec2::ZERO;
    }

    /// Hard reset for a restarted session: spawn position plus fresh jump and dash state
    pub fn reset(&mut self, spawn: Vec2, tuning: &Tuning) {
        self.respawn(spawn);
        self.contact = ContactInfo::NONE;
        self.can_jump = false;
        self.dashing = false;
        self.dash_available = true;
        self.dash_dir = 1;
        self.dash_traveled = 0.0;
        self.dash_distance = tuning.dash_distance;
        self.invincible = false;
        self.wall_jump_cooldown = 0;
        self.afterimages.clear();
        self.ticks_since_afterimage = 0;
    }
}
