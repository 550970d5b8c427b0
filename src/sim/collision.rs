//! Collision resolution against static obstacles
//!
//! Resolution runs after the player has moved to its tentative position and
//! happens in two passes over the obstacle list, always in this order:
//!
//! 1. [`resolve_vertical`] classifies each overlap by where the box was
//!    *before* the move. Coming down from above is a landing, coming up from
//!    below is a ceiling hit. Anything else is left alone.
//! 2. [`resolve_horizontal`] pushes the box out of whatever still overlaps,
//!    through the side with the smaller penetration, and reports a wall touch.
//!
//! Once two boxes overlap there is no way to tell "fell onto the platform"
//! from "ran into its side" without the previous position, which is why
//! [`Body`] carries it.

use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Obstacle;
use super::rect::Rect;
use crate::tuning::Tuning;

/// The moving box that collision resolution pushes around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: Vec2,
    /// Top-left corner at the start of the current tick
    pub prev_pos: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            prev_pos: pos,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn prev_bounds(&self) -> Rect {
        Rect::from_pos_size(self.prev_pos, self.size)
    }
}

/// Surfaces touched during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Landed on something (an obstacle top or the level floor)
    pub ground: bool,
    /// Pushed out of an obstacle side
    pub wall: bool,
    /// Direction pointing away from the touched wall: -1 when the wall is on
    /// the right, 1 when it is on the left, 0 for no wall
    pub wall_dir: i8,
}

impl ContactInfo {
    pub const NONE: ContactInfo = ContactInfo {
        ground: false,
        wall: false,
        wall_dir: 0,
    };

    pub fn ground() -> Self {
        Self {
            ground: true,
            ..Self::NONE
        }
    }

    pub fn wall(dir: i8) -> Self {
        Self {
            wall: true,
            wall_dir: dir.signum(),
            ..Self::NONE
        }
    }
}

impl BitOr for ContactInfo {
    type Output = ContactInfo;

    /// Union of two contacts; a later wall direction wins
    fn bitor(self, rhs: ContactInfo) -> ContactInfo {
        ContactInfo {
            ground: self.ground || rhs.ground,
            wall: self.wall || rhs.wall,
            wall_dir: if rhs.wall_dir != 0 {
                rhs.wall_dir
            } else {
                self.wall_dir
            },
        }
    }
}

impl BitOrAssign for ContactInfo {
    fn bitor_assign(&mut self, rhs: ContactInfo) {
        *self = *self | rhs;
    }
}

/// First pass: landings and ceiling hits
///
/// A landing needs the previous bottom edge at or above the obstacle top
/// (within `landing_epsilon`), downward motion, and at least
/// `min_landing_overlap` of horizontal overlap. Narrower corner clips are left
/// for the horizontal pass.
pub fn resolve_vertical(body: &mut Body, obstacles: &[Obstacle], tuning: &Tuning) -> ContactInfo {
    let mut contact = ContactInfo::NONE;
    let prev = body.prev_bounds();

    for obstacle in obstacles {
        let block = obstacle.bounds();
        let bounds = body.bounds();
        if !bounds.overlaps(block) {
            continue;
        }

        let from_above = prev.bottom() <= block.top() + tuning.landing_epsilon;
        let from_below = prev.top() >= block.bottom() - tuning.landing_epsilon;

        if body.vel.y > 0.0 && from_above {
            if bounds.horizontal_overlap(block) >= tuning.min_landing_overlap {
                body.pos.y = block.top() - body.size.y;
                body.vel.y = 0.0;
                contact.ground = true;
            }
        } else if body.vel.y < 0.0 && from_below {
            body.pos.y = block.bottom();
            body.vel.y = 0.0;
        }
    }

    contact
}

/// Second pass: push out of anything still overlapping, sideways
///
/// The box leaves through the side with less penetration. On a tie it leaves
/// against its direction of travel.
pub fn resolve_horizontal(body: &mut Body, obstacles: &[Obstacle]) -> ContactInfo {
    let mut contact = ContactInfo::NONE;

    for obstacle in obstacles {
        let block = obstacle.bounds();
        let bounds = body.bounds();
        if !bounds.overlaps(block) {
            continue;
        }

        let push_left = bounds.right() - block.left();
        let push_right = block.right() - bounds.left();

        if push_left < push_right || (push_left == push_right && body.vel.x >= 0.0) {
            body.pos.x = block.left() - body.size.x;
            contact |= ContactInfo::wall(-1);
        } else {
            body.pos.x = block.right();
            contact |= ContactInfo::wall(1);
        }
        body.vel.x = 0.0;
    }

    contact
}

/// Run both passes in their required order
pub fn resolve_obstacles(body: &mut Body, obstacles: &[Obstacle], tuning: &Tuning) -> ContactInfo {
    let vertical = resolve_vertical(body, obstacles, tuning);
    let horizontal = resolve_horizontal(body, obstacles);
    vertical | horizontal
}
