//! Grid-authored levels
//!
//! Levels are drawn as rows of characters, one [`TILE_SIZE`] cell each:
//!
//! | Cell | Meaning      |
//! |------|--------------|
//! | `W`  | wall block   |
//! | `T`  | trap         |
//! | `P`  | player start |
//! | `G`  | goal         |
//!
//! Any other character is empty space.

use super::level::{GoalDesc, LevelDescription, PointDesc, RectDesc};
use crate::consts::TILE_SIZE;
use crate::error::{LayoutError, LevelError};

const LEVEL_1: [&str; 10] = [
    "WWWWWWWW           W",
    "WP    T           GW",
    "W     T   WWW      W",
    "W     T        WW  W",
    "W     WWW          W",
    "W       W       TTTW",
    "W  WWW  WTTWW       ",
    "W                   ",
    "W             WW    ",
    "WWWWWWWWWWWWWWWWWWWW",
];

/// Rows of a bundled level
pub fn builtin_layout(id: u32) -> Option<&'static [&'static str]> {
    match id {
        1 => Some(&LEVEL_1),
        _ => None,
    }
}

/// Description of a bundled level
pub fn builtin_level(id: u32) -> Result<LevelDescription, LevelError> {
    let rows = builtin_layout(id).ok_or(LevelError::UnknownLevel(id))?;
    Ok(parse_layout(rows)?)
}

/// Translate a character grid into a level description
pub fn parse_layout<S: AsRef<str>>(rows: &[S]) -> Result<LevelDescription, LayoutError> {
    let columns = rows
        .first()
        .map(|row| row.as_ref().chars().count())
        .filter(|&n| n > 0)
        .ok_or(LayoutError::Empty)?;

    let mut player_start = None;
    let mut goal = None;
    let mut blocks = Vec::new();
    let mut traps = Vec::new();

    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        let found = line.chars().count();
        if found != columns {
            return Err(LayoutError::Ragged {
                row,
                expected: columns,
                found,
            });
        }

        for (col, cell) in line.chars().enumerate() {
            let x = col as f32 * TILE_SIZE;
            let y = row as f32 * TILE_SIZE;
            match cell {
                'W' => blocks.push(RectDesc::new(x, y, TILE_SIZE, TILE_SIZE)),
                'T' => traps.push(RectDesc::new(x, y, TILE_SIZE, TILE_SIZE)),
                'P' => {
                    if player_start.is_some() {
                        return Err(LayoutError::DuplicateMarker { marker: 'P', row, col });
                    }
                    player_start = Some(PointDesc { x, y });
                }
                'G' => {
                    if goal.is_some() {
                        return Err(LayoutError::DuplicateMarker { marker: 'G', row, col });
                    }
                    goal = Some(GoalDesc {
                        x,
                        y,
                        width: None,
                        height: None,
                    });
                }
                _ => {}
            }
        }
    }

    let player_start = player_start.ok_or(LayoutError::MissingMarker('P'))?;
    let goal = goal.ok_or(LayoutError::MissingMarker('G'))?;

    Ok(LevelDescription {
        player_start: Some(player_start),
        goal: Some(goal),
        blocks: Some(blocks),
        traps: Some(traps),
        width: Some(columns as f32 * TILE_SIZE),
        height: Some(rows.len() as f32 * TILE_SIZE),
    })
}
