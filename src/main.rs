//! Wallhop headless runner
//!
//! Loads a level, replays an input script through the fixed-tick simulation
//! and records a completion on the leaderboard.
//!
//! Usage:
//!   wallhop --level-id 1 --script run.txt
//!   wallhop --level level.json --tuning tuning.json --scores scores.json
//!
//! Script lines are `<ticks> <actions>`, where actions are `left`, `right`,
//! `jump` and `dash` joined with `+`, or `-` for no input. `#` starts a
//! comment.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use wallhop::Leaderboard;
use wallhop::sim::{
    Actions, CompletionEvent, GameEvent, GamePhase, GameState, InputSnapshot, Level, tick,
};
use wallhop::tuning::{Tuning, WallJumpPolicy};

#[derive(Parser)]
#[command(name = "wallhop")]
#[command(about = "Run a platformer level headless from an input script")]
struct Cli {
    /// Level description JSON; the built-in level is used when absent
    #[arg(long)]
    level: Option<PathBuf>,

    /// Level identifier, also the leaderboard key
    #[arg(long, default_value_t = 1)]
    level_id: u32,

    /// Tuning JSON overriding the default physics constants
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Wall-jump direction override: `away-from-wall` or `opposite-input`
    #[arg(long)]
    wall_jump: Option<String>,

    /// Input script; without one the player idles
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 3600)]
    max_ticks: u64,

    /// Leaderboard JSON to record a completion into
    #[arg(long)]
    scores: Option<PathBuf>,
}

/// A run of identical input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScriptStep {
    ticks: u64,
    held: Actions,
}

fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let ticks = parts
            .next()
            .unwrap_or_default()
            .parse::<u64>()
            .with_context(|| format!("line {}: bad tick count", n + 1))?;
        let actions = parts.next().unwrap_or("-");
        if parts.next().is_some() {
            bail!("line {}: trailing input after actions", n + 1);
        }

        let mut held = Actions::empty();
        if actions != "-" {
            for name in actions.split('+') {
                match Actions::from_script_name(name) {
                    Some(action) => held |= action,
                    None => bail!("line {}: unknown action '{}'", n + 1, name),
                }
            }
        }
        steps.push(ScriptStep { ticks, held });
    }
    Ok(steps)
}

/// Expand steps into per-tick snapshots, deriving edges from held changes
fn snapshots(steps: &[ScriptStep]) -> impl Iterator<Item = InputSnapshot> + '_ {
    let mut prev = Actions::empty();
    steps
        .iter()
        .flat_map(|step| std::iter::repeat_n(step.held, step.ticks as usize))
        .map(move |held| {
            let snapshot = InputSnapshot {
                held,
                just_pressed: held.difference(prev),
            };
            prev = held;
            snapshot
        })
}

fn load_level(cli: &Cli, tuning: &Tuning) -> Result<Level> {
    match &cli.level {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read level {}", path.display()))?;
            Level::from_json(cli.level_id, &json, tuning)
                .with_context(|| format!("Invalid level {}", path.display()))
        }
        None => Level::builtin(cli.level_id, tuning).context("Failed to load built-in level"),
    }
}

/// Milliseconds since the Unix epoch, 0 if the clock is before it
fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn record(path: &Path, event: &CompletionEvent) -> Result<()> {
    let mut board = Leaderboard::load(path);
    match board.record(event, unix_time_ms()) {
        Some(rank) => println!("New leaderboard entry at rank {}", rank),
        None => println!("Time did not make the top list"),
    }
    board
        .save(path)
        .with_context(|| format!("Failed to save leaderboard {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut tuning = match &cli.tuning {
        Some(path) => Tuning::load(path).with_context(|| format!("Invalid tuning {}", path.display()))?,
        None => Tuning::default(),
    };
    if let Some(name) = &cli.wall_jump {
        tuning.wall_jump_policy = WallJumpPolicy::from_str(name)
            .with_context(|| format!("Unknown wall-jump policy '{}'", name))?;
    }
    let steps = match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            parse_script(&text)?
        }
        None => Vec::new(),
    };

    let level = load_level(&cli, &tuning)?;
    let mut state = GameState::new(level, tuning);
    log::info!(
        "Wallhop running level {} (wall jump: {})",
        cli.level_id,
        state.tuning.wall_jump_policy.as_str()
    );

    let mut inputs = snapshots(&steps);
    let mut respawns = 0u32;
    let mut completion = None;

    while state.time_ticks < cli.max_ticks && state.phase == GamePhase::Playing {
        let input = inputs.next().unwrap_or_default();
        for event in tick(&mut state, &input) {
            match event {
                GameEvent::Respawned { .. } => respawns += 1,
                GameEvent::Completed(done) => completion = Some(done),
            }
        }
    }

    let player = &state.level.player;
    println!(
        "Ticks: {}  Time: {} ms  Respawns: {}  Position: ({:.1}, {:.1})  State: {:?}",
        state.time_ticks,
        state.elapsed_ms(),
        respawns,
        player.pos().x,
        player.pos().y,
        player.state()
    );

    match completion {
        Some(event) => {
            println!("Level {} completed in {} ms", event.level_id, event.time_ms);
            if let Some(path) = &cli.scores {
                record(path, &event)?;
            }
        }
        None => println!("Level not completed"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let text = "\
            # warm up\n\
            10 right\n\
            \n\
            1 right+jump   # hop\n\
            5 -\n\
            3\n";
        let steps = parse_script(text).unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep { ticks: 10, held: Actions::MOVE_RIGHT },
                ScriptStep { ticks: 1, held: Actions::MOVE_RIGHT | Actions::JUMP },
                ScriptStep { ticks: 5, held: Actions::empty() },
                ScriptStep { ticks: 3, held: Actions::empty() },
            ]
        );
    }

    #[test]
    fn test_parse_script_errors() {
        assert!(parse_script("x right").is_err());
        assert!(parse_script("3 fly").is_err());
        assert!(parse_script("3 left right").is_err());
    }

    #[test]
    fn test_snapshots_derive_edges() {
        let steps = [
            ScriptStep { ticks: 2, held: Actions::JUMP },
            ScriptStep { ticks: 1, held: Actions::JUMP | Actions::DASH },
            ScriptStep { ticks: 1, held: Actions::empty() },
            ScriptStep { ticks: 1, held: Actions::JUMP },
        ];
        let pressed: Vec<Actions> = snapshots(&steps).map(|s| s.just_pressed).collect();
        assert_eq!(
            pressed,
            vec![
                Actions::JUMP,
                Actions::empty(),
                Actions::DASH,
                Actions::empty(),
                Actions::JUMP,
            ]
        );
    }
}
