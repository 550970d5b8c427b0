//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one tick:
//!
//! 1. the player moves ([`Player::update`](super::player::Player::update)),
//! 2. obstacles push it back into free space,
//! 3. trigger zones are checked against where it ended up.
//!
//! The input snapshot is read-only here. Clearing its just-pressed set is the
//! caller's job, once per tick.

use super::collision::resolve_obstacles;
use super::entities::{TriggerZone, ZoneKind};
use super::input::InputSnapshot;
use super::rect::Rect;
use super::state::{CompletionEvent, GameEvent, GamePhase, GameState};
use crate::ticks_to_ms;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &InputSnapshot) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Nothing moves once the goal has been reached
    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    let level_id = state.level.id;
    let tuning = &state.tuning;
    let level_size = state.level.size();
    let spawn = state.level.spawn();
    let (player, obstacles, zones) = state.level.split_mut();

    let bounds_contact = player.update(input, level_size, tuning);
    let contact = bounds_contact | resolve_obstacles(&mut player.body, obstacles, tuning);
    player.apply_contact(contact, tuning);

    match triggered(zones, &player.bounds(), player.invincible) {
        Some(ZoneKind::Goal) => {
            let event = CompletionEvent {
                level_id,
                time_ms: ticks_to_ms(state.time_ticks),
            };
            state.phase = GamePhase::Completed;
            log::info!(
                "Level {} completed in {} ms ({} ticks)",
                event.level_id,
                event.time_ms,
                state.time_ticks
            );
            events.push(GameEvent::Completed(event));
        }
        Some(ZoneKind::Hazard) => {
            let from = player.pos();
            player.respawn(spawn);
            log::debug!("Hazard hit at ({}, {}), respawned", from.x, from.y);
            events.push(GameEvent::Respawned { from });
        }
        None => {}
    }

    events
}

/// Which zone effect fires for a player occupying `bounds`
///
/// Every zone is tested against the same resolved position, so the outcome
/// does not depend on list order: a goal touch beats any hazard touched in
/// the same tick, and hazards are skipped entirely while invincible.
fn triggered(zones: &[TriggerZone], bounds: &Rect, invincible: bool) -> Option<ZoneKind> {
    let mut hit = None;
    for zone in zones.iter().filter(|z| z.contains(bounds)) {
        match zone.kind {
            ZoneKind::Goal => return Some(ZoneKind::Goal),
            ZoneKind::Hazard if !invincible => hit = Some(ZoneKind::Hazard),
            ZoneKind::Hazard => {}
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use proptest::prelude::*;

    use super::*;
    use crate::sim::entities::{Obstacle, ObstacleStyle};
    use crate::sim::input::Actions;
    use crate::sim::level::Level;
    use crate::tuning::Tuning;

    const LEVEL_SIZE: Vec2 = Vec2::new(800.0, 400.0);

    fn floor() -> Obstacle {
        Obstacle::new(Rect::new(0.0, 368.0, 800.0, 32.0), ObstacleStyle::Platform).unwrap()
    }

    /// 800x400 level with a floor block, a 32px player and the given extras
    fn state_with(spawn: Vec2, mut obstacles: Vec<Obstacle>, zones: Vec<TriggerZone>) -> GameState {
        let tuning = Tuning::with_player_size(32.0);
        obstacles.insert(0, floor());
        let level = Level::new(1, spawn, LEVEL_SIZE, obstacles, zones, &tuning).unwrap();
        GameState::new(level, tuning)
    }

    fn run(state: &mut GameState, input: InputSnapshot, ticks: usize) -> Vec<GameEvent> {
        (0..ticks).flat_map(|_| tick(state, &input)).collect()
    }

    #[test]
    fn test_falls_to_rest_on_floor() {
        let mut state = state_with(Vec2::new(100.0, 300.0), vec![], vec![]);
        let events = run(&mut state, InputSnapshot::default(), 120);

        let player = &state.level.player;
        assert!(events.is_empty());
        assert_eq!(player.pos().y, 368.0 - 32.0);
        assert_eq!(player.vel().y, 0.0);
        assert!(player.on_ground());
    }

    #[test]
    fn test_jump_from_floor() {
        let mut state = state_with(Vec2::new(100.0, 336.0), vec![], vec![]);
        run(&mut state, InputSnapshot::default(), 1);
        assert!(state.level.player.on_ground());
        assert!(state.level.player.can_jump);

        tick(&mut state, &InputSnapshot::pressing(Actions::JUMP));
        let player = &state.level.player;
        let tuning = &state.tuning;
        // Gravity already acted once on the impulse this tick
        assert!((player.vel().y - (tuning.jump_velocity + tuning.gravity)).abs() < 1e-5);
        assert!(!player.on_ground());
        assert!(!player.can_jump);

        // Still held, not a new edge
        tick(&mut state, &InputSnapshot::holding(Actions::JUMP));
        assert!(!state.level.player.on_ground());
        assert!(!state.level.player.can_jump);

        run(&mut state, InputSnapshot::default(), 120);
        assert!(state.level.player.on_ground());
        assert!(state.level.player.can_jump);
    }

    #[test]
    fn test_run_into_wall_stops_at_edge() {
        let wall = Obstacle::new(Rect::new(400.0, 200.0, 32.0, 168.0), ObstacleStyle::Wall).unwrap();
        let mut state = state_with(Vec2::new(300.0, 336.0), vec![wall], vec![]);
        run(&mut state, InputSnapshot::holding(Actions::MOVE_RIGHT), 60);

        let player = &state.level.player;
        assert_eq!(player.pos().x, 400.0 - 32.0);
        assert_eq!(player.vel().x, 0.0);
        assert!(player.on_wall());
        assert_eq!(player.wall_touch_dir(), -1);
        // Standing on the floor the whole way
        assert!(player.on_ground());
        assert_eq!(player.pos().y, 336.0);
    }

    #[test]
    fn test_hazard_respawns_player() {
        let spawn = Vec2::new(100.0, 336.0);
        let trap = TriggerZone::hazard(Rect::new(200.0, 336.0, 32.0, 32.0)).unwrap();
        let mut state = state_with(spawn, vec![], vec![trap]);

        let input = InputSnapshot::holding(Actions::MOVE_RIGHT);
        let mut respawned = false;
        for _ in 0..60 {
            let events = tick(&mut state, &input);
            if let Some(GameEvent::Respawned { from }) = events.first() {
                assert!(from.x > 168.0);
                respawned = true;
                break;
            }
        }

        assert!(respawned);
        assert_eq!(state.level.player.pos(), spawn);
        assert_eq!(state.level.player.vel(), Vec2::ZERO);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_hazard_respawn_ignores_speed() {
        let spawn = Vec2::new(100.0, 100.0);
        let trap = TriggerZone::hazard(Rect::new(0.0, 300.0, 800.0, 68.0)).unwrap();
        let mut state = state_with(spawn, vec![], vec![trap]);
        state.level.player.body.vel = Vec2::new(0.0, 3.5);

        let events = run(&mut state, InputSnapshot::default(), 120);
        assert!(events.iter().all(|e| matches!(e, GameEvent::Respawned { .. })));
        assert!(!events.is_empty());
        assert!(state.level.player.pos().y < 300.0);
    }

    #[test]
    fn test_dash_passes_through_hazard() {
        let trap = TriggerZone::hazard(Rect::new(200.0, 336.0, 32.0, 32.0)).unwrap();
        let mut state = state_with(Vec2::new(150.0, 336.0), vec![], vec![trap]);

        let mut events = run(&mut state, InputSnapshot::pressing(Actions::DASH), 1);
        assert!(state.level.player.invincible);
        events.extend(run(&mut state, InputSnapshot::default(), 20));

        assert!(events.is_empty());
        assert!(!state.level.player.dashing);
        assert!(state.level.player.pos().x > 232.0);
    }

    #[test]
    fn test_goal_completes_once() {
        let goal = TriggerZone::goal(Rect::new(290.0, 330.0, 40.0, 38.0)).unwrap();
        let mut state = state_with(Vec2::new(300.0, 336.0), vec![], vec![goal]);

        let events = tick(&mut state, &InputSnapshot::default());
        let expected = CompletionEvent {
            level_id: 1,
            time_ms: ticks_to_ms(1),
        };
        assert_eq!(events, vec![GameEvent::Completed(expected)]);
        assert_eq!(state.phase, GamePhase::Completed);

        // Later ticks are no-ops
        let pos = state.level.player.pos();
        let events = run(&mut state, InputSnapshot::holding(Actions::MOVE_LEFT), 10);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.level.player.pos(), pos);
    }

    #[test]
    fn test_goal_independent_of_zone_order() {
        let area = Rect::new(290.0, 330.0, 40.0, 38.0);
        let goal = TriggerZone::goal(area).unwrap();
        let trap = TriggerZone::hazard(area).unwrap();
        let spawn = Vec2::new(300.0, 336.0);

        let mut goal_last = state_with(spawn, vec![], vec![trap.clone(), goal.clone()]);
        let mut goal_first = state_with(spawn, vec![], vec![goal, trap]);

        let a = tick(&mut goal_last, &InputSnapshot::default());
        let b = tick(&mut goal_first, &InputSnapshot::default());
        assert_eq!(a, b);
        assert!(matches!(a.as_slice(), [GameEvent::Completed(_)]));
    }

    #[test]
    fn test_restart_after_completion() {
        let goal = TriggerZone::goal(Rect::new(600.0, 336.0, 32.0, 32.0)).unwrap();
        let spawn = Vec2::new(500.0, 336.0);
        let mut state = state_with(spawn, vec![], vec![goal]);

        let events = run(&mut state, InputSnapshot::holding(Actions::MOVE_RIGHT), 60);
        let time_ms = match events.as_slice() {
            [GameEvent::Completed(event)] => event.time_ms,
            other => panic!("expected one completion, got {:?}", other),
        };
        assert!(time_ms > 0);

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.level.player.pos(), spawn);

        // Same inputs, same time
        let events = run(&mut state, InputSnapshot::holding(Actions::MOVE_RIGHT), 60);
        assert!(matches!(
            events.as_slice(),
            [GameEvent::Completed(event)] if event.time_ms == time_ms
        ));
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut state1 = GameState::new(Level::builtin(1, &tuning).unwrap(), tuning.clone());
        let mut state2 = GameState::new(Level::builtin(1, &tuning).unwrap(), tuning);

        let inputs = [
            InputSnapshot::holding(Actions::MOVE_RIGHT),
            InputSnapshot::pressing(Actions::JUMP | Actions::MOVE_RIGHT),
            InputSnapshot::holding(Actions::JUMP | Actions::MOVE_RIGHT),
            InputSnapshot::holding(Actions::DASH),
            InputSnapshot::default(),
            InputSnapshot::holding(Actions::MOVE_LEFT),
        ];

        for i in 0..600 {
            let input = &inputs[(i / 7) % inputs.len()];
            let e1 = tick(&mut state1, input);
            let e2 = tick(&mut state2, input);
            assert_eq!(e1, e2);
            assert_eq!(state1.level.player.body, state2.level.player.body);
        }
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.time_ticks, state2.time_ticks);
    }

    #[test]
    fn test_triggered_priority() {
        let area = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(2.0, 2.0, 4.0, 4.0);
        let hazard = TriggerZone::hazard(area).unwrap();
        let goal = TriggerZone::goal(area).unwrap();

        assert_eq!(triggered(&[hazard.clone()], &inside, false), Some(ZoneKind::Hazard));
        assert_eq!(triggered(&[hazard.clone()], &inside, true), None);
        assert_eq!(triggered(&[hazard, goal], &inside, true), Some(ZoneKind::Goal));
        assert_eq!(triggered(&[], &inside, false), None);
    }

    proptest! {
        #[test]
        fn prop_builtin_level_never_overlaps(
            runs in proptest::collection::vec((0u8..16, 1usize..20), 1..60),
            size in prop_oneof![Just(28.0f32), Just(32.0f32)],
        ) {
            let tuning = Tuning::with_player_size(size);
            let level = Level::builtin(1, &tuning).unwrap();
            let mut state = GameState::new(level, tuning);
            let mut prev = Actions::empty();

            for (bits, ticks) in runs {
                let held = Actions::from_bits_truncate(bits);
                for _ in 0..ticks {
                    let input = InputSnapshot {
                        held,
                        just_pressed: held.difference(prev),
                    };
                    prev = held;
                    tick(&mut state, &input);

                    let player = &state.level.player;
                    let bounds = player.bounds();
                    for obstacle in state.level.obstacles() {
                        prop_assert!(
                            !bounds.overlaps(obstacle.bounds()),
                            "{:?} overlaps {:?}",
                            bounds,
                            obstacle.bounds()
                        );
                    }
                    if player.dashing {
                        prop_assert!(player.invincible);
                        prop_assert_eq!(player.vel().y, 0.0);
                    }
                }
            }
        }
    }
}
