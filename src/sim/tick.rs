//! Fixed timestep simulation tick
//!
//! The game flow state machine. `tick` is the only entry point that advances
//! time; `activate` is the only one that reacts to the player.

use super::collision::{self, CollisionResult};
use super::physics::{self, BoundaryContact};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// One activation gesture (tap/click/space) since the last tick
    pub activate: bool,
    /// Wall-clock milliseconds, drives the start-screen bob
    pub clock_ms: f64,
}

/// Apply one activation gesture.
///
/// Starts a run, jumps, or returns to the start screen depending on phase.
pub fn activate(state: &mut GameState) {
    match state.phase {
        GamePhase::Start => start_run(state),
        GamePhase::Playing => jump(state),
        GamePhase::GameOver => {
            state.reset();
            log::info!("Back to start screen");
        }
    }
}

fn start_run(state: &mut GameState) {
    state.phase = GamePhase::Playing;
    state.spawn_obstacle(FIRST_PIPE_X);
    // The starting tap doubles as the first flap
    jump(state);
    log::info!("Run started (best {})", state.high_score.best());
}

fn jump(state: &mut GameState) {
    state.avatar.jump();
    state.push_event(GameEvent::Jump);
}

fn game_over(state: &mut GameState, cause: CollisionResult) {
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::Crash);
    log::info!(
        "Game over ({:?}) with score {} after {} ticks (seed {})",
        cause,
        state.score,
        state.time_ticks,
        state.seed
    );

    if state.high_score.record(state.score) {
        log::info!("New high score: {}", state.score);
        state.push_event(GameEvent::NewHighScore(state.score));
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.activate {
        activate(state);
    }

    match state.phase {
        GamePhase::Start => {
            physics::idle_bob(&mut state.avatar, input.clock_ms);
            collision::scroll_ground(state, BASE_PIPE_SPEED);
        }

        GamePhase::Playing => {
            state.time_ticks += 1;

            if physics::integrate(&mut state.avatar) == BoundaryContact::Ground {
                game_over(state, CollisionResult::GroundHit);
                return;
            }

            let result = collision::advance(state);
            if result.is_fatal() {
                game_over(state, result);
            }
        }

        GamePhase::GameOver => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground_line;
    use crate::highscores::HighScore;
    use crate::sim::state::{Avatar, Obstacle};
    use proptest::prelude::*;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn tap() -> TickInput {
        TickInput {
            activate: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = GameState::new(12345, HighScore::default());
        activate(&mut state);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, CANVAS_WIDTH + 100.0);
        assert_eq!(state.avatar.velocity, JUMP_STRENGTH);
        assert_eq!(state.drain_events(), vec![GameEvent::Jump]);
    }

    #[test]
    fn test_start_phase_only_bobs() {
        let mut state = GameState::new(12345, HighScore::default());
        for i in 0..30 {
            let input = TickInput {
                activate: false,
                clock_ms: i as f64 * 16.0,
            };
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Start);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
        assert!((state.avatar.y - CANVAS_HEIGHT / 2.0).abs() <= IDLE_BOB_AMPLITUDE);
        // 30 ticks at base speed, wrapped at 20
        assert!((state.ground_offset - (30.0 * BASE_PIPE_SPEED) % GROUND_TILE).abs() < 1e-4);
    }

    #[test]
    fn test_jump_while_playing() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        for _ in 0..10 {
            tick(&mut state, &idle());
        }
        assert!(state.avatar.velocity > JUMP_STRENGTH);
        activate(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.avatar.velocity, JUMP_STRENGTH);
    }

    #[test]
    fn test_ground_hit_ends_run_same_tick() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        state.avatar = Avatar {
            y: ground_line() - AVATAR_RADIUS - 0.5,
            velocity: 3.0,
            tilt: 0.0,
        };
        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.avatar.y, ground_line() - AVATAR_RADIUS);
        assert!(state.drain_events().contains(&GameEvent::Crash));
    }

    #[test]
    fn test_ceiling_is_not_fatal() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        state.avatar = Avatar {
            y: AVATAR_RADIUS + 1.0,
            velocity: JUMP_STRENGTH,
            tilt: 0.0,
        };
        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.avatar.y, AVATAR_RADIUS);
        assert_eq!(state.avatar.velocity, 0.0);
    }

    #[test]
    fn test_game_over_freezes() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        while state.phase == GamePhase::Playing {
            tick(&mut state, &idle());
        }
        let frozen = state.clone();
        for _ in 0..20 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.avatar, frozen.avatar);
        assert_eq!(state.obstacles, frozen.obstacles);
        assert_eq!(state.ground_offset, frozen.ground_offset);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        state.score = 14;
        state.speed = BASE_PIPE_SPEED + SPEED_INCREASE_RATE;
        state.phase = GamePhase::GameOver;

        tick(&mut state, &tap());

        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.speed, BASE_PIPE_SPEED);
        assert_eq!(state.avatar.velocity, 0.0);
        assert_eq!(state.avatar.tilt, 0.0);
        assert_eq!(state.generator.cursor(), CANVAS_WIDTH + 200.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_time_ticks_count_current_run() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        for _ in 0..10 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 10);

        state.phase = GamePhase::GameOver;
        for _ in 0..5 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.time_ticks, 10);

        tick(&mut state, &tap());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.seed, 1);
    }

    #[test]
    fn test_high_score_only_when_beaten() {
        let mut state = GameState::new(1, HighScore::new(5));
        activate(&mut state);
        state.score = 5;
        state.avatar.y = ground_line();
        tick(&mut state, &idle());
        assert_eq!(state.high_score.best(), 5);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::NewHighScore(_)))
        );

        activate(&mut state);
        activate(&mut state);
        state.score = 6;
        state.avatar.y = ground_line();
        tick(&mut state, &idle());
        assert_eq!(state.high_score.best(), 6);
        assert!(state.drain_events().contains(&GameEvent::NewHighScore(6)));
    }

    #[test]
    fn test_pipe_hit_ends_run() {
        let mut state = GameState::new(1, HighScore::default());
        activate(&mut state);
        state.obstacles.push(Obstacle {
            x: AVATAR_X - 10.0,
            gap_top: 50.0,
            gap_size: 120.0,
            passed: false,
        });
        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, HighScore::default());
        let mut state2 = GameState::new(99999, HighScore::default());

        for i in 0..600 {
            let input = if i % 25 == 0 { tap() } else { idle() };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.avatar, state2.avatar);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.time_ticks, state2.time_ticks);
    }

    proptest! {
        #[test]
        fn prop_score_and_speed_never_decrease(
            seed in any::<u64>(),
            taps in proptest::collection::vec(any::<bool>(), 1..800),
        ) {
            let mut state = GameState::new(seed, HighScore::default());
            activate(&mut state);
            let mut last_score = 0;
            let mut last_speed = state.speed;
            for pressed in taps {
                if state.phase != GamePhase::Playing {
                    break;
                }
                tick(&mut state, &TickInput { activate: pressed, clock_ms: 0.0 });
                prop_assert!(state.score >= last_score);
                prop_assert!(state.score - last_score <= 1);
                prop_assert!(state.speed >= last_speed);
                let ramps = state.score / SPEED_INCREASE_INTERVAL;
                let expected = BASE_PIPE_SPEED + ramps as f32 * SPEED_INCREASE_RATE;
                prop_assert!((state.speed - expected).abs() < 1e-3);
                last_score = state.score;
                last_speed = state.speed;
            }
        }
    }
}
