//! Simple autopilot for the demo/headless mode
//!
//! Flaps whenever the avatar is falling below the middle of the next gap.

use super::state::{GamePhase, GameState, Obstacle};
use super::tick::{TickInput, tick};
use crate::consts::*;

/// How far below the gap center the avatar may sink before flapping
const SINK_TOLERANCE: f32 = 12.0;

/// The first obstacle whose trailing edge is still ahead of the avatar
pub fn next_obstacle(state: &GameState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .filter(|o| o.right() >= AVATAR_X - AVATAR_RADIUS)
        .min_by(|a, b| a.x.total_cmp(&b.x))
}

/// Whether the autopilot would activate this tick
pub fn wants_jump(state: &GameState) -> bool {
    match state.phase {
        GamePhase::Start => true,
        GamePhase::GameOver => false,
        GamePhase::Playing => {
            let target = next_obstacle(state)
                .map(|o| o.gap_top + o.gap_size / 2.0)
                .unwrap_or(CANVAS_HEIGHT / 2.0);
            state.avatar.velocity > 0.0 && state.avatar.y > target + SINK_TOLERANCE
        }
    }
}

/// Run a whole session without a display. Stops at the first crash or after
/// `max_ticks`; returns the number of ticks simulated.
pub fn play(state: &mut GameState, max_ticks: u64) -> u64 {
    let mut ticks = 0;
    while ticks < max_ticks && state.phase != GamePhase::GameOver {
        let input = TickInput {
            activate: wants_jump(state),
            clock_ms: ticks as f64 * SIM_DT as f64 * 1000.0,
        };
        tick(state, &input);
        ticks += 1;
    }
    ticks
}
