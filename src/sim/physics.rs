//! Avatar physics
//!
//! One call to [`integrate`] is one tick. There is no `dt`: all constants are
//! tuned per tick and the driver runs ticks at a fixed rate.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use super::state::Avatar;
use crate::consts::*;
use crate::ground_line;

/// Which playfield boundary the avatar touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryContact {
    None,
    /// Bumped the top edge; velocity was zeroed
    Ceiling,
    /// Landed on the ground; always fatal
    Ground,
}

/// Advance the avatar by one tick
pub fn integrate(avatar: &mut Avatar) -> BoundaryContact {
    // Gravity, then drag, then position
    avatar.velocity += GRAVITY;
    avatar.velocity *= AIR_RESISTANCE;
    avatar.y += avatar.velocity;

    avatar.tilt = tilt_for(avatar.velocity);

    if avatar.bottom() >= ground_line() {
        avatar.y = ground_line() - AVATAR_RADIUS;
        return BoundaryContact::Ground;
    }

    if avatar.top() <= 0.0 {
        avatar.y = AVATAR_RADIUS;
        avatar.velocity = 0.0;
        return BoundaryContact::Ceiling;
    }

    BoundaryContact::None
}

/// Nose-up is clamped tighter than nose-down
pub fn tilt_for(velocity: f32) -> f32 {
    (velocity * TILT_FACTOR).clamp(-FRAC_PI_4, FRAC_PI_2)
}

/// Start-screen hover around mid-canvas, driven by wall-clock milliseconds
pub fn idle_bob(avatar: &mut Avatar, clock_ms: f64) {
    let phase = (clock_ms / IDLE_BOB_PERIOD_MS).sin() as f32;
    avatar.y = CANVAS_HEIGHT / 2.0 + phase * IDLE_BOB_AMPLITUDE;
    avatar.velocity = 0.0;
    avatar.tilt = 0.0;
}
