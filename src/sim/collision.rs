//! Collision detection, scoring and obstacle scrolling
//!
//! Everything here is axis-aligned: the avatar is treated as a square hitbox
//! slightly smaller than its drawn circle, and each obstacle as a vertical band
//! with an opening.

use glam::Vec2;

use super::state::{Avatar, GameEvent, GameState, Obstacle};
use crate::consts::*;

/// Result of advancing the world by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResult {
    None,
    GroundHit,
    PipeHit,
}

impl CollisionResult {
    pub fn is_fatal(self) -> bool {
        !matches!(self, CollisionResult::None)
    }
}

/// Axis-aligned box, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    /// The avatar's hitbox, shrunk by `HITBOX_MARGIN` on every side so that
    /// grazing a pipe visually does not end the run
    pub fn for_avatar(avatar: &Avatar) -> Self {
        let center = Vec2::new(AVATAR_X, avatar.y);
        let half = Vec2::splat(AVATAR_RADIUS - HITBOX_MARGIN);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap with the obstacle's horizontal band
    pub fn overlaps_band(&self, obstacle: &Obstacle) -> bool {
        self.right() > obstacle.x && self.left() < obstacle.right()
    }

    /// Whether this box sticks out of the obstacle's gap vertically
    pub fn outside_gap(&self, obstacle: &Obstacle) -> bool {
        self.top() < obstacle.gap_top || self.bottom() > obstacle.gap_bottom()
    }

    /// Fatal contact with the obstacle's solid segments
    pub fn hits(&self, obstacle: &Obstacle) -> bool {
        self.overlaps_band(obstacle) && self.outside_gap(obstacle)
    }

    /// The avatar's leading edge has cleared the obstacle's trailing edge
    pub fn has_cleared(&self, obstacle: &Obstacle) -> bool {
        self.left() > obstacle.right()
    }
}

/// Scroll obstacles, resolve collisions and scoring, spawn, scroll the ground.
///
/// Obstacles are walked newest to oldest so removing one never skips its
/// neighbor. A pipe hit returns immediately and leaves the rest of the tick
/// unprocessed.
pub fn advance(state: &mut GameState) -> CollisionResult {
    let hitbox = Hitbox::for_avatar(&state.avatar);

    for i in (0..state.obstacles.len()).rev() {
        let obstacle = &mut state.obstacles[i];
        obstacle.x -= state.speed;

        if hitbox.hits(obstacle) {
            return CollisionResult::PipeHit;
        }

        if !obstacle.passed && hitbox.has_cleared(obstacle) {
            obstacle.passed = true;
            state.score += 1;
            state.push_event(GameEvent::Score);

            // Step once per multiple; scoring never jumps more than 1 per tick
            if state.score > 0 && state.score % SPEED_INCREASE_INTERVAL == 0 {
                state.speed += SPEED_INCREASE_RATE;
                log::info!("Score {} - speed now {:.1}", state.score, state.speed);
            }
        }

        if state.obstacles[i].is_off_screen() {
            state.obstacles.remove(i);
        }
    }

    if state.obstacles.is_empty() || state.generator.spacing_elapsed() {
        let x = state.generator.next_spawn_x();
        state.spawn_obstacle(x);
    }

    let speed = state.speed;
    scroll_ground(state, speed);

    CollisionResult::None
}

/// Advance the ground stripes, wrapping at the tile period
pub fn scroll_ground(state: &mut GameState, speed: f32) {
    state.ground_offset = (state.ground_offset + speed) % GROUND_TILE;
}
