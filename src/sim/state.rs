//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]. The driver owns
//! one instance, hands it to `tick` by `&mut` and to the renderer by `&`.

use serde::{Deserialize, Serialize};

use super::spawn::ObstacleGenerator;
use crate::consts::*;
use crate::highscores::HighScore;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first activation, avatar bobs in place
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, frozen until the next activation
    GameOver,
}

/// The player avatar. Its horizontal position is fixed at `AVATAR_X`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Center, measured down from the top of the playfield
    pub y: f32,
    /// Positive is downward
    pub velocity: f32,
    /// Radians, positive is nose down
    pub tilt: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::resting()
    }
}

impl Avatar {
    /// Mid-canvas, motionless
    pub fn resting() -> Self {
        Self {
            y: CANVAS_HEIGHT / 2.0,
            velocity: 0.0,
            tilt: 0.0,
        }
    }

    pub fn jump(&mut self) {
        self.velocity = JUMP_STRENGTH;
    }

    pub fn top(&self) -> f32 {
        self.y - AVATAR_RADIUS
    }

    pub fn bottom(&self) -> f32 {
        self.y + AVATAR_RADIUS
    }
}

/// A pipe pair with a gap the avatar must fly through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Height of the top segment (y of the gap's upper boundary)
    pub gap_top: f32,
    pub gap_size: f32,
    /// Set once the avatar has cleared this obstacle
    pub passed: bool,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Y of the gap's lower boundary
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_size
    }

    /// Height of the bottom segment, from the gap to the ground line
    pub fn bottom_segment_height(&self) -> f32 {
        crate::ground_line() - self.gap_bottom()
    }

    /// Fully scrolled past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Notifications for collaborators outside the simulation (audio, storage).
///
/// The simulation only queues these; the driver drains them after ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    Score,
    Crash,
    /// A finished run beat the stored best; carries the new best
    NewHighScore(u32),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub avatar: Avatar,
    /// Active obstacles in creation order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Current scroll speed (units per tick)
    pub speed: f32,
    /// Ground stripe scroll, in `[0, GROUND_TILE)`
    pub ground_offset: f32,
    pub high_score: HighScore,
    pub generator: ObstacleGenerator,
    /// Ticks spent in `Playing` during the current run
    pub time_ticks: u64,
    /// Pending notifications, oldest first
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game in the start phase
    pub fn new(seed: u64, high_score: HighScore) -> Self {
        Self {
            seed,
            phase: GamePhase::Start,
            avatar: Avatar::resting(),
            obstacles: Vec::new(),
            score: 0,
            speed: BASE_PIPE_SPEED,
            ground_offset: 0.0,
            high_score,
            generator: ObstacleGenerator::new(seed),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Back to the start screen. Keeps the best score and the RNG stream.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Start;
        self.avatar = Avatar::resting();
        self.obstacles.clear();
        self.score = 0;
        self.speed = BASE_PIPE_SPEED;
        self.time_ticks = 0;
        self.generator.set_cursor(RESET_SPAWN_CURSOR);
    }

    /// Spawn an obstacle at `x` and append it to the active set
    pub fn spawn_obstacle(&mut self, x: f32) {
        let obstacle = self.generator.spawn(x);
        log::debug!(
            "Spawned obstacle at x={} gap_top={} gap={}",
            obstacle.x,
            obstacle.gap_top,
            obstacle.gap_size
        );
        self.obstacles.push(obstacle);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
