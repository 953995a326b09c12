//! Gate Flap - a one-button gravity arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game flow)
//! - `renderer`: WebGPU rendering pipeline and viewport fitting
//! - `audio`: Procedural sound cues
//! - `platform`: Browser/native platform abstraction (time, input filtering)
//! - `persistence`: High score storage backends
//! - `settings`: User preferences

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
///
/// Everything is in logical playfield units; one tick is one `SIM_DT`.
pub mod consts {
    /// Fixed simulation timestep (physics constants are tuned per 60 Hz tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical playfield
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Height of the scrolling floor band
    pub const GROUND_HEIGHT: f32 = 50.0;
    /// Horizontal period of the ground stripe pattern
    pub const GROUND_TILE: f32 = 20.0;

    /// Physics (per tick)
    pub const GRAVITY: f32 = 0.3;
    pub const JUMP_STRENGTH: f32 = -6.0;
    pub const AIR_RESISTANCE: f32 = 0.98;
    /// Visual tilt per unit of vertical velocity (radians)
    pub const TILT_FACTOR: f32 = 0.05;

    /// Scroll speed and its ramp
    pub const BASE_PIPE_SPEED: f32 = 2.0;
    pub const SPEED_INCREASE_RATE: f32 = 0.2;
    pub const SPEED_INCREASE_INTERVAL: u32 = 10;

    /// Avatar
    pub const AVATAR_RADIUS: f32 = 20.0;
    pub const AVATAR_X: f32 = 100.0;
    /// Forgiveness trimmed off every side of the avatar hitbox
    pub const HITBOX_MARGIN: f32 = 4.0;

    /// Idle bob while waiting to start
    pub const IDLE_BOB_AMPLITUDE: f32 = 10.0;
    pub const IDLE_BOB_PERIOD_MS: f64 = 300.0;

    /// Obstacles
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const MIN_PIPE_GAP: f32 = 120.0;
    pub const MAX_PIPE_GAP: f32 = 180.0;
    /// Minimum height of both the top and bottom pipe segments
    pub const MIN_SEGMENT_HEIGHT: f32 = 50.0;
    pub const PIPE_SPAWN_DISTANCE: f32 = 220.0;
    /// Where the first obstacle of a run appears
    pub const FIRST_PIPE_X: f32 = CANVAS_WIDTH + 100.0;
    /// Spawn cursor position after a reset
    pub const RESET_SPAWN_CURSOR: f32 = CANVAS_WIDTH + 200.0;

    /// LocalStorage key for the best score
    pub const HIGH_SCORE_KEY: &str = "flappy_react_high_score";
}

/// Y coordinate of the top of the ground band
#[inline]
pub fn ground_line() -> f32 {
    consts::CANVAS_HEIGHT - consts::GROUND_HEIGHT
}
