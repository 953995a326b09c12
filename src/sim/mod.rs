//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering, audio or platform dependencies
//!
//! The one exception is the idle bob in the start screen, which is driven by
//! a wall-clock value passed in through `TickInput`.

pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Hitbox, advance};
pub use physics::{BoundaryContact, idle_bob, integrate};
pub use spawn::ObstacleGenerator;
pub use state::{Avatar, GameEvent, GamePhase, GameState, Obstacle};
pub use tick::{TickInput, activate, tick};
