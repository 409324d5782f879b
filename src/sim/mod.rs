//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, all quantities are per-frame
//! - Seeded RNG only
//! - No rendering or platform dependencies; side effects the host must
//!   perform are reported as `GameEvent`s

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{
    BadViewport, GameEvent, GamePhase, GameState, GravityMode, MoveDir, Obstacle, Player, Star,
    Viewport,
};
pub use tick::{SpawnKind, TickInput, choose_spawn, reset, tick};
