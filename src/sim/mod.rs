//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Obstacles iterated in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionKind, Rect, check_collision};
pub use state::{Bird, GamePhase, MatchState, MatchStats, Obstacle};
pub use tick::{GameEvent, TickInput, spawn_obstacle, target_pixel_y, tick};
