//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Stable iteration order (blocks in grid order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod state;
pub mod tick;

pub use arena::{Arena, ArenaBuilder, HitResult, LoadedLevel, Lookup, load_level};
pub use collision::{
    Boundary, HitRegion, ball_boundary_contact, ball_box_collision, reflect_corner, reflect_off,
};
pub use state::{
    Ball, BallPhase, GameEvent, GamePhase, GameState, Obstacle, ObstacleId, ObstacleKind,
};
pub use tick::{TickInput, TickOutcome, step, tick};
