//! Brickfall - Breakout-style level simulation core
//!
//! Core modules:
//! - `level`: Level grid, text file format and its errors
//! - `sim`: Arena construction, ball motion and collision (deterministic)
//! - `settings`: JSON-backed configuration

pub mod level;
pub mod settings;
pub mod sim;

pub use level::{LevelError, LevelGrid, LevelTuning};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the reference frame rate of the level tuning)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second that level velocity/gravity values are expressed in
    pub const REFERENCE_TICK_RATE: f32 = 60.0;

    /// Playing field defaults
    pub const SCREEN_WIDTH: u32 = 800;
    pub const SCREEN_HEIGHT: u32 = 600;

    /// Block defaults (fixed per theme, not derived from the grid)
    pub const CELL_WIDTH: u32 = 50;
    pub const CELL_HEIGHT: u32 = 30;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Launch heading (radians, Y grows downward so this points up and right)
    pub const LAUNCH_ANGLE: f32 = -std::f32::consts::FRAC_PI_3;
    /// Launch displacement per reference tick at level velocity 1.0
    pub const LAUNCH_SPEED: f32 = 5.0;

    /// Level tuning defaults
    pub const DEFAULT_BALL_VELOCITY: f32 = 1.0;
    pub const DEFAULT_GRAVITY: f32 = 0.0;
    pub const DEFAULT_THEME: i32 = 0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
