//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use crate::consts::*;
use crate::level::LevelTuning;
use crate::polar_to_cartesian;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Ball left through the bottom edge, waiting for a respawn
    BallLost,
    /// Every scored block destroyed
    Cleared,
}

/// Ball motion phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    /// Zero velocity, not launched yet
    Idle,
    /// Moving
    InFlight,
    /// Out of play
    Lost,
}

/// Stable handle for an obstacle (assigned in grid order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Positive cell code. Doesn't count for level clear
    Permanent,
    /// Negative cell code. Must be destroyed to clear the level
    Destructible,
}

/// A rectangular block placed from a grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    /// Center in world coordinates
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub hit_points: i32,
    pub collideable: bool,
    /// Originating grid cell (column, row)
    pub cell: (usize, usize),
    /// Originating cell code, used to pick the block visual
    pub code: i32,
}

impl Obstacle {
    /// Build an obstacle from a non-zero cell code
    pub fn from_code(
        id: ObstacleId,
        code: i32,
        pos: Vec2,
        size: Vec2,
        cell: (usize, usize),
    ) -> Self {
        let kind = if code > 0 {
            ObstacleKind::Permanent
        } else {
            ObstacleKind::Destructible
        };
        Self {
            id,
            kind,
            pos,
            width: size.x,
            height: size.y,
            hit_points: code.saturating_abs(),
            collideable: true,
            cell,
            code,
        }
    }

    /// Half extents
    #[inline]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if this block must be destroyed to clear the level
    pub fn is_scored(&self) -> bool {
        self.kind == ObstacleKind::Destructible
    }

    /// Take one hit. Returns true when this hit destroyed the block.
    pub fn decrease_life(&mut self) -> bool {
        if self.hit_points > 0 {
            self.hit_points -= 1;
            return self.hit_points == 0;
        }
        false
    }

    pub fn has_hits_left(&self) -> bool {
        self.hit_points > 0
    }

    pub fn set_hits_left(&mut self, hits: i32) {
        self.hit_points = hits.max(0);
    }

    pub fn add_hits_left(&mut self, hits: i32) {
        self.set_hits_left(self.hit_points.saturating_add(hits));
    }
}

/// The ball.
///
/// `vel` is in pixels per second; its magnitude is the speed. A zero
/// velocity means the ball has not been launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Downward acceleration per reference tick (level units)
    pub gravity: f32,
    /// Level speed multiplier
    pub base_velocity: f32,
    /// Launch heading (radians)
    pub launch_angle: f32,
    /// Launch displacement per reference tick at base velocity 1.0
    pub launch_speed: f32,
    /// Set once the ball leaves through the bottom edge
    pub lost: bool,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, tuning: &LevelTuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            gravity: tuning.gravity,
            base_velocity: tuning.ball_velocity,
            launch_angle: LAUNCH_ANGLE,
            launch_speed: LAUNCH_SPEED,
            lost: false,
        }
    }

    /// Ball using the radius and launch parameters from `settings`
    pub fn from_settings(pos: Vec2, tuning: &LevelTuning, settings: &Settings) -> Self {
        Self {
            launch_angle: settings.launch_angle,
            launch_speed: settings.launch_speed,
            ..Self::new(pos, settings.ball_radius, tuning)
        }
    }

    pub fn phase(&self) -> BallPhase {
        if self.lost {
            BallPhase::Lost
        } else if self.vel == Vec2::ZERO {
            BallPhase::Idle
        } else {
            BallPhase::InFlight
        }
    }

    pub fn in_flight(&self) -> bool {
        self.phase() == BallPhase::InFlight
    }

    /// Velocity given to the ball on launch (px/s)
    pub fn launch_velocity(&self) -> Vec2 {
        let per_tick = self.base_velocity * self.launch_speed;
        polar_to_cartesian(per_tick * REFERENCE_TICK_RATE, self.launch_angle)
    }

    /// Launch the ball if it is idle. A zero launch speed leaves it idle.
    pub fn launch(&mut self) -> bool {
        if self.phase() != BallPhase::Idle {
            return false;
        }
        let vel = self.launch_velocity();
        if vel == Vec2::ZERO {
            return false;
        }
        self.vel = vel;
        true
    }

    /// Gravity as px/s²
    #[inline]
    pub fn gravity_accel(&self) -> f32 {
        self.gravity * REFERENCE_TICK_RATE * REFERENCE_TICK_RATE
    }
}

/// Events raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball left through the bottom edge
    BallLost,
    /// Ball bounced off a block
    BlockHit { id: ObstacleId },
    /// A hit took the block's last hit point
    BlockDestroyed { id: ObstacleId },
    /// Last scored block destroyed
    LevelCleared,
}

/// A play session: one arena and one ball
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    pub arena: Arena,
    pub ball: Ball,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(arena: Arena, settings: Settings) -> Self {
        let ball = Self::spawn_ball(&arena, &settings);
        Self {
            settings,
            arena,
            ball,
            phase: GamePhase::Serve,
            time_ticks: 0,
        }
    }

    fn spawn_ball(arena: &Arena, settings: &Settings) -> Ball {
        let bounds = arena.bounds();
        let pos = Vec2::new(bounds.x / 2.0, bounds.y * 0.75);
        Ball::from_settings(pos, arena.tuning(), settings)
    }

    /// Replace the ball with a fresh idle one
    pub fn respawn_ball(&mut self) {
        self.ball = Self::spawn_ball(&self.arena, &self.settings);
        if self.phase != GamePhase::Cleared {
            self.phase = GamePhase::Serve;
        }
    }
}
