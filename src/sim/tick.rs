//! Per-tick ball update
//!
//! Advances the ball by one step against the screen edges and the live
//! blocks. The ball never mutates blocks; it reports hits as events and the
//! arena owner applies them (see [`step`]).

use glam::Vec2;

use super::arena::HitResult;
use super::collision::{Boundary, ball_boundary_contact, ball_box_collision, reflect_off};
use super::state::{Ball, GameEvent, GamePhase, GameState, Obstacle};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Launch ball (fire pressed this tick)
    pub launch: bool,
}

/// What happened to the ball during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    pub fn lost(&self) -> bool {
        self.events.contains(&GameEvent::BallLost)
    }

    /// Obstacles the ball bounced off this tick
    pub fn hits(&self) -> impl Iterator<Item = super::state::ObstacleId> + '_ {
        self.events.iter().filter_map(|e| match e {
            GameEvent::BlockHit { id } => Some(*id),
            _ => None,
        })
    }
}

/// Advance the ball by one timestep.
///
/// Order: screen edges, launch, first block hit (obstacle order), gravity,
/// then `pos += vel * dt`. Leaving through the bottom raises
/// [`GameEvent::BallLost`] and stops the tick with the ball untouched.
pub fn tick(
    ball: &mut Ball,
    input: &TickInput,
    dt: f32,
    bounds: Vec2,
    obstacles: &[Obstacle],
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if ball.lost {
        return outcome;
    }

    match ball_boundary_contact(ball.pos, ball.radius, bounds) {
        Some(Boundary::Top) => ball.vel.y = -ball.vel.y,
        Some(Boundary::Side) => ball.vel.x = -ball.vel.x,
        Some(Boundary::Bottom) => {
            ball.lost = true;
            log::debug!("Ball lost at {:?}", ball.pos);
            outcome.events.push(GameEvent::BallLost);
            return outcome;
        }
        None => {}
    }

    if input.launch && ball.launch() {
        log::debug!("Ball launched with velocity {:?}", ball.vel);
    }

    if ball.in_flight() {
        // At most one bounce per tick; first block in order wins
        for obstacle in obstacles.iter().filter(|o| o.collideable) {
            if let Some(region) =
                ball_box_collision(ball.pos, ball.radius, obstacle.pos, obstacle.half_size())
            {
                ball.vel = reflect_off(region, ball.vel, ball.pos, obstacle.pos);
                outcome.events.push(GameEvent::BlockHit { id: obstacle.id });
                break;
            }
        }

        if ball.gravity != 0.0 {
            ball.vel.y += ball.gravity_accel() * dt;
        }
    }

    ball.pos += ball.vel * dt;
    outcome
}

/// Advance a play session by one timestep, applying block hits to the arena
pub fn step(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if matches!(state.phase, GamePhase::BallLost | GamePhase::Cleared) {
        return Vec::new();
    }

    state.time_ticks += 1;
    let bounds = state.arena.bounds();
    let outcome = tick(&mut state.ball, input, dt, bounds, state.arena.obstacles());

    if state.phase == GamePhase::Serve && state.ball.in_flight() {
        state.phase = GamePhase::Playing;
    }

    let mut events = Vec::with_capacity(outcome.events.len());
    let mut destroyed_any = false;
    for event in outcome.events {
        events.push(event);
        match event {
            GameEvent::BlockHit { id } => {
                let result = state
                    .arena
                    .apply_hit(id, state.settings.permanent_obstacles_take_damage);
                if result == HitResult::Destroyed {
                    destroyed_any = true;
                    events.push(GameEvent::BlockDestroyed { id });
                }
            }
            GameEvent::BallLost => {
                log::info!("Ball lost after {} ticks", state.time_ticks);
                state.phase = GamePhase::BallLost;
            }
            GameEvent::BlockDestroyed { .. } | GameEvent::LevelCleared => {}
        }
    }

    if destroyed_any && state.arena.is_cleared() {
        log::info!("Level cleared after {} ticks", state.time_ticks);
        state.phase = GamePhase::Cleared;
        events.push(GameEvent::LevelCleared);
    }

    events
}
