//! Collision detection and response for rectangular blocks
//!
//! The ball is tested against each block by growing the block's half
//! extents by the ball radius (Minkowski sum) and classifying which region
//! of the grown rectangle the ball center falls into.

use glam::Vec2;

use crate::{cartesian_to_polar, normalize_angle, polar_to_cartesian};

/// Which part of a block the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Left or right face
    Side,
    /// Top or bottom face
    TopBottom,
    /// Rounded corner of the grown rectangle
    Corner,
}

/// Which screen edge the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    /// Left or right edge
    Side,
    /// Fell out of the playing field
    Bottom,
}

/// Classify a ball against an axis-aligned block.
///
/// Returns `None` when they don't touch. Regions are checked in order
/// side, top/bottom, corner.
pub fn ball_box_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    box_center: Vec2,
    half: Vec2,
) -> Option<HitRegion> {
    let dist = (ball_pos - box_center).abs();

    if dist.x > half.x + ball_radius || dist.y > half.y + ball_radius {
        return None;
    }

    if dist.x <= half.x + ball_radius && dist.y <= half.y {
        return Some(HitRegion::Side);
    }

    if dist.x <= half.x && dist.y <= half.y + ball_radius {
        return Some(HitRegion::TopBottom);
    }

    let delta = dist - half;
    if delta.length_squared() <= ball_radius * ball_radius {
        return Some(HitRegion::Corner);
    }

    None
}

/// Velocity after bouncing off `region` of a block centered at `box_center`
pub fn reflect_off(region: HitRegion, velocity: Vec2, ball_pos: Vec2, box_center: Vec2) -> Vec2 {
    match region {
        HitRegion::Side => Vec2::new(-velocity.x, velocity.y),
        HitRegion::TopBottom => Vec2::new(velocity.x, -velocity.y),
        HitRegion::Corner => reflect_corner(velocity, ball_pos, box_center),
    }
}

/// Corner bounce: rotate the velocity's heading by twice the angle of the
/// block-to-ball axis (measured with Y pointing up). Speed is preserved.
pub fn reflect_corner(velocity: Vec2, ball_pos: Vec2, box_center: Vec2) -> Vec2 {
    let axis = Vec2::new(ball_pos.x - box_center.x, box_center.y - ball_pos.y);
    let (_, axis_theta) = cartesian_to_polar(axis);
    let (speed, heading) = cartesian_to_polar(velocity);
    polar_to_cartesian(speed, normalize_angle(heading - 2.0 * axis_theta))
}

/// Check the ball against the playing field edges (first match wins)
pub fn ball_boundary_contact(ball_pos: Vec2, ball_radius: f32, bounds: Vec2) -> Option<Boundary> {
    if ball_pos.y - ball_radius <= 0.0 {
        Some(Boundary::Top)
    } else if ball_pos.x + ball_radius >= bounds.x || ball_pos.x - ball_radius <= 0.0 {
        Some(Boundary::Side)
    } else if ball_pos.y - ball_radius >= bounds.y {
        Some(Boundary::Bottom)
    } else {
        None
    }
}
