//! Kinematic integration для бойцов
//!
//! - Custom velocity integration (без physics engine)
//! - Gravity + ground clamp (y вниз, земля y = 0)
//! - Friction на x/z когда боец не бежит
//! - Arena bounds clamp

use bevy::prelude::*;

use crate::components::PhysicsBody;

pub const FRICTION: f32 = 0.85;
pub const GRAVITY: f32 = 1.2;
pub const GROUND_Y: f32 = 0.0;

/// Пределы арены (x ± half_width, z ± half_depth)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub half_width: f32,
    pub half_depth: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            half_width: 1200.0,
            half_depth: 600.0,
        }
    }
}

/// One frame of motion. `running` suppresses friction (velocity comes from intent).
pub fn integrate(body: &mut PhysicsBody, running: bool, bounds: ArenaBounds) {
    body.position += body.velocity;

    if !running {
        body.velocity.x *= FRICTION;
        body.velocity.z *= FRICTION;
    }

    if body.position.y < GROUND_Y {
        body.velocity.y += GRAVITY;
    } else {
        body.position.y = GROUND_Y;
        body.velocity.y = body.velocity.y.min(0.0);
    }

    body.position.x = body.position.x.clamp(-bounds.half_width, bounds.half_width);
    body.position.z = body.position.z.clamp(-bounds.half_depth, bounds.half_depth);
}

/// Velocity from a movement intent (x/z plane), keeps vertical velocity.
pub fn apply_intent(body: &mut PhysicsBody, direction: Vec2, speed: f32) {
    let direction = direction.normalize_or_zero();
    body.velocity.x = direction.x * speed;
    body.velocity.z = direction.y * speed;
}
