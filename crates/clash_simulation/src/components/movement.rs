//! Movement компоненты: позиция/скорость, намерение движения

use bevy::prelude::*;

/// Позиция и скорость в мировых координатах
///
/// Оси: x вправо, y вниз (земля y = 0, прыжок отрицательный), z вглубь экрана.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsBody {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl PhysicsBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// STUN / zone pin: kill horizontal motion, keep vertical.
    pub fn halt_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
    }

    pub fn distance_to(&self, other: &PhysicsBody) -> f32 {
        self.position.distance(other.position)
    }
}

/// Movement intent from player input or AI (x/z plane).
///
/// `Vec2::ZERO` = стоять.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub direction: Vec2,
}
