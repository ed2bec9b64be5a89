//! World components: arena obstacles.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Категория препятствия (выбирает вариант отрисовки)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Lake,
    Building,
    /// Shrine district houses of Yuji's domain.
    House,
}

/// Static axis-aligned volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub kind: ObstacleKind,
}

/// Набор препятствий арены + snapshot на время домена
#[derive(Resource, Debug, Clone, Default)]
pub struct Arena {
    pub obstacles: Vec<Obstacle>,
    snapshot: Option<Vec<Obstacle>>,
}

impl Arena {
    /// Swap in a domain layout, keeping the current set for `restore`.
    ///
    /// A second replace while one is pending keeps the first snapshot.
    pub fn replace(&mut self, layout: Vec<Obstacle>) {
        let previous = std::mem::replace(&mut self.obstacles, layout);
        if self.snapshot.is_none() {
            self.snapshot = Some(previous);
        }
    }

    /// Returns true if a snapshot was restored.
    pub fn restore(&mut self) -> bool {
        match self.snapshot.take() {
            Some(original) => {
                self.obstacles = original;
                true
            }
            None => false,
        }
    }

    pub fn is_reshaped(&self) -> bool {
        self.snapshot.is_some()
    }
}
