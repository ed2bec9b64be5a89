//! Map generator: initial arena + domain replacement layouts.
//!
//! Симуляция только snapshot/restore/итерирует набор препятствий;
//! содержимое набора решает `MapGenerator`.

use bevy::prelude::*;
use rand::Rng;

use crate::characters::{ArenaStyle, CharacterKind};
use crate::components::{Obstacle, ObstacleKind};
use crate::DeterministicRng;

/// External map collaborator.
pub trait MapGenerator: Send + Sync {
    fn initial_layout(&self, rng: &mut DeterministicRng) -> Vec<Obstacle>;

    /// Replacement set for an arena-reshaping domain; `None` keeps the arena.
    ///
    /// A returned set must differ in size from `current`.
    fn domain_layout(
        &self,
        owner: CharacterKind,
        current: &[Obstacle],
        rng: &mut DeterministicRng,
    ) -> Option<Vec<Obstacle>>;
}

/// Active generator for the match.
#[derive(Resource)]
pub struct MapSource(pub Box<dyn MapGenerator>);

impl Default for MapSource {
    fn default() -> Self {
        Self(Box::new(ProceduralMap::default()))
    }
}

/// Озеро + случайные здания вне центральной площадки.
#[derive(Debug, Clone)]
pub struct ProceduralMap {
    pub half_width: f32,
    pub half_depth: f32,
    pub building_attempts: u32,
    pub house_attempts: u32,
}

impl Default for ProceduralMap {
    fn default() -> Self {
        Self {
            half_width: 1200.0,
            half_depth: 600.0,
            building_attempts: 6,
            house_attempts: 8,
        }
    }
}

impl MapGenerator for ProceduralMap {
    fn initial_layout(&self, rng: &mut DeterministicRng) -> Vec<Obstacle> {
        let mut obstacles = vec![Obstacle {
            position: Vec3::new(-800.0, 0.0, 400.0),
            width: 300.0,
            height: 10.0,
            depth: 300.0,
            kind: ObstacleKind::Lake,
        }];

        for _ in 0..self.building_attempts {
            let x = rng.rng.gen_range(-self.half_width..self.half_width);
            let z = rng.rng.gen_range(-self.half_depth..self.half_depth);
            // центральная площадка остаётся пустой
            if x.abs() < 700.0 && z.abs() < 300.0 {
                continue;
            }
            let width = rng.rng.gen_range(120.0..220.0);
            obstacles.push(Obstacle {
                position: Vec3::new(x, 0.0, z),
                width,
                height: rng.rng.gen_range(200.0..500.0),
                depth: width,
                kind: ObstacleKind::Building,
            });
        }

        obstacles
    }

    fn domain_layout(
        &self,
        owner: CharacterKind,
        current: &[Obstacle],
        rng: &mut DeterministicRng,
    ) -> Option<Vec<Obstacle>> {
        if owner.domain().style != ArenaStyle::ReshapeArena {
            return None;
        }

        let mut count = self.house_attempts.max(1) as usize;
        if count == current.len() {
            count += 1;
        }

        let houses = (0..count)
            .map(|_| {
                // |x| >= 400: центр остаётся свободным
                let side = if rng.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                let x = side * rng.rng.gen_range(400.0..self.half_width.max(401.0));
                let z = rng.rng.gen_range(-500.0..500.0);
                Obstacle {
                    position: Vec3::new(x, 0.0, z),
                    width: 200.0,
                    height: 150.0,
                    depth: 200.0,
                    kind: ObstacleKind::House,
                }
            })
            .collect();

        Some(houses)
    }
}
