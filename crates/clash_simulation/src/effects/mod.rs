//! Ephemeral effect registry: particles, projectiles, lightning.
//!
//! Любая система может заспавнить эффект; никто не держит на него ссылку.
//! Particles и lightning стареют на 1 за кадр (`age_effects`), projectiles
//! двигаются и стареют в `combat::projectile`. Всё с life ≤ 0 удаляет `prune`.

use bevy::prelude::*;
use rand::Rng;

use crate::DeterministicRng;

/// Visual kind tag (renderer picks the art).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Text,
    Burst,
    Spark,
    Debris,
    SlashBw,
    SpatialRend,
    ImpactCore,
    ImpactRing,
    ImpactLight,
    Residue,
    Aura,
}

impl EffectKind {
    /// Lifetime in frames.
    pub fn lifetime(self) -> i32 {
        match self {
            EffectKind::Text => 60,
            EffectKind::Burst => 20,
            EffectKind::Spark => 15,
            EffectKind::Debris => 40,
            EffectKind::SlashBw => 12,
            EffectKind::SpatialRend => 20,
            EffectKind::ImpactCore => 20,
            EffectKind::ImpactRing => 25,
            EffectKind::ImpactLight => 30,
            EffectKind::Residue => 30,
            EffectKind::Aura => 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub kind: EffectKind,
    pub color: &'static str,
    pub text: Option<String>,
    pub life: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    BloodBeam,
    Red,
    HollowPurple,
    FireArrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub kind: ProjectileKind,
    pub owner: Entity,
    pub damage: u32,
    pub radius: f32,
    pub stun: u32,
    pub life: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lightning {
    pub position: Vec3,
    pub color: &'static str,
    pub life: i32,
}

impl Lightning {
    pub const LIFETIME: i32 = 10;
}

/// Активный набор эффектов матча (без capacity bound, self-limit через life)
#[derive(Resource, Debug, Default)]
pub struct EffectRegistry {
    pub particles: Vec<Particle>,
    pub projectiles: Vec<Projectile>,
    pub lightnings: Vec<Lightning>,
}

impl EffectRegistry {
    pub fn spawn_particle(&mut self, rng: &mut DeterministicRng, position: Vec3, kind: EffectKind, color: &'static str) {
        let velocity = match kind {
            EffectKind::Spark | EffectKind::Burst | EffectKind::Residue => Vec3::new(
                rng.jitter(16.0),
                rng.jitter(16.0),
                rng.jitter(16.0),
            ),
            EffectKind::Aura => Vec3::new(rng.jitter(4.0), -rng.rng.gen_range(1.0..4.0), 0.0),
            _ => Vec3::ZERO,
        };
        self.particles.push(Particle {
            position,
            velocity,
            kind,
            color,
            text: None,
            life: kind.lifetime(),
        });
    }

    /// Floating callout text.
    pub fn spawn_text(&mut self, position: Vec3, text: impl Into<String>, color: &'static str) {
        self.particles.push(Particle {
            position,
            velocity: Vec3::new(0.0, -2.0, 0.0),
            kind: EffectKind::Text,
            color,
            text: Some(text.into()),
            life: EffectKind::Text.lifetime(),
        });
    }

    pub fn spawn_burst(&mut self, rng: &mut DeterministicRng, position: Vec3, color: &'static str, count: u32) {
        for _ in 0..count {
            self.spawn_particle(rng, position, EffectKind::Burst, color);
        }
    }

    /// Обломки: разлетаются вверх, падают под гравитацией
    pub fn spawn_debris(&mut self, rng: &mut DeterministicRng, position: Vec3, count: u32) {
        for _ in 0..count {
            let velocity = Vec3::new(rng.jitter(20.0), -rng.rng.gen_range(5.0..15.0), rng.jitter(20.0));
            self.particles.push(Particle {
                position,
                velocity,
                kind: EffectKind::Debris,
                color: "#555555",
                text: None,
                life: EffectKind::Debris.lifetime(),
            });
        }
    }

    pub fn spawn_lightning(&mut self, position: Vec3, color: &'static str) {
        self.lightnings.push(Lightning {
            position,
            color,
            life: Lightning::LIFETIME,
        });
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Один кадр жизни для particles + lightning.
    pub fn age_particles(&mut self) {
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            if particle.kind == EffectKind::Debris {
                particle.velocity.y += 1.0;
            } else {
                particle.velocity *= 0.9;
            }
            particle.life -= 1;
        }
        for bolt in &mut self.lightnings {
            bolt.life -= 1;
        }
    }

    /// Drop everything with life ≤ 0. Running it twice in a row is a no-op.
    pub fn prune(&mut self) {
        self.particles.retain(|p| p.life > 0);
        self.projectiles.retain(|p| p.life > 0);
        self.lightnings.retain(|l| l.life > 0);
    }

    pub fn len(&self) -> usize {
        self.particles.len() + self.projectiles.len() + self.lightnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.particles.iter().filter_map(|p| p.text.as_deref())
    }
}

/// Runs in normal and cutscene frames (projectiles stay suspended in cutscenes).
pub fn age_effects(mut registry: ResMut<EffectRegistry>) {
    registry.age_particles();
}

pub fn prune_effects(mut registry: ResMut<EffectRegistry>) {
    registry.prune();
}
