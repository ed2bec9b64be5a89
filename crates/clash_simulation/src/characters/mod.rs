//! Character capability table
//!
//! Per-character dispatch goes through `CharacterKind`: stats, the four-slot
//! skill kit, the domain profile, and the draw profile handed to the renderer.
//! Skill *resolution* lives in `combat::skills`; this module is pure data.

use serde::{Deserialize, Serialize};

use crate::components::{FighterState, SkillSlot};
use crate::effects::{EffectKind, ProjectileKind};

pub mod gojo;
pub mod sukuna;
pub mod yuji;

pub use yuji::DIVERGENT_FIST;

/// Identity tag бойца
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    Yuji,
    Gojo,
    Sukuna,
}

/// Базовые характеристики персонажа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterStats {
    pub max_health: u32,
    pub max_ce: f32,
    /// ce per frame
    pub ce_regen: f32,
    /// units per frame while running
    pub move_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaStyle {
    /// Snapshot the arena, swap in a generated layout, restore on end.
    ReshapeArena,
    /// Expansion plays a staged cutscene first.
    Cinematic,
    Standard,
}

/// Recurring effect of a domain on the opponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainTick {
    /// Unavoidable chip damage with slash particles.
    SlashChip { damage: u32 },
    /// Opponent held in `Stun` for the duration, low chip damage.
    Incapacitate { damage: u32, info_chance: f32 },
    /// Moderate damage with an aura burst.
    Burst { damage: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainProfile {
    pub name: &'static str,
    pub style: ArenaStyle,
    pub tick: DomainTick,
    /// Aura colour used by the banner and the domain backdrop.
    pub color: &'static str,
}

/// Colours handed to the renderer; the art itself is external.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawProfile {
    pub aura: &'static str,
    pub hair: &'static str,
    pub outfit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: &'static str,
    pub blur: f32,
}

impl DrawProfile {
    /// Aura glow for the current state (none when calm).
    pub fn glow(&self, state: FighterState, ce: f32) -> Option<Glow> {
        match state {
            FighterState::TimingWindow => Some(Glow {
                color: "#ff0055",
                blur: 50.0,
            }),
            FighterState::Dead => None,
            FighterState::Charging => Some(Glow {
                color: self.aura,
                blur: 20.0,
            }),
            _ if ce > 800.0 => Some(Glow {
                color: self.aura,
                blur: 20.0,
            }),
            _ => None,
        }
    }
}

/// Описание одной техники (слот кита)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillSpec {
    /// Callout text spawned on use.
    pub name: &'static str,
    pub cost: f32,
    pub cooldown: u32,
    pub effect: SkillEffect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// Two-phase Black Flash gate; costs and cooldowns come from `BlackFlashTuning`.
    TimingChain,
    /// Attack state, deferred proximity strike.
    Strike(StrikeSpec),
    /// Wind-up then projectile release.
    Charge { frames: u32, projectile: ProjectileSpec },
    /// Timed stance that intercepts incoming strikes and projectiles.
    Stance { window: u32, response: StanceResponse },
}

/// Deferred melee/ranged strike, re-validated when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeSpec {
    pub delay: u32,
    pub range: f32,
    /// Additional |Δz| limit for line attacks.
    pub depth_tolerance: Option<f32>,
    pub damage: u32,
    /// Velocity along caster facing; negative pulls toward the caster.
    pub knockback: f32,
    pub lift: f32,
    pub stun: u32,
    /// Follow-up spark bursts on the target, one every 5 frames.
    pub sparks: u8,
    pub shake: f32,
    pub lightning: bool,
    pub impact: EffectKind,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    pub speed: f32,
    pub damage: u32,
    /// Horizontal hit radius.
    pub radius: f32,
    pub life: i32,
    pub stun: u32,
    pub lightning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StanceResponse {
    /// Strike back if the attacker is within range.
    Counter {
        damage: u32,
        range: f32,
        knockback: f32,
        stun: u32,
    },
    /// Absorb the hit without retaliating.
    Nullify,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 3] = [CharacterKind::Yuji, CharacterKind::Gojo, CharacterKind::Sukuna];

    pub fn display_name(self) -> &'static str {
        match self {
            CharacterKind::Yuji => "Yuji Itadori",
            CharacterKind::Gojo => "Satoru Gojo",
            CharacterKind::Sukuna => "Ryomen Sukuna",
        }
    }

    pub fn stats(self) -> CharacterStats {
        match self {
            CharacterKind::Yuji => yuji::STATS,
            CharacterKind::Gojo => gojo::STATS,
            CharacterKind::Sukuna => sukuna::STATS,
        }
    }

    pub fn domain(self) -> DomainProfile {
        match self {
            CharacterKind::Yuji => yuji::DOMAIN,
            CharacterKind::Gojo => gojo::DOMAIN,
            CharacterKind::Sukuna => sukuna::DOMAIN,
        }
    }

    pub fn draw_profile(self) -> DrawProfile {
        match self {
            CharacterKind::Yuji => yuji::DRAW,
            CharacterKind::Gojo => gojo::DRAW,
            CharacterKind::Sukuna => sukuna::DRAW,
        }
    }

    pub fn kit(self) -> &'static [SkillSpec; 4] {
        match self {
            CharacterKind::Yuji => &yuji::KIT,
            CharacterKind::Gojo => &gojo::KIT,
            CharacterKind::Sukuna => &sukuna::KIT,
        }
    }

    pub fn skill(self, slot: SkillSlot) -> &'static SkillSpec {
        &self.kit()[slot.index()]
    }
}
