//! Yuji Itadori: Black Flash, Piercing Blood, Dismantle, Manji Kick.
//! Domain reshapes the arena into a shrine district.

use super::*;

pub const STATS: CharacterStats = CharacterStats {
    max_health: 1200,
    max_ce: 1000.0,
    ce_regen: 0.5,
    move_speed: 8.0,
};

pub const DOMAIN: DomainProfile = DomainProfile {
    name: "Domain Expansion",
    style: ArenaStyle::ReshapeArena,
    tick: DomainTick::SlashChip { damage: 8 },
    color: "#ff3333",
};

pub const DRAW: DrawProfile = DrawProfile {
    aura: "#3388ff",
    hair: "#ff8899",
    outfit: "#1a1a2e",
};

/// Normal hit of the Black Flash slot when the trigger roll fails.
pub static DIVERGENT_FIST: StrikeSpec = StrikeSpec {
    delay: 6,
    range: 120.0,
    depth_tolerance: None,
    damage: 40,
    knockback: 5.0,
    lift: 0.0,
    stun: 10,
    sparks: 0,
    shake: 3.0,
    lightning: false,
    impact: EffectKind::Burst,
    color: "#3388ff",
};

pub static KIT: [SkillSpec; 4] = [
    SkillSpec {
        name: "BLACK FLASH",
        cost: 0.0,
        cooldown: 0,
        effect: SkillEffect::TimingChain,
    },
    SkillSpec {
        name: "PIERCING BLOOD",
        cost: 40.0,
        cooldown: 180,
        effect: SkillEffect::Charge {
            frames: 40,
            projectile: ProjectileSpec {
                kind: ProjectileKind::BloodBeam,
                speed: 40.0,
                damage: 80,
                radius: 60.0,
                life: 40,
                stun: 20,
                lightning: false,
            },
        },
    },
    SkillSpec {
        name: "DISMANTLE",
        cost: 50.0,
        cooldown: 60,
        effect: SkillEffect::Strike(StrikeSpec {
            delay: 12,
            range: 120.0,
            depth_tolerance: Some(50.0),
            damage: 90,
            knockback: 10.0,
            lift: 0.0,
            stun: 20,
            sparks: 3,
            shake: 5.0,
            lightning: false,
            impact: EffectKind::SlashBw,
            color: "#ffffff",
        }),
    },
    SkillSpec {
        name: "MANJI KICK",
        cost: 30.0,
        cooldown: 120,
        effect: SkillEffect::Stance {
            window: 40,
            response: StanceResponse::Counter {
                damage: 60,
                range: 150.0,
                knockback: 30.0,
                stun: 30,
            },
        },
    },
];
