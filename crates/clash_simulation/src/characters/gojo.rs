//! Satoru Gojo: Blue, Red, Hollow Purple, Infinity.
//! Domain (Unlimited Void) opens with a staged cutscene.

use super::*;

pub const STATS: CharacterStats = CharacterStats {
    max_health: 1000,
    max_ce: 1500.0,
    ce_regen: 0.8,
    move_speed: 7.0,
};

pub const DOMAIN: DomainProfile = DomainProfile {
    name: "Unlimited Void",
    style: ArenaStyle::Cinematic,
    tick: DomainTick::Incapacitate {
        damage: 2,
        info_chance: 0.3,
    },
    color: "#ffffff",
};

pub const DRAW: DrawProfile = DrawProfile {
    aura: "#00ffff",
    hair: "#ffffff",
    outfit: "#111111",
};

pub static KIT: [SkillSpec; 4] = [
    SkillSpec {
        name: "BLUE",
        cost: 30.0,
        cooldown: 45,
        effect: SkillEffect::Strike(StrikeSpec {
            delay: 10,
            range: 400.0,
            depth_tolerance: None,
            damage: 35,
            knockback: -15.0,
            lift: 0.0,
            stun: 15,
            sparks: 0,
            shake: 4.0,
            lightning: false,
            impact: EffectKind::Burst,
            color: "#0066ff",
        }),
    },
    SkillSpec {
        name: "RED",
        cost: 50.0,
        cooldown: 120,
        effect: SkillEffect::Charge {
            frames: 30,
            projectile: ProjectileSpec {
                kind: ProjectileKind::Red,
                speed: 30.0,
                damage: 90,
                radius: 70.0,
                life: 50,
                stun: 25,
                lightning: false,
            },
        },
    },
    SkillSpec {
        name: "HOLLOW PURPLE",
        cost: 200.0,
        cooldown: 600,
        effect: SkillEffect::Charge {
            frames: 90,
            projectile: ProjectileSpec {
                kind: ProjectileKind::HollowPurple,
                speed: 25.0,
                damage: 300,
                radius: 120.0,
                life: 80,
                stun: 60,
                lightning: true,
            },
        },
    },
    SkillSpec {
        name: "INFINITY",
        cost: 40.0,
        cooldown: 240,
        effect: SkillEffect::Stance {
            window: 60,
            response: StanceResponse::Nullify,
        },
    },
];
