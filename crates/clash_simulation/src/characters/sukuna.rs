//! Ryomen Sukuna: Cleave, Dismantle, Fuga, counter stance.

use super::*;

pub const STATS: CharacterStats = CharacterStats {
    max_health: 1400,
    max_ce: 1200.0,
    ce_regen: 0.6,
    move_speed: 7.5,
};

pub const DOMAIN: DomainProfile = DomainProfile {
    name: "Malevolent Shrine",
    style: ArenaStyle::Standard,
    tick: DomainTick::Burst { damage: 5 },
    color: "#aa0000",
};

pub const DRAW: DrawProfile = DrawProfile {
    aura: "#ff0000",
    hair: "#ffaaaa",
    outfit: "#eeeeee",
};

pub static KIT: [SkillSpec; 4] = [
    SkillSpec {
        name: "CLEAVE",
        cost: 20.0,
        cooldown: 25,
        effect: SkillEffect::Strike(StrikeSpec {
            delay: 6,
            range: 150.0,
            depth_tolerance: None,
            damage: 50,
            knockback: 8.0,
            lift: 0.0,
            stun: 15,
            sparks: 0,
            shake: 4.0,
            lightning: false,
            impact: EffectKind::SlashBw,
            color: "#ffffff",
        }),
    },
    SkillSpec {
        name: "DISMANTLE",
        cost: 40.0,
        cooldown: 90,
        effect: SkillEffect::Strike(StrikeSpec {
            delay: 8,
            range: 400.0,
            depth_tolerance: Some(80.0),
            damage: 70,
            knockback: 6.0,
            lift: 0.0,
            stun: 20,
            sparks: 2,
            shake: 5.0,
            lightning: false,
            impact: EffectKind::SlashBw,
            color: "#ff4444",
        }),
    },
    SkillSpec {
        name: "FUGA",
        cost: 150.0,
        cooldown: 480,
        effect: SkillEffect::Charge {
            frames: 60,
            projectile: ProjectileSpec {
                kind: ProjectileKind::FireArrow,
                speed: 35.0,
                damage: 250,
                radius: 100.0,
                life: 60,
                stun: 40,
                lightning: true,
            },
        },
    },
    SkillSpec {
        name: "COUNTER",
        cost: 30.0,
        cooldown: 150,
        effect: SkillEffect::Stance {
            window: 30,
            response: StanceResponse::Counter {
                damage: 50,
                range: 160.0,
                knockback: 25.0,
                stun: 25,
            },
        },
    },
];
