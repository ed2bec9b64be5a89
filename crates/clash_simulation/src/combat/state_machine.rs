//! Fighter state machine: per-frame timers, ce regen, movement, facing, physics.
//!
//! Переходы по таймерам:
//! - Attack → Idle (attack timer)
//! - Charging → Attack (выпуск снаряда по достижении charge frames)
//! - CounterStance → Idle (stance window)
//! - Stun → Idle (stun timer)
//! - Idle ⇄ Run (movement intent)
//!
//! `TimingWindow` ждёт второго нажатия / timeout (см. timing_window). `Dead` терминальное.

use bevy::prelude::*;

use super::{CombatCtx, FighterData, FighterDataItem};
use crate::characters::SkillEffect;
use crate::components::FighterState;
use crate::effects::Projectile;
use crate::physics::{self, ArenaBounds};

/// Recovery after a projectile release.
const RELEASE_RECOVERY: u32 = 12;

pub fn update_fighters(mut fighters: Query<FighterData>, mut ctx: CombatCtx) {
    let positions: Vec<(Entity, Vec3)> = fighters
        .iter()
        .map(|item| (item.entity, item.body.position))
        .collect();

    for mut me in fighters.iter_mut() {
        me.cooldowns.tick();

        if me.fighter.state.is_dead() {
            physics::integrate(&mut me.body, false, ArenaBounds::default());
            continue;
        }

        me.energy.regenerate();
        step_state(&mut ctx, &mut me);

        let opponent_pos = ctx
            .roster
            .opponent_of(me.entity)
            .and_then(|opponent| positions.iter().find(|(entity, _)| *entity == opponent))
            .map(|(_, position)| *position);
        if let Some(target) = opponent_pos {
            face_toward(&mut me, target);
        }

        let running = me.fighter.state == FighterState::Run;
        physics::integrate(&mut me.body, running, ArenaBounds::default());
    }
}

fn step_state(ctx: &mut CombatCtx, me: &mut FighterDataItem) {
    match me.fighter.state {
        FighterState::Attack => {
            me.timers.attack = me.timers.attack.saturating_sub(1);
            if me.timers.attack == 0 {
                me.fighter.state = FighterState::Idle;
                if me.combo.chain == 0 {
                    me.fighter.pose = 0;
                }
            }
        }
        FighterState::Charging => step_charge(ctx, me),
        FighterState::CounterStance => {
            me.timers.stance = me.timers.stance.saturating_sub(1);
            if me.timers.stance == 0 {
                me.fighter.state = FighterState::Idle;
                me.timers.stance_slot = None;
            }
        }
        FighterState::Stun => {
            me.timers.stun = me.timers.stun.saturating_sub(1);
            if me.timers.stun == 0 {
                me.fighter.state = FighterState::Idle;
            }
        }
        FighterState::Idle | FighterState::Run => {
            let direction = me.intent.direction;
            if direction != Vec2::ZERO {
                me.fighter.state = FighterState::Run;
                let speed = me.fighter.character.stats().move_speed;
                physics::apply_intent(&mut me.body, direction, speed);
            } else if me.fighter.state == FighterState::Run {
                me.fighter.state = FighterState::Idle;
            }
        }
        FighterState::TimingWindow | FighterState::Dead => {}
    }
}

fn step_charge(ctx: &mut CombatCtx, me: &mut FighterDataItem) {
    let charge = me
        .timers
        .charging_slot
        .map(|slot| me.fighter.character.skill(slot).effect);
    let Some(SkillEffect::Charge { frames, projectile }) = charge else {
        me.fighter.state = FighterState::Idle;
        me.timers.clear_techniques();
        return;
    };

    me.timers.charge += 1;
    if me.timers.charge % 6 == 0 {
        let aura = me.fighter.character.draw_profile().aura;
        ctx.burst(me.body.position + Vec3::new(0.0, -80.0, 0.0), aura, 2);
    }
    if me.timers.charge < frames {
        return;
    }

    let facing = me.fighter.facing;
    let origin = me.strike_origin();
    ctx.effects.spawn_projectile(Projectile {
        position: origin,
        velocity: Vec3::new(facing * projectile.speed, 0.0, 0.0),
        kind: projectile.kind,
        owner: me.entity,
        damage: projectile.damage,
        radius: projectile.radius,
        stun: projectile.stun,
        life: projectile.life,
    });
    if projectile.lightning {
        ctx.effects.spawn_lightning(origin, "#aa66ff");
        ctx.camera.kick(10.0);
    }

    me.fighter.state = FighterState::Attack;
    me.timers.attack = RELEASE_RECOVERY;
    me.timers.clear_techniques();
}

/// Neutral, charging and stance states turn to face the opponent.
fn face_toward(me: &mut FighterDataItem, target: Vec3) {
    let turns = matches!(
        me.fighter.state,
        FighterState::Idle | FighterState::Run | FighterState::Charging | FighterState::CounterStance
    );
    let dx = target.x - me.body.position.x;
    if turns && dx.abs() > f32::EPSILON {
        me.fighter.facing = dx.signum();
    }
}
