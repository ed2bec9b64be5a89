//! Damage application, stun, death.
//!
//! Любое состояние кроме `Dead` может получить урон. Stance-состояние
//! перехватывает strikes/projectiles (counter или nullify).

use bevy::prelude::*;

use super::{CombatCtx, FighterDataItem};
use crate::characters::{SkillEffect, StanceResponse};
use crate::components::FighterState;
use crate::logger;

/// Источник урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Strike,
    Projectile,
    /// Domain tick, unavoidable.
    Domain,
    /// Retaliation from a counter stance; cannot itself be countered.
    Counter,
}

impl DamageKind {
    pub fn can_be_intercepted(self) -> bool {
        matches!(self, DamageKind::Strike | DamageKind::Projectile)
    }
}

/// Результат apply_damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target already dead.
    Ignored,
    Nullified,
    Countered,
    Applied { amount: u32, killed: bool },
}

/// Event: урон нанесён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub attacker: Option<Entity>,
    pub amount: u32,
    pub kind: DamageKind,
}

/// Event: боец умер (health → 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FighterDied {
    pub fighter: Entity,
    pub killer: Option<Entity>,
}

/// Apply `amount` to `target`. `attacker` gains domain gauge and may be countered.
pub fn apply_damage(
    ctx: &mut CombatCtx,
    target: &mut FighterDataItem,
    attacker: Option<&mut FighterDataItem>,
    amount: u32,
    kind: DamageKind,
) -> DamageOutcome {
    if !target.is_alive() {
        return DamageOutcome::Ignored;
    }

    if target.fighter.state == FighterState::CounterStance && kind.can_be_intercepted() {
        if let Some(response) = stance_response(target) {
            return intercept(ctx, target, attacker, response);
        }
    }

    target.health.take_damage(amount);
    let attacker_id = attacker.as_ref().map(|a| a.entity);
    ctx.damage_events.write(DamageDealt {
        target: target.entity,
        attacker: attacker_id,
        amount,
        kind,
    });

    if let Some(attacker) = attacker {
        if kind != DamageKind::Domain {
            let gain = amount as f32 * ctx.config.gauge_per_damage;
            attacker.gauge.gain(gain);
        }
    }

    let killed = !target.health.is_alive();
    if killed {
        target.fighter.state = FighterState::Dead;
        target.fighter.pose = 0;
        target.body.halt_horizontal();
        target.timers.clear_techniques();
        target.combo.window_timer = 0;
        ctx.death_events.write(FighterDied {
            fighter: target.entity,
            killer: attacker_id,
        });
        logger::log_info(&format!(
            "{} ({:?}) is down",
            target.fighter.character.display_name(),
            target.fighter.side
        ));
    }

    DamageOutcome::Applied { amount, killed }
}

/// Force `Stun` for `frames`, zeroing horizontal velocity. No-op on the dead.
pub fn force_stun(target: &mut FighterDataItem, frames: u32) {
    if !target.is_alive() {
        return;
    }
    target.fighter.state = FighterState::Stun;
    target.timers.stun = frames;
    target.timers.attack = 0;
    target.timers.clear_techniques();
    target.combo.window_timer = 0;
    target.body.halt_horizontal();
}

fn stance_response(target: &FighterDataItem) -> Option<StanceResponse> {
    let slot = target.timers.stance_slot?;
    match target.fighter.character.skill(slot).effect {
        SkillEffect::Stance { response, .. } => Some(response),
        _ => None,
    }
}

fn intercept(
    ctx: &mut CombatCtx,
    target: &mut FighterDataItem,
    attacker: Option<&mut FighterDataItem>,
    response: StanceResponse,
) -> DamageOutcome {
    match response {
        StanceResponse::Nullify => {
            let at = target.head();
            ctx.text(at, "INFINITY", "#00ffff");
            ctx.burst(target.body.position, "#00ffff", 6);
            DamageOutcome::Nullified
        }
        StanceResponse::Counter {
            damage,
            range,
            knockback,
            stun,
        } => {
            target.fighter.state = FighterState::Attack;
            target.timers.attack = 15;
            target.timers.clear_techniques();
            let at = target.head();
            ctx.text(at, "COUNTER", "#ffcc00");
            ctx.camera.kick(8.0);

            if let Some(attacker) = attacker {
                if attacker.is_alive() && target.distance_to(attacker) <= range {
                    let outcome =
                        apply_damage(ctx, attacker, Some(&mut *target), damage, DamageKind::Counter);
                    if outcome == (DamageOutcome::Applied { amount: damage, killed: false }) {
                        force_stun(attacker, stun);
                        attacker.body.velocity.x = target.fighter.facing * knockback;
                    }
                    let at = attacker.body.position;
                    ctx.burst(at, "#ffcc00", 8);
                }
            }
            DamageOutcome::Countered
        }
    }
}
