//! Deferred action scheduler
//!
//! Follow-ups (strike resolution, Black Flash impact, residue/spark bursts) are queued
//! by target active frame and store entity ids only. Everything is re-validated when it
//! fires: caster/target exist, alive, still in range.
//!
//! Keyed on `SimClock::active_tick`, so the queue pauses during timing freezes and cutscenes.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::damage::{apply_damage, force_stun, DamageKind, DamageOutcome};
use super::timing_window::resolve_impact;
use super::{with_fighters, CombatCtx, FighterData};
use crate::characters::StrikeSpec;
use crate::effects::EffectKind;

const SPARK_INTERVAL: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    /// Single-phase skill strike.
    Strike {
        caster: Entity,
        spec: &'static StrikeSpec,
    },
    BlackFlashImpact { caster: Entity },
    /// Residue particles at a fixed point, rescheduled until `remaining` runs out.
    ResidueBurst { at: Vec3, remaining: u8 },
    /// Sparks on a target, rescheduled until `remaining` runs out.
    SparkBurst { target: Entity, remaining: u8 },
}

/// Очередь отложенных действий (fire_at, seq) → action
#[derive(Resource, Debug, Default)]
pub struct DeferredQueue {
    queue: BTreeMap<(u64, u64), DeferredAction>,
    next_seq: u64,
}

impl DeferredQueue {
    /// Queue `action` to fire `delay` active frames after `now` (at least one).
    pub fn schedule(&mut self, now: u64, delay: u32, action: DeferredAction) {
        let fire_at = now + u64::from(delay.max(1));
        self.queue.insert((fire_at, self.next_seq), action);
        self.next_seq += 1;
    }

    /// Remove and return everything due at or before `now`, in schedule order.
    pub fn drain_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let later = self.queue.split_off(&(now + 1, 0));
        std::mem::replace(&mut self.queue, later).into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &DeferredAction> {
        self.queue.values()
    }
}

/// System: срабатывание отложенных действий текущего кадра
pub fn fire_deferred_actions(mut fighters: Query<FighterData>, mut ctx: CombatCtx) {
    let now = ctx.clock.active_tick;
    for action in ctx.deferred.drain_due(now) {
        match action {
            DeferredAction::Strike { caster, spec } => resolve_strike(&mut fighters, &mut ctx, caster, spec),
            DeferredAction::BlackFlashImpact { caster } => {
                let opponent = ctx.roster.opponent_of(caster);
                with_fighters(&mut fighters, caster, opponent, |me, them| {
                    resolve_impact(&mut ctx, me, them)
                });
            }
            DeferredAction::ResidueBurst { at, remaining } => {
                for _ in 0..3 {
                    let CombatCtx { effects, rng, .. } = &mut ctx;
                    effects.spawn_particle(rng, at, EffectKind::Residue, "#ff0055");
                }
                if remaining > 1 {
                    let interval = ctx.config.black_flash.residue_interval;
                    ctx.schedule(
                        interval,
                        DeferredAction::ResidueBurst {
                            at,
                            remaining: remaining - 1,
                        },
                    );
                }
            }
            DeferredAction::SparkBurst { target, remaining } => {
                let Ok(item) = fighters.get(target) else {
                    continue;
                };
                if !item.fighter.is_alive() {
                    continue;
                }
                let at = item.body.position + Vec3::new(0.0, -80.0, 0.0);
                for _ in 0..4 {
                    let CombatCtx { effects, rng, .. } = &mut ctx;
                    effects.spawn_particle(rng, at, EffectKind::Spark, "#ffffff");
                }
                if remaining > 1 {
                    ctx.schedule(
                        SPARK_INTERVAL,
                        DeferredAction::SparkBurst {
                            target,
                            remaining: remaining - 1,
                        },
                    );
                }
            }
        }
    }
}

/// Strike re-check at fire time: hit if the opponent is alive, within range and
/// (for line attacks) within depth tolerance; otherwise a MISS callout.
pub fn resolve_strike(
    fighters: &mut Query<FighterData>,
    ctx: &mut CombatCtx,
    caster: Entity,
    spec: &'static StrikeSpec,
) {
    let opponent = ctx.roster.opponent_of(caster);
    with_fighters(fighters, caster, opponent, |me, them| {
        if !me.is_alive() {
            return;
        }

        let target = them.filter(|target| {
            let in_range = target.is_alive() && me.distance_to(target) <= spec.range;
            let in_depth = spec
                .depth_tolerance
                .is_none_or(|tol| (target.body.position.z - me.body.position.z).abs() <= tol);
            in_range && in_depth
        });

        let Some(target) = target else {
            let at = me.body.position + Vec3::new(me.fighter.facing * 50.0, -50.0, 0.0);
            ctx.text(at, "MISS", "#aaaaaa");
            return;
        };

        let outcome = apply_damage(ctx, target, Some(&mut *me), spec.damage, DamageKind::Strike);
        if let DamageOutcome::Applied { killed, .. } = outcome {
            if !killed {
                force_stun(target, spec.stun);
                target.body.velocity.x = me.fighter.facing * spec.knockback;
                target.body.velocity.y = spec.lift;
            }
            let at = target.body.position + Vec3::new(0.0, -80.0, 0.0);
            {
                let CombatCtx { effects, rng, .. } = &mut *ctx;
                effects.spawn_particle(rng, at, spec.impact, spec.color);
            }
            ctx.burst(at, spec.color, 6);
            ctx.camera.kick(spec.shake);
            if spec.lightning {
                ctx.effects.spawn_lightning(at, spec.color);
            }
            if spec.sparks > 0 {
                ctx.schedule(
                    SPARK_INTERVAL,
                    DeferredAction::SparkBurst {
                        target: target.entity,
                        remaining: spec.sparks,
                    },
                );
            }
        }
    });
}
