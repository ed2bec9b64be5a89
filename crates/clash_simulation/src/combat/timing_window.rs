//! Black Flash: two-phase probability/timing gate.
//!
//! Phase A (trigger): roll против trigger_chance (chain в процессе → без броска).
//! Провал → обычный удар + momentum. Успех → `TimingWindow`, оппонент в stun.
//!
//! Phase B (execute): второе нажатие судится по window_timer. Окно сужается с
//! каждым звеном цепи: start += d, end -= d/2 (d = chain × difficulty_step).
//! Таймер идёт вниз, поэтому timer ≥ end это "рано", timer ≤ start "поздно".
//!
//! Impact is deferred (`DeferredAction::BlackFlashImpact`) and re-validated on fire.

use bevy::prelude::*;

use super::damage::{apply_damage, force_stun, DamageKind, DamageOutcome};
use super::deferred::DeferredAction;
use super::skills::{RejectReason, SkillOutcome};
use super::{CombatCtx, FighterData, FighterDataItem};
use crate::characters::DIVERGENT_FIST;
use crate::components::{ComboChain, FighterState, SkillSlot};
use crate::config::BlackFlashTuning;
use crate::effects::EffectKind;
use crate::frame::FrameMode;
use crate::logger;

const ZONE_COLOR: &str = "#ff0055";

/// Success interval for the window timer (exclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub start: f32,
    pub end: f32,
}

impl WindowBounds {
    pub fn for_chain(chain: u8, tuning: &BlackFlashTuning) -> Self {
        let difficulty = f32::from(chain) * tuning.difficulty_step as f32;
        Self {
            start: tuning.window_start as f32 + difficulty,
            end: tuning.window_end as f32 - difficulty / 2.0,
        }
    }

    pub fn judge(&self, timer: u32) -> WindowJudgement {
        let timer = timer as f32;
        if timer > self.start && timer < self.end {
            WindowJudgement::Hit
        } else if timer >= self.end {
            WindowJudgement::Miss(ChainFailure::TooEarly)
        } else {
            WindowJudgement::Miss(ChainFailure::TooLate)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowJudgement {
    Hit,
    Miss(ChainFailure),
}

/// Почему цепь сорвалась
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFailure {
    TooEarly,
    TooLate,
    /// Window ran out with no second input.
    Timeout,
}

impl ChainFailure {
    pub fn feedback(self) -> &'static str {
        match self {
            ChainFailure::TooEarly => "TOO EARLY!",
            ChainFailure::TooLate => "TOO LATE!",
            ChainFailure::Timeout => "TIMEOUT",
        }
    }
}

/// Slot handler for the Black Flash slot (both phases).
pub fn trigger(ctx: &mut CombatCtx, me: &mut FighterDataItem, them: Option<&mut FighterDataItem>) -> SkillOutcome {
    let tuning = ctx.config.black_flash.clone();

    if me.fighter.state == FighterState::TimingWindow {
        return execute(ctx, me, &tuning);
    }
    if !me.fighter.state.accepts_input() {
        return SkillOutcome::Rejected(RejectReason::Busy);
    }
    if !me.cooldowns.is_ready(SkillSlot::Primary) {
        return SkillOutcome::Rejected(RejectReason::OnCooldown);
    }

    // бросок всегда, чтобы поток RNG не зависел от состояния цепи
    let roll = ctx.rng.percent();
    let opened = me.combo.in_progress() || roll < me.combo.trigger_chance;

    if opened {
        enter_zone(ctx, me, them, &tuning)
    } else {
        normal_hit(ctx, me, &tuning)
    }
}

fn normal_hit(ctx: &mut CombatCtx, me: &mut FighterDataItem, tuning: &BlackFlashTuning) -> SkillOutcome {
    if !me.energy.consume(tuning.normal_hit_cost) {
        return SkillOutcome::Rejected(RejectReason::InsufficientEnergy);
    }
    me.cooldowns.set(SkillSlot::Primary, tuning.normal_hit_cooldown);
    me.fighter.state = FighterState::Attack;
    me.fighter.pose = 0;
    me.timers.attack = DIVERGENT_FIST.delay + 14;
    me.body.halt_horizontal();
    me.combo.build_momentum(tuning.chance_step, tuning.chance_cap);

    let head = me.head();
    let origin = me.strike_origin();
    ctx.text(head, "DIVERGENT FIST", "#3388ff");
    ctx.burst(origin, "#3388ff", 4);
    ctx.schedule(
        DIVERGENT_FIST.delay,
        DeferredAction::Strike {
            caster: me.entity,
            spec: &DIVERGENT_FIST,
        },
    );
    SkillOutcome::NormalHit
}

fn enter_zone(
    ctx: &mut CombatCtx,
    me: &mut FighterDataItem,
    them: Option<&mut FighterDataItem>,
    tuning: &BlackFlashTuning,
) -> SkillOutcome {
    if !me.energy.consume(tuning.zone_cost) {
        return SkillOutcome::Rejected(RejectReason::InsufficientEnergy);
    }
    me.fighter.state = FighterState::TimingWindow;
    me.combo.window_timer = tuning.window_timer;
    me.body.halt_horizontal();

    let callout = if me.combo.chain == 0 {
        "THE ZONE".to_string()
    } else {
        // номер следующего удара
        format!("CHAIN {}!", me.combo.chain + 1)
    };
    let head = me.head();
    ctx.text(head, callout, ZONE_COLOR);

    // оппонент рядом: stun, чтобы не ушёл из зоны удара
    if let Some(target) = them {
        if target.is_alive() && me.distance_to(target) <= tuning.zone_entry_range {
            force_stun(target, tuning.stun_frames);
        }
    }

    logger::log(&format!(
        "{:?} entered the zone (chain {})",
        me.fighter.side, me.combo.chain
    ));
    SkillOutcome::ZoneEntered
}

fn execute(ctx: &mut CombatCtx, me: &mut FighterDataItem, tuning: &BlackFlashTuning) -> SkillOutcome {
    let bounds = WindowBounds::for_chain(me.combo.chain, tuning);
    match bounds.judge(me.combo.window_timer) {
        WindowJudgement::Hit => {
            let chain = me.combo.advance();
            me.combo.window_timer = 0;
            me.fighter.state = FighterState::Attack;
            me.fighter.pose = chain;
            me.timers.attack = tuning.impact_delay + 10;

            let origin = me.strike_origin();
            {
                let CombatCtx { effects, rng, .. } = &mut *ctx;
                effects.spawn_particle(rng, origin, EffectKind::SpatialRend, "#000000");
            }
            ctx.schedule(tuning.impact_delay, DeferredAction::BlackFlashImpact { caster: me.entity });
            SkillOutcome::ChainExecuted { chain }
        }
        WindowJudgement::Miss(failure) => {
            fail(ctx, me, failure, tuning);
            SkillOutcome::ChainFailed(failure)
        }
    }
}

/// Failure path shared by a mistimed press and window timeout.
pub fn fail(ctx: &mut CombatCtx, me: &mut FighterDataItem, failure: ChainFailure, tuning: &BlackFlashTuning) {
    me.fighter.state = FighterState::Idle;
    me.fighter.pose = 0;
    me.combo.reset();
    me.cooldowns.set(SkillSlot::Primary, tuning.failure_cooldown);

    let head = me.head();
    ctx.text(head, failure.feedback(), "#888888");
    ctx.camera.kick(5.0);
    logger::log(&format!("{:?} chain broken: {:?}", me.fighter.side, failure));
}

/// Deferred Black Flash impact; the caster's chain decides damage and knockback.
pub fn resolve_impact(ctx: &mut CombatCtx, me: &mut FighterDataItem, them: Option<&mut FighterDataItem>) {
    if !me.is_alive() {
        return;
    }
    let tuning = ctx.config.black_flash.clone();
    let chain = me.combo.chain;
    let finisher = chain >= ComboChain::FINISHER;
    let origin = me.strike_origin();
    let facing = me.fighter.facing;

    ctx.camera.flash(6);
    ctx.camera.kick(60.0 + 10.0 * f32::from(chain));
    {
        let CombatCtx { effects, rng, .. } = &mut *ctx;
        effects.spawn_particle(rng, origin, EffectKind::ImpactCore, "#000000");
        effects.spawn_particle(rng, origin, EffectKind::ImpactRing, ZONE_COLOR);
        effects.spawn_particle(rng, origin, EffectKind::ImpactLight, "#ffffff");
    }
    if tuning.residue_bursts > 0 {
        ctx.schedule(
            tuning.residue_interval,
            DeferredAction::ResidueBurst {
                at: origin,
                remaining: tuning.residue_bursts,
            },
        );
    }

    let target = them.filter(|target| target.is_alive() && me.distance_to(target) <= tuning.impact_range);
    let hit = target.is_some();
    match target {
        Some(target) => {
            let damage = if finisher {
                tuning.finisher_damage
            } else {
                tuning.base_damage + tuning.damage_step * u32::from(chain)
            };
            let outcome = apply_damage(ctx, target, Some(&mut *me), damage, DamageKind::Strike);
            if outcome == (DamageOutcome::Applied { amount: damage, killed: false }) {
                force_stun(target, tuning.stun_frames);
                if finisher {
                    target.body.velocity = Vec3::new(facing * 50.0, -20.0, 0.0);
                } else {
                    target.body.velocity.x = facing * 5.0;
                }
            }
            let callout = if finisher {
                "CRITICAL FINISH".to_string()
            } else {
                format!("BLACK FLASH x{}", chain)
            };
            let at = target.head();
            ctx.text(at, callout, ZONE_COLOR);
            me.gauge.gain(tuning.gauge_gain);
            logger::log_info(&format!("BLACK FLASH chain {} for {}", chain, damage));
        }
        None => {
            let at = me.head();
            ctx.text(at, "WHIFF", "#888888");
        }
    }

    if finisher || !hit {
        me.combo.reset();
        let cooldown = if finisher {
            tuning.finisher_cooldown
        } else {
            tuning.miss_cooldown
        };
        me.cooldowns.set(SkillSlot::Primary, cooldown);
    }
    if me.fighter.state == FighterState::Attack {
        me.fighter.state = FighterState::Idle;
        me.timers.attack = 0;
    }
}

/// System: отсчёт окна Black Flash (только в TimingFreeze кадрах)
///
/// Hard-locks the camera on the fighter and zooms in; timeout forces failure.
pub fn run_timing_freeze(mode: Res<FrameMode>, mut fighters: Query<FighterData>, mut ctx: CombatCtx) {
    let FrameMode::TimingFreeze(locked) = *mode else {
        return;
    };
    let Ok(mut me) = fighters.get_mut(locked) else {
        return;
    };
    if me.fighter.state != FighterState::TimingWindow {
        return;
    }

    me.combo.window_timer = me.combo.window_timer.saturating_sub(1);
    let tuning = ctx.config.black_flash.clone();
    let freeze_fov = ctx.config.camera.freeze_fov;
    let zoom_rate = ctx.config.camera.freeze_zoom_rate;
    ctx.camera.lock_on(me.body.position);
    ctx.camera.ease_fov(freeze_fov, zoom_rate);

    if me.combo.window_timer == 0 {
        fail(&mut ctx, &mut me, ChainFailure::Timeout, &tuning);
    }
}
