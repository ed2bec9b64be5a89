//! Skill dispatch по capability table.
//!
//! Generic contract для слота: busy / cooldown / ce → Rejected (handled, без изменений);
//! иначе списать ce, выставить cooldown, сменить state, запланировать follow-up.
//! Black Flash слот уходит в `timing_window::trigger`.

use bevy::prelude::*;

use super::deferred::DeferredAction;
use super::timing_window::{self, ChainFailure};
use super::{with_fighters, CombatCtx, FighterData, FighterDataItem};
use crate::characters::{SkillEffect, SkillSpec};
use crate::components::{FighterState, SkillSlot};
use crate::frame::FrameMode;
use crate::logger;

/// Event: нажатие слота техники (1-4)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillInput {
    pub fighter: Entity,
    pub slot: u8,
    /// Keyboard auto-repeat; ignored.
    pub repeat: bool,
}

/// Event: результат обработки SkillInput
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillResolved {
    pub fighter: Entity,
    pub slot: u8,
    pub outcome: SkillOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OnCooldown,
    InsufficientEnergy,
    /// Fighter is not in a state that takes input.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    /// Slot not recognized; nothing changed.
    Unhandled,
    /// Recognized but absorbed as a no-op.
    Rejected(RejectReason),
    Performed,
    ZoneEntered,
    NormalHit,
    ChainExecuted { chain: u8 },
    ChainFailed(ChainFailure),
}

impl SkillOutcome {
    pub fn is_handled(&self) -> bool {
        *self != SkillOutcome::Unhandled
    }
}

/// System: обработка SkillInput событий
///
/// Cutscene кадры глотают input; в TimingFreeze принимается только input
/// замороженного бойца.
pub fn process_skill_inputs(
    mut inputs: EventReader<SkillInput>,
    mode: Res<FrameMode>,
    mut fighters: Query<FighterData>,
    mut ctx: CombatCtx,
    mut resolved: EventWriter<SkillResolved>,
) {
    for input in inputs.read() {
        if input.repeat {
            continue;
        }
        match *mode {
            FrameMode::Cutscene => continue,
            FrameMode::TimingFreeze(locked) if locked != input.fighter => continue,
            _ => {}
        }

        let outcome = resolve_skill(&mut fighters, &mut ctx, input.fighter, input.slot);
        logger::log_frame(
            ctx.clock.tick,
            &format!("skill {} from {:?}: {:?}", input.slot, input.fighter, outcome),
        );
        resolved.write(SkillResolved {
            fighter: input.fighter,
            slot: input.slot,
            outcome,
        });
    }
}

/// Dispatch one slot press for `caster`.
pub fn resolve_skill(
    fighters: &mut Query<FighterData>,
    ctx: &mut CombatCtx,
    caster: Entity,
    slot_number: u8,
) -> SkillOutcome {
    let Some(slot) = SkillSlot::from_number(slot_number) else {
        return SkillOutcome::Unhandled;
    };
    let opponent = ctx.roster.opponent_of(caster);

    with_fighters(fighters, caster, opponent, |me, them| {
        let spec = me.fighter.character.skill(slot);
        match spec.effect {
            SkillEffect::TimingChain => timing_window::trigger(ctx, me, them),
            _ => perform(ctx, me, slot, spec),
        }
    })
    .unwrap_or(SkillOutcome::Unhandled)
}

/// Single-phase contract.
fn perform(ctx: &mut CombatCtx, me: &mut FighterDataItem, slot: SkillSlot, spec: &'static SkillSpec) -> SkillOutcome {
    if spec.effect == SkillEffect::TimingChain {
        return SkillOutcome::Unhandled;
    }
    if !me.fighter.state.accepts_input() {
        return SkillOutcome::Rejected(RejectReason::Busy);
    }
    if !me.cooldowns.is_ready(slot) {
        return SkillOutcome::Rejected(RejectReason::OnCooldown);
    }
    if !me.energy.consume(spec.cost) {
        return SkillOutcome::Rejected(RejectReason::InsufficientEnergy);
    }
    me.cooldowns.set(slot, spec.cooldown);
    me.body.halt_horizontal();

    let color = me.fighter.character.draw_profile().aura;
    let head = me.head();
    ctx.text(head, spec.name, color);

    match &spec.effect {
        SkillEffect::Strike(strike) => {
            me.fighter.state = FighterState::Attack;
            me.timers.attack = strike.delay + 8;
            ctx.schedule(
                strike.delay,
                DeferredAction::Strike {
                    caster: me.entity,
                    spec: strike,
                },
            );
        }
        SkillEffect::Charge { .. } => {
            me.fighter.state = FighterState::Charging;
            me.timers.charge = 0;
            me.timers.charging_slot = Some(slot);
        }
        SkillEffect::Stance { window, .. } => {
            me.fighter.state = FighterState::CounterStance;
            me.timers.stance = *window;
            me.timers.stance_slot = Some(slot);
        }
        SkillEffect::TimingChain => {}
    }

    SkillOutcome::Performed
}
