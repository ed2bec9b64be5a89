//! Simple FSM AI для оппонента
//!
//! Конечный автомат:
//! Approach → Engage → Recover → Approach
//!
//! Архитектура:
//! - AI пишет те же события, что и игрок (`SkillInput`, `DomainExpandInput`)
//! - Выбор техники: случайный готовый и доступный по ce слот
//! - Timing-chain слот AI никогда не нажимает

use bevy::prelude::*;
use rand::Rng;

use crate::characters::SkillEffect;
use crate::combat::SkillInput;
use crate::components::{Cooldowns, CursedEnergy, DomainGauge, Fighter, MoveIntent, PhysicsBody, Roster, SkillSlot};
use crate::domain::{CutsceneState, DomainExpandInput, DomainState};
use crate::logger;
use crate::DeterministicRng;

/// AI FSM состояния
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum AIState {
    /// Approach: идём к оппоненту
    #[default]
    Approach,

    /// Engage: в радиусе, выбираем технику
    Engage,

    /// Recover: пауза после действия
    Recover {
        /// Кадров до следующего решения
        timer: u32,
    },
}

/// Параметры AI
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AIConfig {
    /// Дистанция, с которой AI начинает бить (units)
    pub engage_range: f32,
    /// Пауза после техники (frames)
    pub recover_frames: u32,
    /// Шанс нажать технику в кадре Engage
    pub aggression: f32,
    /// Раскрывать домен при полном gauge
    pub expands_domain: bool,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            engage_range: 180.0,
            recover_frames: 40,
            aggression: 0.1,
            expands_domain: true,
        }
    }
}

type BrainQuery<'w> = (
    Entity,
    &'w mut AIState,
    &'w AIConfig,
    &'w Fighter,
    &'w PhysicsBody,
    &'w CursedEnergy,
    &'w Cooldowns,
    &'w DomainGauge,
    &'w mut MoveIntent,
);

/// Система: AI решения (только normal кадры)
///
/// Обновляет AIState, MoveIntent и шлёт input события.
#[allow(clippy::too_many_arguments)]
pub fn ai_decide(
    mut brains: Query<BrainQuery>,
    bodies: Query<&PhysicsBody, With<Fighter>>,
    roster: Res<Roster>,
    domain: Res<DomainState>,
    cutscene: Res<CutsceneState>,
    mut rng: ResMut<DeterministicRng>,
    mut skills: EventWriter<SkillInput>,
    mut expand: EventWriter<DomainExpandInput>,
) {
    for (entity, mut state, config, fighter, body, energy, cooldowns, gauge, mut intent) in brains.iter_mut() {
        if !fighter.is_alive() {
            intent.direction = Vec2::ZERO;
            continue;
        }
        let Some(target) = roster
            .opponent_of(entity)
            .and_then(|opponent| bodies.get(opponent).ok())
        else {
            intent.direction = Vec2::ZERO;
            continue;
        };

        if config.expands_domain && gauge.is_saturated() && !domain.active && !cutscene.active {
            expand.write(DomainExpandInput { fighter: entity });
            logger::log(&format!("AI {:?} expands domain", entity));
            *state = AIState::Recover {
                timer: config.recover_frames,
            };
            continue;
        }

        let offset = target.position - body.position;
        let distance = Vec2::new(offset.x, offset.z).length();

        let next = match *state {
            AIState::Recover { timer } => {
                intent.direction = Vec2::ZERO;
                if timer <= 1 {
                    AIState::Approach
                } else {
                    AIState::Recover { timer: timer - 1 }
                }
            }
            AIState::Approach | AIState::Engage if distance > config.engage_range => {
                intent.direction = Vec2::new(offset.x, offset.z).normalize_or_zero();
                AIState::Approach
            }
            AIState::Approach | AIState::Engage => {
                intent.direction = Vec2::ZERO;
                if !fighter.state.accepts_input() || !rng.chance(config.aggression) {
                    AIState::Engage
                } else {
                    let ready = usable_slots(fighter, energy, cooldowns);
                    if ready.is_empty() {
                        AIState::Engage
                    } else {
                        let slot = ready[rng.rng.gen_range(0..ready.len())];
                        skills.write(SkillInput {
                            fighter: entity,
                            slot: slot.index() as u8 + 1,
                            repeat: false,
                        });
                        AIState::Recover {
                            timer: config.recover_frames,
                        }
                    }
                }
            }
        };

        if *state != next {
            *state = next;
        }
    }
}

/// Готовые, доступные по ce, не timing-chain слоты.
pub fn usable_slots(fighter: &Fighter, energy: &CursedEnergy, cooldowns: &Cooldowns) -> Vec<SkillSlot> {
    SkillSlot::ALL
        .into_iter()
        .filter(|slot| {
            let spec = fighter.character.skill(*slot);
            spec.effect != SkillEffect::TimingChain
                && cooldowns.is_ready(*slot)
                && energy.can_afford(spec.cost)
        })
        .collect()
}
