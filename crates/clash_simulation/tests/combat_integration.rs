//! Combat integration test
//!
//! Полный матч через `Match` (headless App + SimulationPlugin).
//!
//! Проверяем:
//! - resource bounds инварианты в AI-vs-AI матче
//! - deferred strike срабатывает через заданное число кадров
//! - заряд → снаряд → попадание
//! - мёртвый боец остаётся в render list
//! - HUD snapshot и sink

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use clash_simulation::ai::{AIConfig, AIState};
use clash_simulation::hud::{HudElement, HudSink};
use clash_simulation::render::DrawableKind;
use clash_simulation::*;

/// Helper: матч без AI, P2 вплотную к P1 (P1 на x = -200)
fn duel(p1: CharacterKind, p2: CharacterKind, p2_x: f32) -> Match {
    let config = MatchConfig {
        ai_opponent: false,
        ..MatchConfig::default()
    };
    let mut game = Match::new(config, p1, p2);
    let p2_entity = game.entity(Side::P2);
    game.world_mut()
        .get_mut::<PhysicsBody>(p2_entity)
        .unwrap()
        .position
        .x = p2_x;
    game
}

fn health(game: &Match, side: Side) -> u32 {
    game.fighter(side).unwrap().health.current
}

/// Проверка инвариантов бойца
fn check_invariants(game: &Match, frame: u32) {
    for side in [Side::P1, Side::P2] {
        let view = game.fighter(side).unwrap();
        assert!(view.health.current <= view.health.max, "frame {}: {:?} health", frame, side);
        assert!(
            view.energy.current >= 0.0 && view.energy.current <= view.energy.max,
            "frame {}: {:?} ce {} out of [0, {}]",
            frame,
            side,
            view.energy.current,
            view.energy.max
        );
        assert!(
            (0.0..=100.0).contains(&view.gauge.value),
            "frame {}: {:?} gauge {}",
            frame,
            side,
            view.gauge.value
        );
        assert!(view.combo.chain <= 4, "frame {}: chain {}", frame, view.combo.chain);
        assert!((0.0..=100.0).contains(&view.combo.trigger_chance));
        assert_eq!(view.health.current == 0, view.state == FighterState::Dead, "frame {}", frame);
    }
    assert!(
        !(game.domain().active && game.cutscene().active),
        "frame {}: domain and cutscene both active",
        frame
    );
}

#[test]
fn test_ai_match_keeps_invariants() {
    let config = MatchConfig {
        seed: 123,
        ..MatchConfig::default()
    };
    let mut game = Match::new(config, CharacterKind::Sukuna, CharacterKind::Gojo);
    game.hand_to_ai(Side::P1, AIConfig::default());

    for frame in 0..1500 {
        game.advance();
        check_invariants(&game, frame);
    }
}

#[test]
fn test_hand_to_ai_clears_player_flag() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Gojo, 200.0);
    let p1 = game.entity(Side::P1);
    assert!(game.world().get::<Fighter>(p1).unwrap().is_player);
    assert!(game.world().get::<AIState>(p1).is_none());

    game.hand_to_ai(Side::P1, AIConfig::default());

    assert!(!game.world().get::<Fighter>(p1).unwrap().is_player);
    assert_eq!(game.world().get::<AIState>(p1), Some(&AIState::Approach));
    // P2 не затронут
    let p2 = game.entity(Side::P2);
    assert!(game.world().get::<Fighter>(p2).unwrap().is_player);
    assert!(game.world().get::<AIState>(p2).is_none());
}

#[test]
fn test_dismantle_lands_after_delay() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Gojo, -100.0);

    game.press_skill(Side::P1, 3, false);
    game.advance();
    assert_eq!(game.fighter(Side::P1).unwrap().state, FighterState::Attack);
    assert!(game.fighter(Side::P1).unwrap().energy.current < 1000.0);

    // delay 12 активных кадров
    game.advance_frames(11);
    assert_eq!(health(&game, Side::P2), 1000);

    game.advance();
    assert_eq!(health(&game, Side::P2), 1000 - 90);
    assert!(game.fighter(Side::P1).unwrap().gauge.value > 0.0);
}

#[test]
fn test_repeat_presses_are_ignored() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Gojo, -100.0);

    game.press_skill(Side::P1, 3, true);
    game.advance();

    assert_eq!(game.fighter(Side::P1).unwrap().state, FighterState::Idle);
    assert!(game.drain_skill_results().is_empty());
}

#[test]
fn test_skill_results_are_reported() {
    let mut game = duel(CharacterKind::Gojo, CharacterKind::Sukuna, 200.0);

    game.press_skill(Side::P1, 4, false);
    game.press_skill(Side::P1, 9, false);
    game.advance();

    let results = game.drain_skill_results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].outcome, SkillOutcome::Performed);
    assert_eq!(results[1].outcome, SkillOutcome::Unhandled);
    assert_eq!(game.fighter(Side::P1).unwrap().state, FighterState::CounterStance);
}

#[test]
fn test_charged_projectile_hits_opponent() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Gojo, 200.0);

    game.press_skill(Side::P1, 2, false);
    game.advance();
    assert_eq!(game.fighter(Side::P1).unwrap().state, FighterState::Charging);

    game.advance_frames(70);

    assert_eq!(health(&game, Side::P2), 1000 - 80);
    assert!(game.effects().projectiles.is_empty());
    assert!(!game.fighter(Side::P1).unwrap().cooldowns.is_ready(SkillSlot::Secondary));
}

#[test]
fn test_dead_fighter_stays_in_render_list() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Gojo, -100.0);
    let p2 = game.entity(Side::P2);
    game.world_mut().get_mut::<Health>(p2).unwrap().current = 10;

    game.press_skill(Side::P1, 3, false);
    game.advance_frames(13);

    let view = game.fighter(Side::P2).unwrap();
    assert_eq!(view.state, FighterState::Dead);
    assert_eq!(view.health.current, 0);
    assert_eq!(game.outcome().winner, Some(Side::P1));

    let frame = game.render_frame();
    let fallen: Vec<bool> = frame
        .fighters()
        .map(|drawable| match drawable.kind {
            DrawableKind::Fighter { fallen, .. } => fallen,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(fallen.len(), 2);
    assert_eq!(fallen.iter().filter(|fallen| **fallen).count(), 1);

    // мёртвого больше не бьют
    game.advance_frames(60);
    game.press_skill(Side::P1, 3, false);
    game.advance_frames(20);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 0);
}

#[test]
fn test_render_frame_is_depth_sorted() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Sukuna, 200.0);
    let p2 = game.entity(Side::P2);
    game.world_mut().get_mut::<PhysicsBody>(p2).unwrap().position.z = 300.0;
    game.advance();

    let frame = game.render_frame();
    assert!(frame
        .drawables
        .windows(2)
        .all(|pair| pair[0].world.z >= pair[1].world.z));
    assert!(frame.timing.is_none());
}

struct RecordingSink(Arc<Mutex<Vec<(HudElement, String)>>>);

impl HudSink for RecordingSink {
    fn write(&mut self, element: HudElement, value: &str) -> Result<(), HudError> {
        if element == HudElement::Banner {
            return Err(HudError::MissingElement(element));
        }
        self.0.lock().unwrap().push((element, value.to_string()));
        Ok(())
    }
}

#[test]
fn test_hud_sink_receives_resources() {
    let mut game = duel(CharacterKind::Yuji, CharacterKind::Gojo, 200.0);
    let log = Arc::new(Mutex::new(Vec::new()));
    game.set_hud_sink(Box::new(RecordingSink(log.clone())));

    game.advance();

    let log = log.lock().unwrap();
    assert!(log.contains(&(HudElement::HealthBar(Side::P2), "1000/1000".to_string())));
    assert!(log.iter().any(|(element, _)| *element == HudElement::TriggerChance(Side::P1)));
    assert!(!log.iter().any(|(element, _)| *element == HudElement::TriggerChance(Side::P2)));

    let hud = game.hud();
    assert_eq!(hud.fighters.len(), 2);
    assert_eq!(hud.fighter(Side::P1).unwrap().trigger_chance, Some(0.0));
}
