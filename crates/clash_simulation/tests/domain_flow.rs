//! Domain expansion / cutscene flow через `Match`
//!
//! - Yuji: арена заменяется и восстанавливается ровно в исходный набор
//! - Gojo: катсцена → домен, никогда не активны одновременно
//! - выход по запросу, по длительности, по смерти владельца

use bevy::prelude::*;
use clash_simulation::map::MapGenerator;
use clash_simulation::render::Backdrop;
use clash_simulation::*;

fn block(x: f32, z: f32, kind: ObstacleKind) -> Obstacle {
    Obstacle {
        position: Vec3::new(x, 0.0, z),
        width: 200.0,
        height: 150.0,
        depth: 200.0,
        kind,
    }
}

/// Фиксированные раскладки, чтобы сравнение наборов было точным.
struct FixedMap;

impl FixedMap {
    fn initial() -> Vec<Obstacle> {
        vec![block(-800.0, 400.0, ObstacleKind::Lake), block(900.0, 500.0, ObstacleKind::Building)]
    }

    fn houses() -> Vec<Obstacle> {
        vec![
            block(-600.0, 100.0, ObstacleKind::House),
            block(500.0, -200.0, ObstacleKind::House),
            block(700.0, 300.0, ObstacleKind::House),
        ]
    }
}

impl MapGenerator for FixedMap {
    fn initial_layout(&self, _rng: &mut DeterministicRng) -> Vec<Obstacle> {
        Self::initial()
    }

    fn domain_layout(
        &self,
        owner: CharacterKind,
        _current: &[Obstacle],
        _rng: &mut DeterministicRng,
    ) -> Option<Vec<Obstacle>> {
        (owner == CharacterKind::Yuji).then(Self::houses)
    }
}

fn setup(p1: CharacterKind, p2: CharacterKind) -> Match {
    let config = MatchConfig {
        ai_opponent: false,
        ..MatchConfig::default()
    };
    Match::with_map_generator(config, p1, p2, Box::new(FixedMap))
}

fn fill_gauge(game: &mut Match, side: Side, value: f32) {
    let entity = game.entity(side);
    game.world_mut().get_mut::<DomainGauge>(entity).unwrap().value = value;
}

#[test]
fn test_yuji_domain_reshapes_and_restores_exactly() {
    let mut game = setup(CharacterKind::Yuji, CharacterKind::Sukuna);
    assert_eq!(game.obstacles(), FixedMap::initial().as_slice());

    fill_gauge(&mut game, Side::P1, 100.0);
    game.request_domain_expansion(Side::P1);
    game.advance();

    assert!(game.domain().active);
    assert_eq!(game.domain().owner, Some(game.entity(Side::P1)));
    assert_eq!(game.obstacles(), FixedMap::houses().as_slice());
    assert_eq!(game.fighter(Side::P1).unwrap().gauge.value, 0.0);
    assert_eq!(game.hud().banner.as_deref(), Some("DOMAIN EXPANSION"));

    // chip 8 каждые 12 активных кадров
    game.advance_frames(10);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1400);
    game.advance();
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1392);
    // domain damage не заряжает gauge
    assert_eq!(game.fighter(Side::P1).unwrap().gauge.value, 0.0);

    game.end_domain();
    game.advance();

    assert!(!game.domain().active);
    assert_eq!(game.obstacles(), FixedMap::initial().as_slice());

    // после выхода tick больше не срабатывает
    game.advance_frames(40);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1392);
}

#[test]
fn test_expansion_requires_full_gauge() {
    let mut game = setup(CharacterKind::Yuji, CharacterKind::Sukuna);
    fill_gauge(&mut game, Side::P1, 99.0);

    game.request_domain_expansion(Side::P1);
    game.advance();

    assert!(!game.domain().active);
    assert_eq!(game.fighter(Side::P1).unwrap().gauge.value, 99.0);
    assert_eq!(game.obstacles(), FixedMap::initial().as_slice());
}

#[test]
fn test_only_one_domain_at_a_time() {
    let mut game = setup(CharacterKind::Sukuna, CharacterKind::Yuji);
    fill_gauge(&mut game, Side::P1, 100.0);
    fill_gauge(&mut game, Side::P2, 100.0);

    game.request_domain_expansion(Side::P1);
    game.request_domain_expansion(Side::P2);
    game.advance();

    assert_eq!(game.domain().owner, Some(game.entity(Side::P1)));
    assert_eq!(game.domain().character, Some(CharacterKind::Sukuna));
    assert_eq!(game.fighter(Side::P2).unwrap().gauge.value, 100.0);
    // Sukuna не перестраивает арену
    assert_eq!(game.obstacles(), FixedMap::initial().as_slice());
}

#[test]
fn test_owner_death_ends_domain_and_restores_arena() {
    let mut game = setup(CharacterKind::Yuji, CharacterKind::Gojo);
    fill_gauge(&mut game, Side::P1, 100.0);
    game.request_domain_expansion(Side::P1);
    game.advance();
    assert!(game.domain().active);

    let p1 = game.entity(Side::P1);
    game.world_mut().get_mut::<Health>(p1).unwrap().current = 0;
    game.world_mut().get_mut::<Fighter>(p1).unwrap().state = FighterState::Dead;
    game.advance();

    assert!(!game.domain().active);
    assert_eq!(game.obstacles(), FixedMap::initial().as_slice());

    let gojo_hp = game.fighter(Side::P2).unwrap().health.current;
    game.advance_frames(30);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, gojo_hp);
}

#[test]
fn test_domain_expires_after_duration() {
    let config = MatchConfig {
        ai_opponent: false,
        domain_duration: Some(30),
        ..MatchConfig::default()
    };
    let mut game = Match::with_map_generator(config, CharacterKind::Sukuna, CharacterKind::Gojo, Box::new(FixedMap));
    fill_gauge(&mut game, Side::P1, 100.0);
    game.request_domain_expansion(Side::P1);

    game.advance_frames(29);
    assert!(game.domain().active);
    // burst 5 на кадрах 12 и 24
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1000 - 10);

    game.advance();
    assert!(!game.domain().active);
}

#[test]
fn test_gojo_cutscene_hands_off_to_domain() {
    let mut game = setup(CharacterKind::Gojo, CharacterKind::Sukuna);
    fill_gauge(&mut game, Side::P1, 100.0);
    game.request_domain_expansion(Side::P1);
    game.advance();

    assert!(game.cutscene().active);
    assert!(!game.domain().active);
    let p2_before = game.fighter(Side::P2).unwrap();

    // input P2 во время катсцены глотается
    game.press_skill(Side::P2, 3, false);
    let mut saw_backdrop = false;
    for frame in 2..=100 {
        game.advance();
        assert!(game.cutscene().active, "frame {}", frame);
        assert!(!game.domain().active, "frame {}", frame);
        assert_eq!(game.frame_mode(), FrameMode::Cutscene);
        assert!(game.hud().cutscene_active, "frame {}", frame);
        assert!(!game.hud().domain_active, "frame {}", frame);

        if game.cutscene().stage == CutsceneStage::Backdrop && !saw_backdrop {
            saw_backdrop = true;
            let render = game.render_frame();
            assert!(matches!(render.backdrop, Backdrop::CutsceneFade(_)));
            // только владелец
            assert_eq!(render.fighters().count(), 1);
        }
    }
    assert!(saw_backdrop);
    assert_eq!(game.cutscene().stage, CutsceneStage::Signature);
    assert_eq!(game.fighter(Side::P2).unwrap(), p2_before);
    assert_eq!(game.camera().position.x, game.fighter(Side::P1).unwrap().position.x);

    game.advance();
    assert!(!game.cutscene().active);
    assert!(game.domain().active);
    assert!(!game.hud().cutscene_active);
    assert!(game.hud().domain_active);
    assert_eq!(game.domain().character, Some(CharacterKind::Gojo));
    assert_eq!(game.render_frame().backdrop, Backdrop::Domain(CharacterKind::Gojo));

    // первый tick домена: 12 normal кадров после handoff
    game.advance_frames(12);
    let sukuna = game.fighter(Side::P2).unwrap();
    assert_eq!(sukuna.health.current, 1400 - 2);
    assert_eq!(sukuna.state, FighterState::Stun);

    // выход освобождает оппонента из stun
    game.end_domain();
    game.advance();
    assert!(!game.domain().active);
    assert_eq!(game.fighter(Side::P2).unwrap().state, FighterState::Idle);
}

#[test]
fn test_end_request_aborts_cutscene() {
    let mut game = setup(CharacterKind::Gojo, CharacterKind::Yuji);
    fill_gauge(&mut game, Side::P1, 100.0);
    game.request_domain_expansion(Side::P1);
    game.advance_frames(10);
    assert!(game.cutscene().active);

    game.end_domain();
    game.advance();
    assert!(!game.cutscene().active);
    assert!(!game.domain().active);

    game.advance();
    assert_eq!(game.frame_mode(), FrameMode::Normal);
    assert_eq!(game.fighter(Side::P1).unwrap().gauge.value, 0.0);
}

#[test]
fn test_procedural_reshape_changes_obstacle_count() {
    for seed in 0..40 {
        let config = MatchConfig {
            seed,
            ai_opponent: false,
            ..MatchConfig::default()
        };
        let mut game = Match::new(config, CharacterKind::Yuji, CharacterKind::Sukuna);
        let before = game.obstacles().to_vec();
        fill_gauge(&mut game, Side::P1, 100.0);

        game.request_domain_expansion(Side::P1);
        game.advance();

        assert!(game.domain().active, "seed {}", seed);
        assert_ne!(game.obstacles().len(), before.len(), "seed {}", seed);

        game.end_domain();
        game.advance();
        assert_eq!(game.obstacles(), before.as_slice(), "seed {}", seed);
    }
}

#[test]
fn test_opponent_killed_by_domain_tick_stays_dead() {
    let mut game = setup(CharacterKind::Yuji, CharacterKind::Sukuna);
    let p2 = game.entity(Side::P2);
    game.world_mut().get_mut::<Health>(p2).unwrap().current = 5;
    fill_gauge(&mut game, Side::P1, 100.0);
    game.request_domain_expansion(Side::P1);

    // первый chip на 12-м кадре
    game.advance_frames(12);
    let sukuna = game.fighter(Side::P2).unwrap();
    assert_eq!(sukuna.health.current, 0);
    assert_eq!(sukuna.state, FighterState::Dead);
    assert_eq!(game.outcome().winner, Some(Side::P1));
    assert_eq!(game.hud().winner, Some(Side::P1));

    // ещё два интервала: домен активен, tick больше не бьёт
    game.advance_frames(24);
    assert!(game.domain().active);
    let sukuna = game.fighter(Side::P2).unwrap();
    assert_eq!(sukuna.health.current, 0);
    assert_eq!(sukuna.state, FighterState::Dead);
}
