//! Black Flash через полный кадровый цикл
//!
//! Окно таймера считается только в TimingFreeze кадрах. Input обрабатывается до
//! отсчёта, поэтому нажатие в кадре k судится по таймеру после кадра k-1.

use bevy::prelude::*;
use clash_simulation::*;

/// Yuji (P1, x = -200) против Sukuna (P2, x = -100), без AI.
fn duel() -> Match {
    let config = MatchConfig {
        ai_opponent: false,
        ..MatchConfig::default()
    };
    let mut game = Match::new(config, CharacterKind::Yuji, CharacterKind::Sukuna);
    let p2 = game.entity(Side::P2);
    game.world_mut().get_mut::<PhysicsBody>(p2).unwrap().position.x = -100.0;
    game
}

fn set_chain(game: &mut Match, chain: u8) {
    let p1 = game.entity(Side::P1);
    game.world_mut().get_mut::<ComboChain>(p1).unwrap().chain = chain;
}

/// Нажать слот 1 и войти в зону (chain > 0 ⇒ без броска).
fn enter_zone(game: &mut Match) {
    game.press_skill(Side::P1, 1, false);
    game.advance();
    assert_eq!(game.fighter(Side::P1).unwrap().state, FighterState::TimingWindow);
    assert_eq!(game.fighter(Side::P1).unwrap().combo.window_timer, 60);
}

#[test]
fn test_first_press_is_a_normal_hit() {
    let mut game = duel();

    game.press_skill(Side::P1, 1, false);
    game.advance();

    let p1 = game.fighter(Side::P1).unwrap();
    assert_eq!(p1.state, FighterState::Attack);
    assert_eq!(p1.combo.trigger_chance, 5.0);
    assert_eq!(p1.combo.chain, 0);
    assert_eq!(game.frame_mode(), FrameMode::Normal);

    // Divergent Fist: delay 6
    game.advance_frames(6);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1400 - 40);
}

#[test]
fn test_zone_freezes_everything_else() {
    let mut game = duel();
    set_chain(&mut game, 1);
    enter_zone(&mut game);
    assert_eq!(game.fighter(Side::P2).unwrap().state, FighterState::Stun);

    game.set_move_intent(Side::P2, Vec2::new(1.0, 0.0));
    let before = game.snapshot();
    game.press_skill(Side::P2, 3, false);
    game.advance_frames(10);

    assert_eq!(game.frame_mode(), FrameMode::TimingFreeze(game.entity(Side::P1)));
    let after = game.snapshot();
    assert_eq!(after.active_tick, before.active_tick);
    assert_eq!(after.tick, before.tick + 10);
    assert_eq!(after.fighters[1], before.fighters[1]);
    assert_eq!(game.fighter(Side::P1).unwrap().combo.window_timer, 50);
    // камера в hard lock на бойце
    let p1_x = game.fighter(Side::P1).unwrap().position.x;
    assert_eq!(game.camera().position.x, p1_x);
    assert!(game.camera().fov < 400.0);
}

#[test]
fn test_hud_reports_freeze_while_in_the_zone() {
    let mut game = duel();
    set_chain(&mut game, 1);
    assert!(!game.hud().timing_freeze);

    enter_zone(&mut game);
    game.advance();
    assert!(matches!(game.frame_mode(), FrameMode::TimingFreeze(_)));
    assert!(game.hud().timing_freeze);
    assert_eq!(game.hud().fighter(Side::P1).unwrap().state, FighterState::TimingWindow);

    // таймаут: HUD снова normal
    game.advance_frames(60);
    assert_eq!(game.frame_mode(), FrameMode::Normal);
    assert!(!game.hud().timing_freeze);
}

#[test]
fn test_chain_executes_and_impact_lands() {
    let mut game = duel();
    set_chain(&mut game, 1);
    enter_zone(&mut game);

    // таймер 18 к моменту нажатия: окно chain 1 = (13, 23.5)
    game.advance_frames(42);
    assert_eq!(game.fighter(Side::P1).unwrap().combo.window_timer, 18);
    game.press_skill(Side::P1, 1, false);
    game.advance();

    let p1 = game.fighter(Side::P1).unwrap();
    assert_eq!(p1.state, FighterState::Attack);
    assert_eq!(p1.combo.chain, 2);
    assert_eq!(p1.pose, 2);

    // impact через 6 активных кадров
    game.advance_frames(5);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1400);
    game.advance();

    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1400 - 180);
    let p1 = game.fighter(Side::P1).unwrap();
    assert_eq!(p1.state, FighterState::Idle);
    assert_eq!(p1.combo.chain, 2);
    assert!(p1.cooldowns.is_ready(SkillSlot::Primary));
    assert!(p1.gauge.value >= 20.0);
    assert!(game.effects().texts().any(|text| text == "BLACK FLASH x2"));
}

#[test]
fn test_finisher_through_frame_loop() {
    let mut game = duel();
    set_chain(&mut game, 3);
    enter_zone(&mut game);

    // chain 3: окно (19, 20.5), попадает только таймер 20
    game.advance_frames(40);
    game.press_skill(Side::P1, 1, false);
    game.advance();
    assert_eq!(game.fighter(Side::P1).unwrap().combo.chain, 4);

    game.advance_frames(6);

    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1400 - 300);
    let p1 = game.fighter(Side::P1).unwrap();
    assert_eq!(p1.combo.chain, 0);
    assert_eq!(p1.combo.trigger_chance, 0.0);
    // 90, минус тик того же кадра
    assert_eq!(p1.cooldowns.remaining(SkillSlot::Primary), 89);
}

#[test]
fn test_timeout_breaks_chain() {
    let mut game = duel();
    set_chain(&mut game, 2);
    enter_zone(&mut game);

    game.advance_frames(59);
    assert_eq!(game.fighter(Side::P1).unwrap().state, FighterState::TimingWindow);
    assert_eq!(game.fighter(Side::P1).unwrap().combo.window_timer, 1);

    game.advance();

    let p1 = game.fighter(Side::P1).unwrap();
    assert_eq!(p1.state, FighterState::Idle);
    assert_eq!(p1.combo.chain, 0);
    assert_eq!(p1.cooldowns.remaining(SkillSlot::Primary), 30);
    assert!(game.effects().texts().any(|text| text == "TIMEOUT"));

    // следующий кадр снова normal
    game.advance();
    assert_eq!(game.frame_mode(), FrameMode::Normal);
    assert_eq!(game.fighter(Side::P1).unwrap().cooldowns.remaining(SkillSlot::Primary), 29);
}

#[test]
fn test_early_press_fails() {
    let mut game = duel();
    set_chain(&mut game, 1);
    enter_zone(&mut game);

    game.press_skill(Side::P1, 1, false);
    game.advance();

    let results = game.drain_skill_results();
    assert_eq!(
        results.last().map(|result| result.outcome),
        Some(SkillOutcome::ChainFailed(clash_simulation::combat::ChainFailure::TooEarly))
    );
    assert_eq!(game.fighter(Side::P1).unwrap().combo.chain, 0);
    assert_eq!(game.fighter(Side::P2).unwrap().health.current, 1400);
}

#[test]
fn test_render_frame_shows_timing_overlay() {
    let mut game = duel();
    set_chain(&mut game, 1);
    enter_zone(&mut game);
    game.advance_frames(42);

    let frame = game.render_frame();
    let overlay = frame.timing.expect("overlay while in the zone");
    assert_eq!(overlay.timer, 18);
    assert_eq!(overlay.chain, 1);
    assert!(overlay.in_window);
}
