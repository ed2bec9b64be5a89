//! Projectile flight + proximity hit against the owner's opponent.

use bevy::prelude::*;

use super::damage::{apply_damage, force_stun, DamageKind, DamageOutcome};
use super::{with_fighters, CombatCtx, FighterData};

const PROJECTILE_KNOCKBACK: f32 = 15.0;

/// System: move, age, hit-test projectiles (normal frames only).
pub fn update_projectiles(mut fighters: Query<FighterData>, mut ctx: CombatCtx) {
    let mut flying = std::mem::take(&mut ctx.effects.projectiles);

    for projectile in flying.iter_mut() {
        projectile.position += projectile.velocity;
        projectile.life -= 1;
        if projectile.life <= 0 {
            continue;
        }

        let Some(target) = ctx.roster.opponent_of(projectile.owner) else {
            continue;
        };
        with_fighters(&mut fighters, target, Some(projectile.owner), |victim, owner| {
            if !victim.is_alive() {
                return;
            }
            let offset = victim.body.position - projectile.position;
            // проверка только по горизонтали (x/z)
            if Vec2::new(offset.x, offset.z).length() > projectile.radius {
                return;
            }

            let outcome = apply_damage(&mut ctx, victim, owner, projectile.damage, DamageKind::Projectile);
            if outcome == (DamageOutcome::Applied { amount: projectile.damage, killed: false }) {
                force_stun(victim, projectile.stun);
                victim.body.velocity.x = projectile.velocity.x.signum() * PROJECTILE_KNOCKBACK;
            }

            let at = projectile.position;
            ctx.burst(at, "#ffffff", 8);
            let CombatCtx { effects, rng, camera, .. } = &mut ctx;
            effects.spawn_debris(rng, at, 15);
            camera.kick(10.0);
            projectile.life = 0;
        });
    }

    // снаряды, заспавненные во время обхода, сохраняются
    let spawned = std::mem::replace(&mut ctx.effects.projectiles, flying);
    ctx.effects.projectiles.extend(spawned);
}
