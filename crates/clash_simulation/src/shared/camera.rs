//! Camera rig: follow, shake, hard lock, perspective projection.
//!
//! Проекция: `s = fov / (z_rel + fov)`, screen = xy_rel * s + viewport / 2.
//! Позиция камеры сглаживается (exponential), shake аддитивный и затухает.

use bevy::prelude::*;

use crate::components::{Fighter, PhysicsBody};
use crate::config::{CameraTuning, MatchConfig, Viewport};
use crate::DeterministicRng;

/// Минимальный знаменатель проекции (точка за камерой не проецируется)
const MIN_PROJECTION_DENOM: f32 = 1e-3;
const SHAKE_CUTOFF: f32 = 0.05;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub fov: f32,
    /// Current shake magnitude.
    pub shake: f32,
    /// Remaining frames of the full-screen flash.
    pub flash_frames: u32,
    pub tuning: CameraTuning,
}

impl CameraRig {
    pub fn new(tuning: CameraTuning) -> Self {
        Self {
            position: tuning.home_position(),
            fov: tuning.default_fov,
            shake: 0.0,
            flash_frames: 0,
            tuning,
        }
    }

    /// Raise shake to at least `magnitude` (hits never cancel a bigger shake).
    pub fn kick(&mut self, magnitude: f32) {
        self.shake = self.shake.max(magnitude);
    }

    pub fn flash(&mut self, frames: u32) {
        self.flash_frames = self.flash_frames.max(frames);
    }

    /// Hard lock: centre on the target, lifted by `lock_lift`.
    pub fn lock_on(&mut self, target: Vec3) {
        self.position.x = target.x;
        self.position.y = target.y - self.tuning.lock_lift;
    }

    pub fn ease_fov(&mut self, target: f32, rate: f32) {
        self.fov += (target - self.fov) * rate;
    }

    /// World → screen. `None` when the point is at or behind the camera plane.
    pub fn project(&self, world: Vec3, viewport: Viewport) -> Option<ScreenPoint> {
        let relative = world - self.position;
        let denom = relative.z + self.fov;
        if denom <= MIN_PROJECTION_DENOM {
            return None;
        }
        let scale = self.fov / denom;
        Some(ScreenPoint {
            x: relative.x * scale + viewport.width / 2.0,
            y: relative.y * scale + viewport.height / 2.0,
            scale,
            depth: relative.z,
        })
    }
}

impl FromWorld for CameraRig {
    fn from_world(world: &mut World) -> Self {
        let tuning = world
            .get_resource::<MatchConfig>()
            .map(|config| config.camera.clone())
            .unwrap_or_default();
        Self::new(tuning)
    }
}

/// Projected point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Perspective scale to apply to sprite sizes.
    pub scale: f32,
    pub depth: f32,
}

/// Normal-frame tracking: midpoint follow, FOV return, shake decay, flash countdown.
pub fn update_camera(
    fighters: Query<&PhysicsBody, With<Fighter>>,
    mut camera: ResMut<CameraRig>,
    mut rng: ResMut<DeterministicRng>,
) {
    let default_fov = camera.tuning.default_fov;
    let return_rate = camera.tuning.fov_return_rate;
    if camera.fov < default_fov {
        camera.ease_fov(default_fov, return_rate);
    }

    let mut count = 0.0;
    let mut sum_x = 0.0;
    for body in fighters.iter() {
        sum_x += body.position.x;
        count += 1.0;
    }
    if count > 0.0 {
        let midpoint = sum_x / count;
        let follow = camera.tuning.follow_rate;
        camera.position.x += (midpoint - camera.position.x) * follow;
    }

    let shake = camera.shake;
    let home_y = camera.tuning.home[1];
    camera.position.x += rng.jitter(shake);
    camera.position.y = home_y + rng.jitter(shake);

    camera.shake *= camera.tuning.shake_decay;
    if camera.shake < SHAKE_CUTOFF {
        camera.shake = 0.0;
    }
    camera.flash_frames = camera.flash_frames.saturating_sub(1);
}
