//! Shared: cross-cutting ресурсы
//!
//! - Camera (CameraRig, projection, shake)

pub mod camera;

pub use camera::*;
