//! Camera and shared scene state.
//!
//! These types avoid referencing platform APIs so the whole simulation can be
//! exercised in host-side tests. The frontends consume them to build view
//! matrices and to decide what is visible.

use glam::{Mat4, Vec3};

use crate::constants::{camera_start_vec3, FADE_START, FADE_STEP};

/// Simple right-handed camera with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: camera_start_vec3(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: 75.0_f32.to_radians(),
            znear: 0.1,
            zfar: 100_000.0,
        }
    }
}

/// Global scene flags with explicit ownership: `intro_started` is a one-way
/// latch flipped by the first planet click; `room_out` is written only by the
/// camera tour and read by the effect spawner.
#[derive(Clone, Debug)]
pub struct SceneFlags {
    pub intro_started: bool,
    pub room_out: bool,
    pub fade_opacity: f32,
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self {
            intro_started: false,
            room_out: false,
            fade_opacity: FADE_START,
        }
    }
}

impl SceneFlags {
    /// Advance the post-intro fade; a no-op before the intro.
    pub fn step_fade(&mut self) {
        if self.intro_started && self.fade_opacity < 1.0 {
            self.fade_opacity = (self.fade_opacity + FADE_STEP).min(1.0);
        }
    }
}

/// User orbit-control state. Disabled while the scripted tour owns the
/// camera; re-enabled when the tour finishes.
#[derive(Clone, Debug)]
pub struct OrbitState {
    pub enabled: bool,
    pub auto_rotate: bool,
    pub target: Vec3,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            enabled: false,
            auto_rotate: true,
            target: Vec3::ZERO,
        }
    }
}
