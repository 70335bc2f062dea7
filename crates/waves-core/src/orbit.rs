//! Damped orbit controls and the demo's per-frame hook.

use crate::clock::FrameTime;
use crate::constants::{ORBIT_DAMPING_PER_SEC, ORBIT_PITCH_LIMIT, ORBIT_RAD_PER_PX};
use crate::frame::{Animator, FrameHook};
use crate::scene::PerspectiveCamera;
use crate::stats::FpsMeter;
use glam::{Vec2, Vec3};
use std::cell::Cell;
use std::rc::Rc;

/// Pointer drag deltas collected by DOM handlers between ticks.
#[derive(Clone, Default)]
pub struct DragInput {
    pending: Rc<Cell<Vec2>>,
}

impl DragInput {
    pub fn push(&self, dx_px: f32, dy_px: f32) {
        self.pending.set(self.pending.get() + Vec2::new(dx_px, dy_px));
    }

    pub fn take(&self) -> Vec2 {
        self.pending.replace(Vec2::ZERO)
    }
}

/// Spherical camera placement around `target`; drags feed angular velocity
/// that decays exponentially.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    radius: f32,
    velocity: Vec2,
    damping: f32,
}

impl OrbitControls {
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(1e-4);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            radius,
            velocity: Vec2::ZERO,
            damping: ORBIT_DAMPING_PER_SEC,
        }
    }

    pub fn with_damping(mut self, per_sec: f32) -> Self {
        self.damping = per_sec.max(0.0);
        self
    }

    pub fn drag(&mut self, dx_px: f32, dy_px: f32) {
        self.velocity += Vec2::new(-dx_px, dy_px) * ORBIT_RAD_PER_PX;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.radius
    }

    /// Apply a share of the pending velocity and write the camera eye.
    pub fn update(&mut self, dt: f32, camera: &mut PerspectiveCamera) {
        let dt = dt.max(0.0);
        let keep = (-self.damping * dt).exp();
        // integrate the part of the velocity that decays this frame
        let step = self.velocity * (1.0 - keep);
        self.yaw += step.x;
        self.pitch = (self.pitch + step.y).clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
        self.velocity *= keep;
        if self.velocity.length_squared() < 1e-10 {
            self.velocity = Vec2::ZERO;
        }
        camera.target = self.target;
        camera.eye = self.eye();
    }
}

/// Per-frame work of the wave demo: orbit the camera and count frames.
pub struct SceneHook {
    orbit: OrbitControls,
    drags: DragInput,
    fps: FpsMeter,
}

impl SceneHook {
    pub fn new(camera: &PerspectiveCamera, drags: DragInput) -> Self {
        Self {
            orbit: OrbitControls::from_eye(camera.eye, camera.target),
            drags,
            fps: FpsMeter::default(),
        }
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn fps(&self) -> &FpsMeter {
        &self.fps
    }
}

impl FrameHook<PerspectiveCamera> for SceneHook {
    fn update(
        &mut self,
        time: FrameTime,
        camera: &mut PerspectiveCamera,
        _anim: &mut Animator<'_>,
    ) -> anyhow::Result<()> {
        let d = self.drags.take();
        if d != Vec2::ZERO {
            self.orbit.drag(d.x, d.y);
        }
        self.orbit.update(time.delta, camera);
        self.fps.record(time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_eye_round_trips_position() {
        let eye = Vec3::new(0.1, 0.1, 2.0);
        let o = OrbitControls::from_eye(eye, Vec3::ZERO);
        assert!((o.eye() - eye).length() < 1e-5);
    }

    #[test]
    fn idle_controls_leave_camera_alone() {
        let mut cam = PerspectiveCamera::default();
        let before = cam.eye;
        let mut o = OrbitControls::from_eye(cam.eye, cam.target);
        o.update(0.016, &mut cam);
        assert!((cam.eye - before).length() < 1e-5);
    }

    #[test]
    fn velocity_decays_and_radius_holds() {
        let mut cam = PerspectiveCamera::default();
        let radius = cam.eye.length();
        let mut o = OrbitControls::from_eye(cam.eye, cam.target);
        o.drag(40.0, 0.0);
        let v0 = o.velocity().length();
        for _ in 0..30 {
            o.update(1.0 / 60.0, &mut cam);
        }
        assert!(o.velocity().length() < v0);
        assert!((cam.eye.length() - radius).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = PerspectiveCamera::default();
        let mut o = OrbitControls::from_eye(cam.eye, cam.target).with_damping(50.0);
        o.drag(0.0, 100_000.0);
        o.update(1.0, &mut cam);
        let limit = ORBIT_PITCH_LIMIT.sin() * cam.eye.length();
        assert!(cam.eye.y <= limit + 1e-4);
    }

    #[test]
    fn drag_input_accumulates_until_taken() {
        let d = DragInput::default();
        d.push(1.0, 2.0);
        d.clone().push(3.0, -1.0);
        assert_eq!(d.take(), Vec2::new(4.0, 1.0));
        assert_eq!(d.take(), Vec2::ZERO);
    }
}
