//! Third-person orbit camera
//!
//! Orbits the marble on a sphere parameterized by yaw, pitch and distance, and
//! eases toward its target position each frame. The yaw is also what makes
//! movement input camera-relative.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Orbit limits and feel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Lowest pitch (radians, below the horizon)
    pub min_pitch: f32,
    /// Highest pitch (radians)
    pub max_pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per wheel delta unit
    pub zoom_rate: f32,
    /// Fraction of the remaining gap closed per frame
    pub smoothing: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_pitch: -FRAC_PI_3,
            max_pitch: FRAC_PI_2,
            min_distance: 10.0,
            max_distance: 30.0,
            zoom_rate: 0.01,
            smoothing: 0.1,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Orbit camera state.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub config: CameraConfig,
    /// Horizontal orbit angle; 0 puts the camera on the +z side of the marble
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Smoothed eye position
    pub position: Vec3,
    /// Look-at point (the marble)
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: FRAC_PI_6,
            distance: 20.0,
            position: Vec3::new(0.0, 15.0, 20.0),
            target: Vec3::ZERO,
        }
    }

    /// Apply a mouse drag in pixels
    pub fn orbit(&mut self, dx: f32, dy: f32, sensitivity: f32, invert_y: bool) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let dy = if invert_y { -dy } else { dy };
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity)
            .clamp(self.config.min_pitch, self.config.max_pitch);
    }

    /// Apply a wheel delta
    pub fn zoom(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.distance = (self.distance + delta * self.config.zoom_rate)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Where the eye wants to be for the current angles around `focus`
    pub fn desired_position(&self, focus: Vec3) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let horizontal = cos_pitch * self.distance;
        focus
            + Vec3::new(
                sin_yaw * horizontal,
                sin_pitch * self.distance,
                cos_yaw * horizontal,
            )
    }

    /// Ease toward the orbit position around `focus`
    pub fn follow(&mut self, focus: Vec3) {
        if !focus.is_finite() {
            return;
        }
        let desired = self.desired_position(focus);
        self.position = self.position.lerp(desired, self.config.smoothing);
        self.target = focus;
    }

    /// Jump straight to the orbit position (level load, reset)
    pub fn snap(&mut self, focus: Vec3) {
        self.position = self.desired_position(focus);
        self.target = focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_and_zoom_clamped() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, -10_000.0, 0.003, false);
        assert_eq!(cam.pitch, cam.config.max_pitch);
        cam.orbit(0.0, 10_000.0, 0.003, false);
        assert_eq!(cam.pitch, cam.config.min_pitch);

        cam.zoom(1e6);
        assert_eq!(cam.distance, 30.0);
        cam.zoom(-1e6);
        assert_eq!(cam.distance, 10.0);
        cam.zoom(f32::NAN);
        assert_eq!(cam.distance, 10.0);
    }

    #[test]
    fn test_invert_y() {
        let mut a = OrbitCamera::default();
        let mut b = OrbitCamera::default();
        a.orbit(0.0, 50.0, 0.003, false);
        b.orbit(0.0, 50.0, 0.003, true);
        assert!(a.pitch < FRAC_PI_6);
        assert!(b.pitch > FRAC_PI_6);
    }

    #[test]
    fn test_zero_yaw_sits_behind_marble() {
        let mut cam = OrbitCamera::default();
        cam.snap(Vec3::ZERO);
        assert!(cam.position.z > 0.0);
        assert!(cam.position.x.abs() < 1e-5);
        assert!((cam.position.length() - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn test_follow_converges() {
        let mut cam = OrbitCamera::default();
        let focus = Vec3::new(40.0, 3.0, -5.0);
        for _ in 0..200 {
            cam.follow(focus);
        }
        assert!((cam.position - cam.desired_position(focus)).length() < 1e-3);
        assert_eq!(cam.target, focus);
    }
}
