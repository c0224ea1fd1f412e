//! The player's marble and its boost meter

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::{BoostTuning, PhysicsTuning};

/// The single dynamic body in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Recomputed every tick, never persisted
    #[serde(skip)]
    pub acceleration: Vec3,
    /// Fixed for the session
    radius: f32,
    /// True iff ground contact was resolved this tick
    pub grounded: bool,
    /// Visual rolling orientation
    pub orientation: Quat,
}

impl DynamicBody {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            radius,
            grounded: false,
            orientation: Quat::IDENTITY,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Lowest point of the sphere
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.radius
    }

    /// Highest point of the sphere
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y + self.radius
    }

    /// Speed in the x/z plane
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        self.velocity.x.hypot(self.velocity.z)
    }

    /// Put the marble back at `position` at rest
    pub fn respawn(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.grounded = false;
        self.orientation = Quat::IDENTITY;
    }

    /// Spin the marble as if it rolled without slipping for `dt` seconds.
    ///
    /// The axis lies in the ground plane, perpendicular to the velocity.
    pub fn roll(&mut self, dt: f32) {
        let axis = Vec3::new(-self.velocity.z, 0.0, self.velocity.x);
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let angle = self.velocity.length() * dt / self.radius;
        if angle.is_finite() {
            self.orientation = (self.orientation * Quat::from_axis_angle(axis, angle)).normalize();
        }
    }
}

/// Depletable resource gating the boost force and speed bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostMeter {
    pub value: f32,
    /// Whether boost was active during the last update
    pub boosting: bool,
}

impl BoostMeter {
    pub fn full(tuning: &BoostTuning) -> Self {
        Self {
            value: tuning.meter_max,
            boosting: false,
        }
    }

    /// Drain while boost is held and the meter is non-empty, otherwise recharge.
    /// Returns whether boosting is active this tick.
    pub fn update(&mut self, boost_held: bool, dt: f32, tuning: &BoostTuning) -> bool {
        if boost_held && self.value > 0.0 {
            self.boosting = true;
            self.value = (self.value - tuning.drain_rate * dt).max(0.0);
        } else {
            self.boosting = false;
            self.value = (self.value + tuning.recharge_rate * dt).min(tuning.meter_max);
        }
        self.value = self.value.clamp(0.0, tuning.meter_max);
        self.boosting
    }

    /// Fill level in [0, 1]
    pub fn fraction(&self, tuning: &PhysicsTuning) -> f32 {
        if tuning.boost.meter_max <= 0.0 {
            0.0
        } else {
            (self.value / tuning.boost.meter_max).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_extents() {
        let body = DynamicBody::new(Vec3::new(0.0, 2.0, 0.0), 0.5);
        assert!((body.bottom() - 1.5).abs() < 1e-6);
        assert!((body.top() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_respawn_clears_motion() {
        let mut body = DynamicBody::new(Vec3::ZERO, 0.5);
        body.velocity = Vec3::new(3.0, -4.0, 1.0);
        body.grounded = true;
        body.respawn(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(!body.grounded);
        assert_eq!(body.position, Vec3::new(0.0, 5.0, 0.0));
        assert!((body.radius() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_roll_turns_about_ground_axis() {
        let mut body = DynamicBody::new(Vec3::ZERO, 0.5);
        body.velocity = Vec3::new(1.0, 0.0, 0.0);
        body.roll(0.5);
        // Rolled distance 0.5 on radius 0.5 => 1 radian about +z
        let expected = Quat::from_axis_angle(Vec3::Z, 1.0);
        assert!(body.orientation.angle_between(expected) < 1e-4);

        // At rest nothing changes
        let before = body.orientation;
        body.velocity = Vec3::ZERO;
        body.roll(1.0);
        assert_eq!(body.orientation, before);
    }

    #[test]
    fn test_boost_drain_and_recharge() {
        let tuning = BoostTuning::default();
        let mut meter = BoostMeter::full(&tuning);

        assert!(meter.update(true, 1.0, &tuning));
        assert!((meter.value - 70.0).abs() < 1e-4);

        // Drains to empty and stops boosting
        for _ in 0..10 {
            meter.update(true, 1.0, &tuning);
        }
        assert_eq!(meter.value, 0.0);
        assert!(!meter.update(true, 1.0, &tuning));
        // That failed attempt recharged instead
        assert!((meter.value - 20.0).abs() < 1e-4);

        for _ in 0..10 {
            meter.update(false, 1.0, &tuning);
        }
        assert_eq!(meter.value, tuning.meter_max);
    }
}
