//! Kinematic integration of the marble
//!
//! Forces → velocity → tentative position. The resolver corrects the result
//! afterwards, so nothing here knows about level geometry.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::body::{BoostMeter, DynamicBody};
use crate::sanitize_planar;
use crate::tuning::PhysicsTuning;

/// Player intent for one tick, produced by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Planar direction in camera space: x = right, y = backward (+z). Magnitude ≤ 1.
    pub direction: Vec2,
    /// Jump button state; a jump fires on its rising edge
    pub jump_requested: bool,
    /// Boost button state (held)
    pub boost_held: bool,
}

impl InputIntent {
    /// Movement direction with NaN/oversized input cleaned up
    pub fn sanitized_direction(&self) -> Vec2 {
        sanitize_planar(self.direction)
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub intent: InputIntent,
    /// Current camera yaw (radians); movement is camera-relative
    pub camera_yaw: f32,
    /// Restart the level this tick
    pub reset: bool,
}

/// What happened during integration that the rest of the tick cares about
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationOutcome {
    pub boosting: bool,
    pub jumped: bool,
}

/// Rotate a camera-space planar direction into a world-space horizontal vector
#[inline]
pub fn camera_relative(direction: Vec2, camera_yaw: f32) -> Vec3 {
    let yaw = if camera_yaw.is_finite() { camera_yaw } else { 0.0 };
    Quat::from_rotation_y(yaw) * Vec3::new(direction.x, 0.0, direction.y)
}

/// Advance `body` by `dt` seconds.
///
/// `jump_was_held` is the jump state from the previous tick and is updated in place,
/// so a held button jumps once.
pub fn integrate(
    body: &mut DynamicBody,
    boost: &mut BoostMeter,
    jump_was_held: &mut bool,
    input: &TickInput,
    dt: f32,
    tuning: &PhysicsTuning,
) -> IntegrationOutcome {
    let intent = &input.intent;

    body.acceleration = Vec3::new(0.0, -tuning.gravity, 0.0);

    let boosting = boost.update(intent.boost_held, dt, &tuning.boost);

    let direction = intent.sanitized_direction();
    let has_input = direction.length_squared() > 0.0;
    if has_input {
        let force = if boosting {
            tuning.boost.force
        } else {
            tuning.move_force
        };
        let control = if body.grounded { 1.0 } else { tuning.air_control };
        body.acceleration += camera_relative(direction, input.camera_yaw) * force * control;
    }

    body.velocity += body.acceleration * dt;

    let friction = if body.grounded {
        if has_input {
            tuning.friction.ground
        } else {
            tuning.friction.roll
        }
    } else {
        tuning.friction.air
    };
    body.velocity.x *= friction;
    body.velocity.z *= friction;

    let cap = tuning.speed_cap(body.grounded, boosting);
    let horizontal = Vec2::new(body.velocity.x, body.velocity.z);
    if horizontal.length() > cap {
        let clamped = horizontal.normalize_or_zero() * cap;
        body.velocity.x = clamped.x;
        body.velocity.z = clamped.y;
    }

    body.position += body.velocity * dt;

    if body.grounded {
        body.roll(dt);
    }

    let rising_edge = intent.jump_requested && !*jump_was_held;
    *jump_was_held = intent.jump_requested;
    let jumped = rising_edge && body.grounded;
    if jumped {
        body.velocity.y = tuning.jump_speed;
        // Optimistic; the resolver re-confirms next tick
        body.grounded = false;
    }

    IntegrationOutcome { boosting, jumped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (DynamicBody, BoostMeter, bool, PhysicsTuning) {
        let tuning = PhysicsTuning::default();
        let body = DynamicBody::new(Vec3::new(0.0, 10.0, 0.0), tuning.radius);
        let meter = BoostMeter::full(&tuning.boost);
        (body, meter, false, tuning)
    }

    fn forward(boost: bool) -> TickInput {
        TickInput {
            intent: InputIntent {
                direction: Vec2::new(0.0, -1.0),
                jump_requested: false,
                boost_held: boost,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_gravity_only() {
        let (mut body, mut meter, mut jump, tuning) = setup();
        let input = TickInput::default();
        let mut last_y = body.position.y;
        let n = 30;
        for _ in 0..n {
            integrate(&mut body, &mut meter, &mut jump, &input, DT, &tuning);
            assert!(body.position.y < last_y);
            last_y = body.position.y;
        }
        let expected = -tuning.gravity * n as f32 * DT;
        assert!((body.velocity.y - expected).abs() < 1e-3);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);
    }

    #[test]
    fn test_camera_relative_rotation() {
        // Forward (-z) with the camera turned a quarter turn maps to -x
        let world = camera_relative(Vec2::new(0.0, -1.0), FRAC_PI_2);
        assert!((world - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
        // Zero yaw leaves direction untouched
        let world = camera_relative(Vec2::new(1.0, 0.0), 0.0);
        assert!((world - Vec3::X).length() < 1e-6);
        // Non-finite yaw is ignored
        let world = camera_relative(Vec2::new(1.0, 0.0), f32::NAN);
        assert!((world - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_air_control_reduces_force() {
        let (mut ground, mut m1, mut j1, tuning) = setup();
        let (mut air, mut m2, mut j2, _) = setup();
        ground.grounded = true;
        integrate(&mut ground, &mut m1, &mut j1, &forward(false), DT, &tuning);
        integrate(&mut air, &mut m2, &mut j2, &forward(false), DT, &tuning);
        let g = ground.velocity.z.abs() / tuning.friction.ground;
        let a = air.velocity.z.abs() / tuning.friction.air;
        assert!((a / g - tuning.air_control).abs() < 1e-4);
    }

    #[test]
    fn test_friction_selection() {
        let (mut body, mut meter, mut jump, tuning) = setup();
        body.grounded = true;
        body.velocity = Vec3::new(10.0, 0.0, 0.0);
        integrate(&mut body, &mut meter, &mut jump, &TickInput::default(), DT, &tuning);
        assert!((body.velocity.x - 10.0 * tuning.friction.roll).abs() < 1e-4);

        body.grounded = false;
        body.velocity = Vec3::new(10.0, 5.0, 0.0);
        integrate(&mut body, &mut meter, &mut jump, &TickInput::default(), DT, &tuning);
        assert!((body.velocity.x - 10.0 * tuning.friction.air).abs() < 1e-4);
        // Vertical velocity is never damped, only accelerated by gravity
        assert!((body.velocity.y - (5.0 - tuning.gravity * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_speed_cap_clamps_preserving_direction() {
        let (mut body, mut meter, mut jump, tuning) = setup();
        body.grounded = false;
        body.velocity = Vec3::new(300.0, 0.0, 400.0);
        integrate(&mut body, &mut meter, &mut jump, &TickInput::default(), DT, &tuning);
        assert!((body.horizontal_speed() - tuning.max_speed.air).abs() < 1e-3);
        assert!((body.velocity.x / body.velocity.z - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_jump_rising_edge_only() {
        let (mut body, mut meter, mut jump, tuning) = setup();
        let press = TickInput {
            intent: InputIntent {
                jump_requested: true,
                ..Default::default()
            },
            ..Default::default()
        };

        body.grounded = true;
        let out = integrate(&mut body, &mut meter, &mut jump, &press, DT, &tuning);
        assert!(out.jumped);
        assert_eq!(body.velocity.y, tuning.jump_speed);
        assert!(!body.grounded);

        // Holding the button while grounded again does not re-jump
        body.grounded = true;
        body.velocity.y = 0.0;
        let out = integrate(&mut body, &mut meter, &mut jump, &press, DT, &tuning);
        assert!(!out.jumped);
        assert!(body.velocity.y < 0.0);

        // Release then press jumps again
        integrate(&mut body, &mut meter, &mut jump, &TickInput::default(), DT, &tuning);
        body.grounded = true;
        let out = integrate(&mut body, &mut meter, &mut jump, &press, DT, &tuning);
        assert!(out.jumped);
    }

    #[test]
    fn test_no_jump_in_air() {
        let (mut body, mut meter, mut jump, tuning) = setup();
        let press = TickInput {
            intent: InputIntent {
                jump_requested: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let out = integrate(&mut body, &mut meter, &mut jump, &press, DT, &tuning);
        assert!(!out.jumped);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn test_nan_intent_is_no_input() {
        let (mut body, mut meter, mut jump, tuning) = setup();
        let input = TickInput {
            intent: InputIntent {
                direction: Vec2::new(f32::NAN, 1.0),
                ..Default::default()
            },
            ..Default::default()
        };
        integrate(&mut body, &mut meter, &mut jump, &input, DT, &tuning);
        assert!(body.velocity.is_finite());
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);
    }

    fn sustained_speed(grounded: bool, boost: bool, ticks: usize) -> (f32, f32, PhysicsTuning) {
        let (mut body, mut meter, mut jump, mut tuning) = setup();
        // Unlimited boost meter so the boosted cap is reachable
        tuning.boost.drain_rate = 0.0;
        let input = forward(boost);
        let mut max_seen: f32 = 0.0;
        for _ in 0..ticks {
            body.grounded = grounded;
            let out = integrate(&mut body, &mut meter, &mut jump, &input, DT, &tuning);
            body.position.y = 10.0;
            body.velocity.y = 0.0;
            assert_eq!(out.boosting, boost);
            max_seen = max_seen.max(body.horizontal_speed());
        }
        (body.horizontal_speed(), max_seen, tuning)
    }

    #[test]
    fn test_sustained_input_never_exceeds_caps() {
        let (_, max_ground, t) = sustained_speed(true, false, 2000);
        assert!(max_ground <= t.max_speed.ground + 1e-3);
        let (_, max_air, t) = sustained_speed(false, false, 2000);
        assert!(max_air <= t.max_speed.air + 1e-3);
        let (_, max_boost, t) = sustained_speed(true, true, 2000);
        assert!(max_boost <= t.max_speed.ground * t.boost.speed_multiplier + 1e-3);
    }

    proptest! {
        #[test]
        fn prop_horizontal_speed_capped(
            vx in -500.0f32..500.0,
            vz in -500.0f32..500.0,
            dx in -1.0f32..1.0,
            dz in -1.0f32..1.0,
            yaw in -10.0f32..10.0,
            grounded in any::<bool>(),
            boost in any::<bool>(),
        ) {
            let (mut body, mut meter, mut jump, tuning) = setup();
            body.velocity = Vec3::new(vx, 0.0, vz);
            body.grounded = grounded;
            let input = TickInput {
                intent: InputIntent {
                    direction: Vec2::new(dx, dz),
                    jump_requested: false,
                    boost_held: boost,
                },
                camera_yaw: yaw,
                reset: false,
            };
            let out = integrate(&mut body, &mut meter, &mut jump, &input, DT, &tuning);
            let cap = tuning.speed_cap(grounded, out.boosting);
            prop_assert!(body.horizontal_speed() <= cap + 1e-3);
        }
    }
}
