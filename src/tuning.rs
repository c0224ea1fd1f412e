//! Data-driven physics balance
//!
//! Every constant the integrator and resolver read lives here so that a level
//! (or a debug page) can override them from JSON without a rebuild.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Horizontal velocity damping, applied multiplicatively once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friction {
    /// Grounded with movement input
    pub ground: f32,
    /// Airborne
    pub air: f32,
    /// Grounded without movement input
    pub roll: f32,
}

impl Default for Friction {
    fn default() -> Self {
        Self {
            ground: 0.95,
            air: 0.99,
            roll: 0.98,
        }
    }
}

/// Horizontal speed ceilings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedCaps {
    pub ground: f32,
    pub air: f32,
}

impl Default for SpeedCaps {
    fn default() -> Self {
        Self {
            ground: 25.0,
            air: 20.0,
        }
    }
}

/// Boost meter and boost force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostTuning {
    pub meter_max: f32,
    /// Meter units drained per second while boosting
    pub drain_rate: f32,
    /// Meter units recovered per second while not boosting
    pub recharge_rate: f32,
    /// Movement force while boosting (replaces `move_force`)
    pub force: f32,
    /// Ground cap multiplier while boosting
    pub speed_multiplier: f32,
}

impl Default for BoostTuning {
    fn default() -> Self {
        Self {
            meter_max: 100.0,
            drain_rate: 30.0,
            recharge_rate: 20.0,
            force: 60.0,
            speed_multiplier: 1.5,
        }
    }
}

/// Complete physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Input-driven acceleration on the ground (units/s²)
    pub move_force: f32,
    /// Fraction of movement force available while airborne
    pub air_control: f32,
    pub friction: Friction,
    /// Vertical speed set on jump (units/s)
    pub jump_speed: f32,
    pub max_speed: SpeedCaps,
    pub boost: BoostTuning,
    /// Marble radius
    pub radius: f32,
    /// Velocity scale applied after removing the inward component on wall contact
    pub wall_restitution: f32,
    /// Extra distance beyond the radius within which a gem is picked up
    pub gem_pickup_margin: f32,
    /// Distance from a pad's center that activates it
    pub pad_activation_radius: f32,
    /// Longest tick integrated in one step (seconds)
    pub max_dt: f32,
    /// Where the marble starts and respawns
    pub spawn_point: Vec3,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 25.0,
            move_force: 40.0,
            air_control: 0.3,
            friction: Friction::default(),
            jump_speed: 12.0,
            max_speed: SpeedCaps::default(),
            boost: BoostTuning::default(),
            radius: 0.5,
            wall_restitution: 0.8,
            gem_pickup_margin: 1.0,
            pad_activation_radius: 2.0,
            max_dt: crate::consts::MAX_DT,
            spawn_point: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

impl PhysicsTuning {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Self = serde_json::from_str(json).map_err(|e| GameError::InvalidTuning {
            reason: if e.is_syntax() || e.is_eof() {
                "malformed tuning JSON"
            } else {
                "tuning JSON has wrong field types"
            },
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value keeps the integrator stable.
    pub fn validate(&self) -> Result<(), GameError> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);

        if !(self.radius > 0.0) {
            return Err(GameError::InvalidTuning {
                reason: "radius must be > 0",
            });
        }
        if !(self.gravity >= 0.0) {
            return Err(GameError::InvalidTuning {
                reason: "gravity must be >= 0",
            });
        }
        if !in_unit(self.air_control) {
            return Err(GameError::InvalidTuning {
                reason: "air_control must be within [0, 1]",
            });
        }
        if !in_unit(self.friction.ground) || !in_unit(self.friction.air) || !in_unit(self.friction.roll) {
            return Err(GameError::InvalidTuning {
                reason: "friction coefficients must be within [0, 1]",
            });
        }
        if !in_unit(self.wall_restitution) {
            return Err(GameError::InvalidTuning {
                reason: "wall_restitution must be within [0, 1]",
            });
        }
        if !(self.max_speed.ground > 0.0) || !(self.max_speed.air > 0.0) {
            return Err(GameError::InvalidTuning {
                reason: "speed caps must be > 0",
            });
        }
        if !(self.boost.meter_max >= 0.0)
            || !(self.boost.drain_rate >= 0.0)
            || !(self.boost.recharge_rate >= 0.0)
        {
            return Err(GameError::InvalidTuning {
                reason: "boost meter rates must be >= 0",
            });
        }
        if !(self.boost.speed_multiplier >= 1.0) {
            return Err(GameError::InvalidTuning {
                reason: "boost speed_multiplier must be >= 1",
            });
        }
        if !(self.max_dt > 0.0) {
            return Err(GameError::InvalidTuning {
                reason: "max_dt must be > 0",
            });
        }
        Ok(())
    }

    /// Horizontal speed cap for the given movement state
    pub fn speed_cap(&self, grounded: bool, boosting: bool) -> f32 {
        if boosting {
            self.max_speed.ground * self.boost.speed_multiplier
        } else if grounded {
            self.max_speed.ground
        } else {
            self.max_speed.air
        }
    }
}
