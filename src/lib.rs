//! Marble Run - A 3D marble-rolling platformer
//!
//! Core modules:
//! - `sim`: Simulation core (integration, collision resolution, progress)
//! - `persistence`: Save/restore snapshots of level progress
//! - `tuning`: Data-driven physics balance
//! - `camera`, `input`, `hud`, `effects`, `frame`: presentation-side glue
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod camera;
pub mod effects;
pub mod error;
pub mod frame;
pub mod hud;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use settings::{QualityPreset, Settings};
pub use tuning::PhysicsTuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame delta used when the host clock has no previous sample
    pub const DEFAULT_DT: f32 = 1.0 / 60.0;
    /// Shortest tick the simulation will integrate (seconds)
    pub const MIN_DT: f32 = 0.0;
    /// Longest tick the simulation will integrate (seconds); longer frames are clamped
    pub const MAX_DT: f32 = 0.1;
}

/// Clamp a host-supplied frame delta into a range the integrator stays stable in.
///
/// Negative, NaN and infinite deltas become 0; tab-stall sized deltas are cut to `max_dt`.
#[inline]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(consts::MIN_DT, max_dt.max(consts::MIN_DT))
}

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Sanitize a planar direction: non-finite components become no input,
/// magnitude is capped at 1.
#[inline]
pub fn sanitize_planar(dir: Vec2) -> Vec2 {
    if !dir.is_finite() {
        return Vec2::ZERO;
    }
    if dir.length_squared() > 1.0 {
        dir.normalize_or_zero()
    } else {
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(-1.0, 0.1), 0.0);
        assert_eq!(clamp_dt(f32::NAN, 0.1), 0.0);
        assert_eq!(clamp_dt(f32::INFINITY, 0.1), 0.0);
        assert_eq!(clamp_dt(3.0, 0.1), 0.1);
        assert!((clamp_dt(0.016, 0.1) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_planar() {
        assert_eq!(sanitize_planar(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
        let capped = sanitize_planar(Vec2::new(3.0, 4.0));
        assert!((capped.length() - 1.0).abs() < 1e-5);
        let small = sanitize_planar(Vec2::new(0.3, 0.4));
        assert!((small.length() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 10.0, 0.1) - 1.0).abs() < 1e-6);
    }
}
