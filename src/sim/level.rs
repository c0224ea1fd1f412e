//! Level layout
//!
//! The course is authored here once and handed to the simulation as immutable
//! collider sets plus gem and pad positions.

use std::f32::consts::PI;

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::PadKind;
use super::geometry::{GeometryRegistry, StaticCollider};

/// Pad cylinder radius
pub const PAD_RADIUS: f32 = 2.0;
/// Pad cylinder height
pub const PAD_HEIGHT: f32 = 0.2;
/// Boundary wall height
pub const WALL_HEIGHT: f32 = 10.0;
/// Boundary wall thickness
pub const WALL_THICKNESS: f32 = 2.0;

/// Start or finish pad. Trigger only, the marble rolls over it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub position: Vec3,
    pub radius: f32,
    pub half_height: f32,
}

impl Pad {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: PAD_RADIUS,
            half_height: PAD_HEIGHT * 0.5,
        }
    }

    /// Shape for the renderer
    pub fn shape(&self) -> StaticCollider {
        StaticCollider::Cylinder {
            center: self.position,
            radius: self.radius,
            half_height: self.half_height,
        }
    }
}

/// Static level description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub geometry: GeometryRegistry,
    pub gem_spawns: Vec<Vec3>,
    pub start_pad: Option<Pad>,
    pub finish_pad: Option<Pad>,
}

/// Rotation that points a box's local +z at `target` from `from`, keeping +y up
pub fn look_rotation(from: Vec3, target: Vec3) -> Quat {
    let Some(z) = (target - from).try_normalize() else {
        return Quat::IDENTITY;
    };
    let Some(x) = Vec3::Y.cross(z).try_normalize() else {
        // Looking straight up or down
        return Quat::from_rotation_arc(Vec3::Z, z);
    };
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

impl Level {
    /// Pads as (kind, position) pairs for trigger checks
    pub fn pads(&self) -> Vec<(PadKind, Vec3)> {
        let mut pads = Vec::with_capacity(2);
        if let Some(pad) = self.start_pad {
            pads.push((PadKind::Start, pad.position));
        }
        if let Some(pad) = self.finish_pad {
            pads.push((PadKind::Finish, pad.position));
        }
        pads
    }

    /// The standard course: start area, first challenge, split safe/speed
    /// paths meeting on a convergence platform, final ramp and finish.
    pub fn default_course() -> Self {
        let mut level = Self::default();
        level.build_starting_area();
        level.build_first_challenge();
        level.build_middle_section();
        level.build_final_challenge();
        level.build_boundary_walls();
        log::debug!(
            "Course built: {} platforms, {} walls, {} gems",
            level.geometry.platforms().len(),
            level.geometry.walls().len(),
            level.gem_spawns.len()
        );
        level
    }

    fn platform(&mut self, x: f32, y: f32, z: f32, size: Vec3) {
        self.geometry
            .add_platform(StaticCollider::cuboid(Vec3::new(x, y, z), size));
    }

    fn tilted_platform(&mut self, x: f32, y: f32, z: f32, size: Vec3, angle_z: f32) {
        self.geometry.add_platform(StaticCollider::oriented(
            Vec3::new(x, y, z),
            size,
            Quat::from_rotation_z(angle_z),
        ));
    }

    fn gem(&mut self, x: f32, y: f32, z: f32) {
        self.gem_spawns.push(Vec3::new(x, y, z));
    }

    fn build_starting_area(&mut self) {
        self.platform(0.0, -0.5, 0.0, Vec3::new(15.0, 1.0, 15.0));
        self.start_pad = Some(Pad::new(Vec3::ZERO));
        // Gentle 7.5° slope
        self.tilted_platform(10.0, 0.0, 0.0, Vec3::new(8.0, 1.0, 15.0), -PI / 24.0);
    }

    fn build_first_challenge(&mut self) {
        self.platform(20.0, 1.0, 0.0, Vec3::new(12.0, 1.0, 12.0));
        self.platform(30.0, 1.5, 0.0, Vec3::new(8.0, 1.0, 4.0));
        self.tilted_platform(40.0, 2.0, 0.0, Vec3::new(15.0, 1.0, 15.0), PI / 32.0);

        self.gem(20.0, 2.0, -3.0);
        self.gem(20.0, 2.0, 3.0);
        self.gem(40.0, 3.5, 0.0);
    }

    fn build_middle_section(&mut self) {
        // Safe path: wide platforms joined by bridges
        let safe = [
            Vec3::new(55.0, 2.5, -15.0),
            Vec3::new(65.0, 3.0, -20.0),
            Vec3::new(75.0, 4.0, -15.0),
            Vec3::new(80.0, 4.5, -8.0),
        ];
        for (i, pos) in safe.iter().enumerate() {
            self.platform(pos.x, pos.y, pos.z, Vec3::new(12.0, 1.0, 12.0));
            if let Some(next) = safe.get(i + 1) {
                self.bridge(*pos, *next);
            }
            if i % 2 == 0 {
                self.gem(pos.x, pos.y + 1.5, pos.z);
            }
        }

        // Speed path: smaller platforms, gaps to jump
        let speed = [
            Vec3::new(55.0, 2.5, 15.0),
            Vec3::new(65.0, 3.5, 20.0),
            Vec3::new(75.0, 4.5, 15.0),
            Vec3::new(80.0, 5.0, 8.0),
        ];
        for (i, pos) in speed.iter().enumerate() {
            self.platform(pos.x, pos.y, pos.z, Vec3::new(8.0, 1.0, 8.0));
            if i % 2 == 1 {
                self.gem(pos.x, pos.y + 1.5, pos.z);
            }
        }

        self.platform(80.0, 5.0, 0.0, Vec3::new(20.0, 1.0, 20.0));
    }

    /// Thin bridge centered between two platforms and aimed at the second
    fn bridge(&mut self, start: Vec3, end: Vec3) {
        let length = (end.x - start.x).hypot(end.z - start.z);
        let center = (start + end) * 0.5;
        self.geometry.add_platform(StaticCollider::oriented(
            center,
            Vec3::new(length, 0.5, 4.0),
            look_rotation(center, end),
        ));
    }

    fn build_final_challenge(&mut self) {
        self.platform(100.0, 6.0, 0.0, Vec3::new(20.0, 1.0, 20.0));
        // 15° launch ramp
        self.tilted_platform(110.0, 6.5, 0.0, Vec3::new(10.0, 1.0, 15.0), PI / 12.0);
        self.platform(125.0, 8.0, 0.0, Vec3::new(15.0, 1.0, 15.0));
        self.finish_pad = Some(Pad::new(Vec3::new(125.0, 8.5, 0.0)));

        self.gem(125.0, 10.0, 0.0);
    }

    fn build_boundary_walls(&mut self) {
        let half_h = WALL_HEIGHT / 2.0;
        let walls = [
            (Vec3::new(WALL_THICKNESS, WALL_HEIGHT, 150.0), Vec3::new(-10.0, half_h, 0.0)),
            (Vec3::new(WALL_THICKNESS, WALL_HEIGHT, 150.0), Vec3::new(140.0, half_h, 0.0)),
            (Vec3::new(150.0, WALL_HEIGHT, WALL_THICKNESS), Vec3::new(65.0, half_h, -30.0)),
            (Vec3::new(150.0, WALL_HEIGHT, WALL_THICKNESS), Vec3::new(65.0, half_h, 30.0)),
        ];
        for (size, center) in walls {
            self.geometry.add_wall(StaticCollider::cuboid(center, size));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_course_inventory() {
        let level = Level::default_course();
        // 5 + 4 safe + 3 bridges + 4 speed + 1 convergence + 3 final
        assert_eq!(level.geometry.platforms().len(), 20);
        assert_eq!(level.geometry.walls().len(), 4);
        assert_eq!(level.gem_spawns.len(), 8);
        assert_eq!(level.pads().len(), 2);
    }

    #[test]
    fn test_start_platform_top_is_ground_level() {
        let level = Level::default_course();
        let start = &level.geometry.platforms()[0];
        assert!(start.bounds.top().abs() < 1e-6);
        assert!(start.bounds.contains_xz(Vec3::ZERO));
    }

    #[test]
    fn test_look_rotation_points_z_at_target() {
        let from = Vec3::new(60.0, 2.75, -17.5);
        let to = Vec3::new(65.0, 3.0, -20.0);
        let q = look_rotation(from, to);
        let forward = q * Vec3::Z;
        assert!((forward - (to - from).normalize()).length() < 1e-4);
        // Up stays mostly up
        assert!((q * Vec3::Y).y > 0.9);
        assert_eq!(look_rotation(from, from), Quat::IDENTITY);
    }

    #[test]
    fn test_tilted_ramp_bounds_enclose_rotation() {
        let level = Level::default_course();
        // Final ramp: 10 x 1 box tilted 15°
        let ramp = &level.geometry.platforms()[18];
        let (s, c) = (PI / 12.0).sin_cos();
        let expected_top = 6.5 + 5.0 * s + 0.5 * c;
        assert!((ramp.bounds.top() - expected_top).abs() < 1e-4);
    }
}
