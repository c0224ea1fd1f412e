//! Static level geometry
//!
//! Colliders are authored once when the level loads and never move. Each one
//! caches its world-space bounding box, which is all the resolver ever queries:
//! a rotated ramp is tested against the box that encloses it.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Height of the top face
    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// True when the box has no volume (or holds non-finite values).
    /// The resolver skips these.
    pub fn is_degenerate(&self) -> bool {
        let size = self.max - self.min;
        !size.is_finite() || size.min_element() <= 0.0
    }

    /// Whether a point lies within the box's horizontal (x, z) footprint, edges inclusive
    #[inline]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Closest point on (or in) the box to `point`: per-axis clamp
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// Shape of a static collider as authored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StaticCollider {
    /// Box with its own orientation
    Box {
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
    },
    /// Upright cylinder (pads)
    Cylinder {
        center: Vec3,
        radius: f32,
        half_height: f32,
    },
}

impl StaticCollider {
    /// Unrotated box
    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        Self::Box {
            center,
            half_extents: size * 0.5,
            rotation: Quat::IDENTITY,
        }
    }

    /// Box rotated by `rotation` about its own center
    pub fn oriented(center: Vec3, size: Vec3, rotation: Quat) -> Self {
        Self::Box {
            center,
            half_extents: size * 0.5,
            rotation: rotation.normalize(),
        }
    }

    pub fn center(&self) -> Vec3 {
        match *self {
            Self::Box { center, .. } | Self::Cylinder { center, .. } => center,
        }
    }

    /// Tight world-space AABB enclosing the shape
    pub fn world_aabb(&self) -> Aabb {
        match *self {
            Self::Box {
                center,
                half_extents,
                rotation,
            } => {
                // |R| * h gives the half extents of the rotated box's enclosing AABB
                let m = Mat3::from_quat(rotation);
                let abs = Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
                Aabb::from_center_half_extents(center, abs * half_extents.abs())
            }
            Self::Cylinder {
                center,
                radius,
                half_height,
            } => Aabb::from_center_half_extents(
                center,
                Vec3::new(radius, half_height, radius),
            ),
        }
    }
}

/// A collider plus its cached world bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: StaticCollider,
    pub bounds: Aabb,
}

impl Collider {
    pub fn new(shape: StaticCollider) -> Self {
        Self {
            bounds: shape.world_aabb(),
            shape,
        }
    }
}

impl From<StaticCollider> for Collider {
    fn from(shape: StaticCollider) -> Self {
        Self::new(shape)
    }
}

/// The two disjoint collider sets of a level, in authoring order.
///
/// Order matters: ground contact takes the first platform that qualifies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryRegistry {
    platforms: Vec<Collider>,
    walls: Vec<Collider>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a support surface
    pub fn add_platform(&mut self, shape: StaticCollider) -> &mut Self {
        self.platforms.push(Collider::new(shape));
        self
    }

    /// Append a lateral-only boundary
    pub fn add_wall(&mut self, shape: StaticCollider) -> &mut Self {
        self.walls.push(Collider::new(shape));
        self
    }

    pub fn platforms(&self) -> &[Collider] {
        &self.platforms
    }

    pub fn walls(&self) -> &[Collider] {
        &self.walls
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.walls.is_empty()
    }

    /// Bounds enclosing every collider, if any
    pub fn bounds(&self) -> Option<Aabb> {
        self.platforms
            .iter()
            .chain(&self.walls)
            .map(|c| c.bounds)
            .reduce(|a, b| Aabb::new(a.min.min(b.min), a.max.max(b.max)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_cuboid_aabb() {
        let c = StaticCollider::cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(15.0, 1.0, 15.0));
        let aabb = c.world_aabb();
        assert!(approx(aabb.min, Vec3::new(-7.5, -1.0, -7.5)));
        assert!(approx(aabb.max, Vec3::new(7.5, 0.0, 7.5)));
        assert!((aabb.top() - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_box_aabb_grows() {
        // 2x2x2 cube rotated 45° about y: footprint widens to 2*sqrt(2)
        let c = StaticCollider::oriented(Vec3::ZERO, Vec3::splat(2.0), Quat::from_rotation_y(FRAC_PI_4));
        let aabb = c.world_aabb();
        let s = std::f32::consts::SQRT_2;
        assert!(approx(aabb.max, Vec3::new(s, 1.0, s)));

        // Quarter turn about z swaps x and y extents
        let c = StaticCollider::oriented(
            Vec3::ZERO,
            Vec3::new(8.0, 1.0, 4.0),
            Quat::from_rotation_z(FRAC_PI_2),
        );
        let aabb = c.world_aabb();
        assert!(approx(aabb.max, Vec3::new(0.5, 4.0, 2.0)));
    }

    #[test]
    fn test_cylinder_aabb() {
        let c = StaticCollider::Cylinder {
            center: Vec3::new(1.0, 0.0, 1.0),
            radius: 2.0,
            half_height: 0.1,
        };
        let aabb = c.world_aabb();
        assert!(approx(aabb.min, Vec3::new(-1.0, -0.1, -1.0)));
        assert!(approx(aabb.max, Vec3::new(3.0, 0.1, 3.0)));
    }

    #[test]
    fn test_degenerate() {
        assert!(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ZERO).is_degenerate());
        assert!(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)).is_degenerate());
        assert!(!Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE).is_degenerate());
    }

    #[test]
    fn test_closest_point_and_footprint() {
        let aabb = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(aabb.contains_xz(Vec3::new(1.0, 50.0, -1.0)));
        assert!(!aabb.contains_xz(Vec3::new(1.01, 0.0, 0.0)));
        assert!(approx(aabb.closest_point(Vec3::new(3.0, 1.0, 0.0)), Vec3::new(1.0, 1.0, 0.0)));
        // Inside points are their own closest point
        assert!(approx(aabb.closest_point(Vec3::new(0.2, 1.0, 0.3)), Vec3::new(0.2, 1.0, 0.3)));
    }

    #[test]
    fn test_registry_order_and_bounds() {
        let mut reg = GeometryRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.bounds().is_none());
        reg.add_platform(StaticCollider::cuboid(Vec3::ZERO, Vec3::ONE))
            .add_platform(StaticCollider::cuboid(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE))
            .add_wall(StaticCollider::cuboid(Vec3::new(-5.0, 0.0, 0.0), Vec3::ONE));
        assert_eq!(reg.platforms().len(), 2);
        assert_eq!(reg.walls().len(), 1);
        assert!((reg.platforms()[1].bounds.center().x - 5.0).abs() < 1e-6);
        let b = reg.bounds().unwrap();
        assert!((b.min.x + 5.5).abs() < 1e-6);
        assert!((b.max.x - 5.5).abs() < 1e-6);
    }
}
