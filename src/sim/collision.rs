//! Collision resolution against static level geometry
//!
//! Three passes per tick, always in this order:
//! 1. Ground: snap the marble onto the first platform it is crossing from above.
//! 2. Walls: push the marble out of every overlapping wall box, bleeding velocity.
//! 3. Triggers: distance checks for gems and pads, no physical response.

use glam::Vec3;

use super::body::DynamicBody;
use super::geometry::{Aabb, Collider};
use super::progress::GemField;
use crate::tuning::PhysicsTuning;

/// Result of a sphere-vs-box overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the sphere overlaps the box
    pub hit: bool,
    /// Closest point on the box to the sphere center
    pub point: Vec3,
    /// Unit push-out direction (from box toward sphere center)
    pub normal: Vec3,
    /// How far the sphere must move along `normal` to just touch the box
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }

    /// Translation that resolves the overlap
    #[inline]
    pub fn push_out(&self) -> Vec3 {
        self.normal * self.penetration
    }
}

/// Which pad the marble is standing near
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    Start,
    Finish,
}

/// Sphere vs axis-aligned box.
///
/// When the center is outside the box the push-out runs from the closest point to the
/// center. When the center is inside, the push-out leaves through the nearest face.
pub fn sphere_aabb_collision(center: Vec3, radius: f32, aabb: &Aabb) -> CollisionResult {
    if aabb.is_degenerate() || !center.is_finite() {
        return CollisionResult::miss();
    }

    let closest = aabb.closest_point(center);
    let offset = center - closest;
    let distance = offset.length();

    if distance >= radius {
        return CollisionResult::miss();
    }

    match offset.try_normalize() {
        Some(normal) => CollisionResult {
            hit: true,
            point: closest,
            normal,
            penetration: radius - distance,
        },
        None => deep_penetration(center, radius, aabb),
    }
}

/// Center inside the box: exit through the face with the least travel
fn deep_penetration(center: Vec3, radius: f32, aabb: &Aabb) -> CollisionResult {
    let to_min = center - aabb.min;
    let to_max = aabb.max - center;

    let mut best = (to_min.x, -Vec3::X);
    for candidate in [
        (to_max.x, Vec3::X),
        (to_min.y, -Vec3::Y),
        (to_max.y, Vec3::Y),
        (to_min.z, -Vec3::Z),
        (to_max.z, Vec3::Z),
    ] {
        if candidate.0 < best.0 {
            best = candidate;
        }
    }

    let (depth, normal) = best;
    CollisionResult {
        hit: true,
        point: center + normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Ground contact against platforms, first match in list order wins.
///
/// Recomputes `body.grounded` from scratch; returns the index of the supporting platform.
pub fn resolve_ground(body: &mut DynamicBody, platforms: &[Collider]) -> Option<usize> {
    body.grounded = false;

    for (idx, platform) in platforms.iter().enumerate() {
        let bounds = &platform.bounds;
        if bounds.is_degenerate() || !bounds.contains_xz(body.position) {
            continue;
        }

        let top = bounds.top();
        // Crossing the top surface from above, not already fully beneath it
        if body.bottom() <= top && body.top() > top {
            body.position.y = top + body.radius();
            body.velocity.y = 0.0;
            body.grounded = true;
            return Some(idx);
        }
    }

    None
}

/// Push the marble out of every wall it overlaps, in list order.
///
/// Each wall is handled independently, so a corner gets two sequential corrections.
/// Returns the number of walls touched.
pub fn resolve_walls(body: &mut DynamicBody, walls: &[Collider], restitution: f32) -> usize {
    let mut contacts = 0;

    for wall in walls {
        let result = sphere_aabb_collision(body.position, body.radius(), &wall.bounds);
        if !result.hit {
            continue;
        }
        contacts += 1;

        body.position += result.push_out();

        let into_wall = body.velocity.dot(result.normal);
        if into_wall < 0.0 {
            body.velocity -= result.normal * into_wall;
            body.velocity *= restitution;
        }
    }

    contacts
}

/// Remove every gem within pickup range; returns the positions picked up this call.
pub fn collect_gems(body: &DynamicBody, gems: &mut GemField, margin: f32) -> Vec<Vec3> {
    let reach = body.radius() + margin;
    gems.collect_within(body.position, reach)
}

/// Whether the marble center is within `activation_radius` of a pad center
#[inline]
pub fn pad_in_range(body: &DynamicBody, pad_position: Vec3, activation_radius: f32) -> bool {
    body.position.distance(pad_position) < activation_radius
}

/// Outcome of one full resolver pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    /// Index of the platform providing support, if grounded
    pub ground: Option<usize>,
    pub wall_contacts: usize,
    /// Gems removed this tick
    pub gems_collected: Vec<Vec3>,
    /// Pads in range this tick
    pub pads: Vec<PadKind>,
}

/// Run ground, wall and trigger passes against a level.
///
/// On the tick the marble launches (`launched`), the ground pass is skipped so the
/// jump velocity survives; contact is re-evaluated on the next tick.
pub fn resolve(
    body: &mut DynamicBody,
    platforms: &[Collider],
    walls: &[Collider],
    gems: &mut GemField,
    pads: &[(PadKind, Vec3)],
    tuning: &PhysicsTuning,
    launched: bool,
) -> ResolveReport {
    let ground = if launched {
        body.grounded = false;
        None
    } else {
        resolve_ground(body, platforms)
    };
    let wall_contacts = resolve_walls(body, walls, tuning.wall_restitution);
    let gems_collected = collect_gems(body, gems, tuning.gem_pickup_margin);
    let pads = pads
        .iter()
        .filter(|(_, pos)| pad_in_range(body, *pos, tuning.pad_activation_radius))
        .map(|(kind, _)| *kind)
        .collect();

    ResolveReport {
        ground,
        wall_contacts,
        gems_collected,
        pads,
    }
}
